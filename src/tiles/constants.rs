/// Default location of the tileset descriptor, relative to the working directory
pub const DEFAULT_DESCRIPTOR_PATH: &str = "assets/tilemap/tiles.tsx";

/// Default location of the baked tileset cache
pub const DEFAULT_CACHE_PATH: &str = "saves/tileset/tiles.bin";

// Property names understood by the registry
/// Whether units can walk over the tile
pub const PROPERTY_PASSABLE: &str = "passable";

/// Amount of collectible resources on the tile
pub const PROPERTY_RESOURCES: &str = "resources";

// Property type names (the `type` attribute of a <property>)
pub const PROPERTY_TYPE_BOOL: &str = "bool";
pub const PROPERTY_TYPE_INT: &str = "int";
pub const PROPERTY_TYPE_FLOAT: &str = "float";
pub const PROPERTY_TYPE_STRING: &str = "string";
pub const PROPERTY_TYPE_FILE: &str = "file";
pub const PROPERTY_TYPE_COLOR: &str = "color";
