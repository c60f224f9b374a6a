pub mod constants;
pub mod registry;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use registry::{TileRegistry, TilesetStats};
pub use types::{
    PropertyValue, TileGrid, TileId, TileImage, TileKind, TileProperties, TileRecord,
    TilesetHeader,
};
