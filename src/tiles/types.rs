use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::constants::{PROPERTY_PASSABLE, PROPERTY_RESOURCES};

/// Type alias for tile IDs (local to a tileset, assigned by the author)
pub type TileId = u32;

/// External image referenced by a tile. Never loaded by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileImage {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl TileImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// A typed property value as stored in the descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    File(String),
    Color(String),
}

impl PropertyValue {
    /// Name of the property type as written in the `type` attribute
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::File(_) => "file",
            PropertyValue::Color(_) => "color",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::String(s) | PropertyValue::File(s) | PropertyValue::Color(s) => {
                write!(f, "{}", s)
            }
        }
    }
}

/// Per-tile properties keyed by name.
/// A missing key means "unspecified", not false or zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileProperties(BTreeMap<String, PropertyValue>);

impl TileProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Insert a property, returning the previous value under that name
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.0.insert(name.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `passable` flag, if present and boolean
    pub fn passable(&self) -> Option<bool> {
        self.get(PROPERTY_PASSABLE).and_then(PropertyValue::as_bool)
    }

    /// `resources` amount, if present and integer
    pub fn resources(&self) -> Option<i64> {
        self.get(PROPERTY_RESOURCES).and_then(PropertyValue::as_int)
    }
}

/// Coarse classification of a tile for the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Plain,
    Resource,
}

/// A single tile entry of a tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub id: TileId,
    pub image: TileImage,
    pub properties: TileProperties,
    /// Free-text class from the `type` attribute
    pub type_tag: Option<String>,
}

impl TileRecord {
    pub fn new(id: TileId, image: TileImage) -> Self {
        Self {
            id,
            image,
            properties: TileProperties::new(),
            type_tag: None,
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name, value);
        self
    }

    pub fn with_type_tag(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = Some(tag.into());
        self
    }

    pub fn image_path(&self) -> &str {
        &self.image.source
    }

    pub fn kind(&self) -> TileKind {
        if self.properties.resources().is_some() {
            TileKind::Resource
        } else {
            TileKind::Plain
        }
    }
}

/// Tile grid settings as written by the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    pub orientation: String,
    pub width: u32,
    pub height: u32,
}

/// Tileset-wide metadata shared by every tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetHeader {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub version: Option<String>,
    pub tiled_version: Option<String>,
    pub grid: Option<TileGrid>,
}

impl TilesetHeader {
    pub fn new(name: impl Into<String>, tile_width: u32, tile_height: u32) -> Self {
        Self {
            name: name.into(),
            tile_width,
            tile_height,
            columns: 0,
            version: None,
            tiled_version: None,
            grid: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_property_is_unspecified() {
        let props = TileProperties::new();
        assert_eq!(props.passable(), None);
        assert_eq!(props.resources(), None);
        assert!(props.is_empty());
    }

    #[test]
    fn test_typed_accessors_ignore_wrong_type() {
        let mut props = TileProperties::new();
        props.insert(PROPERTY_PASSABLE, PropertyValue::Int(1));
        props.insert(PROPERTY_RESOURCES, PropertyValue::String("1000".into()));

        // Present but not the expected type
        assert_eq!(props.passable(), None);
        assert_eq!(props.resources(), None);
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_tile_kind() {
        let image = TileImage::new("map_tiles/crystal.png", 128, 128);
        let crystal = TileRecord::new(15, image.clone())
            .with_property(PROPERTY_RESOURCES, PropertyValue::Int(1000));
        assert_eq!(crystal.kind(), TileKind::Resource);

        let grass = TileRecord::new(14, image)
            .with_property(PROPERTY_PASSABLE, PropertyValue::Bool(true))
            .with_type_tag("passable");
        assert_eq!(grass.kind(), TileKind::Plain);
        assert_eq!(grass.type_tag.as_deref(), Some("passable"));
    }

    #[test]
    fn test_property_display() {
        assert_eq!(PropertyValue::Bool(false).to_string(), "false");
        assert_eq!(PropertyValue::Int(1000).to_string(), "1000");
        assert_eq!(PropertyValue::Color("#ff00ff00".into()).to_string(), "#ff00ff00");
        assert_eq!(PropertyValue::Float(0.5).type_name(), "float");
    }
}
