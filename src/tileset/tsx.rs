use super::TilesetError;
use crate::tiles::{
    PropertyValue, TileGrid, TileId, TileImage, TileProperties, TileRecord, TileRegistry,
    TilesetHeader, PROPERTY_TYPE_BOOL, PROPERTY_TYPE_COLOR, PROPERTY_TYPE_FILE,
    PROPERTY_TYPE_FLOAT, PROPERTY_TYPE_INT, PROPERTY_TYPE_STRING,
};
use bevy::prelude::*;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

// On-disk layout of a Tiled `.tsx` document. Attributes carry the `@` prefix.

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "tileset")]
struct RawTileset {
    #[serde(rename = "@version", default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(rename = "@tiledversion", default, skip_serializing_if = "Option::is_none")]
    tiled_version: Option<String>,
    #[serde(rename = "@name", default)]
    name: String,
    #[serde(rename = "@tilewidth")]
    tile_width: u32,
    #[serde(rename = "@tileheight")]
    tile_height: u32,
    #[serde(rename = "@tilecount", default, skip_serializing_if = "Option::is_none")]
    tile_count: Option<u32>,
    #[serde(rename = "@columns", default)]
    columns: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid: Option<RawGrid>,
    #[serde(rename = "tile", default)]
    tiles: Vec<RawTile>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawGrid {
    #[serde(rename = "@orientation")]
    orientation: String,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawTile {
    #[serde(rename = "@id")]
    id: TileId,
    // Tiled 1.9 renamed `type` to `class`; accept both
    #[serde(rename = "@type", alias = "@class", default, skip_serializing_if = "Option::is_none")]
    type_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<RawProperties>,
    #[serde(default)]
    image: Option<RawImage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawProperties {
    #[serde(rename = "property", default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawProperty {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(rename = "@value", default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    // Multi-line strings are stored as element text instead of `value`
    #[serde(rename = "$text", default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawImage {
    #[serde(rename = "@source")]
    source: String,
    #[serde(rename = "@width")]
    width: u32,
    #[serde(rename = "@height")]
    height: u32,
}

/// Parse a tileset descriptor into a registry
pub fn parse_tsx(document: &str) -> Result<TileRegistry, TilesetError> {
    let raw: RawTileset =
        quick_xml::de::from_str(document).map_err(|e| TilesetError::Xml(e.to_string()))?;

    if let Some(declared) = raw.tile_count {
        if declared as usize != raw.tiles.len() {
            warn!(
                "Tileset '{}' declares {} tiles but contains {}",
                raw.name,
                declared,
                raw.tiles.len()
            );
        }
    }

    let header = TilesetHeader {
        name: raw.name,
        tile_width: raw.tile_width,
        tile_height: raw.tile_height,
        columns: raw.columns,
        version: raw.version,
        tiled_version: raw.tiled_version,
        grid: raw.grid.map(|grid| TileGrid {
            orientation: grid.orientation,
            width: grid.width,
            height: grid.height,
        }),
    };

    let tiles = raw
        .tiles
        .into_iter()
        .map(parse_tile)
        .collect::<Result<Vec<_>, _>>()?;

    TileRegistry::new(header, tiles)
}

fn parse_tile(raw: RawTile) -> Result<TileRecord, TilesetError> {
    let image = raw.image.ok_or(TilesetError::EmptyImageSource(raw.id))?;

    let mut properties = TileProperties::new();
    for property in raw.properties.map(|p| p.properties).unwrap_or_default() {
        let name = property.name.clone();
        let value = parse_property(raw.id, property)?;
        if properties.insert(name.clone(), value).is_some() {
            return Err(TilesetError::DuplicateProperty { tile: raw.id, name });
        }
    }

    Ok(TileRecord {
        id: raw.id,
        image: TileImage::new(image.source, image.width, image.height),
        properties,
        type_tag: raw.type_tag,
    })
}

fn parse_property(tile: TileId, raw: RawProperty) -> Result<PropertyValue, TilesetError> {
    // Tiled omits the type attribute for plain strings
    let kind = raw
        .kind
        .unwrap_or_else(|| PROPERTY_TYPE_STRING.to_string());
    let text = raw.value.or(raw.text).unwrap_or_default();

    let value = match kind.as_str() {
        PROPERTY_TYPE_BOOL => text.trim().parse().map(PropertyValue::Bool).ok(),
        PROPERTY_TYPE_INT => text.trim().parse().map(PropertyValue::Int).ok(),
        PROPERTY_TYPE_FLOAT => text.trim().parse().map(PropertyValue::Float).ok(),
        PROPERTY_TYPE_STRING => return Ok(PropertyValue::String(text)),
        PROPERTY_TYPE_FILE => return Ok(PropertyValue::File(text)),
        PROPERTY_TYPE_COLOR => return Ok(PropertyValue::Color(text)),
        other => {
            return Err(TilesetError::UnsupportedPropertyType {
                tile,
                name: raw.name,
                kind: other.to_string(),
            })
        }
    };

    value.ok_or(TilesetError::InvalidPropertyValue {
        tile,
        name: raw.name,
        value: text,
    })
}

fn raw_property(name: &str, value: &PropertyValue) -> RawProperty {
    let kind = match value {
        PropertyValue::String(_) => None,
        other => Some(other.type_name().to_string()),
    };
    let rendered = value.to_string();
    let (value, text) = if rendered.contains('\n') {
        (None, Some(rendered))
    } else {
        (Some(rendered), None)
    };
    RawProperty {
        name: name.to_string(),
        kind,
        value,
        text,
    }
}

fn raw_tile(tile: &TileRecord) -> RawTile {
    let properties = if tile.properties.is_empty() {
        None
    } else {
        Some(RawProperties {
            properties: tile
                .properties
                .iter()
                .map(|(name, value)| raw_property(name, value))
                .collect(),
        })
    };

    RawTile {
        id: tile.id,
        type_tag: tile.type_tag.clone(),
        properties,
        image: Some(RawImage {
            source: tile.image.source.clone(),
            width: tile.image.width,
            height: tile.image.height,
        }),
    }
}

fn declared_tile_count(len: usize) -> Result<u32, TilesetError> {
    u32::try_from(len).map_err(|_| TilesetError::TooManyTiles(len))
}

/// Write a registry as an indented tileset document.
/// `tilecount` is always derived from the number of records.
pub fn to_tsx_string(registry: &TileRegistry) -> Result<String, TilesetError> {
    let header = registry.header();
    let raw = RawTileset {
        version: header.version.clone(),
        tiled_version: header.tiled_version.clone(),
        name: header.name.clone(),
        tile_width: header.tile_width,
        tile_height: header.tile_height,
        tile_count: Some(declared_tile_count(registry.len())?),
        columns: header.columns,
        grid: header.grid.as_ref().map(|grid| RawGrid {
            orientation: grid.orientation.clone(),
            width: grid.width,
            height: grid.height,
        }),
        tiles: registry.iter().map(raw_tile).collect(),
    };

    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 1);
    raw.serialize(serializer)
        .map_err(|e| TilesetError::Xml(e.to_string()))?;

    Ok(format!("{}\n{}\n", XML_DECLARATION, body))
}

/// Load a tileset descriptor from disk
pub fn load_descriptor<P: AsRef<Path>>(path: P) -> Result<TileRegistry, TilesetError> {
    // Decode separately so bad encoding is a malformed document, not an IO failure
    let bytes = fs::read(path)?;
    let document = String::from_utf8(bytes).map_err(|e| TilesetError::Xml(e.to_string()))?;
    parse_tsx(&document)
}

/// Save a tileset descriptor to disk
pub fn save_descriptor<P: AsRef<Path>>(
    registry: &TileRegistry,
    path: P,
) -> Result<(), TilesetError> {
    // Ensure directory exists
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, to_tsx_string(registry)?)?;
    Ok(())
}
