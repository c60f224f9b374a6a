use crate::tiles::TileId;
use std::io;

/// Error type for loading, parsing and saving tilesets
#[derive(Debug)]
pub enum TilesetError {
    Io(io::Error),
    /// Malformed descriptor document
    Xml(String),
    DuplicateTileId(TileId),
    EmptyImageSource(TileId),
    InvalidTileSize(u32, u32),
    TooManyTiles(usize),
    DuplicateProperty { tile: TileId, name: String },
    InvalidPropertyValue { tile: TileId, name: String, value: String },
    UnsupportedPropertyType { tile: TileId, name: String, kind: String },
    InvalidMagicNumber,
    InvalidVersion(u16),
    InvalidPayloadSize(u32),
    InvalidChecksum,
    /// Cache payload could not be encoded or decoded
    Encoding(String),
}

impl From<io::Error> for TilesetError {
    fn from(err: io::Error) -> Self {
        TilesetError::Io(err)
    }
}

impl From<bincode::Error> for TilesetError {
    fn from(err: bincode::Error) -> Self {
        TilesetError::Encoding(err.to_string())
    }
}

impl std::fmt::Display for TilesetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TilesetError::Io(e) => write!(f, "IO error: {}", e),
            TilesetError::Xml(e) => write!(f, "Malformed tileset document: {}", e),
            TilesetError::DuplicateTileId(id) => write!(f, "Duplicate tile id: {}", id),
            TilesetError::EmptyImageSource(id) => write!(f, "Tile {} has no image source", id),
            TilesetError::InvalidTileSize(w, h) => write!(f, "Invalid tile size: {}x{}", w, h),
            TilesetError::TooManyTiles(n) => write!(f, "Too many tiles: {}", n),
            TilesetError::DuplicateProperty { tile, name } => {
                write!(f, "Tile {} declares property '{}' twice", tile, name)
            }
            TilesetError::InvalidPropertyValue { tile, name, value } => {
                write!(f, "Tile {} property '{}' has invalid value '{}'", tile, name, value)
            }
            TilesetError::UnsupportedPropertyType { tile, name, kind } => {
                write!(f, "Tile {} property '{}' has unsupported type '{}'", tile, name, kind)
            }
            TilesetError::InvalidMagicNumber => write!(f, "Invalid magic number"),
            TilesetError::InvalidVersion(v) => write!(f, "Invalid version: {}", v),
            TilesetError::InvalidPayloadSize(s) => write!(f, "Invalid payload size: {}", s),
            TilesetError::InvalidChecksum => write!(f, "Checksum mismatch"),
            TilesetError::Encoding(e) => write!(f, "Encoding error: {}", e),
        }
    }
}

impl std::error::Error for TilesetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TilesetError::Io(e) => Some(e),
            _ => None,
        }
    }
}
