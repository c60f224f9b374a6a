use super::TilesetError;
use crate::tiles::{TileRecord, TileRegistry, TilesetHeader};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// Magic number for baked tileset files ("TSET" in ASCII)
const MAGIC_NUMBER: [u8; 4] = [b'T', b'S', b'E', b'T'];

/// Current cache file format version
const VERSION: u16 = 1;

/// Upper bound on the encoded payload, guards allocation on corrupt headers
const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

#[derive(Serialize)]
struct BakedTilesetRef<'a> {
    header: &'a TilesetHeader,
    tiles: &'a [TileRecord],
}

#[derive(Deserialize)]
struct BakedTileset {
    header: TilesetHeader,
    tiles: Vec<TileRecord>,
}

/// Save a registry to disk in the baked binary format
pub fn save_cache<P: AsRef<Path>>(
    registry: &TileRegistry,
    path: P,
) -> Result<(), TilesetError> {
    // Ensure directory exists
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = bincode::serialize(&BakedTilesetRef {
        header: registry.header(),
        tiles: registry.records(),
    })?;
    let payload_len = u32::try_from(payload.len())
        .ok()
        .filter(|&len| len <= MAX_PAYLOAD_SIZE)
        .ok_or(TilesetError::InvalidPayloadSize(u32::MAX))?;

    let mut file = File::create(path)?;

    // Write header
    file.write_all(&MAGIC_NUMBER)?;
    file.write_all(&VERSION.to_le_bytes())?;
    file.write_all(&payload_len.to_le_bytes())?;

    // Write payload followed by its checksum (CRC32)
    file.write_all(&payload)?;
    let checksum = crc32fast::hash(&payload);
    file.write_all(&checksum.to_le_bytes())?;

    file.sync_all()?;
    Ok(())
}

/// Load a registry from a baked cache file.
/// The records go through the same validation as a parsed descriptor.
pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<TileRegistry, TilesetError> {
    let mut file = File::open(path)?;

    // Read and verify magic number
    let mut magic = [0u8; 4];
    file.read_exact(&mut magic)?;
    if magic != MAGIC_NUMBER {
        return Err(TilesetError::InvalidMagicNumber);
    }

    // Read and verify version
    let mut version_bytes = [0u8; 2];
    file.read_exact(&mut version_bytes)?;
    let version = u16::from_le_bytes(version_bytes);
    if version != VERSION {
        return Err(TilesetError::InvalidVersion(version));
    }

    // Read payload length
    let mut len_bytes = [0u8; 4];
    file.read_exact(&mut len_bytes)?;
    let payload_len = u32::from_le_bytes(len_bytes);
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(TilesetError::InvalidPayloadSize(payload_len));
    }

    // Read payload
    let mut payload = vec![0u8; payload_len as usize];
    file.read_exact(&mut payload)?;

    // Read and verify checksum
    let mut checksum_bytes = [0u8; 4];
    file.read_exact(&mut checksum_bytes)?;
    let expected_checksum = u32::from_le_bytes(checksum_bytes);
    let actual_checksum = crc32fast::hash(&payload);
    if actual_checksum != expected_checksum {
        return Err(TilesetError::InvalidChecksum);
    }

    let baked: BakedTileset = bincode::deserialize(&payload)?;
    TileRegistry::new(baked.header, baked.tiles)
}

/// Check if a cache file exists
pub fn cache_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists()
}

/// Delete a cache file
pub fn delete_cache<P: AsRef<Path>>(path: P) -> Result<(), io::Error> {
    fs::remove_file(path)
}
