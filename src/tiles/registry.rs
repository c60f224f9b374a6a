use super::types::{TileId, TileKind, TileRecord, TilesetHeader};
use crate::tileset::TilesetError;
use bevy::prelude::*;
use std::collections::HashMap;

/// Tile registry for storing tile images and their properties.
/// Built once from a descriptor and read-only afterwards.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileRegistry {
    header: TilesetHeader,
    /// Records in document order
    tiles: Vec<TileRecord>,
    /// Tile ID -> position in `tiles`
    index: HashMap<TileId, usize>,
}

impl TileRegistry {
    /// Build a registry, validating tile size, image sources and ID uniqueness
    pub fn new(header: TilesetHeader, tiles: Vec<TileRecord>) -> Result<Self, TilesetError> {
        if header.tile_width == 0 || header.tile_height == 0 {
            return Err(TilesetError::InvalidTileSize(header.tile_width, header.tile_height));
        }

        let mut index = HashMap::with_capacity(tiles.len());
        for (i, tile) in tiles.iter().enumerate() {
            if tile.image.source.trim().is_empty() {
                return Err(TilesetError::EmptyImageSource(tile.id));
            }
            if index.insert(tile.id, i).is_some() {
                return Err(TilesetError::DuplicateTileId(tile.id));
            }
        }

        Ok(Self {
            header,
            tiles,
            index,
        })
    }

    pub fn header(&self) -> &TilesetHeader {
        &self.header
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn tile_width(&self) -> u32 {
        self.header.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.header.tile_height
    }

    /// Look up a tile by ID
    pub fn get(&self, tile_id: TileId) -> Option<&TileRecord> {
        self.index.get(&tile_id).map(|&i| &self.tiles[i])
    }

    /// Check if a tile ID is registered
    pub fn is_valid_tile(&self, tile_id: TileId) -> bool {
        self.index.contains_key(&tile_id)
    }

    /// All records in document order
    pub fn records(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|tile| tile.id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Passability of a tile. `None` if the tile is unknown or the flag is unspecified.
    pub fn is_passable(&self, tile_id: TileId) -> Option<bool> {
        self.get(tile_id).and_then(|tile| tile.properties.passable())
    }

    /// Resource amount of a tile. `None` if the tile is unknown or carries no resources.
    pub fn resources(&self, tile_id: TileId) -> Option<i64> {
        self.get(tile_id).and_then(|tile| tile.properties.resources())
    }

    /// Tiles explicitly marked passable
    pub fn passable_tiles(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles
            .iter()
            .filter(|tile| tile.properties.passable() == Some(true))
    }

    /// Tiles that carry a resource amount
    pub fn resource_tiles(&self) -> impl Iterator<Item = &TileRecord> {
        self.tiles
            .iter()
            .filter(|tile| tile.kind() == TileKind::Resource)
    }

    /// Get statistics about the registry contents
    pub fn stats(&self) -> TilesetStats {
        let mut stats = TilesetStats {
            name: self.header.name.clone(),
            tiles: self.tiles.len(),
            ..Default::default()
        };

        for tile in &self.tiles {
            match tile.properties.passable() {
                Some(true) => stats.passable += 1,
                Some(false) => stats.impassable += 1,
                None => stats.unspecified += 1,
            }
            if let Some(amount) = tile.properties.resources() {
                stats.resource_tiles += 1;
                stats.total_resources += amount;
            }
        }

        stats
    }
}

/// Statistics about a loaded tileset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilesetStats {
    pub name: String,
    pub tiles: usize,
    pub passable: usize,
    pub impassable: usize,
    /// Tiles without a passable flag
    pub unspecified: usize,
    pub resource_tiles: usize,
    pub total_resources: i64,
}

impl std::fmt::Display for TilesetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tileset '{}': {} tiles, Passable: {}, Impassable: {}, Unspecified: {}, Resource tiles: {} ({} total)",
            self.name,
            self.tiles,
            self.passable,
            self.impassable,
            self.unspecified,
            self.resource_tiles,
            self.total_resources
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{PropertyValue, TileImage, PROPERTY_PASSABLE, PROPERTY_RESOURCES};

    fn tile(id: TileId, source: &str) -> TileRecord {
        TileRecord::new(id, TileImage::new(source, 128, 128))
    }

    fn sample_registry() -> TileRegistry {
        let tiles = vec![
            tile(0, "map_tiles/tile_000.png")
                .with_property(PROPERTY_PASSABLE, PropertyValue::Bool(false)),
            tile(1, "map_tiles/tile_001.png")
                .with_property(PROPERTY_PASSABLE, PropertyValue::Bool(true)),
            tile(15, "map_tiles/crystal.png")
                .with_property(PROPERTY_RESOURCES, PropertyValue::Int(1000)),
            tile(16, "map_tiles/new-crystal.png"),
        ];
        TileRegistry::new(TilesetHeader::new("tiles", 128, 128), tiles).unwrap()
    }

    #[test]
    fn test_lookup() {
        let registry = sample_registry();

        assert_eq!(registry.len(), 4);
        assert!(registry.is_valid_tile(15));
        // IDs need not be contiguous
        assert!(!registry.is_valid_tile(2));
        assert_eq!(registry.get(1).map(TileRecord::image_path), Some("map_tiles/tile_001.png"));
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![0, 1, 15, 16]);
    }

    #[test]
    fn test_typed_queries() {
        let registry = sample_registry();

        assert_eq!(registry.is_passable(0), Some(false));
        assert_eq!(registry.is_passable(1), Some(true));
        // Unspecified stays unspecified
        assert_eq!(registry.is_passable(16), None);
        // Unknown tile
        assert_eq!(registry.is_passable(99), None);

        assert_eq!(registry.resources(15), Some(1000));
        assert_eq!(registry.resources(0), None);

        assert_eq!(registry.passable_tiles().map(|t| t.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(registry.resource_tiles().map(|t| t.id).collect::<Vec<_>>(), vec![15]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let tiles = vec![tile(3, "a.png"), tile(4, "b.png"), tile(3, "c.png")];
        let err = TileRegistry::new(TilesetHeader::new("dup", 16, 16), tiles).unwrap_err();
        assert!(matches!(err, TilesetError::DuplicateTileId(3)));
    }

    #[test]
    fn test_empty_image_rejected() {
        let tiles = vec![tile(0, "a.png"), tile(1, "  ")];
        let err = TileRegistry::new(TilesetHeader::new("empty", 16, 16), tiles).unwrap_err();
        assert!(matches!(err, TilesetError::EmptyImageSource(1)));
    }

    #[test]
    fn test_zero_tile_size_rejected() {
        let err = TileRegistry::new(TilesetHeader::new("zero", 0, 16), Vec::new()).unwrap_err();
        assert!(matches!(err, TilesetError::InvalidTileSize(0, 16)));
    }

    #[test]
    fn test_stats() {
        let stats = sample_registry().stats();

        assert_eq!(stats.tiles, 4);
        assert_eq!(stats.passable, 1);
        assert_eq!(stats.impassable, 1);
        assert_eq!(stats.unspecified, 2);
        assert_eq!(stats.resource_tiles, 1);
        assert_eq!(stats.total_resources, 1000);
        assert!(stats.to_string().starts_with("Tileset 'tiles': 4 tiles"));
    }
}
