pub mod cache;
mod error;
pub mod loader;
pub mod tsx;

// Re-export commonly used items
pub use error::TilesetError;
pub use loader::load_registry;
pub use tsx::{load_descriptor, parse_tsx, save_descriptor, to_tsx_string};

use crate::tiles::{DEFAULT_CACHE_PATH, DEFAULT_DESCRIPTOR_PATH};
use bevy::prelude::*;
use std::path::PathBuf;

/// Plugin that loads the tileset once at startup
pub struct TilesetPlugin;

impl Plugin for TilesetPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TilesetConfig>().add_systems(
            Startup,
            (
                loader::load_tileset,
                loader::log_tileset_stats.after(loader::load_tileset),
            ),
        );
    }
}

/// Where the tileset is read from
#[derive(Resource, Debug, Clone)]
pub struct TilesetConfig {
    /// Tileset descriptor (`.tsx`)
    pub descriptor_path: PathBuf,
    /// Baked cache, refreshed on every successful load. `None` disables it.
    pub cache_path: Option<PathBuf>,
}

impl TilesetConfig {
    pub fn new(descriptor_path: impl Into<PathBuf>) -> Self {
        Self {
            descriptor_path: descriptor_path.into(),
            ..Default::default()
        }
    }

    pub fn with_cache_path(mut self, cache_path: Option<PathBuf>) -> Self {
        self.cache_path = cache_path;
        self
    }
}

impl Default for TilesetConfig {
    fn default() -> Self {
        Self {
            descriptor_path: PathBuf::from(DEFAULT_DESCRIPTOR_PATH),
            cache_path: Some(PathBuf::from(DEFAULT_CACHE_PATH)),
        }
    }
}
