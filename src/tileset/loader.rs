use super::{cache, tsx, TilesetConfig, TilesetError};
use crate::tiles::TileRegistry;
use bevy::prelude::*;

/// Load the registry described by `config`.
///
/// The descriptor is authoritative: when it parses, the baked cache is
/// refreshed from it. The cache is only read when the descriptor file itself
/// cannot be read. A malformed descriptor is reported, never masked.
pub fn load_registry(config: &TilesetConfig) -> Result<TileRegistry, TilesetError> {
    match tsx::load_descriptor(&config.descriptor_path) {
        Ok(registry) => {
            info!(
                "Loaded tileset '{}' ({} tiles) from {}",
                registry.name(),
                registry.len(),
                config.descriptor_path.display()
            );
            if let Some(cache_path) = &config.cache_path {
                match cache::save_cache(&registry, cache_path) {
                    Ok(_) => debug!("Baked tileset cache {}", cache_path.display()),
                    Err(e) => warn!("Failed to bake tileset cache {}: {}", cache_path.display(), e),
                }
            }
            Ok(registry)
        }
        Err(TilesetError::Io(e)) => {
            let Some(cache_path) = config
                .cache_path
                .as_ref()
                .filter(|path| cache::cache_exists(path))
            else {
                return Err(TilesetError::Io(e));
            };

            warn!(
                "Failed to read tileset {}: {}, loading baked cache {}",
                config.descriptor_path.display(),
                e,
                cache_path.display()
            );
            cache::load_cache(cache_path)
        }
        Err(e) => Err(e),
    }
}

/// Startup system: load the tileset and publish it as a resource
pub fn load_tileset(
    mut commands: Commands,
    config: Res<TilesetConfig>,
    mut exit: MessageWriter<AppExit>,
) {
    match load_registry(&config) {
        Ok(registry) => {
            for tile in registry.iter() {
                debug!(
                    "Tile {} -> {} ({} properties)",
                    tile.id,
                    tile.image_path(),
                    tile.properties.len()
                );
            }
            commands.insert_resource(registry);
        }
        Err(e) => {
            error!(
                "Failed to load tileset {}: {}",
                config.descriptor_path.display(),
                e
            );
            exit.write(AppExit::error());
        }
    }
}

/// System to log tileset statistics
pub fn log_tileset_stats(registry: Option<Res<TileRegistry>>) {
    if let Some(registry) = registry {
        info!("{}", registry.stats());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::TilesetPlugin;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    const SHIPPED_TILESET: &str = include_str!("../../assets/tilemap/tiles.tsx");

    /// Fresh per-test directory under the system temp dir
    fn test_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("tileset_loader_{}", name));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config_in(dir: &PathBuf) -> TilesetConfig {
        TilesetConfig::new(dir.join("tiles.tsx")).with_cache_path(Some(dir.join("cache/tiles.bin")))
    }

    #[test]
    fn test_load_descriptor_bakes_cache() {
        let dir = test_dir("bakes_cache");
        let config = config_in(&dir);
        fs::write(&config.descriptor_path, SHIPPED_TILESET).unwrap();

        let registry = load_registry(&config).expect("Failed to load tileset");
        assert_eq!(registry.len(), 17);

        let cache_path = config.cache_path.as_ref().unwrap();
        assert!(cache::cache_exists(cache_path));
        assert_eq!(cache::load_cache(cache_path).unwrap(), registry);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_descriptor_falls_back_to_cache() {
        let dir = test_dir("fallback");
        let config = config_in(&dir);
        fs::write(&config.descriptor_path, SHIPPED_TILESET).unwrap();
        let original = load_registry(&config).unwrap();

        fs::remove_file(&config.descriptor_path).unwrap();
        let loaded = load_registry(&config).expect("Failed to load from cache");
        assert_eq!(loaded, original);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_descriptor_without_cache() {
        let dir = test_dir("no_cache");
        let config = config_in(&dir);

        let err = load_registry(&config).unwrap_err();
        assert!(matches!(err, TilesetError::Io(_)));

        let err = load_registry(&config.clone().with_cache_path(None)).unwrap_err();
        assert!(matches!(err, TilesetError::Io(_)));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_descriptor_not_masked_by_cache() {
        let dir = test_dir("malformed");
        let config = config_in(&dir);
        fs::write(&config.descriptor_path, SHIPPED_TILESET).unwrap();
        load_registry(&config).unwrap();

        let duplicated = SHIPPED_TILESET.replace(r#"<tile id="16">"#, r#"<tile id="15">"#);
        fs::write(&config.descriptor_path, duplicated).unwrap();

        let err = load_registry(&config).unwrap_err();
        assert!(matches!(err, TilesetError::DuplicateTileId(15)));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_undecodable_descriptor_not_masked_by_cache() {
        let dir = test_dir("undecodable");
        let config = config_in(&dir);
        fs::write(&config.descriptor_path, SHIPPED_TILESET).unwrap();
        load_registry(&config).unwrap();

        let mut bytes = SHIPPED_TILESET.as_bytes().to_vec();
        bytes.insert(bytes.len() / 2, 0xFF);
        fs::write(&config.descriptor_path, bytes).unwrap();

        let err = load_registry(&config).unwrap_err();
        assert!(matches!(err, TilesetError::Xml(_)));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_plugin_inserts_registry() {
        let dir = test_dir("plugin");
        let config = config_in(&dir);
        fs::write(&config.descriptor_path, SHIPPED_TILESET).unwrap();

        let mut app = App::new();
        app.insert_resource(config).add_plugins(TilesetPlugin);
        app.update();

        let registry = app
            .world()
            .get_resource::<TileRegistry>()
            .expect("Tileset resource missing");
        assert_eq!(registry.len(), 17);
        assert!(app.should_exit().is_none());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_plugin_requests_exit_on_failure() {
        let dir = test_dir("plugin_failure");
        let config = config_in(&dir);

        let mut app = App::new();
        app.insert_resource(config).add_plugins(TilesetPlugin);
        app.update();

        assert!(!app.world().contains_resource::<TileRegistry>());
        assert!(app.should_exit().is_some());

        let _ = fs::remove_dir_all(dir);
    }
}
