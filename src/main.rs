use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};

mod tiles;
mod tileset;

use tileset::{TilesetConfig, TilesetPlugin};

fn main() -> AppExit {
    // Optional descriptor path as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => TilesetConfig::new(path),
        None => TilesetConfig::default(),
    };

    App::new()
        .add_plugins((
            MinimalPlugins.set(ScheduleRunnerPlugin::run_once()),
            LogPlugin::default(),
        ))
        .insert_resource(config)
        .add_plugins(TilesetPlugin)
        .add_systems(Startup, report_passability.after(tileset::loader::log_tileset_stats))
        .run()
}

/// Print which tiles units can walk over and where resources sit
fn report_passability(registry: Option<Res<tiles::TileRegistry>>) {
    let Some(registry) = registry else {
        return;
    };

    let passable: Vec<_> = registry.passable_tiles().map(|tile| tile.id).collect();
    info!("Passable tiles: {:?}", passable);

    for tile in registry.resource_tiles() {
        info!(
            "Resource tile {} ({}): {} resources",
            tile.id,
            tile.image_path(),
            tile.properties.resources().unwrap_or_default()
        );
    }
}
