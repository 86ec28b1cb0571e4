use std::time::Duration;

use engine::{LoopConfig, Scene};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{self, GameConfig};

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) scene: Box<dyn Scene>,
}

pub(crate) fn build_app() -> AppWiring {
    init_tracing();
    info!("=== Crown Climb Startup ===");

    let game_config = load_game_config();
    let config = loop_config_for(&game_config);
    AppWiring {
        config,
        scene: gameplay::build_scene(game_config),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Reads the file named by the config env var; any failure falls back to defaults.
fn load_game_config() -> GameConfig {
    let Some(path) = gameplay::config_path_from_env() else {
        return GameConfig::default();
    };
    match GameConfig::load_from_path(&path) {
        Ok(config) => {
            info!(path = %path.display(), "config_loaded");
            config
        }
        Err(error) => {
            warn!(
                env_var = gameplay::CONFIG_ENV_VAR,
                error = %error,
                "config_load_failed_using_defaults"
            );
            GameConfig::default()
        }
    }
}

fn loop_config_for(game: &GameConfig) -> LoopConfig {
    LoopConfig {
        window_title: game.window.title.clone(),
        window_width: game.window.width,
        window_height: game.window.height,
        clear_color: gameplay::SKY_COLOR,
        target_tps: game.window.target_tps,
        resize_regenerate_delay: Duration::from_millis(game.window.resize_debounce_ms),
        ..LoopConfig::default()
    }
}
