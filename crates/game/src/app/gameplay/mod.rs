use engine::Scene;

mod config;
mod decor;
mod layout;
mod scene_impl;
mod state;
mod systems;

pub(crate) use config::{config_path_from_env, GameConfig, CONFIG_ENV_VAR};
pub(crate) use decor::SKY_COLOR;

use scene_impl::PlatformerScene;

pub(crate) fn build_scene(config: GameConfig) -> Box<dyn Scene> {
    Box::new(PlatformerScene::new(config))
}
