use engine::{
    EntityDesc, EntityId, EntityTag, Icon, InputSnapshot, Outline, RenderableDesc,
    RenderableKind, Scene, SceneCommand, SceneWorld, Vec2, Viewport,
};
use tracing::{info, warn};

use super::config::GameConfig;
use super::decor;
use super::layout::{
    generate_layout, verify_coin_total, LevelLayout, PlatformPlacement, COIN_SIZE, CROWN_SIZE,
};
use super::state::{GamePhase, GameState, GoalOutcome};
use super::systems::{self, TickSystem, TICK_ORDER};

const PLATFORM_COLOR: [u8; 4] = [255, 200, 60, 255];
const PLATFORM_BORDER_COLOR: [u8; 4] = [200, 140, 20, 255];
const LADDER_COLOR: [u8; 4] = [255, 220, 60, 255];
const WIN_PLATFORM_COLOR: [u8; 4] = [220, 180, 80, 255];
const WIN_PLATFORM_BORDER_COLOR: [u8; 4] = [180, 140, 40, 255];

const Z_LADDER: i32 = 1;
const Z_PICKUP: i32 = 2;
const Z_PLAYER: i32 = 5;

/// Player spawn relative to the bottom-center of the viewport.
const SPAWN_OFFSET: Vec2 = Vec2::new(-20.0, -120.0);

#[derive(Debug, Default)]
struct SpawnedIds {
    player: Option<EntityId>,
    hud: Option<EntityId>,
    win_platform: Option<EntityId>,
    reminder: Vec<EntityId>,
}

/// The one running level: generated on load, torn down on unload.
pub(crate) struct PlatformerScene {
    config: GameConfig,
    game: GameState,
    ids: SpawnedIds,
    last_tick_order: Vec<TickSystem>,
}

impl PlatformerScene {
    pub(crate) fn new(config: GameConfig) -> Self {
        Self {
            config,
            game: GameState::new(0),
            ids: SpawnedIds::default(),
            last_tick_order: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn game(&self) -> &GameState {
        &self.game
    }

    #[cfg(test)]
    pub(crate) fn player_id(&self) -> Option<EntityId> {
        self.ids.player
    }

    #[cfg(test)]
    pub(crate) fn last_tick_order(&self) -> &[TickSystem] {
        &self.last_tick_order
    }

    fn player_spawn(viewport: Viewport) -> Vec2 {
        Vec2::new(
            viewport.width_f32() * 0.5 + SPAWN_OFFSET.x,
            viewport.height_f32() + SPAWN_OFFSET.y,
        )
    }

    fn spawn_layout(&mut self, world: &mut SceneWorld, layout: &LevelLayout) {
        for platform in &layout.platforms {
            spawn_solid(
                world,
                EntityTag::Platform,
                platform,
                PLATFORM_COLOR,
                Outline {
                    width: 4.0,
                    color: PLATFORM_BORDER_COLOR,
                },
                0,
            );
        }

        for ladder in &layout.ladders {
            world.spawn(
                EntityDesc::new(
                    EntityTag::Ladder,
                    ladder.position,
                    RenderableDesc::new(
                        RenderableKind::Rect {
                            size: ladder.size,
                            color: LADDER_COLOR,
                            corner_radius: 6.0,
                            outline: None,
                        },
                        "ladder",
                    )
                    .with_z(Z_LADDER),
                )
                .with_collider(ladder.size),
            );
        }

        for coin in &layout.coins {
            world.spawn(
                EntityDesc::new(
                    EntityTag::Coin,
                    coin.position,
                    RenderableDesc::new(
                        RenderableKind::Icon {
                            icon: Icon::Coin,
                            size: COIN_SIZE,
                        },
                        "coin",
                    )
                    .with_z(Z_PICKUP),
                )
                .with_collider(Vec2::new(COIN_SIZE, COIN_SIZE)),
            );
        }

        self.ids.win_platform = layout.goal.map(|goal| {
            let crown_origin = Vec2::new(
                goal.crown_center.x - CROWN_SIZE * 0.5,
                goal.crown_center.y - CROWN_SIZE * 0.5,
            );
            world.spawn(
                EntityDesc::new(
                    EntityTag::Crown,
                    crown_origin,
                    RenderableDesc::new(
                        RenderableKind::Icon {
                            icon: Icon::Crown,
                            size: CROWN_SIZE,
                        },
                        "crown",
                    )
                    .with_z(Z_PICKUP),
                )
                .with_collider(Vec2::new(CROWN_SIZE, CROWN_SIZE)),
            );
            spawn_solid(
                world,
                EntityTag::WinPlatform,
                &goal.win_platform,
                WIN_PLATFORM_COLOR,
                Outline {
                    width: 3.0,
                    color: WIN_PLATFORM_BORDER_COLOR,
                },
                Z_LADDER,
            )
        });
    }

    fn spawn_player(&mut self, world: &mut SceneWorld, viewport: Viewport) {
        let size = self.config.physics.player_size;
        self.ids.player = Some(
            world.spawn(
                EntityDesc::new(
                    EntityTag::Player,
                    Self::player_spawn(viewport),
                    RenderableDesc::new(
                        RenderableKind::Icon {
                            icon: Icon::Smiley,
                            size,
                        },
                        "player",
                    )
                    .with_z(Z_PLAYER),
                )
                .with_collider(Vec2::new(size, size))
                .with_dynamic_body(),
            ),
        );
    }

    fn reminder_visible(&self, world: &SceneWorld) -> bool {
        self.ids
            .reminder
            .iter()
            .any(|id| world.find_entity(*id).is_some())
    }

    fn handle_goal_outcome(&mut self, world: &mut SceneWorld, outcome: GoalOutcome) {
        let viewport = world.viewport();
        match outcome {
            GoalOutcome::NotReached => {}
            GoalOutcome::Won => {
                decor::spawn_win_banner(world, viewport, self.game.total_coins());
                info!(
                    collected = self.game.collected_coins(),
                    total = self.game.total_coins(),
                    "goal_reached"
                );
            }
            GoalOutcome::MissingCoins => {
                if self.reminder_visible(world) {
                    return;
                }
                let ids = decor::spawn_reminder(world, viewport);
                world.despawn_after(ids.clone(), self.config.reminder_seconds);
                self.ids.reminder = ids;
                info!(
                    collected = self.game.collected_coins(),
                    total = self.game.total_coins(),
                    "goal_blocked_missing_coins"
                );
            }
        }
    }
}

fn spawn_solid(
    world: &mut SceneWorld,
    tag: EntityTag,
    placement: &PlatformPlacement,
    color: [u8; 4],
    outline: Outline,
    z: i32,
) -> EntityId {
    world.spawn(
        EntityDesc::new(
            tag,
            placement.position,
            RenderableDesc::new(
                RenderableKind::Rect {
                    size: placement.size,
                    color,
                    corner_radius: 6.0,
                    outline: Some(outline),
                },
                tag.as_str(),
            )
            .with_z(z),
        )
        .with_collider(placement.size)
        .with_static_body(),
    )
}

impl Scene for PlatformerScene {
    fn load(&mut self, world: &mut SceneWorld) {
        let viewport = world.viewport();
        world.set_gravity(self.config.physics.gravity);

        let layout = generate_layout(viewport, &self.config.layout);
        verify_coin_total(&layout, self.config.layout.target_coins);
        info!(
            width = viewport.width,
            height = viewport.height,
            platforms = layout.platforms.len(),
            ladders = layout.ladders.len(),
            platform_coins = layout.platform_coin_count(),
            ladder_coins = layout.ladder_coin_count(),
            has_goal = layout.goal.is_some(),
            "layout_generated"
        );
        if layout.goal.is_none() {
            warn!(
                width = viewport.width,
                height = viewport.height,
                "viewport_too_small_for_goal"
            );
        }

        self.game = GameState::new(layout.total_coins);
        self.ids = SpawnedIds::default();

        decor::spawn_sky(world, viewport);
        decor::spawn_ground(world, viewport);
        self.spawn_layout(world, &layout);
        self.spawn_player(world, viewport);
        self.ids.hud = Some(decor::spawn_hud(world, self.game.score_label()));
        decor::spawn_controls_overlay(world, viewport);
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }
        let Some(player_id) = self.ids.player else {
            return SceneCommand::None;
        };
        let viewport = world.viewport();

        self.last_tick_order.clear();
        for system in TICK_ORDER {
            self.last_tick_order.push(system);
            match system {
                TickSystem::Movement => {
                    systems::apply_movement(world, player_id, input, &self.config.physics);
                }
                TickSystem::LadderClimb => {
                    systems::apply_ladder_climb(world, player_id, input, &self.config.physics);
                }
                TickSystem::Bounds => systems::clamp_to_viewport(world, player_id, viewport),
                TickSystem::FallRespawn => {
                    systems::respawn_if_fallen(
                        world,
                        player_id,
                        viewport,
                        Self::player_spawn(viewport),
                    );
                }
                TickSystem::CoinPickup => {
                    if systems::collect_coins(world, player_id, &mut self.game) > 0 {
                        if let Some(hud) = self.ids.hud {
                            decor::set_hud_label(world, hud, self.game.score_label());
                        }
                    }
                }
                TickSystem::Goal => {
                    let outcome = systems::check_goal(
                        world,
                        player_id,
                        self.ids.win_platform,
                        &mut self.game,
                    );
                    self.handle_goal_outcome(world, outcome);
                }
            }
        }

        SceneCommand::None
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        info!(
            collected = self.game.collected_coins(),
            total = self.game.total_coins(),
            won = self.game.phase() == GamePhase::Won,
            "scene_unloaded"
        );
        self.ids = SpawnedIds::default();
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let status = match self.game.phase() {
            GamePhase::Playing => self.game.score_label(),
            GamePhase::Won => "You win!".to_string(),
        };
        Some(format!("{} | {status}", self.config.window.title))
    }
}
