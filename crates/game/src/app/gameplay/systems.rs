use engine::{EntityId, EntityTag, InputAction, InputSnapshot, SceneWorld, Vec2, Viewport};
use tracing::{debug, info};

use super::config::PhysicsConfig;
use super::state::{GameState, GoalOutcome};

/// Order the scene runs its per-tick systems in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickSystem {
    Movement,
    LadderClimb,
    Bounds,
    FallRespawn,
    CoinPickup,
    Goal,
}

pub(crate) const TICK_ORDER: [TickSystem; 6] = [
    TickSystem::Movement,
    TickSystem::LadderClimb,
    TickSystem::Bounds,
    TickSystem::FallRespawn,
    TickSystem::CoinPickup,
    TickSystem::Goal,
];

/// Horizontal intent from held Left/Right; a fresh Up press jumps when grounded.
pub(crate) fn apply_movement(
    world: &mut SceneWorld,
    player_id: EntityId,
    input: &InputSnapshot,
    physics: &PhysicsConfig,
) {
    let Some(state) = world
        .find_entity_mut(player_id)
        .and_then(|player| player.body_state_mut())
    else {
        return;
    };

    let mut dx = 0.0;
    if input.is_down(InputAction::MoveLeft) {
        dx -= physics.player_speed;
    }
    if input.is_down(InputAction::MoveRight) {
        dx += physics.player_speed;
    }
    state.add_move_intent(Vec2::new(dx, 0.0));

    if input.was_pressed(InputAction::MoveUp) && state.is_grounded() {
        state.jump(physics.jump_force);
    }
}

/// While on a ladder, held Up/Down climbs with gravity off. Off every ladder,
/// gravity comes back. Returns whether the player overlaps a ladder.
pub(crate) fn apply_ladder_climb(
    world: &mut SceneWorld,
    player_id: EntityId,
    input: &InputSnapshot,
    physics: &PhysicsConfig,
) -> bool {
    let on_ladder = !world
        .overlapping_tagged(player_id, EntityTag::Ladder)
        .is_empty();
    let Some(state) = world
        .find_entity_mut(player_id)
        .and_then(|player| player.body_state_mut())
    else {
        return false;
    };

    if !on_ladder {
        state.gravity_scale = 1.0;
        return false;
    }

    let climb = if input.is_down(InputAction::MoveUp) {
        Some(-physics.climb_speed)
    } else if input.is_down(InputAction::MoveDown) {
        Some(physics.climb_speed)
    } else {
        None
    };
    if let Some(dy) = climb {
        state.gravity_scale = 0.0;
        state.velocity.y = 0.0;
        state.add_move_intent(Vec2::new(0.0, dy));
    }
    true
}

pub(crate) fn clamp_to_viewport(world: &mut SceneWorld, player_id: EntityId, viewport: Viewport) {
    let Some(player) = world.find_entity_mut(player_id) else {
        return;
    };
    let width = player.collider.map_or(0.0, |collider| collider.size.x);
    let max_x = (viewport.width_f32() - width).max(0.0);
    let position = &mut player.transform.position;
    position.x = position.x.clamp(0.0, max_x);
}

/// Puts the player back at `spawn` once it drops below the bottom edge.
pub(crate) fn respawn_if_fallen(
    world: &mut SceneWorld,
    player_id: EntityId,
    viewport: Viewport,
    spawn: Vec2,
) -> bool {
    let Some(player) = world.find_entity_mut(player_id) else {
        return false;
    };
    if player.transform.position.y <= viewport.height_f32() {
        return false;
    }
    player.transform.position = spawn;
    if let Some(state) = player.body_state_mut() {
        state.halt();
    }
    debug!(x = spawn.x, y = spawn.y, "player_respawned");
    true
}

/// Removes every coin the player overlaps and counts each one once.
pub(crate) fn collect_coins(
    world: &mut SceneWorld,
    player_id: EntityId,
    game: &mut GameState,
) -> usize {
    let touched = world.overlapping_tagged(player_id, EntityTag::Coin);
    let mut collected = 0;
    for coin_id in touched {
        if !world.despawn(coin_id) {
            continue;
        }
        game.collect_coin();
        collected += 1;
        info!(
            coin = coin_id.0,
            collected = game.collected_coins(),
            total = game.total_coins(),
            "coin_collected"
        );
    }
    collected
}

/// Goal check against resolved contact with the win platform.
pub(crate) fn check_goal(
    world: &SceneWorld,
    player_id: EntityId,
    win_platform_id: Option<EntityId>,
    game: &mut GameState,
) -> GoalOutcome {
    let on_win_platform =
        win_platform_id.is_some_and(|platform| world.is_colliding(player_id, platform));
    game.evaluate_goal(on_win_platform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{EntityDesc, RenderableDesc, RenderableKind};

    fn box_renderable() -> RenderableDesc {
        RenderableDesc::new(
            RenderableKind::Rect {
                size: Vec2::new(10.0, 10.0),
                color: [0, 0, 0, 255],
                corner_radius: 0.0,
                outline: None,
            },
            "box",
        )
    }

    fn spawn_player(world: &mut SceneWorld, position: Vec2) -> EntityId {
        let id = world.spawn(
            EntityDesc::new(EntityTag::Player, position, box_renderable())
                .with_collider(Vec2::new(40.0, 40.0))
                .with_dynamic_body(),
        );
        world.apply_pending();
        id
    }

    fn spawn_area(world: &mut SceneWorld, tag: EntityTag, position: Vec2, size: Vec2) -> EntityId {
        let id = world.spawn(EntityDesc::new(tag, position, box_renderable()).with_collider(size));
        world.apply_pending();
        id
    }

    fn body(world: &SceneWorld, id: EntityId) -> engine::BodyState {
        world
            .find_entity(id)
            .and_then(|entity| entity.body_state())
            .cloned()
            .expect("dynamic body")
    }

    #[test]
    fn held_keys_set_horizontal_intent() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::ZERO);
        let input = InputSnapshot::empty().with_action_held(InputAction::MoveRight);

        apply_movement(&mut world, player, &input, &PhysicsConfig::default());
        assert_eq!(body(&world, player).move_intent.x, 200.0);
    }

    #[test]
    fn jump_requires_ground_contact() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::ZERO);
        let input = InputSnapshot::empty().with_action_down(InputAction::MoveUp, true);

        apply_movement(&mut world, player, &input, &PhysicsConfig::default());
        assert_eq!(body(&world, player).velocity.y, 0.0);
    }

    #[test]
    fn climbing_disables_gravity_and_leaving_restores_it() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::new(100.0, 100.0));
        spawn_area(
            &mut world,
            EntityTag::Ladder,
            Vec2::new(110.0, 50.0),
            Vec2::new(20.0, 200.0),
        );
        let physics = PhysicsConfig::default();
        let climb = InputSnapshot::empty().with_action_held(InputAction::MoveUp);

        assert!(apply_ladder_climb(&mut world, player, &climb, &physics));
        let state = body(&world, player);
        assert_eq!(state.gravity_scale, 0.0);
        assert_eq!(state.move_intent.y, -200.0);

        world
            .find_entity_mut(player)
            .expect("player")
            .transform
            .position = Vec2::new(500.0, 100.0);
        assert!(!apply_ladder_climb(&mut world, player, &climb, &physics));
        assert_eq!(body(&world, player).gravity_scale, 1.0);
    }

    #[test]
    fn player_is_clamped_inside_viewport() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::new(2000.0, 10.0));

        clamp_to_viewport(&mut world, player, Viewport::new(800, 600));
        assert_eq!(
            world.find_entity(player).expect("player").transform.position.x,
            760.0
        );
    }

    #[test]
    fn falling_below_viewport_respawns() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::new(50.0, 900.0));
        let spawn = Vec2::new(380.0, 480.0);

        assert!(respawn_if_fallen(&mut world, player, Viewport::new(800, 600), spawn));
        assert_eq!(world.find_entity(player).expect("player").transform.position, spawn);
        assert!(!respawn_if_fallen(&mut world, player, Viewport::new(800, 600), spawn));
    }

    #[test]
    fn overlapped_coin_is_counted_once() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::new(0.0, 0.0));
        spawn_area(&mut world, EntityTag::Coin, Vec2::new(20.0, 20.0), Vec2::new(32.0, 32.0));
        spawn_area(&mut world, EntityTag::Coin, Vec2::new(300.0, 300.0), Vec2::new(32.0, 32.0));
        let mut game = GameState::new(2);

        assert_eq!(collect_coins(&mut world, player, &mut game), 1);
        world.apply_pending();
        assert_eq!(collect_coins(&mut world, player, &mut game), 0);
        assert_eq!(game.collected_coins(), 1);
        assert_eq!(world.count_tagged(EntityTag::Coin), 1);
    }

    #[test]
    fn goal_without_win_platform_is_never_reached() {
        let mut world = SceneWorld::default();
        let player = spawn_player(&mut world, Vec2::ZERO);
        let mut game = GameState::new(0);

        assert_eq!(check_goal(&world, player, None, &mut game), GoalOutcome::NotReached);
    }
}
