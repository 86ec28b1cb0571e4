use super::input::{ActionStates, InputAction};
use super::physics::{self, Aabb, BodyState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Held this tick.
    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    /// Went down since the previous tick.
    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.actions.was_pressed(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        if !is_down {
            self.actions.set_pressed(action, false);
        }
        self
    }

    pub fn with_action_held(mut self, action: InputAction) -> Self {
        self.actions.set(action, true);
        self.actions.set_pressed(action, false);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen-space size of the drawable surface, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Coarse category used for queries and sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Player,
    Ground,
    Platform,
    Ladder,
    Coin,
    WinPlatform,
    Crown,
    Overlay,
    Hud,
    Message,
    Decor,
}

impl EntityTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityTag::Player => "player",
            EntityTag::Ground => "ground",
            EntityTag::Platform => "platform",
            EntityTag::Ladder => "ladder",
            EntityTag::Coin => "coin",
            EntityTag::WinPlatform => "winPlatform",
            EntityTag::Crown => "crown",
            EntityTag::Overlay => "overlay",
            EntityTag::Hud => "hud",
            EntityTag::Message => "message",
            EntityTag::Decor => "decor",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    TopLeft,
    Center,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Smiley,
    Coin,
    Crown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub width: f32,
    pub color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderableKind {
    Rect {
        size: Vec2,
        color: [u8; 4],
        corner_radius: f32,
        outline: Option<Outline>,
    },
    Circle {
        radius: f32,
        color: [u8; 4],
    },
    Text {
        text: String,
        scale: i32,
        color: [u8; 4],
        align: TextAlign,
    },
    Icon {
        icon: Icon,
        size: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub anchor: Anchor,
    pub z: i32,
    pub opacity: f32,
    pub debug_name: &'static str,
}

impl RenderableDesc {
    pub fn new(kind: RenderableKind, debug_name: &'static str) -> Self {
        Self {
            kind,
            anchor: Anchor::TopLeft,
            z: 0,
            opacity: 1.0,
            debug_name,
        }
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn centered(mut self) -> Self {
        self.anchor = Anchor::Center;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Transform {
    pub position: Vec2,
}

/// Axis-aligned area whose top-left corner sits at the entity position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub size: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Static,
    Dynamic(BodyState),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub tag: EntityTag,
    pub transform: Transform,
    pub renderable: RenderableDesc,
    pub collider: Option<Collider>,
    pub body: Option<Body>,
    applied_spawn_order: u64,
}

impl Entity {
    pub fn aabb(&self) -> Option<Aabb> {
        self.collider
            .map(|collider| Aabb::from_position_size(self.transform.position, collider.size))
    }

    pub fn body_state(&self) -> Option<&BodyState> {
        match &self.body {
            Some(Body::Dynamic(state)) => Some(state),
            _ => None,
        }
    }

    pub fn body_state_mut(&mut self) -> Option<&mut BodyState> {
        match &mut self.body {
            Some(Body::Dynamic(state)) => Some(state),
            _ => None,
        }
    }

    pub fn applied_spawn_order(&self) -> u64 {
        self.applied_spawn_order
    }
}

/// Everything needed to create an entity in one call.
#[derive(Debug, Clone)]
pub struct EntityDesc {
    pub tag: EntityTag,
    pub position: Vec2,
    pub renderable: RenderableDesc,
    pub collider: Option<Collider>,
    pub body: Option<Body>,
}

impl EntityDesc {
    pub fn new(tag: EntityTag, position: Vec2, renderable: RenderableDesc) -> Self {
        Self {
            tag,
            position,
            renderable,
            collider: None,
            body: None,
        }
    }

    pub fn with_collider(mut self, size: Vec2) -> Self {
        self.collider = Some(Collider { size });
        self
    }

    pub fn with_static_body(mut self) -> Self {
        self.body = Some(Body::Static);
        self
    }

    pub fn with_dynamic_body(mut self) -> Self {
        self.body = Some(Body::Dynamic(BodyState::default()));
        self
    }
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

#[derive(Debug, Clone)]
struct DelayedDespawn {
    ids: Vec<EntityId>,
    remaining_seconds: f32,
}

#[derive(Debug)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    next_applied_spawn_order: u64,
    delayed_despawns: Vec<DelayedDespawn>,
    viewport: Viewport,
    gravity: f32,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl SceneWorld {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            allocator: EntityIdAllocator::default(),
            entities: Vec::new(),
            pending_spawns: Vec::new(),
            pending_despawns: Vec::new(),
            next_applied_spawn_order: 0,
            delayed_despawns: Vec::new(),
            viewport,
            gravity: 0.0,
        }
    }

    pub fn spawn(&mut self, desc: EntityDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            tag: desc.tag,
            transform: Transform {
                position: desc.position,
            },
            renderable: desc.renderable,
            collider: desc.collider,
            body: desc.body,
            applied_spawn_order: 0,
        });
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if (!exists_now && !pending_spawn) || self.pending_despawns.contains(&id) {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    /// Removes `ids` once `delay_seconds` of simulated time has passed. Fires once.
    pub fn despawn_after(&mut self, ids: Vec<EntityId>, delay_seconds: f32) {
        if ids.is_empty() {
            return;
        }
        self.delayed_despawns.push(DelayedDespawn {
            ids,
            remaining_seconds: delay_seconds.max(0.0),
        });
    }

    pub fn pending_timer_count(&self) -> usize {
        self.delayed_despawns.len()
    }

    pub fn tick_timers(&mut self, fixed_dt_seconds: f32) {
        let mut expired = Vec::new();
        self.delayed_despawns.retain_mut(|timer| {
            timer.remaining_seconds -= fixed_dt_seconds;
            if timer.remaining_seconds <= 0.0 {
                expired.append(&mut timer.ids);
                false
            } else {
                true
            }
        });
        for id in expired {
            self.despawn(id);
        }
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort_by_key(|id| id.0);
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_spawns.retain(|entity| {
                pending
                    .binary_search_by_key(&entity.id.0, |id| id.0)
                    .is_err()
            });
            self.pending_despawns.clear();
        }

        if !self.pending_spawns.is_empty() {
            for mut entity in self.pending_spawns.drain(..) {
                entity.applied_spawn_order = self.next_applied_spawn_order;
                self.next_applied_spawn_order = self.next_applied_spawn_order.saturating_add(1);
                self.entities.push(entity);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.delayed_despawns.clear();
        self.next_applied_spawn_order = 0;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn step_physics(&mut self, fixed_dt_seconds: f32) {
        physics::step_bodies(&mut self.entities, self.gravity, fixed_dt_seconds);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_tagged(&self, tag: EntityTag) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| entity.tag == tag)
    }

    pub fn count_tagged(&self, tag: EntityTag) -> usize {
        self.entities_tagged(tag).count()
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Ids of `tag` entities whose collider overlaps `id`'s collider, in spawn order.
    pub fn overlapping_tagged(&self, id: EntityId, tag: EntityTag) -> Vec<EntityId> {
        let Some(area) = self.find_entity(id).and_then(Entity::aabb) else {
            return Vec::new();
        };
        self.entities_tagged(tag)
            .filter(|entity| entity.id != id)
            .filter(|entity| entity.aabb().is_some_and(|other| area.overlaps(&other)))
            .map(|entity| entity.id)
            .collect()
    }

    /// True when `dynamic_id` was pushed out of `static_id` during the last physics step.
    pub fn is_colliding(&self, dynamic_id: EntityId, static_id: EntityId) -> bool {
        self.find_entity(dynamic_id)
            .and_then(Entity::body_state)
            .is_some_and(|state| state.is_touching(static_id))
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

/// Owns the single running scene and its world.
pub struct SceneHost {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneHost {
    pub fn new(scene: Box<dyn Scene>, viewport: Viewport) -> Self {
        Self {
            scene,
            world: SceneWorld::new(viewport),
            is_loaded: false,
        }
    }

    pub fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.world.apply_pending();
        self.is_loaded = true;
    }

    /// One fixed step: physics, timers, then the scene's own update.
    pub fn tick(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.world.step_physics(fixed_dt_seconds);
        self.world.tick_timers(fixed_dt_seconds);
        self.world.apply_pending();
        let command = self.scene.update(fixed_dt_seconds, input, &mut self.world);
        self.world.apply_pending();
        command
    }

    /// Tears the current world down and loads the scene again for `viewport`.
    /// Old and new entities never coexist in the visible world.
    pub fn regenerate(&mut self, viewport: Viewport) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
        }
        self.world.clear();
        self.world.set_viewport(viewport);
        self.scene.load(&mut self.world);
        self.world.apply_pending();
        self.is_loaded = true;
    }

    pub fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
            self.world.clear();
            self.is_loaded = false;
        }
    }

    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut SceneWorld {
        &mut self.world
    }

    pub fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(tag: EntityTag, position: Vec2) -> EntityDesc {
        EntityDesc::new(
            tag,
            position,
            RenderableDesc::new(
                RenderableKind::Circle {
                    radius: 4.0,
                    color: [255, 255, 255, 255],
                },
                "marker",
            ),
        )
    }

    struct CountingScene {
        spawn_count: usize,
        loads: usize,
        unloads: usize,
        seen_viewport: Option<Viewport>,
    }

    impl CountingScene {
        fn new(spawn_count: usize) -> Self {
            Self {
                spawn_count,
                loads: 0,
                unloads: 0,
                seen_viewport: None,
            }
        }
    }

    impl Scene for CountingScene {
        fn load(&mut self, world: &mut SceneWorld) {
            self.loads += 1;
            self.seen_viewport = Some(world.viewport());
            for index in 0..self.spawn_count {
                world.spawn(marker(EntityTag::Platform, Vec2::new(index as f32, 0.0)));
            }
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            _input: &InputSnapshot,
            _world: &mut SceneWorld,
        ) -> SceneCommand {
            SceneCommand::None
        }

        fn unload(&mut self, _world: &mut SceneWorld) {
            self.unloads += 1;
        }
    }

    #[test]
    fn spawned_entities_appear_after_apply_pending() {
        let mut world = SceneWorld::default();
        let id = world.spawn(marker(EntityTag::Coin, Vec2::ZERO));
        assert_eq!(world.entity_count(), 0);

        world.apply_pending();
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.find_entity(id).expect("entity").tag, EntityTag::Coin);
    }

    #[test]
    fn despawn_unknown_id_returns_false() {
        let mut world = SceneWorld::default();
        assert!(!world.despawn(EntityId(99)));
    }

    #[test]
    fn despawn_of_pending_spawn_never_becomes_visible() {
        let mut world = SceneWorld::default();
        let id = world.spawn(marker(EntityTag::Coin, Vec2::ZERO));
        assert!(world.despawn(id));
        world.apply_pending();
        assert!(world.find_entity(id).is_none());
    }

    #[test]
    fn second_despawn_in_same_tick_is_rejected() {
        let mut world = SceneWorld::default();
        let id = world.spawn(marker(EntityTag::Coin, Vec2::ZERO));
        world.apply_pending();

        assert!(world.despawn(id));
        assert!(!world.despawn(id));
    }

    #[test]
    fn delayed_despawn_fires_exactly_once_after_delay() {
        let mut world = SceneWorld::default();
        let id = world.spawn(marker(EntityTag::Message, Vec2::ZERO));
        world.apply_pending();
        world.despawn_after(vec![id], 1.0);

        for _ in 0..59 {
            world.tick_timers(1.0 / 60.0);
            world.apply_pending();
        }
        assert!(world.find_entity(id).is_some());

        world.tick_timers(1.0 / 30.0);
        world.apply_pending();
        assert!(world.find_entity(id).is_none());
        assert_eq!(world.pending_timer_count(), 0);
    }

    #[test]
    fn overlap_query_filters_by_tag_and_area() {
        let mut world = SceneWorld::default();
        let player = world.spawn(
            marker(EntityTag::Player, Vec2::new(10.0, 10.0)).with_collider(Vec2::new(10.0, 10.0)),
        );
        let near = world.spawn(
            marker(EntityTag::Coin, Vec2::new(15.0, 15.0)).with_collider(Vec2::new(10.0, 10.0)),
        );
        world.spawn(
            marker(EntityTag::Coin, Vec2::new(50.0, 50.0)).with_collider(Vec2::new(10.0, 10.0)),
        );
        world.spawn(
            marker(EntityTag::Ladder, Vec2::new(12.0, 12.0)).with_collider(Vec2::new(4.0, 4.0)),
        );
        world.apply_pending();

        assert_eq!(world.overlapping_tagged(player, EntityTag::Coin), vec![near]);
    }

    #[test]
    fn host_regenerate_replaces_world_for_new_viewport() {
        let mut host = SceneHost::new(Box::new(CountingScene::new(3)), Viewport::new(800, 600));
        host.load();
        assert_eq!(host.world().entity_count(), 3);

        host.regenerate(Viewport::new(1024, 768));
        assert_eq!(host.world().entity_count(), 3);
        assert_eq!(host.world().viewport(), Viewport::new(1024, 768));
    }

    #[test]
    fn host_load_is_idempotent() {
        let mut host = SceneHost::new(Box::new(CountingScene::new(2)), Viewport::default());
        host.load();
        host.load();
        assert_eq!(host.world().entity_count(), 2);
    }

    #[test]
    fn snapshot_builders_track_held_and_pressed_separately() {
        let pressed = InputSnapshot::empty().with_action_down(InputAction::MoveUp, true);
        assert!(pressed.is_down(InputAction::MoveUp));
        assert!(pressed.was_pressed(InputAction::MoveUp));

        let held = InputSnapshot::empty().with_action_held(InputAction::MoveUp);
        assert!(held.is_down(InputAction::MoveUp));
        assert!(!held.was_pressed(InputAction::MoveUp));
    }

    #[test]
    fn tags_use_layout_names() {
        assert_eq!(EntityTag::WinPlatform.as_str(), "winPlatform");
        assert_eq!(EntityTag::Overlay.as_str(), "overlay");
    }
}
