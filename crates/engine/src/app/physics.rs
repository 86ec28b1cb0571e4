use super::scene::{Body, Entity, EntityId, Vec2};

/// Maximum downward speed, keeps fast falls from tunnelling through thin platforms.
const MAX_FALL_SPEED: f32 = 1600.0;

/// Overlap smaller than this is treated as resting contact, not penetration.
const CONTACT_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Aabb {
    pub fn from_position_size(position: Vec2, size: Vec2) -> Self {
        Self {
            min_x: position.x,
            min_y: position.y,
            max_x: position.x + size.x,
            max_y: position.y + size.y,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    fn penetrates(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x - CONTACT_EPSILON
            && self.max_x > other.min_x + CONTACT_EPSILON
            && self.min_y < other.max_y - CONTACT_EPSILON
            && self.max_y > other.min_y + CONTACT_EPSILON
    }
}

/// Kinematic state of the one kind of moving body the engine supports.
///
/// `move_intent` is a velocity applied for the next step only, then cleared,
/// so callers re-issue it every tick while a key is held.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub velocity: Vec2,
    pub move_intent: Vec2,
    pub gravity_scale: f32,
    grounded: bool,
    contacts: Vec<EntityId>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            move_intent: Vec2::ZERO,
            gravity_scale: 1.0,
            grounded: false,
            contacts: Vec::new(),
        }
    }
}

impl BodyState {
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_touching(&self, id: EntityId) -> bool {
        self.contacts.contains(&id)
    }

    /// Upward launch; screen y grows downward.
    pub fn jump(&mut self, force: f32) {
        self.velocity.y = -force;
        self.grounded = false;
    }

    pub fn add_move_intent(&mut self, delta: Vec2) {
        self.move_intent.x += delta.x;
        self.move_intent.y += delta.y;
    }

    /// Drops accumulated velocity, used when a body is teleported.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.move_intent = Vec2::ZERO;
        self.grounded = false;
        self.contacts.clear();
    }
}

pub(crate) fn step_bodies(entities: &mut [Entity], gravity: f32, fixed_dt_seconds: f32) {
    let solids: Vec<(EntityId, Aabb)> = entities
        .iter()
        .filter(|entity| matches!(entity.body, Some(Body::Static)))
        .filter_map(|entity| entity.aabb().map(|aabb| (entity.id, aabb)))
        .collect();

    for entity in entities.iter_mut() {
        let Some(size) = entity.collider.map(|collider| collider.size) else {
            continue;
        };
        let position = &mut entity.transform.position;
        let Some(Body::Dynamic(state)) = &mut entity.body else {
            continue;
        };
        step_body(state, position, size, &solids, gravity, fixed_dt_seconds);
    }
}

fn step_body(
    state: &mut BodyState,
    position: &mut Vec2,
    size: Vec2,
    solids: &[(EntityId, Aabb)],
    gravity: f32,
    dt: f32,
) {
    state.contacts.clear();
    state.grounded = false;

    state.velocity.y += gravity * state.gravity_scale * dt;
    state.velocity.y = state.velocity.y.min(MAX_FALL_SPEED);

    let dx = (state.velocity.x + state.move_intent.x) * dt;
    let dy = (state.velocity.y + state.move_intent.y) * dt;
    state.move_intent = Vec2::ZERO;

    position.x += dx;
    for (id, solid) in solids {
        let area = Aabb::from_position_size(*position, size);
        if !area.penetrates(solid) {
            continue;
        }
        if dx > 0.0 {
            position.x = solid.min_x - size.x;
        } else if dx < 0.0 {
            position.x = solid.max_x;
        }
        state.velocity.x = 0.0;
        push_contact(&mut state.contacts, *id);
    }

    position.y += dy;
    for (id, solid) in solids {
        let area = Aabb::from_position_size(*position, size);
        if !area.penetrates(solid) {
            continue;
        }
        if dy > 0.0 {
            position.y = solid.min_y - size.y;
            state.velocity.y = state.velocity.y.min(0.0);
            state.grounded = true;
        } else if dy < 0.0 {
            position.y = solid.max_y;
            state.velocity.y = state.velocity.y.max(0.0);
        }
        push_contact(&mut state.contacts, *id);
    }
}

fn push_contact(contacts: &mut Vec<EntityId>, id: EntityId) {
    if !contacts.contains(&id) {
        contacts.push(id);
    }
}
