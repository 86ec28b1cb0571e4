mod input;
mod loop_runner;
mod metrics;
mod physics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use physics::{Aabb, BodyState};
pub use rendering::{text_size, Renderer};
pub use scene::{
    Anchor, Body, Collider, Entity, EntityDesc, EntityId, EntityTag, Icon, InputSnapshot, Outline,
    RenderableDesc, RenderableKind, Scene, SceneCommand, SceneHost, SceneWorld, TextAlign,
    Transform, Vec2, Viewport,
};
