pub mod app;

pub use app::{
    run_app, text_size, Aabb, Anchor, AppError, Body, BodyState, Collider, Entity, EntityDesc,
    EntityId, EntityTag, Icon, InputAction, InputSnapshot, LoopConfig, LoopMetricsSnapshot,
    Outline, RenderableDesc, RenderableKind, Renderer, Scene, SceneCommand, SceneHost,
    SceneWorld, TextAlign, Transform, Vec2, Viewport,
};
