use engine::{
    EntityDesc, EntityId, EntityTag, Outline, RenderableDesc, RenderableKind, SceneWorld,
    TextAlign, Vec2, Viewport,
};

pub(crate) const SKY_COLOR: [u8; 4] = [173, 216, 230, 255];
const GROUND_COLOR: [u8; 4] = [120, 200, 120, 255];
const SUN_COLOR: [u8; 4] = [255, 220, 80, 255];
const CLOUD_COLOR: [u8; 4] = [255, 255, 255, 255];
const PANEL_COLOR: [u8; 4] = [255, 255, 255, 255];
const INK_COLOR: [u8; 4] = [40, 40, 80, 255];
const WIN_OUTLINE_COLOR: [u8; 4] = [80, 180, 80, 255];
const REMINDER_OUTLINE_COLOR: [u8; 4] = [255, 100, 100, 255];
const REMINDER_TEXT_COLOR: [u8; 4] = [255, 80, 80, 255];

pub(crate) const GROUND_HEIGHT: f32 = 56.0;
const SUN_RADIUS: f32 = 50.0;
const HUD_POSITION: Vec2 = Vec2::new(32.0, 32.0);
const HUD_TEXT_SCALE: i32 = 5;
const OVERLAY_TEXT_SCALE: i32 = 2;
const BANNER_TEXT_SCALE: i32 = 3;

const Z_SUN: i32 = -10;
const Z_CLOUD: i32 = -9;
const Z_OVERLAY_PANEL: i32 = 99;
const Z_HUD: i32 = 100;
const Z_REMINDER: i32 = 100;
const Z_WIN_PANEL: i32 = 200;

pub(crate) const REMINDER_TEXT: &str = "COLLECT ALL COINS FIRST\nAND THEN GO TO\nTHE CROWN!";

fn rounded_rect(size: Vec2, color: [u8; 4], corner_radius: f32) -> RenderableKind {
    RenderableKind::Rect {
        size,
        color,
        corner_radius,
        outline: None,
    }
}

fn outlined_rect(
    size: Vec2,
    color: [u8; 4],
    corner_radius: f32,
    outline_width: f32,
    outline_color: [u8; 4],
) -> RenderableKind {
    RenderableKind::Rect {
        size,
        color,
        corner_radius,
        outline: Some(Outline {
            width: outline_width,
            color: outline_color,
        }),
    }
}

fn text(content: impl Into<String>, scale: i32, color: [u8; 4], align: TextAlign) -> RenderableKind {
    RenderableKind::Text {
        text: content.into(),
        scale,
        color,
        align,
    }
}

/// Full-width solid strip along the bottom edge.
pub(crate) fn spawn_ground(world: &mut SceneWorld, viewport: Viewport) -> EntityId {
    let size = Vec2::new(viewport.width_f32(), GROUND_HEIGHT);
    world.spawn(
        EntityDesc::new(
            EntityTag::Ground,
            Vec2::new(0.0, viewport.height_f32() - GROUND_HEIGHT),
            RenderableDesc::new(rounded_rect(size, GROUND_COLOR, 12.0), "ground"),
        )
        .with_collider(size)
        .with_static_body(),
    )
}

pub(crate) fn spawn_sky(world: &mut SceneWorld, viewport: Viewport) {
    world.spawn(EntityDesc::new(
        EntityTag::Decor,
        Vec2::new(viewport.width_f32() - 100.0, 100.0),
        RenderableDesc::new(
            RenderableKind::Circle {
                radius: SUN_RADIUS,
                color: SUN_COLOR,
            },
            "sun",
        )
        .with_z(Z_SUN)
        .centered(),
    ));

    let width = viewport.width_f32();
    for (x, y, scale) in [
        (120.0, 100.0, 1.0),
        (width * 0.3, 60.0, 0.8),
        (width * 0.6, 130.0, 1.2),
        (width - 200.0, 80.0, 0.9),
    ] {
        spawn_cloud(world, x, y, scale);
    }
}

fn spawn_cloud(world: &mut SceneWorld, x: f32, y: f32, scale: f32) {
    let puffs = [
        (Vec2::new(x, y), Vec2::new(80.0, 40.0), 20.0),
        (
            Vec2::new(x + 40.0 * scale, y - 10.0 * scale),
            Vec2::new(60.0, 30.0),
            15.0,
        ),
    ];
    for (position, size, radius) in puffs {
        world.spawn(EntityDesc::new(
            EntityTag::Decor,
            position,
            RenderableDesc::new(
                rounded_rect(
                    Vec2::new(size.x * scale, size.y * scale),
                    CLOUD_COLOR,
                    radius * scale,
                ),
                "cloud",
            )
            .with_z(Z_CLOUD)
            .with_opacity(0.7),
        ));
    }
}

pub(crate) fn spawn_hud(world: &mut SceneWorld, label: String) -> EntityId {
    world.spawn(EntityDesc::new(
        EntityTag::Hud,
        HUD_POSITION,
        RenderableDesc::new(text(label, HUD_TEXT_SCALE, INK_COLOR, TextAlign::Left), "score")
            .with_z(Z_HUD),
    ))
}

/// Replaces the HUD label text in place. Returns false when the HUD is gone.
pub(crate) fn set_hud_label(world: &mut SceneWorld, hud_id: EntityId, label: String) -> bool {
    let Some(entity) = world.find_entity_mut(hud_id) else {
        return false;
    };
    match &mut entity.renderable.kind {
        RenderableKind::Text { text, .. } => {
            *text = label;
            true
        }
        _ => false,
    }
}

pub(crate) fn spawn_controls_overlay(world: &mut SceneWorld, viewport: Viewport) {
    let center_x = viewport.width_f32() * 0.5;
    world.spawn(EntityDesc::new(
        EntityTag::Overlay,
        Vec2::new(center_x - 190.0, 20.0),
        RenderableDesc::new(
            outlined_rect(Vec2::new(390.0, 50.0), PANEL_COLOR, 10.0, 2.0, INK_COLOR),
            "controls_panel",
        )
        .with_z(Z_OVERLAY_PANEL)
        .with_opacity(0.7),
    ));

    for (offset, label) in [
        (-130.0, "<- MOVE LEFT"),
        (0.0, "^ JUMP / CLIMB"),
        (130.0, "-> MOVE RIGHT"),
    ] {
        world.spawn(EntityDesc::new(
            EntityTag::Overlay,
            Vec2::new(center_x + offset, 45.0),
            RenderableDesc::new(
                text(label, OVERLAY_TEXT_SCALE, INK_COLOR, TextAlign::Center),
                "controls_label",
            )
            .with_z(Z_HUD)
            .centered(),
        ));
    }
}

pub(crate) fn win_banner_text(total_coins: usize) -> String {
    format!("YOU WIN!\nALL {total_coins} COINS COLLECTED!")
}

pub(crate) fn spawn_win_banner(world: &mut SceneWorld, viewport: Viewport, total_coins: usize) {
    let center = Vec2::new(viewport.width_f32() * 0.5, viewport.height_f32() * 0.5);
    world.spawn(EntityDesc::new(
        EntityTag::Message,
        Vec2::new(center.x - 200.0, center.y - 60.0),
        RenderableDesc::new(
            outlined_rect(Vec2::new(400.0, 120.0), PANEL_COLOR, 24.0, 6.0, WIN_OUTLINE_COLOR),
            "win_panel",
        )
        .with_z(Z_WIN_PANEL),
    ));
    world.spawn(EntityDesc::new(
        EntityTag::Message,
        center,
        RenderableDesc::new(
            text(
                win_banner_text(total_coins),
                BANNER_TEXT_SCALE,
                INK_COLOR,
                TextAlign::Center,
            ),
            "win_text",
        )
        .with_z(Z_WIN_PANEL + 1)
        .centered(),
    ));
}

/// Spawns the reminder panel and text; the caller schedules their removal.
pub(crate) fn spawn_reminder(world: &mut SceneWorld, viewport: Viewport) -> Vec<EntityId> {
    let center = Vec2::new(viewport.width_f32() * 0.5, viewport.height_f32() * 0.5);
    let panel = world.spawn(EntityDesc::new(
        EntityTag::Message,
        Vec2::new(center.x - 200.0, center.y - 75.0),
        RenderableDesc::new(
            outlined_rect(
                Vec2::new(400.0, 150.0),
                PANEL_COLOR,
                16.0,
                4.0,
                REMINDER_OUTLINE_COLOR,
            ),
            "reminder_panel",
        )
        .with_z(Z_REMINDER)
        .with_opacity(0.9),
    ));
    let label = world.spawn(EntityDesc::new(
        EntityTag::Message,
        center,
        RenderableDesc::new(
            text(
                REMINDER_TEXT,
                BANNER_TEXT_SCALE,
                REMINDER_TEXT_COLOR,
                TextAlign::Center,
            ),
            "reminder_text",
        )
        .with_z(Z_REMINDER + 1)
        .centered(),
    ));
    vec![panel, label]
}
