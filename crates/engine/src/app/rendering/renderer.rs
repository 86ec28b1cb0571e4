use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{Anchor, Entity, RenderableKind, SceneWorld, TextAlign, Vec2, Viewport};

use super::canvas::Canvas;
use super::font::text_size;
use super::icons::draw_icon;

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    clear_color: [u8; 4],
    draw_order: Vec<usize>,
}

impl Renderer {
    pub fn new(window: Arc<Window>, clear_color: [u8; 4]) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport::new(size.width, size.height),
            clear_color,
            draw_order: Vec::new(),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport::new(width, height);
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    pub fn render_world(&mut self, world: &SceneWorld) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let Viewport { width, height } = self.viewport;
        let frame = self.pixels.frame_mut();
        let mut canvas = Canvas::new(frame, width, height);
        draw_world(&mut canvas, world, self.clear_color, &mut self.draw_order);
        self.pixels.render()
    }
}

pub(crate) fn draw_world(
    canvas: &mut Canvas<'_>,
    world: &SceneWorld,
    clear_color: [u8; 4],
    draw_order: &mut Vec<usize>,
) {
    canvas.clear(clear_color);
    collect_draw_order(world.entities(), draw_order);
    for &index in draw_order.iter() {
        draw_entity(canvas, &world.entities()[index]);
    }
}

/// Back-to-front: ascending z, then spawn order, so later spawns paint over
/// earlier ones on the same layer.
fn collect_draw_order(entities: &[Entity], out: &mut Vec<usize>) {
    out.clear();
    out.extend(0..entities.len());
    out.sort_by_key(|&index| {
        let entity = &entities[index];
        (entity.renderable.z, entity.applied_spawn_order())
    });
}

fn intrinsic_size(kind: &RenderableKind) -> Vec2 {
    match kind {
        RenderableKind::Rect { size, .. } => *size,
        RenderableKind::Circle { radius, .. } => Vec2::new(radius * 2.0, radius * 2.0),
        RenderableKind::Text { text, scale, .. } => {
            let (w, h) = text_size(text, *scale);
            Vec2::new(w as f32, h as f32)
        }
        RenderableKind::Icon { size, .. } => Vec2::new(*size, *size),
    }
}

fn top_left(entity: &Entity) -> (i32, i32) {
    let position = entity.transform.position;
    let (x, y) = match entity.renderable.anchor {
        Anchor::TopLeft => (position.x, position.y),
        Anchor::Center => {
            let size = intrinsic_size(&entity.renderable.kind);
            (position.x - size.x * 0.5, position.y - size.y * 0.5)
        }
    };
    (x.round() as i32, y.round() as i32)
}

fn draw_entity(canvas: &mut Canvas<'_>, entity: &Entity) {
    let opacity = entity.renderable.opacity;
    let (x, y) = top_left(entity);
    match &entity.renderable.kind {
        RenderableKind::Rect {
            size,
            color,
            corner_radius,
            outline,
        } => {
            let w = size.x.round() as i32;
            let h = size.y.round() as i32;
            canvas.fill_rounded_rect(x, y, w, h, *corner_radius, *color, opacity);
            if let Some(outline) = outline {
                canvas.stroke_rounded_rect(
                    x,
                    y,
                    w,
                    h,
                    *corner_radius,
                    outline.width,
                    outline.color,
                    opacity,
                );
            }
        }
        RenderableKind::Circle { radius, color } => {
            canvas.fill_circle(
                x as f32 + radius,
                y as f32 + radius,
                *radius,
                *color,
                opacity,
            );
        }
        RenderableKind::Text {
            text,
            scale,
            color,
            align,
        } => {
            canvas.draw_text(
                x,
                y,
                text,
                *scale,
                *color,
                opacity,
                *align == TextAlign::Center,
            );
        }
        RenderableKind::Icon { icon, size } => {
            draw_icon(canvas, *icon, x, y, *size, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{EntityDesc, EntityTag, RenderableDesc};

    const SKY: [u8; 4] = [173, 216, 230, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn rect(color: [u8; 4], size: f32) -> RenderableKind {
        RenderableKind::Rect {
            size: Vec2::new(size, size),
            color,
            corner_radius: 0.0,
            outline: None,
        }
    }

    fn render(world: &SceneWorld) -> Vec<u8> {
        let viewport = world.viewport();
        let mut buffer = vec![0; (viewport.width * viewport.height * 4) as usize];
        let mut canvas = Canvas::new(&mut buffer, viewport.width, viewport.height);
        let mut order = Vec::new();
        draw_world(&mut canvas, world, SKY, &mut order);
        buffer
    }

    fn pixel(buffer: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            buffer[offset],
            buffer[offset + 1],
            buffer[offset + 2],
            buffer[offset + 3],
        ]
    }

    #[test]
    fn higher_z_paints_over_lower_z_regardless_of_spawn_order() {
        let mut world = SceneWorld::new(Viewport::new(16, 16));
        world.spawn(EntityDesc::new(
            EntityTag::Decor,
            Vec2::ZERO,
            RenderableDesc::new(rect(RED, 8.0), "front").with_z(5),
        ));
        world.spawn(EntityDesc::new(
            EntityTag::Decor,
            Vec2::ZERO,
            RenderableDesc::new(rect(BLUE, 8.0), "back").with_z(-5),
        ));
        world.apply_pending();

        let buffer = render(&world);
        assert_eq!(pixel(&buffer, 16, 4, 4), RED);
        assert_eq!(pixel(&buffer, 16, 12, 12), SKY);
    }

    #[test]
    fn centered_anchor_offsets_by_half_size() {
        let mut world = SceneWorld::new(Viewport::new(16, 16));
        world.spawn(EntityDesc::new(
            EntityTag::Decor,
            Vec2::new(8.0, 8.0),
            RenderableDesc::new(rect(RED, 4.0), "centered").centered(),
        ));
        world.apply_pending();

        let buffer = render(&world);
        assert_eq!(pixel(&buffer, 16, 6, 6), RED);
        assert_eq!(pixel(&buffer, 16, 9, 9), RED);
        assert_eq!(pixel(&buffer, 16, 10, 10), SKY);
    }

    #[test]
    fn draw_order_is_stable_for_equal_z() {
        let mut world = SceneWorld::new(Viewport::new(8, 8));
        for color in [BLUE, RED] {
            world.spawn(EntityDesc::new(
                EntityTag::Decor,
                Vec2::ZERO,
                RenderableDesc::new(rect(color, 8.0), "layer"),
            ));
        }
        world.apply_pending();

        let buffer = render(&world);
        assert_eq!(pixel(&buffer, 8, 3, 3), RED);
    }
}
