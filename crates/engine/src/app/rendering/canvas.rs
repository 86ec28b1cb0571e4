use super::font::{glyph_advance, glyph_for, line_advance, Glyph, GLYPH_WIDTH};

/// Clipped drawing over an RGBA8 frame. Every primitive takes an opacity in
/// `[0, 1]` and alpha-blends over what is already in the frame.
pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(out)
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize).checked_mul(4)?;
        (offset + 4 <= self.frame.len()).then_some(offset)
    }

    pub(crate) fn blend_pixel(&mut self, x: i32, y: i32, color: [u8; 4], opacity: f32) {
        let Some(offset) = self.offset(x, y) else {
            return;
        };
        let alpha = (color[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = &mut self.frame[offset..offset + 4];
        for channel in 0..3 {
            let blended = color[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
            dst[channel] = blended.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = 255;
    }

    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4], opacity: f32) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = (x + w).min(self.width as i32);
        let end_y = (y + h).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                self.blend_pixel(px, py, color, opacity);
            }
        }
    }

    /// Filled rounded rectangle; `radius` is clamped to half the short side.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn fill_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        radius: f32,
        color: [u8; 4],
        opacity: f32,
    ) {
        let shape = RoundedRect::new(x as f32, y as f32, w as f32, h as f32, radius);
        self.fill_where(x, y, w, h, color, opacity, |px, py| shape.contains(px, py));
    }

    /// Ring of `stroke` pixels drawn inside the rounded rectangle edge.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn stroke_rounded_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        radius: f32,
        stroke: f32,
        color: [u8; 4],
        opacity: f32,
    ) {
        if stroke <= 0.0 {
            return;
        }
        let outer = RoundedRect::new(x as f32, y as f32, w as f32, h as f32, radius);
        let inner = RoundedRect::new(
            x as f32 + stroke,
            y as f32 + stroke,
            w as f32 - 2.0 * stroke,
            h as f32 - 2.0 * stroke,
            (radius - stroke).max(0.0),
        );
        self.fill_where(x, y, w, h, color, opacity, |px, py| {
            outer.contains(px, py) && !inner.contains(px, py)
        });
    }

    pub(crate) fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: [u8; 4], opacity: f32) {
        let left = (cx - radius).floor() as i32;
        let top = (cy - radius).floor() as i32;
        let size = (radius * 2.0).ceil() as i32 + 1;
        let radius_sq = radius * radius;
        self.fill_where(left, top, size, size, color, opacity, |px, py| {
            let dx = px - cx;
            let dy = py - cy;
            dx * dx + dy * dy <= radius_sq
        });
    }

    /// Blends every pixel in the box whose center satisfies `inside`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn fill_where(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: [u8; 4],
        opacity: f32,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        let start_x = x.max(0);
        let start_y = y.max(0);
        let end_x = (x + w).min(self.width as i32);
        let end_y = (y + h).min(self.height as i32);
        for py in start_y..end_y {
            for px in start_x..end_x {
                if inside(px as f32 + 0.5, py as f32 + 0.5) {
                    self.blend_pixel(px, py, color, opacity);
                }
            }
        }
    }

    /// Draws `text` with its block's top-left at (x, y). With `centered`, each
    /// line is centered on the block width instead of left-aligned.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        scale: i32,
        color: [u8; 4],
        opacity: f32,
        centered: bool,
    ) {
        let scale = scale.max(1);
        let block_width = text
            .split('\n')
            .map(|line| line.chars().count() as i32)
            .max()
            .unwrap_or(0)
            * glyph_advance(scale);
        for (line_index, line) in text.split('\n').enumerate() {
            let line_width = line.chars().count() as i32 * glyph_advance(scale);
            let mut cursor_x = if centered {
                x + (block_width - line_width) / 2
            } else {
                x
            };
            let cursor_y = y + line_index as i32 * line_advance(scale);
            for ch in line.chars() {
                self.draw_glyph(cursor_x, cursor_y, glyph_for(ch), scale, color, opacity);
                cursor_x += glyph_advance(scale);
            }
        }
    }

    fn draw_glyph(
        &mut self,
        x: i32,
        y: i32,
        glyph: Glyph,
        scale: i32,
        color: [u8; 4],
        opacity: f32,
    ) {
        for (row_index, row_bits) in glyph.rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if i32::from(*row_bits) & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                self.fill_rect(
                    x + col * scale,
                    y + row_index as i32 * scale,
                    scale,
                    scale,
                    color,
                    opacity,
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RoundedRect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    radius: f32,
}

impl RoundedRect {
    fn new(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Self {
        let max_radius = (w.min(h) * 0.5).max(0.0);
        Self {
            left: x,
            top: y,
            right: x + w,
            bottom: y + h,
            radius: radius.clamp(0.0, max_radius),
        }
    }

    fn contains(&self, px: f32, py: f32) -> bool {
        if px < self.left || px > self.right || py < self.top || py > self.bottom {
            return false;
        }
        let r = self.radius;
        if r <= 0.0 {
            return true;
        }
        let dx = (self.left + r - px).max(px - (self.right - r)).max(0.0);
        let dy = (self.top + r - py).max(py - (self.bottom - r)).max(0.0);
        dx * dx + dy * dy <= r * r
    }
}
