use crate::app::Icon;

use super::canvas::Canvas;

const SMILEY_FACE: [u8; 4] = [255, 214, 64, 255];
const SMILEY_FEATURE: [u8; 4] = [92, 56, 20, 255];
const COIN_RIM: [u8; 4] = [204, 140, 24, 255];
const COIN_FACE: [u8; 4] = [255, 200, 48, 255];
const COIN_SHINE: [u8; 4] = [255, 240, 160, 255];
const CROWN_GOLD: [u8; 4] = [255, 196, 40, 255];
const CROWN_GEM: [u8; 4] = [220, 40, 80, 255];

/// Draws `icon` inside the `size` x `size` box whose top-left is (x, y).
pub(crate) fn draw_icon(canvas: &mut Canvas<'_>, icon: Icon, x: i32, y: i32, size: f32, opacity: f32) {
    match icon {
        Icon::Smiley => draw_smiley(canvas, x as f32, y as f32, size, opacity),
        Icon::Coin => draw_coin(canvas, x as f32, y as f32, size, opacity),
        Icon::Crown => draw_crown(canvas, x, y, size, opacity),
    }
}

fn draw_smiley(canvas: &mut Canvas<'_>, x: f32, y: f32, size: f32, opacity: f32) {
    let radius = size * 0.5;
    let cx = x + radius;
    let cy = y + radius;
    canvas.fill_circle(cx, cy, radius, SMILEY_FACE, opacity);

    let eye_radius = (size * 0.07).max(1.0);
    canvas.fill_circle(cx - radius * 0.35, cy - radius * 0.25, eye_radius, SMILEY_FEATURE, opacity);
    canvas.fill_circle(cx + radius * 0.35, cy - radius * 0.25, eye_radius, SMILEY_FEATURE, opacity);

    let outer = radius * 0.62;
    let inner = radius * 0.48;
    let box_left = (cx - outer).floor() as i32;
    let box_top = cy.floor() as i32;
    let box_size = (outer * 2.0).ceil() as i32 + 1;
    canvas.fill_where(box_left, box_top, box_size, box_size, SMILEY_FEATURE, opacity, |px, py| {
        let dx = px - cx;
        let dy = py - cy;
        let dist_sq = dx * dx + dy * dy;
        dy > radius * 0.1 && dist_sq <= outer * outer && dist_sq >= inner * inner
    });
}

fn draw_coin(canvas: &mut Canvas<'_>, x: f32, y: f32, size: f32, opacity: f32) {
    let radius = size * 0.5;
    let cx = x + radius;
    let cy = y + radius;
    canvas.fill_circle(cx, cy, radius, COIN_RIM, opacity);
    canvas.fill_circle(cx, cy, radius * 0.78, COIN_FACE, opacity);
    canvas.fill_circle(cx - radius * 0.25, cy - radius * 0.25, radius * 0.2, COIN_SHINE, opacity);
}

/// Three-point crown: a solid band with spikes whose tips sit at 1/6, 1/2 and 5/6 of the width.
fn draw_crown(canvas: &mut Canvas<'_>, x: i32, y: i32, size: f32, opacity: f32) {
    let left = x as f32;
    let top = y as f32;
    let tip_y = top + size * 0.15;
    let band_top = top + size * 0.6;
    let bottom = top + size * 0.85;
    let spacing = size / 3.0;
    let span = size.ceil() as i32;

    canvas.fill_where(x, y, span, span, CROWN_GOLD, opacity, |px, py| {
        if py > bottom || px < left || px > left + size {
            return false;
        }
        if py >= band_top {
            return true;
        }
        let local = (px - left) / spacing;
        let offset_from_tip = (local.fract() - 0.5).abs() * 2.0;
        let spike_top = tip_y + (band_top - tip_y) * offset_from_tip;
        py >= spike_top
    });

    let gem_radius = (size * 0.06).max(1.0);
    for index in 0..3 {
        let gem_x = left + spacing * (index as f32 + 0.5);
        canvas.fill_circle(gem_x, tip_y, gem_radius, CROWN_GEM, opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKY: [u8; 4] = [10, 20, 30, 255];

    fn render(icon: Icon, size: u32) -> Vec<u8> {
        let mut buffer = vec![0; (size * size * 4) as usize];
        let mut canvas = Canvas::new(&mut buffer, size, size);
        canvas.clear(SKY);
        draw_icon(&mut canvas, icon, 0, 0, size as f32, 1.0);
        buffer
    }

    fn pixel(buffer: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * size + x) * 4) as usize;
        [
            buffer[offset],
            buffer[offset + 1],
            buffer[offset + 2],
            buffer[offset + 3],
        ]
    }

    #[test]
    fn coin_center_is_face_color_and_corner_is_background() {
        let buffer = render(Icon::Coin, 32);
        assert_eq!(pixel(&buffer, 32, 20, 20), COIN_FACE);
        assert_eq!(pixel(&buffer, 32, 0, 0), SKY);
    }

    #[test]
    fn crown_band_is_solid_and_gap_between_spikes_is_clear() {
        let buffer = render(Icon::Crown, 30);
        assert_eq!(pixel(&buffer, 30, 15, 22), CROWN_GOLD);
        assert_eq!(pixel(&buffer, 30, 10, 6), SKY);
    }

    #[test]
    fn smiley_eyes_use_feature_color() {
        let buffer = render(Icon::Smiley, 40);
        assert_eq!(pixel(&buffer, 40, 13, 15), SMILEY_FEATURE);
        assert_eq!(pixel(&buffer, 40, 20, 8), SMILEY_FACE);
    }
}
