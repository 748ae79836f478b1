use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use super::focus::ViewTransform;

/// Categorical palette indexed by weight-class rank.
const CLASS_PALETTE: [Color32; 11] = [
    Color32::from_rgb(0x1f, 0x77, 0xb4),
    Color32::from_rgb(0xae, 0xc7, 0xe8),
    Color32::from_rgb(0xff, 0x7f, 0x0e),
    Color32::from_rgb(0xff, 0xbb, 0x78),
    Color32::from_rgb(0x2c, 0xa0, 0x2c),
    Color32::from_rgb(0x98, 0xdf, 0x8a),
    Color32::from_rgb(0xd6, 0x27, 0x28),
    Color32::from_rgb(0xff, 0x98, 0x96),
    Color32::from_rgb(0x94, 0x67, 0xbd),
    Color32::from_rgb(0xc5, 0xb0, 0xd5),
    Color32::from_rgb(0x8c, 0x56, 0x4b),
];

pub(super) const INACTIVE_LABEL: Color32 = Color32::from_gray(0xaa);

pub(super) fn class_color(rank: usize) -> Color32 {
    CLASS_PALETTE[rank % CLASS_PALETTE.len()]
}

/// Scales the alpha channel; `opacity` is clamped to `0..=1`.
pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let opacity = opacity.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * opacity) as u8,
    )
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, band: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(250, 250, 248));
    let band_bottom = rect.top() + band;
    painter.line_segment(
        [Pos2::new(rect.left(), band_bottom), Pos2::new(rect.right(), band_bottom)],
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 40)),
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Canvas-local world coordinates to screen, through the view transform.
pub(super) fn world_to_screen(rect: Rect, transform: ViewTransform, world: Vec2) -> Pos2 {
    rect.min + transform.apply(world)
}
