use eframe::egui::{Vec2, vec2};

use crate::roster::Fighter;
use crate::util::{format_height, format_percent};

const TOOLTIP_GAP: f32 = 12.0;

/// Direction pointing away from the fighter's visible opponents.
///
/// Sums the unit vectors toward each opponent, negates and renormalizes.
/// Falls back to straight up when there are no opponents or they cancel out.
pub(crate) fn tooltip_direction(origin: Vec2, opponents: impl IntoIterator<Item = Vec2>) -> Vec2 {
    let sum = opponents
        .into_iter()
        .map(|opponent| opponent - origin)
        .filter(|delta| delta.length_sq() > f32::EPSILON)
        .fold(Vec2::ZERO, |sum, delta| sum + delta.normalized());

    if sum.length_sq() <= 1e-6 {
        return vec2(0.0, -1.0);
    }
    -sum.normalized()
}

/// Center of the tooltip box, pushed far enough along `direction` that the
/// box clears the node.
pub(crate) fn tooltip_anchor(origin: Vec2, direction: Vec2, size: Vec2, node_radius: f32) -> Vec2 {
    let half_extent = 0.5 * (direction.x.abs() * size.x + direction.y.abs() * size.y);
    origin + direction * (half_extent + node_radius + TOOLTIP_GAP)
}

/// `opponents` counts only fighters still on the roster.
pub(crate) fn tooltip_lines(fighter: &Fighter, opponents: usize) -> Vec<String> {
    let mut lines = vec![
        fighter.name.clone(),
        fighter.weight_class.name().to_owned(),
        format!(
            "{}  ({} wins)",
            fighter.stats.record(),
            format_percent(fighter.stats.win_percent)
        ),
        format!("{opponents} opponents"),
    ];

    let body = match (fighter.height, fighter.weight) {
        (Some(height), Some(weight)) => Some(format!("{}, {weight:.0} lb", format_height(height))),
        (Some(height), None) => Some(format_height(height)),
        (None, Some(weight)) => Some(format!("{weight:.0} lb")),
        (None, None) => None,
    };
    lines.extend(body);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_points_away_from_opponents() {
        let origin = vec2(100.0, 100.0);
        let direction = tooltip_direction(origin, [vec2(200.0, 100.0), vec2(100.0, 200.0)]);
        assert!(direction.x < 0.0 && direction.y < 0.0);
        assert!((direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_direction_defaults_up_when_balanced() {
        let origin = vec2(0.0, 0.0);
        assert_eq!(tooltip_direction(origin, []), vec2(0.0, -1.0));
        assert_eq!(
            tooltip_direction(origin, [vec2(-5.0, 0.0), vec2(5.0, 0.0)]),
            vec2(0.0, -1.0)
        );
    }

    #[test]
    fn test_anchor_offset_scales_with_box_size() {
        let origin = vec2(0.0, 0.0);
        let left = tooltip_anchor(origin, vec2(-1.0, 0.0), vec2(180.0, 84.0), 5.0);
        let up = tooltip_anchor(origin, vec2(0.0, -1.0), vec2(180.0, 84.0), 5.0);
        assert_eq!(left, vec2(-(90.0 + 5.0 + TOOLTIP_GAP), 0.0));
        assert_eq!(up, vec2(0.0, -(42.0 + 5.0 + TOOLTIP_GAP)));
    }
}
