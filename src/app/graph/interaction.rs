use eframe::egui::{Pos2, Rect};

use crate::roster::FighterId;

use super::super::descriptors::NodeDescriptor;
use super::super::focus::ViewTransform;
use super::super::render_utils::{circle_visible, world_to_screen};
use super::super::session::PointerEvent;

/// Small nodes stay clickable.
const MIN_HIT_RADIUS: f32 = 4.0;

/// Turns the per-frame hovered node into enter/leave events.
#[derive(Debug, Default)]
pub(crate) struct PointerTracker {
    hovered: Option<FighterId>,
}

impl PointerTracker {
    /// Leave for the previous target always precedes enter for the next.
    pub(crate) fn update(&mut self, hit: Option<FighterId>) -> Vec<PointerEvent> {
        if self.hovered == hit {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(previous) = self.hovered.take() {
            events.push(PointerEvent::Leave(previous));
        }
        if let Some(next) = hit {
            self.hovered = Some(next.clone());
            events.push(PointerEvent::Enter(next));
        }
        events
    }

    pub(crate) fn hovered(&self) -> Option<&FighterId> {
        self.hovered.as_ref()
    }

    /// Drops the remembered node without emitting a leave.
    pub(crate) fn forget(&mut self) {
        self.hovered = None;
    }
}

/// Closest interactive node under `pointer`, in screen space.
pub(crate) fn hit_test<'a>(
    nodes: &'a [NodeDescriptor],
    rect: Rect,
    transform: ViewTransform,
    pointer: Pos2,
) -> Option<&'a NodeDescriptor> {
    nodes
        .iter()
        .filter(|node| node.interactive && node.opacity > 0.0)
        .filter_map(|node| {
            let position = world_to_screen(rect, transform, node.pos());
            let radius = (node.radius * transform.scale).max(MIN_HIT_RADIUS);
            if !circle_visible(rect, position, radius) {
                return None;
            }
            let distance = position.distance(pointer);
            (distance <= radius).then_some((node, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(node, _)| node)
}
