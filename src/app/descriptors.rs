//! Per-frame drawing instructions produced by [`super::session::Session::frame`].
//!
//! Node, edge and fighter-label coordinates are world coordinates; the
//! surface maps them through [`ViewTransformDescriptor`]. Tooltip and class
//! labels are already in canvas space.

use eframe::egui::{Color32, Vec2, vec2};

use crate::roster::{FighterId, WeightClass};

use super::focus::{HistoryChart, ViewTransform};

#[derive(Clone, Debug)]
pub(crate) struct NodeDescriptor {
    pub(crate) id: FighterId,
    pub(crate) class: WeightClass,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) radius: f32,
    pub(crate) fill_color: Color32,
    pub(crate) opacity: f32,
    pub(crate) interactive: bool,
    pub(crate) selected: bool,
}

impl NodeDescriptor {
    pub(crate) fn pos(&self) -> Vec2 {
        vec2(self.x, self.y)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EdgeDescriptor {
    pub(crate) source_id: FighterId,
    pub(crate) target_id: FighterId,
    pub(crate) x1: f32,
    pub(crate) y1: f32,
    pub(crate) x2: f32,
    pub(crate) y2: f32,
    pub(crate) stroke_width: f32,
    pub(crate) opacity: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct LabelDescriptor {
    pub(crate) id: FighterId,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) text: String,
    pub(crate) opacity: f32,
    pub(crate) visible: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct TooltipDescriptor {
    /// Center of the tooltip box.
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) lines: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewTransformDescriptor {
    pub(crate) translate_x: f32,
    pub(crate) translate_y: f32,
    pub(crate) scale: f32,
}

impl From<ViewTransform> for ViewTransformDescriptor {
    fn from(transform: ViewTransform) -> Self {
        Self {
            translate_x: transform.translate.x,
            translate_y: transform.translate.y,
            scale: transform.scale,
        }
    }
}

impl From<ViewTransformDescriptor> for ViewTransform {
    fn from(descriptor: ViewTransformDescriptor) -> Self {
        Self {
            translate: vec2(descriptor.translate_x, descriptor.translate_y),
            scale: descriptor.scale,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ClassLabelDescriptor {
    pub(crate) class: WeightClass,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) selected: bool,
    pub(crate) population: usize,
    pub(crate) description: &'static str,
}

pub(crate) struct Frame<'a> {
    pub(crate) nodes: Vec<NodeDescriptor>,
    pub(crate) edges: Vec<EdgeDescriptor>,
    pub(crate) labels: Vec<LabelDescriptor>,
    pub(crate) tooltip: Option<TooltipDescriptor>,
    pub(crate) transform: ViewTransformDescriptor,
    pub(crate) class_labels: Vec<ClassLabelDescriptor>,
    pub(crate) chart: Option<&'a HistoryChart>,
}

impl Frame<'_> {
    pub(crate) fn selected_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.selected).count()
    }

    #[cfg(test)]
    pub(crate) fn node(&self, id: &FighterId) -> Option<&NodeDescriptor> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    #[cfg(test)]
    pub(crate) fn label(&self, id: &FighterId) -> Option<&LabelDescriptor> {
        self.labels.iter().find(|label| &label.id == id)
    }
}
