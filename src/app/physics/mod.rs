mod forces;
mod quadtree;

use std::collections::{HashMap, HashSet};

use eframe::egui::{Rect, Vec2, pos2, vec2};

use crate::config::LayoutConfig;
use crate::roster::{FighterId, WeightClass};
use crate::util::stable_pair;

use super::filter::WeightClassRegistry;
use forces::{
    RepulsionParams, accumulate_repulsion_for_node, apply_centering, apply_cluster, apply_links,
};
use quadtree::QuadNode;

/// Node handed to [`LayoutEngine::rebind`].
#[derive(Clone, Debug)]
pub(crate) struct NodeSeed {
    pub(crate) id: FighterId,
    pub(crate) class: WeightClass,
    pub(crate) radius: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct EdgeSeed {
    pub(crate) low: FighterId,
    pub(crate) high: FighterId,
    pub(crate) count: u32,
}

/// Neighborhood the simulation is confined to while a fighter is selected.
#[derive(Clone, Debug)]
pub(crate) struct LayoutFocus {
    /// World rectangle visible under the selection transform.
    pub(crate) bounds: Rect,
    /// Held fixed at `anchor` so the view stays centered on it.
    pub(crate) pinned: FighterId,
    pub(crate) anchor: Vec2,
    /// The pinned fighter and its opponents; everyone else is frozen outside
    /// `bounds`.
    pub(crate) members: HashSet<FighterId>,
}

/// [`LayoutFocus`] resolved against the current node indices.
struct FocusRegion {
    bounds: Rect,
    pinned: Option<usize>,
    anchor: Vec2,
    members: Vec<bool>,
}

impl FocusRegion {
    fn includes(&self, index: usize) -> bool {
        self.members.get(index).copied().unwrap_or(false)
    }
}

/// The node/edge subset the layout currently simulates.
#[derive(Clone, Debug, Default)]
pub(crate) struct ActiveSubset {
    pub(crate) nodes: Vec<NodeSeed>,
    pub(crate) edges: Vec<EdgeSeed>,
    pub(crate) classes: Vec<WeightClass>,
    /// Active node count over the full roster size, in `0..=1`.
    pub(crate) visible_fraction: f32,
}

pub(crate) struct LayoutNode {
    pub(crate) id: FighterId,
    pub(crate) class: WeightClass,
    pub(crate) pos: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) radius: f32,
    pub(crate) slot_x: f32,
}

pub(crate) struct LayoutEdge {
    pub(crate) source: usize,
    pub(crate) target: usize,
    pub(crate) count: u32,
    strength: f32,
    bias: f32,
}

struct PhysicsScratch {
    indices: Vec<usize>,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
}

pub(crate) struct LayoutEngine {
    config: LayoutConfig,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    index_by_id: HashMap<FighterId, usize>,
    neighbors: Vec<Vec<usize>>,
    classes: Vec<WeightClass>,
    viewport: Vec2,
    focus: Option<FocusRegion>,
    rest_length: f32,
    alpha: f32,
    running: bool,
    revision: u64,
    scratch: PhysicsScratch,
}

impl LayoutEngine {
    pub(crate) fn new(config: LayoutConfig, viewport: Vec2) -> Self {
        let rest_length = config.base_link_distance;
        Self {
            config,
            nodes: Vec::new(),
            edges: Vec::new(),
            index_by_id: HashMap::new(),
            neighbors: Vec::new(),
            classes: Vec::new(),
            viewport,
            focus: None,
            rest_length,
            alpha: 0.0,
            running: false,
            revision: 0,
            scratch: PhysicsScratch {
                indices: Vec::new(),
                positions: Vec::new(),
                velocities: Vec::new(),
            },
        }
    }

    pub(crate) fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub(crate) fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub(crate) fn index_of(&self, id: &FighterId) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub(crate) fn node(&self, id: &FighterId) -> Option<&LayoutNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    /// Indices of nodes sharing an active edge with `index`.
    pub(crate) fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    #[cfg(test)]
    pub(crate) fn active_classes(&self) -> &[WeightClass] {
        &self.classes
    }

    pub(crate) fn viewport(&self) -> Vec2 {
        self.viewport
    }

    #[cfg(test)]
    pub(crate) fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn rest_length(&self) -> f32 {
        self.rest_length
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    /// Center the simulation pulls toward: the canvas center, shifted below
    /// the label band.
    pub(crate) fn center(&self) -> Vec2 {
        let band = self.config.label_band.min(self.viewport.y);
        vec2(self.viewport.x * 0.5, band + (self.viewport.y - band) * 0.5)
    }

    /// Full-viewport clamp rectangle, inset by the margins and the label band.
    pub(crate) fn default_bounds(&self) -> Rect {
        let margin = self.config.margin;
        let min = pos2(margin, self.config.label_band.max(margin));
        let max = pos2(self.viewport.x - margin, self.viewport.y - margin);
        let center = self.center().to_pos2();
        Rect::from_min_max(
            pos2(min.x.min(center.x), min.y.min(center.y)),
            pos2(max.x.max(center.x), max.y.max(center.y)),
        )
    }

    pub(crate) fn bounds(&self) -> Rect {
        self.focus
            .as_ref()
            .map_or_else(|| self.default_bounds(), |focus| focus.bounds)
    }

    /// Confines the simulation to a selection neighborhood, or restores the
    /// full viewport with `None`.
    pub(crate) fn set_focus(&mut self, focus: Option<LayoutFocus>) {
        let region = focus.map(|focus| FocusRegion {
            bounds: focus.bounds,
            pinned: self.index_of(&focus.pinned),
            anchor: focus.anchor,
            members: self
                .nodes
                .iter()
                .map(|node| node.id == focus.pinned || focus.members.contains(&node.id))
                .collect(),
        });
        self.focus = region;
        self.clamp_all();
    }

    #[cfg(test)]
    pub(crate) fn is_focused(&self) -> bool {
        self.focus.is_some()
    }

    pub(crate) fn set_viewport(&mut self, viewport: Vec2) {
        if (self.viewport - viewport).length_sq() < 0.25 {
            return;
        }
        self.viewport = viewport;
        self.update_slots();
        self.clamp_all();
        self.restart(self.config.reheat_alpha);
    }

    pub(crate) fn slot_x(&self, class: WeightClass) -> Option<f32> {
        WeightClassRegistry::slot_position(class, &self.classes, self.viewport.x)
    }

    fn update_slots(&mut self) {
        let center_x = self.center().x;
        for index in 0..self.nodes.len() {
            let slot = self.slot_x(self.nodes[index].class).unwrap_or(center_x);
            self.nodes[index].slot_x = slot;
        }
    }

    fn link_rest_length(&self, visible_fraction: f32) -> f32 {
        let base = self.config.base_link_distance;
        if visible_fraction <= 0.0 {
            return base;
        }
        (base / visible_fraction.min(1.0)).min(self.config.max_link_distance.max(base))
    }

    /// Replaces the simulated subset. The previous nodes and edges are
    /// detached before anything new is bound; nodes present in both keep
    /// their positions.
    pub(crate) fn rebind(&mut self, subset: ActiveSubset) {
        self.stop();
        self.focus = None;

        let prior = std::mem::take(&mut self.nodes)
            .into_iter()
            .map(|node| (node.id, (node.pos, node.velocity)))
            .collect::<HashMap<_, _>>();
        self.edges.clear();
        self.neighbors.clear();
        self.index_by_id.clear();

        self.classes = subset.classes;
        self.rest_length = self.link_rest_length(subset.visible_fraction);
        let center = self.center();
        let spread = vec2(40.0, ((self.viewport.y - self.config.label_band) / 3.0).max(10.0));

        for (index, seed) in subset.nodes.into_iter().enumerate() {
            let slot_x = self.slot_x(seed.class).unwrap_or(center.x);
            let (pos, velocity) = prior.get(&seed.id).copied().unwrap_or_else(|| {
                let (jx, jy) = stable_pair(seed.id.as_str());
                (vec2(slot_x + jx * spread.x, center.y + jy * spread.y), Vec2::ZERO)
            });

            self.index_by_id.insert(seed.id.clone(), index);
            self.nodes.push(LayoutNode {
                id: seed.id,
                class: seed.class,
                pos,
                velocity,
                radius: seed.radius,
                slot_x,
            });
        }

        self.neighbors = vec![Vec::new(); self.nodes.len()];
        for seed in subset.edges {
            let (Some(source), Some(target)) = (self.index_of(&seed.low), self.index_of(&seed.high))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            self.neighbors[source].push(target);
            self.neighbors[target].push(source);
            self.edges.push(LayoutEdge {
                source,
                target,
                count: seed.count,
                strength: 0.0,
                bias: 0.0,
            });
        }

        for edge in &mut self.edges {
            let source_degree = self.neighbors[edge.source].len() as f32;
            let target_degree = self.neighbors[edge.target].len() as f32;
            edge.bias = source_degree / (source_degree + target_degree);
            edge.strength = 1.0 / source_degree.min(target_degree);
        }

        self.revision = self.revision.wrapping_add(1);
        self.clamp_all();
        self.restart(1.0);
        log::debug!(
            "layout rebound: {} nodes, {} edges, rest length {:.0}",
            self.nodes.len(),
            self.edges.len(),
            self.rest_length
        );
    }

    pub(crate) fn restart(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
        self.running = true;
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
    }

    /// Advances one tick. Returns `false` once the simulation has cooled or
    /// when there is nothing to simulate.
    ///
    /// While focused only the members move: the pinned node stays on its
    /// anchor, centering and the cluster pull are off, and links are kept
    /// short enough to fit the focus bounds.
    pub(crate) fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.nodes.is_empty() {
            self.running = false;
            return false;
        }

        self.alpha += (0.0 - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;
        let center = self.center();

        match &self.focus {
            None => {
                apply_links(&mut self.nodes, &self.edges, self.rest_length, alpha);
                self.apply_repulsion(alpha);
                apply_centering(&mut self.nodes, center);
                apply_cluster(&mut self.nodes, self.config.cluster_strength, alpha);
            }
            Some(focus) => {
                let rest_length = self
                    .rest_length
                    .min(focus.bounds.size().min_elem() * FOCUS_LINK_FRACTION);
                let edges = self
                    .edges
                    .iter()
                    .filter(|edge| focus.includes(edge.source) && focus.includes(edge.target));
                apply_links(&mut self.nodes, edges, rest_length, alpha);
                self.apply_repulsion(alpha);
            }
        }

        let retain = 1.0 - self.config.velocity_decay;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if self.focus.as_ref().is_some_and(|focus| !focus.includes(index)) {
                node.velocity = Vec2::ZERO;
                continue;
            }
            node.velocity *= retain;
            node.pos += node.velocity;
        }
        self.clamp_all();

        if self.alpha < self.config.alpha_min {
            self.running = false;
        }
        true
    }

    /// Barnes-Hut repulsion among the nodes currently in play.
    fn apply_repulsion(&mut self, alpha: f32) {
        let focus = self.focus.as_ref();
        let scratch = &mut self.scratch;
        scratch.indices.clear();
        scratch.indices.extend(
            (0..self.nodes.len()).filter(|&index| focus.is_none_or(|focus| focus.includes(index))),
        );
        scratch.positions.clear();
        scratch
            .positions
            .extend(scratch.indices.iter().map(|&index| self.nodes[index].pos));
        scratch.velocities.clear();
        scratch.velocities.resize(scratch.indices.len(), Vec2::ZERO);

        let Some(tree) = QuadNode::build(&scratch.positions) else {
            return;
        };
        let params = RepulsionParams {
            strength: self.config.repulsion_strength * alpha,
            max_distance_sq: self.config.repulsion_max_distance.powi(2),
        };
        for (index, velocity) in scratch.velocities.iter_mut().enumerate() {
            accumulate_repulsion_for_node(&tree, index, &scratch.positions, params, velocity);
        }
        for (&index, velocity) in scratch.indices.iter().zip(&scratch.velocities) {
            self.nodes[index].velocity += *velocity;
        }
    }

    fn clamp_all(&mut self) {
        let bounds = self.bounds();
        let Some(focus) = &self.focus else {
            for node in &mut self.nodes {
                clamp_node(node, bounds);
            }
            return;
        };

        for (index, node) in self.nodes.iter_mut().enumerate() {
            if focus.pinned == Some(index) {
                node.pos = focus.anchor;
                node.velocity = Vec2::ZERO;
            } else if focus.includes(index) {
                clamp_node(node, bounds);
            } else {
                evict_node(node, bounds);
            }
        }
    }
}

/// Share of the focus bounds' shorter side a link may span.
const FOCUS_LINK_FRACTION: f32 = 0.35;

fn clamp_node(node: &mut LayoutNode, bounds: Rect) {
    let clamped = vec2(
        node.pos.x.clamp(bounds.min.x, bounds.max.x),
        node.pos.y.clamp(bounds.min.y, bounds.max.y),
    );
    if clamped.x != node.pos.x {
        node.velocity.x = 0.0;
    }
    if clamped.y != node.pos.y {
        node.velocity.y = 0.0;
    }
    node.pos = clamped;
}

/// Moves a node that overlaps `bounds` across the nearest side, just outside.
fn evict_node(node: &mut LayoutNode, bounds: Rect) {
    node.velocity = Vec2::ZERO;
    let outer = bounds.expand(node.radius + 1.0);
    if !outer.contains(node.pos.to_pos2()) {
        return;
    }

    let pos = node.pos;
    let exits = [
        (pos.x - outer.min.x, vec2(outer.min.x, pos.y)),
        (outer.max.x - pos.x, vec2(outer.max.x, pos.y)),
        (pos.y - outer.min.y, vec2(pos.x, outer.min.y)),
        (outer.max.y - pos.y, vec2(pos.x, outer.max.y)),
    ];
    if let Some((_, exit)) = exits.into_iter().min_by(|a, b| a.0.total_cmp(&b.0)) {
        node.pos = exit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(id: &str, class: WeightClass) -> NodeSeed {
        NodeSeed {
            id: FighterId::new(id),
            class,
            radius: 5.0,
        }
    }

    fn edge(low: &str, high: &str) -> EdgeSeed {
        EdgeSeed {
            low: FighterId::new(low),
            high: FighterId::new(high),
            count: 1,
        }
    }

    fn engine() -> LayoutEngine {
        LayoutEngine::new(LayoutConfig::default(), vec2(1200.0, 800.0))
    }

    fn two_class_subset() -> ActiveSubset {
        let mut nodes = Vec::new();
        for n in 0..12 {
            nodes.push(seed(&format!("f{n}"), WeightClass::Flyweight));
            nodes.push(seed(&format!("h{n}"), WeightClass::Heavyweight));
        }
        ActiveSubset {
            nodes,
            edges: vec![edge("f0", "f1"), edge("f1", "h0"), edge("h2", "h3")],
            classes: vec![WeightClass::Flyweight, WeightClass::Heavyweight],
            visible_fraction: 1.0,
        }
    }

    fn assert_inside(engine: &LayoutEngine) {
        let bounds = engine.bounds();
        for node in engine.nodes() {
            assert!(bounds.min.x <= node.pos.x && node.pos.x <= bounds.max.x);
            assert!(bounds.min.y <= node.pos.y && node.pos.y <= bounds.max.y);
        }
    }

    #[test]
    fn test_empty_subset_is_a_noop() {
        let mut engine = engine();
        engine.rebind(ActiveSubset::default());
        assert!(!engine.step());
        assert!(!engine.is_running());
        assert!(engine.nodes().is_empty());
    }

    #[test]
    fn test_single_class_shares_one_slot() {
        let mut engine = engine();
        let nodes = (0..6)
            .map(|n| seed(&format!("l{n}"), WeightClass::Lightweight))
            .collect::<Vec<_>>();
        engine.rebind(ActiveSubset {
            nodes,
            edges: Vec::new(),
            classes: vec![WeightClass::Lightweight],
            visible_fraction: 0.5,
        });

        for _ in 0..200 {
            engine.step();
        }
        let slot = engine.slot_x(WeightClass::Lightweight).unwrap();
        assert_eq!(slot, 600.0);
        assert!(engine.nodes().iter().all(|node| node.slot_x == slot));

        // repulsion keeps them apart
        let nodes = engine.nodes();
        for a in 0..nodes.len() {
            for b in (a + 1)..nodes.len() {
                assert!((nodes[a].pos - nodes[b].pos).length() > 0.5);
            }
        }
        assert_inside(&engine);
    }

    #[test]
    fn test_clusters_order_left_to_right() {
        let mut engine = engine();
        engine.rebind(two_class_subset());
        for _ in 0..400 {
            engine.step();
        }

        let mean_x = |class: WeightClass| {
            let xs = engine
                .nodes()
                .iter()
                .filter(|node| node.class == class)
                .map(|node| node.pos.x)
                .collect::<Vec<_>>();
            xs.iter().sum::<f32>() / xs.len() as f32
        };
        assert!(mean_x(WeightClass::Flyweight) < mean_x(WeightClass::Heavyweight));
        assert!(!engine.is_running());
        assert_inside(&engine);
    }

    #[test]
    fn test_rest_length_grows_as_subset_shrinks() {
        let mut engine = engine();
        let mut subset = two_class_subset();
        engine.rebind(subset.clone());
        let full = engine.rest_length();

        subset.visible_fraction = 0.5;
        engine.rebind(subset.clone());
        let half = engine.rest_length();

        subset.visible_fraction = 0.01;
        engine.rebind(subset);
        let sparse = engine.rest_length();

        assert!(full < half);
        assert!(half <= sparse);
        assert!(sparse <= engine.config().max_link_distance);
    }

    #[test]
    fn test_rebind_keeps_surviving_positions_and_drops_stale_edges() {
        let mut engine = engine();
        engine.rebind(two_class_subset());
        for _ in 0..30 {
            engine.step();
        }
        let before = engine.node(&FighterId::new("f0")).unwrap().pos;

        let subset = ActiveSubset {
            nodes: (0..12)
                .map(|n| seed(&format!("f{n}"), WeightClass::Flyweight))
                .collect(),
            edges: vec![edge("f0", "f1"), edge("f1", "h0")],
            classes: vec![WeightClass::Flyweight],
            visible_fraction: 0.5,
        };
        engine.rebind(subset);

        assert_eq!(engine.nodes().len(), 12);
        assert_eq!(engine.edges().len(), 1);
        assert!(engine.node(&FighterId::new("h0")).is_none());
        assert_eq!(engine.node(&FighterId::new("f0")).unwrap().pos, before);
        assert!(engine.is_running());
    }

    #[test]
    fn test_focus_pins_selection_and_evicts_the_rest() {
        let mut engine = engine();
        engine.rebind(two_class_subset());
        for _ in 0..400 {
            engine.step();
        }

        let anchor = engine.node(&FighterId::new("f1")).unwrap().pos;
        let bounds = Rect::from_center_size(anchor.to_pos2(), vec2(330.0, 430.0));
        let members = ["f0", "f1", "h0"].map(FighterId::new);
        engine.set_focus(Some(LayoutFocus {
            bounds,
            pinned: FighterId::new("f1"),
            anchor,
            members: members.iter().cloned().collect(),
        }));
        engine.restart(0.3);

        for _ in 0..200 {
            engine.step();
        }
        assert_eq!(engine.bounds(), bounds);
        assert_eq!(engine.node(&FighterId::new("f1")).unwrap().pos, anchor);

        let member_positions = members
            .iter()
            .map(|id| engine.node(id).unwrap().pos)
            .collect::<Vec<_>>();
        for pos in &member_positions {
            assert!(bounds.contains(pos.to_pos2()));
        }
        // opponents spread around the anchor instead of stacking on one side
        let on_right_edge = member_positions
            .iter()
            .filter(|pos| (pos.x - bounds.max.x).abs() < 1e-3)
            .count();
        assert_eq!(on_right_edge, 0);
        assert!((member_positions[0] - member_positions[2]).length() > 1.0);

        for node in engine.nodes() {
            if !members.contains(&node.id) {
                assert!(!bounds.contains(node.pos.to_pos2()), "{} left in view", node.id);
                assert_eq!(node.velocity, Vec2::ZERO);
            }
        }

        engine.set_focus(None);
        assert_eq!(engine.bounds(), engine.default_bounds());
        assert_inside(&engine);
    }

    #[test]
    fn test_neighbors_follow_active_edges() {
        let mut engine = engine();
        engine.rebind(two_class_subset());
        let f1 = engine.index_of(&FighterId::new("f1")).unwrap();
        let mut neighbors = engine
            .neighbors(f1)
            .iter()
            .map(|&index| engine.nodes()[index].id.as_str().to_owned())
            .collect::<Vec<_>>();
        neighbors.sort();
        assert_eq!(neighbors, vec!["f0".to_owned(), "h0".to_owned()]);
    }
}
