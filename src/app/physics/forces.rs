use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use super::{LayoutEdge, LayoutNode};

const BARNES_HUT_THETA: f32 = 0.9;
const MIN_DISTANCE_SQ: f32 = 1.0;

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    /// Already multiplied by the current alpha.
    pub(super) strength: f32,
    pub(super) max_distance_sq: f32,
}

/// Deterministic direction for coincident points; opposite for swapped pairs.
fn separation_direction(a: usize, b: usize) -> Vec2 {
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * std::f32::consts::TAU;
    let direction = vec2(angle.cos(), angle.sin());
    if a < b { direction } else { -direction }
}

fn repulsion_from(delta: Vec2, mass: f32, params: RepulsionParams) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq >= params.max_distance_sq {
        return Vec2::ZERO;
    }
    if distance_sq < MIN_DISTANCE_SQ {
        distance_sq = (MIN_DISTANCE_SQ * distance_sq).sqrt().max(f32::EPSILON);
    }
    delta * (params.strength * mass / distance_sq)
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: RepulsionParams,
    velocity: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];
    if node.bounds.distance_sq_to_point(point) >= params.max_distance_sq {
        return;
    }

    if node.is_leaf() {
        for &other in &node.indices {
            if other == index {
                continue;
            }
            let mut delta = point - positions[other];
            if delta.length_sq() <= f32::EPSILON {
                delta = separation_direction(index, other);
            }
            *velocity += repulsion_from(delta, 1.0, params);
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance = delta.length().max(f32::EPSILON);
    let can_approximate = !node.bounds.contains(point)
        && (node.bounds.side_length() / distance) < BARNES_HUT_THETA;
    if can_approximate {
        *velocity += repulsion_from(delta, node.mass, params);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_repulsion_for_node(child, index, positions, params, velocity);
    }
}

/// Spring toward the rest length, split between endpoints by degree so hubs
/// move less than leaves.
pub(super) fn apply_links<'a>(
    nodes: &mut [LayoutNode],
    edges: impl IntoIterator<Item = &'a LayoutEdge>,
    rest_length: f32,
    alpha: f32,
) {
    for edge in edges {
        let (source, target) = (edge.source, edge.target);
        if source == target || source >= nodes.len() || target >= nodes.len() {
            continue;
        }

        let mut delta = (nodes[target].pos + nodes[target].velocity)
            - (nodes[source].pos + nodes[source].velocity);
        if delta.length_sq() <= f32::EPSILON {
            delta = separation_direction(source, target) * 1e-3;
        }

        let distance = delta.length();
        let stretch = (distance - rest_length) / distance * alpha * edge.strength;
        let correction = delta * stretch;

        nodes[target].velocity -= correction * edge.bias;
        nodes[source].velocity += correction * (1.0 - edge.bias);
    }
}

/// Horizontal pull toward each node's weight-class slot.
pub(super) fn apply_cluster(nodes: &mut [LayoutNode], strength: f32, alpha: f32) {
    for node in nodes {
        node.velocity.x += (node.slot_x - node.pos.x) * strength * alpha;
    }
}

/// Translates the whole set so its mean sits on `center`.
pub(super) fn apply_centering(nodes: &mut [LayoutNode], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mean = nodes.iter().fold(Vec2::ZERO, |sum, node| sum + node.pos) / nodes.len() as f32;
    let shift = center - mean;
    for node in nodes {
        node.pos += shift;
    }
}
