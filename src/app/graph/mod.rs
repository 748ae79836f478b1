mod build;
mod interaction;
mod view;

pub(crate) use build::{EDGE_STROKE_WIDTH, derive_subset, edge_opacity};
pub(crate) use interaction::PointerTracker;
