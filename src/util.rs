use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn format_percent(ratio: f32) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Height in inches rendered as feet and inches.
pub fn format_height(inches: f32) -> String {
    let total = inches.round().max(0.0) as u32;
    format!("{}' {}\"", total / 12, total % 12)
}

/// Stable pseudo-random pair in `-1..1` derived from an identity, used to seed
/// layout positions so reloads start from the same picture.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
