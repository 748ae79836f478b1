use std::collections::HashSet;

use crate::roster::{FighterId, Roster, WeightClass};

use super::super::physics::{ActiveSubset, EdgeSeed, NodeSeed};

pub(crate) const EDGE_STROKE_WIDTH: f32 = 2.0;

pub(crate) fn node_radius(win_percent: f32) -> f32 {
    1.0 + 10.0 * win_percent.clamp(0.0, 1.0)
}

/// Repeat matchups read stronger; the weakest edge stays faintly visible.
pub(crate) fn edge_opacity(count: u32, max_count: u32) -> f32 {
    0.05 + 0.95 * (count as f32 / max_count.max(1) as f32).min(1.0)
}

/// Fighters of the selected classes and the matchups between them.
///
/// Always derived from the immutable roster, so the same class selection
/// yields the same subset no matter what was shown before.
pub(crate) fn derive_subset(roster: &Roster, classes: &[WeightClass]) -> ActiveSubset {
    let active = classes.iter().copied().collect::<HashSet<_>>();

    let nodes = roster
        .fighters
        .values()
        .filter(|fighter| active.contains(&fighter.weight_class))
        .map(|fighter| NodeSeed {
            id: fighter.id.clone(),
            class: fighter.weight_class,
            radius: node_radius(fighter.stats.win_percent),
        })
        .collect::<Vec<_>>();

    let present = nodes.iter().map(|node| &node.id).collect::<HashSet<&FighterId>>();
    let edges = roster
        .matchups
        .iter()
        .filter(|matchup| present.contains(&matchup.low) && present.contains(&matchup.high))
        .map(|matchup| EdgeSeed {
            low: matchup.low.clone(),
            high: matchup.high.clone(),
            count: matchup.count,
        })
        .collect::<Vec<_>>();

    let visible_fraction = if roster.fighter_count() == 0 {
        0.0
    } else {
        nodes.len() as f32 / roster.fighter_count() as f32
    };

    ActiveSubset {
        nodes,
        edges,
        classes: classes.to_vec(),
        visible_fraction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{FightRecord, FighterRecord, RosterBuilder};

    fn fighter(id: &str, class: &str) -> FighterRecord {
        FighterRecord {
            id: id.to_owned(),
            name: format!("Fighter {id}"),
            weight_class: class.to_owned(),
            height: None,
            weight: None,
        }
    }

    fn bout(id1: &str, id2: &str) -> FightRecord {
        FightRecord {
            fighter1_id: id1.to_owned(),
            fighter1_name: format!("Fighter {id1}"),
            fighter2_id: id2.to_owned(),
            fighter2_name: format!("Fighter {id2}"),
            result1: "win".to_owned(),
            result2: "loss".to_owned(),
            method: None,
            round: None,
            event_day: None,
            event_month: None,
            event_year: None,
        }
    }

    fn roster() -> Roster {
        let mut builder = RosterBuilder::new();
        builder.ingest_fighters([
            fighter("a", "Flyweight"),
            fighter("b", "Flyweight"),
            fighter("c", "Heavyweight"),
            fighter("d", "Heavyweight"),
        ]);
        builder.ingest_fights([bout("a", "b"), bout("b", "c"), bout("c", "d"), bout("a", "b")]);
        builder.finish()
    }

    #[test]
    fn test_subset_keeps_only_internal_edges() {
        let roster = roster();
        let subset = derive_subset(&roster, &[WeightClass::Flyweight]);

        assert_eq!(subset.nodes.len(), 2);
        assert_eq!(subset.edges.len(), 1);
        assert_eq!(subset.edges[0].count, 2);
        assert_eq!(subset.visible_fraction, 0.5);

        let everything = derive_subset(&roster, &[WeightClass::Flyweight, WeightClass::Heavyweight]);
        assert_eq!(everything.nodes.len(), 4);
        assert_eq!(everything.edges.len(), 3);
        assert_eq!(everything.visible_fraction, 1.0);
    }

    #[test]
    fn test_no_classes_is_an_empty_subset() {
        let subset = derive_subset(&roster(), &[]);
        assert!(subset.nodes.is_empty());
        assert!(subset.edges.is_empty());
        assert_eq!(subset.visible_fraction, 0.0);
    }

    #[test]
    fn test_visual_encodings() {
        assert!((node_radius(0.6) - 7.0).abs() < 1e-5);
        assert_eq!(edge_opacity(4, 4), 1.0);
        assert!((edge_opacity(1, 4) - 0.2875).abs() < 1e-6);
        assert_eq!(edge_opacity(1, 0), 1.0);
    }
}
