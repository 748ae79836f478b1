mod chart;
mod tooltip;
mod transform;

use std::collections::HashSet;

use eframe::egui::Vec2;

use crate::roster::FighterId;

pub(crate) use chart::HistoryChart;
pub(crate) use tooltip::{tooltip_anchor, tooltip_direction, tooltip_lines};
pub(crate) use transform::{TransformState, ViewTransform};

/// The single interaction mode of the canvas.
///
/// Visual directives are derived from this value every frame, so leaving a
/// mode clears its side effects by construction.
#[derive(Clone, Debug, Default)]
pub(crate) enum Focus {
    #[default]
    Idle,
    Hovering {
        fighter: FighterId,
        /// Fixed when the pointer enters; the anchor follows the node.
        tooltip_direction: Vec2,
    },
    Selected {
        fighter: FighterId,
        /// The selected fighter and its visible opponents.
        interactive: HashSet<FighterId>,
        chart: Option<HistoryChart>,
    },
}

impl Focus {
    pub(crate) fn fighter(&self) -> Option<&FighterId> {
        match self {
            Self::Idle => None,
            Self::Hovering { fighter, .. } | Self::Selected { fighter, .. } => Some(fighter),
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub(crate) fn is_selected(&self) -> bool {
        matches!(self, Self::Selected { .. })
    }

    pub(crate) fn is_hovering(&self, id: &FighterId) -> bool {
        matches!(self, Self::Hovering { fighter, .. } if fighter == id)
    }

    pub(crate) fn accepts_hover(&self) -> bool {
        !self.is_selected()
    }

    /// Nodes outside the selection neighborhood ignore the pointer.
    pub(crate) fn is_interactive(&self, id: &FighterId) -> bool {
        match self {
            Self::Selected { interactive, .. } => interactive.contains(id),
            _ => true,
        }
    }

    pub(crate) fn chart(&self) -> Option<&HistoryChart> {
        match self {
            Self::Selected { chart, .. } => chart.as_ref(),
            _ => None,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Hovering { .. } => "hovering",
            Self::Selected { .. } => "selected",
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn test_selected_limits_interaction_and_hover() {
        let fighter = FighterId::new("7");
        let interactive = [FighterId::new("7"), FighterId::new("8")]
            .into_iter()
            .collect::<HashSet<_>>();
        let focus = Focus::Selected {
            fighter: fighter.clone(),
            interactive,
            chart: None,
        };

        assert!(!focus.accepts_hover());
        assert!(focus.is_interactive(&FighterId::new("8")));
        assert!(!focus.is_interactive(&FighterId::new("9")));
        assert_eq!(focus.fighter(), Some(&fighter));
    }

    #[test]
    fn test_hovering_matches_only_its_fighter() {
        let focus = Focus::Hovering {
            fighter: FighterId::new("3"),
            tooltip_direction: vec2(0.0, -1.0),
        };
        assert!(focus.is_hovering(&FighterId::new("3")));
        assert!(!focus.is_hovering(&FighterId::new("4")));
        assert!(focus.is_interactive(&FighterId::new("4")));
        assert!(Focus::default().is_idle());
    }
}
