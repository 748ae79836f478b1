use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{Rect, Vec2, pos2, vec2};

use crate::config::Settings;
use crate::roster::{FighterId, Roster, WeightClass};

use super::descriptors::{
    ClassLabelDescriptor, EdgeDescriptor, Frame, LabelDescriptor, NodeDescriptor, TooltipDescriptor,
};
use super::filter::WeightClassRegistry;
use super::focus::{
    Focus, HistoryChart, TransformState, ViewTransform, tooltip_anchor, tooltip_direction,
    tooltip_lines,
};
use super::graph::{EDGE_STROKE_WIDTH, derive_subset, edge_opacity};
use super::physics::{LayoutEngine, LayoutFocus};
use super::render_utils::class_color;

const LABEL_GAP: f32 = 4.0;

/// Pointer input from the surface, already bound to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PointerEvent {
    Enter(FighterId),
    Leave(FighterId),
    Click(FighterId),
    ClassClick(WeightClass),
    Exit,
}

impl PointerEvent {
    /// Events that return the canvas to Idle once accepted; the surface must
    /// forget its hovered node so a resting pointer enters again.
    pub(crate) fn resets_hover(&self) -> bool {
        matches!(self, Self::Exit | Self::ClassClick(_))
    }
}

/// Everything about the view that changes after the roster is built.
#[derive(Clone, Debug)]
pub(crate) struct ViewState {
    pub(crate) classes: WeightClassRegistry,
    pub(crate) focus: Focus,
    pub(crate) transform: TransformState,
}

pub(crate) struct Session {
    roster: Arc<Roster>,
    settings: Settings,
    state: ViewState,
    layout: LayoutEngine,
    idle_labels: HashSet<FighterId>,
}

impl Session {
    pub(crate) fn new(roster: Arc<Roster>, settings: Settings, viewport: Vec2) -> Self {
        let mut classes = WeightClassRegistry::from_populations(&roster.populations);
        classes.recompute_population(&roster);
        let layout = LayoutEngine::new(settings.layout.clone(), viewport);

        let mut session = Self {
            roster,
            settings,
            state: ViewState {
                classes,
                focus: Focus::Idle,
                transform: TransformState::default(),
            },
            layout,
            idle_labels: HashSet::new(),
        };
        session.rebuild();
        session
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn roster(&self) -> &Roster {
        &self.roster
    }

    pub(crate) fn classes(&self) -> &WeightClassRegistry {
        &self.state.classes
    }

    pub(crate) fn focus(&self) -> &Focus {
        &self.state.focus
    }

    pub(crate) fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Derives the active subset from the class selection and rebinds the
    /// layout to it.
    pub(crate) fn rebuild(&mut self) {
        let selected = self.state.classes.selected_classes();
        let subset = derive_subset(&self.roster, &selected);
        self.layout.rebind(subset);

        let per_class = self.settings.focus.labels_per_class;
        self.idle_labels = selected
            .iter()
            .flat_map(|class| self.roster.top_in_class(*class, per_class))
            .cloned()
            .collect();
    }

    /// Applies one pointer event. Returns `true` when the view changed.
    pub(crate) fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Enter(id) => self.enter(id),
            PointerEvent::Leave(id) => self.leave(&id),
            PointerEvent::Click(id) => self.click(id),
            PointerEvent::ClassClick(class) => self.toggle_class(class),
            PointerEvent::Exit => self.exit(),
        }
    }

    fn enter(&mut self, id: FighterId) -> bool {
        if !self.state.focus.accepts_hover() || self.state.focus.is_hovering(&id) {
            return false;
        }
        let Some(index) = self.layout.index_of(&id) else {
            return false;
        };

        let origin = self.layout.nodes()[index].pos;
        let opponents = self
            .layout
            .neighbors(index)
            .iter()
            .map(|&neighbor| self.layout.nodes()[neighbor].pos);
        let direction = tooltip_direction(origin, opponents);

        self.state.focus = Focus::Hovering {
            fighter: id,
            tooltip_direction: direction,
        };
        true
    }

    fn leave(&mut self, id: &FighterId) -> bool {
        if !self.state.focus.is_hovering(id) {
            return false;
        }
        self.state.focus = Focus::Idle;
        true
    }

    fn click(&mut self, id: FighterId) -> bool {
        if self.layout.index_of(&id).is_none() {
            return false;
        }
        if !self.state.focus.is_interactive(&id) {
            log::debug!("ignoring click on inert fighter {id}");
            return false;
        }
        if self.state.focus.is_selected() && self.state.focus.fighter() == Some(&id) {
            return false;
        }
        self.select(id);
        true
    }

    fn select(&mut self, id: FighterId) {
        let Some(index) = self.layout.index_of(&id) else {
            return;
        };

        let mut interactive = self
            .layout
            .neighbors(index)
            .iter()
            .map(|&neighbor| self.layout.nodes()[neighbor].id.clone())
            .collect::<HashSet<_>>();
        interactive.insert(id.clone());
        let chart = self.roster.fighter(&id).and_then(HistoryChart::for_fighter);

        if let Some(fighter) = self.roster.fighter(&id) {
            log::info!("selected {} ({id})", fighter.name);
        }
        self.state.focus = Focus::Selected {
            fighter: id.clone(),
            interactive,
            chart,
        };

        let target = self.selection_transform(&id);
        self.begin_transition(target);
    }

    fn exit(&mut self) -> bool {
        if !self.state.focus.is_selected() {
            return false;
        }
        if self.state.transform.is_animating() {
            log::debug!("exit ignored while the view is still moving");
            return false;
        }

        self.state.focus = Focus::Idle;
        self.layout.set_focus(None);
        self.begin_transition(ViewTransform::IDENTITY);
        true
    }

    fn toggle_class(&mut self, class: WeightClass) -> bool {
        if !self.state.classes.toggle(class) {
            return false;
        }

        if !self.state.focus.is_idle() {
            log::debug!("leaving {} focus for class change", self.state.focus.name());
        }
        self.state.focus = Focus::Idle;
        self.state.transform.reset();
        self.layout.set_focus(None);
        self.rebuild();
        true
    }

    /// Starts a view transition. The layout pauses until it completes; a
    /// request made while another transition runs is dropped.
    fn begin_transition(&mut self, target: ViewTransform) {
        let duration = self.settings.focus.transition_secs;
        if !self.state.transform.request(target, duration) {
            return;
        }
        if self.state.transform.is_animating() {
            self.layout.stop();
        } else {
            self.finish_transition();
        }
    }

    /// Confines the layout to the selection neighborhood, or releases it,
    /// then reheats.
    fn finish_transition(&mut self) {
        let focus = match &self.state.focus {
            Focus::Selected {
                fighter,
                interactive,
                ..
            } => {
                let target = self.state.transform.target();
                Some(LayoutFocus {
                    bounds: target.invert_rect(self.selection_region()),
                    pinned: fighter.clone(),
                    anchor: target.invert(self.selection_anchor()),
                    members: interactive.clone(),
                })
            }
            _ => None,
        };
        self.layout.set_focus(focus);
        self.layout.restart(self.settings.layout.reheat_alpha);
    }

    /// Advances the view transition. Returns `true` while it is still running.
    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        if self.state.transform.advance(dt) {
            self.finish_transition();
        }
        self.state.transform.is_animating()
    }

    /// One simulation tick; paused while the view is moving.
    pub(crate) fn step_layout(&mut self) -> bool {
        if self.state.transform.is_animating() {
            return false;
        }
        self.layout.step()
    }

    pub(crate) fn set_viewport(&mut self, width: f32, height: f32) {
        let viewport = vec2(width.max(1.0), height.max(1.0));
        if (self.layout.viewport() - viewport).length_sq() < 0.25 {
            return;
        }
        self.layout.set_viewport(viewport);

        if let Focus::Selected { fighter, .. } = &self.state.focus
            && !self.state.transform.is_animating()
        {
            let target = self.selection_transform(fighter);
            self.state.transform.reset();
            self.state.transform.request(target, 0.0);
            self.finish_transition();
        }
    }

    /// Screen point the selected fighter is centered on: middle of the left
    /// half, below the label band.
    fn selection_anchor(&self) -> Vec2 {
        let viewport = self.layout.viewport();
        let band = self.settings.layout.label_band.min(viewport.y);
        vec2(viewport.x * 0.25, band + (viewport.y - band) * 0.5)
    }

    /// Screen area the network keeps while a fighter is selected.
    fn selection_region(&self) -> Rect {
        let viewport = self.layout.viewport();
        let band = self.settings.layout.label_band.min(viewport.y);
        let margin = self.settings.layout.margin;
        let anchor = self.selection_anchor();
        Rect::from_min_max(
            pos2(margin.min(anchor.x), band.min(anchor.y)),
            pos2((viewport.x * 0.5 - margin).max(anchor.x), (viewport.y - margin).max(anchor.y)),
        )
    }

    fn selection_transform(&self, id: &FighterId) -> ViewTransform {
        let world = self
            .layout
            .node(id)
            .map_or_else(|| self.layout.center(), |node| node.pos);
        ViewTransform::centering(world, self.selection_anchor(), self.settings.focus.selection_scale)
    }

    /// Canvas area the history chart is drawn into while a fighter is selected.
    pub(crate) fn chart_area(&self) -> Rect {
        let viewport = self.layout.viewport();
        let band = self.settings.layout.label_band.min(viewport.y);
        let margin = self.settings.layout.margin;
        Rect::from_min_max(
            pos2(viewport.x * 0.5 + margin, band + margin),
            pos2(
                (viewport.x - margin).max(viewport.x * 0.5 + margin),
                (viewport.y - margin).max(band + margin),
            ),
        )
    }

    pub(crate) fn frame(&self) -> Frame<'_> {
        let focus = &self.state.focus;
        let faded = self.settings.focus.faded_opacity;
        let nodes = self.layout.nodes();

        let hovered = match focus {
            Focus::Hovering { fighter, .. } => self.layout.index_of(fighter),
            _ => None,
        };
        let adjacent = hovered
            .map(|index| {
                let mut adjacent = self.layout.neighbors(index).iter().copied().collect::<HashSet<_>>();
                adjacent.insert(index);
                adjacent
            })
            .unwrap_or_default();

        let node_descriptors = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let interactive = focus.is_interactive(&node.id);
                let opacity = match focus {
                    Focus::Idle => 1.0,
                    Focus::Hovering { .. } if adjacent.contains(&index) => 1.0,
                    Focus::Hovering { .. } => faded,
                    Focus::Selected { .. } if interactive => 1.0,
                    Focus::Selected { .. } => 0.0,
                };
                NodeDescriptor {
                    id: node.id.clone(),
                    class: node.class,
                    x: node.pos.x,
                    y: node.pos.y,
                    radius: node.radius,
                    fill_color: class_color(node.class.rank()),
                    opacity,
                    interactive,
                    selected: focus.is_selected() && focus.fighter() == Some(&node.id),
                }
            })
            .collect::<Vec<_>>();

        let max_count = self.roster.max_matchup_count;
        let edges = self
            .layout
            .edges()
            .iter()
            .map(|edge| {
                let source = &nodes[edge.source];
                let target = &nodes[edge.target];
                let base = edge_opacity(edge.count, max_count);
                let opacity = match focus {
                    Focus::Idle => base,
                    Focus::Hovering { .. } => {
                        if hovered == Some(edge.source) || hovered == Some(edge.target) {
                            base
                        } else {
                            base.min(faded)
                        }
                    }
                    Focus::Selected { .. } => {
                        if focus.is_interactive(&source.id) && focus.is_interactive(&target.id) {
                            base
                        } else {
                            0.0
                        }
                    }
                };
                EdgeDescriptor {
                    source_id: source.id.clone(),
                    target_id: target.id.clone(),
                    x1: source.pos.x,
                    y1: source.pos.y,
                    x2: target.pos.x,
                    y2: target.pos.y,
                    stroke_width: EDGE_STROKE_WIDTH,
                    opacity,
                }
            })
            .collect::<Vec<_>>();

        let labels = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let visible = match focus {
                    Focus::Idle => self.idle_labels.contains(&node.id),
                    Focus::Hovering { .. } => adjacent.contains(&index),
                    Focus::Selected { interactive, .. } => interactive.contains(&node.id),
                };
                let text = self
                    .roster
                    .fighter(&node.id)
                    .map_or_else(|| node.id.to_string(), |fighter| fighter.name.clone());
                LabelDescriptor {
                    id: node.id.clone(),
                    x: node.pos.x + node.radius + LABEL_GAP,
                    y: node.pos.y,
                    text,
                    opacity: if visible { 1.0 } else { 0.0 },
                    visible,
                }
            })
            .collect::<Vec<_>>();

        let class_labels = self
            .state
            .classes
            .canonical()
            .iter()
            .filter_map(|&class| {
                let (x, y) = self.state.classes.label_position(
                    class,
                    self.layout.viewport().x,
                    self.settings.layout.label_band,
                )?;
                Some(ClassLabelDescriptor {
                    class,
                    x,
                    y,
                    selected: self.state.classes.is_selected(class),
                    population: self.state.classes.population(class),
                    description: self.state.classes.description(class)?,
                })
            })
            .collect();

        Frame {
            nodes: node_descriptors,
            edges,
            labels,
            tooltip: self.tooltip(),
            transform: self.state.transform.current().into(),
            class_labels,
            chart: focus.chart(),
        }
    }

    fn tooltip(&self) -> Option<TooltipDescriptor> {
        let Focus::Hovering {
            fighter,
            tooltip_direction,
        } = &self.state.focus
        else {
            return None;
        };
        let node = self.layout.node(fighter)?;
        let record = self.roster.fighter(fighter)?;

        let transform = self.state.transform.current();
        let [width, height] = self.settings.focus.tooltip_size;
        let anchor = tooltip_anchor(
            transform.apply(node.pos),
            *tooltip_direction,
            vec2(width, height),
            node.radius * transform.scale,
        );
        Some(TooltipDescriptor {
            x: anchor.x,
            y: anchor.y,
            width,
            height,
            lines: tooltip_lines(record, self.roster.opponent_count(record)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::graph::PointerTracker;
    use crate::roster::{FightRecord, FighterRecord, RosterBuilder};

    fn fighter(id: &str, class: &str) -> FighterRecord {
        FighterRecord {
            id: id.to_owned(),
            name: format!("Fighter {id}"),
            weight_class: class.to_owned(),
            height: Some(70.0),
            weight: None,
        }
    }

    fn bout(id1: &str, id2: &str, year: i32) -> FightRecord {
        FightRecord {
            fighter1_id: id1.to_owned(),
            fighter1_name: format!("Fighter {id1}"),
            fighter2_id: id2.to_owned(),
            fighter2_name: format!("Fighter {id2}"),
            result1: "win".to_owned(),
            result2: "loss".to_owned(),
            method: Some("KO/TKO".to_owned()),
            round: Some(2),
            event_day: Some(1),
            event_month: Some(3),
            event_year: Some(year),
        }
    }

    /// Two flyweight hubs, two heavyweight hubs, each with a few opponents in
    /// their own class, and one cross-class bout.
    fn roster() -> Arc<Roster> {
        let mut builder = RosterBuilder::new();
        let mut records = Vec::new();
        for hub in ["f0", "f1"] {
            records.push(fighter(hub, "Flyweight"));
        }
        for hub in ["h0", "h1"] {
            records.push(fighter(hub, "Heavyweight"));
        }
        for n in 0..4 {
            records.push(fighter(&format!("fo{n}"), "Flyweight"));
            records.push(fighter(&format!("ho{n}"), "Heavyweight"));
        }
        builder.ingest_fighters(records);

        let mut fights = Vec::new();
        for n in 0..4 {
            fights.push(bout("f0", &format!("fo{n}"), 2010 + n));
            fights.push(bout("h0", &format!("ho{n}"), 2010 + n));
        }
        fights.push(bout("f0", "f1", 2015));
        fights.push(bout("h1", "h0", 2015));
        fights.push(bout("f1", "h1", 2016));
        builder.ingest_fights(fights);
        Arc::new(builder.finish())
    }

    fn session() -> Session {
        Session::new(roster(), Settings::default(), vec2(1200.0, 800.0))
    }

    fn id(raw: &str) -> FighterId {
        FighterId::new(raw)
    }

    fn finish_animation(session: &mut Session) {
        for _ in 0..100 {
            if !session.advance(0.05) {
                break;
            }
        }
    }

    fn content(session: &Session) -> (Vec<String>, Vec<(String, String)>) {
        let frame = session.frame();
        let mut nodes = frame
            .nodes
            .iter()
            .map(|node| node.id.to_string())
            .collect::<Vec<_>>();
        nodes.sort();
        let mut edges = frame
            .edges
            .iter()
            .map(|edge| (edge.source_id.to_string(), edge.target_id.to_string()))
            .collect::<Vec<_>>();
        edges.sort();
        (nodes, edges)
    }

    #[test]
    fn test_toggle_off_then_on_restores_content() {
        let mut session = session();
        let before = content(&session);
        assert_eq!(before.0.len(), 12);
        assert_eq!(before.1.len(), 11);

        assert!(session.handle(PointerEvent::ClassClick(WeightClass::Heavyweight)));
        let (nodes, edges) = content(&session);
        assert_eq!(nodes.len(), 6);
        assert_eq!(edges.len(), 5);
        assert!(nodes.iter().all(|node| node.starts_with('f')));

        assert!(session.handle(PointerEvent::ClassClick(WeightClass::Heavyweight)));
        assert_eq!(content(&session), before);
    }

    #[test]
    fn test_toggle_unknown_class_is_ignored() {
        let mut session = session();
        let revision = session.layout().revision();
        assert!(!session.handle(PointerEvent::ClassClick(WeightClass::Atomweight)));
        assert_eq!(session.layout().revision(), revision);
    }

    #[test]
    fn test_hover_fades_others_and_reveals_neighbor_labels() {
        let mut session = session();
        assert!(session.handle(PointerEvent::Enter(id("f1"))));

        let frame = session.frame();
        assert!(frame.tooltip.is_some());
        assert_eq!(frame.node(&id("f1")).unwrap().opacity, 1.0);
        assert_eq!(frame.node(&id("h1")).unwrap().opacity, 1.0);
        assert_eq!(frame.node(&id("fo0")).unwrap().opacity, 0.1);
        assert!(frame.label(&id("f0")).unwrap().visible);
        assert!(!frame.label(&id("fo0")).unwrap().visible);
        assert!(frame.edges.iter().all(|edge| edge.opacity <= 1.0));
        drop(frame);

        assert!(session.handle(PointerEvent::Leave(id("f1"))));
        let frame = session.frame();
        assert!(frame.tooltip.is_none());
        assert!(frame.nodes.iter().all(|node| node.opacity == 1.0));
        assert!(session.focus().is_idle());
    }

    #[test]
    fn test_leave_for_other_fighter_keeps_hover() {
        let mut session = session();
        session.handle(PointerEvent::Enter(id("f0")));
        assert!(!session.handle(PointerEvent::Leave(id("h0"))));
        assert!(session.focus().is_hovering(&id("f0")));

        assert!(session.handle(PointerEvent::Enter(id("h0"))));
        assert!(session.focus().is_hovering(&id("h0")));
    }

    #[test]
    fn test_idle_labels_follow_class_ranking() {
        let session = session();
        let frame = session.frame();
        let visible = frame
            .labels
            .iter()
            .filter(|label| label.visible)
            .map(|label| label.id.to_string())
            .collect::<HashSet<_>>();
        assert_eq!(visible, ["f0".to_owned(), "h0".to_owned()].into_iter().collect());
    }

    #[test]
    fn test_select_then_click_opponent_moves_selection() {
        let mut session = session();
        assert!(session.handle(PointerEvent::Click(id("f0"))));
        assert!(session.state.transform.is_animating());
        finish_animation(&mut session);

        {
            let frame = session.frame();
            assert_eq!(frame.selected_count(), 1);
            assert!(frame.node(&id("f0")).unwrap().selected);
            assert!(frame.chart.is_some());
            assert_eq!(frame.node(&id("h0")).unwrap().opacity, 0.0);
            assert!(!frame.node(&id("h0")).unwrap().interactive);
            assert!(frame.tooltip.is_none());
        }

        assert!(session.handle(PointerEvent::Click(id("f1"))));
        assert!(matches!(
            session.focus(),
            Focus::Selected { fighter, .. } if fighter == &id("f1")
        ));
        let frame = session.frame();
        assert_eq!(frame.selected_count(), 1);
        assert!(frame.node(&id("f1")).unwrap().selected);
        assert!(frame.node(&id("h1")).unwrap().interactive);
    }

    #[test]
    fn test_selected_ignores_hover_and_inert_clicks() {
        let mut session = session();
        session.handle(PointerEvent::Click(id("f0")));
        finish_animation(&mut session);

        assert!(!session.handle(PointerEvent::Enter(id("fo1"))));
        assert!(!session.handle(PointerEvent::Click(id("h0"))));
        assert!(!session.handle(PointerEvent::Click(id("unknown"))));
        assert!(matches!(
            session.focus(),
            Focus::Selected { fighter, .. } if fighter == &id("f0")
        ));
    }

    #[test]
    fn test_centering_is_gated_but_selection_still_moves() {
        let mut session = session();
        session.handle(PointerEvent::Click(id("f0")));
        let target = session.state.transform.target();

        assert!(session.handle(PointerEvent::Click(id("fo2"))));
        assert_eq!(session.state.transform.target(), target);
        assert_eq!(session.frame().selected_count(), 1);
        assert!(!session.step_layout());

        assert!(!session.handle(PointerEvent::Exit));
        finish_animation(&mut session);
        assert!(session.layout().is_running());
    }

    #[test]
    fn test_selection_narrows_clamp_and_exit_restores() {
        let mut session = session();
        session.handle(PointerEvent::Click(id("h0")));
        finish_animation(&mut session);

        let narrowed = session.layout().bounds();
        assert_ne!(narrowed, session.layout().default_bounds());
        let center = session.layout().node(&id("h0")).unwrap().pos;
        assert!(narrowed.contains(center.to_pos2()));
        for _ in 0..60 {
            session.step_layout();
        }
        for node in session.layout().nodes() {
            let inside = narrowed.expand(1e-3).contains(node.pos.to_pos2());
            assert_eq!(inside, session.focus().is_interactive(&node.id), "{}", node.id);
        }

        assert!(session.handle(PointerEvent::Exit));
        assert!(session.focus().is_idle());
        assert_eq!(session.layout().bounds(), session.layout().default_bounds());
        finish_animation(&mut session);
        assert_eq!(session.state.transform.current(), ViewTransform::IDENTITY);
        assert!(session.frame().chart.is_none());
    }

    #[test]
    fn test_selected_fighter_holds_its_anchor_while_layout_runs() {
        let mut session = session();
        for _ in 0..400 {
            session.step_layout();
        }
        assert!(session.handle(PointerEvent::Click(id("f0"))));
        finish_animation(&mut session);
        assert!(session.layout().is_focused());
        for _ in 0..200 {
            session.step_layout();
        }

        let transform = session.state.transform.current();
        let f0 = session.layout().node(&id("f0")).unwrap().pos;
        let screen = transform.apply(f0);
        assert!((screen - vec2(300.0, 450.0)).length() < 1.0, "f0 drawn at {screen:?}");

        let bounds = session.layout().bounds();
        let members = session
            .layout()
            .nodes()
            .iter()
            .filter(|node| session.focus().is_interactive(&node.id))
            .collect::<Vec<_>>();
        assert_eq!(members.len(), 6);
        for node in members {
            assert!(
                bounds.shrink(1.0).contains(node.pos.to_pos2()),
                "{} pressed against the edge at {:?}",
                node.id,
                node.pos
            );
        }
    }

    #[test]
    fn test_exit_with_pointer_resting_on_node_restores_hover() {
        let mut session = session();
        let mut tracker = PointerTracker::default();
        for event in tracker.update(Some(id("f0"))) {
            session.handle(event);
        }
        assert!(session.focus().is_hovering(&id("f0")));

        assert!(session.handle(PointerEvent::Click(id("f0"))));
        finish_animation(&mut session);
        assert!(tracker.update(Some(id("f0"))).is_empty());

        let exit = PointerEvent::Exit;
        assert!(exit.resets_hover());
        assert!(session.handle(exit));
        tracker.forget();
        for event in tracker.update(Some(id("f0"))) {
            assert!(session.handle(event));
        }
        assert!(session.focus().is_hovering(&id("f0")));
        assert!(!PointerEvent::Leave(id("f0")).resets_hover());
    }

    #[test]
    fn test_class_toggle_while_selected_resets_focus() {
        let mut session = session();
        session.handle(PointerEvent::Click(id("f0")));
        assert!(session.handle(PointerEvent::ClassClick(WeightClass::Flyweight)));

        assert!(session.focus().is_idle());
        assert_eq!(session.state.transform.current(), ViewTransform::IDENTITY);
        assert!(!session.state.transform.is_animating());
        assert_eq!(session.layout().active_classes(), &[WeightClass::Heavyweight]);
    }

    #[test]
    fn test_single_class_shares_one_slot() {
        let mut session = session();
        session.handle(PointerEvent::ClassClick(WeightClass::Flyweight));
        for _ in 0..50 {
            session.step_layout();
        }
        let nodes = session.layout().nodes();
        assert_eq!(nodes.len(), 6);
        assert!(nodes.iter().all(|node| node.slot_x == 600.0));
        assert_eq!(session.frame().class_labels.len(), 2);
    }
}
