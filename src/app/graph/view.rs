use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, CursorIcon, FontId, Painter, Rect, Sense, Stroke, Ui, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::roster::{FightResult, FighterId, WeightClass};

use super::super::descriptors::{ClassLabelDescriptor, TooltipDescriptor};
use super::super::focus::{HistoryChart, ViewTransform};
use super::super::render_utils::{
    INACTIVE_LABEL, blend_color, class_color, draw_background, world_to_screen, with_opacity,
};
use super::super::session::PointerEvent;
use super::super::{SearchMatchCache, ViewModel};
use super::interaction::hit_test;

const EDGE_COLOR: Color32 = Color32::from_rgb(96, 96, 96);
const LABEL_COLOR: Color32 = Color32::from_rgb(34, 34, 34);
const SEARCH_COLOR: Color32 = Color32::from_rgb(103, 150, 255);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn result_color(result: FightResult) -> Color32 {
    match result {
        FightResult::Win => Color32::from_rgb(44, 160, 44),
        FightResult::Loss => Color32::from_rgb(214, 39, 40),
        FightResult::Draw => Color32::from_gray(140),
    }
}

impl ViewModel {
    /// Active fighters whose name fuzzy-matches the search box, best first.
    pub(in crate::app) fn ranked_search_matches(&self) -> Vec<(FighterId, i64)> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let roster = self.session.roster();
        let mut ranked = self
            .session
            .layout()
            .nodes()
            .iter()
            .filter_map(|node| {
                let fighter = roster.fighter(&node.id)?;
                let score = fuzzy_match_score(&matcher, &fighter.name, query)?;
                Some((node.id.clone(), score))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// The search hit Enter acts on: the only match, or one that clearly
    /// outscores the rest.
    pub(in crate::app) fn best_search_match(&self) -> Option<FighterId> {
        let ranked = self.ranked_search_matches();
        match ranked.as_slice() {
            [(only, _)] => Some(only.clone()),
            [(first, best), (_, second), ..] if best > second => Some(first.clone()),
            _ => None,
        }
    }

    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<FighterId>>> {
        if !self.session.focus().is_idle() {
            return None;
        }

        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        let revision = self.session.layout().revision();
        if let Some(cached) = &self.search_match_cache
            && cached.layout_revision == revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let query = query.to_owned();
        let matches = Arc::new(
            self.ranked_search_matches()
                .into_iter()
                .map(|(id, _)| id)
                .collect::<HashSet<_>>(),
        );
        self.search_match_cache = Some(SearchMatchCache {
            query,
            layout_revision: revision,
            matches: Arc::clone(&matches),
        });
        Some(matches)
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        self.session.set_viewport(rect.width(), rect.height());

        let dt = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let animating = self.session.advance(dt);
        let moving = self.session.step_layout();
        if animating || moving {
            ui.ctx().request_repaint();
        }

        let search_matches = self.cached_search_matches();
        let painter = ui.painter_at(rect);
        let label_band = self.session.settings().layout.label_band;
        draw_background(&painter, rect, label_band);

        let mut events = Vec::new();
        let frame = self.session.frame();
        let transform = ViewTransform::from(frame.transform);

        let hovered_class = Self::draw_class_labels(ui, &painter, rect, &frame.class_labels, &mut events);
        self.hovered_class = hovered_class;
        let pointer_target = self.pointer.hovered();

        for edge in &frame.edges {
            if edge.opacity <= 0.0 {
                continue;
            }
            let start = world_to_screen(rect, transform, vec2(edge.x1, edge.y1));
            let end = world_to_screen(rect, transform, vec2(edge.x2, edge.y2));
            let touches_pointer = pointer_target
                .is_some_and(|id| id == &edge.source_id || id == &edge.target_id);
            let width = if touches_pointer {
                edge.stroke_width * 1.5
            } else {
                edge.stroke_width
            };
            painter.line_segment(
                [start, end],
                Stroke::new(width, with_opacity(EDGE_COLOR, edge.opacity)),
            );
        }

        let mut visible_nodes = 0usize;
        for node in &frame.nodes {
            if node.opacity <= 0.0 {
                continue;
            }
            visible_nodes += 1;

            let position = world_to_screen(rect, transform, node.pos());
            let radius = node.radius * transform.scale;
            let is_search_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&node.id));
            let in_hovered_class = hovered_class == Some(node.class);

            let fill = if node.selected {
                blend_color(node.fill_color, SELECTED_COLOR, 0.35)
            } else {
                node.fill_color
            };
            painter.circle_filled(position, radius, with_opacity(fill, node.opacity));

            let stroke = if node.selected {
                Stroke::new(2.5, with_opacity(Color32::BLACK, node.opacity))
            } else if in_hovered_class {
                Stroke::new(1.5, with_opacity(Color32::BLACK, node.opacity))
            } else if is_search_match {
                Stroke::new(2.0, with_opacity(SEARCH_COLOR, node.opacity))
            } else {
                Stroke::new(1.0, with_opacity(Color32::WHITE, node.opacity))
            };
            painter.circle_stroke(position, radius, stroke);
        }
        self.visible_node_count = visible_nodes;
        self.visible_edge_count = frame.edges.iter().filter(|edge| edge.opacity > 0.0).count();

        for label in frame.labels.iter().filter(|label| label.visible) {
            let size = if pointer_target == Some(&label.id) { 14.0 } else { 12.0 };
            painter.text(
                world_to_screen(rect, transform, vec2(label.x, label.y)),
                Align2::LEFT_CENTER,
                &label.text,
                FontId::proportional(size),
                with_opacity(LABEL_COLOR, label.opacity),
            );
        }

        if let Some(tooltip) = &frame.tooltip {
            Self::draw_tooltip(&painter, rect, tooltip);
        }

        if let Some(chart) = frame.chart {
            let area = self.session.chart_area().translate(rect.min.to_vec2());
            Self::draw_chart(ui, &painter, area, chart);
        }

        if frame.selected_count() > 0 {
            let button_rect = Rect::from_min_size(
                rect.min + vec2(12.0, label_band + 8.0),
                vec2(140.0, 24.0),
            );
            if ui
                .put(button_rect, egui::Button::new("Back to network"))
                .clicked()
            {
                events.push(PointerEvent::Exit);
            }
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer) && hovered_class.is_none());
        let hit = pointer
            .and_then(|pointer| hit_test(&frame.nodes, rect, transform, pointer))
            .map(|node| node.id.clone());
        drop(frame);

        if hit.is_some() {
            ui.output_mut(|output| output.cursor_icon = CursorIcon::PointingHand);
        }
        events.extend(self.pointer.update(hit.clone()));
        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(id) = hit
        {
            events.push(PointerEvent::Click(id));
        }
        if ui.input(|input| input.key_pressed(egui::Key::Escape)) {
            events.push(PointerEvent::Exit);
        }

        self.dispatch(ui.ctx(), events);
    }

    pub(in crate::app) fn dispatch(&mut self, ctx: &egui::Context, events: Vec<PointerEvent>) {
        for event in events {
            let resets_hover = event.resets_hover();
            if self.session.handle(event) {
                if resets_hover {
                    self.pointer.forget();
                }
                ctx.request_repaint();
            }
        }
    }

    /// Draws the class labels in the band and returns the hovered class.
    fn draw_class_labels(
        ui: &Ui,
        painter: &Painter,
        rect: Rect,
        labels: &[ClassLabelDescriptor],
        events: &mut Vec<PointerEvent>,
    ) -> Option<WeightClass> {
        let mut hovered = None;
        for label in labels {
            let color = if label.selected {
                class_color(label.class.rank())
            } else {
                INACTIVE_LABEL
            };
            let text_rect = painter.text(
                rect.min + vec2(label.x, label.y),
                Align2::CENTER_CENTER,
                label.class.name(),
                FontId::proportional(20.0),
                color,
            );

            let response = ui
                .interact(
                    text_rect,
                    ui.id().with(("class-label", label.class.rank())),
                    Sense::click(),
                )
                .on_hover_cursor(CursorIcon::PointingHand);
            if response.hovered() {
                hovered = Some(label.class);
            }
            if response.clicked() {
                events.push(PointerEvent::ClassClick(label.class));
            }
        }

        let hovered_label = hovered.and_then(|class| labels.iter().find(|label| label.class == class));
        if let Some(label) = hovered_label
            && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        {
            let text = format!("{}\n{} fighters", label.description, label.population);
            let galley = painter.layout_no_wrap(text, FontId::proportional(13.0), LABEL_COLOR);
            let box_rect =
                Rect::from_min_size(pointer + vec2(0.0, 20.0), galley.size() + vec2(12.0, 8.0));
            painter.rect_filled(box_rect, 4.0, Color32::from_rgba_unmultiplied(255, 255, 255, 235));
            painter.rect_stroke(
                box_rect,
                4.0,
                Stroke::new(1.0, Color32::from_gray(180)),
                egui::StrokeKind::Inside,
            );
            painter.galley(box_rect.min + vec2(6.0, 4.0), galley, LABEL_COLOR);
        }
        hovered
    }

    fn draw_tooltip(painter: &Painter, rect: Rect, tooltip: &TooltipDescriptor) {
        let box_rect = Rect::from_center_size(
            rect.min + vec2(tooltip.x, tooltip.y),
            vec2(tooltip.width, tooltip.height),
        );
        painter.rect_filled(box_rect, 4.0, Color32::from_rgba_unmultiplied(255, 255, 255, 240));
        painter.rect_stroke(
            box_rect,
            4.0,
            Stroke::new(1.0, Color32::from_gray(170)),
            egui::StrokeKind::Inside,
        );

        let mut cursor = box_rect.min + vec2(8.0, 6.0);
        for (index, line) in tooltip.lines.iter().enumerate() {
            let font = if index == 0 {
                FontId::proportional(14.0)
            } else {
                FontId::proportional(12.0)
            };
            let line_rect = painter.text(cursor, Align2::LEFT_TOP, line, font, LABEL_COLOR);
            cursor.y = line_rect.bottom() + 2.0;
        }
    }

    fn draw_chart(ui: &Ui, painter: &Painter, area: Rect, chart: &HistoryChart) {
        if area.width() <= 1.0 || area.height() <= 1.0 {
            return;
        }

        let axis = Stroke::new(1.0, Color32::from_gray(120));
        painter.line_segment([area.left_center(), area.right_center()], axis);
        painter.line_segment([area.left_top(), area.left_bottom()], axis);

        let small = FontId::proportional(11.0);
        painter.text(
            area.left_top() + vec2(-6.0, 0.0),
            Align2::RIGHT_CENTER,
            format!("+{}", chart.max_round),
            small.clone(),
            LABEL_COLOR,
        );
        painter.text(
            area.left_bottom() + vec2(-6.0, 0.0),
            Align2::RIGHT_CENTER,
            format!("-{}", chart.max_round),
            small.clone(),
            LABEL_COLOR,
        );
        painter.text(
            area.left_bottom() + vec2(0.0, 6.0),
            Align2::LEFT_TOP,
            chart.first.format("%Y-%m-%d").to_string(),
            small.clone(),
            LABEL_COLOR,
        );
        painter.text(
            area.right_bottom() + vec2(0.0, 6.0),
            Align2::RIGHT_TOP,
            chart.last.format("%Y-%m-%d").to_string(),
            small.clone(),
            LABEL_COLOR,
        );
        painter.text(
            area.center_top() + vec2(0.0, -10.0),
            Align2::CENTER_BOTTOM,
            "finishing round by date (wins above, losses below)",
            small.clone(),
            LABEL_COLOR,
        );
        if chart.undated > 0 {
            painter.text(
                area.right_top(),
                Align2::RIGHT_TOP,
                format!("{} bouts without a date", chart.undated),
                small.clone(),
                Color32::from_gray(130),
            );
        }

        let projected = chart.projected(area);
        let line = projected.iter().map(|(position, _)| *position).collect::<Vec<_>>();
        if line.len() > 1 {
            painter.add(egui::Shape::line(line, Stroke::new(1.0, Color32::from_gray(150))));
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let mut hovered = None;
        for (position, point) in &projected {
            painter.circle_filled(*position, 4.0, result_color(point.result));
            if pointer.is_some_and(|pointer| pointer.distance(*position) <= 6.0) {
                hovered = Some((*position, *point));
            }
        }

        if let Some((position, point)) = hovered {
            painter.text(
                position + vec2(8.0, -8.0),
                Align2::LEFT_BOTTOM,
                match &point.method {
                    Some(method) => format!(
                        "{} vs {} ({method}, {})",
                        point.result.label(),
                        point.opponent,
                        point.date.format("%Y-%m-%d")
                    ),
                    None => format!(
                        "{} vs {} ({})",
                        point.result.label(),
                        point.opponent,
                        point.date.format("%Y-%m-%d")
                    ),
                },
                small,
                LABEL_COLOR,
            );
        }
    }
}
