use eframe::egui::{self, Align, Context, Key, Layout};

use crate::roster::DataSources;

use super::super::graph::PointerTracker;
use super::super::session::{PointerEvent, Session};
use super::super::ViewModel;

/// Diagnostics listed in the toolbar hover before truncating.
const ISSUE_PREVIEW_ROWS: usize = 20;

impl ViewModel {
    pub(in crate::app) fn new(session: Session) -> Self {
        Self {
            session,
            search: String::new(),
            pointer: PointerTracker::default(),
            hovered_class: None,
            search_match_cache: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        sources: &DataSources,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        let mut submit_search = false;

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("fight-graph");
                    ui.separator();

                    let roster = self.session.roster();
                    ui.label(format!("fighters: {}", roster.fighter_count()))
                        .on_hover_text(format!(
                            "{}\n{}",
                            sources.fighters.display(),
                            sources.fights.display()
                        ));
                    ui.label(format!("matchups: {}", roster.matchups.len()));
                    ui.label(format!("pruned: {}", roster.pruned_count));
                    let classes = self.session.classes();
                    ui.label(format!(
                        "classes: {}/{}",
                        classes.selected_classes().len(),
                        classes.canonical().len()
                    ));

                    let issues = ui.label(format!("skipped rows: {}", roster.issues.len()));
                    if !roster.issues.is_empty() {
                        issues.on_hover_ui(|ui| {
                            for issue in roster.issues.iter().take(ISSUE_PREVIEW_ROWS) {
                                ui.label(issue.to_string());
                            }
                            let hidden = roster.issues.len().saturating_sub(ISSUE_PREVIEW_ROWS);
                            if hidden > 0 {
                                ui.label(format!("... and {hidden} more"));
                            }
                        });
                    }
                    ui.separator();

                    let search = ui.add(
                        egui::TextEdit::singleline(&mut self.search)
                            .hint_text("search fighter")
                            .desired_width(180.0),
                    );
                    if search.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter)) {
                        submit_search = true;
                    }

                    let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "visible: {} nodes, {} edges",
                            self.visible_node_count, self.visible_edge_count
                        ));
                        ui.label(self.session.focus().name());
                        if self.session.layout().is_running() {
                            ui.label("settling");
                        }
                        if is_loading {
                            ui.spinner();
                        }
                    });
                });
            });

        if submit_search && let Some(id) = self.best_search_match() {
            self.dispatch(ctx, vec![PointerEvent::Click(id)]);
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
