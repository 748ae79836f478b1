use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, vec2};

use crate::config::Settings;
use crate::roster::{DataSources, FighterId, Roster, WeightClass, collect_roster};

mod descriptors;
mod filter;
mod focus;
mod graph;
mod physics;
mod render_utils;
mod session;
mod ui;

use graph::PointerTracker;
use session::Session;

/// Canvas size assumed until the first frame reports the real one.
const INITIAL_CANVAS: [f32; 2] = [1280.0, 760.0];

type LoadResult = Result<Arc<Roster>, String>;

pub struct FightGraphApp {
    sources: DataSources,
    settings: Settings,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    session: Session,
    search: String,
    pointer: PointerTracker,
    hovered_class: Option<WeightClass>,
    search_match_cache: Option<SearchMatchCache>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct SearchMatchCache {
    query: String,
    layout_revision: u64,
    matches: Arc<HashSet<FighterId>>,
}

impl FightGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, sources: DataSources, settings: Settings) -> Self {
        let state = Self::start_load(&sources, &settings);
        Self {
            sources,
            settings,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(sources: &DataSources, settings: &Settings) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let sources = sources.clone();
        let config = settings.roster.clone();

        thread::spawn(move || {
            let result = collect_roster(&sources, &config)
                .map(Arc::new)
                .map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                log::error!("failed to load roster: {error}");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(sources: &DataSources, settings: &Settings) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(sources, settings),
        }
    }

    fn ready(&self, roster: Arc<Roster>) -> AppState {
        let canvas = vec2(INITIAL_CANVAS[0], INITIAL_CANVAS[1]);
        let session = Session::new(roster, self.settings.clone(), canvas);
        AppState::Ready(Box::new(ViewModel::new(session)))
    }
}

impl eframe::App for FightGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading fighter roster...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the fighter roster");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.sources, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.sources, &self.settings));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(&self.sources, &self.settings);
            return;
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(roster) => self.ready(roster),
                Err(error) => AppState::Error(error),
            };
        }
    }
}
