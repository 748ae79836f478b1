mod app;
mod config;
mod roster;
mod util;

use std::path::PathBuf;

use clap::Parser;

use config::Settings;
use roster::DataSources;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Fighter table (fid,name,class,height,weight)
    #[arg(long, default_value = "fighters.csv")]
    fighters: PathBuf,

    /// Fight table, one row per bout
    #[arg(long, default_value = "fights.csv")]
    fights: PathBuf,

    /// Fighters with fewer recorded bouts are left out
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    min_fights: u32,

    /// Names shown per weight class when nothing is focused
    #[arg(long, default_value_t = 1)]
    labels_per_class: usize,
}

impl Args {
    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        settings.roster.min_fight_count = self.min_fights as usize;
        settings.focus.labels_per_class = self.labels_per_class;
        settings
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings();
    let sources = DataSources {
        fighters: args.fighters,
        fights: args.fights,
    };
    log::info!(
        "loading {} and {}",
        sources.fighters.display(),
        sources.fights.display()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "fight-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::FightGraphApp::new(cc, sources, settings)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let args = Args::try_parse_from(["fight-graph"]).unwrap();
        assert_eq!(args.fighters, PathBuf::from("fighters.csv"));
        assert_eq!(args.settings().roster.min_fight_count, 10);
        assert_eq!(args.settings().focus.labels_per_class, 1);

        let args = Args::try_parse_from(["fight-graph", "--min-fights", "3", "--labels-per-class", "2"])
            .unwrap();
        assert_eq!(args.settings().roster.min_fight_count, 3);
        assert_eq!(args.settings().focus.labels_per_class, 2);
    }

    #[test]
    fn test_zero_min_fights_is_rejected() {
        assert!(Args::try_parse_from(["fight-graph", "--min-fights", "0"]).is_err());
    }
}
