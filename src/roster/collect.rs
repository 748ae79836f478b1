use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use crate::config::RosterConfig;

use super::build::RosterBuilder;
use super::graph::Roster;
use super::parse::{read_fight_records, read_fighter_records};

#[derive(Clone, Debug)]
pub struct DataSources {
    pub fighters: PathBuf,
    pub fights: PathBuf,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

/// Loads both record streams and runs the build phases in order: fighters,
/// fights, activity pruning, then aggregation.
pub fn collect_roster(sources: &DataSources, config: &RosterConfig) -> Result<Roster> {
    ensure!(
        config.min_fight_count > 0,
        "minimum fight count must be greater than zero"
    );

    let fighters_source = sources.fighters.display().to_string();
    let fighter_records = read_fighter_records(open(&sources.fighters)?, &fighters_source)
        .with_context(|| format!("failed to parse fighter records from {fighters_source}"))?;

    let fights_source = sources.fights.display().to_string();
    let fight_records = read_fight_records(open(&sources.fights)?, &fights_source)
        .with_context(|| format!("failed to parse fight records from {fights_source}"))?;

    log::info!(
        "read {} fighter rows and {} fight rows",
        fighter_records.len(),
        fight_records.len()
    );

    let mut builder = RosterBuilder::new();
    builder.ingest_fighters(fighter_records);
    builder.ingest_fights(fight_records);
    builder.prune_by_activity(config.min_fight_count);
    let roster = builder.finish();

    if !roster.issues.is_empty() {
        log::warn!("{} input rows were dropped, see warnings above", roster.issues.len());
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_collect_roster_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let fighters = write_file(
            dir.path(),
            "fighters.csv",
            "fid,name,class,height,weight\n1,Ana,Flyweight,,\n2,Bea,Flyweight,,\n3,Cal,Catchweight,,\n",
        );
        let fights = write_file(
            dir.path(),
            "fights.csv",
            "f1fid,f1name,f2fid,f2name,f1result,f2result,method,round,event_day,event_month,event_year\n\
             1,Ana,2,Bea,win,loss,Decision,3,1,6,2012\n\
             2,Bea,1,Ana,win,loss,Submission,1,1,6,2013\n\
             1,Ana,3,Cal,win,loss,KO,1,1,6,2014\n",
        );

        let roster = collect_roster(
            &DataSources { fighters, fights },
            &RosterConfig { min_fight_count: 2 },
        )
        .unwrap();

        assert_eq!(roster.fighter_count(), 2);
        assert_eq!(roster.matchups.len(), 1);
        assert_eq!(roster.matchups[0].count, 2);
        assert_eq!(roster.issues.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sources = DataSources {
            fighters: dir.path().join("nope.csv"),
            fights: dir.path().join("nope-either.csv"),
        };

        let error = collect_roster(&sources, &RosterConfig::default()).unwrap_err();
        assert!(format!("{error:#}").contains("failed to open"));
    }

    #[test]
    fn test_zero_threshold_is_rejected() {
        let sources = DataSources {
            fighters: PathBuf::from("fighters.csv"),
            fights: PathBuf::from("fights.csv"),
        };
        assert!(collect_roster(&sources, &RosterConfig { min_fight_count: 0 }).is_err());
    }
}
