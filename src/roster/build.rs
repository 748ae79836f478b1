use std::collections::{BTreeMap, HashMap};

use super::graph::{ClassPopulation, Fight, FightResult, FightStats, Fighter, FighterId, Matchup, Roster};
use super::parse::{FightRecord, FighterRecord};
use super::weight_class::WeightClass;

/// Row-level problem found while building the roster. Never fatal: the row is
/// dropped and ingestion continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IngestIssue {
    #[error("unknown weight class '{class}' for fighter {name} ({id}), ignoring fighter")]
    UnknownWeightClass {
        id: String,
        name: String,
        class: String,
    },
    #[error("duplicate fighter id {id} ({name}), keeping the first record")]
    DuplicateFighter { id: String, name: String },
    #[error("couldn't identify {}, ignoring fight", describe_missing(.missing))]
    UnresolvedParticipants { missing: Vec<(String, String)> },
    #[error("fight between {id1} and {id2} has invalid results {result1}/{result2}, ignoring fight")]
    InvalidOutcome {
        id1: String,
        id2: String,
        result1: String,
        result2: String,
    },
    #[error("fighter {id} is listed on both sides of a fight, ignoring fight")]
    SelfBout { id: String },
}

fn describe_missing(missing: &[(String, String)]) -> String {
    missing
        .iter()
        .map(|(id, name)| format!("fighter {name} ({id})"))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Complementary result pairs only: win/loss, loss/win, draw/draw.
fn validate_outcome(result1: &str, result2: &str) -> Option<(FightResult, FightResult)> {
    let pair = (FightResult::parse(result1)?, FightResult::parse(result2)?);
    match pair {
        (FightResult::Win, FightResult::Loss)
        | (FightResult::Loss, FightResult::Win)
        | (FightResult::Draw, FightResult::Draw) => Some(pair),
        _ => None,
    }
}

#[derive(Default)]
pub struct RosterBuilder {
    fighters: BTreeMap<FighterId, Fighter>,
    issues: Vec<IngestIssue>,
    pruned_count: usize,
}

impl RosterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn report(&mut self, issue: IngestIssue) {
        log::warn!("{issue}");
        self.issues.push(issue);
    }

    pub fn ingest_fighters(&mut self, records: impl IntoIterator<Item = FighterRecord>) {
        for record in records {
            let Some(weight_class) = WeightClass::from_name(&record.weight_class) else {
                self.report(IngestIssue::UnknownWeightClass {
                    id: record.id,
                    name: record.name,
                    class: record.weight_class,
                });
                continue;
            };

            let id = FighterId::new(record.id.trim());
            if self.fighters.contains_key(&id) {
                self.report(IngestIssue::DuplicateFighter {
                    id: record.id,
                    name: record.name,
                });
                continue;
            }

            self.fighters.insert(
                id.clone(),
                Fighter {
                    id,
                    name: record.name,
                    weight_class,
                    height: record.height,
                    weight: record.weight,
                    fights: Vec::new(),
                    stats: FightStats::default(),
                },
            );
        }
    }

    pub fn ingest_fights(&mut self, records: impl IntoIterator<Item = FightRecord>) {
        for record in records {
            let id1 = FighterId::new(record.fighter1_id.trim());
            let id2 = FighterId::new(record.fighter2_id.trim());

            let mut missing = Vec::new();
            if !self.fighters.contains_key(&id1) {
                missing.push((record.fighter1_id.clone(), record.fighter1_name.clone()));
            }
            if !self.fighters.contains_key(&id2) {
                missing.push((record.fighter2_id.clone(), record.fighter2_name.clone()));
            }
            if !missing.is_empty() {
                self.report(IngestIssue::UnresolvedParticipants { missing });
                continue;
            }

            if id1 == id2 {
                self.report(IngestIssue::SelfBout { id: record.fighter1_id });
                continue;
            }

            let Some((result1, result2)) = validate_outcome(&record.result1, &record.result2)
            else {
                self.report(IngestIssue::InvalidOutcome {
                    id1: record.fighter1_id,
                    id2: record.fighter2_id,
                    result1: record.result1,
                    result2: record.result2,
                });
                continue;
            };

            let date = record.event_date();
            let method = record.method();
            let sides = [
                (&id1, &id2, &record.fighter2_name, result1),
                (&id2, &id1, &record.fighter1_name, result2),
            ];
            for (own, opponent, opponent_name, result) in sides {
                if let Some(fighter) = self.fighters.get_mut(own) {
                    fighter.fights.push(Fight {
                        opponent_id: opponent.clone(),
                        opponent_name: opponent_name.clone(),
                        result,
                        method: method.clone(),
                        round: record.round,
                        date,
                    });
                }
            }
        }
    }

    /// Drops fighters with fewer than `min_fights` bouts. Must run after every
    /// fight is ingested.
    pub fn prune_by_activity(&mut self, min_fights: usize) -> usize {
        let before = self.fighters.len();
        self.fighters
            .retain(|_, fighter| fighter.fights.len() >= min_fights);
        let removed = before - self.fighters.len();
        self.pruned_count += removed;

        log::info!(
            "removed {removed} fighters for having < {min_fights} fights, {} fighters remain",
            self.fighters.len()
        );
        removed
    }

    pub fn finish(mut self) -> Roster {
        for fighter in self.fighters.values_mut() {
            fighter.stats = FightStats::from_fights(&fighter.fights);
        }

        let populations = class_populations(&self.fighters);
        let (matchups, max_matchup_count) = build_matchups(&self.fighters);
        log::info!(
            "built {} matchups across {} fighters (max head-to-head {max_matchup_count})",
            matchups.len(),
            self.fighters.len()
        );

        Roster {
            fighters: self.fighters,
            matchups,
            max_matchup_count,
            populations,
            issues: self.issues,
            pruned_count: self.pruned_count,
        }
    }
}

pub(super) fn class_populations(fighters: &BTreeMap<FighterId, Fighter>) -> Vec<ClassPopulation> {
    let mut counts = [0usize; WeightClass::ALL.len()];
    for fighter in fighters.values() {
        counts[fighter.weight_class.rank()] += 1;
    }

    WeightClass::ALL
        .into_iter()
        .filter_map(|class| {
            let population = counts[class.rank()];
            if population == 0 {
                log::info!("removed weight class {class} for having 0 fighters after filtering");
                None
            } else {
                Some(ClassPopulation { class, population })
            }
        })
        .collect()
}

/// Returns the deduplicated matchups and the largest pair count (at least 1).
pub(super) fn build_matchups(fighters: &BTreeMap<FighterId, Fighter>) -> (Vec<Matchup>, u32) {
    let mut matchups = Vec::new();
    let mut max_count = 1;

    for (id, fighter) in fighters {
        let mut linked: HashMap<&FighterId, usize> = HashMap::new();

        for fight in &fighter.fights {
            if !fighters.contains_key(&fight.opponent_id) {
                continue;
            }
            // the other side sees the same pair with the order reversed
            if id >= &fight.opponent_id {
                continue;
            }

            match linked.get(&fight.opponent_id) {
                Some(&index) => {
                    let matchup: &mut Matchup = &mut matchups[index];
                    matchup.count += 1;
                    max_count = max_count.max(matchup.count);
                }
                None => {
                    linked.insert(&fight.opponent_id, matchups.len());
                    matchups.push(Matchup {
                        low: id.clone(),
                        high: fight.opponent_id.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    (matchups, max_count)
}
