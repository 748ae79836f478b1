use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;

use super::build::IngestIssue;
use super::weight_class::WeightClass;

/// Fighter identity as it appears in the source data.
///
/// Ordering is the plain lexical ordering of the identity string. It is the
/// total order used to decide which side of a pair owns the matchup.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FighterId(String);

impl FighterId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FighterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FightResult {
    Win,
    Loss,
    Draw,
}

impl FightResult {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "win" => Some(Self::Win),
            "loss" => Some(Self::Loss),
            "draw" => Some(Self::Draw),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Draw => "draw",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Fight {
    pub opponent_id: FighterId,
    pub opponent_name: String,
    pub result: FightResult,
    pub method: Option<String>,
    pub round: Option<u8>,
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FightStats {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_percent: f32,
}

impl FightStats {
    pub fn from_fights(fights: &[Fight]) -> Self {
        let mut stats = Self::default();
        for fight in fights {
            match fight.result {
                FightResult::Win => stats.wins += 1,
                FightResult::Loss => stats.losses += 1,
                FightResult::Draw => stats.draws += 1,
            }
        }

        let total = stats.total();
        if total > 0 {
            stats.win_percent = stats.wins as f32 / total as f32;
        }
        stats
    }

    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.draws)
    }
}

#[derive(Clone, Debug)]
pub struct Fighter {
    pub id: FighterId,
    pub name: String,
    pub weight_class: WeightClass,
    pub height: Option<f32>,
    pub weight: Option<f32>,
    pub fights: Vec<Fight>,
    pub stats: FightStats,
}

impl Fighter {
    /// Distinct opponents in order of first meeting.
    pub fn opponent_ids(&self) -> impl Iterator<Item = &FighterId> {
        let mut seen = BTreeSet::new();
        self.fights
            .iter()
            .map(|fight| &fight.opponent_id)
            .filter(move |id| seen.insert(*id))
    }
}

/// Undirected edge; `low < high` under [`FighterId`] ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matchup {
    pub low: FighterId,
    pub high: FighterId,
    pub count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassPopulation {
    pub class: WeightClass,
    pub population: usize,
}

#[derive(Clone, Debug)]
pub struct Roster {
    pub fighters: BTreeMap<FighterId, Fighter>,
    pub matchups: Vec<Matchup>,
    pub max_matchup_count: u32,
    /// Classes with at least one fighter, in canonical order.
    pub populations: Vec<ClassPopulation>,
    pub issues: Vec<IngestIssue>,
    pub pruned_count: usize,
}

impl Roster {
    pub fn fighter_count(&self) -> usize {
        self.fighters.len()
    }

    pub fn fighter(&self, id: &FighterId) -> Option<&Fighter> {
        self.fighters.get(id)
    }

    /// Distinct opponents of `fighter` that survived pruning.
    pub fn opponent_count(&self, fighter: &Fighter) -> usize {
        fighter
            .opponent_ids()
            .filter(|id| self.fighters.contains_key(*id))
            .count()
    }

    #[cfg(test)]
    pub fn matchup(&self, a: &FighterId, b: &FighterId) -> Option<&Matchup> {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.matchups
            .iter()
            .find(|matchup| &matchup.low == low && &matchup.high == high)
    }

    /// Fighters of one class ranked by win percent, then activity, then name.
    pub fn top_in_class(&self, class: WeightClass, limit: usize) -> Vec<&FighterId> {
        let mut ranked = self
            .fighters
            .values()
            .filter(|fighter| fighter.weight_class == class)
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| {
            b.stats
                .win_percent
                .total_cmp(&a.stats.win_percent)
                .then_with(|| b.fights.len().cmp(&a.fights.len()))
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(limit);
        ranked.into_iter().map(|fighter| &fighter.id).collect()
    }
}
