mod build;
mod collect;
mod graph;
mod parse;
mod weight_class;

pub use collect::{DataSources, collect_roster};
pub use graph::{ClassPopulation, FightResult, Fighter, FighterId, Roster};
pub use weight_class::WeightClass;

#[cfg(test)]
pub use build::RosterBuilder;
#[cfg(test)]
pub use graph::{Fight, FightStats};
#[cfg(test)]
pub use parse::{FightRecord, FighterRecord};
