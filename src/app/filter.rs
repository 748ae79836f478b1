use std::collections::HashMap;

use crate::roster::{ClassPopulation, Roster, WeightClass};

#[derive(Clone, Copy, Debug)]
struct ClassEntry {
    population: usize,
    selected: bool,
}

/// Which weight classes exist after pruning and which of them are shown.
///
/// The canonical list only ever shrinks: a class that drops to zero fighters
/// is removed and never comes back, even if a later recount finds fighters.
#[derive(Clone, Debug)]
pub(crate) struct WeightClassRegistry {
    canonical: Vec<WeightClass>,
    entries: HashMap<WeightClass, ClassEntry>,
}

impl WeightClassRegistry {
    pub(crate) fn from_populations(populations: &[ClassPopulation]) -> Self {
        let mut canonical = Vec::with_capacity(populations.len());
        let mut entries = HashMap::with_capacity(populations.len());
        for population in populations.iter().filter(|entry| entry.population > 0) {
            canonical.push(population.class);
            entries.insert(
                population.class,
                ClassEntry {
                    population: population.population,
                    selected: true,
                },
            );
        }
        canonical.sort();

        Self { canonical, entries }
    }

    pub(crate) fn recompute_population(&mut self, roster: &Roster) {
        let mut counts: HashMap<WeightClass, usize> = HashMap::new();
        for fighter in roster.fighters.values() {
            *counts.entry(fighter.weight_class).or_default() += 1;
        }

        self.canonical.retain(|class| {
            let population = counts.get(class).copied().unwrap_or(0);
            if population == 0 {
                log::info!("removed weight class {class} for having 0 fighters");
            }
            population > 0
        });
        self.entries.retain(|class, entry| match counts.get(class) {
            Some(&population) if population > 0 => {
                entry.population = population;
                true
            }
            _ => false,
        });
    }

    pub(crate) fn canonical(&self) -> &[WeightClass] {
        &self.canonical
    }

    pub(crate) fn contains(&self, class: WeightClass) -> bool {
        self.entries.contains_key(&class)
    }

    pub(crate) fn is_selected(&self, class: WeightClass) -> bool {
        self.entries.get(&class).is_some_and(|entry| entry.selected)
    }

    pub(crate) fn population(&self, class: WeightClass) -> usize {
        self.entries.get(&class).map_or(0, |entry| entry.population)
    }

    pub(crate) fn description(&self, class: WeightClass) -> Option<&'static str> {
        self.contains(class).then(|| class.description())
    }

    /// Flips the selection flag. Returns `false` for classes that are not in
    /// the canonical list; the caller must rebuild the layout on `true`.
    pub(crate) fn toggle(&mut self, class: WeightClass) -> bool {
        let Some(entry) = self.entries.get_mut(&class) else {
            return false;
        };
        entry.selected = !entry.selected;
        log::debug!(
            "weight class {class} {}",
            if entry.selected { "selected" } else { "deselected" }
        );
        true
    }

    pub(crate) fn selected_classes(&self) -> Vec<WeightClass> {
        let mut selected = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.selected)
            .map(|(class, _)| *class)
            .collect::<Vec<_>>();
        selected.sort_by_key(|class| class.rank());
        selected
    }

    /// Center of the equal-width band `class` occupies among `classes`.
    pub(crate) fn slot_position(class: WeightClass, classes: &[WeightClass], width: f32) -> Option<f32> {
        let index = classes.iter().position(|candidate| *candidate == class)?;
        Some(width / classes.len() as f32 * (index as f32 + 0.5))
    }

    /// Label anchors span the full canonical list and alternate between two
    /// rows so long names do not collide.
    pub(crate) fn label_position(&self, class: WeightClass, width: f32, band: f32) -> Option<(f32, f32)> {
        let x = Self::slot_position(class, &self.canonical, width)?;
        let index = self.canonical.iter().position(|candidate| *candidate == class)?;
        let y = if index % 2 == 0 { band * 0.3 } else { band * 0.8 };
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{FighterRecord, RosterBuilder};

    fn registry(classes: &[(WeightClass, usize)]) -> WeightClassRegistry {
        let populations = classes
            .iter()
            .map(|&(class, population)| ClassPopulation { class, population })
            .collect::<Vec<_>>();
        WeightClassRegistry::from_populations(&populations)
    }

    #[test]
    fn test_all_present_classes_start_selected() {
        let registry = registry(&[
            (WeightClass::Heavyweight, 3),
            (WeightClass::Flyweight, 2),
            (WeightClass::Welterweight, 0),
        ]);

        assert_eq!(
            registry.canonical(),
            &[WeightClass::Flyweight, WeightClass::Heavyweight]
        );
        assert_eq!(registry.selected_classes(), registry.canonical().to_vec());
        assert!(!registry.contains(WeightClass::Welterweight));
        assert_eq!(registry.population(WeightClass::Heavyweight), 3);
    }

    #[test]
    fn test_toggle_round_trip_and_rank_order() {
        let mut registry = registry(&[
            (WeightClass::Middleweight, 1),
            (WeightClass::Strawweight, 1),
            (WeightClass::Lightweight, 1),
        ]);

        assert!(registry.toggle(WeightClass::Lightweight));
        assert_eq!(
            registry.selected_classes(),
            vec![WeightClass::Strawweight, WeightClass::Middleweight]
        );
        assert!(registry.toggle(WeightClass::Lightweight));
        assert_eq!(
            registry.selected_classes(),
            vec![
                WeightClass::Strawweight,
                WeightClass::Lightweight,
                WeightClass::Middleweight
            ]
        );
        assert!(!registry.toggle(WeightClass::Atomweight));
    }

    #[test]
    fn test_slots_partition_only_active_classes() {
        let active = [WeightClass::Flyweight, WeightClass::Heavyweight];
        assert_eq!(
            WeightClassRegistry::slot_position(WeightClass::Flyweight, &active, 800.0),
            Some(200.0)
        );
        assert_eq!(
            WeightClassRegistry::slot_position(WeightClass::Heavyweight, &active, 800.0),
            Some(600.0)
        );
        assert_eq!(
            WeightClassRegistry::slot_position(WeightClass::Lightweight, &active, 800.0),
            None
        );
        assert_eq!(
            WeightClassRegistry::slot_position(WeightClass::Heavyweight, &active[1..], 800.0),
            Some(400.0)
        );
    }

    #[test]
    fn test_recompute_never_restores_removed_class() {
        let mut builder = RosterBuilder::new();
        builder.ingest_fighters([FighterRecord {
            id: "1".to_owned(),
            name: "Solo".to_owned(),
            weight_class: "Bantamweight".to_owned(),
            height: None,
            weight: None,
        }]);
        let roster = builder.finish();

        let mut registry = registry(&[(WeightClass::Flyweight, 4)]);
        registry.recompute_population(&roster);
        assert!(registry.canonical().is_empty());
        assert!(!registry.contains(WeightClass::Bantamweight));
        assert!(registry.selected_classes().is_empty());
    }

    #[test]
    fn test_label_rows_alternate() {
        let registry = registry(&[
            (WeightClass::Flyweight, 1),
            (WeightClass::Lightweight, 1),
            (WeightClass::Heavyweight, 1),
        ]);
        let first = registry.label_position(WeightClass::Flyweight, 900.0, 100.0).unwrap();
        let second = registry.label_position(WeightClass::Lightweight, 900.0, 100.0).unwrap();
        assert_eq!(first, (150.0, 30.0));
        assert_eq!(second, (450.0, 80.0));
        assert!(registry.description(WeightClass::Lightweight).is_some());
        assert!(registry.description(WeightClass::Atomweight).is_none());
    }
}
