use std::fmt;

/// Divisions in canonical order, lightest first. The discriminant is the rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeightClass {
    Atomweight,
    Strawweight,
    Flyweight,
    Bantamweight,
    Featherweight,
    Lightweight,
    Welterweight,
    Middleweight,
    LightHeavyweight,
    Heavyweight,
    SuperHeavyweight,
}

impl WeightClass {
    pub const ALL: [WeightClass; 11] = [
        Self::Atomweight,
        Self::Strawweight,
        Self::Flyweight,
        Self::Bantamweight,
        Self::Featherweight,
        Self::Lightweight,
        Self::Welterweight,
        Self::Middleweight,
        Self::LightHeavyweight,
        Self::Heavyweight,
        Self::SuperHeavyweight,
    ];

    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Atomweight => "Atomweight",
            Self::Strawweight => "Strawweight",
            Self::Flyweight => "Flyweight",
            Self::Bantamweight => "Bantamweight",
            Self::Featherweight => "Featherweight",
            Self::Lightweight => "Lightweight",
            Self::Welterweight => "Welterweight",
            Self::Middleweight => "Middleweight",
            Self::LightHeavyweight => "Light Heavyweight",
            Self::Heavyweight => "Heavyweight",
            Self::SuperHeavyweight => "Super Heavyweight",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Atomweight => "<105 lb (women only)",
            Self::Strawweight => "<115 lb",
            Self::Flyweight => "115-125 lb",
            Self::Bantamweight => "125-135 lb",
            Self::Featherweight => "135-145 lb",
            Self::Lightweight => "145-155 lb",
            Self::Welterweight => "155-170 lb",
            Self::Middleweight => "170-185 lb",
            Self::LightHeavyweight => "185-205 lb",
            Self::Heavyweight => "205-265 lb",
            Self::SuperHeavyweight => ">265 lb",
        }
    }

    /// Matches the division name as it appears in the source data. Surrounding
    /// whitespace and ASCII case are ignored.
    pub fn from_name(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for WeightClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
