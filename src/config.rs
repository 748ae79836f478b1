/// Tunables grouped by the component that reads them. Defaults are the values
/// the visualization was tuned with.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub roster: RosterConfig,
    pub layout: LayoutConfig,
    pub focus: FocusConfig,
}

#[derive(Clone, Debug)]
pub struct RosterConfig {
    /// Fighters with fewer bouts are pruned before the graph is built.
    pub min_fight_count: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            min_fight_count: 10,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Height reserved at the top of the canvas for weight-class labels.
    pub label_band: f32,
    pub margin: f32,
    pub repulsion_strength: f32,
    pub repulsion_max_distance: f32,
    /// Link rest length when the whole roster is visible.
    pub base_link_distance: f32,
    pub max_link_distance: f32,
    pub cluster_strength: f32,
    pub velocity_decay: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    /// Alpha used when a finished view transition restarts the simulation.
    pub reheat_alpha: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            label_band: 100.0,
            margin: 50.0,
            repulsion_strength: 30.0,
            repulsion_max_distance: 300.0,
            base_link_distance: 100.0,
            max_link_distance: 420.0,
            cluster_strength: 0.1,
            velocity_decay: 0.4,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            reheat_alpha: 0.3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FocusConfig {
    pub selection_scale: f32,
    pub transition_secs: f32,
    pub faded_opacity: f32,
    /// Idle mode shows this many labels per active class.
    pub labels_per_class: usize,
    pub tooltip_size: [f32; 2],
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            selection_scale: 1.5,
            transition_secs: 0.75,
            faded_opacity: 0.1,
            labels_per_class: 1,
            tooltip_size: [200.0, 112.0],
        }
    }
}
