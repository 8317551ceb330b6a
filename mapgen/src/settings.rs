/// Ambient, non-template-driven constants the filler pipeline needs (§9
/// "Global catalogs" design note): magic numbers the original spec states
/// outright rather than deriving from the template get one home here
/// instead of being scattered through the algorithm modules.
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Squared-distance threshold a fractal branch must clear before the
    /// network stops growing it (§4.3).
    pub fractal_min_distance: f32,
    /// Fraction of `fractal_min_distance` used for the final blocking pass
    /// that prunes stray `Possible` tiles after fractalizing.
    pub fractal_prune_fraction: f32,
    /// Hard cap on tighten-phase iterations in the stack composer (§4.6).
    pub tighten_max_iterations: u32,
    /// Starting coefficient (and per-retry decrement) used when relaxing
    /// the minimum acceptable leader value during leader selection (§4.6).
    pub leader_min_value_coeff_start: f32,
    pub leader_min_value_coeff_step: f32,
    /// Footprint + minimum spacing used when probing sites (§4.8).
    pub site_probe_size: i32,
    pub site_min_distance: f32,
    /// Footprint + minimum spacing used when probing neutral cities.
    pub city_probe_size: i32,
    pub city_min_distance: f32,
    /// Chance, in percent, that a too-large obstacle candidate gets
    /// replaced by a landmark instead of being skipped (§4.9).
    pub landmark_substitution_pct: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            fractal_min_distance: 75.0,
            fractal_prune_fraction: 0.25,
            tighten_max_iterations: 200,
            leader_min_value_coeff_start: 0.65,
            leader_min_value_coeff_step: 0.15,
            site_probe_size: 3,
            site_min_distance: 6.0,
            city_probe_size: 4,
            city_min_distance: 8.0,
            landmark_substitution_pct: 20,
        }
    }
}
