//! Tunables for a round. Defaults are the shipped game feel; every probability
//! and step span below is observable behaviour, so change them deliberately.

#[cfg(feature = "serde")]
use serde::Deserialize;

/// One speed tier of the bounded random walk.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct SpeedTier {
    /// Probability mass of this tier (tiers are tried in order).
    pub weight: f64,
    /// Full step span per axis; a step is `(u - 0.5) * span`.
    pub span: f64,
}

/// Ids of the host page elements the game binds to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct ElementIds {
    pub target: String,
    pub area: String,
    pub count: String,
    pub rate: String,
    pub timer: String,
    pub taunt: String,
    /// Optional; a page without it simply has no restart control.
    pub restart: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            target: "clickButton".into(),
            area: "gameArea".into(),
            count: "clickCount".into(),
            rate: "cps".into(),
            timer: "timer".into(),
            taunt: "annoyingMessage".into(),
            restart: "restartBtn".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct GameConfig {
    // --- Timing (ms) ---
    pub round_ms: f64,
    pub movement_interval_ms: f64,
    pub clock_interval_ms: f64,
    pub rate_interval_ms: f64,
    pub pulse_ms: f64,
    pub pulse_scale: f64,
    pub effect_ms: f64,

    // --- Movement policy ---
    pub teleport_chance: f64,
    pub tiers: [SpeedTier; 3],
    pub avoid_chance: f64,
    pub avoid_factor: f64,
    pub rescale_chance: f64,
    pub min_scale: f64,
    pub max_scale: f64,

    /// Fixed RNG seed; `None` seeds from the clock at mount.
    pub seed: Option<u64>,
    pub ids: ElementIds,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_ms: 5_000.0,
            movement_interval_ms: 100.0,
            clock_interval_ms: 100.0,
            rate_interval_ms: 50.0,
            pulse_ms: 100.0,
            pulse_scale: 0.8,
            effect_ms: 300.0,
            teleport_chance: 0.3,
            tiers: [
                SpeedTier { weight: 0.4, span: 15.0 }, // slow, +-7.5px
                SpeedTier { weight: 0.3, span: 25.0 }, // medium, +-12.5px
                SpeedTier { weight: 0.3, span: 40.0 }, // fast, +-20px
            ],
            avoid_chance: 0.1,
            avoid_factor: 0.1,
            rescale_chance: 0.1,
            min_scale: 0.8,
            max_scale: 1.2,
            seed: None,
            ids: ElementIds::default(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl GameConfig {
    /// Parse a (possibly partial) JSON object; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, crate::GameError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers_cover_unit_interval() {
        let cfg = GameConfig::default();
        let total: f64 = cfg.tiers.iter().map(|t| t.weight).sum();
        assert!((total - 1.0).abs() < 1e-9, "tier weights sum to {total}");
    }

    #[test]
    fn default_scale_range_contains_identity() {
        let cfg = GameConfig::default();
        assert!(cfg.min_scale <= 1.0 && 1.0 <= cfg.max_scale);
        assert!(cfg.pulse_scale >= cfg.min_scale);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"round_ms": 3000, "seed": 7, "ids": {"restart": "again"}}"#)
            .expect("valid json");
        assert_eq!(cfg.round_ms, 3000.0);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.ids.restart, "again");
        assert_eq!(cfg.ids.target, "clickButton");
        assert_eq!(cfg.teleport_chance, 0.3);
    }
}
