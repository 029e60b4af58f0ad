use crate::config::{BandBoundaries, ComponentWeights};
use serde::{Deserialize, Serialize};

/// The three scored components, used to key calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Text,
    Url,
    Sender,
}

/// Pluggable per-component monotone transform applied to a raw 0-100 score
/// before weighting. Implementations must not reorder scores: a higher raw
/// score may never calibrate below a lower one.
pub trait Calibrator: Send + Sync {
    fn calibrate(&self, component: Component, raw: u32) -> f64;
}

/// Default calibration: pass the raw score through unchanged.
#[derive(Debug, Default)]
pub struct IdentityCalibrator;

impl Calibrator for IdentityCalibrator {
    fn calibrate(&self, _component: Component, raw: u32) -> f64 {
        raw.min(100) as f64
    }
}

/// Risk band with display metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Safe,
    Caution,
    HighRisk,
}

impl RiskBand {
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Safe => "Safe",
            RiskBand::Caution => "Caution",
            RiskBand::HighRisk => "High Risk",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Safe => "#2e7d32",
            RiskBand::Caution => "#f9a825",
            RiskBand::HighRisk => "#c62828",
        }
    }

    pub fn for_score(score: u32, bands: &BandBoundaries) -> Self {
        if score <= bands.safe_max {
            RiskBand::Safe
        } else if score <= bands.caution_max {
            RiskBand::Caution
        } else {
            RiskBand::HighRisk
        }
    }
}

/// Calibrate each component, weight, and normalize to a final 0-100 score.
/// Weights are treated as summing to 1.
pub fn aggregate(
    text: u32,
    url: u32,
    sender: u32,
    weights: &ComponentWeights,
    calibrator: &dyn Calibrator,
) -> u32 {
    let text_frac = calibrator.calibrate(Component::Text, text) / 100.0;
    let url_frac = calibrator.calibrate(Component::Url, url) / 100.0;
    let sender_frac = calibrator.calibrate(Component::Sender, sender) / 100.0;

    let combined =
        text_frac * weights.text + url_frac * weights.url + sender_frac * weights.sender;

    ((combined * 100.0).round() as i64).clamp(0, 100) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_aggregate() {
        let weights = ComponentWeights::default();
        let score = aggregate(100, 100, 100, &weights, &IdentityCalibrator);
        assert_eq!(score, 100);

        let score = aggregate(0, 0, 0, &weights, &IdentityCalibrator);
        assert_eq!(score, 0);

        // 0.35*50 + 0.40*60 + 0.25*20 = 17.5 + 24 + 5 = 46.5 -> 47
        let score = aggregate(50, 60, 20, &weights, &IdentityCalibrator);
        assert_eq!(score, 47);
    }

    #[test]
    fn aggregation_is_monotone() {
        let weights = ComponentWeights::default();
        let base = aggregate(40, 55, 10, &weights, &IdentityCalibrator);
        for bump in [41, 60, 80, 100] {
            assert!(aggregate(bump, 55, 10, &weights, &IdentityCalibrator) >= base);
            assert!(aggregate(40, bump, 10, &weights, &IdentityCalibrator) >= base);
            assert!(aggregate(40, 55, bump, &weights, &IdentityCalibrator) >= base);
        }
    }

    #[test]
    fn custom_monotone_calibrator() {
        struct Squash;
        impl Calibrator for Squash {
            fn calibrate(&self, _c: Component, raw: u32) -> f64 {
                // Square-root curve, still monotone.
                (raw as f64).sqrt() * 10.0
            }
        }
        let weights = ComponentWeights::default();
        let low = aggregate(25, 25, 25, &weights, &Squash);
        let high = aggregate(100, 100, 100, &weights, &Squash);
        assert_eq!(low, 50);
        assert_eq!(high, 100);
    }

    #[test]
    fn band_boundaries() {
        let bands = BandBoundaries::default();
        assert_eq!(RiskBand::for_score(0, &bands), RiskBand::Safe);
        assert_eq!(RiskBand::for_score(29, &bands), RiskBand::Safe);
        assert_eq!(RiskBand::for_score(30, &bands), RiskBand::Caution);
        assert_eq!(RiskBand::for_score(69, &bands), RiskBand::Caution);
        assert_eq!(RiskBand::for_score(70, &bands), RiskBand::HighRisk);
        assert_eq!(RiskBand::for_score(100, &bands), RiskBand::HighRisk);
    }

    #[test]
    fn tenant_boundary_shift() {
        let bands = BandBoundaries {
            safe_max: 9,
            caution_max: 49,
        };
        assert_eq!(RiskBand::for_score(10, &bands), RiskBand::Caution);
        assert_eq!(RiskBand::for_score(50, &bands), RiskBand::HighRisk);
    }
}
