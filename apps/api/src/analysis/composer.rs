//! Score Composer: weighted sum of sub-scores, optional boost bands, cap.

use serde::{Deserialize, Serialize};

use crate::analysis::models::{round_to, ScoreBreakdown, ScoreComponent};

/// A sub-score (0–100) and its share of the composite (0.0–1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedComponent {
    pub name: &'static str,
    pub score: f64,
    pub weight: f64,
}

/// Additive bonus for a composite in `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostBand {
    pub min: f64,
    pub max: f64,
    pub bonus: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRules {
    pub boost_bands: Vec<BoostBand>,
    pub cap: u32,
}

impl CompositionRules {
    /// Contract profile: bands lift mid-range composites, hard cap 100.
    pub fn contract() -> Self {
        Self {
            boost_bands: vec![
                BoostBand {
                    min: 45.0,
                    max: 60.0,
                    bonus: 15.0,
                },
                BoostBand {
                    min: 60.0,
                    max: 75.0,
                    bonus: 10.0,
                },
                BoostBand {
                    min: 75.0,
                    max: 85.0,
                    bonus: 5.0,
                },
            ],
            cap: 100,
        }
    }

    /// Categorized profile: no boost, capped at 95.
    pub fn categorized() -> Self {
        Self {
            boost_bands: vec![],
            cap: 95,
        }
    }

    fn boost_for(&self, composite: f64) -> f64 {
        self.boost_bands
            .iter()
            .find(|band| composite >= band.min && composite < band.max)
            .map(|band| band.bonus)
            .unwrap_or(0.0)
    }
}

/// Returns the final integer score and the per-component breakdown.
pub fn compose(
    components: &[WeightedComponent],
    rules: &CompositionRules,
    optimized: bool,
) -> (u32, ScoreBreakdown) {
    let mut composite = 0.0;
    let mut breakdown = Vec::with_capacity(components.len());

    for component in components {
        let score = component.score.clamp(0.0, 100.0);
        let contribution = score * component.weight;
        composite += contribution;
        breakdown.push(ScoreComponent {
            name: component.name.to_string(),
            score: round_to(score, 2),
            weight: (component.weight * 100.0).round() as u32,
            contribution: contribution.round() as u32,
        });
    }

    if optimized {
        composite += rules.boost_for(composite);
    }

    let overall = composite.round().clamp(0.0, f64::from(rules.cap)) as u32;
    (overall, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract_components(
        matched: f64,
        density: f64,
        length: f64,
        format: f64,
    ) -> Vec<WeightedComponent> {
        vec![
            WeightedComponent {
                name: "Skill Match",
                score: matched,
                weight: 0.70,
            },
            WeightedComponent {
                name: "Keyword Density",
                score: density,
                weight: 0.15,
            },
            WeightedComponent {
                name: "Resume Length",
                score: length,
                weight: 0.05,
            },
            WeightedComponent {
                name: "Formatting",
                score: format,
                weight: 0.10,
            },
        ]
    }

    #[test]
    fn test_weighted_sum_without_boost() {
        let (score, breakdown) = compose(
            &contract_components(50.0, 100.0, 100.0, 80.0),
            &CompositionRules::contract(),
            false,
        );
        // 35 + 15 + 5 + 8
        assert_eq!(score, 63);
        assert_eq!(breakdown.len(), 4);
        assert_eq!(breakdown[0].weight, 70);
        assert_eq!(breakdown[0].contribution, 35);
        assert_eq!(breakdown[3].contribution, 8);
    }

    #[test]
    fn test_boost_bands() {
        let rules = CompositionRules::contract();
        // 63 → +10
        let (score, _) = compose(&contract_components(50.0, 100.0, 100.0, 80.0), &rules, true);
        assert_eq!(score, 73);
        // 0.7×40 + 15 + 5 + 0 = 48 → +15
        let (score, _) = compose(&contract_components(40.0, 100.0, 100.0, 0.0), &rules, true);
        assert_eq!(score, 63);
        // 0.7×100 + 0 + 5 + 10 = 85 → no band
        let (score, _) = compose(&contract_components(100.0, 0.0, 100.0, 100.0), &rules, true);
        assert_eq!(score, 85);
    }

    #[test]
    fn test_cap_is_enforced() {
        let (score, _) = compose(
            &contract_components(100.0, 100.0, 100.0, 100.0),
            &CompositionRules::categorized(),
            true,
        );
        assert_eq!(score, 95);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let (score, breakdown) = compose(
            &contract_components(250.0, -40.0, 100.0, 100.0),
            &CompositionRules::contract(),
            false,
        );
        assert_eq!(breakdown[0].score, 100.0);
        assert_eq!(breakdown[1].score, 0.0);
        assert!(score <= 100);
    }
}
