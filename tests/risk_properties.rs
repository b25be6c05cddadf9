use chrono::NaiveDate;
use proptest::prelude::*;

use wellrs::models::{
    DailyActivityRecord, DailySleepRecord, DailyStressRecord, MetricBundle,
};
use wellrs::risk::{RiskBand, RiskCalculator};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, (day % 28) + 1).unwrap()
}

fn bundle_from(scores: Vec<u8>, steps: Vec<u32>, stress: Vec<u32>) -> MetricBundle {
    MetricBundle {
        sleep: scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| DailySleepRecord {
                day: d(i as u32),
                score,
            })
            .collect(),
        activity: steps
            .into_iter()
            .enumerate()
            .map(|(i, steps)| DailyActivityRecord { day: d(i as u32), steps })
            .collect(),
        stress: stress
            .into_iter()
            .enumerate()
            .map(|(i, stress_high)| DailyStressRecord {
                day: d(i as u32),
                stress_high,
            })
            .collect(),
    }
}

proptest! {
    /// Sub-scores and the composite always land in [0, 100]
    #[test]
    fn risks_always_bounded(
        scores in prop::collection::vec(0u8..=100, 1..6),
        steps in prop::collection::vec(0u32..50_000, 1..6),
        stress in prop::collection::vec(0u32..86_400, 1..6),
    ) {
        let assessment = RiskCalculator::new().assess(&bundle_from(scores, steps, stress));

        for risk in [assessment.sleep_risk, assessment.activity_risk, assessment.stress_risk] {
            let risk = risk.unwrap();
            prop_assert!((0.0..=100.0).contains(&risk));
        }
        prop_assert!(assessment.composite.unwrap() <= 100);
        prop_assert!(assessment.band.is_some());
    }

    /// Sleep risk is exactly the inverse of the rounded average score
    #[test]
    fn sleep_risk_is_inverse_average(scores in prop::collection::vec(0u8..=100, 1..6)) {
        let expected_avg =
            (scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64).round();
        let bundle = bundle_from(scores, vec![5000], vec![3600]);

        let assessment = RiskCalculator::new().assess(&bundle);
        prop_assert_eq!(assessment.avg_sleep_score, Some(expected_avg));
        prop_assert_eq!(assessment.sleep_risk, Some(100.0 - expected_avg));
    }

    /// Activity risk never increases as average steps increase
    #[test]
    fn activity_risk_monotone_nonincreasing(a in 0.0f64..50_000.0, b in 0.0f64..50_000.0) {
        let calculator = RiskCalculator::new();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(calculator.activity_risk(lo) >= calculator.activity_risk(hi));
    }

    /// Stress risk never decreases as average high-stress hours increase
    #[test]
    fn stress_risk_monotone_nondecreasing(a in 0.0f64..24.0, b in 0.0f64..24.0) {
        let calculator = RiskCalculator::new();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(calculator.stress_risk(lo) <= calculator.stress_risk(hi));
    }

    /// The band is a step function of the composite with the documented
    /// breakpoints, exclusive on the lower side
    #[test]
    fn band_step_function(composite in 0u8..=100) {
        let band = RiskBand::from_composite(composite);
        let expected = if composite > 80 {
            RiskBand::Critical
        } else if composite > 60 {
            RiskBand::Elevated
        } else if composite > 40 {
            RiskBand::Moderate
        } else if composite > 20 {
            RiskBand::Low
        } else {
            RiskBand::Minimal
        };
        prop_assert_eq!(band, expected);
    }

    /// Identical inputs always produce identical assessments
    #[test]
    fn assessment_is_pure(
        scores in prop::collection::vec(0u8..=100, 0..6),
        steps in prop::collection::vec(0u32..50_000, 0..6),
        stress in prop::collection::vec(0u32..86_400, 0..6),
    ) {
        let bundle = bundle_from(scores, steps, stress);
        let calculator = RiskCalculator::new();
        prop_assert_eq!(calculator.assess(&bundle), calculator.assess(&bundle));
    }
}
