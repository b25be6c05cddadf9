//! Crash risk aggregation engine
//!
//! Derives a composite 0-100 "crash risk" assessment from the trailing
//! windows of daily sleep, activity, and stress data. Risk scores are
//! oriented so that higher always means worse:
//!
//! - **Sleep risk**: inverse of the average upstream sleep score. A window
//!   averaging a sleep score of 70 carries a sleep risk of 30.
//! - **Activity risk**: linear in average daily steps between two anchor
//!   points, 2,000 steps (risk 100) and 10,000 steps (risk 0).
//! - **Stress risk**: linear in average daily high-stress hours between
//!   1 hour (risk 0) and 4 hours (risk 100).
//! - **Composite**: unweighted mean of the three risks, rounded to the
//!   nearest integer, defined only when all three windows carry data.
//!
//! The engine is a pure function of its inputs: no I/O, no hidden state,
//! identical windows always produce identical assessments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::MetricBundle;

/// Risk formula anchor points
///
/// Defaults reproduce the reference formulas exactly; the anchors are kept
/// configurable so the linear maps can be re-tuned without touching the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Average daily steps at which activity risk saturates at 100
    pub steps_floor: f64,

    /// Average daily steps at or above which activity risk is 0
    pub steps_ceiling: f64,

    /// Average daily high-stress hours at or below which stress risk is 0
    pub stress_low_hours: f64,

    /// Average daily high-stress hours at which stress risk saturates at 100
    pub stress_high_hours: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            steps_floor: 2000.0,
            steps_ceiling: 10000.0,
            stress_low_hours: 1.0,
            stress_high_hours: 4.0,
        }
    }
}

/// Risk band assigned by thresholding the composite score
///
/// Bands are evaluated in descending threshold order with exclusive
/// boundaries: a composite of exactly 80 is Elevated, not Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    /// Composite 0-20: metrics look healthy across the board
    Minimal,
    /// Composite 21-40: minor strain, nothing actionable
    Low,
    /// Composite 41-60: mixed signals worth watching
    Moderate,
    /// Composite 61-80: sustained strain, recovery is overdue
    Elevated,
    /// Composite 81-100: every stream points the wrong way
    Critical,
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Minimal => write!(f, "Minimal"),
            RiskBand::Low => write!(f, "Low"),
            RiskBand::Moderate => write!(f, "Moderate"),
            RiskBand::Elevated => write!(f, "Elevated"),
            RiskBand::Critical => write!(f, "Critical"),
        }
    }
}

impl RiskBand {
    /// Band for a composite score (0-100)
    pub fn from_composite(composite: u8) -> Self {
        if composite > 80 {
            RiskBand::Critical
        } else if composite > 60 {
            RiskBand::Elevated
        } else if composite > 40 {
            RiskBand::Moderate
        } else if composite > 20 {
            RiskBand::Low
        } else {
            RiskBand::Minimal
        }
    }

    /// Short description of what this band means
    pub fn description(&self) -> &'static str {
        match self {
            RiskBand::Minimal => "Well recovered",
            RiskBand::Low => "You're fine",
            RiskBand::Moderate => "Middling — keep an eye on it",
            RiskBand::Elevated => "Running on fumes",
            RiskBand::Critical => "Crash incoming",
        }
    }

    /// Suggested action for this band
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskBand::Minimal => "Carry on as you are",
            RiskBand::Low => "Normal routine; no changes needed",
            RiskBand::Moderate => "Prioritize sleep and a walk today",
            RiskBand::Elevated => "Log off early and rest",
            RiskBand::Critical => "Clear your schedule and recover",
        }
    }
}

/// Derived assessment for one fetch cycle
///
/// Sub-scores and averages are `None` when their source window was empty;
/// the composite and band are `None` unless all three sub-scores exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeAssessment {
    /// Average sleep score over the window, rounded to the nearest integer
    pub avg_sleep_score: Option<f64>,

    /// Average daily steps over the window, rounded to the nearest integer
    pub avg_steps: Option<f64>,

    /// Average daily high-stress hours, rounded to one decimal place
    pub avg_stress_hours: Option<f64>,

    /// Sleep risk (0-100, higher is worse)
    pub sleep_risk: Option<f64>,

    /// Activity risk (0-100, higher is worse)
    pub activity_risk: Option<f64>,

    /// Stress risk (0-100, higher is worse)
    pub stress_risk: Option<f64>,

    /// Composite crash risk, defined only when all three windows have data
    pub composite: Option<u8>,

    /// Band label for the composite
    pub band: Option<RiskBand>,
}

impl CompositeAssessment {
    /// True iff a composite score was produced
    pub fn is_complete(&self) -> bool {
        self.composite.is_some()
    }
}

/// Pure calculator from metric windows to a composite assessment
#[derive(Debug, Clone, Default)]
pub struct RiskCalculator {
    config: RiskConfig,
}

impl RiskCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RiskConfig) -> Self {
        RiskCalculator { config }
    }

    /// Assess one bundle of metric windows
    ///
    /// Each sub-score is computed only from a non-empty window; the
    /// composite is produced iff all three sub-scores exist. An incomplete
    /// bundle is a documented degraded state, not an error.
    pub fn assess(&self, bundle: &MetricBundle) -> CompositeAssessment {
        let avg_sleep_score = bundle
            .sleep
            .average_by(|r| r.score as f64)
            .map(|avg| avg.round());
        let avg_steps = bundle
            .activity
            .average_by(|r| r.steps as f64)
            .map(|avg| avg.round());
        let avg_stress_hours = bundle
            .stress
            .average_by(|r| r.stress_high as f64)
            .map(|avg| round1(avg / 3600.0));

        let sleep_risk = avg_sleep_score.map(|avg| clamp_risk(100.0 - avg));
        let activity_risk = avg_steps.map(|avg| self.activity_risk(avg));
        let stress_risk = avg_stress_hours.map(|hours| self.stress_risk(hours));

        let composite = match (sleep_risk, activity_risk, stress_risk) {
            (Some(s), Some(a), Some(st)) => Some(((s + a + st) / 3.0).round() as u8),
            _ => None,
        };
        let band = composite.map(RiskBand::from_composite);

        CompositeAssessment {
            avg_sleep_score,
            avg_steps,
            avg_stress_hours,
            sleep_risk,
            activity_risk,
            stress_risk,
            composite,
            band,
        }
    }

    /// Activity risk from an average daily step count
    ///
    /// Linear between the anchors: `steps_floor` steps maps to 100,
    /// `steps_ceiling` to 0, clamped outside that range.
    pub fn activity_risk(&self, avg_steps: f64) -> f64 {
        let span = self.config.steps_ceiling - self.config.steps_floor;
        let risk = (self.config.steps_ceiling - avg_steps) / (span / 100.0);
        clamp_risk(risk.round())
    }

    /// Stress risk from average daily high-stress hours
    ///
    /// Linear between the anchors: `stress_low_hours` maps to 0,
    /// `stress_high_hours` to 100, clamped outside that range.
    pub fn stress_risk(&self, avg_hours: f64) -> f64 {
        let span = self.config.stress_high_hours - self.config.stress_low_hours;
        let risk = (avg_hours - self.config.stress_low_hours) * (100.0 / span);
        clamp_risk(risk)
    }
}

fn clamp_risk(risk: f64) -> f64 {
    risk.clamp(0.0, 100.0)
}

/// Round to one decimal place
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
