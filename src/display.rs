//! Terminal rendering of the dashboard
//!
//! Renders one fetch-compute cycle: a profile header, the composite crash
//! risk panel, a sub-score table, and three time-ordered sparkline charts.
//! All rendering is pure string building so it can be tested without a
//! terminal; `main` decides where the output goes.

use colored::{ColoredString, Colorize};
use tabled::{settings::Style, Table, Tabled};

use crate::models::{DailyRecord, MetricBundle, MetricWindow, UserProfile};
use crate::risk::{CompositeAssessment, RiskBand};

/// Unicode block characters for sparkline rendering (8 levels)
const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Tabled)]
struct SubScoreRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Window average")]
    average: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

/// Render the full dashboard for one cycle
pub fn render_dashboard(
    profile: &UserProfile,
    bundle: &MetricBundle,
    assessment: &CompositeAssessment,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "WellRS Crash Risk Dashboard".bold()));
    out.push_str(&render_profile_line(profile));
    out.push('\n');
    out.push_str(&render_composite_panel(assessment));
    out.push('\n');
    out.push_str(&render_sub_scores(assessment));
    out.push('\n');
    out.push_str(&render_charts(bundle));

    out
}

fn render_profile_line(profile: &UserProfile) -> String {
    let mut parts = Vec::new();
    if !profile.id.is_empty() {
        parts.push(format!("user {}", profile.id));
    }
    if let Some(age) = profile.age {
        parts.push(format!("{} y", age));
    }
    if let Some(weight) = profile.weight {
        parts.push(format!("{:.1} kg", weight));
    }
    if let Some(height) = profile.height {
        parts.push(format!("{:.2} m", height));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{}\n", parts.join(" · ").dimmed())
    }
}

fn render_composite_panel(assessment: &CompositeAssessment) -> String {
    match (assessment.composite, assessment.band) {
        (Some(composite), Some(band)) => {
            format!(
                "Crash risk: {} — {}\n{}\n{}\n",
                colorize_band(&format!("{}%", composite), band).bold(),
                colorize_band(&band.to_string(), band),
                band.description(),
                band.recommendation().dimmed(),
            )
        }
        _ => format!(
            "Crash risk: {}\n{}\n",
            "n/a".dimmed(),
            "Need sleep, activity, and stress data in the window to score.".dimmed()
        ),
    }
}

fn render_sub_scores(assessment: &CompositeAssessment) -> String {
    let rows = vec![
        SubScoreRow {
            metric: "Sleep",
            average: format_avg(assessment.avg_sleep_score, "score"),
            risk: format_risk(assessment.sleep_risk),
        },
        SubScoreRow {
            metric: "Activity",
            average: format_avg(assessment.avg_steps, "steps"),
            risk: format_risk(assessment.activity_risk),
        },
        SubScoreRow {
            metric: "Stress",
            average: format_avg(assessment.avg_stress_hours, "h high stress"),
            risk: format_risk(assessment.stress_risk),
        },
    ];

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

fn format_avg(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", trim_float(v), unit),
        None => "no data".to_string(),
    }
}

fn format_risk(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}%", v.round() as i64),
        None => "—".to_string(),
    }
}

fn trim_float(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn render_charts(bundle: &MetricBundle) -> String {
    let mut out = String::new();
    out.push_str(&render_chart_line(
        "Sleep score ",
        &bundle.sleep,
        |r| r.score as f64,
        |v| format!("{}", v.round() as i64),
    ));
    out.push_str(&render_chart_line(
        "Daily steps ",
        &bundle.activity,
        |r| r.steps as f64,
        |v| format!("{}", v.round() as i64),
    ));
    out.push_str(&render_chart_line(
        "Stress hours",
        &bundle.stress,
        |r| r.stress_high as f64 / 3600.0,
        |v| format!("{:.1}", v),
    ));
    out
}

/// One metric chart: label, day-ordered sparkline, values, and date range
fn render_chart_line<T, V, F>(
    label: &str,
    window: &MetricWindow<T>,
    value: V,
    format_value: F,
) -> String
where
    T: DailyRecord + Clone,
    V: Fn(&T) -> f64,
    F: Fn(f64) -> String,
{
    if window.is_empty() {
        return format!("{}  {}\n", label, "no data in window".dimmed());
    }

    let sorted = window.day_sorted();
    let values: Vec<f64> = sorted.iter().map(&value).collect();
    let rendered: Vec<String> = values.iter().map(|&v| format_value(v)).collect();
    let first = sorted.first().map(|r| r.day()).unwrap_or_default();
    let last = sorted.last().map(|r| r.day()).unwrap_or_default();

    format!(
        "{}  {}  {}  ({} → {})\n",
        label,
        sparkline(&values),
        rendered.join(" "),
        first,
        last
    )
}

/// Render a sparkline, normalizing values to the window's own range
pub fn sparkline(values: &[f64]) -> String {
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let span = max - min;

    values
        .iter()
        .map(|&v| {
            let normalized = if span > f64::EPSILON {
                (v - min) / span
            } else {
                0.5
            };
            let idx = (normalized.clamp(0.0, 1.0) * 7.0).round() as usize;
            SPARK_CHARS[idx.min(7)]
        })
        .collect()
}

fn colorize_band(text: &str, band: RiskBand) -> ColoredString {
    match band {
        RiskBand::Minimal => text.green(),
        RiskBand::Low => text.green(),
        RiskBand::Moderate => text.yellow(),
        RiskBand::Elevated => text.red(),
        RiskBand::Critical => text.red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyActivityRecord, DailySleepRecord, DailyStressRecord};
    use crate::risk::RiskCalculator;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn test_bundle() -> MetricBundle {
        MetricBundle {
            sleep: MetricWindow::from_records(vec![
                DailySleepRecord { day: d(2), score: 70 },
                DailySleepRecord { day: d(1), score: 70 },
            ]),
            activity: MetricWindow::from_records(vec![
                DailyActivityRecord { day: d(1), steps: 6000 },
                DailyActivityRecord { day: d(2), steps: 6000 },
            ]),
            stress: MetricWindow::from_records(vec![
                DailyStressRecord { day: d(1), stress_high: 9000 },
                DailyStressRecord { day: d(2), stress_high: 9000 },
            ]),
        }
    }

    #[test]
    fn test_dashboard_shows_composite_and_band() {
        colored::control::set_override(false);
        let bundle = test_bundle();
        let assessment = RiskCalculator::new().assess(&bundle);
        let out = render_dashboard(&UserProfile::default(), &bundle, &assessment);

        assert!(out.contains("43%"));
        assert!(out.contains("Moderate"));
        assert!(out.contains("Sleep score"));
        assert!(out.contains("2024-06-01 → 2024-06-02"));
    }

    #[test]
    fn test_dashboard_incomplete_bundle() {
        colored::control::set_override(false);
        let mut bundle = test_bundle();
        bundle.activity = MetricWindow::empty();
        let assessment = RiskCalculator::new().assess(&bundle);
        let out = render_dashboard(&UserProfile::default(), &bundle, &assessment);

        assert!(out.contains("n/a"));
        assert!(out.contains("no data"));
        // Sub-scores for the surviving windows still render
        assert!(out.contains("30%"));
    }

    #[test]
    fn test_profile_header() {
        colored::control::set_override(false);
        let profile = UserProfile {
            id: "u1".to_string(),
            age: Some(31),
            weight: Some(70.0),
            height: Some(1.80),
        };
        let out = render_profile_line(&profile);
        assert!(out.contains("u1"));
        assert!(out.contains("31 y"));
        assert!(out.contains("1.80 m"));
    }

    #[test]
    fn test_sparkline_shape() {
        let line = sparkline(&[0.0, 50.0, 100.0]);
        assert_eq!(line.chars().count(), 3);
        assert_eq!(line.chars().next().unwrap(), '▁');
        assert_eq!(line.chars().last().unwrap(), '█');
    }

    #[test]
    fn test_sparkline_flat_series() {
        let line = sparkline(&[5.0, 5.0, 5.0]);
        // All identical values render at mid height
        assert!(line.chars().all(|c| c == '▅'));
    }
}
