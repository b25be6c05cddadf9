//! PNG line charts for the three metric windows (feature `charts`)
//!
//! One chart per metric: calendar day on the x-axis, score / steps / hours
//! on the y-axis, records sorted by day. Empty windows are skipped.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::error::{Result, WellRsError};
use crate::models::{DailyRecord, MetricBundle, MetricWindow};

const CHART_SIZE: (u32, u32) = (800, 480);

/// Render one PNG per non-empty metric window into `output_dir`
///
/// Returns the paths of the charts written.
pub fn render_charts(bundle: &MetricBundle, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();

    if let Some(path) = render_window(
        &bundle.sleep,
        |r| r.score as f64,
        output_dir.join("sleep_score.png"),
        "Sleep Score",
        "score",
        Some(100.0),
    )? {
        written.push(path);
    }
    if let Some(path) = render_window(
        &bundle.activity,
        |r| r.steps as f64,
        output_dir.join("daily_steps.png"),
        "Daily Steps",
        "steps",
        None,
    )? {
        written.push(path);
    }
    if let Some(path) = render_window(
        &bundle.stress,
        |r| r.stress_high as f64 / 3600.0,
        output_dir.join("stress_hours.png"),
        "High-Stress Hours",
        "hours",
        None,
    )? {
        written.push(path);
    }

    Ok(written)
}

fn render_window<T, V>(
    window: &MetricWindow<T>,
    value: V,
    path: PathBuf,
    title: &str,
    y_desc: &str,
    y_max: Option<f64>,
) -> Result<Option<PathBuf>>
where
    T: DailyRecord + Clone,
    V: Fn(&T) -> f64,
{
    if window.is_empty() {
        return Ok(None);
    }

    let sorted = window.day_sorted();
    let labels: Vec<String> = sorted
        .iter()
        .map(|r| r.day().format("%m-%d").to_string())
        .collect();
    let values: Vec<f64> = sorted.iter().map(&value).collect();

    let top = y_max.unwrap_or_else(|| {
        let max = values.iter().cloned().fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    });

    draw_line_chart(&path, title, y_desc, &labels, &values, top)?;
    Ok(Some(path))
}

fn draw_line_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
    y_max: f64,
) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| WellRsError::Chart(e.to_string()))?;

    let x_range = 0..values.len().saturating_sub(1).max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(36)
        .y_label_area_size(48)
        .build_cartesian_2d(x_range, 0.0..y_max)
        .map_err(|e| WellRsError::Chart(e.to_string()))?;

    chart
        .configure_mesh()
        .y_desc(y_desc)
        .x_labels(labels.len())
        .x_label_formatter(&|idx| labels.get(*idx).cloned().unwrap_or_default())
        .draw()
        .map_err(|e| WellRsError::Chart(e.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            values.iter().enumerate().map(|(i, &v)| (i, v)),
            &BLUE,
        ))
        .map_err(|e| WellRsError::Chart(e.to_string()))?;
    chart
        .draw_series(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Circle::new((i, v), 3, BLUE.filled())),
        )
        .map_err(|e| WellRsError::Chart(e.to_string()))?;

    root.present()
        .map_err(|e| WellRsError::Chart(e.to_string()))?;
    Ok(())
}
