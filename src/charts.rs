//! Chart rendering
//!
//! Two charts exist: the visualization attached to a chat reply (a line plot
//! written to a fixed file that every render overwrites) and the analytics
//! bar chart, which is rendered to an in-memory SVG document.

use crate::session::MessageCounts;
use crate::types::{AppError, AppResult};
use anyhow::Result;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Placeholder dataset attached to visualization requests: x = 0..=9, y = x².
pub fn sample_dataset() -> Vec<(f64, f64)> {
    (0..10).map(|i| (i as f64, (i * i) as f64)).collect()
}

/// Writes line plots to a single fixed artifact path.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_path: PathBuf,
}

impl ChartRenderer {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render `points` as a line plot, replacing any previous artifact.
    pub fn render(&self, points: &[(f64, f64)]) -> AppResult<PathBuf> {
        if points.is_empty() {
            return Err(AppError::RenderFailed("dataset is empty".to_string()));
        }

        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::RenderFailed(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        write_line_chart(&self.output_path, points).map_err(|e| {
            error!(path = %self.output_path.display(), error = %e, "Failed to render chart");
            AppError::RenderFailed(e.to_string())
        })?;

        debug!(path = %self.output_path.display(), points = points.len(), "Chart written");
        Ok(self.output_path.clone())
    }
}

fn padded_range(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    if max - min < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad, max + pad)
    }
}

pub fn write_line_chart(output_path: &Path, points: &[(f64, f64)]) -> Result<()> {
    let (x_min, x_max) = padded_range(points.iter().map(|p| p.0));
    let (y_min, y_max) = padded_range(points.iter().map(|p| p.1));

    let root = SVGBackend::new(output_path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("Sample Visualization", ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("X-axis")
        .y_desc("Y-axis")
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Bar comparison of user and bot message counts as an SVG document.
pub fn message_bar_chart_svg(counts: &MessageCounts) -> AppResult<String> {
    let mut svg = String::new();
    write_message_bar_chart(&mut svg, counts).map_err(|e| AppError::RenderFailed(e.to_string()))?;
    Ok(svg)
}

fn write_message_bar_chart(buffer: &mut String, counts: &MessageCounts) -> Result<()> {
    let bars = [("User", counts.user, BLUE), ("Bot", counts.assistant, GREEN)];
    let y_max = counts.user.max(counts.assistant).max(1) as f64 * 1.1;

    let root = SVGBackend::with_string(buffer, (640, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption("User vs Bot Messages", ("sans-serif", 22))
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..bars.len() as f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len() * 2 + 1)
        .x_label_formatter(&|x| {
            // Labels sit at bar centres only.
            let idx = x.floor() as usize;
            if (x.fract() - 0.5).abs() < 1e-6 {
                bars.get(idx).map(|b| b.0.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .y_desc("Message Count")
        .draw()?;

    for (idx, (_, count, color)) in bars.iter().enumerate() {
        let left = idx as f64 + 0.15;
        let right = idx as f64 + 0.85;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, 0.0), (right, *count as f64)],
            color.filled(),
        )))?;
    }

    root.present()?;
    Ok(())
}
