// ============================================================
// Layer 6 — Training Curves
// ============================================================
// Renders the four curves of a run as PNG line charts:
//
//   output_graphs/training_loss.png     x = every epoch
//   output_graphs/training_acc.png
//   output_graphs/validation_loss.png   x = 1, 1 + val_every, ...
//   output_graphs/validation_acc.png
//
// The y axis always starts at 0. The bitmap backend is built
// without a font engine, so the charts carry no text; the file
// name says what is plotted and metrics.csv holds the numbers.
//
// Reference: plotters crate documentation

use anyhow::{Context, Result};
use plotters::prelude::{BitMapBackend, ChartBuilder, IntoDrawingArea, LineSeries, BLUE, WHITE};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::infra::metrics::EpochMetrics;

const GRAPH_DIR: &str = "output_graphs";
const SIZE: (u32, u32) = (640, 480);

/// Draw every curve `history` has data for into `{dir}/output_graphs`.
/// Returns the files written.
pub fn render_training_curves(dir: impl AsRef<Path>, history: &[EpochMetrics]) -> Result<Vec<PathBuf>> {
    let graph_dir = dir.as_ref().join(GRAPH_DIR);
    fs::create_dir_all(&graph_dir)
        .with_context(|| format!("Cannot create '{}'", graph_dir.display()))?;

    let last_epoch = history.last().map_or(1, |m| m.epoch);

    let train = |f: fn(&EpochMetrics) -> f64| -> Vec<(usize, f64)> {
        history.iter().map(|m| (m.epoch, f(m))).collect()
    };
    let val = |f: fn(&EpochMetrics) -> Option<f64>| -> Vec<(usize, f64)> {
        history.iter().filter_map(|m| f(m).map(|v| (m.epoch, v))).collect()
    };

    let curves = [
        ("training_loss",   train(|m| m.train_loss)),
        ("training_acc",    train(|m| m.train_acc)),
        ("validation_loss", val(|m| m.val_loss)),
        ("validation_acc",  val(|m| m.val_acc)),
    ];

    let mut written = Vec::with_capacity(curves.len());
    for (name, points) in &curves {
        if points.is_empty() {
            tracing::warn!("no data for {name}; chart skipped");
            continue;
        }
        let path = graph_dir.join(format!("{name}.png"));
        draw_curve(&path, points, last_epoch)
            .with_context(|| format!("Cannot draw '{}'", path.display()))?;
        written.push(path);
    }

    tracing::info!("Saved {} charts to '{}'", written.len(), graph_dir.display());
    Ok(written)
}

fn draw_curve(path: &Path, points: &[(usize, f64)], last_epoch: usize) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = points
        .iter()
        .map(|&(_, v)| v)
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    // A one-epoch run still needs a non-empty x range
    let x_max = last_epoch.max(2) as f64;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(1.0f64..x_max, 0.0f64..y_max)?;

    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(
        points.iter().map(|&(epoch, v)| (epoch as f64, v)),
        &BLUE,
    ))?;

    root.present()?;
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<EpochMetrics> {
        vec![
            EpochMetrics::train_only(1, 2.0, 0.1).with_validation(2.2, 0.1),
            EpochMetrics::train_only(2, 1.5, 0.2),
            EpochMetrics::train_only(3, 1.2, 0.3).with_validation(1.4, 0.25),
        ]
    }

    #[test]
    fn test_writes_four_charts() {
        let dir     = tempfile::tempdir().unwrap();
        let written = render_training_curves(dir.path(), &history()).unwrap();

        assert_eq!(written.len(), 4);
        for name in ["training_loss", "training_acc", "validation_loss", "validation_acc"] {
            let path = dir.path().join(GRAPH_DIR).join(format!("{name}.png"));
            assert!(path.exists(), "missing {}", path.display());
        }
    }

    #[test]
    fn test_skips_validation_without_data() {
        let dir     = tempfile::tempdir().unwrap();
        let history = vec![EpochMetrics::train_only(1, 1.0, 0.5)];
        let written = render_training_curves(dir.path(), &history).unwrap();

        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(GRAPH_DIR).join("validation_loss.png").exists());
    }
}
