//! cgrid-report
//!
//! Summarise a vertex array as a C-grid: active cells, cell width ranges and
//! worst orthogonality error. Reads `{"x": [[..]], "y": [[..]]}` with `null`
//! for missing vertices.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cgrid::{GridMetrics, MaskedArray2D, Polygon};

/// Report derived C-grid metrics for a vertex array
#[derive(Parser, Debug)]
#[command(name = "cgrid-report")]
#[command(about = "Report derived C-grid metrics for a vertex array")]
struct Args {
    /// JSON file with "x" and "y" vertex rows
    vertices: PathBuf,

    /// JSON file with a list of [x, y] polygon points to mask
    #[arg(short, long)]
    polygon: Option<PathBuf>,

    /// Value written into mask_rho inside the polygon (0 or 1)
    #[arg(long, default_value_t = 0.0, value_parser = parse_mask_value)]
    mask_value: f64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[derive(Deserialize)]
struct VertexFile {
    x: Vec<Vec<Option<f64>>>,
    y: Vec<Vec<Option<f64>>>,
}

#[derive(Serialize)]
struct Range {
    min: f64,
    max: f64,
}

#[derive(Serialize)]
struct Report {
    vertices: (usize, usize),
    cells: (usize, usize),
    active_cells: usize,
    masked_by_polygon: Option<usize>,
    dx: Option<Range>,
    dy: Option<Range>,
    max_abs_orthogonality_deg: Option<f64>,
}

fn parse_mask_value(s: &str) -> std::result::Result<f64, String> {
    match s.trim().parse::<f64>() {
        Ok(v) if v == 0.0 || v == 1.0 => Ok(v),
        Ok(v) => Err(format!("mask value must be 0 or 1, got {}", v)),
        Err(e) => Err(e.to_string()),
    }
}

fn unpack(rows: Vec<Vec<Option<f64>>>) -> Vec<Vec<f64>> {
    rows.into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect()
}

fn range(a: &MaskedArray2D) -> Option<Range> {
    a.min_max().map(|(min, max)| Range { min, max })
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let text = fs::read_to_string(&args.vertices)
        .with_context(|| format!("reading {}", args.vertices.display()))?;
    let file: VertexFile = serde_json::from_str(&text).context("parsing vertex file")?;
    let mut grid = GridMetrics::from_rows(&unpack(file.x), &unpack(file.y))
        .context("building grid metrics")?;
    info!(shape = ?grid.shape(), "loaded vertices");

    let masked_by_polygon = match &args.polygon {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let rows: Vec<Vec<f64>> = serde_json::from_str(&text).context("parsing polygon")?;
            let polygon = Polygon::from_rows(&rows)?;
            Some(grid.mask_polygon(&polygon, args.mask_value)?)
        }
        None => None,
    };

    let active_cells = grid.mask_rho().iter().filter(|&&m| m != 0.0).count();
    let max_abs_orthogonality_deg = grid
        .orthogonality()
        .map(f64::abs)
        .min_max()
        .map(|(_, max)| max.to_degrees());

    let report = Report {
        vertices: grid.shape(),
        cells: grid.cell_shape(),
        active_cells,
        masked_by_polygon,
        dx: range(&grid.dx()),
        dy: range(&grid.dy()),
        max_abs_orthogonality_deg,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_value_must_be_binary() {
        assert_eq!(parse_mask_value("0"), Ok(0.0));
        assert_eq!(parse_mask_value("1.0"), Ok(1.0));
        assert!(parse_mask_value("0.5").is_err());
        assert!(parse_mask_value("2").is_err());
        assert!(parse_mask_value("NaN").is_err());
        assert!(parse_mask_value("land").is_err());
    }

    #[test]
    fn test_args_reject_bad_mask_value() {
        assert!(Args::try_parse_from(["cgrid-report", "grid.json", "--mask-value", "0.5"]).is_err());
        let args = Args::try_parse_from(["cgrid-report", "grid.json", "--mask-value", "1"]).unwrap();
        assert_eq!(args.mask_value, 1.0);
    }
}
