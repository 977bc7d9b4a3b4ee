//! Final placement report.
//!
//! Collects the winning worker's placement into a serializable summary: one
//! bounding rectangle per block plus the run's scalar results. Rendered as
//! the line-oriented text dump or as JSON.

use crate::anneal::Annealer;
use crate::eval::Axis;
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

/// A placed block's name and bounding rectangle.
#[derive(Debug, Clone, Serialize)]
pub struct BlockRect {
    /// Block name.
    pub name: String,
    /// Left edge.
    pub x0: i64,
    /// Bottom edge.
    pub y0: i64,
    /// Right edge.
    pub x1: i64,
    /// Top edge.
    pub y1: i64,
}

/// Summary of a finished search: scalar results plus per-block rectangles.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementReport {
    /// Best feasible cost, or `None` if nothing ever fit the outline.
    pub cost: Option<f64>,
    /// Total half-perimeter wirelength of the reported placement.
    pub wirelength: i64,
    /// Packed bounding-box area.
    pub area: i64,
    /// Packed extent along X.
    pub len_x: i64,
    /// Packed extent along Y.
    pub len_y: i64,
    /// Wall-clock seconds the whole run took.
    pub elapsed_secs: f64,
    /// Every block's final rectangle.
    pub blocks: Vec<BlockRect>,
}

impl PlacementReport {
    /// Builds a report from a worker's current state.
    ///
    /// Re-evaluates both axes so the reported coordinates are consistent
    /// with the worker's sequence pair.
    pub fn from_annealer(annealer: &mut Annealer, cost: Option<f64>, elapsed: Duration) -> Self {
        let len_x = annealer.evaluate(Axis::X);
        let len_y = annealer.evaluate(Axis::Y);
        let wirelength = annealer.total_wirelength();

        let blocks = annealer
            .plan()
            .blocks
            .iter()
            .map(|b| BlockRect {
                name: b.name.clone(),
                x0: b.origin.x,
                y0: b.origin.y,
                x1: b.origin.x + b.width(),
                y1: b.origin.y + b.height(),
            })
            .collect();

        Self {
            cost,
            wirelength,
            area: len_x * len_y,
            len_x,
            len_y,
            elapsed_secs: elapsed.as_secs_f64(),
            blocks,
        }
    }

    /// Renders the line-oriented text dump: cost, wirelength, area, extents,
    /// elapsed time, then one `name x0 y0 x1 y1` line per block.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        match self.cost {
            Some(cost) => writeln!(out, "{cost:.0}").unwrap(),
            None => writeln!(out, "inf").unwrap(),
        }
        writeln!(out, "{}", self.wirelength).unwrap();
        writeln!(out, "{}", self.area).unwrap();
        writeln!(out, "{} {}", self.len_x, self.len_y).unwrap();
        writeln!(out, "{:.3}", self.elapsed_secs).unwrap();
        for b in &self.blocks {
            writeln!(out, "{} {} {} {} {}", b.name, b.x0, b.y0, b.x1, b.y1).unwrap();
        }
        out
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("report serializes to JSON")
    }
}
