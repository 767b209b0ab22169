//! Projection of the raw event list onto a logical-clock diagram.
//!
//! x is the logical clock, y is the process id. The projection is rebuilt from
//! scratch for every event snapshot and never patched in place.

use std::collections::BTreeSet;

use shared::domain::{Event, LogicalClock, ProcessId};

/// Description reported for coordinates with no plotted event.
pub const NOT_FOUND: &str = "not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: LogicalClock,
    pub y: ProcessId,
}

impl Coordinate {
    pub fn new(x: LogicalClock, y: ProcessId) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotPoint {
    pub x: LogicalClock,
    pub y: ProcessId,
    pub description: String,
}

impl PlotPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineProjection {
    /// One point per event, in event order.
    pub points: Vec<PlotPoint>,
    /// Distinct clock values, ascending.
    pub x_ticks: Vec<LogicalClock>,
    /// Distinct process ids, ascending.
    pub y_ticks: Vec<ProcessId>,
    pub x_axis_upper_bound: LogicalClock,
    pub y_axis_upper_bound: i64,
}

impl Default for TimelineProjection {
    fn default() -> Self {
        project(&[])
    }
}

pub fn project(events: &[Event]) -> TimelineProjection {
    let points: Vec<PlotPoint> = events
        .iter()
        .map(|event| PlotPoint {
            x: event.logical_clock,
            y: event.process_id,
            description: event.description.clone(),
        })
        .collect();

    let x_ticks: Vec<LogicalClock> = points
        .iter()
        .map(|p| p.x)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let y_ticks: Vec<ProcessId> = points
        .iter()
        .map(|p| p.y)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    // Bounds saturate at the type maximum instead of overflowing.
    let x_axis_upper_bound = x_ticks.last().copied().unwrap_or(0).saturating_add(1);
    let y_axis_upper_bound = y_ticks.last().map_or(0, |id| id.0).saturating_add(1);

    TimelineProjection {
        points,
        x_ticks,
        y_ticks,
        x_axis_upper_bound,
        y_axis_upper_bound,
    }
}

impl TimelineProjection {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point at `at` in event order; later duplicates are shadowed.
    pub fn lookup(&self, at: Coordinate) -> Option<&str> {
        self.points
            .iter()
            .find(|p| p.x == at.x && p.y == at.y)
            .map(|p| p.description.as_str())
    }

    pub fn describe(&self, at: Coordinate) -> &str {
        self.lookup(at).unwrap_or(NOT_FOUND)
    }

    pub fn points_on(&self, process_id: ProcessId) -> impl Iterator<Item = &PlotPoint> {
        self.points.iter().filter(move |p| p.y == process_id)
    }

    /// Point closest to `x` horizontally, restricted to `row` when given.
    /// Ties keep the earliest point in event order.
    pub fn nearest_in_x(&self, x: f64, row: Option<ProcessId>) -> Option<Coordinate> {
        let mut best: Option<(f64, Coordinate)> = None;
        for point in &self.points {
            if row.is_some_and(|r| r != point.y) {
                continue;
            }
            let distance = (point.x as f64 - x).abs();
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, point.coordinate()));
            }
        }
        best.map(|(_, c)| c)
    }
}

#[cfg(test)]
#[path = "tests/timeline_tests.rs"]
mod tests;
