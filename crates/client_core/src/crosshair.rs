use shared::domain::ProcessId;

use crate::timeline::{Coordinate, TimelineProjection};

/// Hover marker over the clock diagram. Holds only a coordinate; descriptions
/// are always resolved against the projection currently on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotCrosshair {
    selection: Option<Coordinate>,
}

impl PlotCrosshair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<Coordinate> {
        self.selection
    }

    /// Records the point the rendering surface reported under the cursor.
    pub fn on_hover(&mut self, point: Coordinate) {
        self.selection = Some(point);
    }

    /// Snaps a raw cursor position to the nearest plotted point in x.
    pub fn on_hover_at(
        &mut self,
        projection: &TimelineProjection,
        x: f64,
        row: Option<ProcessId>,
    ) -> Option<Coordinate> {
        self.selection = projection.nearest_in_x(x, row);
        self.selection
    }

    pub fn on_leave(&mut self) {
        self.selection = None;
    }

    pub fn describe<'a>(&self, projection: &'a TimelineProjection) -> Option<&'a str> {
        self.selection.map(|at| projection.describe(at))
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::Event;

    use super::*;
    use crate::timeline::{project, NOT_FOUND};

    fn projection() -> TimelineProjection {
        project(&[
            Event {
                process_id: ProcessId(1),
                logical_clock: 1,
                description: "init".into(),
            },
            Event {
                process_id: ProcessId(2),
                logical_clock: 2,
                description: "recv msg".into(),
            },
        ])
    }

    #[test]
    fn hover_then_leave() {
        let projection = projection();
        let mut crosshair = PlotCrosshair::new();
        assert_eq!(crosshair.describe(&projection), None);

        crosshair.on_hover(Coordinate::new(2, ProcessId(2)));
        assert_eq!(crosshair.describe(&projection), Some("recv msg"));

        crosshair.on_leave();
        assert_eq!(crosshair.selection(), None);
        assert_eq!(crosshair.describe(&projection), None);
    }

    #[test]
    fn stale_selection_reports_not_found_after_refresh() {
        let mut crosshair = PlotCrosshair::new();
        crosshair.on_hover(Coordinate::new(1, ProcessId(1)));
        assert_eq!(crosshair.describe(&project(&[])), Some(NOT_FOUND));
    }

    #[test]
    fn hover_at_snaps_to_nearest_point() {
        let projection = projection();
        let mut crosshair = PlotCrosshair::new();
        let snapped = crosshair.on_hover_at(&projection, 1.8, None);
        assert_eq!(snapped, Some(Coordinate::new(2, ProcessId(2))));
        assert_eq!(crosshair.describe(&projection), Some("recv msg"));
    }
}
