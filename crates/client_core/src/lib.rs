//! Client-side state for the logical-clock visualizer: alerts, the process
//! mirror, the clock-diagram projection and the operations that drive them.

pub mod controller;
pub mod crosshair;
pub mod directory;
pub mod error;
pub mod notifications;
pub mod timeline;
pub mod transport;

pub use controller::{FormInputs, InteractionController, Selection};
pub use crosshair::PlotCrosshair;
pub use directory::ProcessDirectory;
pub use error::{OperationError, RefreshTarget, ServiceError};
pub use notifications::{AlertState, ExpiryToken, NotificationCenter, DEFAULT_ALERT_TTL};
pub use timeline::{project, Coordinate, PlotPoint, TimelineProjection, NOT_FOUND};
pub use transport::{ClockService, HttpClockService};
