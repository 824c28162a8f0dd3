//! Synthetic weather radar
//!
//! The radar view is built from a 7 × 7 lattice of point samples around a
//! center coordinate:
//! - Lattice: geometry, density settings and the sampled point model
//! - Sampler: sequential, rate-limited fetching of lattice points
//! - Sweep: cancellable sweeps where the most recent request wins
//! - Colors: metric layers and gradient color mapping

pub mod colors;
pub mod lattice;
pub mod sampler;
pub mod sweep;

pub use colors::{
    Extrapolation, GradientStops, Metric, MetricLayer, Rgb, ValueRange, color_for, color_for_with,
};
pub use lattice::{Density, GridPoint, LATTICE_POINTS, PointMetrics, lattice};
pub use sampler::{PointFetcher, sample};
pub use sweep::{RadarSweeper, SweepState, SweepStatus};
