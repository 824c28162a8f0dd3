//! Sequential lattice sampling

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::Stream;
use futures::stream;
use tracing::{debug, warn};

use super::lattice::{Density, GridPoint, PointMetrics, lattice};
use crate::DashboardError;
use crate::models::Coordinates;

/// Data source for the metrics at a single lattice coordinate
#[async_trait]
pub trait PointFetcher: Send + Sync {
    async fn fetch_point(&self, coordinates: Coordinates) -> crate::Result<PointMetrics>;
}

struct SampleState {
    pending: std::vec::IntoIter<Coordinates>,
    points: Vec<GridPoint>,
    fetcher: Arc<dyn PointFetcher>,
    delay: Duration,
    failed: bool,
}

/// Sample every lattice point around `center`, one fetch at a time.
///
/// `delay` is awaited before each fetch. Every item is the accumulated list
/// of points so far, so callers can render partial results while the sweep
/// continues. The first failed fetch yields [`DashboardError::SamplingFailed`]
/// and ends the stream; points already yielded remain valid.
pub fn sample(
    center: Coordinates,
    density: Density,
    fetcher: Arc<dyn PointFetcher>,
    delay: Duration,
) -> impl Stream<Item = crate::Result<Vec<GridPoint>>> + Send + 'static {
    let coordinates = lattice(center, density);
    debug!(
        points = coordinates.len(),
        %density,
        center = %center.format(),
        "Sampling radar lattice"
    );

    let state = SampleState {
        points: Vec::with_capacity(coordinates.len()),
        pending: coordinates.into_iter(),
        fetcher,
        delay,
        failed: false,
    };

    stream::unfold(state, |mut state| async move {
        if state.failed {
            return None;
        }
        let coordinates = state.pending.next()?;

        tokio::time::sleep(state.delay).await;

        match state.fetcher.fetch_point(coordinates).await {
            Ok(metrics) => {
                state.points.push(GridPoint {
                    coordinates,
                    metrics,
                    captured_at: Utc::now(),
                });
                let snapshot = state.points.clone();
                Some((Ok(snapshot), state))
            }
            Err(e) => {
                warn!(
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    sampled = state.points.len(),
                    "Radar point fetch failed: {e}"
                );
                state.failed = true;
                let error = DashboardError::sampling_failed(
                    coordinates.latitude,
                    coordinates.longitude,
                    e.to_string(),
                );
                Some((Err(error), state))
            }
        }
    })
}
