use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::domains::trends::models::{TrendSeries, TrendWindow};
use crate::kernel::BaseTrendProvider;

/// Fetch trend data for `query`, treating every failure as "no trend data".
///
/// The provider call is bounded by `timeout`. Provider errors and timeouts are
/// logged and mapped to `None`; an empty series is also `None`.
#[instrument(skip(provider, window), fields(window = window.as_str()))]
pub async fn lookup_trends(
    provider: &dyn BaseTrendProvider,
    query: &str,
    window: &TrendWindow,
    timeout: Duration,
) -> Option<TrendSeries> {
    match tokio::time::timeout(timeout, provider.interest_over_time(query, window)).await {
        Ok(Ok(Some(series))) if !series.is_empty() => {
            debug!(points = series.points.len(), "Trend data found");
            Some(series)
        }
        Ok(Ok(_)) => {
            debug!("No trend data for query");
            None
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Trend lookup failed, continuing without trend data");
            None
        }
        Err(_) => {
            warn!(
                timeout_secs = timeout.as_secs_f32(),
                "Trend lookup timed out, continuing without trend data"
            );
            None
        }
    }
}
