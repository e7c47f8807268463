use chrono::{DateTime, Utc};
use serde::Serialize;

/// Time window for a trend lookup, in the provider's timeframe syntax
/// (e.g. `today 12-m`, `today 3-m`, `2024-01-01 2024-06-30`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendWindow(String);

impl TrendWindow {
    pub fn new(timeframe: impl Into<String>) -> Self {
        Self(timeframe.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TrendWindow {
    fn default() -> Self {
        Self::new("today 12-m")
    }
}

/// One sample of relative search interest (0-100)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub value: u32,
}

/// Search interest over time for a single query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub query: String,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
