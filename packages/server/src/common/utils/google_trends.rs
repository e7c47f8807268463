//! Google Trends client for "interest over time" series.
//!
//! Google Trends has no public API. The web front-end uses two JSON endpoints:
//! `explore` returns widget descriptors (with a per-widget token), and
//! `widgetdata/multiline` returns the time series for the TIMESERIES widget.
//! Both responses start with an anti-JSON-hijacking guard (`)]}'`) that has to
//! be stripped before parsing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::domains::trends::{TrendPoint, TrendSeries, TrendWindow};
use crate::kernel::{BaseTrendProvider, TrendError};

const TRENDS_HOME_URL: &str = "https://trends.google.com/trends/explore";
const EXPLORE_URL: &str = "https://trends.google.com/trends/api/explore";
const MULTILINE_URL: &str = "https://trends.google.com/trends/api/widgetdata/multiline";

/// Locale settings sent with every Google Trends request
#[derive(Debug, Clone)]
pub struct GoogleTrendsOptions {
    /// Interface language, e.g. `es-ES`
    pub language: String,
    /// Timezone offset in minutes, e.g. `360`
    pub tz_offset: i32,
    /// Two-letter region, empty for worldwide
    pub geo: String,
    pub timeout: Duration,
}

pub struct GoogleTrendsClient {
    client: Client,
    options: GoogleTrendsOptions,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    token: Option<String>,
    request: Option<Value>,
}

/// Token and request descriptor of the TIMESERIES widget
#[derive(Debug, Clone, PartialEq)]
struct TimeseriesWidget {
    token: String,
    request: Value,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: MultilineData,
}

#[derive(Debug, Deserialize)]
struct MultilineData {
    #[serde(rename = "timelineData", default)]
    timeline_data: Vec<TimelineEntry>,
}

#[derive(Debug, Deserialize)]
struct TimelineEntry {
    time: String,
    value: Vec<u32>,
}

impl GoogleTrendsClient {
    pub fn new(options: GoogleTrendsOptions) -> Result<Self, TrendError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(options.timeout)
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) post-search/0.1")
            .build()
            .map_err(|e| TrendError::Network(e.to_string()))?;

        Ok(Self { client, options })
    }

    /// Google hands out the session cookie (NID) on the regular web page
    async fn ensure_session(&self) -> Result<(), TrendError> {
        let geo = region_from_language(&self.options.language);
        self.client
            .get(TRENDS_HOME_URL)
            .query(&[("geo", geo)])
            .send()
            .await
            .map_err(|e| TrendError::Network(e.to_string()))?;
        Ok(())
    }

    async fn get_guarded(&self, url: &str, params: &[(&str, String)]) -> Result<String, TrendError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| TrendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TrendError::Status(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| TrendError::Network(e.to_string()))
    }
}

#[async_trait]
impl BaseTrendProvider for GoogleTrendsClient {
    #[instrument(skip(self, window), fields(timeframe = window.as_str()))]
    async fn interest_over_time(
        &self,
        query: &str,
        window: &TrendWindow,
    ) -> Result<Option<TrendSeries>, TrendError> {
        self.ensure_session().await?;

        let tz = self.options.tz_offset.to_string();
        let explore_request = json!({
            "comparisonItem": [{
                "keyword": query,
                "time": window.as_str(),
                "geo": self.options.geo,
            }],
            "category": 0,
            "property": "",
        });

        let explore_body = self
            .get_guarded(
                EXPLORE_URL,
                &[
                    ("hl", self.options.language.clone()),
                    ("tz", tz.clone()),
                    ("req", explore_request.to_string()),
                ],
            )
            .await?;
        let widget = parse_explore(&explore_body)?;

        let multiline_body = self
            .get_guarded(
                MULTILINE_URL,
                &[
                    ("hl", self.options.language.clone()),
                    ("tz", tz),
                    ("req", widget.request.to_string()),
                    ("token", widget.token),
                ],
            )
            .await?;

        let series = parse_multiline(query, &multiline_body)?;
        debug!(points = series.as_ref().map_or(0, |s| s.points.len()), "Fetched trend series");
        Ok(series)
    }
}

/// `es-ES` -> `ES`; Google uses the region to pick the cookie domain
fn region_from_language(language: &str) -> &str {
    language.rsplit('-').next().unwrap_or(language)
}

/// Drop everything before the first JSON object (the `)]}'` guard)
fn strip_guard(body: &str) -> Result<&str, TrendError> {
    body.find('{')
        .map(|start| &body[start..])
        .ok_or_else(|| TrendError::Parse("response contains no JSON object".to_string()))
}

fn parse_explore(body: &str) -> Result<TimeseriesWidget, TrendError> {
    let response: ExploreResponse = serde_json::from_str(strip_guard(body)?)
        .map_err(|e| TrendError::Parse(e.to_string()))?;

    response
        .widgets
        .into_iter()
        .find(|widget| widget.id == "TIMESERIES")
        .and_then(|widget| {
            Some(TimeseriesWidget {
                token: widget.token?,
                request: widget.request?,
            })
        })
        .ok_or(TrendError::MissingWidget)
}

fn parse_multiline(query: &str, body: &str) -> Result<Option<TrendSeries>, TrendError> {
    let response: MultilineResponse = serde_json::from_str(strip_guard(body)?)
        .map_err(|e| TrendError::Parse(e.to_string()))?;

    let points = response
        .default
        .timeline_data
        .into_iter()
        .map(|entry| {
            let seconds: i64 = entry
                .time
                .parse()
                .map_err(|_| TrendError::Parse(format!("invalid timestamp {:?}", entry.time)))?;
            let date = DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| TrendError::Parse(format!("timestamp out of range: {}", seconds)))?;

            Ok(TrendPoint {
                date,
                value: entry.value.first().copied().unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>, TrendError>>()?;

    if points.is_empty() {
        return Ok(None);
    }

    Ok(Some(TrendSeries {
        query: query.to_string(),
        points,
    }))
}
