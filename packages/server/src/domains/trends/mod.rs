//! Search-interest context shown next to ranked posts.
//!
//! Independent of ranking: a failed or empty lookup only means the UI shows
//! no chart.

pub mod activities;
pub mod models;

pub use activities::lookup_trends;
pub use models::{TrendPoint, TrendSeries, TrendWindow};
