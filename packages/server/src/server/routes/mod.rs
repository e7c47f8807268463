// HTTP routes
pub mod error;
pub mod health;
pub mod search;
pub mod trends;

pub use error::ApiError;
pub use health::*;
pub use search::*;
pub use trends::*;
