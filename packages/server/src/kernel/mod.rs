//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod errors;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use errors::{EmbeddingError, TrendError};
pub use test_dependencies::{MockEmbeddingService, MockTrendProvider, TestDependencies};
pub use traits::*;
