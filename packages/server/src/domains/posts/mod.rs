pub mod activities;
pub mod error;
pub mod models;
pub mod presentation;
pub mod store;

pub use activities::search::{cosine_similarity, rank, rank_by_vector, search_posts, SearchSettings};
pub use error::{DataLoadError, SearchError};
pub use models::post::{PostId, PostRecord, RankedPost};
pub use presentation::PostView;
pub use store::{EmbeddingStore, LoadOptions, StoreStatus};
