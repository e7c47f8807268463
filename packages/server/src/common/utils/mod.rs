pub mod embeddings;
pub mod google_trends;

pub use embeddings::*;
pub use google_trends::*;
