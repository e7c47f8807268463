// Post Search - semantic search over a pre-embedded collection of posts
//
// The embedding store is loaded once at start-up and shared read-only. Each
// query is embedded through an external service, scored against every stored
// post by cosine similarity and ranked. The web server and the command-line
// tool are two presentation layers over the same ranking core.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
