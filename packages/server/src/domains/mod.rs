pub mod posts;
pub mod trends;
