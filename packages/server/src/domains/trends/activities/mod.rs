pub mod lookup;

pub use lookup::lookup_trends;
