pub mod builder;
pub mod derive;

pub use builder::{build_graph, LinkedGraph};
pub use derive::compute_derived;
