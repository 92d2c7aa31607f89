//! Triple source reading: bytes in, normalized markup out.

pub mod cleaner;
pub mod reader;

pub use reader::{read_bytes, read_path, Markup};
