//! On-disk persistence primitives shared by the lens state and the post log.

pub mod persistence;

pub use persistence::{append_line, read_optional, write_atomic};
