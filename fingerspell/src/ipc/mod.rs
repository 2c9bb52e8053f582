//! Line-oriented s-expression protocol for replaying hand frames.

pub mod dispatch;
pub mod sexp;

pub use dispatch::{handle_message, parse_frame};
