//! Fingerspelling letter recognition from tracked hand geometry.
//!
//! A two-pass classifier (lift-state lookup, then per-family geometric
//! resolution) followed by a dwell-time debounce.  The `fingerspell`
//! binary replays s-expression hand frames through it.

pub mod asl;
pub mod config;
pub mod error;
pub mod ipc;
