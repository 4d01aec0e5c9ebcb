//! Content source implementations.
//!
//! # Available Sources
//!
//! - [`MangaDraftSource`] - mangadraft.com, French webcomics

pub mod mangadraft;

pub use mangadraft::MangaDraftSource;
