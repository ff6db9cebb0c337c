//! Bandmate Core Library
//!
//! Core functionality for Bandmate - helping musicians discover nearby
//! peers, form mutual friendships and exchange direct messages.
//!
//! The crate is organized around three subsystems operating over a shared
//! [`store::DocumentStore`] capability:
//!
//! - [`geo`]: geocoded entries and radius search with tag filtering
//! - [`friendship`]: the pairwise relationship lifecycle
//! - [`messaging`]: canonical two-party conversations and message logs

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

pub mod directory;
pub mod error;
pub mod friendship;
pub mod geo;
pub mod messaging;
pub mod pair;
pub mod store;

pub use error::{CoreError, Result};
