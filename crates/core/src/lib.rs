//! Domain types shared by the SoraGen crates.
//!
//! Holds the generation request/response shapes, the upstream job status
//! model with its poll schedule, and the [`storage::VideoStore`] handle
//! for the local video directory.

pub mod error;
pub mod generation;
pub mod job;
pub mod storage;
