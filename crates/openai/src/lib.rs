//! Client for the OpenAI Videos API (Sora).
//!
//! Submits generation jobs, polls them to a terminal state, and streams
//! finished videos into a [`soragen_core::storage::VideoStore`].
//! [`generator::VideoGenerator`] ties the steps into one pipeline.

pub mod api;
pub mod download;
pub mod error;
pub mod generator;
pub mod poller;
