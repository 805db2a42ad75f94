pub mod generation;
pub mod videos;
