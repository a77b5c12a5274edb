//! Pipeline module.
//!
//! Ties the loader, cleaner and profiler together behind [`Pipeline`].

mod builder;

pub use builder::{Pipeline, PipelineBuilder};
