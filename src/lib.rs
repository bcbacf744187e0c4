// src/lib.rs

//! Hacker News comment threads: fetch, assemble, and order.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
pub use pipeline::{FetchStatus, PostFetcher, PostPipeline};
