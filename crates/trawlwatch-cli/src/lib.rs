//! # TrawlWatch CLI
//!
//! Operator tooling around the TrawlWatch backend.
//!
//! ## Features
//!
//! - `reqwest` implementation of the backend data source
//! - Environment configuration with `.env` support
//! - Text summaries of derived map layers and metrics

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod report;

pub use client::RestClient;
pub use config::Config;
