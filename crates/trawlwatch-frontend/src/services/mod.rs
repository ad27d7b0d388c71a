//! # Services Module
//!
//! Backend client and the fetch flows that feed the map session.

pub mod actions;
pub mod api;

pub use actions::*;
pub use api::*;
