//! # UI Components Module
//!
//! Leptos components for the vessel tracking dashboard.

pub mod charts;
pub mod filters;
pub mod footer;
pub mod header;
pub mod map;
pub mod track_panel;
pub mod vessel_card;

pub use charts::*;
pub use filters::*;
pub use footer::*;
pub use header::*;
pub use map::*;
pub use track_panel::*;
pub use vessel_card::*;
