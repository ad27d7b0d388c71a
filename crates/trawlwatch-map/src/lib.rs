//! # TrawlWatch Map Core
//!
//! Client-side map state and rendering coordination for the TrawlWatch
//! dashboard. No UI framework lives here: the browser app and the CLI both
//! drive a [`MapSession`] and hand its derived layers to whatever draws them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   begin_* / apply_*   ┌──────────────────────────────┐
//! │ TrawlwatchApi│ ────────────────────► │          MapSession          │
//! │ (REST, fake) │                       │  map_view  track  vessels    │
//! └──────────────┘                       │  zones  ports  loading       │
//!                                        └──────────────────────────────┘
//!                                             │ snapshot()       ▲
//!                                             ▼                  │ handle(MapEvent)
//!                                        derive_layers ──► renderer
//! ```
//!
//! ## Features
//!
//! - Stores with their invariants enforced at the mutation boundary
//! - Pure layer derivation for vessels, tracks, zones and ports
//! - Camera framing around an excursion
//! - Last-fetch-wins request sequencing with empty-data fallback

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod commands;
pub mod error;
pub mod framing;
pub mod layers;
pub mod palette;
pub mod session;
pub mod stores;

pub use api::TrawlwatchApi;
pub use commands::{
    fetch_excursions_with_segments, load_metrics, load_reference_data, refresh_positions,
    track_vessel, FetchSlot, MetricsReport, Ticket, TrackOutcome,
};
pub use error::{ApiError, ApiResult, MapError, Result};
pub use framing::{frame_excursion, frame_points, BoundingBox, Framing};
pub use layers::{derive_layers, Layer, MapSnapshot, PickTarget};
pub use session::{MapEvent, MapSession};
