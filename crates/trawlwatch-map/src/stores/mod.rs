//! # Session Stores
//!
//! Plain state containers owned by a [`crate::MapSession`]. Every mutation
//! goes through a method so the invariants below hold after each call.

pub mod loader;
pub mod map_view;
pub mod ports;
pub mod track;
pub mod vessels;
pub mod zones;

pub use loader::{DataDomain, LoadingFlags};
pub use map_view::{Easing, MapMode, MapView, ModeKind, Transition, ViewState};
pub use ports::PortsStore;
pub use track::{SegmentMode, TrackOptions};
pub use vessels::{AttributeFilters, FilterDimension, VesselsDirectory};
pub use zones::{ZoneVisibility, ZonesStore};
