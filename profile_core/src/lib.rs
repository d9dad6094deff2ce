//! # profile_core - Sheet-Metal Profile Digitizer
//!
//! `profile_core` is the engine behind Bendline's profile sketcher. An operator
//! clicks (or taps) out a sheet-metal cross-section as a polyline; every
//! segment is snapped onto one of eight canonical directions while keeping
//! the length the operator drew. The finished polyline is exported as a
//! vector [`GeometryModel`](export::GeometryModel) of line paths and
//! dimension ticks for drawing generators.
//!
//! ## Design Philosophy
//!
//! - **Host-agnostic**: no GUI toolkit types; hosts translate their events
//!   into [`PointerEvent`]s and execute [`DrawCommand`]s
//! - **Single source of truth**: the [`SegmentStore`] owns the sequence and
//!   tells the host about every change through an injected observer
//! - **Never panics on bad input**: invalid host data is dropped, paused
//!   input is inert, a missing surface draws nothing
//! - **JSON-First**: every public data type implements Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use profile_core::export::{export, ExportOptions};
//! use profile_core::geometry::Point;
//! use profile_core::input::{PointerEvent, PointerInputTracker};
//!
//! let mut tracker = PointerInputTracker::default();
//! for (x, y) in [(0.0, 0.0), (50.0, 2.0), (52.0, 30.0)] {
//!     tracker.handle(PointerEvent::mouse_down(Point::new(x, y)));
//! }
//! assert_eq!(tracker.segments().len(), 2);
//!
//! let model = export(tracker.segments(), None, &ExportOptions::default()).unwrap();
//! let json = serde_json::to_string_pretty(&model).unwrap();
//! assert!(json.contains("line-2"));
//! ```
//!
//! ## Modules
//!
//! - [`geometry`] - Points, segments and the canonical snap angles
//! - [`snap`] - Angle-constrained point projection
//! - [`input`] - Pointer/touch capture state machine
//! - [`store`] - Segment sequence, anchor and change notification
//! - [`render`] - Draw command generation and redraw tracking
//! - [`export`] - Geometry model with dimension ticks
//! - [`config`] - TOML configuration for hosts
//! - [`document`] - Host-side profile documents with atomic saves
//! - [`errors`] - Structured error types

pub mod config;
pub mod document;
pub mod errors;
pub mod export;
pub mod geometry;
pub mod input;
pub mod render;
pub mod snap;
pub mod store;

// Re-export commonly used types at crate root for convenience
pub use config::DigitizerConfig;
pub use errors::{ProfileError, ProfileResult};
pub use export::{export, ExportOptions, GeometryModel};
pub use geometry::{Point, Segment};
pub use input::{DrawingState, PointerEvent, PointerInputTracker};
pub use render::{DrawCommand, RenderConfig, Renderer};
pub use store::{SegmentObserver, SegmentStore};
