//! UI module for Bendline GUI
//!
//! # Layout
//! - `toolbar` - Header, file operations (Open, Save, Export Geometry) and
//!   drawing controls (Undo, Clear, Pause/Resume)
//! - `profile_canvas` - The drawing surface
//! - `status_bar` - Bottom status messages

pub mod profile_canvas;
pub mod status_bar;
pub mod toolbar;
