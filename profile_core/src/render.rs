//! # Canvas Rendering
//!
//! Rendering is split in two:
//!
//! - [`render_scene`] is a pure function of `(segments, anchor, preview,
//!   canvas size, style)` that returns a flat list of [`DrawCommand`]s. It
//!   always produces a full redraw: clear, every committed segment with its
//!   1-based index label, the dashed preview line, then the anchor marker.
//! - [`Renderer`] keeps the measured canvas size and a redraw flag so hosts
//!   only repaint after a state change or an actual resize, and hands the
//!   commands to a [`DrawSurface`] back-end.
//!
//! Style values come from an explicit [`RenderConfig`]; nothing is read from
//! ambient theme state. Without a drawable surface (no size, or zero area)
//! nothing is drawn.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::geometry::Segment;
//! use profile_core::render::{render_scene, CanvasSize, DrawCommand, RenderConfig, Scene};
//!
//! let segments = [Segment::new(0.0, 0.0, 20.0, 0.0)];
//! let scene = Scene {
//!     segments: &segments,
//!     anchor: Some(segments[0].end()),
//!     preview: None,
//!     size: Some(CanvasSize::new(200.0, 100.0)),
//! };
//! let commands = render_scene(&scene, &RenderConfig::default());
//! assert!(matches!(commands[0], DrawCommand::Clear { .. }));
//! assert_eq!(commands.len(), 4); // clear, line, label, anchor
//! ```

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::errors::{ProfileError, ProfileResult};
use crate::geometry::{Point, Segment};
use crate::input::{PointerInputTracker, PreviewSegment};

// ============================================================================
// Colors
// ============================================================================

/// RGBA color with components in `0.0..=1.0`.
///
/// Serialized as a `#rrggbb` / `#rrggbbaa` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> ProfileResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || ProfileError::invalid_input("color", hex, "expected #rrggbb or #rrggbbaa");

        let well_formed = (digits.len() == 6 || digits.len() == 8)
            && digits.bytes().all(|b| b.is_ascii_hexdigit());
        if !well_formed {
            return Err(invalid());
        }

        let channel = |i: usize| -> ProfileResult<f32> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| invalid())
        };

        Ok(Rgba {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if digits.len() == 8 { channel(6)? } else { 1.0 },
        })
    }

    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        if byte(self.a) == 255 {
            format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                byte(self.a)
            )
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ProfileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ============================================================================
// Style configuration
// ============================================================================

/// Presentation parameters for the digitizer canvas.
///
/// Every field has a default, so a partial `[render]` table in a config file
/// is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_background")]
    pub background: Rgba,

    /// Committed segment stroke
    #[serde(default = "default_segment_color")]
    pub segment_color: Rgba,

    #[serde(default = "default_segment_width")]
    pub segment_width: f32,

    /// Index labels at segment midpoints
    #[serde(default = "default_label_color")]
    pub label_color: Rgba,

    #[serde(default = "default_label_size")]
    pub label_size: f32,

    /// Live preview line
    #[serde(default = "default_preview_color")]
    pub preview_color: Rgba,

    #[serde(default = "default_preview_width")]
    pub preview_width: f32,

    /// Dash pattern (on, off, ...) for the preview line; empty = solid
    #[serde(default = "default_preview_dash")]
    pub preview_dash: Vec<f32>,

    /// Filled marker at the chain anchor
    #[serde(default = "default_anchor_color")]
    pub anchor_color: Rgba,

    #[serde(default = "default_anchor_radius")]
    pub anchor_radius: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            background: default_background(),
            segment_color: default_segment_color(),
            segment_width: default_segment_width(),
            label_color: default_label_color(),
            label_size: default_label_size(),
            preview_color: default_preview_color(),
            preview_width: default_preview_width(),
            preview_dash: default_preview_dash(),
            anchor_color: default_anchor_color(),
            anchor_radius: default_anchor_radius(),
        }
    }
}

impl RenderConfig {
    /// Reject sizes that would make the drawing invisible or undefined.
    pub fn validate(&self) -> ProfileResult<()> {
        let positive = [
            ("render.segment_width", self.segment_width),
            ("render.label_size", self.label_size),
            ("render.preview_width", self.preview_width),
            ("render.anchor_radius", self.anchor_radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ProfileError::invalid_input(field, value.to_string(), "must be positive"));
            }
        }
        if self.preview_dash.iter().any(|d| !(d.is_finite() && *d >= 0.0)) {
            return Err(ProfileError::invalid_input(
                "render.preview_dash",
                format!("{:?}", self.preview_dash),
                "dash lengths must be non-negative",
            ));
        }
        Ok(())
    }
}

fn default_background() -> Rgba {
    Rgba::rgb(1.0, 1.0, 1.0)
}

fn default_segment_color() -> Rgba {
    Rgba::rgb(0.12, 0.16, 0.22)
}

fn default_segment_width() -> f32 {
    2.0
}

fn default_label_color() -> Rgba {
    Rgba::rgb(0.15, 0.39, 0.92)
}

fn default_label_size() -> f32 {
    12.0
}

fn default_preview_color() -> Rgba {
    Rgba { r: 0.6, g: 0.6, b: 0.6, a: 0.9 }
}

fn default_preview_width() -> f32 {
    1.5
}

fn default_preview_dash() -> Vec<f32> {
    vec![6.0, 4.0]
}

fn default_anchor_color() -> Rgba {
    Rgba::rgb(0.86, 0.15, 0.15)
}

fn default_anchor_radius() -> f32 {
    4.0
}

// ============================================================================
// Draw commands
// ============================================================================

/// Measured size of the drawing surface in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        CanvasSize { width, height }
    }

    /// A surface with no area cannot be drawn on
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// One primitive drawing operation, in painter's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { size: CanvasSize, color: Rgba },
    /// Stroked line; `dash` empty means solid
    Line {
        from: Point,
        to: Point,
        color: Rgba,
        width: f32,
        dash: Vec<f32>,
    },
    /// Text centered on `position`
    Label {
        position: Point,
        text: String,
        color: Rgba,
        size: f32,
    },
    /// Filled circle
    Marker { center: Point, radius: f32, color: Rgba },
}

/// Everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub segments: &'a [Segment],
    pub anchor: Option<Point>,
    pub preview: Option<PreviewSegment>,
    pub size: Option<CanvasSize>,
}

impl<'a> Scene<'a> {
    /// Snapshot the drawable state of a tracker.
    pub fn from_tracker(tracker: &'a PointerInputTracker, size: Option<CanvasSize>) -> Self {
        Scene {
            segments: tracker.segments(),
            anchor: tracker.anchor(),
            preview: tracker.preview(),
            size,
        }
    }
}

/// Produce the full command list for one frame.
pub fn render_scene(scene: &Scene<'_>, config: &RenderConfig) -> Vec<DrawCommand> {
    let Some(size) = scene.size.filter(CanvasSize::is_drawable) else {
        return Vec::new();
    };

    let mut commands = Vec::with_capacity(2 + scene.segments.len() * 2);
    commands.push(DrawCommand::Clear {
        size,
        color: config.background,
    });

    for (i, segment) in scene.segments.iter().enumerate() {
        commands.push(DrawCommand::Line {
            from: segment.start(),
            to: segment.end(),
            color: config.segment_color,
            width: config.segment_width,
            dash: Vec::new(),
        });
        commands.push(DrawCommand::Label {
            position: segment.midpoint(),
            text: (i + 1).to_string(),
            color: config.label_color,
            size: config.label_size,
        });
    }

    if let Some(preview) = scene.preview {
        commands.push(DrawCommand::Line {
            from: preview.anchor,
            to: preview.tip,
            color: config.preview_color,
            width: config.preview_width,
            dash: config.preview_dash.clone(),
        });
    }

    if let Some(anchor) = scene.anchor {
        commands.push(DrawCommand::Marker {
            center: anchor,
            radius: config.anchor_radius,
            color: config.anchor_color,
        });
    }

    commands
}

// ============================================================================
// Stateful renderer
// ============================================================================

/// Back-end that can execute draw commands (an iced frame, an SVG writer...).
pub trait DrawSurface {
    fn execute(&mut self, commands: &[DrawCommand]);
}

/// Tracks canvas size and pending redraws for one digitizer canvas.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    size: Option<CanvasSize>,
    needs_redraw: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(RenderConfig::default())
    }
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Renderer {
            config,
            size: None,
            needs_redraw: true,
        }
    }

    pub fn size(&self) -> Option<CanvasSize> {
        self.size
    }

    /// Resynchronize to the container's measured size. Returns `true` (and
    /// schedules a redraw) only when the size actually changed.
    pub fn resize(&mut self, size: CanvasSize) -> bool {
        if self.size == Some(size) {
            return false;
        }
        trace!("canvas resized to {}x{}", size.width, size.height);
        self.size = Some(size);
        self.needs_redraw = true;
        true
    }

    /// The drawing surface went away; later frames draw nothing.
    pub fn detach(&mut self) {
        self.size = None;
    }

    /// Mark the scene as changed (segments, anchor or preview).
    pub fn invalidate(&mut self) {
        self.needs_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Full command list for the current state, regardless of the redraw flag.
    pub fn commands(&self, tracker: &PointerInputTracker) -> Vec<DrawCommand> {
        render_scene(&Scene::from_tracker(tracker, self.size), &self.config)
    }

    /// Commands for the next frame, or `None` when nothing changed since the
    /// last one.
    pub fn frame(&mut self, tracker: &PointerInputTracker) -> Option<Vec<DrawCommand>> {
        if !self.needs_redraw {
            return None;
        }
        self.needs_redraw = false;
        Some(self.commands(tracker))
    }

    /// Draw the next frame onto `surface` if a redraw is pending.
    pub fn draw_to(&mut self, tracker: &PointerInputTracker, surface: &mut dyn DrawSurface) -> bool {
        match self.frame(tracker) {
            Some(commands) => {
                surface.execute(&commands);
                true
            }
            None => false,
        }
    }
}
