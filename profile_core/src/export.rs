//! # Geometry Export
//!
//! Converts a finished segment sequence into a [`GeometryModel`]: one line
//! path per segment plus one perpendicular dimension tick at each segment's
//! midpoint. Document generators consume the model to draw manufacturing
//! sheets; this module never touches the sequence it is given.
//!
//! ## Tick orientation
//!
//! A segment with `|dx| >= |dy|` counts as horizontal and gets a vertical
//! tick; anything steeper gets a horizontal tick. The tick is centered on the
//! midpoint and reaches `clearance` to either side of it. Diagonals fall into
//! the horizontal class.
//!
//! ## True lengths
//!
//! Real-world lengths are maintained outside the digitizer and are
//! index-aligned with the segments. When supplied, they must contain exactly
//! one finite, non-negative value per segment; anything else is rejected
//! rather than padded or truncated.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::export::{export, ExportOptions};
//! use profile_core::geometry::Segment;
//!
//! let segments = [Segment::new(0.0, 0.0, 0.0, 10.0)];
//! let model = export(&segments, Some(&[250.0]), &ExportOptions::default())?;
//!
//! let tick = &model.dimensions[0];
//! assert_eq!(tick.tick_start.y, tick.tick_end.y); // vertical segment, horizontal tick
//! assert_eq!(tick.value, 250.0);
//! # Ok::<(), profile_core::errors::ProfileError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{ProfileError, ProfileResult};
use crate::geometry::{Point, Segment};

/// Tick layout parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Half-length of a dimension tick, measured from the segment midpoint
    #[serde(default = "default_clearance")]
    pub clearance: f64,

    /// Gap between the tick end and the dimension label anchor
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            clearance: default_clearance(),
            label_offset: default_label_offset(),
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> ProfileResult<()> {
        if !(self.clearance.is_finite() && self.clearance > 0.0) {
            return Err(ProfileError::invalid_input(
                "export.clearance",
                self.clearance.to_string(),
                "must be positive",
            ));
        }
        if !(self.label_offset.is_finite() && self.label_offset >= 0.0) {
            return Err(ProfileError::invalid_input(
                "export.label_offset",
                self.label_offset.to_string(),
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

fn default_clearance() -> f64 {
    10.0
}

fn default_label_offset() -> f64 {
    6.0
}

/// A line path of the exported drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    /// `line-<n>` with `n` the 1-based segment index
    pub id: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Perpendicular dimension tick for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionTick {
    /// Id of the [`LinePath`] this tick annotates
    pub segment_id: String,
    pub tick_start: Point,
    pub tick_end: Point,
    /// Where the dimension text goes, just past `tick_end`
    pub label_position: Point,
    /// True length when supplied, otherwise the canvas length
    pub value: f64,
}

/// Vector drawing derived from a segment sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryModel {
    pub lines: Vec<LinePath>,
    pub dimensions: Vec<DimensionTick>,
}

impl GeometryModel {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Axis-aligned bounds of all lines as `(min, max)`.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = self
            .lines
            .iter()
            .flat_map(|l| [Point::new(l.x1, l.y1), Point::new(l.x2, l.y2)]);
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Point::new(min.x.min(p.x), min.y.min(p.y)),
                Point::new(max.x.max(p.x), max.y.max(p.y)),
            )
        }))
    }
}

/// Build the geometry model for `segments`.
///
/// # Errors
///
/// * [`ProfileError::LengthMismatch`] - `true_lengths` has a different length
///   than `segments`
/// * [`ProfileError::InvalidInput`] - a true length is negative or not finite,
///   or `options` are unusable
pub fn export(
    segments: &[Segment],
    true_lengths: Option<&[f64]>,
    options: &ExportOptions,
) -> ProfileResult<GeometryModel> {
    options.validate()?;
    if let Some(lengths) = true_lengths {
        validate_true_lengths(segments, lengths)?;
    }

    let mut model = GeometryModel {
        lines: Vec::with_capacity(segments.len()),
        dimensions: Vec::with_capacity(segments.len()),
    };

    for (i, segment) in segments.iter().enumerate() {
        let id = format!("line-{}", i + 1);
        let value = true_lengths.map_or_else(|| segment.length(), |lengths| lengths[i]);

        model.dimensions.push(dimension_tick(&id, segment, value, options));
        model.lines.push(LinePath {
            id,
            x1: segment.x1,
            y1: segment.y1,
            x2: segment.x2,
            y2: segment.y2,
        });
    }

    Ok(model)
}

/// Check that externally maintained lengths line up with the segments.
pub fn validate_true_lengths(segments: &[Segment], lengths: &[f64]) -> ProfileResult<()> {
    if lengths.len() != segments.len() {
        return Err(ProfileError::LengthMismatch {
            segments: segments.len(),
            lengths: lengths.len(),
        });
    }
    if let Some((i, bad)) = lengths
        .iter()
        .enumerate()
        .find(|(_, l)| !(l.is_finite() && **l >= 0.0))
    {
        return Err(ProfileError::invalid_input(
            format!("true_lengths[{}]", i),
            bad.to_string(),
            "length must be finite and non-negative",
        ));
    }
    Ok(())
}

fn dimension_tick(id: &str, segment: &Segment, value: f64, options: &ExportOptions) -> DimensionTick {
    let mid = segment.midpoint();
    let c = options.clearance;

    let (tick_start, tick_end, label_position) = if segment.is_near_horizontal() {
        (
            Point::new(mid.x, mid.y - c),
            Point::new(mid.x, mid.y + c),
            Point::new(mid.x, mid.y + c + options.label_offset),
        )
    } else {
        (
            Point::new(mid.x - c, mid.y),
            Point::new(mid.x + c, mid.y),
            Point::new(mid.x + c + options.label_offset, mid.y),
        )
    };

    DimensionTick {
        segment_id: id.to_string(),
        tick_start,
        tick_end,
        label_position,
        value,
    }
}
