//! # Pointer Input Tracking
//!
//! Turns device pointer events into segment commits. Mouse and touch events
//! are both mapped onto [`PointerEvent`] by the host before they get here, so
//! the tracker only ever sees `{phase, position, contact}`.
//!
//! ## Capture state machine
//!
//! - **Idle chain** (no anchor): a primary press starts a chain at the press
//!   position. Nothing is committed.
//! - **Chaining** (anchor set): a primary press snaps the press position
//!   around the anchor, commits `anchor → snapped` and continues the chain
//!   from `snapped`.
//! - Moving while chaining updates the preview segment only.
//! - Releasing or leaving the canvas clears the preview only.
//!
//! While [`DrawingState::Paused`] all pointer input is ignored. Only the first
//! touch contact is followed; further simultaneous fingers are ignored.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::geometry::Point;
//! use profile_core::input::{PointerEvent, PointerInputTracker};
//!
//! let mut tracker = PointerInputTracker::default();
//! tracker.handle(PointerEvent::mouse_down(Point::new(0.0, 0.0)));
//! tracker.handle(PointerEvent::mouse_down(Point::new(40.0, 3.0)));
//!
//! let seg = tracker.store().segments()[0];
//! assert_eq!(seg.y2, 0.0);
//! ```

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Segment};
use crate::snap;
use crate::store::SegmentStore;

/// Whether the tool currently accepts drawing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrawingState {
    #[default]
    Active,
    Paused,
}

impl DrawingState {
    pub fn toggled(self) -> Self {
        match self {
            DrawingState::Active => DrawingState::Paused,
            DrawingState::Paused => DrawingState::Active,
        }
    }

    pub fn is_active(self) -> bool {
        self == DrawingState::Active
    }
}

/// Which physical contact produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactId {
    Mouse,
    Touch(u64),
}

/// Event phase, shared by mouse and touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    /// Primary button pressed / finger down
    Down,
    /// Hover or drag
    Move,
    /// Primary button released / finger lifted
    Up,
    /// Pointer left the canvas or the touch was cancelled
    Leave,
}

/// Device-independent pointer event in client (window) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    pub contact: ContactId,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Point, contact: ContactId) -> Self {
        PointerEvent {
            phase,
            position,
            contact,
        }
    }

    pub fn mouse_down(position: Point) -> Self {
        Self::new(PointerPhase::Down, position, ContactId::Mouse)
    }

    pub fn mouse_move(position: Point) -> Self {
        Self::new(PointerPhase::Move, position, ContactId::Mouse)
    }

    pub fn mouse_up(position: Point) -> Self {
        Self::new(PointerPhase::Up, position, ContactId::Mouse)
    }

    pub fn touch(phase: PointerPhase, id: u64, position: Point) -> Self {
        Self::new(phase, position, ContactId::Touch(id))
    }
}

/// Ephemeral line from the anchor to the projected pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewSegment {
    pub anchor: Point,
    pub tip: Point,
}

impl PreviewSegment {
    pub fn as_segment(&self) -> Segment {
        Segment::between(self.anchor, self.tip)
    }
}

/// One digitizer tool instance: the segment store plus the transient input
/// state that drives it.
#[derive(Debug, Default)]
pub struct PointerInputTracker {
    store: SegmentStore,
    drawing: DrawingState,
    preview: Option<PreviewSegment>,
    active_touch: Option<u64>,
    canvas_origin: Point,
}

impl PointerInputTracker {
    /// Wrap an existing store (typically one with an observer installed).
    pub fn new(store: SegmentStore) -> Self {
        PointerInputTracker {
            store,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }

    pub fn anchor(&self) -> Option<Point> {
        self.store.anchor()
    }

    pub fn preview(&self) -> Option<PreviewSegment> {
        self.preview
    }

    pub fn drawing_state(&self) -> DrawingState {
        self.drawing
    }

    /// Undo and Clear only act while drawing is active.
    pub fn controls_enabled(&self) -> bool {
        self.drawing.is_active()
    }

    /// Top-left corner of the canvas in client coordinates.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    pub fn canvas_origin(&self) -> Point {
        self.canvas_origin
    }

    /// Feed one pointer event. Returns `true` when the visible state changed
    /// and the canvas should be redrawn.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        if !self.drawing.is_active() {
            trace!("ignoring {:?} while paused", event.phase);
            return false;
        }
        if !self.accepts_contact(event) {
            trace!("ignoring secondary contact {:?}", event.contact);
            return false;
        }

        // Ending a contact needs no position; the touch slot is always freed.
        if matches!(event.phase, PointerPhase::Up | PointerPhase::Leave) {
            if let ContactId::Touch(_) = event.contact {
                self.active_touch = None;
            }
            return self.preview.take().is_some();
        }

        let point = event.position.relative_to(self.canvas_origin);
        if !point.is_finite() {
            return false;
        }

        match event.phase {
            PointerPhase::Down => self.press(point),
            PointerPhase::Move => self.hover(point),
            PointerPhase::Up | PointerPhase::Leave => false,
        }
    }

    /// Remove the last committed segment.
    pub fn undo(&mut self) -> bool {
        if !self.controls_enabled() {
            debug!("undo ignored while paused");
            return false;
        }
        self.preview = None;
        self.store.undo_last().is_some()
    }

    /// Discard every segment and cancel the current chain.
    pub fn clear(&mut self) -> bool {
        if !self.controls_enabled() {
            debug!("clear ignored while paused");
            return false;
        }
        self.preview = None;
        self.store.reset();
        true
    }

    /// Flip between active and paused drawing.
    pub fn toggle(&mut self) -> DrawingState {
        self.drawing = self.drawing.toggled();
        if !self.drawing.is_active() {
            self.preview = None;
            self.active_touch = None;
        }
        debug!("drawing state -> {:?}", self.drawing);
        self.drawing
    }

    /// Replace the segments with a host-supplied list (initial value or an
    /// external change). Drawing state is left untouched.
    pub fn load_from_host(&mut self, segments: &[Segment]) {
        self.preview = None;
        self.store.replace_from_host(segments);
    }

    /// Install the store's change observer after construction.
    pub fn store_mut(&mut self) -> &mut SegmentStore {
        &mut self.store
    }

    fn accepts_contact(&mut self, event: PointerEvent) -> bool {
        match (event.contact, self.active_touch) {
            (ContactId::Touch(id), Some(active)) => id == active,
            (ContactId::Touch(id), None) => {
                if event.phase == PointerPhase::Down {
                    self.active_touch = Some(id);
                    true
                } else {
                    // move/up of a finger we never saw go down
                    false
                }
            }
            (ContactId::Mouse, Some(_)) => false,
            (ContactId::Mouse, None) => true,
        }
    }

    fn press(&mut self, point: Point) -> bool {
        let Some(anchor) = self.store.anchor() else {
            self.store.begin_chain(point);
            self.preview = None;
            return true;
        };

        let snapped = snap::project(anchor, point);
        if snapped == anchor {
            debug!("ignoring zero-length commit at anchor");
            return false;
        }

        self.store.append(Segment::between(anchor, snapped));
        self.preview = None;
        true
    }

    fn hover(&mut self, point: Point) -> bool {
        let Some(anchor) = self.store.anchor() else {
            return false;
        };
        let tip = snap::project(anchor, point);
        trace!("preview tip ({:.2}, {:.2})", tip.x, tip.y);
        self.preview = Some(PreviewSegment { anchor, tip });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_tracker() -> (PointerInputTracker, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let store = SegmentStore::new().with_observer(move |_: &[Segment]| sink.set(sink.get() + 1));
        (PointerInputTracker::new(store), count)
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_first_press_only_sets_anchor() {
        let (mut tracker, count) = counting_tracker();
        assert!(tracker.handle(PointerEvent::mouse_down(p(5.0, 5.0))));
        assert_eq!(tracker.anchor(), Some(p(5.0, 5.0)));
        assert!(tracker.segments().is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_chain_commits_snapped_segments() {
        let (mut tracker, count) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        tracker.handle(PointerEvent::mouse_down(p(10.0, 1.0)));
        tracker.handle(PointerEvent::mouse_down(p(11.0, 30.0)));

        let segs = tracker.segments();
        assert_eq!(segs.len(), 2);
        assert_eq!(count.get(), 2);
        assert_eq!(segs[0].end(), segs[1].start());
        assert!(segs.iter().all(Segment::is_snapped));
        assert_relative_eq!(segs[0].length(), 101.0_f64.sqrt(), epsilon = 1e-9);
        assert_eq!(tracker.anchor(), Some(segs[1].end()));
    }

    #[test]
    fn test_canvas_origin_is_subtracted() {
        let (mut tracker, _) = counting_tracker();
        tracker.set_canvas_origin(p(100.0, 50.0));
        tracker.handle(PointerEvent::mouse_down(p(110.0, 60.0)));
        assert_eq!(tracker.anchor(), Some(p(10.0, 10.0)));
    }

    #[test]
    fn test_move_updates_preview_without_commit() {
        let (mut tracker, count) = counting_tracker();
        assert!(!tracker.handle(PointerEvent::mouse_move(p(3.0, 3.0))));
        assert!(tracker.preview().is_none());

        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        assert!(tracker.handle(PointerEvent::mouse_move(p(20.0, 19.0))));

        let preview = tracker.preview().unwrap();
        assert_eq!(preview.anchor, p(0.0, 0.0));
        assert!(preview.as_segment().is_snapped());
        assert_relative_eq!(preview.as_segment().angle_deg(), 45.0, epsilon = 1e-9);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_up_and_leave_clear_preview_only() {
        let (mut tracker, _) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        tracker.handle(PointerEvent::mouse_move(p(10.0, 0.0)));
        assert!(tracker.handle(PointerEvent::mouse_up(p(10.0, 0.0))));
        assert!(tracker.preview().is_none());
        assert_eq!(tracker.anchor(), Some(p(0.0, 0.0)));

        tracker.handle(PointerEvent::mouse_move(p(10.0, 0.0)));
        let leave = PointerEvent::new(PointerPhase::Leave, p(-1.0, 0.0), ContactId::Mouse);
        assert!(tracker.handle(leave));
        assert!(tracker.preview().is_none());
        assert!(tracker.segments().is_empty());
    }

    #[test]
    fn test_paused_ignores_pointer_input() {
        let (mut tracker, count) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        tracker.handle(PointerEvent::mouse_down(p(10.0, 0.0)));
        assert_eq!(tracker.toggle(), DrawingState::Paused);

        let before = (tracker.segments().to_vec(), tracker.anchor());
        assert!(!tracker.handle(PointerEvent::mouse_down(p(10.0, 40.0))));
        assert!(!tracker.handle(PointerEvent::mouse_move(p(10.0, 40.0))));
        assert_eq!((tracker.segments().to_vec(), tracker.anchor()), before);
        assert!(tracker.preview().is_none());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_pausing_drops_preview() {
        let (mut tracker, _) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        tracker.handle(PointerEvent::mouse_move(p(0.0, 10.0)));
        assert!(tracker.preview().is_some());
        tracker.toggle();
        assert!(tracker.preview().is_none());
        assert_eq!(tracker.toggle(), DrawingState::Active);
    }

    #[test]
    fn test_controls_inert_while_paused() {
        let (mut tracker, count) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        tracker.handle(PointerEvent::mouse_down(p(10.0, 0.0)));
        tracker.toggle();

        assert!(!tracker.controls_enabled());
        assert!(!tracker.undo());
        assert!(!tracker.clear());
        assert_eq!(tracker.segments().len(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_undo_and_clear() {
        let (mut tracker, count) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(0.0, 0.0)));
        tracker.handle(PointerEvent::mouse_down(p(10.0, 0.0)));
        tracker.handle(PointerEvent::mouse_down(p(10.0, 10.0)));

        assert!(tracker.undo());
        assert_eq!(tracker.anchor(), Some(p(10.0, 0.0)));

        assert!(tracker.clear());
        assert!(tracker.segments().is_empty());
        assert_eq!(tracker.anchor(), None);
        assert!(tracker.preview().is_none());
        assert_eq!(count.get(), 4);

        // next press starts a new chain
        tracker.handle(PointerEvent::mouse_down(p(50.0, 50.0)));
        assert!(tracker.segments().is_empty());
        assert_eq!(tracker.anchor(), Some(p(50.0, 50.0)));
    }

    #[test]
    fn test_second_touch_is_ignored() {
        let (mut tracker, _) = counting_tracker();
        assert!(tracker.handle(PointerEvent::touch(PointerPhase::Down, 1, p(0.0, 0.0))));
        assert!(!tracker.handle(PointerEvent::touch(PointerPhase::Down, 2, p(50.0, 0.0))));
        assert!(!tracker.handle(PointerEvent::touch(PointerPhase::Move, 2, p(50.0, 50.0))));
        assert!(tracker.preview().is_none());

        // the tracked finger still drives the preview
        assert!(tracker.handle(PointerEvent::touch(PointerPhase::Move, 1, p(0.0, 30.0))));
        assert!(tracker.preview().is_some());

        // lifting the first finger frees the slot for the next one
        tracker.handle(PointerEvent::touch(PointerPhase::Up, 1, p(0.0, 30.0)));
        assert!(tracker.handle(PointerEvent::touch(PointerPhase::Down, 2, p(0.0, 30.0))));
        assert_eq!(tracker.segments().len(), 1);
    }

    #[test]
    fn test_mouse_ignored_during_touch() {
        let (mut tracker, _) = counting_tracker();
        tracker.handle(PointerEvent::touch(PointerPhase::Down, 7, p(0.0, 0.0)));
        assert!(!tracker.handle(PointerEvent::mouse_down(p(20.0, 0.0))));
        assert!(tracker.segments().is_empty());
    }

    #[test]
    fn test_zero_length_press_is_ignored() {
        let (mut tracker, count) = counting_tracker();
        tracker.handle(PointerEvent::mouse_down(p(3.0, 3.0)));
        assert!(!tracker.handle(PointerEvent::mouse_down(p(3.0, 3.0))));
        assert!(tracker.segments().is_empty());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_non_finite_position_is_ignored() {
        let (mut tracker, _) = counting_tracker();
        assert!(!tracker.handle(PointerEvent::mouse_down(p(f64::NAN, 0.0))));
        assert_eq!(tracker.anchor(), None);
    }

    #[test]
    fn test_touch_lifted_at_non_finite_position_frees_slot() {
        let (mut tracker, _) = counting_tracker();
        assert!(tracker.handle(PointerEvent::touch(PointerPhase::Down, 1, p(0.0, 0.0))));
        tracker.handle(PointerEvent::touch(PointerPhase::Up, 1, p(f64::NAN, 0.0)));

        // mouse is accepted again, and so is a new finger
        assert!(tracker.handle(PointerEvent::mouse_move(p(20.0, 0.0))));
        assert!(tracker.handle(PointerEvent::touch(PointerPhase::Down, 2, p(20.0, 1.0))));
        assert_eq!(tracker.segments().len(), 1);
    }

    #[test]
    fn test_load_from_host_keeps_drawing_state() {
        let (mut tracker, count) = counting_tracker();
        tracker.toggle();
        tracker.load_from_host(&[Segment::new(0.0, 0.0, 0.0, 10.0)]);
        assert_eq!(tracker.drawing_state(), DrawingState::Paused);
        assert_eq!(tracker.segments().len(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_pointer_event_json() {
        let event = PointerEvent::touch(PointerPhase::Down, 3, p(1.0, 2.0));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"phase":"down","position":{"x":1.0,"y":2.0},"contact":{"touch":3}}"#
        );
    }
}
