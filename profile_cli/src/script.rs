//! Scripted input for the command-line host.
//!
//! A script is a JSON array of steps that stand in for what a person would
//! do on the canvas:
//!
//! ```json
//! [
//!   { "action": "origin", "x": 100.0, "y": 40.0 },
//!   { "action": "pointer", "phase": "down", "position": { "x": 100.0, "y": 40.0 }, "contact": "mouse" },
//!   { "action": "pointer", "phase": "down", "position": { "x": 160.0, "y": 42.0 }, "contact": "mouse" },
//!   { "action": "undo" },
//!   { "action": "toggle" }
//! ]
//! ```
//!
//! The runner owns a tracker whose observer mirrors every change into a
//! [`ProfileDocument`], which is how a host is expected to persist.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use serde::{Deserialize, Serialize};

use profile_core::document::ProfileDocument;
use profile_core::geometry::{Point, Segment};
use profile_core::input::{DrawingState, PointerEvent, PointerInputTracker};
use profile_core::store::SegmentStore;

/// One scripted operator action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// A mouse or touch event in client coordinates
    Pointer(PointerEvent),
    /// Move the canvas origin (client coordinates of its top-left corner)
    Origin { x: f64, y: f64 },
    Undo,
    Clear,
    Toggle,
    /// Replace the segments, as a host does with an initial value
    Load { segments: Vec<Segment> },
}

/// Outcome of running a script.
pub struct ScriptRun {
    pub tracker: PointerInputTracker,
    pub document: ProfileDocument,
    /// Number of change notifications the host received
    pub notifications: usize,
}

/// Parse a JSON script.
pub fn parse_script(source: &str) -> serde_json::Result<Vec<ScriptStep>> {
    serde_json::from_str(source)
}

/// Run `steps` against a fresh tracker, mirroring changes into `document`.
pub fn run_script(steps: &[ScriptStep], document: ProfileDocument) -> ScriptRun {
    let mirror = Rc::new(RefCell::new((document, 0usize)));
    let sink = Rc::clone(&mirror);
    let store = SegmentStore::new().with_observer(move |segments: &[Segment]| {
        let mut state = sink.borrow_mut();
        state.0.set_segments(segments);
        state.1 += 1;
    });

    let mut tracker = PointerInputTracker::new(store);
    for (i, step) in steps.iter().enumerate() {
        debug!("step {}: {:?}", i + 1, step);
        apply(&mut tracker, step);
    }

    // Drop the observer so the tracker no longer holds the shared state
    tracker.store_mut().clear_observer();
    let (document, notifications) = match Rc::try_unwrap(mirror) {
        Ok(cell) => cell.into_inner(),
        Err(shared) => shared.borrow().clone(),
    };

    ScriptRun {
        tracker,
        document,
        notifications,
    }
}

fn apply(tracker: &mut PointerInputTracker, step: &ScriptStep) {
    match step {
        ScriptStep::Pointer(event) => {
            tracker.handle(*event);
        }
        ScriptStep::Origin { x, y } => tracker.set_canvas_origin(Point::new(*x, *y)),
        ScriptStep::Undo => {
            tracker.undo();
        }
        ScriptStep::Clear => {
            tracker.clear();
        }
        ScriptStep::Toggle => {
            if tracker.toggle() == DrawingState::Paused {
                debug!("drawing paused");
            }
        }
        ScriptStep::Load { segments } => tracker.load_from_host(segments),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_core::input::{ContactId, PointerPhase};

    fn down(x: f64, y: f64) -> ScriptStep {
        ScriptStep::Pointer(PointerEvent::mouse_down(Point::new(x, y)))
    }

    #[test]
    fn test_parse_script() {
        let source = r#"[
            { "action": "origin", "x": 10.0, "y": 10.0 },
            { "action": "pointer", "phase": "down", "position": { "x": 10.0, "y": 10.0 }, "contact": "mouse" },
            { "action": "pointer", "phase": "move", "position": { "x": 30.0, "y": 12.0 }, "contact": { "touch": 4 } },
            { "action": "undo" },
            { "action": "load", "segments": [ { "x1": 0.0, "y1": 0.0, "x2": 5.0, "y2": 0.0 } ] }
        ]"#;
        let steps = parse_script(source).unwrap();
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0], ScriptStep::Origin { x: 10.0, y: 10.0 });
        assert_eq!(
            steps[2],
            ScriptStep::Pointer(PointerEvent::new(
                PointerPhase::Move,
                Point::new(30.0, 12.0),
                ContactId::Touch(4)
            ))
        );
    }

    #[test]
    fn test_document_mirrors_store() {
        let steps = vec![down(0.0, 0.0), down(20.0, 1.0), down(21.0, 15.0), ScriptStep::Undo];
        let run = run_script(&steps, ProfileDocument::new("test"));

        assert_eq!(run.tracker.segments().len(), 1);
        assert_eq!(run.document.segments, run.tracker.segments());
        assert_eq!(run.notifications, 3);
    }

    #[test]
    fn test_paused_steps_do_not_notify() {
        let steps = vec![down(0.0, 0.0), ScriptStep::Toggle, down(10.0, 0.0), ScriptStep::Clear];
        let run = run_script(&steps, ProfileDocument::default());
        assert_eq!(run.notifications, 0);
        assert_eq!(run.tracker.drawing_state(), DrawingState::Paused);
        assert_eq!(run.tracker.anchor(), Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_replayed_document_reloads() {
        use profile_core::document::{load_document, save_document};

        let steps = vec![down(0.0, 0.0), down(30.0, 2.0), down(31.0, 40.0)];
        let run = run_script(&steps, ProfileDocument::new("bracket"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.json");
        save_document(&run.document, &path).unwrap();

        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded.meta.name, "bracket");
        assert_eq!(loaded.segments, run.tracker.segments());

        let replay = run_script(
            &[ScriptStep::Load { segments: loaded.segments.clone() }, down(31.0, 80.0)],
            loaded,
        );
        assert_eq!(replay.tracker.segments().len(), 3);
        let segments = replay.tracker.segments();
        assert_eq!(segments[2].start(), segments[1].end());
    }
}
