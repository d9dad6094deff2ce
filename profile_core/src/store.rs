//! # Segment Store
//!
//! Owns the ordered list of committed segments and the chain anchor. This is
//! the single source of truth of a digitizer instance; renderers and exporters
//! only read from it.
//!
//! ## Change notification
//!
//! Every mutating call (`append`, `undo_last`, `reset`, `replace_from_host`)
//! synchronously invokes the injected [`SegmentObserver`] exactly once with
//! the complete current sequence (not a diff). `undo_last` on an empty store
//! is a no-op and does not notify. Reading [`SegmentStore::segments`] after a
//! notification returns exactly what the notification carried.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use profile_core::geometry::Segment;
//! use profile_core::store::SegmentStore;
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let mut store = SegmentStore::new().with_observer(move |segments: &[Segment]| {
//!     *sink.borrow_mut() = segments.to_vec();
//! });
//!
//! store.append(Segment::new(0.0, 0.0, 10.0, 0.0));
//! assert_eq!(seen.borrow().len(), 1);
//! assert_eq!(store.anchor().map(|p| p.x), Some(10.0));
//! ```

use log::{debug, warn};

use crate::geometry::{Point, Segment};

/// Receiver of segment change notifications.
///
/// Implemented for any `FnMut(&[Segment])`, so a closure can be injected
/// directly.
pub trait SegmentObserver {
    fn segments_changed(&mut self, segments: &[Segment]);
}

impl<F> SegmentObserver for F
where
    F: FnMut(&[Segment]),
{
    fn segments_changed(&mut self, segments: &[Segment]) {
        self(segments)
    }
}

/// Ordered segment list plus the open end of the current chain.
#[derive(Default)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    anchor: Option<Point>,
    observer: Option<Box<dyn SegmentObserver>>,
}

impl std::fmt::Debug for SegmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentStore")
            .field("segments", &self.segments)
            .field("anchor", &self.anchor)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SegmentStore {
    /// Create an empty store with no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style observer injection.
    pub fn with_observer(mut self, observer: impl SegmentObserver + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    /// Install (or replace) the change observer.
    pub fn set_observer(&mut self, observer: impl SegmentObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Remove the change observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Committed segments in drawing order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Open end of the current chain, `None` when no chain is active.
    pub fn anchor(&self) -> Option<Point> {
        self.anchor
    }

    /// Start a new chain at `point` without committing anything.
    ///
    /// Not a sequence mutation, so the observer is not called.
    pub fn begin_chain(&mut self, point: Point) {
        debug!("chain started at ({:.2}, {:.2})", point.x, point.y);
        self.anchor = Some(point);
    }

    /// Commit a segment and move the anchor to its endpoint.
    pub fn append(&mut self, segment: Segment) {
        self.segments.push(segment);
        self.anchor = Some(segment.end());
        debug!("segment {} appended: {:?}", self.segments.len(), segment);
        self.notify();
    }

    /// Remove the most recent segment.
    ///
    /// The anchor falls back to the new tail's endpoint, or `None` once the
    /// store is empty. Returns the removed segment; an empty store is left
    /// untouched and nothing is notified.
    pub fn undo_last(&mut self) -> Option<Segment> {
        let removed = self.segments.pop()?;
        self.anchor = self.segments.last().map(Segment::end);
        debug!("segment {} undone", self.segments.len() + 1);
        self.notify();
        Some(removed)
    }

    /// Drop every segment and the anchor.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.anchor = None;
        debug!("store reset");
        self.notify();
    }

    /// Overwrite the sequence with a host-supplied list.
    ///
    /// No merge with the previous state. Entries with non-finite coordinates
    /// are dropped. The anchor continues from the last kept segment so the
    /// operator can extend a loaded profile.
    pub fn replace_from_host(&mut self, segments: &[Segment]) {
        let kept: Vec<Segment> = segments.iter().copied().filter(Segment::is_finite).collect();
        let dropped = segments.len() - kept.len();
        if dropped > 0 {
            warn!("dropped {} host segment(s) with non-finite coordinates", dropped);
        }

        self.segments = kept;
        self.anchor = self.segments.last().map(Segment::end);
        debug!("store replaced from host: {} segment(s)", self.segments.len());
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer.segments_changed(&self.segments);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Vec<Segment>>>>;

    fn observed_store() -> (SegmentStore, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let store = SegmentStore::new().with_observer(move |segments: &[Segment]| {
            sink.borrow_mut().push(segments.to_vec());
        });
        (store, log)
    }

    fn chain() -> [Segment; 3] {
        [
            Segment::new(0.0, 0.0, 10.0, 0.0),
            Segment::new(10.0, 0.0, 10.0, 10.0),
            Segment::new(10.0, 10.0, 20.0, 20.0),
        ]
    }

    #[test]
    fn test_append_moves_anchor_and_notifies() {
        let (mut store, log) = observed_store();
        store.append(chain()[0]);
        assert_eq!(store.anchor(), Some(Point::new(10.0, 0.0)));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0], vec![chain()[0]]);
    }

    #[test]
    fn test_undo_inverts_append() {
        let (mut store, _log) = observed_store();
        store.append(chain()[0]);
        let before = (store.segments().to_vec(), store.anchor());

        store.append(chain()[1]);
        let removed = store.undo_last();

        assert_eq!(removed, Some(chain()[1]));
        assert_eq!((store.segments().to_vec(), store.anchor()), before);
    }

    #[test]
    fn test_three_commits_two_undos() {
        let (mut store, log) = observed_store();
        for seg in chain() {
            store.append(seg);
        }
        store.undo_last();
        store.undo_last();

        assert_eq!(store.len(), 1);
        assert_eq!(store.anchor(), Some(chain()[0].end()));
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn test_undo_to_empty_clears_anchor() {
        let (mut store, _log) = observed_store();
        store.append(chain()[0]);
        store.undo_last();
        assert!(store.is_empty());
        assert_eq!(store.anchor(), None);
    }

    #[test]
    fn test_undo_on_empty_is_silent() {
        let (mut store, log) = observed_store();
        assert_eq!(store.undo_last(), None);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_reset_then_undo_is_noop() {
        let (mut store, log) = observed_store();
        for seg in chain() {
            store.append(seg);
        }
        store.reset();
        assert_eq!(log.borrow().last().unwrap(), &Vec::<Segment>::new());

        for _ in 0..4 {
            store.undo_last();
        }
        assert!(store.is_empty());
        assert_eq!(store.anchor(), None);
        // 3 appends + 1 reset, undos on empty do not notify
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn test_replace_round_trip() {
        let (mut store, log) = observed_store();
        store.append(Segment::new(5.0, 5.0, 6.0, 5.0));

        store.replace_from_host(&chain());
        assert_eq!(store.segments(), &chain());
        assert_eq!(store.anchor(), Some(chain()[2].end()));
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(log.borrow()[1], chain().to_vec());
    }

    #[test]
    fn test_replace_drops_non_finite() {
        let (mut store, log) = observed_store();
        let input = [
            chain()[0],
            Segment::new(f64::NAN, 0.0, 1.0, 1.0),
            chain()[1],
            Segment::new(0.0, 0.0, f64::INFINITY, 1.0),
        ];
        store.replace_from_host(&input);
        assert_eq!(store.segments(), &chain()[..2]);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_replace_with_empty_clears_anchor() {
        let (mut store, _log) = observed_store();
        store.append(chain()[0]);
        store.replace_from_host(&[]);
        assert!(store.is_empty());
        assert_eq!(store.anchor(), None);
    }

    #[test]
    fn test_begin_chain_does_not_notify() {
        let (mut store, log) = observed_store();
        store.begin_chain(Point::new(1.0, 2.0));
        assert_eq!(store.anchor(), Some(Point::new(1.0, 2.0)));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_notification_matches_state() {
        let (mut store, log) = observed_store();
        for seg in chain() {
            store.append(seg);
            assert_eq!(log.borrow().last().unwrap().as_slice(), store.segments());
        }
    }

    #[test]
    fn test_store_without_observer() {
        let mut store = SegmentStore::new();
        store.append(chain()[0]);
        store.reset();
        assert!(store.is_empty());
    }
}
