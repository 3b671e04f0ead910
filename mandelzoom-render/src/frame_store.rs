use std::ops::RangeInclusive;
use std::sync::Arc;

use crate::error::RenderError;
use crate::frame::Frame;

/// Ordered sequence of rendered frames plus the "currently displayed"
/// cursor.
///
/// Frames are only ever appended; the cursor always lies in
/// `[0, last_index]`. Navigation helpers clamp, while the indexed accessors
/// report `OutOfRange` instead of clamping.
#[derive(Debug, Default)]
pub struct FrameStore {
    frames: Vec<Arc<Frame>>,
    displayed: usize,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame and return its index. The cursor does not move.
    pub fn append(&mut self, frame: Frame) -> usize {
        self.frames.push(Arc::new(frame));
        self.frames.len() - 1
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the most recently appended frame (0 when empty).
    pub fn last_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    pub fn frame(&self, index: usize) -> crate::Result<Arc<Frame>> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(RenderError::OutOfRange {
                index,
                last: self.last_index(),
            })
    }

    pub fn displayed(&self) -> usize {
        self.displayed
    }

    /// The frame under the cursor, if any frame exists.
    pub fn displayed_frame(&self) -> Option<Arc<Frame>> {
        self.frames.get(self.displayed).cloned()
    }

    pub fn set_displayed(&mut self, index: usize) -> crate::Result<()> {
        if index >= self.frames.len() {
            return Err(RenderError::OutOfRange {
                index,
                last: self.last_index(),
            });
        }
        self.displayed = index;
        Ok(())
    }

    pub fn next(&mut self) -> usize {
        self.displayed = (self.displayed + 1).min(self.last_index());
        self.displayed
    }

    pub fn previous(&mut self) -> usize {
        self.displayed = self.displayed.saturating_sub(1);
        self.displayed
    }

    pub fn last(&mut self) -> usize {
        self.displayed = self.last_index();
        self.displayed
    }

    /// Indices visited by a full replay: frame 1 through the last frame.
    ///
    /// Empty when only the initial frame exists.
    pub fn replay_all(&self) -> RangeInclusive<usize> {
        1..=self.last_index()
    }

    /// Indices visited when replaying the most recent zoom of
    /// `frames_per_zoom` frames, starting from the frame it zoomed from.
    pub fn replay_last(&self, frames_per_zoom: usize) -> RangeInclusive<usize> {
        let last = self.last_index();
        last.saturating_sub(frames_per_zoom)..=last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Raster;
    use mandelzoom_core::PlaneWindow;

    fn frame(magnification: f64) -> Frame {
        Frame {
            raster: Raster::new(2, 2),
            magnification,
            window: PlaneWindow::INITIAL,
            max_iterations: 10,
        }
    }

    fn store_with(n: usize) -> FrameStore {
        let mut store = FrameStore::new();
        for i in 0..n {
            store.append(frame(1.0 + i as f64));
        }
        store
    }

    #[test]
    fn append_returns_index() {
        let mut store = FrameStore::new();
        assert!(store.is_empty());
        assert_eq!(store.append(frame(1.0)), 0);
        assert_eq!(store.append(frame(2.0)), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.last_index(), 1);
        assert_eq!(store.displayed(), 0, "append must not move the cursor");
    }

    #[test]
    fn frame_out_of_range() {
        let store = store_with(3);
        assert_eq!(store.frame(2).unwrap().magnification, 3.0);
        assert_eq!(
            store.frame(3).unwrap_err(),
            RenderError::OutOfRange { index: 3, last: 2 }
        );
    }

    #[test]
    fn set_displayed_rejects_without_clamping() {
        let mut store = store_with(3);
        store.set_displayed(2).unwrap();
        assert!(store.set_displayed(5).is_err());
        assert_eq!(store.displayed(), 2);
    }

    #[test]
    fn previous_clamps_at_zero() {
        let mut store = store_with(3);
        assert_eq!(store.previous(), 0);
        assert_eq!(store.previous(), 0);
    }

    #[test]
    fn next_clamps_at_last() {
        let mut store = store_with(3);
        assert_eq!(store.next(), 1);
        assert_eq!(store.next(), 2);
        assert_eq!(store.next(), 2);
    }

    #[test]
    fn last_jumps_to_end() {
        let mut store = store_with(5);
        assert_eq!(store.last(), 4);
        assert_eq!(store.displayed_frame().unwrap().magnification, 5.0);
    }

    #[test]
    fn replay_all_skips_initial_frame() {
        let store = store_with(4);
        assert_eq!(store.replay_all().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(store_with(1).replay_all().count(), 0);
    }

    #[test]
    fn replay_last_starts_at_zoom_origin() {
        let store = store_with(21);
        assert_eq!(
            store.replay_last(10).collect::<Vec<_>>(),
            (10..=20).collect::<Vec<_>>()
        );
        // Fewer frames than a full zoom: start from the first frame.
        assert_eq!(store_with(3).replay_last(10).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
