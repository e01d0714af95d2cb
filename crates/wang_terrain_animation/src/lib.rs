//! wang_terrain_animation - Tile animation timelines for wang_terrain
//!
//! Tiled tile animations are an ordered list of `(tile, duration)` frames that
//! loop forever. This crate turns such a list into a [`FrameTimeline`] with a
//! precomputed prefix-sum table, and collects the timelines of a tileset in an
//! [`AnimationClock`].
//!
//! Time is never tracked here: every query takes the caller's elapsed
//! milliseconds, so the same input always yields the same frame.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wang_terrain_animation::{AnimationClock, Frame};
//!
//! let mut clock = AnimationClock::new();
//! clock.insert(0, &[
//!     Frame::new(0, 100),
//!     Frame::new(3, 100),
//!     Frame::new(6, 100),
//!     Frame::new(9, 100),
//! ])?;
//!
//! assert_eq!(clock.current_frame(0, 250), 6);
//! assert_eq!(clock.current_frame(0, 650), 6);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A single animation frame: which tile to show and for how long
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Tile shown while this frame is active
    pub tile_id: u32,
    /// How long the frame stays on screen, in milliseconds
    pub duration_ms: u32,
}

impl Frame {
    pub const fn new(tile_id: u32, duration_ms: u32) -> Self {
        Self {
            tile_id,
            duration_ms,
        }
    }
}

/// Reasons a frame list cannot become a timeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("animation has no frames")]
    NoFrames,
    #[error("frame {index} (tile {tile_id}) has a zero duration")]
    ZeroDuration { index: usize, tile_id: u32 },
}

/// A looping frame sequence with a prefix-sum table of frame end times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTimeline {
    tiles: Vec<u32>,
    /// `ends[i]` is the time at which frame `i` stops being shown
    ends: Vec<u64>,
    period_ms: u64,
}

impl FrameTimeline {
    /// Build a timeline, rejecting empty lists and zero-length frames
    pub fn new(frames: &[Frame]) -> Result<Self, AnimationError> {
        if frames.is_empty() {
            return Err(AnimationError::NoFrames);
        }

        let mut tiles = Vec::with_capacity(frames.len());
        let mut ends = Vec::with_capacity(frames.len());
        let mut elapsed = 0u64;

        for (index, frame) in frames.iter().enumerate() {
            if frame.duration_ms == 0 {
                return Err(AnimationError::ZeroDuration {
                    index,
                    tile_id: frame.tile_id,
                });
            }
            elapsed += u64::from(frame.duration_ms);
            tiles.push(frame.tile_id);
            ends.push(elapsed);
        }

        Ok(Self {
            tiles,
            ends,
            period_ms: elapsed,
        })
    }

    /// Length of one full loop in milliseconds (always > 0)
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn frame_count(&self) -> usize {
        self.tiles.len()
    }

    /// Tiles in frame order
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Index of the frame active at `elapsed_ms`
    pub fn frame_index_at(&self, elapsed_ms: u64) -> usize {
        let t = elapsed_ms % self.period_ms;
        // First frame whose end lies strictly after t
        self.ends
            .partition_point(|&end| end <= t)
            .min(self.tiles.len() - 1)
    }

    /// Tile shown at `elapsed_ms`
    pub fn frame_at(&self, elapsed_ms: u64) -> u32 {
        self.tiles[self.frame_index_at(elapsed_ms)]
    }
}

/// Timelines of every animated tile in a tileset, keyed by tile id
#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    timelines: HashMap<u32, FrameTimeline>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the animation of `tile_id`, replacing any previous one
    pub fn insert(&mut self, tile_id: u32, frames: &[Frame]) -> Result<(), AnimationError> {
        let timeline = FrameTimeline::new(frames)?;
        self.timelines.insert(tile_id, timeline);
        Ok(())
    }

    /// Get the timeline of an animated tile
    pub fn timeline(&self, tile_id: u32) -> Option<&FrameTimeline> {
        self.timelines.get(&tile_id)
    }

    pub fn is_animated(&self, tile_id: u32) -> bool {
        self.timelines.contains_key(&tile_id)
    }

    /// Tile to display for `tile_id` at `elapsed_ms`.
    ///
    /// Tiles without an animation display themselves.
    pub fn current_frame(&self, tile_id: u32, elapsed_ms: u64) -> u32 {
        match self.timelines.get(&tile_id) {
            Some(timeline) => timeline.frame_at(elapsed_ms),
            None => tile_id,
        }
    }

    /// Number of animated tiles
    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }

    /// Iterate over `(tile_id, timeline)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &FrameTimeline)> {
        self.timelines.iter().map(|(&id, timeline)| (id, timeline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_frames() -> Vec<Frame> {
        vec![
            Frame::new(0, 100),
            Frame::new(3, 100),
            Frame::new(6, 100),
            Frame::new(9, 100),
        ]
    }

    #[test]
    fn test_frame_at_walks_spans() {
        let timeline = FrameTimeline::new(&water_frames()).unwrap();
        assert_eq!(timeline.period_ms(), 400);
        assert_eq!(timeline.frame_at(0), 0);
        assert_eq!(timeline.frame_at(99), 0);
        assert_eq!(timeline.frame_at(100), 3);
        assert_eq!(timeline.frame_at(250), 6);
        assert_eq!(timeline.frame_at(399), 9);
        assert_eq!(timeline.frame_at(400), 0);
    }

    #[test]
    fn test_frame_at_wraps_by_period() {
        let timeline = FrameTimeline::new(&water_frames()).unwrap();
        assert_eq!(timeline.frame_at(650), 6);
        for t in [0u64, 17, 100, 250, 399] {
            for k in 0..50u64 {
                assert_eq!(timeline.frame_at(t), timeline.frame_at(t + k * 400));
            }
        }
    }

    #[test]
    fn test_uneven_durations() {
        let timeline =
            FrameTimeline::new(&[Frame::new(1, 10), Frame::new(2, 290), Frame::new(3, 50)])
                .unwrap();
        assert_eq!(timeline.period_ms(), 350);
        assert_eq!(timeline.frame_at(9), 1);
        assert_eq!(timeline.frame_at(10), 2);
        assert_eq!(timeline.frame_at(299), 2);
        assert_eq!(timeline.frame_at(300), 3);
        assert_eq!(timeline.frame_at(349), 3);
    }

    #[test]
    fn test_huge_elapsed_time() {
        let timeline = FrameTimeline::new(&water_frames()).unwrap();
        // u64::MAX % 400 == 15
        assert_eq!(timeline.frame_at(u64::MAX), 0);
        assert_eq!(timeline.frame_at(u64::MAX - 15 - 150), 6);
    }

    #[test]
    fn test_single_frame() {
        let timeline = FrameTimeline::new(&[Frame::new(7, 1)]).unwrap();
        assert_eq!(timeline.frame_at(0), 7);
        assert_eq!(timeline.frame_at(12345), 7);
    }

    #[test]
    fn test_rejects_malformed_frames() {
        assert_eq!(FrameTimeline::new(&[]), Err(AnimationError::NoFrames));
        assert_eq!(
            FrameTimeline::new(&[Frame::new(1, 100), Frame::new(2, 0)]),
            Err(AnimationError::ZeroDuration {
                index: 1,
                tile_id: 2
            })
        );
    }

    #[test]
    fn test_clock_passes_through_static_tiles() {
        let mut clock = AnimationClock::new();
        clock.insert(0, &water_frames()).unwrap();

        assert!(clock.is_animated(0));
        assert!(!clock.is_animated(5));
        assert_eq!(clock.current_frame(0, 250), 6);
        assert_eq!(clock.current_frame(5, 250), 5);
        assert_eq!(clock.len(), 1);
    }

    #[test]
    fn test_frame_serde() {
        let frame: Frame = serde_json::from_str(r#"{ "tile_id": 3, "duration_ms": 100 }"#).unwrap();
        assert_eq!(frame, Frame::new(3, 100));
    }
}
