//! Per-frame camera cache
//!
//! Two tiers: the per-frame rider entries, plus memoized accumulated offsets
//! (a checkpoint every `interval` frames and a one-frame-deep incremental
//! slot). Entries only ever grow at the end or get truncated as a suffix.

use glam::DVec2;

/// Camera input for one simulated frame. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraEntry {
    /// Rider center at this frame
    pub rider_center: DVec2,
    /// `rider_center(frame - 1) - rider_center(frame)`
    pub motion_delta: DVec2,
    /// Unused second accumulator slot, always zero
    pub reserved: DVec2,
}

impl CameraEntry {
    /// Entry for frame 0
    pub fn start(rider_center: DVec2) -> Self {
        Self {
            rider_center,
            ..Default::default()
        }
    }

    /// Entry following `previous`
    pub fn following(previous: &CameraEntry, rider_center: DVec2) -> Self {
        Self {
            rider_center,
            motion_delta: previous.rider_center - rider_center,
            reserved: DVec2::ZERO,
        }
    }
}

/// Offset computed for the most recent frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncrementalOffset {
    pub frame: usize,
    pub offset: DVec2,
    /// Zoom the offset was computed at
    pub zoom: f64,
}

/// Region geometry the memoized offsets were computed with
#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    zoom: f64,
    render_width: f64,
}

/// Storage owned by one camera controller
#[derive(Debug, Clone)]
pub struct FrameCache {
    entries: Vec<CameraEntry>,
    /// `checkpoints[k]` is the offset at frame `k * interval`
    checkpoints: Vec<DVec2>,
    interval: usize,
    incremental: Option<IncrementalOffset>,
    geometry: Option<Geometry>,
}

impl FrameCache {
    /// Create an empty cache with a checkpoint every `interval` frames
    pub fn new(interval: usize) -> Self {
        assert!(interval > 0, "checkpoint interval must be at least 1");
        Self {
            entries: Vec::new(),
            checkpoints: vec![DVec2::ZERO],
            interval,
            incremental: None,
            geometry: None,
        }
    }

    /// Number of frames with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no frame has an entry yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the checkpoint spacing in frames
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Get the entry of a cached frame
    pub fn entry(&self, frame: usize) -> &CameraEntry {
        &self.entries[frame]
    }

    /// Get every cached entry in frame order
    pub fn entries(&self) -> &[CameraEntry] {
        &self.entries
    }

    /// Get the memoized checkpoint offsets
    pub fn checkpoints(&self) -> &[DVec2] {
        &self.checkpoints
    }

    /// Get the offset of the most recently computed frame
    pub fn incremental(&self) -> Option<IncrementalOffset> {
        self.incremental
    }

    /// Set or replace the frame 0 entry
    pub fn reseed(&mut self, rider_center: DVec2) {
        let start = CameraEntry::start(rider_center);
        match self.entries.first_mut() {
            Some(first) => *first = start,
            None => self.entries.push(start),
        }
    }

    /// Append the next frame's rider center
    pub fn push_center(&mut self, rider_center: DVec2) {
        let entry = match self.entries.last() {
            Some(previous) => CameraEntry::following(previous, rider_center),
            None => CameraEntry::start(rider_center),
        };
        self.entries.push(entry);
    }

    /// Keep frames `0..frame`. Checkpoints and the incremental slot that
    /// depend on a dropped frame go with them.
    pub fn truncate(&mut self, frame: usize) {
        self.entries.truncate(frame.max(1));
        let keep = frame.saturating_sub(1) / self.interval + 1;
        self.checkpoints.truncate(keep);
        if self.incremental.is_some_and(|last| last.frame >= frame) {
            self.incremental = None;
        }
    }

    /// Forget every memoized offset except checkpoint 0
    pub fn reset_offsets(&mut self) {
        self.checkpoints.truncate(1);
        self.incremental = None;
    }

    /// Change the checkpoint spacing. Memoized offsets are dropped.
    pub fn set_interval(&mut self, interval: usize) {
        assert!(interval > 0, "checkpoint interval must be at least 1");
        self.interval = interval;
        self.reset_offsets();
    }

    /// Record the geometry offsets are about to be computed with. Returns
    /// true if it differs from the last one and memoized offsets were dropped.
    ///
    /// Only checkpoint 0 survives a change, so the first query after a zoom
    /// or resize replays every frame up to it. Animating the zoom late in a
    /// long track pays that cost once per zoom step.
    pub fn sync_geometry(&mut self, zoom: f64, render_width: f64) -> bool {
        let geometry = Geometry { zoom, render_width };
        if self.geometry == Some(geometry) {
            return false;
        }
        let changed = self.geometry.is_some();
        self.geometry = Some(geometry);
        self.reset_offsets();
        changed
    }

    /// Latest checkpoint at or before `frame`, as `(frame, offset)`
    pub fn checkpoint_before(&self, frame: usize) -> (usize, DVec2) {
        let index = (frame / self.interval).min(self.checkpoints.len() - 1);
        (index * self.interval, self.checkpoints[index])
    }

    /// Store `offset` if `frame` is the next checkpoint boundary
    pub fn record_checkpoint(&mut self, frame: usize, offset: DVec2) {
        if frame % self.interval == 0 && frame / self.interval == self.checkpoints.len() {
            self.checkpoints.push(offset);
        }
    }

    /// Whether `frame` falls on a checkpoint boundary
    pub fn is_checkpoint(&self, frame: usize) -> bool {
        frame % self.interval == 0
    }

    /// Remember the offset of the frame just computed
    pub fn set_incremental(&mut self, frame: usize, offset: DVec2, zoom: f64) {
        self.incremental = Some(IncrementalOffset {
            frame,
            offset,
            zoom,
        });
    }
}
