//! Frame-indexed camera controller
//!
//! Answers "where is the camera at frame N" for any N. Offsets are a pure
//! function of the rider's per-frame motion and the active strategy, so a
//! sequential query costs one step and a random one at most one checkpoint
//! interval of replay.

use glam::DVec2;
use rideline_core::{FrameSource, Rect, RiderState};
use tracing::{debug, trace};

use crate::bounds::BoundingRegion;
use crate::cache::FrameCache;
use crate::config::CameraConfig;
use crate::strategy;

/// Render size assumed until the host reports one
pub const DEFAULT_RENDER_SIZE: DVec2 = DVec2::new(1280.0, 720.0);

/// Camera positions of the displayed frame and the one before it
#[derive(Debug, Clone, Copy)]
struct FrameCenters {
    previous: DVec2,
    current: DVec2,
}

/// Camera that follows the rider of a `FrameSource`
pub struct CameraController<S: FrameSource> {
    source: S,
    config: CameraConfig,
    cache: FrameCache,
    render_size: DVec2,

    frame: usize,
    zoom: f64,
    blend: f64,

    /// Valid for the current frame and zoom
    centers: Option<FrameCenters>,
    /// Valid for the current frame, zoom, and blend
    blended: Option<DVec2>,
    /// Pins the camera, bypassing everything computed
    center_override: Option<DVec2>,
}

impl<S: FrameSource> CameraController<S> {
    /// Create a camera bound to a frame source
    pub fn new(source: S, config: CameraConfig) -> Self {
        let cache = FrameCache::new(config.checkpoint_interval);
        let mut controller = Self {
            source,
            config,
            cache,
            render_size: DEFAULT_RENDER_SIZE,
            frame: 0,
            zoom: 1.0,
            blend: 1.0,
            centers: None,
            blended: None,
            center_override: None,
        };
        controller.reseed();
        controller
    }

    /// Get the active configuration
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Get the displayed frame
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Get the zoom of the current render tick
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Get the sub-frame blend of the current render tick
    pub fn blend(&self) -> f64 {
        self.blend
    }

    /// Get the render size regions are sized from
    pub fn render_size(&self) -> DVec2 {
        self.render_size
    }

    /// Read-only view of the per-frame cache
    pub fn cache(&self) -> &FrameCache {
        &self.cache
    }

    /// Get the bound frame source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Bind another frame source. Everything after frame 0 is recomputed.
    pub fn set_timeline(&mut self, source: S) {
        self.source = source;
        self.invalidate_frame(1);
    }

    /// Switch strategy or sizing. Every memoized offset is dropped.
    pub fn set_config(&mut self, config: CameraConfig) {
        if config.checkpoint_interval != self.cache.interval() {
            self.cache.set_interval(config.checkpoint_interval);
        }
        self.config = config;
        self.cache.reset_offsets();
        self.clear_centers();
        debug!("Camera strategy set to {}", self.config.strategy.name());
    }

    /// Forget frame `frame` and everything after it.
    ///
    /// Frame 0 is never removed; invalidating frame 1 re-reads it instead.
    pub fn invalidate_frame(&mut self, frame: usize) {
        assert!(frame >= 1, "frame 0 cannot be invalidated, invalidate frame 1 instead");
        self.cache.truncate(frame);
        if frame == 1 {
            self.reseed();
        }
        self.clear_centers();
        debug!(
            "Camera invalidated from frame {} ({} checkpoints kept)",
            frame,
            self.cache.checkpoints().len()
        );
    }

    /// Select the displayed frame
    pub fn set_frame(&mut self, frame: usize) {
        if frame != self.frame {
            self.frame = frame;
            self.clear_centers();
        }
    }

    /// Per render tick: sub-frame blend in [0, 1] and zoom
    pub fn begin_frame(&mut self, blend: f64, zoom: f64) {
        assert!(zoom > 0.0, "camera zoom must be positive, got {zoom}");
        let blend = blend.clamp(0.0, 1.0);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.clear_centers();
        }
        if blend != self.blend {
            self.blend = blend;
            self.blended = None;
        }
    }

    /// Pin the camera to a point, or `None` to follow the rider again
    pub fn set_frame_center(&mut self, center: Option<DVec2>) {
        self.center_override = center;
        self.blended = None;
    }

    /// The host's render size changed
    pub fn on_resize(&mut self, render_size: DVec2) {
        if render_size != self.render_size {
            self.render_size = render_size;
            self.cache.reset_offsets();
            self.clear_centers();
            debug!("Camera render size now {}x{}", render_size.x, render_size.y);
        }
    }

    /// Camera position at `frame` at the current zoom
    pub fn frame_camera(&mut self, frame: usize) -> DVec2 {
        if self.config.strategy.looks_ahead() {
            return self.predictive_camera(frame);
        }
        let offset = self.calculate_offset(frame);
        let region = self.region_at(DVec2::ZERO, frame);
        self.cache.entry(frame).rider_center + region.clamp(offset)
    }

    /// Camera position for the current render tick, blended between the
    /// previous frame and the current one
    pub fn center(&mut self, force: bool) -> DVec2 {
        if let Some(center) = self.center_override {
            return center;
        }
        if force {
            self.clear_centers();
        }
        if let Some(center) = self.blended {
            return center;
        }

        let centers = match self.centers {
            Some(centers) => centers,
            None => {
                let previous = self.frame_camera(self.frame.saturating_sub(1));
                let current = self.frame_camera(self.frame);
                let centers = FrameCenters { previous, current };
                self.centers = Some(centers);
                centers
            }
        };

        let center = centers.previous.lerp(centers.current, self.blend);
        self.blended = Some(center);
        center
    }

    /// Visible world rectangle for a screen of `width` x `height` pixels
    pub fn viewport(&mut self, zoom: f64, width: f64, height: f64) -> Rect {
        assert!(zoom > 0.0, "camera zoom must be positive, got {zoom}");
        let center = self.center(false);
        Rect::from_center_size(center, DVec2::new(width, height) / zoom)
    }

    /// Dead zone around the current camera center, for debug overlays
    pub fn clamp_bounds(&mut self, zoom: f64, width: f64, _height: f64) -> Rect {
        let center = self.center(false);
        self.ensure_frame(self.frame);
        let speed = self.speed_hint(self.frame, zoom);
        BoundingRegion::create(center, zoom, width, speed, &self.config).bounds()
    }

    /// Accumulated offset at `frame`, memoized
    fn calculate_offset(&mut self, frame: usize) -> DVec2 {
        self.ensure_frame(frame);
        if self.cache.sync_geometry(self.zoom, self.render_size.x) {
            debug!("Camera geometry changed (zoom {}), dropping memoized offsets", self.zoom);
        }

        if let Some(last) = self.cache.incremental() {
            if last.zoom == self.zoom {
                if last.frame == frame {
                    return last.offset;
                }
                if last.frame + 1 == frame && !self.cache.is_checkpoint(frame) {
                    trace!("Camera fast path at frame {}", frame);
                    let offset = self.step(last.offset, frame);
                    self.cache.set_incremental(frame, offset, self.zoom);
                    return offset;
                }
            }
        }

        let (mut at, mut offset) = self.cache.checkpoint_before(frame);
        if let Some(last) = self.cache.incremental() {
            if last.zoom == self.zoom && last.frame > at && last.frame <= frame {
                at = last.frame;
                offset = last.offset;
            }
        }

        debug!("Camera replaying frames {}..={}", at + 1, frame);
        while at < frame {
            at += 1;
            offset = self.step(offset, at);
            self.cache.record_checkpoint(at, offset);
        }
        self.cache.set_incremental(frame, offset, self.zoom);
        offset
    }

    /// Look-ahead lookup: averages where the rider sits inside the camera
    /// regions of the upcoming frames
    fn predictive_camera(&mut self, frame: usize) -> DVec2 {
        let lookahead = self.config.lookahead;
        self.ensure_frame(frame + lookahead);

        let offset = self.calculate_offset(frame);
        let center = self.cache.entry(frame).rider_center;
        let region = self.region_at(DVec2::ZERO, frame);
        let raw = center + region.clamp(offset);
        if lookahead == 0 {
            return raw;
        }

        let mut running = offset;
        let mut sum = DVec2::ZERO;
        for ahead in frame + 1..=frame + lookahead {
            let entry = *self.cache.entry(ahead);
            running = strategy::clamped_step(&self.region_at(DVec2::ZERO, ahead), running, entry.motion_delta);
            let camera = entry.rider_center + running;
            sum += self.region_at(camera, ahead).clamp(center);
        }
        let average = sum / lookahead as f64;

        // Ease in over the first frames so the start doesn't pan early
        let weight = frame.min(lookahead) as f64 / lookahead as f64;
        let predicted = raw.lerp(average, weight);
        center + region.clamp(predicted - center)
    }

    fn step(&self, previous: DVec2, frame: usize) -> DVec2 {
        let region = self.region_at(DVec2::ZERO, frame);
        self.config
            .strategy
            .step(&region, previous, self.cache.entry(frame).motion_delta)
    }

    fn region_at(&self, center: DVec2, frame: usize) -> BoundingRegion {
        let speed = self.speed_hint(frame, self.zoom);
        BoundingRegion::create(center, self.zoom, self.render_size.x, speed, &self.config)
    }

    /// Rider speed at `frame` in screen pixels per frame
    fn speed_hint(&self, frame: usize, zoom: f64) -> f64 {
        self.cache.entry(frame).motion_delta.length() * zoom
    }

    /// Pull rider centers from the source until `frame` is cached
    fn ensure_frame(&mut self, frame: usize) {
        let len = self.cache.len();
        if frame < len {
            return;
        }
        for state in self.source.frames(len, frame + 1 - len) {
            self.cache.push_center(state.calculate_center());
        }
    }

    fn reseed(&mut self) {
        let start = self.source.frame(0).calculate_center();
        self.cache.reseed(start);
    }

    fn clear_centers(&mut self) {
        self.centers = None;
        self.blended = None;
    }
}
