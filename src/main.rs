//! Rideline - Headless playback of a line-rider track with a following camera
//!
//! Plays the demo track back at a fixed display rate, drives the camera the
//! way a renderer would, and optionally writes the per-tick camera trace.

mod demo;
mod settings;

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use glam::DVec2;
use rideline_camera::CameraController;
use rideline_core::{PlaybackClock, PlaybackConfig, Rect};
use rideline_physics::Simulation;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::Settings;

/// Display ticks per second
const TICK_RATE: f64 = 60.0;
/// Simulated frame at which the demo edit is made
const EDIT_FRAME: usize = 200;
/// How far ahead of the playhead the edit lands
const EDIT_LEAD: usize = 40;
/// Simulated frame at which playback rewinds once
const REWIND_FRAME: usize = 480;
/// Frames jumped back by the rewind
const REWIND_FRAMES: usize = 120;

type SharedSimulation = Rc<RefCell<Simulation>>;

/// One display tick of the camera trace
#[derive(Debug, Clone, Serialize)]
struct TraceSample {
    tick: u64,
    frame: usize,
    blend: f64,
    rider: DVec2,
    camera: DVec2,
    viewport: Rect,
}

/// Application state
struct RidelineApp {
    simulation: SharedSimulation,
    camera: CameraController<SharedSimulation>,
    clock: PlaybackClock,
    screen: DVec2,
    zoom: f64,
    edited: bool,
    rewound: bool,
    trace: Vec<TraceSample>,
}

impl RidelineApp {
    fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let zoom = settings.playback.zoom;

        let simulation = Rc::new(RefCell::new(
            demo::simulation().context("Failed to build demo track")?,
        ));
        let mut camera = CameraController::new(Rc::clone(&simulation), settings.camera.clone());

        let (width, height) = settings.video.resolution();
        let screen = DVec2::new(width as f64, height as f64);
        camera.on_resize(screen);

        let clock = PlaybackClock::new(PlaybackConfig {
            speed: settings.playback.speed,
            ..Default::default()
        });

        Ok(Self {
            simulation,
            camera,
            clock,
            screen,
            zoom,
            edited: false,
            rewound: false,
            trace: Vec::new(),
        })
    }

    /// One display tick: advance playback, apply scripted edits, place the camera
    fn update(&mut self, delta: f64) -> Result<()> {
        let before = self.clock.frame;
        self.clock.update(delta);
        self.clock.advance();

        if !self.edited && self.clock.frame >= EDIT_FRAME {
            self.edit_track()?;
        }
        if !self.rewound && self.clock.frame >= REWIND_FRAME {
            let target = self.clock.frame - REWIND_FRAMES;
            info!("Rewinding from frame {} to {}", self.clock.frame, target);
            self.clock.seek(target);
            self.rewound = true;
        }

        let frame = self.clock.frame;
        self.camera.set_frame(frame);
        self.camera.begin_frame(self.clock.blend(), self.zoom);
        let viewport = self.camera.viewport(self.zoom, self.screen.x, self.screen.y);
        let camera = viewport.center();
        let rider = self.simulation.borrow_mut().rider_at(frame).position;

        if frame / 40 != before / 40 {
            info!(
                "Frame {}: rider ({:.1}, {:.1}) camera ({:.1}, {:.1})",
                frame, rider.x, rider.y, camera.x, camera.y
            );
        }

        self.trace.push(TraceSample {
            tick: self.clock.tick_count,
            frame,
            blend: self.clock.blend(),
            rider,
            camera,
            viewport,
        });
        Ok(())
    }

    /// Drop a boost line in the rider's path and let the camera catch up
    fn edit_track(&mut self) -> Result<()> {
        let target = self.clock.frame + EDIT_LEAD;
        let mut simulation = self.simulation.borrow_mut();
        let ahead = simulation.rider_at(target).position;
        let (id, first) = simulation
            .add_line(demo::kicker_at(ahead))
            .context("Failed to add kicker line")?;
        drop(simulation);

        self.camera.invalidate_frame(first.max(1));
        self.edited = true;
        info!(
            "Added line {} at ({:.1}, {:.1}), replaying from frame {}",
            id, ahead.x, ahead.y, first
        );
        Ok(())
    }

    fn write_trace(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.trace)
            .with_context(|| format!("Failed to write trace to {:?}", path))?;
        info!("Wrote {} trace samples to {:?}", self.trace.len(), path);
        Ok(())
    }
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting rideline...");

    let trace_path = std::env::args_os().nth(1).map(PathBuf::from);

    let settings = Settings::load();
    if !Settings::is_saved() {
        if let Err(e) = settings.save() {
            warn!("Could not write default settings: {:#}", e);
        }
    }
    debug!("{:?}", settings);

    let mut app = RidelineApp::new(&settings)?;
    info!(
        "Camera: {} strategy, {:?} sizing, zoom {}",
        settings.camera.strategy.name(),
        settings.camera.sizing,
        app.zoom
    );

    let ticks = (settings.playback.duration_secs.max(0.0) * TICK_RATE).round() as u64;
    let delta = 1.0 / TICK_RATE;
    for _ in 0..ticks {
        app.update(delta)?;
    }

    info!(
        "Finished at frame {} after {} ticks ({} frames simulated)",
        app.clock.frame,
        app.clock.tick_count,
        app.simulation.borrow().cached_frames()
    );

    if let Some(path) = trace_path {
        app.write_trace(&path)?;
    }
    Ok(())
}
