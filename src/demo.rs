//! Built-in demo track for the headless host

use glam::DVec2;
use rideline_physics::{Line, LineKind, Rider, Simulation, Track, TrackError};

/// Downhill start, a boosted flat, a kicker over a gap, and a long runout
pub fn track() -> Result<Track, TrackError> {
    let mut track = Track::new();
    track.add_line(Line::new(DVec2::new(-50.0, 0.0), DVec2::new(400.0, 120.0)))?;
    track.add_line(Line::with_kind(
        DVec2::new(400.0, 120.0),
        DVec2::new(900.0, 130.0),
        LineKind::Acceleration,
    ))?;
    track.add_line(Line::new(DVec2::new(900.0, 130.0), DVec2::new(1000.0, 100.0)))?;
    track.add_line(Line::with_kind(
        DVec2::new(1000.0, 60.0),
        DVec2::new(1100.0, 60.0),
        LineKind::Scenery,
    ))?;
    track.add_line(Line::new(DVec2::new(1150.0, 150.0), DVec2::new(2500.0, 400.0)))?;
    track.add_line(Line::new(DVec2::new(2500.0, 400.0), DVec2::new(6000.0, 420.0)))?;
    Ok(track)
}

/// Rider dropped just above the start of the track
pub fn start() -> Rider {
    Rider::with_velocity(DVec2::new(0.0, -20.0), DVec2::new(2.0, 0.0))
}

pub fn simulation() -> Result<Simulation, TrackError> {
    Ok(Simulation::new(track()?, start()))
}

/// Boost line placed just under a rider position
pub fn kicker_at(rider: DVec2) -> Line {
    Line::with_kind(
        rider + DVec2::new(-30.0, 6.0),
        rider + DVec2::new(30.0, 6.0),
        LineKind::Acceleration,
    )
}
