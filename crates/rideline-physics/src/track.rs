//! Track of line segments

use std::collections::BTreeMap;

use glam::DVec2;
use rideline_core::Rect;
use serde::{Deserialize, Serialize};

/// Identifier of a line on a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a line interacts with the rider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineKind {
    /// Solid line
    #[default]
    Standard,
    /// Solid line that pushes the rider along its direction
    Acceleration,
    /// Decoration only, never collides
    Scenery,
}

/// A straight segment of track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
    pub kind: LineKind,
    /// Swap the solid side
    pub flipped: bool,
}

impl Line {
    /// Create a standard line
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self {
            start,
            end,
            kind: LineKind::Standard,
            flipped: false,
        }
    }

    /// Create a line of the given kind
    pub fn with_kind(start: DVec2, end: DVec2, kind: LineKind) -> Self {
        Self {
            kind,
            ..Self::new(start, end)
        }
    }

    /// Get the segment length
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }

    /// Unit vector from start to end
    pub fn direction(&self) -> DVec2 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Unit normal pointing out of the solid side.
    ///
    /// With y pointing down, a left-to-right line is solid from above.
    pub fn normal(&self) -> DVec2 {
        let d = self.direction();
        let normal = DVec2::new(d.y, -d.x);
        if self.flipped {
            -normal
        } else {
            normal
        }
    }

    /// Axis-aligned bounds of the segment
    pub fn bounds(&self) -> Rect {
        let min = self.start.min(self.end);
        let max = self.start.max(self.end);
        Rect::new(min, max - min)
    }

    /// Whether the rider can collide with this line
    pub fn is_solid(&self) -> bool {
        self.kind != LineKind::Scenery
    }
}

/// Errors that can occur while editing a track
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrackError {
    #[error("Unknown line: {0}")]
    UnknownLine(LineId),

    #[error("Line from {start} to {end} has zero length")]
    DegenerateLine { start: DVec2, end: DVec2 },
}

/// All lines of a track, iterated in id order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    lines: BTreeMap<LineId, Line>,
    next_id: u32,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line and return its id
    pub fn add_line(&mut self, line: Line) -> Result<LineId, TrackError> {
        validate(&line)?;
        let id = LineId(self.next_id);
        self.next_id += 1;
        self.lines.insert(id, line);
        Ok(id)
    }

    /// Remove a line, returning it
    pub fn remove_line(&mut self, id: LineId) -> Result<Line, TrackError> {
        self.lines.remove(&id).ok_or(TrackError::UnknownLine(id))
    }

    /// Replace a line's geometry, returning the previous line
    pub fn move_line(&mut self, id: LineId, line: Line) -> Result<Line, TrackError> {
        validate(&line)?;
        let slot = self.lines.get_mut(&id).ok_or(TrackError::UnknownLine(id))?;
        Ok(std::mem::replace(slot, line))
    }

    /// Get a line by id
    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.lines.get(&id)
    }

    /// Iterate lines in id order
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &Line)> {
        self.lines.iter().map(|(id, line)| (*id, line))
    }

    /// Number of lines on the track
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the track has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Bounds enclosing every line, if any
    pub fn bounds(&self) -> Option<Rect> {
        let mut lines = self.lines.values();
        let first = lines.next()?.bounds();
        let (min, max) = lines.fold((first.min(), first.max()), |(min, max), line| {
            let b = line.bounds();
            (min.min(b.min()), max.max(b.max()))
        });
        Some(Rect::new(min, max - min))
    }
}

fn validate(line: &Line) -> Result<(), TrackError> {
    if line.length() <= f64::EPSILON {
        return Err(TrackError::DegenerateLine {
            start: line.start,
            end: line.end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_normal_faces_up() {
        let line = Line::new(DVec2::ZERO, DVec2::new(100.0, 0.0));
        assert_eq!(line.normal(), DVec2::new(0.0, -1.0));

        let flipped = Line {
            flipped: true,
            ..line
        };
        assert_eq!(flipped.normal(), DVec2::new(0.0, 1.0));
    }

    #[test]
    fn test_track_edit() {
        let mut track = Track::new();
        let a = track
            .add_line(Line::new(DVec2::ZERO, DVec2::new(10.0, 0.0)))
            .unwrap();
        let b = track
            .add_line(Line::new(DVec2::new(10.0, 0.0), DVec2::new(20.0, 5.0)))
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(track.len(), 2);

        let bounds = track.bounds().unwrap();
        assert_eq!(bounds.min(), DVec2::ZERO);
        assert_eq!(bounds.max(), DVec2::new(20.0, 5.0));

        track.remove_line(a).unwrap();
        assert_eq!(track.remove_line(a), Err(TrackError::UnknownLine(a)));

        let old = track
            .move_line(b, Line::new(DVec2::ZERO, DVec2::new(1.0, 1.0)))
            .unwrap();
        assert_eq!(old.end, DVec2::new(20.0, 5.0));
    }

    #[test]
    fn test_degenerate_line_rejected() {
        let mut track = Track::new();
        let result = track.add_line(Line::new(DVec2::ONE, DVec2::ONE));
        assert!(matches!(result, Err(TrackError::DegenerateLine { .. })));
        assert!(track.is_empty());
        assert!(track.bounds().is_none());
    }
}
