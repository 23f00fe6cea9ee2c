//! Per-frame rider timeline
//!
//! The camera never sees the integrator's body representation. It asks a
//! `FrameSource` for the rider state at a frame index and reduces that state
//! to a single tracked point through `RiderState::calculate_center`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;

/// A simulated rider at one frame
pub trait RiderState {
    /// The reference point the camera tracks (center of mass)
    fn calculate_center(&self) -> DVec2;
}

/// Deterministic provider of rider states, one per simulated frame.
///
/// `frame(i)` must return the same state for the same index until the track
/// changes. Sources take `&mut self` so they can memoize lazily.
pub trait FrameSource {
    type State: RiderState;

    /// Rider state at `index`
    fn frame(&mut self, index: usize) -> Self::State;

    /// `count` consecutive rider states starting at `start`
    fn frames(&mut self, start: usize, count: usize) -> Vec<Self::State> {
        (start..start + count).map(|index| self.frame(index)).collect()
    }
}

impl<T: FrameSource> FrameSource for Rc<RefCell<T>> {
    type State = T::State;

    fn frame(&mut self, index: usize) -> Self::State {
        self.borrow_mut().frame(index)
    }

    fn frames(&mut self, start: usize, count: usize) -> Vec<Self::State> {
        self.borrow_mut().frames(start, count)
    }
}

impl RiderState for DVec2 {
    fn calculate_center(&self) -> DVec2 {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Linear {
        calls: usize,
    }

    impl FrameSource for Linear {
        type State = DVec2;

        fn frame(&mut self, index: usize) -> DVec2 {
            self.calls += 1;
            DVec2::new(index as f64 * 2.0, 0.0)
        }
    }

    #[test]
    fn test_default_frames_batch() {
        let mut source = Linear { calls: 0 };
        let states = source.frames(3, 4);
        assert_eq!(states.len(), 4);
        assert_eq!(states[0].calculate_center(), DVec2::new(6.0, 0.0));
        assert_eq!(states[3].calculate_center(), DVec2::new(12.0, 0.0));
        assert_eq!(source.calls, 4);
    }

    #[test]
    fn test_shared_source() {
        let shared = Rc::new(RefCell::new(Linear { calls: 0 }));
        let mut handle = Rc::clone(&shared);
        assert_eq!(handle.frame(5), DVec2::new(10.0, 0.0));
        assert_eq!(shared.borrow().calls, 1);
    }
}
