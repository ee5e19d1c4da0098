//! Animation-frame requests used to coalesce pointer moves
//!
//! A drag never processes more than one pointer position per paint frame.
//! Pointer-moves only record the latest position and request a frame; the
//! host processes pending drags when the frame fires.

use std::collections::BTreeSet;

/// Handle to an outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(u64);

/// Tracks outstanding frame requests for the UI thread
#[derive(Debug, Default)]
pub struct FrameClock {
    next_id: u64,
    outstanding: BTreeSet<u64>,
    frames_fired: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> FrameRequest {
        let id = self.next_id;
        self.next_id += 1;
        self.outstanding.insert(id);
        FrameRequest(id)
    }

    /// Drop a request; unknown or already-fired requests are ignored
    pub fn cancel(&mut self, request: FrameRequest) {
        self.outstanding.remove(&request.0);
    }

    pub fn is_requested(&self) -> bool {
        !self.outstanding.is_empty()
    }

    /// Start a paint frame: every outstanding request fires now
    pub fn begin_frame(&mut self) -> usize {
        let fired = self.outstanding.len();
        self.outstanding.clear();
        self.frames_fired += 1;
        fired
    }

    pub fn frames_fired(&self) -> u64 {
        self.frames_fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_and_begin_frame() {
        let mut clock = FrameClock::new();
        let a = clock.request();
        let b = clock.request();
        assert_ne!(a, b);
        clock.cancel(a);
        assert!(clock.is_requested());
        assert_eq!(clock.begin_frame(), 1);
        assert!(!clock.is_requested());
        clock.cancel(b);
        assert_eq!(clock.frames_fired(), 1);
    }
}
