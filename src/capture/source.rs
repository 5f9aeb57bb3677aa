use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::foundation::bitmap::Bitmap;
use crate::foundation::error::{StripError, StripResult};

/// Supplies freeze-frames on demand. Camera access and permissions live behind this trait.
pub trait CaptureSource {
    /// Grab one frame.
    fn capture(&mut self) -> StripResult<Bitmap>;
}

/// A [`CaptureSource`] cycling through preloaded bitmaps.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    frames: Vec<Bitmap>,
    next: usize,
}

impl StillImageSource {
    /// Source over `frames`; at least one frame is required.
    pub fn new(frames: Vec<Bitmap>) -> StripResult<Self> {
        if frames.is_empty() {
            return Err(StripError::missing_input("still image source needs a frame"));
        }
        Ok(Self { frames, next: 0 })
    }
}

impl CaptureSource for StillImageSource {
    fn capture(&mut self) -> StripResult<Bitmap> {
        let frame = self.frames[self.next % self.frames.len()].clone();
        self.next = self.next.wrapping_add(1);
        Ok(frame)
    }
}

/// Suspends the capture sequence for countdown ticks and inter-shot intervals.
pub trait Pacer {
    /// Block for `duration`.
    fn wait(&mut self, duration: Duration);
}

/// [`Pacer`] backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Shared flag for abandoning a capture sequence. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// True once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
