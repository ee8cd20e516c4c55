//! Defines a tokio based frame driver for the [`AnimationHandler`].

use std::cell::Cell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use std::time::Duration;

use log::trace;
use tokio::time::{sleep, Instant};

use crate::animations::{AnimationHandler, FrameSource};

/// The default frame rate of a [`FrameLoop`] (frames per second).
const DEFAULT_FPS: u32 = 40;

struct LoopSource {
    origin: Instant,
    requested: Cell<bool>,
}

impl FrameSource for LoopSource {
    fn request_frame(&self) {
        self.requested.set(true);
    }

    fn now(&self) -> i64 {
        self.origin.elapsed().as_millis() as i64
    }
}

/// Drives an [`AnimationHandler`] with the tokio clock.
///
/// The loop runs frames as long as animations request them, and returns once every animation is
/// over. Since animators are single-threaded, the loop must be awaited on the thread that owns
/// them (a current-thread runtime, or a `LocalSet`).
///
/// # Example
/// ```
/// use frameflow::animations::{Animator, FrameLoop, ValueAnimator};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let frames = FrameLoop::new();
///
///     let animator = ValueAnimator::of_float(&[0.0, 1.0]);
///     animator.set_duration(100).unwrap();
///     animator.set_scheduler(frames.get_handler());
///     animator.start().unwrap();
///
///     frames.run().await;
///     assert!(!animator.is_started());
/// }
/// ```
pub struct FrameLoop {
    source: Rc<LoopSource>,
    handler: AnimationHandler,
    fps: u32,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        let source = Rc::new(LoopSource {
            origin: Instant::now(),
            requested: Cell::new(false),
        });
        let handler = AnimationHandler::new(source.clone());
        Self {
            source,
            handler,
            fps: DEFAULT_FPS,
        }
    }

    /// Returns the scheduler to attach animators to.
    pub fn get_handler(&self) -> &AnimationHandler {
        &self.handler
    }

    pub fn get_fps(&self) -> u32 {
        self.fps
    }

    /// Sets the frame rate (at least 1 frame per second).
    pub fn set_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    /// Runs frames until no more frame is requested.
    pub async fn run(&self) {
        let interval = Duration::from_millis(1000 / self.fps as u64);
        while self.source.requested.replace(false) {
            sleep(interval).await;
            trace!("Frame loop tick at {}ms", self.source.now());
            self.handler.run();
        }
    }
}

impl Debug for FrameLoop {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("fps", &self.fps)
            .field("handler", &self.handler)
            .finish()
    }
}
