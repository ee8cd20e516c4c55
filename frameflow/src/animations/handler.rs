use std::cell::{Cell, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::trace;

use crate::animations::{Animator, ValueAnimator};

/// The host side of the scheduling contract: a source of frames.
///
/// The [`AnimationHandler`] asks for at most one frame at a time through
/// [`FrameSource::request_frame()`]; the host is then expected to call
/// [`AnimationHandler::run()`] once, on the animation thread, when the next frame is due.
pub trait FrameSource {
    /// Requests a call to [`AnimationHandler::run()`] for the next frame.
    fn request_frame(&self);
    /// Returns the current animation time (in ms).
    fn now(&self) -> i64;
}

/// A [`FrameSource`] whose clock is driven by hand.
///
/// Useful to hosts having their own render loop, and to tests: move the clock with
/// [`ManualFrameSource::set_time()`], then call [`AnimationHandler::run()`].
#[derive(Debug, Default)]
pub struct ManualFrameSource {
    time: Cell<i64>,
    requests: Cell<usize>,
}

impl ManualFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current time (in ms).
    pub fn set_time(&self, time: i64) {
        self.time.set(time);
    }

    /// Moves the clock forward (in ms).
    pub fn advance(&self, delta: i64) {
        self.time.set(self.time.get() + delta);
    }

    /// Returns the number of frames requested so far.
    pub fn get_requests(&self) -> usize {
        self.requests.get()
    }
}

impl FrameSource for ManualFrameSource {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }

    fn now(&self) -> i64 {
        self.time.get()
    }
}

#[derive(Default)]
struct Queues {
    /// Animations currently playing.
    animations: Vec<ValueAnimator>,
    /// Animations started since the last frame.
    pending: Vec<ValueAnimator>,
    /// Animations waiting out their start delay.
    delayed: Vec<ValueAnimator>,
}

struct HandlerShared {
    source: Rc<dyn FrameSource>,
    queues: RefCell<Queues>,
    duration_scale: Cell<f32>,
    scheduled: Cell<bool>,
}

/// The frame scheduler driving every [`ValueAnimator`] started with it.
///
/// One handler is meant per animation thread: it is attached explicitly to animators (see
/// [`Animator::set_scheduler()`](crate::animations::Animator::set_scheduler)) and ticks all of them
/// on each frame of its [`FrameSource`].
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use frameflow::animations::{AnimationHandler, Animator, Easing, ManualFrameSource, ValueAnimator};
/// use frameflow::utils::Value;
///
/// let source = Rc::new(ManualFrameSource::new());
/// let handler = AnimationHandler::new(source.clone());
///
/// let animator = ValueAnimator::of_int(&[0, 100]);
/// animator.set_easing(Easing::Linear);
/// animator.set_duration(100).unwrap();
/// animator.set_scheduler(&handler);
/// animator.start().unwrap();
///
/// handler.run();
/// source.set_time(50);
/// handler.run();
/// assert_eq!(animator.get_animated_value(), Value::Integer(50));
/// ```
#[derive(Clone)]
pub struct AnimationHandler {
    shared: Rc<HandlerShared>,
}

impl AnimationHandler {
    /// Creates a new handler using the given frame source.
    pub fn new(source: Rc<dyn FrameSource>) -> Self {
        Self {
            shared: Rc::new(HandlerShared {
                source,
                queues: RefCell::new(Queues::default()),
                duration_scale: Cell::new(1.0),
                scheduled: Cell::new(false),
            }),
        }
    }

    /// Returns the current animation time (in ms).
    pub fn now(&self) -> i64 {
        self.shared.source.now()
    }

    pub fn get_duration_scale(&self) -> f32 {
        self.shared.duration_scale.get()
    }

    /// Sets the factor applied to the durations and start delays of every animator using this
    /// handler (a scale of 0 makes every animation end on its first frame).
    pub fn set_duration_scale(&self, duration_scale: f32) {
        self.shared.duration_scale.set(duration_scale.max(0.0));
    }

    /// Returns the number of animations currently playing.
    pub fn get_current_animations_count(&self) -> usize {
        self.shared.queues.borrow().animations.len()
    }

    /// Indicates whether the handler has any live work (playing, pending or delayed animations).
    pub fn has_animations(&self) -> bool {
        let queues = self.shared.queues.borrow();
        !queues.animations.is_empty() || !queues.pending.is_empty() || !queues.delayed.is_empty()
    }

    /// Drops every animation from the handler without notifying them.
    pub fn clear_all_animations(&self) {
        let mut queues = self.shared.queues.borrow_mut();
        queues.animations.clear();
        queues.pending.clear();
        queues.delayed.clear();
    }

    /// Requests a frame, unless one is already requested.
    pub fn schedule(&self) {
        if !self.shared.scheduled.replace(true) {
            self.shared.source.request_frame();
        }
    }

    /// Runs one frame at the current time of the frame source.
    ///
    /// This is the callback the host calls when a requested frame is due.
    pub fn run(&self) {
        self.shared.scheduled.set(false);
        self.do_animation_frame(self.now());
    }

    /// Runs one frame at the given time.
    ///
    /// Phases are processed in a fixed order: pending animations are promoted (including the ones
    /// started while doing so), then delayed animations whose delay elapsed are started, then
    /// playing animations are advanced, and finally the animations that completed are ended.
    pub fn do_animation_frame(&self, frame_time: i64) {
        trace!("Animation frame at {}ms", frame_time);

        loop {
            let pending = std::mem::take(&mut self.shared.queues.borrow_mut().pending);
            if pending.is_empty() {
                break;
            }
            for animator in pending {
                match animator.get_scaled_start_delay() {
                    0 => animator.start_animation(Some(self)),
                    _ => self.shared.queues.borrow_mut().delayed.push(animator),
                }
            }
        }

        let delayed = self.shared.queues.borrow().delayed.clone();
        let ready: Vec<ValueAnimator> = delayed
            .into_iter()
            .filter(|animator| animator.delayed_animation_frame(frame_time))
            .collect();
        for animator in ready {
            self.shared
                .queues
                .borrow_mut()
                .delayed
                .retain(|delayed| delayed.get_id() != animator.get_id());
            animator.start_delayed_animation(self);
        }

        let animations = self.shared.queues.borrow().animations.clone();
        let mut ending = vec![];
        for animator in animations {
            // Animations ended by a previous one within this frame are skipped.
            if self.contains_animation(&animator) && animator.do_animation_frame(frame_time) {
                ending.push(animator);
            }
        }
        for animator in ending {
            animator.end_animation();
        }

        let queues = self.shared.queues.borrow();
        let live = !queues.animations.is_empty() || !queues.delayed.is_empty();
        drop(queues);
        if live {
            self.schedule();
        }
    }

    // ########################################
    // Queue management.

    pub(crate) fn add_pending(&self, animator: &ValueAnimator) {
        self.shared.queues.borrow_mut().pending.push(animator.clone());
    }

    pub(crate) fn add_animation(&self, animator: &ValueAnimator) {
        let mut queues = self.shared.queues.borrow_mut();
        if !queues.animations.iter().any(|a| a.get_id() == animator.get_id()) {
            queues.animations.push(animator.clone());
        }
    }

    /// Removes the animator from every queue.
    pub(crate) fn remove(&self, animator: &ValueAnimator) {
        let id = animator.get_id();
        let mut queues = self.shared.queues.borrow_mut();
        queues.animations.retain(|a| a.get_id() != id);
        queues.pending.retain(|a| a.get_id() != id);
        queues.delayed.retain(|a| a.get_id() != id);
    }

    pub(crate) fn contains_animation(&self, animator: &ValueAnimator) -> bool {
        let id = animator.get_id();
        self.shared.queues.borrow().animations.iter().any(|a| a.get_id() == id)
    }

    pub(crate) fn contains_pending(&self, animator: &ValueAnimator) -> bool {
        let id = animator.get_id();
        self.shared.queues.borrow().pending.iter().any(|a| a.get_id() == id)
    }

    pub(crate) fn contains_delayed(&self, animator: &ValueAnimator) -> bool {
        let id = animator.get_id();
        self.shared.queues.borrow().delayed.iter().any(|a| a.get_id() == id)
    }

    /// Indicates whether both handles refer to the same handler.
    pub fn ptr_eq(&self, other: &AnimationHandler) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Debug for AnimationHandler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let queues = self.shared.queues.borrow();
        write!(
            f,
            "AnimationHandler [animations={}, pending={}, delayed={}, scale={}]",
            queues.animations.len(),
            queues.pending.len(),
            queues.delayed.len(),
            self.shared.duration_scale.get()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::animations::{AnimatorEvent, Easing};
    use crate::utils::Value;

    use super::*;

    fn setup() -> (Rc<ManualFrameSource>, AnimationHandler) {
        let source = Rc::new(ManualFrameSource::new());
        let handler = AnimationHandler::new(source.clone());
        (source, handler)
    }

    fn linear(handler: &AnimationHandler, values: &[f32], duration: i64) -> ValueAnimator {
        let animator = ValueAnimator::of_float(values);
        animator.set_easing(Easing::Linear);
        animator.set_duration(duration).unwrap();
        animator.set_scheduler(handler);
        animator
    }

    #[test]
    fn test_manual_frame_source() {
        let source = ManualFrameSource::new();
        assert_eq!(source.now(), 0);
        source.set_time(100);
        source.advance(20);
        assert_eq!(source.now(), 120);
        source.request_frame();
        assert_eq!(source.get_requests(), 1);
    }

    #[test]
    fn test_single_frame_request() {
        let (source, handler) = setup();
        handler.schedule();
        handler.schedule();
        assert_eq!(source.get_requests(), 1, "At most one frame is pending.");
        handler.run();
        handler.schedule();
        assert_eq!(source.get_requests(), 2);
    }

    #[test]
    fn test_queues() {
        let (source, handler) = setup();
        let animator = linear(&handler, &[0.0, 1.0], 100);
        animator.start().unwrap();
        assert!(handler.has_animations());
        assert_eq!(handler.get_current_animations_count(), 0, "Still pending.");
        assert_eq!(source.get_requests(), 1);

        handler.run();
        assert_eq!(handler.get_current_animations_count(), 1);
        assert_eq!(source.get_requests(), 2, "Live work requests the next frame.");

        source.set_time(100);
        handler.run();
        assert_eq!(handler.get_current_animations_count(), 0);
        assert!(!handler.has_animations());
        assert_eq!(source.get_requests(), 2, "No more frame requested when idle.");
    }

    #[test]
    fn test_clear_all_animations() {
        let (_, handler) = setup();
        let animator = linear(&handler, &[0.0, 1.0], 100);
        animator.start().unwrap();
        handler.run();
        handler.clear_all_animations();
        assert!(!handler.has_animations());
        assert!(format!("{:?}", handler).contains("animations=0"));
    }

    #[test]
    fn test_duration_scale() {
        let (source, handler) = setup();
        handler.set_duration_scale(2.0);
        assert_eq!(handler.get_duration_scale(), 2.0);

        let animator = linear(&handler, &[0.0, 100.0], 100);
        animator.start().unwrap();
        handler.run();
        source.set_time(100);
        handler.run();
        assert_eq!(animator.get_animated_value(), Value::Float(50.0));

        handler.set_duration_scale(-1.0);
        assert_eq!(handler.get_duration_scale(), 0.0);
    }

    #[test]
    fn test_start_from_listener_within_frame() {
        let (source, handler) = setup();
        let first = linear(&handler, &[0.0, 1.0], 100);
        let second = linear(&handler, &[0.0, 1.0], 100);

        let chained = second.clone();
        first.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| {
            chained.start().unwrap();
        });
        first.start().unwrap();
        handler.run();
        source.set_time(100);
        handler.run();
        assert!(!first.is_running());
        assert!(second.is_running(), "Started synchronously by the end listener.");

        // Second is picked up on the next frame, which becomes its start time.
        source.set_time(150);
        handler.run();
        assert_eq!(second.get_animated_value(), Value::Float(0.0));
        source.set_time(200);
        handler.run();
        assert_eq!(second.get_animated_value(), Value::Float(0.5));
    }

    #[test]
    fn test_cancel_sibling_within_frame() {
        let (source, handler) = setup();
        let first = linear(&handler, &[0.0, 1.0], 100);
        let second = linear(&handler, &[0.0, 1.0], 200);
        let updates = Rc::new(RefCell::new(0));

        let sibling = second.clone();
        first.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| sibling.cancel());
        let counter = updates.clone();
        second.on_update(move |_: ValueAnimator| *counter.borrow_mut() += 1);

        first.start().unwrap();
        second.start().unwrap();
        handler.run();
        let before = *updates.borrow();

        source.set_time(100);
        handler.run();
        source.set_time(150);
        handler.run();
        assert!(!second.is_started());
        assert_eq!(*updates.borrow(), before + 1, "Canceled animations are not ticked anymore.");
        assert!(!handler.has_animations());
    }
}
