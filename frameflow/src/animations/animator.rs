use std::any::Any;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};

use dyn_clone::DynClone;

use crate::animations::{AnimationHandler, Easing, Target};
use crate::errors::Error;
use crate::utils::{EventHandler, EventManager};

/// Unique identifier of an animator (shared by all the handles of the same animator).
pub type AnimatorId = usize;

static NEXT_ANIMATOR_ID: AtomicUsize = AtomicUsize::new(1);

/// Generates a new unique animator id.
pub(crate) fn next_animator_id() -> AnimatorId {
    NEXT_ANIMATOR_ID.fetch_add(1, Ordering::Relaxed)
}

/// Lists all events an animator can emit.
///
/// Lifecycle events give the emitting animator to their callbacks as a `Box<dyn Animator>`;
/// [`AnimatorEvent::OnUpdate`] is emitted by value animators only and gives a
/// [`ValueAnimator`](crate::animations::ValueAnimator).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimatorEvent {
    /// Triggered when the animation starts (after its start delay).
    OnStart,
    /// Triggered when the animation ends, normally or not.
    OnEnd,
    /// Triggered when the animation is canceled, always followed by [`AnimatorEvent::OnEnd`].
    OnCancel,
    /// Triggered when the animation repeats.
    OnRepeat,
    /// Triggered when the animation is paused.
    OnPause,
    /// Triggered when the animation is resumed.
    OnResume,
    /// Triggered on every frame, once the new values are computed.
    OnUpdate,
}

/// Convert events to string to facilitate usage with [`EventManager`].
impl From<AnimatorEvent> for String {
    fn from(value: AnimatorEvent) -> Self {
        let event = match value {
            AnimatorEvent::OnStart => "start",
            AnimatorEvent::OnEnd => "end",
            AnimatorEvent::OnCancel => "cancel",
            AnimatorEvent::OnRepeat => "repeat",
            AnimatorEvent::OnPause => "pause",
            AnimatorEvent::OnResume => "resume",
            AnimatorEvent::OnUpdate => "update",
        };
        event.into()
    }
}

/// The lifecycle contract shared by all animators.
///
/// Animators are handles: cloning one (or a `Box<dyn Animator>`) gives another handle on the same
/// animation. Use [`Animator::duplicate()`] to obtain an independent copy.
pub trait Animator: Debug + DynClone {
    /// Returns the unique id of the animator.
    fn get_id(&self) -> AnimatorId;

    /// Returns the event manager of the animator.
    fn events(&self) -> &EventManager;

    /// Returns the animator as `Any`, to downcast a `Box<dyn Animator>` to its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Starts the animation.
    ///
    /// # Errors
    /// * `NoScheduler`: no [`AnimationHandler`] is attached to the animator.
    /// * `CircularDependency`: (sets only) the dependency graph has a cycle.
    fn start(&self) -> Result<(), Error>;

    /// Checks that the animator can be started, without starting anything.
    ///
    /// # Errors
    /// * `CircularDependency`: (sets only) the dependency graph, or the graph of a nested set, has
    ///   a cycle.
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Cancels the animation: values stay where they are. Cancel and end events are emitted if the
    /// animation was started. Canceling twice has no effect.
    fn cancel(&self);

    /// Ends the animation: values jump to their final state and end events are emitted.
    fn end(&self);

    /// Pauses a started animation.
    fn pause(&self);

    /// Resumes a paused animation from where it was paused.
    fn resume(&self);

    fn is_paused(&self) -> bool;

    /// Indicates whether the animation is playing (start delay elapsed).
    fn is_running(&self) -> bool;

    /// Indicates whether the animation has been started and has not ended yet.
    fn is_started(&self) -> bool;

    fn get_start_delay(&self) -> u64;

    /// Sets the delay (in ms) between the call to `start()` and the animation actually starting.
    fn set_start_delay(&self, start_delay: u64);

    /// Returns the duration (in ms) of the animation, if known.
    fn get_duration(&self) -> Option<u64>;

    /// Sets the duration (in ms) of the animation.
    ///
    /// # Errors
    /// * `NegativeDuration`: the given duration is negative.
    fn set_duration(&self, duration: i64) -> Result<(), Error>;

    fn get_easing(&self) -> Option<Easing>;

    /// Sets the easing curve applied to the animation progress.
    fn set_easing(&self, easing: Easing);

    fn get_scheduler(&self) -> Option<AnimationHandler>;

    /// Attaches the frame scheduler the animation is played with.
    fn set_scheduler(&self, scheduler: &AnimationHandler);

    /// Sets the object whose properties are animated.
    fn set_target(&self, target: &Target);

    /// Records the current target values as the start values of the animation.
    fn setup_start_values(&self);

    /// Records the current target values as the end values of the animation.
    fn setup_end_values(&self);

    /// Creates an independent copy of the animator: same configuration and listeners, fresh state.
    fn duplicate(&self) -> Box<dyn Animator>;

    /// Removes every listener registered on the animator.
    fn remove_all_listeners(&self) {
        self.events().clear();
    }

    /// Registers a listener for the given event.
    ///
    /// # Example
    /// ```
    /// use frameflow::animations::{Animator, AnimatorEvent, ValueAnimator};
    ///
    /// let animator = ValueAnimator::of_float(&[0.0, 1.0]);
    /// animator.on(AnimatorEvent::OnEnd, |animator: Box<dyn Animator>| {
    ///     println!("Animator {} has ended", animator.get_id());
    /// });
    /// ```
    fn on<S, F, T>(&self, event: S, callback: F) -> EventHandler
    where
        Self: Sized,
        S: Into<String>,
        T: 'static + Clone,
        F: Fn(T) + 'static,
    {
        self.events().on(event, callback)
    }
}

dyn_clone::clone_trait_object!(Animator);
