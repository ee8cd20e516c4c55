use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use log::{debug, trace};

use crate::animations::animator::next_animator_id;
use crate::animations::{
    AnimationHandler, Animator, AnimatorEvent, AnimatorId, Easing, PropertyValuesHolder, Target,
    TypeEvaluator,
};
use crate::errors::*;
use crate::utils::{EventHandler, EventManager, Value};

/// Repeat count meaning "repeat forever".
pub const INFINITE: i32 = -1;

/// Default duration of an animation (in ms).
pub const DEFAULT_DURATION: u64 = 300;

/// How an animation behaves when it reaches its end and repeats.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RepeatMode {
    /// Restarts from the beginning.
    #[default]
    Restart,
    /// Plays backwards, then forwards again, etc.
    Reverse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PlayingState {
    /// Not started yet, or ended.
    #[default]
    Stopped,
    /// Playing normally.
    Running,
    /// Moved to a given play time before being started.
    Seeked,
}

#[derive(Debug)]
struct AnimatorState {
    // ########################################
    // # Configuration.
    duration: u64,
    start_delay: u64,
    repeat_count: i32,
    repeat_mode: RepeatMode,
    easing: Easing,
    values: Vec<PropertyValuesHolder>,
    target: Option<Target>,
    scheduler: Option<AnimationHandler>,

    // ########################################
    // # Playing state.
    playing_state: PlayingState,
    /// The time the animation (or its current iteration) started.
    start_time: i64,
    /// Play time requested before the animation runs.
    seek_time: Option<i64>,
    /// Frame time at which a pause was first observed.
    pause_time: Option<i64>,
    /// Time at which the start delay began.
    delay_start_time: i64,
    started_delay: bool,
    playing_backwards: bool,
    current_iteration: i32,
    current_fraction: f32,
    started: bool,
    running: bool,
    start_listeners_called: bool,
    paused: bool,
    resumed: bool,
    initialized: bool,
}

impl Default for AnimatorState {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            start_delay: 0,
            repeat_count: 0,
            repeat_mode: RepeatMode::default(),
            easing: Easing::default(),
            values: vec![],
            target: None,
            scheduler: None,
            playing_state: PlayingState::Stopped,
            start_time: 0,
            seek_time: None,
            pause_time: None,
            delay_start_time: 0,
            started_delay: false,
            playing_backwards: false,
            current_iteration: 0,
            current_fraction: 0.0,
            started: false,
            running: false,
            start_listeners_called: false,
            paused: false,
            resumed: false,
            initialized: false,
        }
    }
}

impl AnimatorState {
    fn duration_scale(&self) -> f32 {
        self.scheduler
            .as_ref()
            .map_or(1.0, AnimationHandler::get_duration_scale)
    }

    fn scaled_duration(&self) -> i64 {
        (self.duration as f32 * self.duration_scale()) as i64
    }

    fn scaled_start_delay(&self) -> i64 {
        (self.start_delay as f32 * self.duration_scale()) as i64
    }
}

struct AnimatorShared {
    id: AnimatorId,
    events: EventManager,
    state: RefCell<AnimatorState>,
}

/// Animates values over time.
///
/// A value animator computes, on every frame of its [`AnimationHandler`], the values of its
/// [`PropertyValuesHolder`]s at the elapsed fraction of its duration. When a target is set, those
/// values are written to the target properties; update listeners are notified in any case.
///
/// The animation lifecycle is: start delay, play (possibly repeated, possibly reversed on every
/// other iteration), end. It can be paused, resumed, canceled or ended at any time.
///
/// `ValueAnimator` is a handle: clones refer to the same animation.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use frameflow::animations::{AnimationHandler, Animator, ManualFrameSource, RepeatMode, ValueAnimator};
/// use frameflow::utils::Value;
///
/// let source = Rc::new(ManualFrameSource::new());
/// let handler = AnimationHandler::new(source.clone());
///
/// let animator = ValueAnimator::of_float(&[0.0, 10.0]);
/// animator.set_duration(500).unwrap();
/// animator.set_repeat_count(1);
/// animator.set_repeat_mode(RepeatMode::Reverse);
/// animator.set_scheduler(&handler);
/// animator.on_update(|animator: ValueAnimator| {
///     println!("Value: {}", animator.get_animated_value());
/// });
/// animator.start().unwrap();
/// ```
#[derive(Clone)]
pub struct ValueAnimator {
    shared: Rc<AnimatorShared>,
}

impl Default for ValueAnimator {
    fn default() -> Self {
        Self::from_state(AnimatorState::default())
    }
}

impl ValueAnimator {
    fn from_state(state: AnimatorState) -> Self {
        Self {
            shared: Rc::new(AnimatorShared {
                id: next_animator_id(),
                events: EventManager::default(),
                state: RefCell::new(state),
            }),
        }
    }

    /// Creates an animator between the given integers.
    pub fn of_int(values: &[i32]) -> Self {
        let animator = Self::default();
        animator.set_int_values(values);
        animator
    }

    /// Creates an animator between the given floats.
    pub fn of_float(values: &[f32]) -> Self {
        let animator = Self::default();
        animator.set_float_values(values);
        animator
    }

    /// Creates an animator between arbitrary values, interpolated by the given evaluator.
    pub fn of_object<E, T>(evaluator: E, values: Vec<T>) -> Self
    where
        E: TypeEvaluator + 'static,
        T: Into<Value>,
    {
        let animator = Self::default();
        animator.set_object_values(values);
        animator.set_evaluator(evaluator);
        animator
    }

    /// Creates an animator for the given property holders.
    pub fn of_property_values_holder(values: Vec<PropertyValuesHolder>) -> Self {
        let animator = Self::default();
        animator.set_values(values);
        animator
    }

    /// Creates an animator of the given property holders, writing to the given target.
    pub fn of_target(target: &Target, values: Vec<PropertyValuesHolder>) -> Self {
        let animator = Self::of_property_values_holder(values);
        animator.set_target(target);
        animator
    }

    /// Creates an animator without target used as a timer of the given duration.
    pub(crate) fn of_delay(duration: u64) -> Self {
        let animator = Self::of_float(&[0.0, 1.0]);
        {
            let mut state = animator.state_mut();
            state.duration = duration;
            state.easing = Easing::Linear;
        }
        animator
    }

    fn state(&self) -> Ref<'_, AnimatorState> {
        self.shared.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, AnimatorState> {
        self.shared.state.borrow_mut()
    }

    // ########################################
    // Values.

    /// Sets integer values: on the first holder if any, otherwise on a new unnamed holder.
    pub fn set_int_values(&self, values: &[i32]) {
        let mut state = self.state_mut();
        match state.values.first_mut() {
            None => state.values = vec![PropertyValuesHolder::of_int("", values)],
            Some(holder) => holder.set_int_values(values),
        }
        state.initialized = false;
    }

    /// Sets float values: on the first holder if any, otherwise on a new unnamed holder.
    pub fn set_float_values(&self, values: &[f32]) {
        let mut state = self.state_mut();
        match state.values.first_mut() {
            None => state.values = vec![PropertyValuesHolder::of_float("", values)],
            Some(holder) => holder.set_float_values(values),
        }
        state.initialized = false;
    }

    /// Sets generic values: on the first holder if any, otherwise on a new unnamed holder.
    pub fn set_object_values<T: Into<Value>>(&self, values: Vec<T>) {
        let mut state = self.state_mut();
        match state.values.first_mut() {
            None => state.values = vec![PropertyValuesHolder::of_values("", values)],
            Some(holder) => holder.set_object_values(values),
        }
        state.initialized = false;
    }

    /// Replaces every property holder.
    pub fn set_values(&self, values: Vec<PropertyValuesHolder>) {
        let mut state = self.state_mut();
        state.values = values;
        state.initialized = false;
    }

    /// Returns a copy of the property holders.
    pub fn get_values(&self) -> Vec<PropertyValuesHolder> {
        self.state().values.clone()
    }

    /// Sets the evaluator of the first holder.
    pub fn set_evaluator<E: TypeEvaluator + 'static>(&self, evaluator: E) {
        if let Some(holder) = self.state_mut().values.first_mut() {
            holder.set_evaluator(evaluator);
        }
    }

    /// Returns the value most recently computed for the first holder.
    pub fn get_animated_value(&self) -> Value {
        self.state()
            .values
            .first()
            .map(|holder| holder.get_animated_value().clone())
            .unwrap_or_default()
    }

    /// Returns the value most recently computed for the given property.
    pub fn get_animated_value_of(&self, property_name: &str) -> Option<Value> {
        self.state()
            .values
            .iter()
            .find(|holder| holder.get_property_name() == property_name)
            .map(|holder| holder.get_animated_value().clone())
    }

    /// Returns the eased fraction of the current frame.
    pub fn get_animated_fraction(&self) -> f32 {
        self.state().current_fraction
    }

    // ########################################
    // Configuration.

    pub fn get_repeat_count(&self) -> i32 {
        self.state().repeat_count
    }

    /// Sets how many times the animation repeats after its first play: [`INFINITE`] repeats
    /// forever.
    pub fn set_repeat_count(&self, repeat_count: i32) {
        self.state_mut().repeat_count = repeat_count.max(INFINITE);
    }

    pub fn get_repeat_mode(&self) -> RepeatMode {
        self.state().repeat_mode
    }

    pub fn set_repeat_mode(&self, repeat_mode: RepeatMode) {
        self.state_mut().repeat_mode = repeat_mode;
    }

    pub fn get_target(&self) -> Option<Target> {
        self.state().target.clone()
    }

    pub(crate) fn get_scaled_start_delay(&self) -> i64 {
        self.state().scaled_start_delay()
    }

    /// Registers an update listener, called on every frame once values are computed.
    pub fn on_update<F>(&self, callback: F) -> EventHandler
    where
        F: Fn(ValueAnimator) + 'static,
    {
        self.shared.events.on(AnimatorEvent::OnUpdate, callback)
    }

    /// Removes every update listener.
    pub fn remove_all_update_listeners(&self) {
        self.shared.events.unregister_event(AnimatorEvent::OnUpdate);
    }

    // ########################################
    // Playback.

    /// Plays the animation backwards: from its current position when running, or from its end
    /// otherwise.
    ///
    /// # Errors
    /// * `NoScheduler`: the animation has to be started but no scheduler is attached.
    pub fn reverse(&self) -> Result<(), Error> {
        let (running, started) = {
            let mut state = self.state_mut();
            state.playing_backwards = !state.playing_backwards;
            (state.playing_state == PlayingState::Running, state.started)
        };
        if running {
            let now = self.now();
            let mut state = self.state_mut();
            let current_play_time = now - state.start_time;
            let time_left = state.scaled_duration() - current_play_time;
            state.start_time = now - time_left;
            Ok(())
        } else if started {
            self.end();
            Ok(())
        } else {
            self.start_with(true)
        }
    }

    /// Moves the animation to the given play time (in ms) and computes the values at that time.
    ///
    /// # Errors
    /// * `NoScheduler`: no scheduler is attached to provide the current time.
    pub fn set_current_play_time(&self, play_time: i64) -> Result<(), Error> {
        let scheduler = self.get_scheduler().ok_or(NoScheduler)?;
        self.init_animation();
        let current_time = scheduler.now();
        {
            let mut state = self.state_mut();
            if state.playing_state != PlayingState::Running {
                state.seek_time = Some(play_time);
                state.playing_state = PlayingState::Seeked;
            }
            state.start_time = current_time - play_time;
        }
        self.do_animation_frame(current_time);
        Ok(())
    }

    /// Returns the elapsed play time (in ms) of the current iteration.
    pub fn get_current_play_time(&self) -> i64 {
        let (playing, start_time) = {
            let state = self.state();
            let playing = state.initialized && state.playing_state != PlayingState::Stopped;
            (playing, state.start_time)
        };
        match playing {
            true => self.now() - start_time,
            false => 0,
        }
    }

    fn now(&self) -> i64 {
        self.get_scheduler().map_or(0, |scheduler| scheduler.now())
    }

    fn start_with(&self, playing_backwards: bool) -> Result<(), Error> {
        let scheduler = self.get_scheduler().ok_or(NoScheduler)?;
        let start_delay = {
            let mut state = self.state_mut();
            state.playing_backwards = playing_backwards;
            state.current_iteration = 0;
            state.playing_state = PlayingState::Stopped;
            state.started = true;
            state.started_delay = false;
            state.paused = false;
            state.scaled_start_delay()
        };
        debug!("Start animator {}", self.get_id());
        scheduler.add_pending(self);
        if start_delay == 0 {
            // Sets the initial values right away.
            self.set_current_play_time(0)?;
            {
                let mut state = self.state_mut();
                state.playing_state = PlayingState::Stopped;
                state.running = true;
            }
            self.notify_start_listeners();
        }
        scheduler.schedule();
        Ok(())
    }

    fn init_animation(&self) {
        let mut state = self.state_mut();
        if state.initialized {
            return;
        }
        if let Some(target) = state.target.clone() {
            for holder in state.values.iter_mut() {
                holder.setup_setter_and_getter(&target);
            }
        }
        for holder in state.values.iter_mut() {
            holder.init();
        }
        state.initialized = true;
    }

    /// Makes the animation playing: called by the scheduler once the animation is due.
    pub(crate) fn start_animation(&self, scheduler: Option<&AnimationHandler>) {
        self.init_animation();
        if let Some(scheduler) = scheduler {
            scheduler.add_animation(self);
        }
        if self.state().scaled_start_delay() > 0 {
            self.notify_start_listeners();
        }
    }

    /// Makes a delayed animation playing: called by the scheduler once its delay elapsed.
    pub(crate) fn start_delayed_animation(&self, scheduler: &AnimationHandler) {
        self.state_mut().running = true;
        self.start_animation(Some(scheduler));
    }

    /// Processes one frame of the start delay. Returns true once the delay has elapsed.
    pub(crate) fn delayed_animation_frame(&self, current_time: i64) -> bool {
        let mut state = self.state_mut();
        if !state.started_delay {
            state.started_delay = true;
            state.delay_start_time = current_time;
        } else if state.paused {
            if state.pause_time.is_none() {
                state.pause_time = Some(current_time);
            }
            return false;
        } else if state.resumed {
            state.resumed = false;
            if let Some(pause_time) = state.pause_time.take() {
                state.delay_start_time += current_time - pause_time;
            }
        }
        let delta_time = current_time - state.delay_start_time;
        let start_delay = state.scaled_start_delay();
        if delta_time > start_delay {
            state.start_time = current_time - (delta_time - start_delay);
            state.playing_state = PlayingState::Running;
            return true;
        }
        false
    }

    /// Processes one frame. Returns true when the animation is done.
    pub(crate) fn do_animation_frame(&self, frame_time: i64) -> bool {
        let current_time = {
            let mut state = self.state_mut();
            if state.playing_state == PlayingState::Stopped {
                state.playing_state = PlayingState::Running;
                state.start_time = match state.seek_time.take() {
                    None => frame_time,
                    Some(seek_time) => frame_time - seek_time,
                };
            }
            if state.paused {
                if state.pause_time.is_none() {
                    state.pause_time = Some(frame_time);
                }
                return false;
            } else if state.resumed {
                state.resumed = false;
                if let Some(pause_time) = state.pause_time.take() {
                    state.start_time += frame_time - pause_time;
                }
            }
            // Never animate at a time before the start time (seeking backwards).
            frame_time.max(state.start_time)
        };
        self.animation_frame(current_time)
    }

    fn animation_frame(&self, current_time: i64) -> bool {
        let (fraction, repeats) = {
            let state = self.state();
            if state.playing_state == PlayingState::Stopped {
                return false;
            }
            let duration = state.scaled_duration();
            let fraction = match duration > 0 {
                true => (current_time - state.start_time) as f32 / duration as f32,
                false => 1.0,
            };
            let repeats = fraction >= 1.0
                && (state.current_iteration < state.repeat_count
                    || state.repeat_count == INFINITE);
            (fraction, repeats)
        };

        if repeats {
            self.emit(AnimatorEvent::OnRepeat);
        }

        let (fraction, done) = {
            let mut state = self.state_mut();
            let mut fraction = fraction;
            let mut done = false;
            if fraction >= 1.0 {
                if repeats {
                    if state.repeat_mode == RepeatMode::Reverse {
                        state.playing_backwards = !state.playing_backwards;
                    }
                    state.current_iteration += fraction as i32;
                    fraction %= 1.0;
                    state.start_time += state.scaled_duration();
                } else {
                    done = true;
                    fraction = fraction.min(1.0);
                }
            }
            if state.playing_backwards {
                fraction = 1.0 - fraction;
            }
            (fraction, done)
        };

        self.animate_value(fraction);
        done
    }

    /// Computes the values at the given (linear) fraction, writes them on the target and notifies
    /// update listeners.
    fn animate_value(&self, fraction: f32) {
        {
            let mut state = self.state_mut();
            let fraction = state.easing.call(fraction);
            state.current_fraction = fraction;
            for holder in state.values.iter_mut() {
                holder.calculate_value(fraction);
            }
            if let Some(target) = &state.target {
                for holder in &state.values {
                    holder.set_animated_value(target);
                }
            }
            trace!("Animator {} at fraction {}", self.shared.id, fraction);
        }
        self.shared
            .events
            .emit(AnimatorEvent::OnUpdate, self.clone());
    }

    /// Stops the animation and notifies end listeners.
    pub(crate) fn end_animation(&self) {
        if let Some(scheduler) = self.get_scheduler() {
            scheduler.remove(self);
        }
        let (notify, notify_start) = {
            let mut state = self.state_mut();
            state.playing_state = PlayingState::Stopped;
            state.paused = false;
            let notify = state.started || state.running;
            let notify_start = notify && !state.running;
            state.running = false;
            state.started = false;
            state.playing_backwards = false;
            (notify, notify_start)
        };
        if notify_start {
            // Never started running: start listeners were not called yet.
            self.notify_start_listeners();
        }
        self.state_mut().start_listeners_called = false;
        if notify {
            debug!("End animator {}", self.get_id());
            self.emit(AnimatorEvent::OnEnd);
        }
    }

    fn notify_start_listeners(&self) {
        let already_called = std::mem::replace(&mut self.state_mut().start_listeners_called, true);
        if !already_called {
            self.emit(AnimatorEvent::OnStart);
        }
    }

    fn emit(&self, event: AnimatorEvent) {
        let animator: Box<dyn Animator> = Box::new(self.clone());
        self.shared.events.emit(event, animator);
    }
}

impl Animator for ValueAnimator {
    fn get_id(&self) -> AnimatorId {
        self.shared.id
    }

    fn events(&self) -> &EventManager {
        &self.shared.events
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn start(&self) -> Result<(), Error> {
        self.start_with(false)
    }

    fn cancel(&self) {
        let queued = self.get_scheduler().is_some_and(|scheduler| {
            scheduler.contains_pending(self) || scheduler.contains_delayed(self)
        });
        let (playing, notify, notify_start) = {
            let state = self.state();
            let notify = state.started || state.running;
            (
                state.playing_state != PlayingState::Stopped,
                notify,
                notify && !state.running,
            )
        };
        if !playing && !queued {
            return;
        }
        if notify {
            if notify_start {
                self.notify_start_listeners();
            }
            debug!("Cancel animator {}", self.get_id());
            self.emit(AnimatorEvent::OnCancel);
        }
        self.end_animation();
    }

    fn end(&self) {
        let scheduler = self.get_scheduler();
        let queued = scheduler.as_ref().is_some_and(|scheduler| {
            scheduler.contains_animation(self) || scheduler.contains_pending(self)
        });
        if !queued {
            // Not started yet: get it ready for ending.
            self.state_mut().started_delay = false;
            self.start_animation(scheduler.as_ref());
            self.state_mut().started = true;
        } else {
            self.init_animation();
        }
        let fraction = match self.state().playing_backwards {
            true => 0.0,
            false => 1.0,
        };
        self.animate_value(fraction);
        self.end_animation();
    }

    fn pause(&self) {
        let paused = {
            let mut state = self.state_mut();
            if state.started && !state.paused {
                state.paused = true;
                state.pause_time = None;
                state.resumed = false;
                true
            } else {
                false
            }
        };
        if paused {
            self.emit(AnimatorEvent::OnPause);
        }
    }

    fn resume(&self) {
        let resumed = {
            let mut state = self.state_mut();
            if state.paused {
                state.paused = false;
                state.resumed = true;
                true
            } else {
                false
            }
        };
        if resumed {
            self.emit(AnimatorEvent::OnResume);
        }
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn is_running(&self) -> bool {
        self.state().running
    }

    fn is_started(&self) -> bool {
        self.state().started
    }

    fn get_start_delay(&self) -> u64 {
        self.state().start_delay
    }

    fn set_start_delay(&self, start_delay: u64) {
        self.state_mut().start_delay = start_delay;
    }

    fn get_duration(&self) -> Option<u64> {
        Some(self.state().duration)
    }

    fn set_duration(&self, duration: i64) -> Result<(), Error> {
        if duration < 0 {
            return Err(NegativeDuration { duration });
        }
        self.state_mut().duration = duration as u64;
        Ok(())
    }

    fn get_easing(&self) -> Option<Easing> {
        Some(self.state().easing)
    }

    fn set_easing(&self, easing: Easing) {
        self.state_mut().easing = easing;
    }

    fn get_scheduler(&self) -> Option<AnimationHandler> {
        self.state().scheduler.clone()
    }

    fn set_scheduler(&self, scheduler: &AnimationHandler) {
        self.state_mut().scheduler = Some(scheduler.clone());
    }

    fn set_target(&self, target: &Target) {
        let mut state = self.state_mut();
        // Accessors resolved for the same target type stay valid.
        let same_type = match &state.target {
            None => false,
            Some(current) if Rc::ptr_eq(current, target) => return,
            Some(current) => match (current.try_borrow(), target.try_borrow()) {
                (Ok(current), Ok(target)) => {
                    let current: &dyn Any = &*current;
                    let target: &dyn Any = &*target;
                    current.type_id() == target.type_id()
                }
                _ => false,
            },
        };
        state.target = Some(target.clone());
        if !same_type {
            state.initialized = false;
        }
    }

    fn setup_start_values(&self) {
        self.init_animation();
        let mut state = self.state_mut();
        if let Some(target) = state.target.clone() {
            for holder in state.values.iter_mut() {
                holder.setup_start_value(&target);
            }
        }
    }

    fn setup_end_values(&self) {
        self.init_animation();
        let mut state = self.state_mut();
        if let Some(target) = state.target.clone() {
            for holder in state.values.iter_mut() {
                holder.setup_end_value(&target);
            }
        }
    }

    fn duplicate(&self) -> Box<dyn Animator> {
        Box::new(self.duplicate_animator())
    }
}

impl ValueAnimator {
    /// Same as [`Animator::duplicate()`], keeping the concrete type.
    pub fn duplicate_animator(&self) -> ValueAnimator {
        let state = self.state();
        let copy = AnimatorState {
            duration: state.duration,
            start_delay: state.start_delay,
            repeat_count: state.repeat_count,
            repeat_mode: state.repeat_mode,
            easing: state.easing,
            values: state.values.clone(),
            target: state.target.clone(),
            scheduler: state.scheduler.clone(),
            ..Default::default()
        };
        Self {
            shared: Rc::new(AnimatorShared {
                id: next_animator_id(),
                events: self.shared.events.duplicate(),
                state: RefCell::new(copy),
            }),
        }
    }
}

impl Debug for ValueAnimator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ValueAnimator")
            .field("id", &self.shared.id)
            .field("duration", &state.duration)
            .field("start_delay", &state.start_delay)
            .field("repeat_count", &state.repeat_count)
            .field("repeat_mode", &state.repeat_mode)
            .field("playing_state", &state.playing_state)
            .field("values", &state.values)
            .finish()
    }
}

impl Display for ValueAnimator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        write!(f, "ValueAnimator@{} [duration={}ms]", self.shared.id, state.duration)?;
        for holder in &state.values {
            write!(f, "\n    {}", holder)?;
        }
        Ok(())
    }
}
