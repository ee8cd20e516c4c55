use std::any::Any;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt::{Debug, Display, Formatter};
use std::rc::{Rc, Weak};

use log::{debug, error};

use crate::animations::animator::next_animator_id;
use crate::animations::{
    AnimationHandler, Animator, AnimatorEvent, AnimatorId, Easing, Target, ValueAnimator,
};
use crate::errors::*;
use crate::utils::{EventHandler, EventManager};

/// When a node may start relative to one of its dependencies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rule {
    /// Starts when the dependency starts.
    With,
    /// Starts when the dependency ends.
    After,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Dependency {
    node: usize,
    rule: Rule,
}

#[derive(Clone, Debug)]
struct Node {
    animator: Box<dyn Animator>,
    dependencies: Vec<Dependency>,
    /// Dependencies still to be satisfied during the current run.
    run_dependencies: Vec<Dependency>,
    done: bool,
    /// Internal delay node (created by `after_delay()`).
    timing: bool,
}

impl Node {
    fn new(animator: Box<dyn Animator>, timing: bool) -> Self {
        Self {
            animator,
            dependencies: vec![],
            run_dependencies: vec![],
            done: false,
            timing,
        }
    }
}

#[derive(Debug, Default)]
struct SetState {
    nodes: Vec<Node>,
    /// Node indexes in dependency order.
    sorted: Vec<usize>,
    needs_sort: bool,
    /// Ids of the children started and not ended yet.
    playing: Vec<AnimatorId>,
    terminated: bool,
    started: bool,
    paused: bool,
    duration: Option<u64>,
    start_delay: u64,
    easing: Option<Easing>,
    delay_animator: Option<ValueAnimator>,
    scheduler: Option<AnimationHandler>,
}

struct SetShared {
    id: AnimatorId,
    events: EventManager,
    state: RefCell<SetState>,
}

/// Plays a group of animators according to ordering constraints.
///
/// Constraints are declared with [`AnimatorSet::play()`] and the returned [`Builder`], or with
/// the [`AnimatorSet::play_together()`] and [`AnimatorSet::play_sequentially()`] shortcuts.
/// Children are identified by their id: giving the same animator twice refers to the same node.
///
/// # Example
/// ```
/// use std::rc::Rc;
/// use frameflow::animations::{
///     AnimationHandler, Animator, AnimatorSet, ManualFrameSource, ValueAnimator,
/// };
///
/// let source = Rc::new(ManualFrameSource::new());
/// let scheduler = AnimationHandler::new(source.clone());
///
/// let fade_in = ValueAnimator::of_float(&[0.0, 1.0]);
/// let slide = ValueAnimator::of_int(&[0, 100]);
/// let fade_out = ValueAnimator::of_float(&[1.0, 0.0]);
///
/// let set = AnimatorSet::new();
/// set.set_scheduler(&scheduler);
/// set.play(&fade_in).with(&slide).before(&fade_out);
/// set.start().unwrap();
///
/// assert!(fade_in.is_running());
/// assert!(slide.is_running());
/// assert!(!fade_out.is_started());
/// ```
#[derive(Clone)]
pub struct AnimatorSet {
    shared: Rc<SetShared>,
}

/// Declares the ordering constraints of one node of an [`AnimatorSet`].
///
/// Obtained from [`AnimatorSet::play()`]: every method relates the played animator to another.
pub struct Builder<'a> {
    set: &'a AnimatorSet,
    node: usize,
}

impl<'a> Builder<'a> {
    /// The given animator starts at the same time as the played one.
    pub fn with(&self, animator: &(dyn Animator + 'static)) -> &Self {
        let node = self.set.node_of(animator, false);
        self.set.add_dependency(
            node,
            Dependency {
                node: self.node,
                rule: Rule::With,
            },
        );
        self
    }

    /// The given animator starts when the played one ends.
    pub fn before(&self, animator: &(dyn Animator + 'static)) -> &Self {
        let node = self.set.node_of(animator, false);
        self.set.add_dependency(
            node,
            Dependency {
                node: self.node,
                rule: Rule::After,
            },
        );
        self
    }

    /// The played animator starts when the given one ends.
    pub fn after(&self, animator: &(dyn Animator + 'static)) -> &Self {
        let node = self.set.node_of(animator, false);
        self.set.add_dependency(
            self.node,
            Dependency {
                node,
                rule: Rule::After,
            },
        );
        self
    }

    /// The played animator starts after the given delay (in ms).
    pub fn after_delay(&self, delay: u64) -> &Self {
        let timer = ValueAnimator::of_delay(delay);
        let node = self.set.node_of(&timer, true);
        self.set.add_dependency(
            self.node,
            Dependency {
                node,
                rule: Rule::After,
            },
        );
        self
    }
}

impl Default for AnimatorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimatorSet {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(SetShared {
                id: next_animator_id(),
                events: EventManager::default(),
                state: RefCell::new(SetState::default()),
            }),
        }
    }

    fn state(&self) -> Ref<'_, SetState> {
        self.shared.state.borrow()
    }

    fn state_mut(&self) -> RefMut<'_, SetState> {
        self.shared.state.borrow_mut()
    }

    // ########################################
    // Graph construction.

    /// Adds the animator to the set (if needed) and returns a [`Builder`] to declare how it
    /// relates to other animators.
    pub fn play(&self, animator: &(dyn Animator + 'static)) -> Builder<'_> {
        let node = self.node_of(animator, false);
        Builder { set: self, node }
    }

    /// Plays all the given animators at the same time.
    pub fn play_together(&self, animators: &[&(dyn Animator + 'static)]) {
        if let Some((first, others)) = animators.split_first() {
            let builder = self.play(*first);
            for animator in others {
                builder.with(*animator);
            }
        }
    }

    /// Plays the given animators one after the other.
    pub fn play_sequentially(&self, animators: &[&(dyn Animator + 'static)]) {
        match animators {
            [] => {}
            [single] => {
                self.play(*single);
            }
            _ => {
                for pair in animators.windows(2) {
                    self.play(pair[0]).before(pair[1]);
                }
            }
        }
    }

    /// Returns the children of the set (in insertion order).
    pub fn get_child_animations(&self) -> Vec<Box<dyn Animator>> {
        self.state()
            .nodes
            .iter()
            .filter(|node| !node.timing)
            .map(|node| node.animator.clone())
            .collect()
    }

    /// Returns the node index of the animator, adding a new node if it is not part of the set.
    fn node_of(&self, animator: &(dyn Animator + 'static), timing: bool) -> usize {
        let mut state = self.state_mut();
        state.needs_sort = true;
        let id = animator.get_id();
        match state
            .nodes
            .iter()
            .position(|node| node.animator.get_id() == id)
        {
            Some(index) => index,
            None => {
                let animator = dyn_clone::clone_box(animator);
                if let Some(scheduler) = &state.scheduler {
                    animator.set_scheduler(scheduler);
                }
                state.nodes.push(Node::new(animator, timing));
                state.nodes.len() - 1
            }
        }
    }

    fn add_dependency(&self, node: usize, dependency: Dependency) {
        let mut state = self.state_mut();
        state.nodes[node].dependencies.push(dependency);
        state.needs_sort = true;
    }

    /// Sorts the nodes in waves: roots first, then the nodes whose dependencies are all sorted.
    ///
    /// # Errors
    /// * `CircularDependency`: some nodes can never be sorted. The set is left untouched.
    fn sort_nodes(&self) -> Result<(), Error> {
        let mut state = self.state_mut();
        if !state.needs_sort {
            return Ok(());
        }

        let count = state.nodes.len();
        let mut remaining = vec![0usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![vec![]; count];
        for (index, node) in state.nodes.iter().enumerate() {
            let mut distinct: Vec<usize> = node.dependencies.iter().map(|d| d.node).collect();
            distinct.sort_unstable();
            distinct.dedup();
            remaining[index] = distinct.len();
            for dependency in distinct {
                dependents[dependency].push(index);
            }
        }

        let mut sorted = Vec::with_capacity(count);
        let mut wave: Vec<usize> = (0..count).filter(|&index| remaining[index] == 0).collect();
        while !wave.is_empty() {
            let mut next = vec![];
            for index in wave {
                sorted.push(index);
                for &dependent in &dependents[index] {
                    remaining[dependent] -= 1;
                    if remaining[dependent] == 0 {
                        next.push(dependent);
                    }
                }
            }
            wave = next;
        }

        if sorted.len() != count {
            return Err(CircularDependency);
        }
        state.sorted = sorted;
        state.needs_sort = false;
        Ok(())
    }

    // ########################################
    // Playback.

    /// Starts the given node.
    fn start_node(&self, index: usize) -> Result<(), Error> {
        let animator = {
            let mut state = self.state_mut();
            let animator = state.nodes[index].animator.clone();
            state.playing.push(animator.get_id());
            animator
        };
        animator.start()
    }

    /// Called when one dependency of a node is satisfied: starts the node once none is left.
    fn start_if_ready(&self, index: usize, dependency: Dependency) {
        let animator = {
            let mut state = self.state_mut();
            if state.terminated {
                return;
            }
            let node = &mut state.nodes[index];
            let Some(position) = node.run_dependencies.iter().position(|d| *d == dependency) else {
                return;
            };
            node.run_dependencies.remove(position);
            if !node.run_dependencies.is_empty() {
                return;
            }
            let animator = node.animator.clone();
            state.playing.push(animator.get_id());
            animator
        };
        if let Err(error) = animator.start() {
            error!("Animator {} could not start: {}", animator.get_id(), error);
        }
    }

    /// Registers the one-shot listener satisfying the given dependency of a node.
    fn listen_dependency(&self, index: usize, dependency: Dependency) {
        let animator = self.state().nodes[dependency.node].animator.clone();
        let event = match dependency.rule {
            Rule::With => AnimatorEvent::OnStart,
            Rule::After => AnimatorEvent::OnEnd,
        };
        let set = Rc::downgrade(&self.shared);
        let slot: Rc<Cell<Option<EventHandler>>> = Rc::default();
        let handler_slot = slot.clone();
        let handler = animator.events().on_tagged(
            event,
            self.shared.id,
            move |animator: Box<dyn Animator>| {
                if let Some(handler) = handler_slot.take() {
                    animator.events().unregister(handler);
                }
                if let Some(set) = Self::upgrade(&set) {
                    set.start_if_ready(index, dependency);
                }
            },
        );
        slot.set(Some(handler));
    }

    /// Registers the listeners tracking the completion of a node.
    fn listen_completion(&self, index: usize) {
        let animator = self.state().nodes[index].animator.clone();
        let handlers: Rc<RefCell<Vec<EventHandler>>> = Rc::default();

        let set = Rc::downgrade(&self.shared);
        let end_handlers = handlers.clone();
        let on_end = animator.events().on_tagged(
            AnimatorEvent::OnEnd,
            self.shared.id,
            move |animator: Box<dyn Animator>| {
                for handler in end_handlers.take() {
                    animator.events().unregister(handler);
                }
                if let Some(set) = Self::upgrade(&set) {
                    set.on_child_end(index);
                }
            },
        );

        let set = Rc::downgrade(&self.shared);
        let on_cancel = animator.events().on_tagged(
            AnimatorEvent::OnCancel,
            self.shared.id,
            move |_: Box<dyn Animator>| {
                if let Some(set) = Self::upgrade(&set) {
                    set.on_child_cancel();
                }
            },
        );

        handlers.borrow_mut().extend([on_end, on_cancel]);
    }

    fn on_child_end(&self, index: usize) {
        let finished = {
            let mut state = self.state_mut();
            let id = state.nodes[index].animator.get_id();
            if let Some(position) = state.playing.iter().position(|playing| *playing == id) {
                state.playing.remove(position);
            }
            state.nodes[index].done = true;
            if state.terminated {
                return;
            }
            let finished = state.sorted.iter().all(|&node| state.nodes[node].done);
            if finished {
                state.started = false;
                state.paused = false;
            }
            finished
        };
        if finished {
            debug!("End animator set {}", self.shared.id);
            self.emit(AnimatorEvent::OnEnd);
        }
    }

    /// A child's cancel fires before its end removes it from `playing`, so a canceled child ends
    /// the set normally through `on_child_end`. A cancel is only reported once nothing is playing.
    fn on_child_cancel(&self) {
        let canceled = {
            let state = self.state();
            !state.terminated && state.playing.is_empty()
        };
        if canceled {
            self.emit(AnimatorEvent::OnCancel);
        }
    }

    fn sorted_animators(&self) -> Vec<Box<dyn Animator>> {
        let state = self.state();
        state
            .sorted
            .iter()
            .map(|&index| state.nodes[index].animator.clone())
            .collect()
    }

    fn upgrade(set: &Weak<SetShared>) -> Option<Self> {
        set.upgrade().map(|shared| Self { shared })
    }

    fn emit(&self, event: AnimatorEvent) {
        let animator: Box<dyn Animator> = Box::new(self.clone());
        self.shared.events.emit(event, animator);
    }
}

impl Animator for AnimatorSet {
    fn get_id(&self) -> AnimatorId {
        self.shared.id
    }

    fn events(&self) -> &EventManager {
        &self.shared.events
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn validate(&self) -> Result<(), Error> {
        self.sort_nodes()?;
        for animator in self.sorted_animators() {
            animator.validate()?;
        }
        Ok(())
    }

    fn start(&self) -> Result<(), Error> {
        let scheduler = self.get_scheduler().ok_or(NoScheduler)?;
        self.validate()?;

        let (duration, easing, start_delay) = {
            let mut state = self.state_mut();
            state.terminated = false;
            state.started = true;
            state.paused = false;
            state.playing.clear();
            for node in state.nodes.iter_mut() {
                node.done = false;
            }
            (state.duration, state.easing, state.start_delay)
        };
        debug!("Start animator set {}", self.shared.id);

        let (animators, timings): (Vec<_>, Vec<_>) = {
            let state = self.state();
            state
                .sorted
                .iter()
                .map(|&index| (state.nodes[index].animator.clone(), state.nodes[index].timing))
                .unzip()
        };
        for (animator, timing) in animators.iter().zip(timings) {
            animator.events().unregister_tagged(self.shared.id);
            animator.set_scheduler(&scheduler);
            if timing {
                continue;
            }
            if let Some(duration) = duration {
                animator.set_duration(duration as i64)?;
            }
            if let Some(easing) = easing {
                animator.set_easing(easing);
            }
        }

        let sorted = self.state().sorted.clone();
        let mut roots = vec![];
        for &index in &sorted {
            let dependencies = self.state().nodes[index].dependencies.clone();
            if dependencies.is_empty() {
                roots.push(index);
            } else {
                for dependency in &dependencies {
                    self.listen_dependency(index, *dependency);
                }
                self.state_mut().nodes[index].run_dependencies = dependencies;
            }
            self.listen_completion(index);
        }

        if start_delay == 0 {
            for &index in &roots {
                self.start_node(index)?;
            }
        } else {
            let delay = ValueAnimator::of_delay(start_delay);
            delay.set_scheduler(&scheduler);
            let canceled = Rc::new(Cell::new(false));
            let flag = canceled.clone();
            delay.on(AnimatorEvent::OnCancel, move |_: Box<dyn Animator>| {
                flag.set(true)
            });
            let set = Rc::downgrade(&self.shared);
            delay.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| {
                let Some(set) = Self::upgrade(&set) else {
                    return;
                };
                set.state_mut().delay_animator = None;
                if canceled.get() {
                    return;
                }
                for &index in &roots {
                    if let Err(error) = set.start_node(index) {
                        error!("Animator set {} could not start: {}", set.shared.id, error);
                    }
                }
            });
            self.state_mut().delay_animator = Some(delay.clone());
            delay.start()?;
        }

        self.emit(AnimatorEvent::OnStart);

        let empty = start_delay == 0 && sorted.is_empty();
        if empty {
            {
                let mut state = self.state_mut();
                state.started = false;
                state.paused = false;
            }
            self.emit(AnimatorEvent::OnEnd);
        }
        Ok(())
    }

    fn cancel(&self) {
        let (started, delay) = {
            let mut state = self.state_mut();
            state.terminated = true;
            (state.started, state.delay_animator.clone())
        };
        if !started {
            return;
        }
        debug!("Cancel animator set {}", self.shared.id);
        self.emit(AnimatorEvent::OnCancel);
        match delay.filter(|delay| delay.is_running()) {
            Some(delay) => delay.cancel(),
            None => {
                for animator in self.sorted_animators() {
                    animator.cancel();
                }
            }
        }
        {
            let mut state = self.state_mut();
            state.started = false;
            state.paused = false;
        }
        self.emit(AnimatorEvent::OnEnd);
    }

    fn end(&self) {
        let (started, needs_sort, delay) = {
            let mut state = self.state_mut();
            state.terminated = true;
            (state.started, state.needs_sort, state.delay_animator.clone())
        };
        if !started {
            return;
        }
        if needs_sort {
            // Nodes were added while running: track them like the others.
            match self.sort_nodes() {
                Ok(()) => {
                    let sorted = self.state().sorted.clone();
                    for index in sorted {
                        self.state().nodes[index]
                            .animator
                            .events()
                            .unregister_tagged(self.shared.id);
                        self.listen_completion(index);
                    }
                }
                Err(error) => error!("Animator set {} cannot end: {}", self.shared.id, error),
            }
        }
        if let Some(delay) = delay {
            delay.cancel();
        }
        debug!("End animator set {}", self.shared.id);
        for animator in self.sorted_animators() {
            animator.end();
        }
        {
            let mut state = self.state_mut();
            state.started = false;
            state.paused = false;
        }
        self.emit(AnimatorEvent::OnEnd);
    }

    fn pause(&self) {
        let (paused, delay) = {
            let mut state = self.state_mut();
            let paused = state.started && !state.paused;
            if paused {
                state.paused = true;
            }
            (paused, state.delay_animator.clone())
        };
        if !paused {
            return;
        }
        self.emit(AnimatorEvent::OnPause);
        match delay {
            Some(delay) => delay.pause(),
            None => {
                for animator in self.sorted_animators() {
                    animator.pause();
                }
            }
        }
    }

    fn resume(&self) {
        let (resumed, delay) = {
            let mut state = self.state_mut();
            let resumed = state.paused;
            state.paused = false;
            (resumed, state.delay_animator.clone())
        };
        if !resumed {
            return;
        }
        self.emit(AnimatorEvent::OnResume);
        match delay {
            Some(delay) => delay.resume(),
            None => {
                for animator in self.sorted_animators() {
                    animator.resume();
                }
            }
        }
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    /// A set is running as soon as one of its children is.
    fn is_running(&self) -> bool {
        self.state()
            .nodes
            .iter()
            .any(|node| node.animator.is_running())
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

    /// Returns the duration forced on every child, if any.
    fn get_duration(&self) -> Option<u64> {
        self.state().duration
    }

    /// Forces the duration of every child (applied when the set starts).
    fn set_duration(&self, duration: i64) -> Result<(), Error> {
        if duration < 0 {
            return Err(NegativeDuration { duration });
        }
        self.state_mut().duration = Some(duration as u64);
        Ok(())
    }

    fn get_easing(&self) -> Option<Easing> {
        self.state().easing
    }

    /// Forces the easing of every child (applied when the set starts).
    fn set_easing(&self, easing: Easing) {
        self.state_mut().easing = Some(easing);
    }

    fn get_scheduler(&self) -> Option<AnimationHandler> {
        self.state().scheduler.clone()
    }

    fn set_scheduler(&self, scheduler: &AnimationHandler) {
        let animators: Vec<Box<dyn Animator>> = {
            let mut state = self.state_mut();
            state.scheduler = Some(scheduler.clone());
            state.nodes.iter().map(|node| node.animator.clone()).collect()
        };
        for animator in animators {
            animator.set_scheduler(scheduler);
        }
    }

    fn set_target(&self, target: &Target) {
        for animator in self.get_child_animations() {
            animator.set_target(target);
        }
    }

    fn setup_start_values(&self) {
        for animator in self.get_child_animations() {
            animator.setup_start_values();
        }
    }

    fn setup_end_values(&self) {
        for animator in self.get_child_animations() {
            animator.setup_end_values();
        }
    }

    fn duplicate(&self) -> Box<dyn Animator> {
        Box::new(self.duplicate_set())
    }
}

impl AnimatorSet {
    /// Same as [`Animator::duplicate()`], keeping the concrete type.
    ///
    /// Every child is duplicated too: the copy shares no animator with the original.
    pub fn duplicate_set(&self) -> AnimatorSet {
        let state = self.state();
        let nodes = state
            .nodes
            .iter()
            .map(|node| {
                let animator = node.animator.duplicate();
                animator.events().unregister_tagged(self.shared.id);
                let mut copy = Node::new(animator, node.timing);
                copy.dependencies = node.dependencies.clone();
                copy
            })
            .collect();
        let copy = SetState {
            nodes,
            needs_sort: true,
            duration: state.duration,
            start_delay: state.start_delay,
            easing: state.easing,
            scheduler: state.scheduler.clone(),
            ..Default::default()
        };
        Self {
            shared: Rc::new(SetShared {
                id: next_animator_id(),
                events: self.shared.events.duplicate(),
                state: RefCell::new(copy),
            }),
        }
    }
}

impl Debug for AnimatorSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("AnimatorSet")
            .field("id", &self.shared.id)
            .field("nodes", &state.nodes.len())
            .field("started", &state.started)
            .field("duration", &state.duration)
            .field("start_delay", &state.start_delay)
            .finish()
    }
}

impl Display for AnimatorSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        write!(f, "AnimatorSet@{} [nodes={}]", self.shared.id, state.nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::animations::ManualFrameSource;
    use crate::utils::Value;

    use super::*;

    struct Clock {
        source: Rc<ManualFrameSource>,
        handler: AnimationHandler,
    }

    impl Clock {
        fn new() -> Self {
            let source = Rc::new(ManualFrameSource::new());
            let handler = AnimationHandler::new(source.clone());
            Self { source, handler }
        }

        fn frame(&self, time: i64) {
            self.source.set_time(time);
            self.handler.run();
        }

        /// Runs frames every 10ms until the given time.
        fn run_until(&self, from: i64, to: i64) {
            for time in (from..=to).step_by(10) {
                self.frame(time);
            }
        }
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn linear(duration: i64) -> ValueAnimator {
        let animator = ValueAnimator::of_float(&[0.0, 1.0]);
        animator.set_easing(Easing::Linear);
        animator.set_duration(duration).unwrap();
        animator
    }

    /// Logs the start, end and cancel events of the animator under the given name.
    fn track(log: &Log, name: &str, animator: &(dyn Animator + 'static)) {
        for event in [
            AnimatorEvent::OnStart,
            AnimatorEvent::OnEnd,
            AnimatorEvent::OnCancel,
        ] {
            let log = log.clone();
            let entry = format!("{}:{}", name, String::from(event));
            animator
                .events()
                .on(event, move |_: Box<dyn Animator>| log.borrow_mut().push(entry.clone()));
        }
    }

    fn entries(log: &Log) -> Vec<String> {
        log.borrow().clone()
    }

    #[test]
    fn test_play_sequentially() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let (a, b, c) = (linear(100), linear(100), linear(100));
        track(&log, "a", &a);
        track(&log, "b", &b);
        track(&log, "c", &c);

        let set = AnimatorSet::new();
        track(&log, "set", &set);
        set.set_scheduler(&clock.handler);
        set.play_sequentially(&[&a, &b, &c]);
        set.start().unwrap();

        assert!(set.is_started());
        assert!(a.is_running());
        assert!(!b.is_started());
        assert!(!c.is_started());

        clock.run_until(0, 1000);
        assert_eq!(
            entries(&log),
            vec!["a:start", "set:start", "a:end", "b:start", "b:end", "c:start", "c:end", "set:end"]
        );
        assert!(!set.is_started());
        assert!(!set.is_running());
        assert_eq!(c.get_animated_value(), Value::Float(1.0));
    }

    #[test]
    fn test_play_together() {
        let clock = Clock::new();
        let (a, b, c) = (linear(100), linear(200), linear(300));
        let set = AnimatorSet::new();
        set.set_scheduler(&clock.handler);
        set.play_together(&[&a, &b, &c]);

        let ends = Rc::new(Cell::new(0));
        let counter = ends.clone();
        set.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| {
            counter.set(counter.get() + 1)
        });

        set.start().unwrap();
        assert!(a.is_running() && b.is_running() && c.is_running());
        assert!(set.is_running());

        clock.run_until(0, 150);
        assert!(!a.is_running());
        assert!(b.is_running());
        assert_eq!(ends.get(), 0);

        clock.run_until(160, 500);
        assert_eq!(ends.get(), 1, "The set ends once its last child ends.");
        assert!(!set.is_started());
    }

    #[test]
    fn test_sort_order() {
        let (a, b, c) = (linear(10), linear(10), linear(10));
        let set = AnimatorSet::new();
        set.play(&c).after(&b);
        set.play(&b).after(&a);
        set.sort_nodes().unwrap();

        let sorted: Vec<AnimatorId> = set.sorted_animators().iter().map(|a| a.get_id()).collect();
        assert_eq!(sorted, vec![a.get_id(), b.get_id(), c.get_id()]);
        assert_eq!(set.get_child_animations().len(), 3);
    }

    #[test]
    fn test_same_animator_is_one_node() {
        let (a, b) = (linear(10), linear(10));
        let set = AnimatorSet::new();
        set.play(&a).before(&b);
        set.play(&a.clone()).with(&b);
        assert_eq!(set.get_child_animations().len(), 2);
    }

    #[test]
    fn test_circular_dependency() {
        let clock = Clock::new();
        let (a, b) = (linear(100), linear(100));
        let set = AnimatorSet::new();
        set.set_scheduler(&clock.handler);
        set.play(&a).before(&b);
        set.play(&b).before(&a);

        let result = set.start();
        assert!(matches!(result, Err(Error::CircularDependency)));
        assert!(!set.is_started());
        assert!(!a.is_started());
        assert!(!b.is_started());
        assert!(!clock.handler.has_animations());
    }

    /// Returns a set whose two children each wait for the other.
    fn cyclic_set() -> AnimatorSet {
        let (x, y) = (linear(100), linear(100));
        let set = AnimatorSet::new();
        set.play(&x).before(&y);
        set.play(&y).before(&x);
        set
    }

    #[test]
    fn test_nested_circular_dependency() {
        let clock = Clock::new();
        let a = linear(100);
        let outer = AnimatorSet::new();
        outer.set_scheduler(&clock.handler);
        outer.play(&a).with(&cyclic_set());

        assert!(matches!(outer.validate(), Err(Error::CircularDependency)));
        assert!(matches!(outer.start(), Err(Error::CircularDependency)));
        assert!(!outer.is_started());
        assert!(!a.is_started());
        assert!(!clock.handler.has_animations());
        clock.run_until(0, 200);
        assert!(!a.is_started());
    }

    #[test]
    fn test_nested_circular_dependency_at_root() {
        let clock = Clock::new();
        let ends = Rc::new(Cell::new(0));
        let a = linear(100);
        let outer = AnimatorSet::new();
        outer.set_scheduler(&clock.handler);
        outer.play(&a);
        outer.play(&cyclic_set());
        let counter = ends.clone();
        outer.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| {
            counter.set(counter.get() + 1)
        });

        assert!(matches!(outer.start(), Err(Error::CircularDependency)));
        assert!(!outer.is_started());
        assert!(!outer.is_running());
        assert!(!a.is_started());
        assert!(!clock.handler.has_animations());
        assert_eq!(ends.get(), 0);
    }

    #[test]
    fn test_validate_without_cycle() {
        let clock = Clock::new();
        let (a, b) = (linear(100), linear(100));
        let inner = set_of(&clock, &[&a, &b]);
        let outer = AnimatorSet::new();
        outer.play(&inner).after_delay(50);

        assert!(outer.validate().is_ok());
        assert!(!a.is_started());
        assert!(!clock.handler.has_animations());
    }

    #[test]
    fn test_no_scheduler() {
        let set = AnimatorSet::new();
        set.play(&linear(10));
        assert!(matches!(set.start(), Err(Error::NoScheduler)));
    }

    #[test]
    fn test_cancel() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let (a, b) = (linear(500), linear(500));
        let set = AnimatorSet::new();
        track(&log, "set", &set);
        set.set_scheduler(&clock.handler);
        set.play_together(&[&a, &b]);
        set.start().unwrap();
        clock.run_until(0, 50);

        set.cancel();
        assert_eq!(entries(&log), vec!["set:start", "set:cancel", "set:end"]);
        assert!(!a.is_started());
        assert!(!b.is_started());
        assert!(!set.is_started());
        let value = a.get_animated_value().as_float();
        assert!(value > 0.0 && value < 1.0, "Values stay where they are.");

        set.cancel();
        clock.run_until(60, 600);
        assert_eq!(entries(&log).len(), 3);
    }

    #[test]
    fn test_child_cancel_ends_set() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let a = linear(500);
        let set = AnimatorSet::new();
        track(&log, "set", &set);
        set.set_scheduler(&clock.handler);
        set.play(&a);
        set.start().unwrap();
        clock.frame(0);

        a.cancel();
        assert_eq!(entries(&log), vec!["set:start", "set:end"]);
        assert!(!set.is_started());
    }

    fn set_of(clock: &Clock, animators: &[&(dyn Animator + 'static)]) -> AnimatorSet {
        let set = AnimatorSet::new();
        set.set_scheduler(&clock.handler);
        set.play_sequentially(animators);
        set
    }

    #[test]
    fn test_end_jumps_to_final_values() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let (a, b, c) = (linear(100), linear(100), linear(100));
        let set = set_of(&clock, &[&a, &b, &c]);
        track(&log, "c", &c);
        track(&log, "set", &set);
        set.start().unwrap();
        clock.run_until(0, 50);

        set.end();
        for animator in [&a, &b, &c] {
            assert_eq!(animator.get_animated_value(), Value::Float(1.0));
            assert!(!animator.is_started());
        }
        assert_eq!(entries(&log), vec!["set:start", "c:start", "c:end", "set:end"]);
        assert!(!clock.handler.has_animations());
    }

    #[test]
    fn test_start_delay() {
        let clock = Clock::new();
        let a = linear(100);
        let set = set_of(&clock, &[&a]);
        set.set_start_delay(100);
        set.start().unwrap();

        assert!(set.is_started());
        assert!(!a.is_started());
        clock.run_until(0, 90);
        assert!(!a.is_started());
        clock.run_until(100, 120);
        assert!(a.is_running());
        clock.run_until(130, 400);
        assert!(!set.is_started());
        assert_eq!(a.get_animated_value(), Value::Float(1.0));
    }

    #[test]
    fn test_pause_resume() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let (a, b) = (linear(100), linear(100));
        let set = AnimatorSet::new();
        set.set_scheduler(&clock.handler);
        set.play_together(&[&a, &b]);
        set.on(AnimatorEvent::OnPause, {
            let log = log.clone();
            move |_: Box<dyn Animator>| log.borrow_mut().push("pause".into())
        });
        set.on(AnimatorEvent::OnResume, {
            let log = log.clone();
            move |_: Box<dyn Animator>| log.borrow_mut().push("resume".into())
        });

        set.pause();
        assert!(!set.is_paused(), "A set which is not started cannot be paused.");

        set.start().unwrap();
        clock.run_until(0, 50);
        set.pause();
        assert!(set.is_paused());
        assert!(a.is_paused() && b.is_paused());

        set.resume();
        assert!(!set.is_paused());
        assert!(!a.is_paused() && !b.is_paused());
        assert_eq!(entries(&log), vec!["pause", "resume"]);
    }

    #[test]
    fn test_empty_set() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let set = AnimatorSet::new();
        track(&log, "set", &set);
        set.set_scheduler(&clock.handler);
        set.start().unwrap();
        assert_eq!(entries(&log), vec!["set:start", "set:end"]);
        assert!(!set.is_started());
    }

    #[test]
    fn test_after_delay() {
        let clock = Clock::new();
        let (a, b) = (linear(100), linear(100));
        let set = AnimatorSet::new();
        set.set_scheduler(&clock.handler);
        set.play(&a);
        set.play(&b).after_delay(50);
        set.start().unwrap();

        assert!(a.is_running());
        assert!(!b.is_started());
        clock.run_until(0, 40);
        assert!(!b.is_started());
        clock.run_until(50, 60);
        assert!(b.is_running());
        assert_eq!(set.get_child_animations().len(), 2, "Delay nodes are hidden.");
    }

    #[test]
    fn test_forced_duration_and_easing() {
        let clock = Clock::new();
        let (a, b) = (linear(100), linear(300));
        b.set_easing(Easing::BounceOut);
        let set = AnimatorSet::new();
        set.set_scheduler(&clock.handler);
        set.play_together(&[&a, &b]);
        assert!(set.set_duration(-1).is_err());
        set.set_duration(50).unwrap();
        set.set_easing(Easing::Linear);
        assert_eq!(set.get_duration(), Some(50));

        set.start().unwrap();
        assert_eq!(a.get_duration(), Some(50));
        assert_eq!(b.get_duration(), Some(50));
        assert!(matches!(b.get_easing(), Some(Easing::Linear)));
    }

    #[test]
    fn test_nested_set() {
        let clock = Clock::new();
        let log: Log = Rc::default();
        let (x, y, z) = (linear(100), linear(100), linear(100));
        track(&log, "y", &y);
        track(&log, "z", &z);

        let inner = AnimatorSet::new();
        inner.play_sequentially(&[&x, &y]);
        let outer = AnimatorSet::new();
        track(&log, "outer", &outer);
        outer.set_scheduler(&clock.handler);
        outer.play(&inner).before(&z);
        outer.start().unwrap();

        assert!(x.is_running());
        clock.run_until(0, 1000);
        assert_eq!(
            entries(&log),
            vec!["outer:start", "y:start", "y:end", "z:start", "z:end", "outer:end"]
        );
    }

    #[test]
    fn test_restart() {
        let clock = Clock::new();
        let ends = Rc::new(Cell::new(0));
        let (a, b) = (linear(100), linear(100));
        let set = set_of(&clock, &[&a, &b]);
        let counter = ends.clone();
        set.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| {
            counter.set(counter.get() + 1)
        });

        set.start().unwrap();
        clock.run_until(0, 500);
        assert_eq!(ends.get(), 1);

        set.start().unwrap();
        assert!(a.is_running());
        clock.run_until(510, 1000);
        assert_eq!(ends.get(), 2);
        assert_eq!(a.events().count(AnimatorEvent::OnEnd), 0, "Bookkeeping listeners are removed.");
    }

    #[test]
    fn test_duplicate() {
        let clock = Clock::new();
        let (a, b) = (linear(100), linear(100));
        let set = set_of(&clock, &[&a, &b]);
        let copy = set.duplicate_set();
        assert_ne!(copy.get_id(), set.get_id());

        copy.start().unwrap();
        assert!(!a.is_started(), "Children of the original set are not affected.");
        let children = copy.get_child_animations();
        assert_eq!(children.len(), 2);
        assert!(children[0].is_running());
        assert_ne!(children[0].get_id(), a.get_id());

        clock.run_until(0, 500);
        assert!(!copy.is_started());
        assert!(!children[1].is_started());
    }

    #[test]
    fn test_display() {
        let set = AnimatorSet::new();
        set.play(&linear(10));
        assert!(set.to_string().ends_with("[nodes=1]"));
        assert!(format!("{:?}", set).contains("nodes: 1"));
    }
}
