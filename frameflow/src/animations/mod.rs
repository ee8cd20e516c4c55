//! Defines animators to interpolate property values between keyframes over time.
//!
//! - [`ValueAnimator`] plays one timeline and computes the values of its
//!   [`PropertyValuesHolder`]s on every frame.
//! - [`AnimatorSet`] orchestrates several animators according to ordering constraints.
//! - [`AnimationHandler`] ticks the animators on the frames of a [`FrameSource`], such as a
//!   [`FrameLoop`].

mod accessor;
mod animator;
mod animator_set;
mod easing;
mod evaluator;
mod frame_loop;
mod handler;
mod holder;
mod keyframe;
mod keyframe_set;
mod property;
mod value_animator;

pub use accessor::{method_name, AccessorRegistry, Getter, Setter, Visibility};
pub use animator::{Animator, AnimatorEvent, AnimatorId};
pub use animator_set::{AnimatorSet, Builder};
pub use easing::Easing;
pub use evaluator::{ArgbEvaluator, DoubleEvaluator, FloatEvaluator, IntEvaluator, TypeEvaluator};
pub use frame_loop::FrameLoop;
pub use handler::{AnimationHandler, FrameSource, ManualFrameSource};
pub use holder::{Keyframes, PropertyValuesHolder};
pub use keyframe::{Animatable, FloatKeyframe, IntKeyframe, Keyframe, ObjectKeyframe};
pub use keyframe_set::{FloatKeyframeSet, IntKeyframeSet, KeyframeSet, ObjectKeyframeSet};
pub use property::{target, FloatProperty, IntProperty, Property, Target, TypedProperty};
pub use value_animator::{RepeatMode, ValueAnimator, DEFAULT_DURATION, INFINITE};
