#![doc(html_root_url = "https://docs.rs/frameflow/0.1.0-beta")]

//! <h1 align="center">FRAMEFLOW - Frame driven property animations</h1>
//! <div style="text-align:center;font-style:italic;">Frameflow computes animated property values over time and orchestrates groups of animations - written in Rust.</div>
//! <br/>
//!
//! # Documentation
//!
//! This is the API documentation.<br/>
//! To see the code in action, visit the [demos](https://github.com/dclause/frameflow/tree/develop/frameflow/demos) directory.
//!
//! # Features
//!
//! **Frameflow** is a Rust library that produces numeric property values and lifecycle callbacks at well
//! defined instants: what is done with the values (repaint, layout, motor position, etc.) is up to you.
//!
//! - Describe values with [`Keyframe`](animations::Keyframe)s, interpolated by a [`TypeEvaluator`](animations::TypeEvaluator)
//!   and an [`Easing`](animations::Easing) curve
//! - Bind [`PropertyValuesHolder`](animations::PropertyValuesHolder)s to any object through typed
//!   [`Property`](animations::Property) capabilities or the named accessors of the [`AccessorRegistry`](animations::AccessorRegistry)
//! - Play a timeline with a [`ValueAnimator`](animations::ValueAnimator): start delay, repeat, reverse, pause and resume
//! - Orchestrate animators with an [`AnimatorSet`](animations::AnimatorSet): `play(a).with(b).before(c).after(d)`
//! - Drive everything from your own render loop ([`ManualFrameSource`](animations::ManualFrameSource)) or from
//!   the tokio clock ([`FrameLoop`](animations::FrameLoop))
//!
//! # Getting Started
//!
//! - Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! frameflow = "0.1.0-beta"
//! ```
//!
//! The following code fades a sprite in, then moves it to the right.
//! ```rust
//! use frameflow::animations::{
//!     target, Animator, AnimatorSet, FrameLoop, PropertyValuesHolder, TypedProperty, ValueAnimator,
//! };
//!
//! #[derive(Debug, Default)]
//! struct Sprite {
//!     x: f32,
//!     alpha: f32,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let frames = FrameLoop::new();
//!     let sprite = target(Sprite::default());
//!
//!     let alpha = TypedProperty::new("alpha", |sprite: &Sprite| sprite.alpha)
//!         .with_setter(|sprite: &mut Sprite, alpha: f32| sprite.alpha = alpha);
//!     let x = TypedProperty::new("x", |sprite: &Sprite| sprite.x)
//!         .with_setter(|sprite: &mut Sprite, x: f32| sprite.x = x);
//!
//!     let fade_in = ValueAnimator::of_target(
//!         &sprite,
//!         vec![PropertyValuesHolder::of_float_property(alpha, &[0.0, 1.0])],
//!     );
//!     let slide = ValueAnimator::of_target(
//!         &sprite,
//!         vec![PropertyValuesHolder::of_float_property(x, &[0.0, 100.0])],
//!     );
//!
//!     let set = AnimatorSet::new();
//!     set.set_scheduler(frames.get_handler());
//!     set.play(&fade_in).before(&slide);
//!     set.start().unwrap();
//!
//!     frames.run().await;
//!     println!("{:?}", sprite.borrow().downcast_ref::<Sprite>());
//! }
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for values and configuration entities.
//! - **mocks** -- Provides mocked entities (useful for tests mostly).

pub mod animations;
pub mod errors;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod utils;
