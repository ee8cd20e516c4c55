//! This demo shows the minimal requirement: one animator, played by a frame loop.
//!
//! The animator is bound to its target through the named accessors registered in the
//! [`AccessorRegistry`]: the holder named "x" finds the `set_x` / `get_x` accessors of `Ball`.

use frameflow::animations::{
    target, AccessorRegistry, Animator, AnimatorEvent, Easing, FrameLoop, PropertyValuesHolder,
    ValueAnimator,
};

#[derive(Debug, Default)]
struct Ball {
    x: f32,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    AccessorRegistry::register_setter("set_x", |ball: &mut Ball, x: f32| ball.x = x);
    AccessorRegistry::register_getter("get_x", |ball: &Ball| ball.x);

    // The frame loop provides the scheduler: 40 frames per second by default.
    let frames = FrameLoop::new();
    let ball = target(Ball::default());

    let animator = ValueAnimator::of_target(
        &ball,
        vec![PropertyValuesHolder::of_float("x", &[0.0, 250.0])],
    );
    animator.set_duration(1000).unwrap();
    animator.set_easing(Easing::SineInOut);
    animator.set_scheduler(frames.get_handler());

    animator.on_update(|animator: ValueAnimator| {
        println!("x = {}", animator.get_animated_value());
    });
    animator.on(AnimatorEvent::OnEnd, |animator: Box<dyn Animator>| {
        println!("Animator {} has ended", animator.get_id());
    });

    animator.start().unwrap();
    frames.run().await;

    println!("Final state: {:?}", ball.borrow().downcast_ref::<Ball>());
}
