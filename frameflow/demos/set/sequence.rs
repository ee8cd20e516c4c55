//! This demo plays animators one after the other with an [`AnimatorSet`].

use frameflow::animations::{Animator, AnimatorEvent, AnimatorSet, FrameLoop, ValueAnimator};

/// Logs the lifecycle of an animator.
fn trace(name: &'static str, animator: &ValueAnimator) {
    animator.on(AnimatorEvent::OnStart, move |_: Box<dyn Animator>| {
        println!("{} starts", name)
    });
    animator.on(AnimatorEvent::OnEnd, move |_: Box<dyn Animator>| {
        println!("{} ends", name)
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let frames = FrameLoop::new();

    let grow = ValueAnimator::of_float(&[1.0, 2.0]);
    let spin = ValueAnimator::of_int(&[0, 360]);
    let shrink = ValueAnimator::of_float(&[2.0, 1.0]);
    trace("grow", &grow);
    trace("spin", &spin);
    trace("shrink", &shrink);

    let set = AnimatorSet::new();
    set.set_duration(400).unwrap();
    set.set_scheduler(frames.get_handler());
    set.play_sequentially(&[&grow, &spin, &shrink]);
    set.on(AnimatorEvent::OnEnd, |_: Box<dyn Animator>| println!("sequence is over"));

    set.start().unwrap();
    frames.run().await;
}
