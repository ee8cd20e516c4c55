//! This demo shows how to repeat an animation, in both directions.
//!
//! A color is interpolated channel by channel with the [`ArgbEvaluator`], back and forth, three times.

use frameflow::animations::{
    Animator, AnimatorEvent, ArgbEvaluator, FrameLoop, RepeatMode, ValueAnimator,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let frames = FrameLoop::new().set_fps(20);

    let (red, blue) = (0xFFFF0000u32 as i32, 0xFF0000FFu32 as i32);
    let animator = ValueAnimator::of_object(ArgbEvaluator, vec![red, blue]);
    animator.set_duration(500).unwrap();
    animator.set_repeat_count(2);
    animator.set_repeat_mode(RepeatMode::Reverse);
    animator.set_scheduler(frames.get_handler());

    animator.on_update(|animator: ValueAnimator| {
        println!("color = {:#010x}", animator.get_animated_value().as_integer());
    });
    animator.on(AnimatorEvent::OnRepeat, |_: Box<dyn Animator>| {
        println!("- repeat -");
    });

    animator.start().unwrap();
    frames.run().await;
}
