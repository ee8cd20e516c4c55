//! This demo orchestrates several sprites with the `play().with().before().after()` grammar.
//!
//! - the title fades in while sliding down,
//! - then the menu pops once the title has landed (and not before 200ms),
//! - meanwhile the background color cycles, and the whole set is paused for a moment.

use std::time::Duration;

use frameflow::animations::{
    target, AccessorRegistry, Animator, AnimatorEvent, AnimatorSet, ArgbEvaluator, Easing,
    FrameLoop, PropertyValuesHolder, Target, TypedProperty, ValueAnimator,
};

#[derive(Debug, Default)]
struct Sprite {
    y: f32,
    alpha: f32,
    scale: f32,
    color: i32,
}

fn sprite_animator(sprite: &Target, holder: PropertyValuesHolder, duration: i64) -> ValueAnimator {
    let animator = ValueAnimator::of_target(sprite, vec![holder]);
    animator.set_duration(duration).unwrap();
    animator
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Named accessors for "y" and "color", a typed property for "alpha".
    AccessorRegistry::register_setter("set_y", |sprite: &mut Sprite, y: f32| sprite.y = y);
    AccessorRegistry::register_getter("get_y", |sprite: &Sprite| sprite.y);
    AccessorRegistry::register_setter("set_color", |sprite: &mut Sprite, color: i32| {
        sprite.color = color
    });
    AccessorRegistry::register_setter("set_scale", |sprite: &mut Sprite, scale: f32| {
        sprite.scale = scale
    });
    let alpha = TypedProperty::new("alpha", |sprite: &Sprite| sprite.alpha)
        .with_setter(|sprite: &mut Sprite, alpha: f32| sprite.alpha = alpha);

    let frames = FrameLoop::new();
    let title = target(Sprite::default());
    let menu = target(Sprite::default());
    let background = target(Sprite::default());

    let alpha = PropertyValuesHolder::of_float_property(alpha, &[0.0, 1.0]);
    let fade_in = sprite_animator(&title, alpha, 600);
    let slide = sprite_animator(&title, PropertyValuesHolder::of_float("y", &[-50.0, 0.0]), 600);
    slide.set_easing(Easing::BounceOut);
    let scale = PropertyValuesHolder::of_float("scale", &[0.0, 1.2, 1.0]);
    let pop = sprite_animator(&menu, scale, 300);
    let (dark, blue) = (0xFF202020u32 as i32, 0xFF4060A0u32 as i32);
    let color = PropertyValuesHolder::of_object("color", ArgbEvaluator, vec![dark, blue]);
    let cycle = sprite_animator(&background, color, 1100);

    let intro = AnimatorSet::new();
    intro.play(&fade_in).with(&slide);
    intro.play(&pop).after(&slide).after_delay(200);

    let set = AnimatorSet::new();
    set.set_scheduler(frames.get_handler());
    set.play(&intro).with(&cycle);
    set.on(AnimatorEvent::OnEnd, |_: Box<dyn Animator>| println!("choreography is over"));
    set.on(AnimatorEvent::OnPause, |_: Box<dyn Animator>| println!("paused"));
    set.on(AnimatorEvent::OnResume, |_: Box<dyn Animator>| println!("resumed"));

    set.start().unwrap();

    // Pause everything for half a second, a quarter of a second in.
    let controller = set.clone();
    let run = frames.run();
    let pause = async move {
        tokio::time::sleep(Duration::from_millis(250)).await;
        controller.pause();
        tokio::time::sleep(Duration::from_millis(500)).await;
        controller.resume();
    };
    tokio::join!(run, pause);

    for (name, sprite) in [("title", &title), ("menu", &menu), ("background", &background)] {
        println!("{}: {:?}", name, sprite.borrow().downcast_ref::<Sprite>());
    }
}
