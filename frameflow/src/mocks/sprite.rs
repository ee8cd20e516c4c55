use std::fmt::{Display, Formatter};

use crate::animations::AccessorRegistry;

/// Mock animation target for testing purposes.
///
/// The accessors of its properties are published to the
/// [`AccessorRegistry`] by [`MockSprite::register_accessors()`]:
/// - `x`, `y`: public float accessors,
/// - `alpha`: public double accessors,
/// - `color`: public integer accessors,
/// - `rotation`: hidden integer accessors,
/// - `visible`: public `is_visible` integer getter only.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MockSprite {
    pub x: f32,
    pub y: f32,
    pub alpha: f64,
    pub color: i32,
    pub rotation: i32,
    pub visible: bool,
}

impl MockSprite {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            alpha: 1.0,
            visible: true,
            ..Default::default()
        }
    }

    /// Registers the named accessors of the sprite properties.
    pub fn register_accessors() {
        AccessorRegistry::register_setter("set_x", |sprite: &mut MockSprite, x: f32| sprite.x = x);
        AccessorRegistry::register_getter("get_x", |sprite: &MockSprite| sprite.x);
        AccessorRegistry::register_setter("set_y", |sprite: &mut MockSprite, y: f32| sprite.y = y);
        AccessorRegistry::register_getter("get_y", |sprite: &MockSprite| sprite.y);
        AccessorRegistry::register_setter("set_alpha", |sprite: &mut MockSprite, alpha: f64| {
            sprite.alpha = alpha
        });
        AccessorRegistry::register_getter("get_alpha", |sprite: &MockSprite| sprite.alpha);
        AccessorRegistry::register_setter("set_color", |sprite: &mut MockSprite, color: i32| {
            sprite.color = color
        });
        AccessorRegistry::register_getter("get_color", |sprite: &MockSprite| sprite.color);
        AccessorRegistry::register_hidden_setter(
            "set_rotation",
            |sprite: &mut MockSprite, rotation: i32| sprite.rotation = rotation,
        );
        AccessorRegistry::register_hidden_getter("get_rotation", |sprite: &MockSprite| {
            sprite.rotation
        });
        AccessorRegistry::register_getter("is_visible", |sprite: &MockSprite| {
            i32::from(sprite.visible)
        });
    }
}

impl Display for MockSprite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MockSprite [x={}, y={}, alpha={}, color={:#010x}, rotation={}, visible={}]",
            self.x, self.y, self.alpha, self.color, self.rotation, self.visible
        )
    }
}
