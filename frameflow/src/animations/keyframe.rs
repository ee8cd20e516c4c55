use std::fmt::{Debug, Display, Formatter};

use crate::animations::Easing;
use crate::utils::{Value, ValueType};

/// Types that keyframes can hold and animators can interpolate natively.
///
/// The numeric implementations (`i32`, `f32`, `f64`) let keyframe sets interpolate without
/// converting every frame to a [`Value`]; [`Value`] itself is the generic, type-erased variant.
pub trait Animatable: Clone + Debug + Default + 'static {
    /// The [`ValueType`] matching this Rust type.
    fn value_type() -> ValueType;
    /// Converts a native value into a [`Value`].
    fn to_value(&self) -> Value;
    /// Converts a [`Value`] back into the native type (lossy).
    fn from_value(value: &Value) -> Self;
    /// Native interpolation used when no evaluator is attached.
    fn lerp(start: &Self, end: &Self, fraction: f32) -> Self;
}

impl Animatable for i32 {
    fn value_type() -> ValueType {
        ValueType::Integer
    }
    fn to_value(&self) -> Value {
        Value::Integer(*self)
    }
    fn from_value(value: &Value) -> Self {
        value.as_integer()
    }
    /// Truncates toward zero. Results beyond the `i32` range saturate.
    fn lerp(start: &Self, end: &Self, fraction: f32) -> Self {
        let delta = (i64::from(*end) - i64::from(*start)) as f32;
        let value = i64::from(*start) + (fraction * delta) as i64;
        value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

impl Animatable for f32 {
    fn value_type() -> ValueType {
        ValueType::Float
    }
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
    fn from_value(value: &Value) -> Self {
        value.as_float()
    }
    fn lerp(start: &Self, end: &Self, fraction: f32) -> Self {
        start + fraction * (end - start)
    }
}

impl Animatable for f64 {
    fn value_type() -> ValueType {
        ValueType::Double
    }
    fn to_value(&self) -> Value {
        Value::Double(*self)
    }
    fn from_value(value: &Value) -> Self {
        value.as_double()
    }
    fn lerp(start: &Self, end: &Self, fraction: f32) -> Self {
        start + f64::from(fraction) * (end - start)
    }
}

impl Animatable for Value {
    fn value_type() -> ValueType {
        ValueType::Object
    }
    fn to_value(&self) -> Value {
        self.clone()
    }
    fn from_value(value: &Value) -> Self {
        value.clone()
    }
    /// Numbers of the same kind are interpolated, anything else steps to the end value once the
    /// fraction reaches 1.
    fn lerp(start: &Self, end: &Self, fraction: f32) -> Self {
        match (start, end) {
            (Value::Integer(a), Value::Integer(b)) => Value::Integer(i32::lerp(a, b, fraction)),
            (Value::Float(a), Value::Float(b)) => Value::Float(f32::lerp(a, b, fraction)),
            (Value::Double(a), Value::Double(b)) => Value::Double(f64::lerp(a, b, fraction)),
            _ => match fraction < 1.0 {
                true => start.clone(),
                false => end.clone(),
            },
        }
    }
}

/// Represents a keyframe: a value anchored at a given fraction (0 to 1) of an animation.
///
/// A keyframe may be created without a value: it is then filled from the target's current
/// property value when the animation gets bound to a target (see
/// [`PropertyValuesHolder::setup_setter_and_getter()`](crate::animations::PropertyValuesHolder::setup_setter_and_getter)).
///
/// The optional `easing` of a keyframe applies to the interval that ends at this keyframe.
///
/// # Example
/// ```
/// use frameflow::animations::{Easing, Keyframe};
///
/// let start = Keyframe::of_float(0.0, 10.0);
/// let middle = Keyframe::of_float(0.5, 100.0).set_easing(Easing::QuadOut);
/// let end = Keyframe::<f32>::empty(1.0);
/// assert!(!end.has_value());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<V> {
    /// The fraction (0 to 1) of the animation this keyframe is anchored at.
    fraction: f32,
    /// The value of the keyframe, `None` until known.
    value: Option<V>,
    /// The easing applied to the interval ending at this keyframe.
    easing: Option<Easing>,
}

/// A keyframe holding an integer.
pub type IntKeyframe = Keyframe<i32>;
/// A keyframe holding a float.
pub type FloatKeyframe = Keyframe<f32>;
/// A keyframe holding any [`Value`].
pub type ObjectKeyframe = Keyframe<Value>;

impl<V: Animatable> Keyframe<V> {
    /// Creates a keyframe with a value.
    pub fn new(fraction: f32, value: V) -> Self {
        Self {
            fraction,
            value: Some(value),
            easing: None,
        }
    }

    /// Creates a keyframe without a value: it will be obtained from the target when the
    /// animation is bound.
    pub fn empty(fraction: f32) -> Self {
        Self {
            fraction,
            value: None,
            easing: None,
        }
    }

    /// Indicates whether the keyframe holds a value.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Returns the value of the keyframe, if any.
    pub fn get_value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Returns the value of the keyframe or the type default when the value is unknown.
    pub fn get_value_or_default(&self) -> V {
        self.value.clone().unwrap_or_default()
    }

    /// Sets the value of the keyframe.
    pub fn set_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn replace_value(&mut self, value: V) {
        self.value = Some(value);
    }

    pub fn get_fraction(&self) -> f32 {
        self.fraction
    }

    pub fn set_fraction(mut self, fraction: f32) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn get_easing(&self) -> Option<Easing> {
        self.easing
    }

    /// Sets the easing applied to the interval ending at this keyframe.
    pub fn set_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Returns the [`ValueType`] of the keyframe.
    pub fn get_type(&self) -> ValueType {
        V::value_type()
    }
}

impl Keyframe<i32> {
    pub fn of_int(fraction: f32, value: i32) -> Self {
        Self::new(fraction, value)
    }
}

impl Keyframe<f32> {
    pub fn of_float(fraction: f32, value: f32) -> Self {
        Self::new(fraction, value)
    }
}

impl Keyframe<Value> {
    pub fn of_object<T: Into<Value>>(fraction: f32, value: T) -> Self {
        Self::new(fraction, value.into())
    }
}

impl<V: Animatable> Display for Keyframe<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            None => String::from("?"),
            Some(value) => value.to_value().to_string(),
        };
        write!(
            f,
            "Keyframe at {}: {} [easing={:?}]",
            self.fraction, value, self.easing
        )
    }
}
