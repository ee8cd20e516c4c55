use crate::animations::Animatable;
use crate::utils::Value;

/// An interpolation rule between two values of the same type.
///
/// Evaluators are used by keyframe sets to compute the animated value between two keyframes.
/// Any `Fn(f32, &Value, &Value) -> Value` closure is an evaluator.
///
/// # Example
/// ```
/// use frameflow::animations::TypeEvaluator;
/// use frameflow::utils::Value;
///
/// // Steps from one value to the next at half way.
/// let step = |fraction: f32, start: &Value, end: &Value| match fraction < 0.5 {
///     true => start.clone(),
///     false => end.clone(),
/// };
/// assert_eq!(step.evaluate(0.7, &Value::from(1), &Value::from(2)), Value::from(2));
/// ```
pub trait TypeEvaluator {
    /// Returns the result of interpolating between `start` and `end` at `fraction`.
    ///
    /// `fraction` is usually within [0, 1] but may fall outside when the easing curve over or
    /// undershoots, the evaluator is then expected to extrapolate.
    fn evaluate(&self, fraction: f32, start: &Value, end: &Value) -> Value;
}

impl<F> TypeEvaluator for F
where
    F: Fn(f32, &Value, &Value) -> Value,
{
    fn evaluate(&self, fraction: f32, start: &Value, end: &Value) -> Value {
        self(fraction, start, end)
    }
}

/// Linear interpolation between integers (truncated toward zero).
#[derive(Clone, Copy, Debug, Default)]
pub struct IntEvaluator;

impl TypeEvaluator for IntEvaluator {
    fn evaluate(&self, fraction: f32, start: &Value, end: &Value) -> Value {
        Value::Integer(i32::lerp(&start.as_integer(), &end.as_integer(), fraction))
    }
}

/// Linear interpolation between floats.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatEvaluator;

impl TypeEvaluator for FloatEvaluator {
    fn evaluate(&self, fraction: f32, start: &Value, end: &Value) -> Value {
        let start = start.as_float();
        Value::Float(start + fraction * (end.as_float() - start))
    }
}

/// Linear interpolation between doubles.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleEvaluator;

impl TypeEvaluator for DoubleEvaluator {
    fn evaluate(&self, fraction: f32, start: &Value, end: &Value) -> Value {
        let start = start.as_double();
        Value::Double(start + f64::from(fraction) * (end.as_double() - start))
    }
}

/// Per-channel interpolation between two colors packed as `0xAARRGGBB` integers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgbEvaluator;

impl TypeEvaluator for ArgbEvaluator {
    fn evaluate(&self, fraction: f32, start: &Value, end: &Value) -> Value {
        let start = start.as_integer() as u32;
        let end = end.as_integer() as u32;
        let color = (0..4).fold(0u32, |color, channel| {
            let shift = channel * 8;
            let from = ((start >> shift) & 0xff) as i32;
            let to = ((end >> shift) & 0xff) as i32;
            let value = from + (fraction * (to - from) as f32) as i32;
            color | ((value.clamp(0, 255) as u32) << shift)
        });
        Value::Integer(color as i32)
    }
}
