use std::cell::OnceCell;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use log::warn;

use crate::animations::{Animatable, Easing, Keyframe, TypeEvaluator};
use crate::utils::Value;

/// An ordered set of [`Keyframe`]s able to compute the value at any fraction of an animation.
///
/// The set is generic over the keyframe value type: `KeyframeSet<i32>` and `KeyframeSet<f32>`
/// interpolate natively without converting to [`Value`] unless a custom evaluator is attached.
///
/// A set always holds at least two keyframes: constructors pad a single value with an empty
/// leading keyframe whose value is obtained from the target later on.
///
/// # Example
/// ```
/// use frameflow::animations::KeyframeSet;
///
/// let keyframes = KeyframeSet::of_float(&[0.0, 100.0, 50.0]);
/// assert_eq!(keyframes.value_at(0.25), 50.0);
/// assert_eq!(keyframes.value_at(0.5), 100.0);
/// assert_eq!(keyframes.value_at(1.0), 50.0);
/// ```
#[derive(Clone)]
pub struct KeyframeSet<V: Animatable> {
    keyframes: Vec<Keyframe<V>>,
    evaluator: Option<Rc<dyn TypeEvaluator>>,

    // ########################################
    // # Volatile utility data.
    /// First and last values, cached for the two-keyframes fast path.
    bounds: OnceCell<(V, V)>,
}

/// A keyframe set of integers.
pub type IntKeyframeSet = KeyframeSet<i32>;
/// A keyframe set of floats.
pub type FloatKeyframeSet = KeyframeSet<f32>;
/// A keyframe set of any [`Value`].
pub type ObjectKeyframeSet = KeyframeSet<Value>;

impl<V: Animatable> KeyframeSet<V> {
    /// Creates a set from the given values, evenly distributed over the [0, 1] fraction range.
    ///
    /// A single value creates an empty start keyframe followed by that value. No value at all
    /// creates two empty keyframes.
    pub fn of_values(values: &[V]) -> Self {
        let keyframes = match values.len() {
            0 => vec![Keyframe::empty(0.0), Keyframe::empty(1.0)],
            1 => vec![Keyframe::empty(0.0), Keyframe::new(1.0, values[0].clone())],
            count => values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    Keyframe::new(index as f32 / (count - 1) as f32, value.clone())
                })
                .collect(),
        };
        Self::of_keyframes(keyframes)
    }

    /// Creates a set from explicit keyframes.
    ///
    /// A single keyframe is completed as follow: if it sits at fraction 1 an empty start keyframe
    /// is added before it; otherwise an empty end keyframe is added after it.
    pub fn of_keyframes(mut keyframes: Vec<Keyframe<V>>) -> Self {
        match keyframes.len() {
            0 => keyframes = vec![Keyframe::empty(0.0), Keyframe::empty(1.0)],
            1 if keyframes[0].get_fraction() >= 1.0 => keyframes.insert(0, Keyframe::empty(0.0)),
            1 => keyframes.push(Keyframe::empty(1.0)),
            _ => (),
        }
        Self {
            keyframes,
            evaluator: None,
            bounds: OnceCell::new(),
        }
    }

    /// Returns the keyframes of the set.
    pub fn get_keyframes(&self) -> &Vec<Keyframe<V>> {
        &self.keyframes
    }

    /// Returns the easing of the whole set: the easing of its last keyframe.
    pub fn get_easing(&self) -> Option<Easing> {
        self.keyframes.last().and_then(|keyframe| keyframe.get_easing())
    }

    pub fn get_evaluator(&self) -> Option<Rc<dyn TypeEvaluator>> {
        self.evaluator.clone()
    }

    /// Sets the evaluator used to interpolate between keyframes. Without evaluator, the native
    /// [`Animatable::lerp()`] of the value type is used.
    pub fn set_evaluator(&mut self, evaluator: Option<Rc<dyn TypeEvaluator>>) {
        self.evaluator = evaluator;
    }

    /// Indicates whether some keyframes are still waiting for a value.
    pub fn has_missing_values(&self) -> bool {
        self.keyframes.iter().any(|keyframe| !keyframe.has_value())
    }

    /// Gives the provided value to every keyframe lacking one.
    pub fn fill_missing_values(&mut self, value: &V) {
        for keyframe in self.keyframes.iter_mut().filter(|kf| !kf.has_value()) {
            keyframe.replace_value(value.clone());
        }
        self.bounds = OnceCell::new();
    }

    /// Overrides the value of the first keyframe.
    pub fn set_first_value(&mut self, value: V) {
        if let Some(keyframe) = self.keyframes.first_mut() {
            keyframe.replace_value(value);
        }
        self.bounds = OnceCell::new();
    }

    /// Overrides the value of the last keyframe.
    pub fn set_last_value(&mut self, value: V) {
        if let Some(keyframe) = self.keyframes.last_mut() {
            keyframe.replace_value(value);
        }
        self.bounds = OnceCell::new();
    }

    /// Computes the animated value at the given fraction.
    ///
    /// Fractions below 0 or above 1 are extrapolated using the first or last interval.
    pub fn value_at(&self, fraction: f32) -> V {
        let count = self.keyframes.len();

        // Fast path: a single interval and its cached bounds.
        if count == 2 {
            let (first, last) = self.bounds.get_or_init(|| {
                (
                    self.keyframes[0].get_value_or_default(),
                    self.keyframes[1].get_value_or_default(),
                )
            });
            let fraction = match self.get_easing() {
                None => fraction,
                Some(easing) => easing.call(fraction),
            };
            return self.interpolate(fraction, first, last);
        }

        if fraction <= 0.0 {
            return self.interpolate_interval(&self.keyframes[0], &self.keyframes[1], fraction);
        }
        if fraction >= 1.0 {
            return self.interpolate_interval(
                &self.keyframes[count - 2],
                &self.keyframes[count - 1],
                fraction,
            );
        }

        let mut previous = &self.keyframes[0];
        for next in &self.keyframes[1..] {
            if fraction < next.get_fraction() {
                return self.interpolate_interval(previous, next, fraction);
            }
            previous = next;
        }

        // Only reachable with non-monotonic fractions.
        self.keyframes[count - 1].get_value_or_default()
    }

    /// Interpolates inside the interval [previous, next] using the easing of `next`.
    fn interpolate_interval(&self, previous: &Keyframe<V>, next: &Keyframe<V>, fraction: f32) -> V {
        let fraction = match next.get_easing() {
            None => fraction,
            Some(easing) => easing.call(fraction),
        };
        let span = next.get_fraction() - previous.get_fraction();
        let interval_fraction = match span == 0.0 {
            true => 1.0,
            false => (fraction - previous.get_fraction()) / span,
        };
        self.interpolate(
            interval_fraction,
            &previous.get_value_or_default(),
            &next.get_value_or_default(),
        )
    }

    fn interpolate(&self, fraction: f32, start: &V, end: &V) -> V {
        match &self.evaluator {
            None => V::lerp(start, end, fraction),
            Some(evaluator) => {
                V::from_value(&evaluator.evaluate(fraction, &start.to_value(), &end.to_value()))
            }
        }
    }
}

impl KeyframeSet<i32> {
    /// Creates an integer set from the given values.
    pub fn of_int(values: &[i32]) -> Self {
        Self::of_values(values)
    }
}

impl KeyframeSet<f32> {
    /// Creates a float set from the given values.
    ///
    /// `NaN` values are accepted but reported as a warning.
    pub fn of_float(values: &[f32]) -> Self {
        if values.iter().any(|value| value.is_nan()) {
            warn!("Bad value (NaN) in float animator");
        }
        Self::of_values(values)
    }
}

impl KeyframeSet<Value> {
    /// Creates a generic set from the given values.
    pub fn of_object<T: Into<Value>>(values: Vec<T>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::of_values(&values)
    }
}

impl<V: Animatable> Debug for KeyframeSet<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyframeSet")
            .field("keyframes", &self.keyframes)
            .field("evaluator", &self.evaluator.is_some())
            .finish()
    }
}

impl<V: Animatable> Display for KeyframeSet<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let values = self
            .keyframes
            .iter()
            .map(|keyframe| match keyframe.get_value() {
                None => String::from("?"),
                Some(value) => value.to_value().to_string(),
            })
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "KeyframeSet: {} keyframes [{}]", self.keyframes.len(), values)
    }
}

#[cfg(test)]
mod tests {
    use crate::animations::{ArgbEvaluator, FloatEvaluator, IntEvaluator};

    use super::*;

    #[test]
    fn test_of_values_distribution() {
        let set = KeyframeSet::of_int(&[0, 10, 20, 30, 40]);
        let fractions: Vec<f32> = set.get_keyframes().iter().map(|kf| kf.get_fraction()).collect();
        assert_eq!(fractions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        let set = KeyframeSet::of_int(&[42]);
        assert_eq!(set.get_keyframes().len(), 2, "A single value is padded.");
        assert!(!set.get_keyframes()[0].has_value());
        assert_eq!(set.get_keyframes()[1].get_value(), Some(&42));
        assert!(set.has_missing_values());

        let set = KeyframeSet::<f32>::of_values(&[]);
        assert_eq!(set.get_keyframes().len(), 2);
        assert_eq!(set.value_at(0.5), 0.0);
    }

    #[test]
    fn test_of_single_keyframe() {
        let set = KeyframeSet::of_keyframes(vec![Keyframe::of_int(1.0, 5)]);
        assert_eq!(set.get_keyframes()[0].get_fraction(), 0.0);
        assert!(!set.get_keyframes()[0].has_value());

        let set = KeyframeSet::of_keyframes(vec![Keyframe::of_int(0.0, 5)]);
        assert_eq!(set.get_keyframes()[1].get_fraction(), 1.0);
        assert!(!set.get_keyframes()[1].has_value());
    }

    #[test]
    fn test_exact_values_at_keyframes() {
        let set = KeyframeSet::of_keyframes(vec![
            Keyframe::of_int(0.0, 3),
            Keyframe::of_int(0.1, -40),
            Keyframe::of_int(0.35, 17),
            Keyframe::of_int(0.8, 999),
            Keyframe::of_int(1.0, 12),
        ]);
        for keyframe in set.get_keyframes() {
            assert_eq!(
                set.value_at(keyframe.get_fraction()),
                *keyframe.get_value().unwrap(),
                "Value at fraction {} is the keyframe value.",
                keyframe.get_fraction()
            );
        }

        let set = KeyframeSet::of_float(&[1.5, -2.25, 8.0]);
        assert_eq!(set.value_at(0.0), 1.5);
        assert_eq!(set.value_at(0.5), -2.25);
        assert_eq!(set.value_at(1.0), 8.0);
    }

    #[test]
    fn test_two_keyframes_fast_path() {
        let set = KeyframeSet::of_int(&[0, 100]);
        assert_eq!(set.value_at(0.0), 0);
        assert_eq!(set.value_at(0.333), 33, "Integers truncate toward zero.");
        assert_eq!(set.value_at(1.0), 100);
        assert_eq!(set.value_at(1.5), 150, "Extrapolates beyond 1.");
        assert_eq!(set.value_at(-0.5), -50, "Extrapolates below 0.");

        let set = KeyframeSet::of_keyframes(vec![
            Keyframe::of_float(0.0, 0.0),
            Keyframe::of_float(1.0, 1.0).set_easing(Easing::Accelerate),
        ]);
        assert_eq!(set.get_easing(), Some(Easing::Accelerate));
        assert_eq!(set.value_at(0.5), 0.25, "The set easing is applied.");
    }

    #[test]
    fn test_wide_int_range() {
        let set = KeyframeSet::of_int(&[-2_000_000_000, 2_000_000_000]);
        assert_eq!(set.value_at(0.0), -2_000_000_000);
        assert_eq!(set.value_at(0.5), 0);
        assert_eq!(set.value_at(1.0), 2_000_000_000);
        assert_eq!(set.value_at(2.0), i32::MAX, "Saturates beyond the i32 range.");

        let set = KeyframeSet::of_int(&[i32::MIN, 0, i32::MAX]);
        assert_eq!(set.value_at(0.0), i32::MIN);
        assert_eq!(set.value_at(1.0), i32::MAX);

        let mut set = KeyframeSet::of_int(&[-2_000_000_000, 2_000_000_000]);
        set.set_evaluator(Some(Rc::new(IntEvaluator)));
        assert_eq!(set.value_at(0.5), 0);
    }

    #[test]
    fn test_nan_float_values() {
        let set = KeyframeSet::of_float(&[0.0, f32::NAN, 1.0]);
        assert_eq!(set.keyframes.len(), 3);
        assert!(set.value_at(0.25).is_nan());
        assert!(set.value_at(0.75).is_nan());

        let set = KeyframeSet::of_float(&[0.0, 1.0, f32::NAN]);
        assert_eq!(set.value_at(0.25), 0.5, "Segments without NaN still interpolate.");
        assert!(set.value_at(1.0).is_nan());
    }

    #[test]
    fn test_edge_intervals_extrapolate() {
        let set = KeyframeSet::of_float(&[0.0, 10.0, 30.0]);
        assert_eq!(set.value_at(-0.5), -10.0, "Uses the first interval below 0.");
        assert_eq!(set.value_at(1.5), 50.0, "Uses the last interval above 1.");
    }

    #[test]
    fn test_interval_easing_is_taken_from_next_keyframe() {
        let set = KeyframeSet::of_keyframes(vec![
            Keyframe::of_float(0.0, 0.0),
            Keyframe::of_float(0.5, 100.0).set_easing(Easing::Custom(|_| 0.25)),
            Keyframe::of_float(1.0, 200.0),
        ]);
        // Eased fraction 0.25 lies in the first interval at half way.
        assert_eq!(set.value_at(0.1), 50.0);
        // No easing on the last keyframe: linear.
        assert_eq!(set.value_at(0.75), 150.0);
    }

    #[test]
    fn test_monotonic_values() {
        let int_set = KeyframeSet::of_int(&[-50, 0, 10, 300, 301]);
        let float_set = KeyframeSet::of_float(&[-1.0, 0.0, 0.5, 2.0]);
        let mut previous_int = i32::MIN;
        let mut previous_float = f32::MIN;
        for step in 0..=200 {
            let fraction = step as f32 / 200.0;
            let int_value = int_set.value_at(fraction);
            let float_value = float_set.value_at(fraction);
            assert!(int_value >= previous_int, "Int values are monotonic.");
            assert!(float_value >= previous_float, "Float values are monotonic.");
            previous_int = int_value;
            previous_float = float_value;
        }
    }

    #[test]
    fn test_evaluator() {
        let mut set = KeyframeSet::of_int(&[0xff000000u32 as i32, 0xffffffffu32 as i32]);
        set.set_evaluator(Some(Rc::new(ArgbEvaluator)));
        assert_eq!(set.value_at(0.5), 0xff7f7f7fu32 as i32);

        let mut set = KeyframeSet::of_object(vec![0.0f32, 4.0f32]);
        assert_eq!(set.value_at(0.5), Value::Float(2.0));
        set.set_evaluator(Some(Rc::new(FloatEvaluator)));
        assert_eq!(set.value_at(0.25), Value::Float(1.0));
        assert!(set.get_evaluator().is_some());
    }

    #[test]
    fn test_fill_missing_values_resets_cache() {
        let mut set = KeyframeSet::of_int(&[100]);
        assert_eq!(set.value_at(0.5), 50, "Missing start is read as the default value.");

        set.fill_missing_values(&50);
        assert!(!set.has_missing_values());
        assert_eq!(set.value_at(0.5), 75, "Cached bounds are refreshed.");

        set.set_first_value(0);
        set.set_last_value(10);
        assert_eq!(set.value_at(0.5), 5);
    }

    #[test]
    fn test_clone_independence() {
        let original = KeyframeSet::of_float(&[0.0, 10.0, 20.0]);
        let mut clone = original.clone();
        clone.set_first_value(-100.0);
        clone.set_last_value(100.0);

        assert_eq!(original.value_at(0.0), 0.0);
        assert_eq!(original.value_at(0.25), 5.0);
        assert_eq!(original.value_at(1.0), 20.0);
        assert_eq!(clone.value_at(0.0), -100.0);
    }

    #[test]
    fn test_display() {
        let set = KeyframeSet::of_int(&[7]);
        assert_eq!(set.to_string(), "KeyframeSet: 2 keyframes [?, 7]");
    }
}
