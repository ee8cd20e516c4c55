use std::any::{Any, TypeId};
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use log::debug;

use crate::animations::accessor::{Getter, Setter};
use crate::animations::{
    AccessorRegistry, Animatable, FloatEvaluator, IntEvaluator, Keyframe, KeyframeSet, Property,
    Target, TypeEvaluator,
};
use crate::utils::{Value, ValueType};

/// The keyframe set of a holder, specialized by value type.
#[derive(Clone, Debug)]
pub enum Keyframes {
    Int(KeyframeSet<i32>),
    Float(KeyframeSet<f32>),
    Object(KeyframeSet<Value>),
}

impl Keyframes {
    /// Returns the value at the given fraction.
    pub fn value_at(&self, fraction: f32) -> Value {
        match self {
            Keyframes::Int(set) => Value::Integer(set.value_at(fraction)),
            Keyframes::Float(set) => Value::Float(set.value_at(fraction)),
            Keyframes::Object(set) => set.value_at(fraction),
        }
    }

    /// The type of values held: generic keyframes report the type of their first known value.
    pub fn get_value_type(&self) -> ValueType {
        match self {
            Keyframes::Int(_) => ValueType::Integer,
            Keyframes::Float(_) => ValueType::Float,
            Keyframes::Object(set) => set
                .get_keyframes()
                .iter()
                .find_map(|keyframe| keyframe.get_value().map(Value::get_type))
                .unwrap_or(ValueType::Object),
        }
    }

    pub fn get_evaluator(&self) -> Option<Rc<dyn TypeEvaluator>> {
        match self {
            Keyframes::Int(set) => set.get_evaluator(),
            Keyframes::Float(set) => set.get_evaluator(),
            Keyframes::Object(set) => set.get_evaluator(),
        }
    }

    pub fn set_evaluator(&mut self, evaluator: Option<Rc<dyn TypeEvaluator>>) {
        match self {
            Keyframes::Int(set) => set.set_evaluator(evaluator),
            Keyframes::Float(set) => set.set_evaluator(evaluator),
            Keyframes::Object(set) => set.set_evaluator(evaluator),
        }
    }

    pub fn has_missing_values(&self) -> bool {
        match self {
            Keyframes::Int(set) => set.has_missing_values(),
            Keyframes::Float(set) => set.has_missing_values(),
            Keyframes::Object(set) => set.has_missing_values(),
        }
    }

    /// Fills every keyframe lacking a value with the given one (converted to the set type).
    pub fn fill_missing_values(&mut self, value: &Value) {
        match self {
            Keyframes::Int(set) => set.fill_missing_values(&i32::from_value(value)),
            Keyframes::Float(set) => set.fill_missing_values(&f32::from_value(value)),
            Keyframes::Object(set) => set.fill_missing_values(value),
        }
    }

    pub fn set_first_value(&mut self, value: &Value) {
        match self {
            Keyframes::Int(set) => set.set_first_value(i32::from_value(value)),
            Keyframes::Float(set) => set.set_first_value(f32::from_value(value)),
            Keyframes::Object(set) => set.set_first_value(value.clone()),
        }
    }

    pub fn set_last_value(&mut self, value: &Value) {
        match self {
            Keyframes::Int(set) => set.set_last_value(i32::from_value(value)),
            Keyframes::Float(set) => set.set_last_value(f32::from_value(value)),
            Keyframes::Object(set) => set.set_last_value(value.clone()),
        }
    }
}

impl From<KeyframeSet<i32>> for Keyframes {
    fn from(set: KeyframeSet<i32>) -> Self {
        Keyframes::Int(set)
    }
}

impl From<KeyframeSet<f32>> for Keyframes {
    fn from(set: KeyframeSet<f32>) -> Self {
        Keyframes::Float(set)
    }
}

impl From<KeyframeSet<Value>> for Keyframes {
    fn from(set: KeyframeSet<Value>) -> Self {
        Keyframes::Object(set)
    }
}

impl Display for Keyframes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Keyframes::Int(set) => write!(f, "{}", set),
            Keyframes::Float(set) => write!(f, "{}", set),
            Keyframes::Object(set) => write!(f, "{}", set),
        }
    }
}

/// Holds the keyframes of one property along with the means to write the animated value to a
/// target.
///
/// A holder is bound to its target property either by an explicit [`Property`] object or by
/// name, through the accessors registered in the [`AccessorRegistry`]. Binding is best-effort: a
/// property that cannot be resolved on a target is simply never written.
///
/// # Example
/// ```
/// use frameflow::animations::PropertyValuesHolder;
/// use frameflow::utils::Value;
///
/// let mut holder = PropertyValuesHolder::of_float("alpha", &[0.0, 1.0]);
/// holder.calculate_value(0.5);
/// assert_eq!(holder.get_animated_value(), &Value::Float(0.5));
/// ```
#[derive(Clone)]
pub struct PropertyValuesHolder {
    /// The name of the animated property.
    property_name: String,
    /// An explicit property: takes precedence over named accessors.
    property: Option<Rc<dyn Property>>,
    /// The keyframes of the animation.
    keyframes: Keyframes,
    /// The evaluator explicitly set on this holder.
    evaluator: Option<Rc<dyn TypeEvaluator>>,

    // ########################################
    // # Volatile utility data.
    /// The setter and getter resolved for the currently bound target type.
    setter: Option<Setter>,
    getter: Option<Getter>,
    bound_type: Option<TypeId>,
    /// The last value computed by calculate_value().
    animated_value: Value,
}

impl PropertyValuesHolder {
    fn of_set<S: Into<String>>(property_name: S, keyframes: Keyframes) -> Self {
        Self {
            property_name: property_name.into(),
            property: None,
            keyframes,
            evaluator: None,
            setter: None,
            getter: None,
            bound_type: None,
            animated_value: Value::Null,
        }
    }

    /// Creates a holder animating the named property between the given integers.
    pub fn of_int<S: Into<String>>(property_name: S, values: &[i32]) -> Self {
        Self::of_set(property_name, KeyframeSet::of_int(values).into())
    }

    /// Creates a holder animating the named property between the given floats.
    pub fn of_float<S: Into<String>>(property_name: S, values: &[f32]) -> Self {
        Self::of_set(property_name, KeyframeSet::of_float(values).into())
    }

    /// Creates a holder animating the named property between arbitrary values, interpolated by the
    /// given evaluator.
    pub fn of_object<S, E, T>(property_name: S, evaluator: E, values: Vec<T>) -> Self
    where
        S: Into<String>,
        E: TypeEvaluator + 'static,
        T: Into<Value>,
    {
        let mut holder = Self::of_values(property_name, values);
        holder.set_evaluator(evaluator);
        holder
    }

    /// Creates a holder animating the named property between arbitrary values.
    ///
    /// Without evaluator, plain numbers are interpolated and any other value steps at the end.
    pub fn of_values<S, T>(property_name: S, values: Vec<T>) -> Self
    where
        S: Into<String>,
        T: Into<Value>,
    {
        Self::of_set(property_name, KeyframeSet::of_object(values).into())
    }

    /// Creates a holder from explicit keyframes.
    pub fn of_keyframes<S, V>(property_name: S, keyframes: Vec<Keyframe<V>>) -> Self
    where
        S: Into<String>,
        V: Animatable,
        KeyframeSet<V>: Into<Keyframes>,
    {
        Self::of_set(property_name, KeyframeSet::of_keyframes(keyframes).into())
    }

    /// Creates a holder animating the given property between the given integers.
    pub fn of_int_property<P: Property + 'static>(property: P, values: &[i32]) -> Self {
        let mut holder = Self::of_int(property.get_name().to_string(), values);
        holder.set_property(property);
        holder
    }

    /// Creates a holder animating the given property between the given floats.
    pub fn of_float_property<P: Property + 'static>(property: P, values: &[f32]) -> Self {
        let mut holder = Self::of_float(property.get_name().to_string(), values);
        holder.set_property(property);
        holder
    }

    /// Creates a holder animating the given property between arbitrary values.
    pub fn of_object_property<P, E, T>(property: P, evaluator: E, values: Vec<T>) -> Self
    where
        P: Property + 'static,
        E: TypeEvaluator + 'static,
        T: Into<Value>,
    {
        let mut holder = Self::of_object(property.get_name().to_string(), evaluator, values);
        holder.set_property(property);
        holder
    }

    /// Creates a holder animating the given property through explicit keyframes.
    pub fn of_property_keyframes<P, V>(property: P, keyframes: Vec<Keyframe<V>>) -> Self
    where
        P: Property + 'static,
        V: Animatable,
        KeyframeSet<V>: Into<Keyframes>,
    {
        let mut holder = Self::of_keyframes(property.get_name().to_string(), keyframes);
        holder.set_property(property);
        holder
    }

    // ########################################
    // Setters and Getters.

    pub fn get_property_name(&self) -> &str {
        &self.property_name
    }

    /// Renames the animated property: any previous binding is dropped.
    pub fn set_property_name<S: Into<String>>(&mut self, property_name: S) {
        self.property_name = property_name.into();
        self.unbind();
    }

    /// Binds this holder to an explicit property.
    pub fn set_property<P: Property + 'static>(&mut self, property: P) {
        self.property_name = property.get_name().to_string();
        self.property = Some(Rc::new(property));
    }

    pub fn get_keyframes(&self) -> &Keyframes {
        &self.keyframes
    }

    /// Replaces the keyframes by the given integers, evenly distributed.
    pub fn set_int_values(&mut self, values: &[i32]) {
        self.replace_keyframes(KeyframeSet::of_int(values).into());
    }

    /// Replaces the keyframes by the given floats, evenly distributed.
    pub fn set_float_values(&mut self, values: &[f32]) {
        self.replace_keyframes(KeyframeSet::of_float(values).into());
    }

    /// Replaces the keyframes by the given values, evenly distributed.
    pub fn set_object_values<T: Into<Value>>(&mut self, values: Vec<T>) {
        self.replace_keyframes(KeyframeSet::of_object(values).into());
    }

    /// Replaces the keyframes by the given ones.
    pub fn set_keyframes<V>(&mut self, keyframes: Vec<Keyframe<V>>)
    where
        V: Animatable,
        KeyframeSet<V>: Into<Keyframes>,
    {
        self.replace_keyframes(KeyframeSet::of_keyframes(keyframes).into());
    }

    fn replace_keyframes(&mut self, keyframes: Keyframes) {
        self.keyframes = keyframes;
        if let Some(evaluator) = &self.evaluator {
            self.keyframes.set_evaluator(Some(evaluator.clone()));
        }
        // The value type may differ: accessors must be resolved again.
        self.unbind();
    }

    pub fn get_evaluator(&self) -> Option<Rc<dyn TypeEvaluator>> {
        self.evaluator.clone()
    }

    /// Sets the evaluator used to compute values between keyframes.
    pub fn set_evaluator<E: TypeEvaluator + 'static>(&mut self, evaluator: E) {
        let evaluator: Rc<dyn TypeEvaluator> = Rc::new(evaluator);
        self.keyframes.set_evaluator(Some(evaluator.clone()));
        self.evaluator = Some(evaluator);
    }

    /// Returns the value computed by the last call to [`Self::calculate_value()`].
    pub fn get_animated_value(&self) -> &Value {
        &self.animated_value
    }

    pub fn get_value_type(&self) -> ValueType {
        match &self.property {
            Some(property) => property.get_value_type(),
            None => self.keyframes.get_value_type(),
        }
    }

    // ########################################
    // Animation lifecycle.

    /// Prepares the holder before its animation starts.
    ///
    /// Generic keyframes holding plain numbers get a default numeric evaluator when none was given.
    pub fn init(&mut self) {
        if self.keyframes.get_evaluator().is_some() {
            return;
        }
        if let Keyframes::Object(_) = &self.keyframes {
            let evaluator: Option<Rc<dyn TypeEvaluator>> = match self.keyframes.get_value_type() {
                ValueType::Integer => Some(Rc::new(IntEvaluator)),
                ValueType::Float => Some(Rc::new(FloatEvaluator)),
                _ => None,
            };
            self.keyframes.set_evaluator(evaluator);
        }
    }

    /// Computes (and stores) the animated value at the given fraction.
    pub fn calculate_value(&mut self, fraction: f32) {
        self.animated_value = self.keyframes.value_at(fraction);
    }

    /// Binds the holder to the target type and gives the target's current property value to every
    /// keyframe lacking one.
    pub fn setup_setter_and_getter(&mut self, target: &Target) {
        let Ok(guard) = target.try_borrow() else {
            debug!("Target of '{}' is busy: binding skipped", self.property_name);
            return;
        };
        let target: &dyn Any = &*guard;
        let current = self.read(target);
        if let Some(current) = current {
            if self.keyframes.has_missing_values() {
                self.keyframes.fill_missing_values(&current);
            }
        }
    }

    /// Overrides the first keyframe with the target's current property value.
    pub fn setup_start_value(&mut self, target: &Target) {
        if let Some(current) = self.read_target(target) {
            self.keyframes.set_first_value(&current);
        }
    }

    /// Overrides the last keyframe with the target's current property value.
    pub fn setup_end_value(&mut self, target: &Target) {
        if let Some(current) = self.read_target(target) {
            self.keyframes.set_last_value(&current);
        }
    }

    /// Writes the last animated value on the target property.
    pub fn set_animated_value(&self, target: &Target) {
        let Ok(mut guard) = target.try_borrow_mut() else {
            debug!("Target of '{}' is busy: value skipped", self.property_name);
            return;
        };
        let target: &mut dyn Any = &mut *guard;
        match (&self.property, &self.setter) {
            (Some(property), _) => property.set(target, &self.animated_value),
            (None, Some(setter)) => setter.set(target, &self.animated_value),
            (None, None) => (),
        }
    }

    fn read_target(&mut self, target: &Target) -> Option<Value> {
        let guard = target.try_borrow().ok()?;
        let target: &dyn Any = &*guard;
        self.read(target)
    }

    /// Reads the current property value on the target, resolving the accessors if needed.
    fn read(&mut self, target: &dyn Any) -> Option<Value> {
        if let Some(property) = &self.property {
            match property.get(target) {
                Some(value) => return Some(value),
                None => {
                    debug!(
                        "Property '{}' cannot be read on this target: falling back to named accessors",
                        self.property_name
                    );
                    self.property = None;
                }
            }
        }
        self.bind(target.type_id());
        match &self.getter {
            Some(getter) => getter.get(target),
            None => None,
        }
    }

    /// Resolves the named accessors for the given target type.
    fn bind(&mut self, type_id: TypeId) {
        if self.bound_type == Some(type_id) {
            return;
        }
        let value_type = self.keyframes.get_value_type();
        self.setter = AccessorRegistry::resolve_setter(type_id, &self.property_name, value_type);
        self.getter = AccessorRegistry::resolve_getter(type_id, &self.property_name);
        if self.setter.is_none() {
            debug!(
                "No setter found for property '{}' ({}): values will not be written",
                self.property_name, value_type
            );
        }
        self.bound_type = Some(type_id);
    }

    fn unbind(&mut self) {
        self.setter = None;
        self.getter = None;
        self.bound_type = None;
    }
}

impl Debug for PropertyValuesHolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyValuesHolder")
            .field("property_name", &self.property_name)
            .field("property", &self.property.is_some())
            .field("keyframes", &self.keyframes)
            .field("setter", &self.setter)
            .field("animated_value", &self.animated_value)
            .finish()
    }
}

impl Display for PropertyValuesHolder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.property_name, self.keyframes)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::animations::{ArgbEvaluator, TypedProperty};
    use crate::mocks::sprite::MockSprite;

    use super::*;

    fn sprite_target() -> (Rc<RefCell<MockSprite>>, Target) {
        let sprite = Rc::new(RefCell::new(MockSprite::default()));
        let target: Target = sprite.clone();
        (sprite, target)
    }

    #[test]
    fn test_calculate_value() {
        let mut holder = PropertyValuesHolder::of_int("x", &[0, 100]);
        assert_eq!(holder.get_property_name(), "x");
        assert_eq!(holder.get_value_type(), ValueType::Integer);
        assert_eq!(holder.get_animated_value(), &Value::Null);

        holder.calculate_value(0.25);
        assert_eq!(holder.get_animated_value(), &Value::Integer(25));

        holder.set_float_values(&[1.0, 2.0]);
        assert_eq!(holder.get_value_type(), ValueType::Float);
        holder.calculate_value(0.5);
        assert_eq!(holder.get_animated_value(), &Value::Float(1.5));
    }

    #[test]
    fn test_object_values_and_default_evaluator() {
        let mut holder = PropertyValuesHolder::of_keyframes(
            "x",
            vec![Keyframe::of_object(0.0, 0.0f32), Keyframe::of_object(1.0, 4.0f32)],
        );
        assert_eq!(holder.get_value_type(), ValueType::Float);
        assert!(holder.get_keyframes().get_evaluator().is_none());
        holder.init();
        assert!(holder.get_keyframes().get_evaluator().is_some());
        holder.calculate_value(0.25);
        assert_eq!(holder.get_animated_value(), &Value::Float(1.0));

        let mut holder = PropertyValuesHolder::of_object(
            "color",
            ArgbEvaluator,
            vec![0xff000000u32 as i32, 0xffffffffu32 as i32],
        );
        holder.init();
        holder.calculate_value(1.0);
        assert_eq!(holder.get_animated_value(), &Value::Integer(0xffffffffu32 as i32));

        // Evaluators survive a change of values.
        holder.set_object_values(vec![0, 0x00ff00]);
        holder.calculate_value(0.5);
        assert_eq!(holder.get_animated_value(), &Value::Integer(0x007f00));
    }

    #[test]
    fn test_typed_property_binding() {
        let (sprite, target) = sprite_target();
        sprite.borrow_mut().y = 10.0;

        let property = TypedProperty::new("y", |sprite: &MockSprite| sprite.y)
            .with_setter(|sprite: &mut MockSprite, y: f32| sprite.y = y);
        let mut holder = PropertyValuesHolder::of_float_property(property, &[50.0]);
        assert_eq!(holder.get_property_name(), "y");

        holder.setup_setter_and_getter(&target);
        holder.calculate_value(0.5);
        holder.set_animated_value(&target);
        assert_eq!(sprite.borrow().y, 30.0, "The start value is read from the target.");
    }

    #[test]
    #[serial_test::serial(accessors)]
    fn test_named_binding() {
        MockSprite::register_accessors();
        let (sprite, target) = sprite_target();
        sprite.borrow_mut().alpha = 0.5;

        // A float holder writes a double property.
        let mut holder = PropertyValuesHolder::of_float("alpha", &[1.0]);
        holder.setup_setter_and_getter(&target);
        holder.calculate_value(0.0);
        assert_eq!(holder.get_animated_value(), &Value::Float(0.5));
        holder.calculate_value(1.0);
        holder.set_animated_value(&target);
        assert_eq!(sprite.borrow().alpha, 1.0);

        // Hidden integer setter, found from a float holder.
        let mut holder = PropertyValuesHolder::of_float("rotation", &[0.0, 90.0]);
        holder.setup_setter_and_getter(&target);
        holder.calculate_value(0.5);
        holder.set_animated_value(&target);
        assert_eq!(sprite.borrow().rotation, 45);
    }

    #[test]
    #[serial_test::serial(accessors)]
    fn test_missing_property_is_silent() {
        MockSprite::register_accessors();
        let (sprite, target) = sprite_target();
        let mut holder = PropertyValuesHolder::of_float("unknown", &[0.0, 1.0]);
        holder.setup_setter_and_getter(&target);
        holder.calculate_value(1.0);
        holder.set_animated_value(&target);
        assert_eq!(*sprite.borrow(), MockSprite::default());

        // A property unable to read the target falls back to named accessors.
        let property = TypedProperty::new("x", |text: &String| text.len() as f32);
        let mut holder = PropertyValuesHolder::of_float_property(property, &[8.0]);
        sprite.borrow_mut().x = 4.0;
        holder.setup_setter_and_getter(&target);
        holder.calculate_value(0.5);
        holder.set_animated_value(&target);
        assert_eq!(sprite.borrow().x, 6.0);
    }

    #[test]
    #[serial_test::serial(accessors)]
    fn test_setup_start_and_end_values() {
        MockSprite::register_accessors();
        let (sprite, target) = sprite_target();
        let mut holder = PropertyValuesHolder::of_int("color", &[0, 100]);

        sprite.borrow_mut().color = 20;
        holder.setup_start_value(&target);
        sprite.borrow_mut().color = 40;
        holder.setup_end_value(&target);

        holder.calculate_value(0.5);
        assert_eq!(holder.get_animated_value(), &Value::Integer(30));
    }

    #[test]
    fn test_busy_target_is_skipped() {
        let (sprite, target) = sprite_target();
        let property = TypedProperty::new("x", |sprite: &MockSprite| sprite.x)
            .with_setter(|sprite: &mut MockSprite, x: f32| sprite.x = x);
        let mut holder = PropertyValuesHolder::of_float_property(property, &[0.0, 10.0]);
        holder.calculate_value(1.0);

        let guard = sprite.borrow();
        holder.set_animated_value(&target);
        assert_eq!(guard.x, 0.0);
    }

    #[test]
    fn test_clone_independence() {
        let original = PropertyValuesHolder::of_int("x", &[0, 10]);
        let mut copy = original.clone();
        copy.set_int_values(&[100, 200]);
        copy.calculate_value(0.5);

        let mut original = original;
        original.calculate_value(0.5);
        assert_eq!(original.get_animated_value(), &Value::Integer(5));
        assert_eq!(copy.get_animated_value(), &Value::Integer(150));
    }

    #[test]
    fn test_display() {
        let holder = PropertyValuesHolder::of_int("x", &[1, 2]);
        assert_eq!(holder.to_string(), "x: KeyframeSet: 2 keyframes [1, 2]");
        assert!(format!("{:?}", holder).contains("property_name: \"x\""));
    }
}
