use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use crate::animations::Animatable;
use crate::utils::{Value, ValueType};

/// An animation target: any object behind a shared cell.
///
/// Animators only ever borrow the target for the duration of a single read or write.
pub type Target = Rc<RefCell<dyn Any>>;

/// Wraps an object into an animation [`Target`].
pub fn target<T: Any>(object: T) -> Target {
    Rc::new(RefCell::new(object))
}

/// A capability to read and write a named property on a target.
///
/// Properties are the strongly typed alternative to the name based accessors of the
/// [`AccessorRegistry`](crate::animations::AccessorRegistry): when a holder is given a property,
/// it never looks up accessors by name.
pub trait Property {
    /// The name of the property.
    fn get_name(&self) -> &str;
    /// The type of values the property holds.
    fn get_value_type(&self) -> ValueType;
    /// Reads the property on the target; `None` when the target is not of a supported type.
    fn get(&self, target: &dyn Any) -> Option<Value>;
    /// Writes the property on the target (no-op on unsupported targets or read-only properties).
    fn set(&self, target: &mut dyn Any, value: &Value);
    /// Indicates whether the property can only be read.
    fn is_read_only(&self) -> bool {
        false
    }
}

/// A [`Property`] of a concrete target type `T` holding values of type `V`, built from closures.
///
/// # Example
/// ```
/// use frameflow::animations::{Property, TypedProperty};
/// use frameflow::utils::Value;
///
/// #[derive(Default)]
/// struct Sprite { x: f32 }
///
/// let property = TypedProperty::new("x", |sprite: &Sprite| sprite.x)
///     .with_setter(|sprite: &mut Sprite, x: f32| sprite.x = x);
///
/// let mut sprite = Sprite::default();
/// property.set(&mut sprite, &Value::Float(12.5));
/// assert_eq!(property.get(&sprite), Some(Value::Float(12.5)));
/// ```
pub struct TypedProperty<T, V> {
    name: String,
    getter: Box<dyn Fn(&T) -> V>,
    setter: Option<Box<dyn Fn(&mut T, V)>>,
}

/// An integer property.
pub type IntProperty<T> = TypedProperty<T, i32>;
/// A float property.
pub type FloatProperty<T> = TypedProperty<T, f32>;

impl<T: Any, V: Animatable> TypedProperty<T, V> {
    /// Creates a read-only property from its getter.
    pub fn new<S, G>(name: S, getter: G) -> Self
    where
        S: Into<String>,
        G: Fn(&T) -> V + 'static,
    {
        Self {
            name: name.into(),
            getter: Box::new(getter),
            setter: None,
        }
    }

    /// Makes the property writable.
    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut T, V) + 'static,
    {
        self.setter = Some(Box::new(setter));
        self
    }
}

impl<T: Any, V: Animatable> Property for TypedProperty<T, V> {
    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_value_type(&self) -> ValueType {
        V::value_type()
    }

    fn get(&self, target: &dyn Any) -> Option<Value> {
        target
            .downcast_ref::<T>()
            .map(|target| (self.getter)(target).to_value())
    }

    fn set(&self, target: &mut dyn Any, value: &Value) {
        if let (Some(setter), Some(target)) = (&self.setter, target.downcast_mut::<T>()) {
            setter(target, V::from_value(&value.convert(V::value_type())))
        }
    }

    fn is_read_only(&self) -> bool {
        self.setter.is_none()
    }
}

impl<T, V> Debug for TypedProperty<T, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TypedProperty [name={}, target={}, value={}]",
            self.name,
            type_name::<T>(),
            type_name::<V>()
        )
    }
}
