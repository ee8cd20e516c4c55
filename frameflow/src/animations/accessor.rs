//! Name-based property accessors.
//!
//! Rust has no runtime reflection: types opt-in by registering named getter/setter functions in
//! the process-wide [`AccessorRegistry`]. Property holders animating a property by name look up
//! `set_<name>` and `get_<name>` (or `is_<name>`) there, trying compatible numeric types and
//! falling back from public to hidden registrations.
//!
//! Resolutions are memoized per `(target type, property name)` behind read/write locks so that the
//! discovery cost is paid once per process.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};

use log::{debug, trace};
use parking_lot::RwLock;

use crate::animations::Animatable;
use crate::utils::{Value, ValueType};

type SetterFn = Arc<dyn Fn(&mut dyn Any, &Value) + Send + Sync>;
type GetterFn = Arc<dyn Fn(&dyn Any) -> Option<Value> + Send + Sync>;
type AccessorKey = (TypeId, String);

/// The visibility of a registered accessor.
///
/// Lookups always prefer public accessors and only fall back to hidden ones when no public accessor
/// matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Hidden,
}

/// A registered setter: writes a [`Value`] of a given type on a target.
#[derive(Clone)]
pub struct Setter {
    method: String,
    value_type: ValueType,
    visibility: Visibility,
    function: SetterFn,
}

/// A registered getter: reads a [`Value`] of a given type from a target.
#[derive(Clone)]
pub struct Getter {
    method: String,
    value_type: ValueType,
    visibility: Visibility,
    function: GetterFn,
}

impl Setter {
    pub fn get_method(&self) -> &str {
        &self.method
    }
    pub fn get_value_type(&self) -> ValueType {
        self.value_type
    }
    pub fn get_visibility(&self) -> Visibility {
        self.visibility
    }
    /// Writes the value (converted to the setter type) on the target. Targets of a different type
    /// are ignored.
    pub fn set(&self, target: &mut dyn Any, value: &Value) {
        (self.function)(target, &value.convert(self.value_type))
    }
}

impl Getter {
    pub fn get_method(&self) -> &str {
        &self.method
    }
    pub fn get_value_type(&self) -> ValueType {
        self.value_type
    }
    pub fn get_visibility(&self) -> Visibility {
        self.visibility
    }
    /// Reads the value from the target, `None` if the target is not of the registered type.
    pub fn get(&self, target: &dyn Any) -> Option<Value> {
        (self.function)(target)
    }
}

impl Debug for Setter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Setter [{}({}), {:?}]", self.method, self.value_type, self.visibility)
    }
}

impl Debug for Getter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Getter [{}() -> {}, {:?}]", self.method, self.value_type, self.visibility)
    }
}

#[derive(Default)]
struct Registrations {
    setters: HashMap<AccessorKey, Vec<Setter>>,
    getters: HashMap<AccessorKey, Vec<Getter>>,
}

#[derive(Default)]
struct ResolutionCache {
    setters: HashMap<AccessorKey, Option<Setter>>,
    getters: HashMap<AccessorKey, Option<Getter>>,
}

static REGISTRATIONS: OnceLock<RwLock<Registrations>> = OnceLock::new();
static RESOLUTIONS: OnceLock<RwLock<ResolutionCache>> = OnceLock::new();

fn registrations() -> &'static RwLock<Registrations> {
    REGISTRATIONS.get_or_init(Default::default)
}

fn resolutions() -> &'static RwLock<ResolutionCache> {
    RESOLUTIONS.get_or_init(Default::default)
}

/// Builds the accessor method name for a property: `set_alpha`, `get_alpha`, `is_visible`...
pub fn method_name(prefix: &str, property_name: &str) -> String {
    match property_name.is_empty() {
        true => prefix.to_string(),
        false => format!("{}_{}", prefix, property_name),
    }
}

/// The process-wide registry of named accessors.
///
/// # Example
/// ```
/// use std::any::TypeId;
/// use frameflow::animations::AccessorRegistry;
/// use frameflow::utils::{Value, ValueType};
///
/// #[derive(Default)]
/// struct Sprite { alpha: f32 }
///
/// AccessorRegistry::register_setter("set_alpha", |sprite: &mut Sprite, alpha: f32| sprite.alpha = alpha);
/// AccessorRegistry::register_getter("get_alpha", |sprite: &Sprite| sprite.alpha);
///
/// let setter = AccessorRegistry::resolve_setter(TypeId::of::<Sprite>(), "alpha", ValueType::Float).unwrap();
/// let mut sprite = Sprite::default();
/// setter.set(&mut sprite, &Value::Float(0.5));
/// assert_eq!(sprite.alpha, 0.5);
/// ```
pub struct AccessorRegistry;

impl AccessorRegistry {
    /// Registers a public setter method for the type `T`.
    pub fn register_setter<T, V, F>(method: &str, setter: F)
    where
        T: Any,
        V: Animatable,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self::add_setter::<T, V, F>(method, Visibility::Public, setter)
    }

    /// Registers a hidden setter method for the type `T`: only used when no public one matches.
    pub fn register_hidden_setter<T, V, F>(method: &str, setter: F)
    where
        T: Any,
        V: Animatable,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        Self::add_setter::<T, V, F>(method, Visibility::Hidden, setter)
    }

    /// Registers a public getter method for the type `T`.
    pub fn register_getter<T, V, F>(method: &str, getter: F)
    where
        T: Any,
        V: Animatable,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self::add_getter::<T, V, F>(method, Visibility::Public, getter)
    }

    /// Registers a hidden getter method for the type `T`: only used when no public one matches.
    pub fn register_hidden_getter<T, V, F>(method: &str, getter: F)
    where
        T: Any,
        V: Animatable,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self::add_getter::<T, V, F>(method, Visibility::Hidden, getter)
    }

    fn add_setter<T, V, F>(method: &str, visibility: Visibility, setter: F)
    where
        T: Any,
        V: Animatable,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let function: SetterFn = Arc::new(move |target: &mut dyn Any, value: &Value| {
            if let Some(target) = target.downcast_mut::<T>() {
                setter(target, V::from_value(value))
            }
        });
        let entry = Setter {
            method: method.to_string(),
            value_type: V::value_type(),
            visibility,
            function,
        };
        debug!("Register setter {} for {}", method, type_name::<T>());
        registrations()
            .write()
            .setters
            .entry((TypeId::of::<T>(), method.to_string()))
            .or_default()
            .push(entry);
        Self::invalidate(TypeId::of::<T>());
    }

    fn add_getter<T, V, F>(method: &str, visibility: Visibility, getter: F)
    where
        T: Any,
        V: Animatable,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let function: GetterFn = Arc::new(move |target: &dyn Any| {
            target
                .downcast_ref::<T>()
                .map(|target| getter(target).to_value())
        });
        let entry = Getter {
            method: method.to_string(),
            value_type: V::value_type(),
            visibility,
            function,
        };
        debug!("Register getter {} for {}", method, type_name::<T>());
        registrations()
            .write()
            .getters
            .entry((TypeId::of::<T>(), method.to_string()))
            .or_default()
            .push(entry);
        Self::invalidate(TypeId::of::<T>());
    }

    /// Drops the memoized resolutions of a type (a new accessor may change them).
    fn invalidate(type_id: TypeId) {
        let mut cache = resolutions().write();
        cache.setters.retain(|(id, _), _| *id != type_id);
        cache.getters.retain(|(id, _), _| *id != type_id);
    }

    /// Resolves the setter of a property on a target type.
    ///
    /// The setter `set_<property_name>` is searched for each variant of `value_type` (see
    /// [`ValueType::variants()`]), public registrations first. The result, found or not, is
    /// memoized for the `(type, property name)` pair.
    pub fn resolve_setter(
        type_id: TypeId,
        property_name: &str,
        value_type: ValueType,
    ) -> Option<Setter> {
        let key = (type_id, property_name.to_string());
        if let Some(resolved) = resolutions().read().setters.get(&key) {
            return resolved.clone();
        }

        let mut cache = resolutions().write();
        // Another caller may have resolved it in between.
        if let Some(resolved) = cache.setters.get(&key) {
            return resolved.clone();
        }
        let resolved = Self::discover_setter(type_id, property_name, value_type);
        trace!("Resolved setter for '{}': {:?}", property_name, resolved);
        cache.setters.insert(key, resolved.clone());
        resolved
    }

    /// Resolves the getter of a property on a target type.
    ///
    /// The getter `get_<property_name>` is searched first, then `is_<property_name>`, public
    /// registrations first. The result, found or not, is memoized for the `(type, property name)`
    /// pair.
    pub fn resolve_getter(type_id: TypeId, property_name: &str) -> Option<Getter> {
        let key = (type_id, property_name.to_string());
        if let Some(resolved) = resolutions().read().getters.get(&key) {
            return resolved.clone();
        }

        let mut cache = resolutions().write();
        if let Some(resolved) = cache.getters.get(&key) {
            return resolved.clone();
        }
        let resolved = Self::discover_getter(type_id, property_name);
        trace!("Resolved getter for '{}': {:?}", property_name, resolved);
        cache.getters.insert(key, resolved.clone());
        resolved
    }

    fn discover_setter(
        type_id: TypeId,
        property_name: &str,
        value_type: ValueType,
    ) -> Option<Setter> {
        let registrations = registrations().read();
        let candidates = registrations
            .setters
            .get(&(type_id, method_name("set", property_name)))?;
        for variant in value_type.variants() {
            for visibility in [Visibility::Public, Visibility::Hidden] {
                let found = candidates
                    .iter()
                    .find(|setter| setter.value_type == variant && setter.visibility == visibility);
                if let Some(setter) = found {
                    return Some(setter.clone());
                }
            }
        }
        None
    }

    fn discover_getter(type_id: TypeId, property_name: &str) -> Option<Getter> {
        let registrations = registrations().read();
        for prefix in ["get", "is"] {
            let Some(candidates) = registrations
                .getters
                .get(&(type_id, method_name(prefix, property_name)))
            else {
                continue;
            };
            for visibility in [Visibility::Public, Visibility::Hidden] {
                let found = candidates
                    .iter()
                    .find(|getter| getter.visibility == visibility);
                if let Some(getter) = found {
                    return Some(getter.clone());
                }
            }
        }
        None
    }

    /// Removes every registration and memoized resolution.
    pub fn clear() {
        {
            let mut registrations = registrations().write();
            registrations.setters.clear();
            registrations.getters.clear();
        }
        let mut cache = resolutions().write();
        cache.setters.clear();
        cache.getters.clear();
    }
}
