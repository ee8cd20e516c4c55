use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// The type-erased value computed by an animation and written to a target property.
///
/// Numeric specializations of the engine work on native `i32` / `f32` values and only convert to
/// a `Value` at the boundaries (listeners, generic evaluators, property accessors).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i32),
    Float(f32),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
}

/// The kind of a [`Value`], used to match property accessors.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    #[default]
    Null,
    Boolean,
    Integer,
    Float,
    Double,
    String,
    Array,
    Object,
}

impl ValueType {
    /// The ordered list of value types an accessor of this type may be found under.
    ///
    /// Numeric types accept widening/narrowing between each other; any other type only matches
    /// itself.
    pub fn variants(&self) -> Vec<ValueType> {
        match self {
            ValueType::Float => vec![ValueType::Float, ValueType::Double, ValueType::Integer],
            ValueType::Integer => vec![ValueType::Integer, ValueType::Float, ValueType::Double],
            ValueType::Double => vec![ValueType::Double, ValueType::Float, ValueType::Integer],
            other => vec![*other],
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Double(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Array(arr) => {
                let elements = arr
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "[{}]", elements)
            }
            Value::Object(obj) => {
                let entries = obj
                    .iter()
                    .map(|(key, value)| format!("\"{}\": {}", key, value))
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "{{{}}}", entries)
            }
        }
    }
}

// **********************************************
// Serde
// **********************************************

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Boolean(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i32(*i),
            Value::Float(f) => serializer.serialize_f32(*f),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(a) => serializer.collect_seq(a),
            Value::Object(o) => serializer.collect_map(o),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> ::serde::Deserialize<'de> for Value {
    fn deserialize<D>(de: D) -> Result<Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        Ok(Value::from(serde_json::Value::deserialize(de)?))
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) if i32::try_from(i).is_ok() => Value::Integer(i as i32),
                _ => Value::Double(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(list) => {
                Value::Array(list.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

// **********************************************
// Extractors: get the value inside Value.
// **********************************************
impl Value {
    pub fn is_null(&self) -> bool {
        *self == Value::Null
    }

    /// Returns the [`ValueType`] of this value.
    pub fn get_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// Extracts the boolean value if it is a boolean.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i > 0,
            Value::Float(f) => *f > 0.0,
            Value::Double(d) => *d > 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            Value::Object(o) => !o.is_empty(),
        }
    }

    /// Extracts the integer value if it is a number (truncated toward zero).
    pub fn as_integer(&self) -> i32 {
        match *self {
            Value::Boolean(b) => i32::from(b),
            Value::Integer(i) => i,
            Value::Float(f) => f as i32,
            Value::Double(d) => d as i32,
            _ => 0,
        }
    }

    /// Extracts the float value if it is a number.
    pub fn as_float(&self) -> f32 {
        match *self {
            Value::Boolean(b) => f32::from(u8::from(b)),
            Value::Integer(i) => i as f32,
            Value::Float(f) => f,
            Value::Double(d) => d as f32,
            _ => 0.0,
        }
    }

    /// Extracts the double value if it is a number.
    pub fn as_double(&self) -> f64 {
        match *self {
            Value::Boolean(b) => f64::from(b),
            Value::Integer(i) => f64::from(i),
            Value::Float(f) => f64::from(f),
            Value::Double(d) => d,
            _ => 0.0,
        }
    }

    /// Extracts the string of this value if it is a string or a number.
    pub fn as_string(&self) -> String {
        match self {
            Value::Integer(i) => format!("{}", i),
            Value::Float(f) => format!("{}", f),
            Value::Double(d) => format!("{}", d),
            Value::String(s) => s.clone(),
            _ => String::default(),
        }
    }

    /// Extracts the &str of this value if it is a string.
    pub fn as_str(&self) -> &str {
        match self {
            Value::String(ref s) => s,
            _ => "",
        }
    }

    /// Extracts the array value if it is an array.
    pub fn as_array(&self) -> Vec<Value> {
        match *self {
            Value::Array(ref a) => a.clone(),
            _ => vec![],
        }
    }

    /// Extracts the hashmap value if it is a hashmap.
    pub fn as_object(&self) -> HashMap<String, Value> {
        match self {
            Value::Object(map) => map.clone(),
            _ => HashMap::<String, Value>::default(),
        }
    }

    /// Converts this value to the given [`ValueType`].
    ///
    /// Numbers are converted between each other (truncating toward zero for integers). Values that
    /// cannot be converted are returned unchanged.
    pub fn convert(&self, value_type: ValueType) -> Value {
        match (value_type, self.get_type()) {
            (to, from) if to == from => self.clone(),
            (
                ValueType::Integer,
                ValueType::Boolean | ValueType::Float | ValueType::Double,
            ) => Value::Integer(self.as_integer()),
            (
                ValueType::Float,
                ValueType::Boolean | ValueType::Integer | ValueType::Double,
            ) => Value::Float(self.as_float()),
            (
                ValueType::Double,
                ValueType::Boolean | ValueType::Integer | ValueType::Float,
            ) => Value::Double(self.as_double()),
            (ValueType::Boolean, _) => Value::Boolean(self.as_bool()),
            (ValueType::String, ValueType::Integer | ValueType::Float | ValueType::Double) => {
                Value::String(self.as_string())
            }
            _ => self.clone(),
        }
    }
}

// **********************************************
// Converters: set a value inside Value.
// **********************************************

macro_rules! impl_from_converter {
    ($variant:ident : $T:ty) => {
        impl From<$T> for Value {
            #[inline]
            fn from(val: $T) -> Value {
                Value::$variant(val.into())
            }
        }
    };
}

impl_from_converter!(String: String);
impl_from_converter!(String: &str);
impl_from_converter!(Integer: u8);
impl_from_converter!(Integer: u16);
impl_from_converter!(Integer: i8);
impl_from_converter!(Integer: i16);
impl_from_converter!(Integer: i32);
impl_from_converter!(Float: f32);
impl_from_converter!(Double: f64);
impl_from_converter!(Boolean: bool);
impl_from_converter!(Object: HashMap<String, Value>);

impl<T: Into<Value>> From<Vec<T>> for Value {
    /// Convert a `Vec` to `Value::Array`.
    fn from(f: Vec<T>) -> Self {
        Value::Array(f.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    /// Convert a slice to `Value::Array`.
    fn from(f: &[T]) -> Self {
        Value::Array(f.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    /// Create a `Value::Array` by collecting an iterator of array elements.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_as_boolean() {
        assert!(!Value::Null.as_bool());
        assert!(!Value::Boolean(false).as_bool());
        assert!(Value::Boolean(true).as_bool());
        assert!(!Value::Integer(-10).as_bool());
        assert!(Value::Integer(10).as_bool());
        assert!(!Value::Float(0.0).as_bool());
        assert!(Value::Double(10.5).as_bool());
        assert!(!Value::String(String::from("")).as_bool());
        assert!(Value::String(" ".into()).as_bool());
        assert!(!Value::Array(vec![]).as_bool());
        assert!(Value::Array(vec![1.into()]).as_bool());

        let mut map = HashMap::new();
        assert!(!Value::Object(map.clone()).as_bool());
        map.insert("key".to_string(), Value::Integer(42));
        assert!(Value::Object(map).as_bool());
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(Value::Null.as_integer(), 0);
        assert_eq!(Value::Boolean(true).as_integer(), 1);
        assert_eq!(Value::Integer(-12).as_integer(), -12);
        assert_eq!(Value::Float(69.5).as_integer(), 69);
        assert_eq!(Value::Float(-69.5).as_integer(), -69, "Truncates toward zero.");
        assert_eq!(Value::Double(12.9).as_integer(), 12);
        assert_eq!(Value::String(String::from("12")).as_integer(), 0);
    }

    #[test]
    fn test_as_float_and_double() {
        assert_eq!(Value::Null.as_float(), 0.0);
        assert_eq!(Value::Boolean(true).as_float(), 1.0);
        assert_eq!(Value::Integer(42).as_float(), 42.0);
        assert_eq!(Value::Float(-0.5).as_float(), -0.5);
        assert_eq!(Value::Double(2.25).as_float(), 2.25);
        assert_eq!(Value::Integer(42).as_double(), 42.0);
        assert_eq!(Value::Float(0.5).as_double(), 0.5);
        assert_eq!(Value::Array(vec![]).as_double(), 0.0);
    }

    #[test]
    fn test_as_string_and_str() {
        assert_eq!(Value::Null.as_string(), String::from(""));
        assert_eq!(Value::Integer(42).as_string(), String::from("42"));
        assert_eq!(Value::Float(69.5).as_string(), String::from("69.5"));
        assert_eq!(Value::from("test").as_string(), String::from("test"));
        assert_eq!(Value::from("test").as_str(), "test");
        assert_eq!(Value::Integer(42).as_str(), "");
    }

    #[test]
    fn test_as_array_and_object() {
        assert_eq!(Value::Null.as_array(), vec![]);
        assert_eq!(
            Value::from(vec![1, 2]).as_array(),
            vec![Value::Integer(1), Value::Integer(2)]
        );

        let mut map = HashMap::new();
        map.insert("key".to_string(), Value::Integer(42));
        assert_eq!(Value::Object(map.clone()).as_object(), map);
        assert_eq!(Value::Integer(1).as_object(), HashMap::new());
    }

    #[test]
    fn test_get_type() {
        assert_eq!(Value::Null.get_type(), ValueType::Null);
        assert_eq!(Value::from(1).get_type(), ValueType::Integer);
        assert_eq!(Value::from(1.0f32).get_type(), ValueType::Float);
        assert_eq!(Value::from(1.0f64).get_type(), ValueType::Double);
        assert_eq!(Value::from(true).get_type(), ValueType::Boolean);
        assert_eq!(Value::from("a").get_type(), ValueType::String);
        assert_eq!(Value::from(vec![1]).get_type(), ValueType::Array);
    }

    #[test]
    fn test_convert() {
        assert_eq!(Value::Float(2.7).convert(ValueType::Integer), Value::Integer(2));
        assert_eq!(Value::Integer(3).convert(ValueType::Float), Value::Float(3.0));
        assert_eq!(Value::Float(0.5).convert(ValueType::Double), Value::Double(0.5));
        assert_eq!(Value::Integer(0).convert(ValueType::Boolean), Value::Boolean(false));
        assert_eq!(Value::Integer(7).convert(ValueType::String), Value::from("7"));
        assert_eq!(
            Value::from("keep").convert(ValueType::Integer),
            Value::from("keep"),
            "Unconvertible values are returned unchanged."
        );
    }

    #[test]
    fn test_type_variants() {
        assert_eq!(
            ValueType::Float.variants(),
            vec![ValueType::Float, ValueType::Double, ValueType::Integer]
        );
        assert_eq!(
            ValueType::Integer.variants(),
            vec![ValueType::Integer, ValueType::Float, ValueType::Double]
        );
        assert_eq!(
            ValueType::Double.variants(),
            vec![ValueType::Double, ValueType::Float, ValueType::Integer]
        );
        assert_eq!(ValueType::Object.variants(), vec![ValueType::Object]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "Null");
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::from("txt").to_string(), "\"txt\"");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
        assert_eq!(ValueType::Float.to_string(), "Float");
    }
}
