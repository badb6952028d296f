//! Valor dinámico que circula por una secuencia.
//!
//! `Value` es la variante etiquetada que reemplaza al tipado dinámico: el
//! motor decide el modo de ejecución mirando la etiqueta (`Value::Payload`
//! frente a cualquier otra) y los steps declaran qué `Kind` esperan en cada
//! parámetro.
//!
//! Los datos (`Int`, `String`, `List`, ...) se copian al clonar. `Payload` y
//! `Object` son handles compartidos: clonarlos no copia el contenido y la
//! igualdad entre ellos es por identidad.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use super::Payload;

/// Tipo en tiempo de ejecución de un `Value` (o tipo esperado por un parámetro).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Payload,
    /// Valor opaco; lleva el nombre del tipo Rust envuelto.
    Object(&'static str),
}

impl Kind {
    /// Kind esperado para un `Object` que envuelve un `T`.
    pub fn object<T: Any>() -> Self {
        Kind::Object(std::any::type_name::<T>())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Payload => "payload",
            Kind::Object(type_name) => type_name,
        }
    }

    /// Un valor de kind `self` satisface lo esperado si el kind primitivo
    /// coincide o, para objetos, si es instancia del mismo tipo.
    pub fn satisfies(&self, expected: &Kind) -> bool {
        self == expected
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Valor opaco compartido (el equivalente a "una instancia de clase").
#[derive(Clone)]
pub struct Object {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Object {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self { type_name: std::any::type_name::<T>(),
               inner: value }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast::<T>().ok()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn same_instance(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Object({})", self.type_name)
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Payload(Payload),
    Object(Object),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Payload(_) => Kind::Payload,
            Value::Object(o) => Kind::Object(o.type_name()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_payload(&self) -> bool {
        matches!(self, Value::Payload(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_payload(&self) -> Option<&Payload> {
        match self {
            Value::Payload(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Conversión laxa hacia un kind primitivo: `"3"` → `3`, `2.0` → `2`,
    /// `3` → `"3"`, `1` → `true`. Devuelve `None` si no hay conversión sin
    /// pérdida (p. ej. `"three"` → int o `1.5` → int).
    pub fn coerce_to(&self, expected: &Kind) -> Option<Value> {
        match (self, expected) {
            (v, k) if v.kind() == *k => Some(v.clone()),
            (Value::Bool(b), Kind::Int) => Some(Value::Int(i64::from(*b))),
            (Value::Float(x), Kind::Int) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                Some(Value::Int(*x as i64))
            }
            (Value::String(s), Kind::Int) => s.trim().parse().ok().map(Value::Int),
            (Value::Int(i), Kind::Float) => Some(Value::Float(*i as f64)),
            (Value::String(s), Kind::Float) => s.trim().parse().ok().map(Value::Float),
            (Value::Int(i), Kind::String) => Some(Value::String(i.to_string())),
            (Value::Float(x), Kind::String) => Some(Value::String(x.to_string())),
            (Value::Int(i), Kind::Bool) => Some(Value::Bool(*i != 0)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Payload(a), Value::Payload(b)) => a.same_instance(b),
            (Value::Object(a), Value::Object(b)) => a.same_instance(b),
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
            Value::Payload(p) => p.serialize(serializer),
            Value::Object(o) => Err(S::Error::custom(format!("object of type `{}` is not serializable",
                                                             o.type_name()))),
        }
    }
}

// -------------------------------------------------------------
// Conversiones
// -------------------------------------------------------------

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Payload> for Value {
    fn from(p: Payload) -> Self {
        Value::Payload(p)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}
