//! Extracción tipada de argumentos.
//!
//! `Bind` asocia un tipo Rust con el `Kind` que un parámetro espera y sabe
//! sacarlo de un `Value`. Lo usa `Param::of` para construir descriptores y el
//! macro `step!` para convertir los argumentos antes de ejecutar el cuerpo.

use std::any::Any;
use std::ops::Deref;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::errors::SequenceError;
use crate::model::{Kind, Payload, Value};

pub trait Bind: Sized {
    /// Kind esperado; `None` desactiva la comprobación.
    fn expected() -> Option<Kind>;

    /// Convierte el argumento; `param` sólo se usa para el mensaje de error.
    fn from_value(param: &str, value: Value) -> Result<Self, SequenceError>;
}

impl Bind for Value {
    fn expected() -> Option<Kind> {
        None
    }

    fn from_value(_param: &str, value: Value) -> Result<Self, SequenceError> {
        Ok(value)
    }
}

macro_rules! bind_variant {
    ($ty:ty, $variant:ident) => {
        impl Bind for $ty {
            fn expected() -> Option<Kind> {
                Some(Kind::$variant)
            }

            fn from_value(param: &str, value: Value) -> Result<Self, SequenceError> {
                match value {
                    Value::$variant(inner) => Ok(inner),
                    other => Err(SequenceError::mismatch(param, other.kind(), Kind::$variant)),
                }
            }
        }
    };
}

bind_variant!(bool, Bool);
bind_variant!(i64, Int);
bind_variant!(f64, Float);
bind_variant!(String, String);
bind_variant!(Vec<Value>, List);
bind_variant!(IndexMap<String, Value>, Map);
bind_variant!(Payload, Payload);

/// Argumento que debe ser un `Object` que envuelve un `T` (chequeo tipo
/// "instance of").
#[derive(Debug)]
pub struct Instance<T>(Arc<T>);

impl<T> Instance<T> {
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T> Deref for Instance<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Any + Send + Sync> Bind for Instance<T> {
    fn expected() -> Option<Kind> {
        Some(Kind::object::<T>())
    }

    fn from_value(param: &str, value: Value) -> Result<Self, SequenceError> {
        let actual = value.kind();
        value.as_object()
             .and_then(|o| o.downcast::<T>())
             .map(Instance)
             .ok_or_else(|| SequenceError::mismatch(param, actual, Kind::object::<T>()))
    }
}
