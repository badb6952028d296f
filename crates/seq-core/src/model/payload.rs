//! `Payload`: registro dinámico de campos con nombre.
//!
//! Un `Payload` es un handle barato de clonar sobre un único registro
//! compartido. Todas las copias del handle ven las mismas mutaciones, por eso
//! los mutadores reciben `&self`. Es el modelo de propiedad que permite que un
//! step que recibe el payload lo modifique "en sitio" mientras que un step que
//! recibe un campo escalar trabaja sobre una copia.
//!
//! Los nombres de campo se normalizan a minúsculas antes de guardar y de
//! buscar: `Number` y `number` son el mismo campo.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use super::Value;
use crate::errors::SequenceError;

#[derive(Clone, Default)]
pub struct Payload {
    fields: Arc<DashMap<String, Value>>,
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

impl Payload {
    /// Crea un payload vacío.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lee un campo. Falla con `MissingField` si nunca fue asignado.
    pub fn get(&self, name: &str) -> Result<Value, SequenceError> {
        let key = normalize(name);
        match self.fields.get(&key) {
            Some(entry) => Ok(entry.value().clone()),
            None => Err(SequenceError::MissingField(key)),
        }
    }

    /// Asigna (o sobreescribe) un campo.
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.fields.insert(normalize(name), value.into());
    }

    /// Indica si el campo existe y no es `Null`. Nunca falla.
    pub fn has(&self, name: &str) -> bool {
        self.fields
            .get(&normalize(name))
            .is_some_and(|entry| !entry.value().is_null())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Nombres de campo (normalizados) en orden lexicográfico.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.fields.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Snapshot de los campos como mapa plano. Modificar el mapa devuelto no
    /// afecta al payload.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.fields
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect()
    }

    /// Nuevo registro independiente con una copia de los campos actuales.
    /// Los payloads anidados siguen siendo compartidos.
    pub fn duplicate(&self) -> Payload {
        self.to_map().into_iter().collect()
    }

    /// `true` si ambos handles apuntan al mismo registro.
    pub fn same_instance(&self, other: &Payload) -> bool {
        Arc::ptr_eq(&self.fields, &other.fields)
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.fields) as usize
    }

    /// Despacho genérico de accesores: `get<Campo>()` equivale a
    /// `get("campo")` y `set<Campo>(v)` a `set("campo", v)` devolviendo
    /// `Value::Bool(true)`. Cualquier otra forma falla con `UnknownOperation`.
    pub fn call(&self, operation: &str, mut args: Vec<Value>) -> Result<Value, SequenceError> {
        let unknown = || SequenceError::UnknownOperation(operation.to_string());
        if !operation.is_char_boundary(3) {
            return Err(unknown());
        }
        let (verb, field) = operation.split_at(3);
        if field.is_empty() {
            return Err(unknown());
        }

        match verb.to_ascii_lowercase().as_str() {
            "get" => self.get(field),
            "set" => match (args.pop(), args.is_empty()) {
                (Some(value), true) => {
                    self.set(field, value);
                    Ok(Value::Bool(true))
                }
                _ => Err(unknown()),
            },
            _ => Err(unknown()),
        }
    }

    /// Construye un payload desde un objeto JSON; cualquier otro JSON se rechaza.
    pub fn from_json(json: serde_json::Value) -> Result<Self, SequenceError> {
        match json {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(SequenceError::InvalidPayload(Value::from(other).kind().to_string())),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let payload = Payload::new();
        for (k, v) in iter {
            payload.set(k.as_ref(), v);
        }
        payload
    }
}

thread_local! {
    // Registros que se están serializando en este hilo (detección de ciclos).
    static SERIALIZING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

struct CycleGuard(usize);

impl CycleGuard {
    fn enter(id: usize) -> Option<Self> {
        SERIALIZING.with(|stack| {
                       let mut stack = stack.borrow_mut();
                       if stack.contains(&id) {
                           return None;
                       }
                       stack.push(id);
                       Some(CycleGuard(id))
                   })
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        SERIALIZING.with(|stack| stack.borrow_mut().retain(|id| *id != self.0));
    }
}

/// Un payload que se contiene a sí mismo (directa o indirectamente) no es
/// serializable: devuelve error en lugar de recursar.
impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let _guard = CycleGuard::enter(self.id()).ok_or_else(|| S::Error::custom("cyclic payload"))?;
        serializer.collect_map(self.to_map())
    }
}

/// Vista de depuración que muestra los payloads anidados sólo por identidad.
struct Shallow<'a>(&'a Value);

impl fmt::Debug for Shallow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Payload(p) => write!(f, "Payload@{:#x}", p.id()),
            Value::List(items) => f.debug_list().entries(items.iter().map(Shallow)).finish(),
            Value::Map(map) => f.debug_map()
                                .entries(map.iter().map(|(k, v)| (k, Shallow(v))))
                                .finish(),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload@{:#x} ", self.id())?;
        let fields = self.to_map();
        f.debug_map()
         .entries(fields.iter().map(|(k, v)| (k, Shallow(v))))
         .finish()
    }
}
