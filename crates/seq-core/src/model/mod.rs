//! Modelos dinámicos (Value, Kind, Object, Payload)

pub mod payload;
pub mod value;

pub use payload::Payload;
pub use value::{Kind, Object, Value};
