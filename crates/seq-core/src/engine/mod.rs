//! Motor de secuencias
//!
//! `Sequence` acumula steps de forma inmutable y los ejecuta en orden sobre
//! un valor. Con un `Payload` en curso entra en modo binding (`binding`);
//! con cualquier otro valor, en modo simple.

mod binding;
pub mod config;
pub mod sequence;

pub use config::{EngineConfig, TypeChecks, UnknownTypeChecks};
pub use sequence::{Sequence, StepRef};
