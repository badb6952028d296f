//! seq-core: cadenas de steps sobre un payload dinámico.
//!
//! - `model`: `Value`, `Kind`, `Object` y el `Payload` compartido.
//! - `step`: contrato `Step` con descriptor de binding, `FnStep`, `step!` y
//!   `StepRegistry`.
//! - `engine`: `Sequence` (append inmutable + ejecución) y `EngineConfig`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod model;
pub mod step;

pub use engine::{EngineConfig, Sequence, StepRef, TypeChecks};
pub use errors::{SequenceError, StepResult};
pub use model::{Kind, Object, Payload, Value};
pub use step::{Args, Bind, FnStep, Instance, Param, RegistryError, Step, StepRegistry};
