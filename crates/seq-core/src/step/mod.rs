//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de trabajo arbitraria encadenada en una `Sequence`.
//! Este módulo define:
//! - `Step`: interfaz neutral usada por el motor, con su descriptor de
//!   binding (`Param`) y los argumentos resueltos (`Args`).
//! - `Bind` / `Instance`: extracción tipada de argumentos.
//! - `FnStep` y el macro `step!` para declarar steps desde closures.
//! - `StepRegistry` para referenciar steps por nombre.

mod bind;
mod definition;
mod func;
pub mod macros;
pub mod registry;

pub use bind::{Bind, Instance};
pub use definition::{Args, Param, Step};
pub use func::FnStep;
pub use registry::{RegistryError, StepRegistry};
