//! `Sequence`: cadena inmutable de steps.
//!
//! `then` nunca modifica el receptor: copia la lista de entradas (handles
//! `Arc` baratos) y agrega una más. Cualquier secuencia derivada antes o
//! después sigue siendo válida.
//!
//! ```ignore
//! let seq = Sequence::new()
//!     .then(step!(|payload: Payload| { payload.set("n", 1); Ok(()) }))
//!     .then_into(step!(|n: i64| Ok(n + 1)), "n");
//! let out = seq.run(Payload::new())?;
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use uuid::Uuid;

use super::binding::{bind_arguments, merge_result};
use super::EngineConfig;
use crate::constants::{PAYLOAD_PARAM, SEQUENCE_STEP_NAME};
use crate::errors::{SequenceError, StepResult};
use crate::model::Value;
use crate::step::{Args, Param, Step, StepRegistry};

/// Step guardado en una secuencia: ligado directamente o referenciado por
/// nombre (resuelto contra el `StepRegistry` al ejecutar).
#[derive(Clone)]
pub enum StepRef {
    Bound(Arc<dyn Step>),
    Named(String),
}

impl StepRef {
    pub fn named(name: impl Into<String>) -> Self {
        StepRef::Named(name.into())
    }

    /// Nombre del step (o de la referencia) para logs.
    pub fn label(&self) -> &str {
        match self {
            StepRef::Bound(step) => step.name(),
            StepRef::Named(name) => name,
        }
    }
}

impl<S: Step + 'static> From<S> for StepRef {
    fn from(step: S) -> Self {
        StepRef::Bound(Arc::new(step))
    }
}

impl fmt::Debug for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepRef::Bound(step) => f.debug_tuple("Bound").field(&step.name()).finish(),
            StepRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

#[derive(Debug, Clone)]
struct StepEntry {
    step: StepRef,
    target: Option<String>,
}

#[derive(Clone, Default)]
pub struct Sequence {
    steps: Vec<StepEntry>,
    config: EngineConfig,
    registry: Option<Arc<StepRegistry>>,
}

const SEQUENCE_PARAMS: &[Param] = &[Param::any(PAYLOAD_PARAM)];

impl Sequence {
    /// Secuencia vacía con la configuración por defecto.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config,
               ..Self::default() }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Nueva secuencia con los mismos steps que resuelve las referencias por
    /// nombre contra `registry`.
    pub fn with_registry(&self, registry: Arc<StepRegistry>) -> Self {
        let mut next = self.clone();
        next.registry = Some(registry);
        next
    }

    /// Agrega un step cuyo resultado no nulo reemplaza al valor en curso.
    pub fn then(&self, step: impl Into<StepRef>) -> Self {
        self.append(step.into(), None)
    }

    /// Agrega un step cuyo resultado no nulo se escribe en el campo `target`
    /// del payload.
    pub fn then_into(&self, step: impl Into<StepRef>, target: impl Into<String>) -> Self {
        self.append(step.into(), Some(target.into()))
    }

    fn append(&self, step: StepRef, target: Option<String>) -> Self {
        let mut next = self.clone();
        next.steps.push(StepEntry { step, target });
        next
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Lista observable de steps: `(nombre, campo destino)` en orden.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.steps
            .iter()
            .map(|e| (e.step.label(), e.target.as_deref()))
    }

    /// Ejecuta todos los steps en orden, encadenando el valor devuelto por
    /// cada uno como entrada del siguiente.
    ///
    /// El primer error aborta la ejecución; las mutaciones ya aplicadas sobre
    /// el payload se conservan.
    pub fn run(&self, input: impl Into<Value>) -> StepResult {
        let run_id = Uuid::new_v4();
        let mut current = input.into();
        debug!("run:start run_id={run_id} steps={} input_kind={}", self.steps.len(), current.kind());

        for (index, entry) in self.steps.iter().enumerate() {
            current = self.run_step(run_id, index, entry, current)
                          .inspect_err(|e| {
                              warn!("run:failed run_id={run_id} step_index={index} step={} error={e}",
                                    entry.step.label())
                          })?;
        }

        debug!("run:done run_id={run_id} output_kind={}", current.kind());
        Ok(current)
    }

    /// Invocar la secuencia equivale a `run`.
    pub fn call(&self, input: impl Into<Value>) -> StepResult {
        self.run(input)
    }

    fn run_step(&self, run_id: Uuid, index: usize, entry: &StepEntry, current: Value) -> StepResult {
        let step = self.resolve(&entry.step)?;
        match current {
            Value::Payload(payload) => {
                debug!("step:bound run_id={run_id} step_index={index} step={} target={:?}",
                       step.name(),
                       entry.target);
                let args = bind_arguments(step.as_ref(), &payload, self.config.type_checks)?;
                let result = step.invoke(args)?;
                merge_result(step.name(), entry.target.as_deref(), payload, result)
            }
            raw => {
                debug!("step:simple run_id={run_id} step_index={index} step={} input_kind={}",
                       step.name(),
                       raw.kind());
                step.invoke(Args::single(raw))
            }
        }
    }

    fn resolve(&self, step: &StepRef) -> Result<Arc<dyn Step>, SequenceError> {
        match step {
            StepRef::Bound(step) => Ok(Arc::clone(step)),
            StepRef::Named(name) => self.registry
                                        .as_ref()
                                        .and_then(|r| r.get(name))
                                        .ok_or_else(|| SequenceError::NotInvokable(name.clone())),
        }
    }
}

/// Una secuencia es a su vez un step: recibe el `payload` completo (o el
/// valor en curso, en modo simple) y devuelve el resultado de `run`.
impl Step for Sequence {
    fn name(&self) -> &str {
        SEQUENCE_STEP_NAME
    }

    fn params(&self) -> &[Param] {
        SEQUENCE_PARAMS
    }

    fn invoke(&self, args: Args) -> StepResult {
        self.run(args.into_iter().next().unwrap_or_default())
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
         .field("steps", &self.steps)
         .field("config", &self.config)
         .field("registry", &self.registry.as_ref().map(|r| r.names()))
         .finish()
    }
}
