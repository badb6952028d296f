//! StepRegistry - steps registrados por nombre.
//!
//! Una `Sequence` puede referenciar un step por nombre (`StepRef::named`) en
//! lugar de guardarlo directamente. La referencia se resuelve contra el
//! registry recién cuando la ejecución llega a ese step; si el nombre no está
//! registrado el step no es invocable.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Step;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("step '{0}' is already registered")]
    AlreadyRegistered(String),
}

#[derive(Default)]
pub struct StepRegistry {
    steps: HashMap<String, Arc<dyn Step>>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra `step` bajo `name`. Un nombre sólo puede registrarse una vez.
    pub fn register<S: Step + 'static>(&mut self, name: impl Into<String>, step: S) -> Result<(), RegistryError> {
        let name = name.into();
        if self.steps.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        self.steps.insert(name, Arc::new(step));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Step>> {
        self.steps.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Nombres registrados en orden lexicográfico.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.steps.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry").field("steps", &self.names()).finish()
    }
}
