use std::borrow::Cow;
use std::fmt;

use super::{Args, Param, Step};
use crate::errors::StepResult;

/// Adaptador closure + descriptor → `Step`.
///
/// Normalmente se construye con el macro `step!`, que deriva el descriptor de
/// los nombres y tipos de los parámetros del closure.
pub struct FnStep<F> {
    name: Cow<'static, str>,
    params: Vec<Param>,
    func: F,
}

impl<F> FnStep<F> where F: Fn(Args) -> StepResult + Send + Sync
{
    pub fn new(params: Vec<Param>, func: F) -> Self {
        Self { name: Cow::Borrowed(std::any::type_name::<F>()),
               params,
               func }
    }

    /// Nombre amigable para logs (por defecto el nombre del tipo del closure).
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Step for FnStep<F> where F: Fn(Args) -> StepResult + Send + Sync
{
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> &[Param] {
        &self.params
    }

    fn invoke(&self, args: Args) -> StepResult {
        (self.func)(args)
    }
}

impl<F> fmt::Debug for FnStep<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep")
         .field("name", &self.name)
         .field("params", &self.params)
         .finish()
    }
}
