//! Errores del motor de secuencias.
//!
//! Todos los errores son fatales para la ejecución en curso: `Sequence::run`
//! se detiene en el primero y lo devuelve tal cual al caller. No hay rollback
//! de las mutaciones que ya se aplicaron sobre el `Payload`.

use thiserror::Error;

use crate::model::Kind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SequenceError {
    /// Lectura (explícita o durante el binding) de un campo nunca asignado.
    #[error("payload field `{0}` does not exist")]
    MissingField(String),

    /// Llamada genérica que no encaja con `get<Campo>` / `set<Campo>`.
    #[error("payload operation `{0}` does not exist")]
    UnknownOperation(String),

    /// El step registrado no se puede invocar al momento de ejecutarlo.
    #[error("step `{0}` is not invokable")]
    NotInvokable(String),

    /// El valor leído del payload no cumple el tipo declarado por el step.
    #[error("payload parameter `{param}` is of kind `{actual}` while the step expected `{expected}`")]
    TypeMismatch { param: String, actual: Kind, expected: Kind },

    /// Un step ligado a un campo devolvió un `Payload` completo.
    #[error("recursion error: step `{step}` cannot return a payload into field `{field}`")]
    Recursion { step: String, field: String },

    /// Sólo un objeto JSON puede convertirse en `Payload`.
    #[error("cannot build a payload from {0}")]
    InvalidPayload(String),

    /// Fallo propio del código de un step.
    #[error("step failed: {0}")]
    Step(String),
}

impl SequenceError {
    /// Atajo para que los steps reporten un fallo propio.
    pub fn step(message: impl Into<String>) -> Self {
        Self::Step(message.into())
    }

    pub(crate) fn mismatch(param: impl Into<String>, actual: Kind, expected: Kind) -> Self {
        Self::TypeMismatch { param: param.into(),
                             actual,
                             expected }
    }
}

/// Resultado de invocar un step: `Value::Null` equivale a "no devolvió nada".
pub type StepResult = Result<crate::model::Value, SequenceError>;
