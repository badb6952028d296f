//! Modo binding: resolución de parámetros desde el payload y merge del
//! resultado de vuelta.

use log::{trace, warn};

use super::TypeChecks;
use crate::errors::{SequenceError, StepResult};
use crate::model::{Kind, Payload, Value};
use crate::step::{Args, Param, Step};

/// Resuelve cada parámetro del descriptor en orden: `payload` se liga al
/// handle del payload; el resto se lee por nombre (`MissingField` si falta) y
/// se compara contra el kind esperado.
pub(crate) fn bind_arguments(step: &dyn Step, payload: &Payload, checks: TypeChecks) -> Result<Args, SequenceError> {
    let params = step.params();
    let mut bound = Vec::with_capacity(params.len());
    for param in params {
        if param.is_payload() {
            bound.push(Value::Payload(payload.clone()));
            continue;
        }
        let mut value = payload.get(param.name())?;
        if let Some(expected) = param.expected() {
            value = check_kind(step.name(), param, value, expected, checks)?;
        }
        trace!("bind step={} param={} kind={}", step.name(), param.name(), value.kind());
        bound.push(value);
    }
    Ok(Args::new(bound))
}

/// Con `Enforce` un kind distinto es un error. Con `Warn`/`Off` se intenta
/// una conversión laxa (`Value::coerce_to`); si no existe, el valor pasa sin
/// cambios y es el step quien decide si lo acepta.
fn check_kind(step: &str, param: &Param, value: Value, expected: Kind, checks: TypeChecks) -> Result<Value, SequenceError> {
    let actual = value.kind();
    if actual.satisfies(&expected) {
        return Ok(value);
    }
    if checks == TypeChecks::Enforce {
        return Err(SequenceError::mismatch(param.name(), actual, expected));
    }
    match value.coerce_to(&expected) {
        Some(coerced) => {
            if checks == TypeChecks::Warn {
                warn!("type mismatch coerced step={step} param={} actual={actual} expected={expected}",
                      param.name());
            }
            Ok(coerced)
        }
        None => {
            if checks == TypeChecks::Warn {
                warn!("type mismatch not coercible, value passed unchanged step={step} param={} actual={actual} \
                       expected={expected}",
                      param.name());
            }
            Ok(value)
        }
    }
}

/// Decide el nuevo valor en curso tras ejecutar un step en modo binding.
///
/// - Con `target`: un `Payload` como resultado es un error de recursión; un
///   resultado no nulo se escribe en el campo; el valor en curso sigue siendo
///   el mismo payload.
/// - Sin `target`: un resultado no nulo reemplaza al payload; `Null` lo deja.
pub(crate) fn merge_result(step: &str, target: Option<&str>, payload: Payload, result: Value) -> StepResult {
    match target {
        Some(field) => {
            if result.is_payload() {
                return Err(SequenceError::Recursion { step: step.to_string(),
                                                      field: field.to_string() });
            }
            if result.is_null() {
                trace!("merge step={step} field={field} result=null (unchanged)");
            } else {
                trace!("merge step={step} field={field} kind={}", result.kind());
                payload.set(field, result);
            }
            Ok(Value::Payload(payload))
        }
        None if result.is_null() => {
            trace!("merge step={step} result=null (payload kept)");
            Ok(Value::Payload(payload))
        }
        None => {
            trace!("merge step={step} replaces payload with kind={}", result.kind());
            Ok(result)
        }
    }
}
