//! Configuración del motor.
//!
//! El crate core no lee variables de entorno; sólo define la estructura. La
//! carga desde `.env` / entorno vive en el crate raíz (`seqflow::config`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Qué hacer cuando el valor ligado a un parámetro no tiene el kind declarado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeChecks {
    /// Falla con `TypeMismatch` (comportamiento por defecto).
    #[default]
    Enforce,
    /// Registra un `warn!` y continúa.
    Warn,
    /// No comprueba.
    Off,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown type check mode `{0}` (expected enforce, warn or off)")]
pub struct UnknownTypeChecks(pub String);

impl FromStr for TypeChecks {
    type Err = UnknownTypeChecks;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enforce" | "strict" => Ok(TypeChecks::Enforce),
            "warn" => Ok(TypeChecks::Warn),
            "off" | "none" | "disabled" => Ok(TypeChecks::Off),
            _ => Err(UnknownTypeChecks(s.to_string())),
        }
    }
}

impl fmt::Display for TypeChecks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        TypeChecks::Enforce => "enforce",
                        TypeChecks::Warn => "warn",
                        TypeChecks::Off => "off",
                    })
    }
}

/// Parámetros del motor compartidos por todas las ejecuciones de una `Sequence`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub type_checks: TypeChecks,
}

impl EngineConfig {
    pub fn with_type_checks(mut self, type_checks: TypeChecks) -> Self {
        self.type_checks = type_checks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modes_case_insensitively() {
        assert_eq!("Enforce".parse::<TypeChecks>(), Ok(TypeChecks::Enforce));
        assert_eq!("strict".parse::<TypeChecks>(), Ok(TypeChecks::Enforce));
        assert_eq!(" WARN ".parse::<TypeChecks>(), Ok(TypeChecks::Warn));
        assert_eq!("disabled".parse::<TypeChecks>(), Ok(TypeChecks::Off));
        assert_eq!("loose".parse::<TypeChecks>(), Err(UnknownTypeChecks("loose".into())));
    }

    #[test]
    fn default_config_enforces_types() {
        assert_eq!(EngineConfig::default().type_checks, TypeChecks::Enforce);
    }

    #[test]
    fn deserializes_from_json() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"type_checks":"warn"}"#).unwrap();
        assert_eq!(cfg, EngineConfig::default().with_type_checks(TypeChecks::Warn));
        let empty: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.type_checks, TypeChecks::Enforce);
    }
}
