//! Configuración central.
//! Carga variables de entorno (.env) y expone una configuración inmutable
//! del motor (`CONFIG`).
use log::warn;
use once_cell::sync::Lazy;
use std::env;
use thiserror::Error;

use seq_core::{EngineConfig, TypeChecks};

/// Variable que selecciona el modo de comprobación de tipos.
pub const TYPE_CHECKS_KEY: &str = "SEQFLOW_TYPE_CHECKS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}")]
    Invalid { key: String, value: String },
}

/// Construye la configuración a partir de una función de búsqueda de claves.
/// Claves ausentes conservan el valor por defecto.
pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<EngineConfig, ConfigError> {
    let mut cfg = EngineConfig::default();
    if let Some(raw) = lookup(TYPE_CHECKS_KEY) {
        let mode = raw.parse::<TypeChecks>()
                      .map_err(|_| ConfigError::Invalid { key: TYPE_CHECKS_KEY.to_string(),
                                                          value: raw.clone() })?;
        cfg = cfg.with_type_checks(mode);
    }
    Ok(cfg)
}

/// Lee `.env` (si existe) y después el entorno del proceso.
pub fn from_env() -> Result<EngineConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_from(|key| env::var(key).ok())
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<EngineConfig> = Lazy::new(|| {
    from_env().unwrap_or_else(|e| {
                  warn!("config fallback to defaults: {}", e);
                  EngineConfig::default()
              })
});
