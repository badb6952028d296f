//! seqflow: composición de steps sobre un payload dinámico.
//!
//! Re-exporta el núcleo (`seq_core`) y añade la configuración cargada desde
//! el entorno (`config`).
pub mod config;

pub use seq_core::*;

/// Secuencia vacía con la configuración global (`config::CONFIG`).
pub fn sequence() -> Sequence {
    Sequence::with_config(config::CONFIG.clone())
}
