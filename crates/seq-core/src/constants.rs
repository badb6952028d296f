//! Constantes del motor de secuencias.

/// Parámetro reservado: en modo binding se liga al `Payload` completo en vez
/// de leer un campo con ese nombre.
pub const PAYLOAD_PARAM: &str = "payload";

/// Nombre con el que una `Sequence` anidada aparece en logs y errores.
pub const SEQUENCE_STEP_NAME: &str = "sequence";
