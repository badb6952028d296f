//! `TypeChecks::Warn` de punta a punta con steps `step!`: conversión laxa,
//! valores no convertibles y los `warn!` emitidos.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use seq_core::{step, EngineConfig, Kind, Payload, Sequence, SequenceError, TypeChecks, Value};

struct Capture;

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
static LOGGER: Capture = Capture;

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.lock()
               .unwrap()
               .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn install() {
    // sólo el primer test consigue instalarlo; el resto reutiliza el mismo
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
}

fn warnings_for(step: &str) -> Vec<String> {
    let needle = format!("step={step} ");
    RECORDS.lock()
           .unwrap()
           .iter()
           .filter(|(level, msg)| *level == Level::Warn && msg.contains(&needle))
           .map(|(_, msg)| msg.clone())
           .collect()
}

fn warn_sequence(name: &'static str) -> Sequence {
    let cfg = EngineConfig::default().with_type_checks(TypeChecks::Warn);
    Sequence::with_config(cfg).then(step!(|number: i64| Ok(number * 2)).named(name))
}

#[test]
fn warn_mode_coerces_and_logs() {
    install();
    let p = Payload::new();
    p.set("number", "21");

    assert_eq!(warn_sequence("double-coerced").run(p), Ok(Value::Int(42)));

    let warnings = warnings_for("double-coerced");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("coerced"));
    assert!(warnings[0].contains("actual=string expected=int"));
}

#[test]
fn warn_mode_reports_uncoercible_values_and_the_step_rejects_them() {
    install();
    let p = Payload::new();
    p.set("number", "three");

    assert_eq!(warn_sequence("double-rejected").run(p),
               Err(SequenceError::TypeMismatch { param: "number".into(),
                                                 actual: Kind::String,
                                                 expected: Kind::Int }));

    let warnings = warnings_for("double-rejected");
    assert!(warnings.iter().any(|w| w.contains("not coercible")));
    assert!(warnings.iter().all(|w| !w.contains("ignored")));
}

#[test]
fn matching_kinds_log_no_warning() {
    install();
    let p = Payload::new();
    p.set("number", 4);

    assert_eq!(warn_sequence("double-exact").run(p), Ok(Value::Int(8)));
    assert!(warnings_for("double-exact").is_empty());
}
