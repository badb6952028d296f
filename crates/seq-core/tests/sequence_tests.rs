//! Pruebas de la secuencia: append inmutable, modo simple y modo binding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use seq_core::{step, Payload, Sequence, SequenceError, Value};

fn payload_with_number(n: i64) -> Payload {
    let p = Payload::new();
    p.set("number", n);
    p
}

#[test]
fn then_does_not_alter_the_receiver() {
    let base = Sequence::new().then(step!(|value: i64| Ok(value + 1)));
    let before = base.run(1).unwrap();

    let extended = base.then(step!(|value: i64| Ok(value * 10)));

    assert_eq!(base.len(), 1);
    assert_eq!(extended.len(), 2);
    assert_eq!(base.run(1).unwrap(), before);
    assert_eq!(extended.run(1), Ok(Value::Int(20)));
}

#[test]
fn sibling_sequences_share_a_prefix_independently() {
    let prefix = Sequence::new().then(step!(|value: i64| Ok(value + 1)));
    let doubled = prefix.then(step!(|value: i64| Ok(value * 2)));
    let negated = prefix.then(step!(|value: i64| Ok(-value)));

    assert_eq!(doubled.run(3), Ok(Value::Int(8)));
    assert_eq!(negated.run(3), Ok(Value::Int(-4)));
    assert_eq!(prefix.run(3), Ok(Value::Int(4)));
}

#[test]
fn empty_sequence_returns_its_input() {
    assert_eq!(Sequence::new().run("unchanged"), Ok(Value::from("unchanged")));
}

#[test]
fn simple_mode_replaces_value_even_with_null() {
    let seq = Sequence::new().then(step!(|value: i64| {
                                  let _ = value;
                                  Ok(())
                              }))
                             .then(step!(|value: Value| Ok(value.is_null())));
    assert_eq!(seq.run(5), Ok(Value::Bool(true)));
}

#[test]
fn simple_mode_ignores_target_field() {
    let seq = Sequence::new().then_into(step!(|value: i64| Ok(value + 1)), "number");
    assert_eq!(seq.run(1), Ok(Value::Int(2)));
}

#[test]
fn null_return_keeps_the_same_payload_instance() {
    let p = payload_with_number(1);
    let seq = Sequence::new().then(step!(|payload: Payload| {
                                  let n = payload.get("number")?.as_int().unwrap_or_default();
                                  payload.set("number", n + 1);
                                  Ok(())
                              }));

    let out = seq.run(p.clone()).unwrap();
    let out = out.as_payload().expect("payload threaded through");
    assert!(out.same_instance(&p));
    assert_eq!(p.get("number"), Ok(Value::Int(2)));
}

#[test]
fn non_null_return_replaces_the_payload() {
    let seq = Sequence::new().then(step!(|number: i64| Ok(number * 100)))
                             .then(step!(|value: i64| Ok(value + 1)));
    assert_eq!(seq.run(payload_with_number(2)), Ok(Value::Int(201)));
}

#[test]
fn target_field_merge_skips_null_results() {
    let p = payload_with_number(1);
    let seq = Sequence::new().then_into(step!(|number: i64| {
                                            let _ = number;
                                            Ok(())
                                        }),
                                        "number");
    seq.run(p.clone()).unwrap();
    assert_eq!(p.get("number"), Ok(Value::Int(1)));

    let seq = Sequence::new().then_into(step!(|| Ok(5)), "number");
    seq.run(p.clone()).unwrap();
    assert_eq!(p.get("number"), Ok(Value::Int(5)));
}

#[test]
fn target_field_can_create_new_fields() {
    let seq = Sequence::new().then_into(step!(|number: i64| Ok(number * number)), "Square");
    let out = seq.run(payload_with_number(7)).unwrap();
    assert_eq!(out.as_payload().unwrap().get("square"), Ok(Value::Int(49)));
}

#[test]
fn recursion_guard_rejects_payload_into_field() {
    let seq = Sequence::new().then_into(step!(|payload: Payload| Ok(payload)), "copy");
    let err = seq.run(Payload::new()).unwrap_err();
    assert!(matches!(err, SequenceError::Recursion { ref field, .. } if field == "copy"));
}

#[test]
fn missing_field_aborts_the_run_without_rollback() {
    let p = payload_with_number(1);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let seq = Sequence::new().then_into(step!(|number: i64| Ok(number + 1)), "number")
                             .then(step!(|absent: i64| Ok(absent)))
                             .then(step!(|payload: Payload| {
                                 counter.fetch_add(1, Ordering::SeqCst);
                                 let _ = payload;
                                 Ok(())
                             }));

    let err = seq.run(p.clone()).unwrap_err();
    assert_eq!(err, SequenceError::MissingField("absent".into()));
    assert_eq!(p.get("number"), Ok(Value::Int(2)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn step_failure_propagates_after_in_place_mutation() {
    let p = payload_with_number(1);
    let seq = Sequence::new().then(step!(|payload: Payload| {
                                  payload.set("touched", true);
                                  Err::<(), _>(SequenceError::step("disk full"))
                              }));

    assert_eq!(seq.run(p.clone()), Err(SequenceError::step("disk full")));
    assert!(p.has("touched"));
}

#[test]
fn nested_sequence_runs_as_a_payload_step() {
    let inner = Sequence::new().then_into(step!(|number: i64| Ok(number + 10)), "number");
    let outer = Sequence::new().then(inner)
                               .then_into(step!(|number: i64| Ok(number * 2)), "number");

    let p = payload_with_number(1);
    let out = outer.call(p.clone()).unwrap();
    assert!(out.as_payload().unwrap().same_instance(&p));
    assert_eq!(p.get("number"), Ok(Value::Int(22)));
}

#[test]
fn entries_list_labels_and_targets_in_order() {
    let seq = Sequence::new().then(step!(|| Ok(())).named("first"))
                             .then_into(step!(|| Ok(1)).named("second"), "number");
    let entries: Vec<_> = seq.entries().collect();
    assert_eq!(entries, vec![("first", None), ("second", Some("number"))]);
}

#[test]
fn sequences_run_concurrently_on_distinct_payloads() {
    let seq = Sequence::new().then_into(step!(|number: i64| Ok(number + 1)), "number");
    let handles: Vec<_> = (0..4).map(|i| {
                                    let seq = seq.clone();
                                    std::thread::spawn(move || {
                                        let p = payload_with_number(i);
                                        seq.run(p.clone()).unwrap();
                                        p.get("number").unwrap()
                                    })
                                })
                                .collect();
    let results: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, (1..5).map(Value::Int).collect::<Vec<_>>());
}
