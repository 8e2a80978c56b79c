mod common;

use cmdreduce::config::{EffectOrdering, EffectsConfig, FailurePolicy};
use cmdreduce::dispatch::{Dispatcher, EffectError, EffectRegistry};
use cmdreduce::mvi::{from_fn, Outcome};
use cmdreduce::{resolve, Command};
use common::{delay, next_delivery, next_failure, recording_dispatcher, settle, RecordingSink};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::test]
async fn bare_state_is_returned_and_nothing_dispatched() {
    let (dispatcher, sink, _deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|state: Option<Value>, _: &Value| {
        Outcome::state(state.unwrap_or(Value::Null))
    });

    let next = resolve(&reducer, Some(json!({ "foo": "bar" })), &json!("anything"), &dispatcher);

    assert_eq!(next, json!({ "foo": "bar" }));
    settle(&dispatcher).await;
    assert!(sink.seen().is_empty());
}

#[tokio::test]
async fn command_result_is_dispatched_once_after_return() {
    let (dispatcher, sink, mut deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|state: Option<Value>, _: &Value| {
        Outcome::with_command(
            state.unwrap_or(Value::Null),
            Command::perform(delay, (json!({ "type": "second" }), 10)),
        )
    });

    let next = resolve(&reducer, Some(json!(1)), &json!({ "type": "first" }), &dispatcher);

    // Returned before the effect had a chance to finish.
    assert_eq!(next, json!(1));
    assert!(sink.seen().is_empty());

    let action = next_delivery(&mut deliveries).await;
    assert_eq!(action, json!({ "type": "second" }));
    settle(&dispatcher).await;
    assert_eq!(sink.seen().len(), 1);
}

#[tokio::test]
async fn falsy_results_are_never_dispatched() {
    let (dispatcher, sink, _deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|state: Option<Value>, _: &Value| {
        Outcome::with_commands(
            state.unwrap_or(Value::Null),
            [
                Command::run(|_: ()| None::<Value>, ()),
                Command::run(|_: ()| Some(Value::Null), ()),
                Command::run(|_: ()| Some(json!({ "type": "" })), ()),
                Command::perform(|_: ()| async { Some(json!({ "payload": 1 })) }, ()),
            ],
        )
    });

    let next = resolve(&reducer, None, &json!({ "type": "go" }), &dispatcher);

    assert_eq!(next, Value::Null);
    settle(&dispatcher).await;
    assert!(sink.seen().is_empty());
}

#[tokio::test]
async fn empty_slots_are_skipped() {
    let (dispatcher, _sink, mut deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::state(json!("s"))
            .and_slot(None)
            .and(Command::run(|_: ()| Some(json!({ "type": "ok" })), ()))
            .and_slot(None)
    });

    assert_eq!(resolve(&reducer, None, &json!({}), &dispatcher), json!("s"));
    assert_eq!(next_delivery(&mut deliveries).await, json!({ "type": "ok" }));
}

#[tokio::test]
async fn every_command_dispatches_independently() {
    let (dispatcher, sink, _deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_commands(
            json!(0),
            (0..5).map(|i| Command::perform(delay, (json!({ "type": i + 1 }), 5))),
        )
    });

    resolve(&reducer, None, &json!({}), &dispatcher);
    settle(&dispatcher).await;

    let mut kinds: Vec<i64> = sink
        .seen()
        .iter()
        .map(|a| a["type"].as_i64().unwrap())
        .collect();
    kinds.sort();
    assert_eq!(kinds, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn sequential_ordering_dispatches_in_declaration_order() {
    let (sink, _deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink.clone())
        .ordering(EffectOrdering::Sequential)
        .build()
        .unwrap();
    // Earlier commands are slower, so concurrent execution would reverse them.
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_commands(
            json!(0),
            [30, 20, 10].map(|ms| Command::perform(delay, (json!({ "type": ms }), ms))),
        )
    });

    resolve(&reducer, None, &json!({}), &dispatcher);
    assert_eq!(dispatcher.in_flight(), 1);
    settle(&dispatcher).await;

    let order: Vec<Value> = sink.seen().iter().map(|a| a["type"].clone()).collect();
    assert_eq!(order, vec![json!(30), json!(20), json!(10)]);
}

#[tokio::test]
async fn named_effects_resolve_through_the_registry() {
    let mut registry = EffectRegistry::<Value>::new();
    registry.register("double", |args: Value| async move {
        let n = args.as_i64().unwrap_or(0);
        Some(json!({ "type": "doubled", "value": n * 2 }))
    });
    let (sink, mut deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink).registry(registry).build().unwrap();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_command(json!(0), Command::named("double", json!(21)))
    });

    resolve(&reducer, None, &json!({}), &dispatcher);

    let action = next_delivery(&mut deliveries).await;
    assert_eq!(action["value"], json!(42));
}

#[tokio::test]
async fn unknown_named_effect_is_skipped() {
    let (dispatcher, sink, _deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_commands(json!("kept"), [Command::named("dubble", json!(21))])
    });

    let next = resolve(&reducer, None, &json!({}), &dispatcher);

    assert_eq!(next, json!("kept"));
    assert_eq!(dispatcher.in_flight(), 0);
    settle(&dispatcher).await;
    assert!(sink.seen().is_empty());
}

#[tokio::test]
async fn failing_effect_is_reported_not_dispatched() {
    let (failures_tx, mut failures) = mpsc::unbounded_channel();
    let (sink, _deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink.clone())
        .failure_policy(FailurePolicy::Silent)
        .report_failures(failures_tx)
        .build()
        .unwrap();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_command(
            json!(0),
            Command::perform(
                |_: ()| async { Err::<Option<Value>, _>(anyhow::anyhow!("upstream down")) },
                (),
            )
            .labeled("fetch"),
        )
    });

    resolve(&reducer, None, &json!({}), &dispatcher);

    let err = next_failure(&mut failures).await;
    assert!(matches!(&err, EffectError::Failed { label, .. } if label == "fetch"));
    assert!(err.to_string().contains("upstream down"));
    assert!(sink.seen().is_empty());
}

#[tokio::test]
async fn builder_applies_effects_config() {
    let config = EffectsConfig {
        ordering: EffectOrdering::Sequential,
        on_failure: FailurePolicy::Silent,
        warn_on_unknown_effect: false,
    };
    let (failures_tx, mut failures) = mpsc::unbounded_channel();
    let (sink, _deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink.clone())
        .config(&config)
        .report_failures(failures_tx)
        .build()
        .unwrap();
    assert_eq!(dispatcher.ordering(), EffectOrdering::Sequential);

    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_commands(
            json!(0),
            [
                Command::named("missing", json!(null)),
                Command::run(|_: ()| Err::<Option<Value>, _>(anyhow::anyhow!("bad input")), ())
                    .labeled("parse"),
                Command::perform(delay, (json!({ "type": "after" }), 1)),
            ],
        )
    });

    resolve(&reducer, None, &json!({}), &dispatcher);
    // Sequential: one task for the two runnable commands.
    assert_eq!(dispatcher.in_flight(), 1);

    let err = next_failure(&mut failures).await;
    assert_eq!(err.label(), "parse");
    settle(&dispatcher).await;
    assert_eq!(sink.seen(), vec![json!({ "type": "after" })]);
    assert!(failures.try_recv().is_err());
}

#[tokio::test]
async fn logged_failures_are_still_reported() {
    let (failures_tx, mut failures) = mpsc::unbounded_channel();
    let (sink, _deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink.clone())
        .failure_policy(FailurePolicy::Log)
        .warn_on_unknown_effect(true)
        .report_failures(failures_tx)
        .build()
        .unwrap();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_command(
            json!(0),
            Command::run(|_: ()| Err::<Option<Value>, _>(anyhow::anyhow!("disk full")), ())
                .labeled("save"),
        )
    });

    resolve(&reducer, None, &json!({}), &dispatcher);

    let err = next_failure(&mut failures).await;
    assert!(matches!(&err, EffectError::Failed { label, .. } if label == "save"));
    assert!(err.to_string().contains("disk full"));
    assert!(sink.seen().is_empty());
}

#[tokio::test]
async fn panicking_effect_is_reported_and_others_still_run() {
    let (failures_tx, mut failures) = mpsc::unbounded_channel();
    let (sink, mut deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink)
        .report_failures(failures_tx)
        .build()
        .unwrap();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_commands(
            json!(0),
            [
                Command::run(|_: ()| -> Option<Value> { panic!("effect blew up") }, ())
                    .labeled("explode"),
                Command::run(|_: ()| Some(json!({ "type": "survivor" })), ()),
            ],
        )
    });

    let next = resolve(&reducer, None, &json!({}), &dispatcher);
    assert_eq!(next, json!(0));

    let err = next_failure(&mut failures).await;
    assert!(matches!(
        &err,
        EffectError::Panicked { label, message }
            if label == "explode" && message == "effect blew up"
    ));
    assert_eq!(next_delivery(&mut deliveries).await, json!({ "type": "survivor" }));
}

#[tokio::test]
async fn effect_runs_after_resolve_returns() {
    let (dispatcher, _sink, _deliveries) = recording_dispatcher::<Value>();
    let calls = Arc::new(AtomicUsize::new(0));
    let reducer = {
        let calls = Arc::clone(&calls);
        from_fn(move |_: Option<Value>, _: &Value| {
            let calls = Arc::clone(&calls);
            Outcome::with_command(
                json!(0),
                Command::run(
                    move |_: ()| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        None::<Value>
                    },
                    (),
                ),
            )
        })
    };

    resolve(&reducer, None, &json!({}), &dispatcher);
    // Current-thread runtime: nothing spawned has been polled yet.
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    settle(&dispatcher).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
#[should_panic(expected = "reducer failure")]
async fn reducer_panic_propagates() {
    let (dispatcher, _sink, _deliveries) = recording_dispatcher::<Value>();
    let reducer = from_fn(|_: Option<Value>, _: &Value| -> Outcome<Value, Value> {
        panic!("reducer failure")
    });
    resolve(&reducer, None, &json!({}), &dispatcher);
}

#[tokio::test]
async fn dispatcher_passes_actions_straight_to_sink() {
    let (dispatcher, sink, _deliveries) = recording_dispatcher::<Value>();
    dispatcher.dispatch(json!({ "type": "direct" }));
    assert_eq!(sink.seen(), vec![json!({ "type": "direct" })]);
}

#[test]
fn building_outside_a_runtime_fails() {
    let (sink, _deliveries) = RecordingSink::<Value>::new();
    let result = Dispatcher::builder(sink).build();
    assert!(result.is_err());
}

#[test]
fn explicit_runtime_handle_is_used() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let (sink, _deliveries) = RecordingSink::<Value>::new();
    let dispatcher = Dispatcher::builder(sink.clone())
        .runtime(runtime.handle().clone())
        .build()
        .unwrap();
    let reducer = from_fn(|_: Option<Value>, _: &Value| {
        Outcome::with_command(json!(0), Command::perform(delay, (json!({ "type": "tick" }), 1)))
    });

    resolve(&reducer, None, &json!({}), &dispatcher);
    runtime.block_on(async {
        tokio::time::timeout(Duration::from_secs(2), dispatcher.idle())
            .await
            .unwrap()
    });
    assert_eq!(sink.seen(), vec![json!({ "type": "tick" })]);
}
