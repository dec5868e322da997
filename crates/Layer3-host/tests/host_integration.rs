//! Host 레이어 통합 테스트: forwarding, proxy, deferred

use eventer_core::{args, Callback, Emitted, Eventer, EventerConfig, Rejection};
use eventer_host::{forward, proxy, Deferred, EventerExt, HasEventer, Hosted, Settlement};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

fn capture(tx: mpsc::UnboundedSender<Vec<Value>>) -> Callback {
    Callback::sync(move |args| {
        let _ = tx.send(args);
        Ok(None)
    })
}

// ============================================================================
// Forward / Proxy
// ============================================================================

#[tokio::test]
async fn test_forward_awaits_target_handlers() {
    let source = Eventer::new();
    let target = Eventer::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    target.on(
        "hello",
        Callback::future(move |args| {
            let sink = sink.clone();
            async move {
                sleep(Duration::from_millis(10)).await;
                sink.lock().unwrap().push(args);
                Ok(None)
            }
        }),
    );
    let _routes = forward(&source, &target, &["hello"]);

    source.emit("hello", args!["world"]).unwrap().await.unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![vec![json!("world")]]);
}

#[tokio::test]
async fn test_forward_propagates_target_failure() {
    let source = Eventer::new();
    let target = Eventer::new();
    target.on("hello", Callback::sync(|_| Err(Rejection::new("denied").into())));
    let _routes = forward(&source, &target, &["hello"]);

    let err = source.emit("hello", args![]).unwrap().await.unwrap_err();
    assert!(err.is_handler_failure());
    assert_eq!(err.event(), Some("hello"));
}

#[tokio::test]
async fn test_forward_stop() {
    let source = Eventer::new();
    let target = Eventer::with_config(EventerConfig::strict());
    let (tx, mut rx) = mpsc::unbounded_channel();
    target.on("ping", capture(tx));

    let routes = forward(&source, &target, &["ping"]);
    assert!(source.emit("ping", args![1]).unwrap().await.unwrap().is_handled());
    routes.stop();
    let unrouted = source.emit("ping", args![2]).unwrap().await.unwrap();
    assert_eq!(unrouted, Emitted::Unhandled(Some(json!(2))));

    assert_eq!(rx.recv().await, Some(vec![json!(1)]));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_proxy_forwards_every_dispatch() {
    let source = Hosted::new("emitter1");
    let target = Hosted::new("emitter2");
    let (tx, mut rx) = mpsc::unbounded_channel();

    target.on("hello", capture(tx.clone())).on("pipe", capture(tx));
    source
        .on("hello", Callback::sync(|_| Ok(None)))
        .on("pipe", Callback::sync(|_| Ok(None)));
    let _routes = proxy(&source, &target);

    source.emit("hello", args!["world"]).unwrap().await.unwrap();
    source.emit_reduce("pipe", args![5]).unwrap().await.unwrap();

    let wait = Duration::from_millis(500);
    assert_eq!(timeout(wait, rx.recv()).await.unwrap(), Some(vec![json!("world")]));
    assert_eq!(timeout(wait, rx.recv()).await.unwrap(), Some(vec![json!(5)]));
    assert_eq!(*source, "emitter1");
}

#[tokio::test]
async fn test_proxy_skips_unknown_target_events() {
    let source = Eventer::new();
    let target = Eventer::with_config(EventerConfig::strict());
    source.on("only-here", Callback::sync(|_| Ok(Some(json!(1)))));
    let _routes = proxy(&source, &target);

    let results = source.emit("only-here", args![]).unwrap().await.unwrap();
    assert_eq!(results, Emitted::Handled(vec![Some(json!(1))]));
}

// ============================================================================
// Deferred
// ============================================================================

#[tokio::test]
async fn test_deferred_resolves_from_handler_event() {
    let bus = Eventer::new();
    let deferred = Deferred::attach(&bus);
    let waiting = deferred.then(|value| value["rows"].as_u64().unwrap_or(0));

    let emitter = bus.clone();
    tokio::spawn(async move {
        sleep(Duration::from_millis(10)).await;
        emitter
            .emit("end", args![json!({ "rows": 3 })])
            .unwrap()
            .await
            .unwrap();
    });

    assert_eq!(waiting.await.unwrap(), 3);
    assert!(deferred.is_settled());
}

#[tokio::test]
async fn test_deferred_rejection_wins_when_first() {
    let bus = Eventer::new();
    let deferred = Deferred::attach(&bus);

    deferred.reject("timeout").unwrap();
    deferred.resolve(1).unwrap();

    assert_eq!(
        deferred.settlement(),
        Some(Settlement::Rejected(json!("timeout")))
    );
    let err = deferred.wait().await.unwrap_err();
    assert_eq!(err.rejection(), Some(&json!("timeout")));
}

#[tokio::test]
async fn test_deferred_on_host_type() {
    struct Job {
        events: Eventer,
    }

    impl HasEventer for Job {
        fn eventer(&self) -> &Eventer {
            &self.events
        }
    }

    let job = Job {
        events: Eventer::new(),
    };
    let deferred = Deferred::attach(job.eventer());

    job.emit_sync("end", args!["ok"]).unwrap();
    assert_eq!(deferred.wait().await.unwrap(), json!("ok"));
    assert_eq!(job.listener_count("end"), 1);
}
