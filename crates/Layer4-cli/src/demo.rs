//! 데모 핸들러 - CLI에서 바로 발행해 볼 수 있는 이벤트 모음
//!
//! | 이벤트  | 동작 |
//! |---------|------|
//! | `greet` | 인사말 반환 (두 핸들러) |
//! | `pipe`  | 숫자는 +1, 문자열은 접미사 추가 (reduce용) |
//! | `slow`  | 지연 후 반환 (모니터 확인용) |
//! | `fail`  | 항상 거부 |
//! | `ready` | 첫 발행에만 반응 (once) |

use eventer_core::{Callback, Eventer, OnOptions, Rejection, META_POST_EMIT, META_PRE_EMIT};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

/// 데모 핸들러와 meta hook 등록
pub fn install(bus: &Eventer) {
    bus.on(META_PRE_EMIT, trace_hook("pre"))
        .on(META_POST_EMIT, trace_hook("post"));

    bus.on_with(
        "greet",
        greeter("Hello"),
        OnOptions::new().with_source("demo:greet-en"),
    )
    .on_with(
        "greet",
        greeter("안녕하세요"),
        OnOptions::new().with_source("demo:greet-ko"),
    );

    for suffix in ["a", "b", "c"] {
        let options = OnOptions::new().with_source(format!("demo:pipe-{}", suffix));
        bus.on_with("pipe", step(suffix), options);
    }

    bus.on(
        "slow",
        Callback::future(|args| async move {
            let ms = args.first().and_then(Value::as_u64).unwrap_or(250);
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(Some(json!({ "sleptMs": ms })))
        }),
    );

    bus.on(
        "fail",
        Callback::sync(|args| {
            let reason = args.into_iter().next().unwrap_or_else(|| json!("demo failure"));
            Err(Rejection::new(reason).into())
        }),
    );

    bus.once("ready", Callback::sync(|_| Ok(Some(json!("first and only")))));
}

fn trace_hook(phase: &'static str) -> Callback {
    Callback::sync(move |args| {
        let event = args.first().and_then(Value::as_str).unwrap_or_default();
        info!(phase, event, args = args.len().saturating_sub(1), "Meta hook");
        Ok(None)
    })
}

fn greeter(greeting: &'static str) -> Callback {
    Callback::sync(move |args| {
        let name = args.first().and_then(Value::as_str).unwrap_or("world");
        Ok(Some(json!(format!("{}, {}!", greeting, name))))
    })
}

fn step(suffix: &'static str) -> Callback {
    Callback::sync(move |args| {
        Ok(match args.first() {
            Some(Value::Number(n)) => n.as_i64().map(|v| json!(v + 1)),
            Some(Value::String(s)) => Some(json!(format!("{}{}", s, suffix))),
            _ => None,
        })
    })
}

/// 명령행 인자를 JSON 값으로 해석 (실패하면 문자열)
pub fn parse_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventer_core::args;

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg("42"), json!(42));
        assert_eq!(parse_arg("{\"a\":1}"), json!({ "a": 1 }));
        assert_eq!(parse_arg("hello"), json!("hello"));
    }

    #[test]
    fn test_demo_events_registered() {
        let bus = Eventer::new();
        install(&bus);

        let mut names = bus.event_names();
        names.sort();
        assert_eq!(names, vec!["fail", "greet", "pipe", "ready", "slow"]);
    }

    #[tokio::test]
    async fn test_pipe_reduces() {
        let bus = Eventer::new();
        install(&bus);

        let out = bus.emit_reduce("pipe", args!["!"]).unwrap().await.unwrap();
        assert_eq!(out, Some(json!("!abc")));

        let out = bus.emit_reduce("pipe", args![0]).unwrap().await.unwrap();
        assert_eq!(out, Some(json!(3)));
    }

    #[tokio::test]
    async fn test_greet_in_parallel() {
        let bus = Eventer::new();
        install(&bus);

        let out = bus.emit("greet", args!["Rust"]).unwrap().await.unwrap();
        assert_eq!(
            out.into_results(),
            vec![Some(json!("Hello, Rust!")), Some(json!("안녕하세요, Rust!"))]
        );
    }
}
