//! Parallel 프로토콜
//!
//! 모든 핸들러를 같은 인자로 호출하고 모두 완료될 때까지 기다립니다.
//! 결과는 버킷 순서대로 정렬되지만 완료 순서는 보장하지 않습니다.
//! 실패가 여러 개면 폴링 중 먼저 관찰된 실패가 보고됩니다 (비결정적).

use super::detach;
use crate::monitor::PendingMonitor;
use crate::registry::Bucket;
use eventer_foundation::{Error, EventerConfig, HandlerResult, Result};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// parallel 실행 옵션
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ParallelOptions {
    pub detach_on_failure: bool,
    pub monitor: Option<Duration>,
}

impl From<&EventerConfig> for ParallelOptions {
    fn from(config: &EventerConfig) -> Self {
        Self {
            detach_on_failure: config.detach_on_failure,
            monitor: config.monitor_interval(),
        }
    }
}

enum Step<T> {
    Settled(Option<T>),
    Tick,
}

pub(crate) async fn run(
    event: &str,
    bucket: Bucket,
    args: &[Value],
    options: ParallelOptions,
) -> Result<Vec<Option<Value>>> {
    // 모든 핸들러를 먼저 시작한 뒤 기다림
    let mut pending: FuturesUnordered<BoxFuture<'static, (usize, HandlerResult)>> = bucket
        .iter()
        .enumerate()
        .map(|(index, record)| {
            trace!(
                event = %event,
                handler_id = %record.id,
                origin = %record.origin,
                "Invoking handler"
            );
            let fut = record.callback.call(args.to_vec()).into_future();
            async move { (index, fut.await) }.boxed()
        })
        .collect();

    let mut results = vec![None; bucket.len()];
    let mut monitor = PendingMonitor::start(event, &bucket, options.monitor);

    loop {
        let step = match monitor.as_mut() {
            Some(monitor) => tokio::select! {
                next = pending.next() => Step::Settled(next),
                _ = monitor.tick() => Step::Tick,
            },
            None => Step::Settled(pending.next().await),
        };

        match step {
            Step::Tick => {
                if let Some(monitor) = &monitor {
                    monitor.report();
                }
            }
            Step::Settled(None) => break,
            Step::Settled(Some((index, Ok(value)))) => {
                results[index] = value;
                if let Some(monitor) = monitor.as_mut() {
                    monitor.settle(index);
                }
            }
            Step::Settled(Some((index, Err(error)))) => {
                debug!(
                    event = %event,
                    handler_id = %bucket[index].id,
                    outstanding = pending.len(),
                    "Handler failed"
                );
                if options.detach_on_failure && !pending.is_empty() {
                    detach(
                        async move { pending.for_each(|_| async {}).await },
                        "parallel siblings",
                    );
                }
                return Err(Error::handler(event, error));
            }
        }
    }

    Ok(results)
}
