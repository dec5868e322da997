//! Pending Monitor - 아직 완료되지 않은 핸들러를 주기적으로 로그
//!
//! 진단 전용입니다. dispatch 결과나 순서에는 영향을 주지 않습니다.

use crate::registry::Bucket;
use std::time::{Duration, Instant};
use tokio::time::{interval_at, Interval, MissedTickBehavior};
use tracing::warn;

pub(crate) struct PendingMonitor {
    event: String,
    records: Bucket,
    settled: Vec<bool>,
    started: Instant,
    ticker: Interval,
}

impl PendingMonitor {
    /// tokio 런타임이 없으면 모니터 없이 진행
    pub(crate) fn start(event: &str, records: &Bucket, every: Option<Duration>) -> Option<Self> {
        let every = every?;
        tokio::runtime::Handle::try_current().ok()?;

        let mut ticker = interval_at(tokio::time::Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Some(Self {
            event: event.to_string(),
            records: records.clone(),
            settled: vec![false; records.len()],
            started: Instant::now(),
            ticker,
        })
    }

    pub(crate) async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    pub(crate) fn settle(&mut self, index: usize) {
        if let Some(slot) = self.settled.get_mut(index) {
            *slot = true;
        }
    }

    pub(crate) fn pending(&self) -> Vec<String> {
        self.records
            .iter()
            .zip(&self.settled)
            .filter(|(_, settled)| !**settled)
            .map(|(record, _)| format!("{} ({})", record.id, record.origin))
            .collect()
    }

    pub(crate) fn report(&self) {
        let pending = self.pending();
        warn!(
            event = %self.event,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            pending = pending.len(),
            handlers = ?pending,
            "Handlers still pending"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventer_foundation::{Callback, HandlerId, HandlerRecord, Origin};
    use std::sync::Arc;

    fn bucket(n: u64) -> Bucket {
        Arc::new(
            (1..=n)
                .map(|i| {
                    Arc::new(HandlerRecord {
                        id: HandlerId::new(i),
                        event: "slow".into(),
                        callback: Callback::sync(|_| Ok(None)),
                        listener: None,
                        prereqs: vec![],
                        origin: Origin::named(format!("site-{}", i)),
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn test_no_monitor_without_interval_or_runtime() {
        let records = bucket(1);
        assert!(PendingMonitor::start("slow", &records, None).is_none());
        assert!(PendingMonitor::start("slow", &records, Some(Duration::from_millis(5))).is_none());
    }

    #[tokio::test]
    async fn test_pending_list_shrinks() {
        let records = bucket(3);
        let mut monitor =
            PendingMonitor::start("slow", &records, Some(Duration::from_millis(5))).unwrap();

        monitor.settle(1);
        assert_eq!(
            monitor.pending(),
            vec!["handler-1 (site-1)".to_string(), "handler-3 (site-3)".to_string()]
        );

        monitor.tick().await;
        monitor.report();
    }
}
