//! Handler Registry - 이벤트 이름별 핸들러 버킷
//!
//! 버킷은 `Arc<Vec<..>>`로 보관되며 변경은 항상 새 버킷으로 교체합니다.
//! dispatch는 버킷 `Arc`를 복제(snapshot)해서 순회하므로 핸들러 안에서
//! 일어나는 등록/제거가 진행 중인 dispatch에 영향을 주지 않습니다.

use eventer_foundation::{is_meta, Callback, HandlerId, HandlerRecord, Order};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// 이벤트 하나의 핸들러 목록 (snapshot 단위)
pub type Bucket = Arc<Vec<Arc<HandlerRecord>>>;

/// 핸들러 레지스트리
#[derive(Debug, Default)]
pub struct Registry {
    /// 이벤트 이름 -> 버킷
    buckets: RwLock<HashMap<String, Bucket>>,

    /// 등록 ID 카운터
    next_id: AtomicU64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 등록 ID 할당
    ///
    /// 여러 이름으로 등록해도 한 번의 등록은 하나의 ID를 공유합니다.
    pub fn next_id(&self) -> HandlerId {
        HandlerId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// 레코드 삽입 (버킷 교체)
    pub fn insert(&self, record: HandlerRecord, order: Order) {
        debug!(
            event = %record.event,
            handler_id = %record.id,
            origin = %record.origin,
            prereqs = ?record.prereqs,
            ?order,
            "Registered subscriber"
        );

        let record = Arc::new(record);
        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(record.event.clone()).or_default();

        let mut next = Vec::with_capacity(bucket.len() + 1);
        match order {
            Order::Append => {
                next.extend(bucket.iter().cloned());
                next.push(record);
            }
            Order::Prepend => {
                next.push(record);
                next.extend(bucket.iter().cloned());
            }
        }
        *bucket = Arc::new(next);
    }

    /// 콜백 identity로 제거, `None`이면 버킷 비우기
    ///
    /// 없는 이름이나 등록된 적 없는 콜백은 무시합니다.
    pub fn remove(&self, names: &[String], callback: Option<&Callback>) {
        let mut buckets = self.buckets.write();
        for name in names {
            let Some(bucket) = buckets.get_mut(name) else {
                continue;
            };

            match callback {
                Some(callback) => {
                    if bucket.iter().any(|r| r.matches(callback)) {
                        debug!(event = %name, "Remove listener");
                        *bucket = filtered(bucket, |r| !r.matches(callback));
                    }
                }
                None => {
                    debug!(event = %name, removed = bucket.len(), "Remove all listeners");
                    *bucket = Bucket::default();
                }
            }
        }
    }

    /// 등록 ID로 제거 (once 래퍼가 사용)
    pub fn remove_id(&self, names: &[String], id: HandlerId) {
        let mut buckets = self.buckets.write();
        for name in names {
            if let Some(bucket) = buckets.get_mut(name) {
                if bucket.iter().any(|r| r.id == id) {
                    *bucket = filtered(bucket, |r| r.id != id);
                }
            }
        }
    }

    /// 현재 버킷 snapshot (없으면 빈 버킷)
    pub fn snapshot(&self, event: &str) -> Bucket {
        self.buckets
            .read()
            .get(event)
            .cloned()
            .unwrap_or_default()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.buckets.read().get(event).map_or(0, |b| b.len())
    }

    /// 버킷이 있거나 있었던 이벤트 이름 (meta 이름 제외, 순서 없음)
    pub fn event_names(&self) -> Vec<String> {
        self.buckets
            .read()
            .keys()
            .filter(|name| !is_meta(name))
            .cloned()
            .collect()
    }
}

fn filtered(bucket: &Bucket, keep: impl Fn(&HandlerRecord) -> bool) -> Bucket {
    Arc::new(bucket.iter().filter(|r| keep(r)).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventer_foundation::{Origin, META_PRE_EMIT};

    fn record(registry: &Registry, event: &str, callback: &Callback) -> HandlerRecord {
        HandlerRecord {
            id: registry.next_id(),
            event: event.to_string(),
            callback: callback.clone(),
            listener: None,
            prereqs: vec![],
            origin: Origin::named("test"),
        }
    }

    fn noop() -> Callback {
        Callback::sync(|_| Ok(None))
    }

    #[test]
    fn test_insert_order() {
        let registry = Registry::new();
        let (a, b, c) = (noop(), noop(), noop());

        registry.insert(record(&registry, "foo", &a), Order::Append);
        registry.insert(record(&registry, "foo", &b), Order::Append);
        registry.insert(record(&registry, "foo", &c), Order::Prepend);

        let bucket = registry.snapshot("foo");
        assert_eq!(bucket.len(), 3);
        assert!(bucket[0].callback.same(&c));
        assert!(bucket[1].callback.same(&a));
        assert!(bucket[2].callback.same(&b));
    }

    #[test]
    fn test_remove_by_identity_keeps_order() {
        let registry = Registry::new();
        let (a, b, c) = (noop(), noop(), noop());
        for cb in [&a, &b, &c] {
            registry.insert(record(&registry, "foo", cb), Order::Append);
        }

        registry.remove(&["foo".to_string()], Some(&b));

        let bucket = registry.snapshot("foo");
        assert_eq!(bucket.len(), 2);
        assert!(bucket[0].callback.same(&a));
        assert!(bucket[1].callback.same(&c));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = Registry::new();
        registry.remove(&["ghost".to_string()], None);
        registry.remove(&["ghost".to_string()], Some(&noop()));

        let a = noop();
        registry.insert(record(&registry, "foo", &a), Order::Append);
        registry.remove(&["foo".to_string()], Some(&noop()));
        assert_eq!(registry.listener_count("foo"), 1);
        assert_eq!(registry.listener_count("ghost"), 0);
    }

    #[test]
    fn test_snapshot_is_isolated_from_mutation() {
        let registry = Registry::new();
        let a = noop();
        registry.insert(record(&registry, "foo", &a), Order::Append);

        let snapshot = registry.snapshot("foo");
        registry.insert(record(&registry, "foo", &noop()), Order::Append);
        registry.remove(&["foo".to_string()], Some(&a));

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot[0].callback.same(&a));
        assert_eq!(registry.listener_count("foo"), 1);
    }

    #[test]
    fn test_clear_keeps_name_with_zero_listeners() {
        let registry = Registry::new();
        registry.insert(record(&registry, "foo", &noop()), Order::Append);
        registry.remove(&["foo".to_string()], None);

        assert_eq!(registry.listener_count("foo"), 0);
        assert_eq!(registry.event_names(), vec!["foo".to_string()]);
    }

    #[test]
    fn test_event_names_hide_meta() {
        let registry = Registry::new();
        registry.insert(record(&registry, "foo", &noop()), Order::Append);
        registry.insert(record(&registry, META_PRE_EMIT, &noop()), Order::Append);

        assert_eq!(registry.event_names(), vec!["foo".to_string()]);
        assert_eq!(registry.listener_count(META_PRE_EMIT), 1);
    }

    #[test]
    fn test_remove_id_across_names() {
        let registry = Registry::new();
        let id = registry.next_id();
        let cb = noop();
        for name in ["a", "b"] {
            registry.insert(
                HandlerRecord {
                    id,
                    event: name.to_string(),
                    callback: cb.clone(),
                    listener: None,
                    prereqs: vec![],
                    origin: Origin::unknown(),
                },
                Order::Append,
            );
        }
        registry.insert(record(&registry, "a", &noop()), Order::Append);

        registry.remove_id(&["a".to_string(), "b".to_string()], id);
        assert_eq!(registry.listener_count("a"), 1);
        assert_eq!(registry.listener_count("b"), 0);
    }
}
