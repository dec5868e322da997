//! Eventer - 레지스트리와 디스패처를 묶은 공개 표면
//!
//! ## 사용법
//!
//! ```ignore
//! use eventer_core::Eventer;
//! use eventer_foundation::{args, Callback};
//!
//! let bus = Eventer::new();
//!
//! bus.on("pipe", Callback::sync(|a| Ok(a[0].as_i64().map(|v| (v + 1).into()))))
//!    .on("pipe", Callback::sync(|_| Ok(None)));
//!
//! let out = bus.emit_reduce("pipe", args![0])?.await?;
//! ```

use crate::dispatch::{Dispatched, Dispatcher, Emitted, Pending};
use crate::once;
use crate::registry::Registry;
use eventer_foundation::{
    Args, Callback, EventerConfig, HandlerRecord, IntoEventNames, OnOptions, Origin, Protocol,
    Result,
};
use serde_json::Value;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, Weak};

/// 이벤트 엔진
///
/// 복제 비용이 작은 핸들입니다. 복제본은 같은 레지스트리를 공유합니다.
#[derive(Clone)]
pub struct Eventer {
    registry: Arc<Registry>,
    dispatcher: Dispatcher,
    config: Arc<EventerConfig>,
}

impl Eventer {
    /// 기본 설정으로 생성
    pub fn new() -> Self {
        Self::with_config(EventerConfig::default())
    }

    /// 커스텀 설정으로 생성
    pub fn with_config(config: EventerConfig) -> Self {
        let registry = Arc::new(Registry::new());
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(registry.clone(), config.clone());

        Self {
            registry,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &EventerConfig {
        &self.config
    }

    /// 순환 참조 없이 핸들러 안에서 엔진을 참조할 때
    pub fn downgrade(&self) -> WeakEventer {
        WeakEventer {
            registry: Arc::downgrade(&self.registry),
            config: Arc::downgrade(&self.config),
        }
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// 핸들러 등록 (버킷 끝에 추가)
    #[track_caller]
    pub fn on(&self, names: impl IntoEventNames, callback: Callback) -> &Self {
        self.on_with(names, callback, OnOptions::default())
    }

    /// 옵션과 함께 핸들러 등록
    #[track_caller]
    pub fn on_with(
        &self,
        names: impl IntoEventNames,
        callback: Callback,
        options: OnOptions,
    ) -> &Self {
        let origin = origin_of(&options, Location::caller());
        let names = names.into_event_names();
        let id = self.registry.next_id();

        for event in names {
            self.registry.insert(
                HandlerRecord {
                    id,
                    event,
                    callback: callback.clone(),
                    listener: None,
                    prereqs: options.prereqs.clone(),
                    origin: origin.clone(),
                },
                options.order,
            );
        }

        self
    }

    /// 핸들러 제거
    ///
    /// `callback`이 `None`이면 버킷 전체를 비웁니다.
    pub fn off(&self, names: impl IntoEventNames, callback: Option<&Callback>) -> &Self {
        self.registry.remove(&names.into_event_names(), callback);
        self
    }

    /// 한 번만 실행되는 핸들러 등록
    ///
    /// 여러 이름으로 등록해도 전체에서 최대 한 번 실행됩니다.
    #[track_caller]
    pub fn once(&self, names: impl IntoEventNames, callback: Callback) -> &Self {
        self.once_with(names, callback, OnOptions::default())
    }

    #[track_caller]
    pub fn once_with(
        &self,
        names: impl IntoEventNames,
        callback: Callback,
        options: OnOptions,
    ) -> &Self {
        let origin = origin_of(&options, Location::caller());
        let names = names.into_event_names();
        let id = self.registry.next_id();
        let wrapper = once::wrap(
            Arc::downgrade(&self.registry),
            names.clone(),
            id,
            callback.clone(),
        );

        for event in names {
            self.registry.insert(
                HandlerRecord {
                    id,
                    event,
                    callback: wrapper.clone(),
                    listener: Some(callback.clone()),
                    prereqs: options.prereqs.clone(),
                    origin: origin.clone(),
                },
                options.order,
            );
        }

        self
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.listener_count(event)
    }

    /// 알려진 이벤트 이름 (meta 이름 제외, 순서 없음)
    pub fn event_names(&self) -> Vec<String> {
        self.registry.event_names()
    }

    /// 현재 등록된 레코드 (진단용 snapshot)
    pub fn handlers(&self, event: &str) -> Vec<HandlerRecord> {
        self.registry
            .snapshot(event)
            .iter()
            .map(|record| HandlerRecord::clone(record))
            .collect()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Parallel 발행: 버킷 순서의 결과 목록
    ///
    /// 리스너가 없으면 (permissive) `Emitted::Unhandled(첫 번째 인자)`.
    ///
    /// 검증과 snapshot은 호출 시점에 끝나지만 핸들러는 반환된 future를
    /// poll해야 실행됩니다. future를 버리면 핸들러는 하나도 호출되지 않습니다.
    /// 결과가 필요 없으면 `await`하거나 `tokio::spawn`에 넘기세요.
    pub fn emit(&self, event: &str, args: Args) -> Result<Pending<Emitted>> {
        self.dispatcher.parallel(event, args)
    }

    /// Reduce 발행: 파이프라인을 통과한 첫 번째 인자
    ///
    /// `emit`과 같이 lazy합니다. 반환된 future를 버리면 핸들러는 실행되지 않습니다.
    pub fn emit_reduce(&self, event: &str, args: Args) -> Result<Pending<Option<Value>>> {
        self.dispatcher.reduce(event, args)
    }

    /// Sync 발행: 호출 안에서 모든 핸들러 완료
    pub fn emit_sync(&self, event: &str, args: Args) -> Result<&Self> {
        self.dispatcher.sync(event, args)?;
        Ok(self)
    }

    /// 프로토콜 선택 발행 (`None`이면 설정의 기본 프로토콜)
    pub fn dispatch(
        &self,
        event: &str,
        args: Args,
        protocol: Option<Protocol>,
    ) -> Result<Pending<Dispatched>> {
        self.dispatcher.dispatch(event, args, protocol)
    }
}

impl Default for Eventer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Eventer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eventer")
            .field("events", &self.registry.event_names())
            .field("config", &self.config)
            .finish()
    }
}

fn origin_of(options: &OnOptions, location: &'static Location<'static>) -> Origin {
    match &options.source {
        Some(source) => Origin::named(source.clone()),
        None => Origin::from_location(location),
    }
}

// ============================================================================
// WeakEventer
// ============================================================================

/// 레지스트리를 소유하지 않는 핸들
#[derive(Clone)]
pub struct WeakEventer {
    registry: Weak<Registry>,
    config: Weak<EventerConfig>,
}

impl WeakEventer {
    pub fn upgrade(&self) -> Option<Eventer> {
        let registry = self.registry.upgrade()?;
        let config = self.config.upgrade()?;
        let dispatcher = Dispatcher::new(registry.clone(), config.clone());

        Some(Eventer {
            registry,
            dispatcher,
            config,
        })
    }
}

impl fmt::Debug for WeakEventer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEventer")
            .field("alive", &(self.registry.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventer_foundation::args;

    fn noop() -> Callback {
        Callback::sync(|_| Ok(None))
    }

    #[test]
    fn test_origin_and_prereqs_are_recorded() {
        let bus = Eventer::new();
        bus.on("foo", noop()).on_with(
            "foo",
            noop(),
            OnOptions::new()
                .with_source("plugin:auth")
                .with_prereqs(["db"]),
        );

        let records = bus.handlers("foo");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin.file(), Some(file!()));
        assert_eq!(records[1].origin.id(), "plugin:auth");
        assert_eq!(records[1].prereqs, vec!["db".to_string()]);
    }

    #[test]
    fn test_multi_name_registration_fans_out() {
        let bus = Eventer::new();
        bus.on(["a", "b", "c"], noop());

        for name in ["a", "b", "c"] {
            assert_eq!(bus.listener_count(name), 1);
        }
        let mut names = bus.event_names();
        names.sort();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_off_with_original_cancels_once() {
        let bus = Eventer::new();
        let cb = noop();
        bus.once("foo", cb.clone());
        assert_eq!(bus.listener_count("foo"), 1);

        bus.off("foo", Some(&cb));
        assert_eq!(bus.listener_count("foo"), 0);
    }

    #[test]
    fn test_weak_handle_does_not_keep_engine_alive() {
        let bus = Eventer::new();
        let weak = bus.downgrade();
        assert!(weak.upgrade().is_some());

        drop(bus);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_emit_sync_returns_host_for_chaining() {
        let bus = Eventer::new();
        bus.on("foo", noop());

        let host = bus.emit_sync("foo", args![]).unwrap();
        assert_eq!(host.listener_count("foo"), 1);
    }
}
