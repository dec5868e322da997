//! Handler Record - 등록된 구독 한 건

use super::callback::Callback;
use std::fmt;
use std::panic::Location;

/// 핸들러 레코드 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler-{}", self.0)
    }
}

// ============================================================================
// Order / OnOptions
// ============================================================================

/// 버킷 삽입 위치 (등록 시 한 번만 사용)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Append,
    Prepend,
}

/// 등록 옵션
#[derive(Debug, Clone, Default)]
pub struct OnOptions {
    /// 등록 위치 라벨 (없으면 호출 위치)
    pub source: Option<String>,

    /// 삽입 위치
    pub order: Order,

    /// 선행 조건 라벨 (저장만 하고 dispatch에서는 사용하지 않음)
    pub prereqs: Vec<String>,
}

impl OnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 버킷 앞쪽에 삽입
    pub fn prepend(mut self) -> Self {
        self.order = Order::Prepend;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_prereqs<I, S>(mut self, prereqs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prereqs = prereqs.into_iter().map(Into::into).collect();
        self
    }
}

// ============================================================================
// Origin
// ============================================================================

/// 등록이 일어난 위치 (진단용)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    id: String,
    file: Option<&'static str>,
    line: Option<u32>,
}

impl Origin {
    /// 호출자 위치 캡처
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            id: format!("{} +{}", location.file(), location.line()),
            file: Some(location.file()),
            line: Some(location.line()),
        }
    }

    /// 명시적 라벨
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            id: label.into(),
            file: None,
            line: None,
        }
    }

    pub fn unknown() -> Self {
        Self::named("unknown")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn file(&self) -> Option<&'static str> {
        self.file
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

// ============================================================================
// HandlerRecord
// ============================================================================

/// 등록된 구독 한 건
///
/// 생성 후에는 변경되지 않습니다. 제거는 항상 버킷 전체를 교체합니다.
#[derive(Debug, Clone)]
pub struct HandlerRecord {
    pub id: HandlerId,

    /// 소속 이벤트 이름
    pub event: String,

    /// 실제로 호출되는 콜백
    pub callback: Callback,

    /// once 래퍼인 경우 사용자가 넘긴 원래 콜백
    pub listener: Option<Callback>,

    pub prereqs: Vec<String>,

    pub origin: Origin,
}

impl HandlerRecord {
    /// 콜백 identity 매칭 (once 래퍼의 원래 콜백 포함)
    pub fn matches(&self, callback: &Callback) -> bool {
        self.callback.same(callback)
            || self
                .listener
                .as_ref()
                .is_some_and(|original| original.same(callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_origin_points_here() {
        let origin = Origin::caller();
        assert_eq!(origin.file(), Some(file!()));
        assert!(origin.id().contains("record.rs +"));
    }

    #[test]
    fn test_options_builder() {
        let opts = OnOptions::new()
            .prepend()
            .with_source("plugin-a")
            .with_prereqs(["db", "cache"]);

        assert_eq!(opts.order, Order::Prepend);
        assert_eq!(opts.source.as_deref(), Some("plugin-a"));
        assert_eq!(opts.prereqs, vec!["db".to_string(), "cache".to_string()]);
    }

    #[test]
    fn test_record_matches_wrapped_listener() {
        let original = Callback::sync(|_| Ok(None));
        let wrapper = Callback::sync(|_| Ok(None));
        let record = HandlerRecord {
            id: HandlerId::new(1),
            event: "foo".into(),
            callback: wrapper.clone(),
            listener: Some(original.clone()),
            prereqs: vec![],
            origin: Origin::unknown(),
        };

        assert!(record.matches(&wrapper));
        assert!(record.matches(&original));
        assert!(!record.matches(&Callback::sync(|_| Ok(None))));
    }
}
