//! Error types for Eventer
//!
//! 모든 에러를 중앙에서 관리

use serde_json::Value;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Eventer 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 사용 오류 (호출 즉시 보고)
    // ========================================================================
    /// 빈 이벤트 이름, sync 모드 계약 위반 등
    #[error("Usage error: {0}")]
    Usage(String),

    /// strict 모드에서 리스너가 없는 이벤트에 emit
    #[error("Attempt to emit on unknown event \"{0}\"")]
    UnknownEvent(String),

    // ========================================================================
    // 핸들러 실패
    // ========================================================================
    #[error("Handler failed on \"{event}\": {source}")]
    Handler {
        event: String,
        #[source]
        source: anyhow::Error,
    },

    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Usage 에러 생성 헬퍼
    pub fn usage(message: impl Into<String>) -> Self {
        Error::Usage(message.into())
    }

    /// 핸들러 실패 생성 헬퍼
    pub fn handler(event: impl Into<String>, source: anyhow::Error) -> Self {
        Error::Handler {
            event: event.into(),
            source,
        }
    }

    /// 잘못된 사용 (빈 이름, sync 발행의 deferred 결과 등)
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    /// future 없이 호출 즉시 보고되는 에러인지 확인 (usage + unknown 이벤트)
    pub fn is_immediate(&self) -> bool {
        matches!(self, Error::Usage(_) | Error::UnknownEvent(_))
    }

    /// 핸들러 실패인지 확인
    pub fn is_handler_failure(&self) -> bool {
        matches!(self, Error::Handler { .. })
    }

    /// 실패한 이벤트 이름 (핸들러 실패만)
    pub fn event(&self) -> Option<&str> {
        match self {
            Error::Handler { event, .. } => Some(event),
            _ => None,
        }
    }

    /// 핸들러가 [`Rejection`]으로 실패했다면 그 값을 꺼냄
    pub fn rejection(&self) -> Option<&Value> {
        match self {
            Error::Handler { source, .. } => source.downcast_ref::<Rejection>().map(|r| &r.0),
            _ => None,
        }
    }
}

/// 임의의 값으로 실패를 표현하는 핸들러 에러
///
/// 핸들러가 `Err(Rejection(json!(1)).into())`를 반환하면 dispatch 호출자는
/// [`Error::rejection`]으로 같은 값을 돌려받습니다.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("rejected with {0}")]
pub struct Rejection(pub Value);

impl Rejection {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rejection_roundtrip() {
        let err = Error::handler("foo", Rejection::new(json!(1)).into());
        assert!(err.is_handler_failure());
        assert_eq!(err.event(), Some("foo"));
        assert_eq!(err.rejection(), Some(&json!(1)));
    }

    #[test]
    fn test_plain_handler_failure_has_no_rejection() {
        let err = Error::handler("foo", anyhow::anyhow!("boom"));
        assert!(err.rejection().is_none());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_usage_classification() {
        assert!(Error::usage("empty").is_usage());
        assert!(!Error::UnknownEvent("x".into()).is_usage());
        assert!(!Error::Config("x".into()).is_usage());

        assert!(Error::usage("empty").is_immediate());
        assert!(Error::UnknownEvent("x".into()).is_immediate());
        assert!(!Error::handler("x", anyhow::anyhow!("boom")).is_immediate());
        assert_eq!(
            Error::UnknownEvent("bar".into()).to_string(),
            "Attempt to emit on unknown event \"bar\""
        );
    }
}
