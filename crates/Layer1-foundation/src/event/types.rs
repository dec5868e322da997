//! Event Types - 이벤트 이름, 예약 이름, 실행 프로토콜

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================================================
// Reserved Names
// ============================================================================

/// 모든 dispatch 직전에 발행되는 meta 이벤트
pub const META_PRE_EMIT: &str = "meta:preEmit";

/// 모든 dispatch 직후에 발행되는 meta 이벤트
pub const META_POST_EMIT: &str = "meta:postEmit";

/// Deferred 어댑터: 성공 완료
pub const DEFERRED_RESOLVE: &str = "end";

/// Deferred 어댑터: 실패 완료
pub const DEFERRED_REJECT: &str = "error";

/// meta 이름인지 확인
pub fn is_meta(event: &str) -> bool {
    event == META_PRE_EMIT || event == META_POST_EMIT
}

// ============================================================================
// Protocol
// ============================================================================

/// Dispatch 실행 프로토콜
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    /// 모든 핸들러를 동시에 실행하고 결과를 순서대로 모음
    #[default]
    Parallel,
    /// 핸들러를 순서대로 실행하며 첫 번째 인자를 갱신
    Reduce,
    /// 호출 프레임 안에서 즉시 실행 (결과 수집 없음)
    Sync,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parallel => "parallel",
            Self::Reduce => "reduce",
            Self::Sync => "sync",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parallel" => Ok(Self::Parallel),
            "reduce" => Ok(Self::Reduce),
            "sync" => Ok(Self::Sync),
            other => Err(format!("unknown protocol: {}", other)),
        }
    }
}

// ============================================================================
// IntoEventNames
// ============================================================================

/// 이벤트 이름 하나 또는 여러 개
///
/// 여러 이름으로 등록하면 이름마다 레코드가 하나씩 생깁니다.
pub trait IntoEventNames {
    fn into_event_names(self) -> Vec<String>;
}

impl IntoEventNames for &str {
    fn into_event_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoEventNames for String {
    fn into_event_names(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoEventNames for &String {
    fn into_event_names(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<const N: usize> IntoEventNames for [&str; N] {
    fn into_event_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoEventNames for &[&str] {
    fn into_event_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl IntoEventNames for Vec<&str> {
    fn into_event_names(self) -> Vec<String> {
        self.into_iter().map(String::from).collect()
    }
}

impl IntoEventNames for Vec<String> {
    fn into_event_names(self) -> Vec<String> {
        self
    }
}

impl IntoEventNames for &[String] {
    fn into_event_names(self) -> Vec<String> {
        self.to_vec()
    }
}
