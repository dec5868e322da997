//! Eventer Config - 엔진 설정
//!
//! 엔진 생성 시 한 번 전달되며 인스턴스 간에 공유되지 않습니다.

use super::store::{read_file, ConfigStore};
use crate::event::Protocol;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 설정 파일명
pub const EVENTER_CONFIG_FILE: &str = "eventer.toml";

/// 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventerConfig {
    /// 리스너가 없는 이벤트에 emit 하면 UnknownEvent 에러
    pub emit_on_unknown_throws: bool,

    /// sync 프로토콜에서 deferred 결과를 Usage 에러로 처리
    pub sync_deferred_throws: bool,

    /// `dispatch`에 프로토콜을 지정하지 않았을 때
    pub default_protocol: Protocol,

    /// parallel 실패 후 남은 핸들러를 런타임에 넘겨 끝까지 실행
    pub detach_on_failure: bool,

    /// 미완료 핸들러 로그 주기 (ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monitor_interval_ms: Option<u64>,
}

impl Default for EventerConfig {
    fn default() -> Self {
        Self {
            emit_on_unknown_throws: false,
            sync_deferred_throws: true,
            default_protocol: Protocol::Parallel,
            detach_on_failure: true,
            monitor_interval_ms: None,
        }
    }
}

impl EventerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 알 수 없는 이벤트와 sync 위반을 모두 에러로 처리
    pub fn strict() -> Self {
        Self {
            emit_on_unknown_throws: true,
            sync_deferred_throws: true,
            ..Self::default()
        }
    }

    /// 에러 대신 무시
    pub fn permissive() -> Self {
        Self {
            emit_on_unknown_throws: false,
            sync_deferred_throws: false,
            ..Self::default()
        }
    }

    pub fn with_default_protocol(mut self, protocol: Protocol) -> Self {
        self.default_protocol = protocol;
        self
    }

    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval_ms = Some(interval.as_millis() as u64);
        self
    }

    pub fn monitor_interval(&self) -> Option<Duration> {
        self.monitor_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    // ========================================================================
    // Load
    // ========================================================================

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 파일 하나 로드 (.toml / .json)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        read_file(path.as_ref())
    }

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정 2. 프로젝트 설정
        let stores = [ConfigStore::global().ok(), ConfigStore::current_project().ok()];
        for store in stores.into_iter().flatten() {
            if let Some(layer) = store.load_optional::<ConfigLayer>(EVENTER_CONFIG_FILE)? {
                debug!(path = %store.file_path(EVENTER_CONFIG_FILE).display(), "Config layer loaded");
                config.merge(layer);
            }
        }

        Ok(config)
    }

    /// 다른 레이어와 병합 (layer가 우선)
    pub fn merge(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.emit_on_unknown_throws {
            self.emit_on_unknown_throws = v;
        }
        if let Some(v) = layer.sync_deferred_throws {
            self.sync_deferred_throws = v;
        }
        if let Some(v) = layer.default_protocol {
            self.default_protocol = v;
        }
        if let Some(v) = layer.detach_on_failure {
            self.detach_on_failure = v;
        }
        if layer.monitor_interval_ms.is_some() {
            self.monitor_interval_ms = layer.monitor_interval_ms;
        }
    }
}

/// 설정 파일 하나 (지정한 값만 덮어씀)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigLayer {
    pub emit_on_unknown_throws: Option<bool>,
    pub sync_deferred_throws: Option<bool>,
    pub default_protocol: Option<Protocol>,
    pub detach_on_failure: Option<bool>,
    pub monitor_interval_ms: Option<u64>,
}
