//! Meta-Broadcaster - dispatch 전후 관찰 hook
//!
//! 별도 자료구조가 아니라 두 개의 예약 이름(`meta:preEmit`, `meta:postEmit`)을
//! 같은 Registry/Dispatcher로 발행하는 정책 레이어입니다.
//! hook 인자는 `(이벤트 이름, 원래 인자...)`이며 항상 parallel로 실행됩니다.
//! 등록된 hook이 없으면 시도조차 하지 않습니다.

use crate::dispatch::{parallel, sync, ParallelOptions};
use crate::registry::Registry;
use eventer_foundation::{is_meta, Args, Result, META_POST_EMIT, META_PRE_EMIT};
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// hook 인자 구성
pub(crate) fn hook_args(event: &str, args: &[Value]) -> Args {
    std::iter::once(Value::String(event.to_string()))
        .chain(args.iter().cloned())
        .collect()
}

#[derive(Debug, Clone)]
pub(crate) struct MetaBroadcaster {
    registry: Arc<Registry>,
    options: ParallelOptions,
    sync_strict: bool,
}

impl MetaBroadcaster {
    pub(crate) fn new(registry: Arc<Registry>, options: ParallelOptions, sync_strict: bool) -> Self {
        Self {
            registry,
            options,
            sync_strict,
        }
    }

    /// meta 이름 자체의 dispatch는 감싸지 않음
    pub(crate) fn wraps(event: &str) -> bool {
        !is_meta(event)
    }

    pub(crate) async fn before(&self, event: &str, args: &[Value]) -> Result<()> {
        self.fire(META_PRE_EMIT, event, args).await
    }

    pub(crate) async fn after(&self, event: &str, args: &[Value]) -> Result<()> {
        self.fire(META_POST_EMIT, event, args).await
    }

    pub(crate) fn before_sync(&self, event: &str, args: &[Value]) -> Result<()> {
        self.fire_sync(META_PRE_EMIT, event, args)
    }

    pub(crate) fn after_sync(&self, event: &str, args: &[Value]) -> Result<()> {
        self.fire_sync(META_POST_EMIT, event, args)
    }

    async fn fire(&self, meta: &str, event: &str, args: &[Value]) -> Result<()> {
        if !Self::wraps(event) {
            return Ok(());
        }

        let hooks = self.registry.snapshot(meta);
        if hooks.is_empty() {
            return Ok(());
        }

        trace!(meta, event, hooks = hooks.len(), "Meta hook");
        let args = hook_args(event, args);
        parallel::run(meta, hooks, &args, self.options).await?;
        Ok(())
    }

    fn fire_sync(&self, meta: &str, event: &str, args: &[Value]) -> Result<()> {
        if !Self::wraps(event) {
            return Ok(());
        }

        let hooks = self.registry.snapshot(meta);
        if hooks.is_empty() {
            return Ok(());
        }

        trace!(meta, event, hooks = hooks.len(), "Meta hook (sync)");
        sync::run(meta, &hooks, &hook_args(event, args), self.sync_strict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_args_prefix_event_name() {
        let args = hook_args("foo", &[json!(1), json!("x")]);
        assert_eq!(args, vec![json!("foo"), json!(1), json!("x")]);
    }

    #[test]
    fn test_meta_names_are_not_wrapped() {
        assert!(MetaBroadcaster::wraps("foo"));
        assert!(!MetaBroadcaster::wraps(META_PRE_EMIT));
        assert!(!MetaBroadcaster::wraps(META_POST_EMIT));
    }
}
