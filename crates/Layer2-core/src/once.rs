//! Once-Wrapper - 첫 호출에서 스스로 제거되는 핸들러

use crate::registry::Registry;
use eventer_foundation::{Callback, HandlerId, Outcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::trace;

/// once 래퍼 생성
///
/// 래퍼는 첫 호출에서 먼저 모든 `names`의 자기 레코드를 제거한 뒤 원래
/// 콜백을 실행합니다. 제거 이전에 snapshot된 다른 dispatch가 래퍼를 다시
/// 호출해도 `fired` 플래그 때문에 원래 콜백은 한 번만 실행됩니다.
pub(crate) fn wrap(
    registry: Weak<Registry>,
    names: Vec<String>,
    id: HandlerId,
    original: Callback,
) -> Callback {
    let fired = Arc::new(AtomicBool::new(false));

    Callback::new(move |args| {
        if fired.swap(true, Ordering::SeqCst) {
            trace!(handler_id = %id, "Once handler already fired");
            return Outcome::none();
        }

        if let Some(registry) = registry.upgrade() {
            registry.remove_id(&names, id);
        }

        original.call(args)
    })
}
