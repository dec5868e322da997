//! Sync 프로토콜
//!
//! 호출 프레임 안에서 핸들러를 순서대로 실행합니다. 결과는 모으지 않습니다.
//! 핸들러가 deferred 결과를 돌려주면 계약 위반입니다.

use super::detach;
use crate::registry::Bucket;
use eventer_foundation::{Error, Outcome, Result};
use serde_json::Value;
use tracing::{trace, warn};

pub(crate) fn run(event: &str, bucket: &Bucket, args: &[Value], strict: bool) -> Result<()> {
    for record in bucket.iter() {
        trace!(
            event = %event,
            handler_id = %record.id,
            origin = %record.origin,
            "Invoking sync handler"
        );

        match record.callback.call(args.to_vec()) {
            Outcome::Ready(Ok(_)) => {}
            Outcome::Ready(Err(error)) => return Err(Error::handler(event, error)),
            Outcome::Deferred(_) if strict => {
                return Err(Error::usage(format!(
                    "{} ({}) returned a deferred result during sync emit of \"{}\"",
                    record.id, record.origin, event
                )));
            }
            Outcome::Deferred(fut) => {
                warn!(
                    event = %event,
                    handler_id = %record.id,
                    origin = %record.origin,
                    "Ignoring deferred result in sync emit"
                );
                let event = event.to_string();
                let handler_id = record.id;
                detach(
                    async move {
                        if let Err(error) = fut.await {
                            warn!(
                                event = %event,
                                handler_id = %handler_id,
                                error = %error,
                                "Detached deferred handler failed"
                            );
                        }
                    },
                    "deferred sync handler",
                );
            }
        }
    }

    Ok(())
}
