//! Reduce 프로토콜
//!
//! 핸들러를 버킷 순서대로 하나씩 실행합니다. 값을 반환한 핸들러는 다음
//! 핸들러의 첫 번째 인자를 교체하고, 아무것도 반환하지 않은 핸들러는
//! 인자를 그대로 둡니다. 실패하면 나머지는 실행하지 않습니다.

use crate::registry::Bucket;
use eventer_foundation::{Args, Error, Result};
use serde_json::Value;
use tracing::trace;

pub(crate) async fn run(event: &str, bucket: Bucket, mut args: Args) -> Result<Option<Value>> {
    for record in bucket.iter() {
        trace!(
            event = %event,
            handler_id = %record.id,
            origin = %record.origin,
            "Invoking reduce handler"
        );

        let result = record.callback.call(args.clone()).into_future().await;
        match result {
            Ok(Some(value)) => match args.first_mut() {
                Some(first) => *first = value,
                None => args.push(value),
            },
            Ok(None) => {}
            Err(error) => return Err(Error::handler(event, error)),
        }
    }

    Ok(args.into_iter().next())
}
