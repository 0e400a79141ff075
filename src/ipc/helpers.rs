use serde_json::{Map, Value};

use crate::cache;
use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};

pub fn required_str(req: &Request, key: &str) -> Result<String, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_u64(req: &Request, key: &str) -> Option<u64> {
    req.params.get(key).and_then(|v| v.as_u64())
}

pub fn optional_i64(req: &Request, key: &str) -> Option<i64> {
    req.params.get(key).and_then(|v| v.as_i64())
}

pub fn params_object(req: &Request) -> Result<Map<String, Value>, Value> {
    match &req.params {
        Value::Object(obj) => Ok(obj.clone()),
        Value::Null => Ok(Map::new()),
        _ => Err(err(&req.id, "bad_params", "params must be an object", None)),
    }
}

pub fn take_required_str(
    req: &Request,
    obj: &mut Map<String, Value>,
    key: &str,
) -> Result<String, Value> {
    obj.remove(key)
        .and_then(|v| v.as_str().map(|s| s.trim().to_string()))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

/// Best-effort: the in-memory mutation already succeeded, so a cache failure
/// must not fail the request.
pub fn persist_snapshot(state: &AppState) {
    let (Some(conn), Some(course)) = (state.cache.as_ref(), state.store.course.as_ref()) else {
        return;
    };
    if let Err(e) = cache::snapshot_put(conn, course) {
        tracing::warn!(error = %e, course_id = %course.id, "failed to persist course snapshot");
    }
}
