use crate::cache;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{optional_i64, optional_u64, persist_snapshot, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::Course;
use crate::store::{self, Action, CoursePatch, ErrorInfo};
use serde_json::json;

fn handle_fetch_started(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.store = store::dispatch(&state.store, Action::FetchStarted);
    // The gateway threads this token through the completion dispatch so a
    // superseded request's result is dropped instead of applied.
    ok(
        &req.id,
        json!({
            "token": state.store.latest_token(),
            "state": state.store.snapshot(),
        }),
    )
}

fn handle_fetch_failed(state: &mut AppState, req: &Request) -> serde_json::Value {
    let message = match required_str(req, "message") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let error = ErrorInfo {
        status: optional_i64(req, "status"),
        message,
    };
    let token = optional_u64(req, "token");
    state.store = store::dispatch(&state.store, Action::FetchFailed { token, error });
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_loaded(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("course") else {
        return err(&req.id, "bad_params", "missing params.course", None);
    };
    let course: Course = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", format!("invalid course: {}", e), None),
    };
    let token = optional_u64(req, "token");
    state.store = store::dispatch(&state.store, Action::TreeLoaded { token, course });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let patch: CoursePatch = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    state.store = store::dispatch(&state.store, Action::CourseEdited(patch));
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_snapshot(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_reset(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.store = store::dispatch(&state.store, Action::Reset);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_load_cached(state: &mut AppState, req: &Request) -> serde_json::Value {
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(conn) = state.cache.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    match cache::snapshot_get(conn, &course_id) {
        Ok(Some(course)) => {
            state.store = store::dispatch(
                &state.store,
                Action::TreeLoaded {
                    token: None,
                    course,
                },
            );
            ok(&req.id, json!({ "state": state.store.snapshot() }))
        }
        Ok(None) => err(
            &req.id,
            "not_found",
            format!("no cached snapshot for course {}", course_id),
            None,
        ),
        Err(e) => err(&req.id, "cache_read_failed", format!("{e:?}"), None),
    }
}

fn handle_list_cached(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.cache.as_ref() else {
        return ok(&req.id, json!({ "courses": [] }));
    };

    match cache::snapshot_list(conn) {
        Ok(rows) => {
            let courses: Vec<_> = rows
                .iter()
                .map(|m| {
                    json!({
                        "id": m.course_id,
                        "title": m.title,
                        "updatedAt": m.updated_at,
                    })
                })
                .collect();
            ok(&req.id, json!({ "courses": courses }))
        }
        Err(e) => err(&req.id, "cache_read_failed", format!("{e:?}"), None),
    }
}

fn handle_evict_cached(state: &mut AppState, req: &Request) -> serde_json::Value {
    let course_id = match required_str(req, "courseId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(conn) = state.cache.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    match cache::snapshot_delete(conn, &course_id) {
        Ok(removed) => ok(&req.id, json!({ "removed": removed })),
        Err(e) => err(&req.id, "cache_delete_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "course.fetchStarted" => Some(handle_fetch_started(state, req)),
        "course.fetchFailed" => Some(handle_fetch_failed(state, req)),
        "course.loaded" => Some(handle_loaded(state, req)),
        "course.edit" => Some(handle_edit(state, req)),
        "course.snapshot" => Some(handle_snapshot(state, req)),
        "course.reset" => Some(handle_reset(state, req)),
        "course.loadCached" => Some(handle_load_cached(state, req)),
        "courses.listCached" => Some(handle_list_cached(state, req)),
        "courses.evictCached" => Some(handle_evict_cached(state, req)),
        _ => None,
    }
}
