use crate::archive;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{persist_snapshot, required_str};
use crate::ipc::types::{AppState, Request};
use crate::store::{self, Action};
use serde_json::json;
use std::path::PathBuf;

fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match required_str(req, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(resp) => return resp,
    };
    let Some(course) = state.store.course.as_ref() else {
        return err(&req.id, "no_course", "no course is loaded", None);
    };

    match archive::export_course_bundle(course, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count,
                "outPath": out_path.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "export_failed", format!("{e:?}"), None),
    }
}

fn handle_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match required_str(req, "inPath") {
        Ok(v) => PathBuf::from(v),
        Err(resp) => return resp,
    };

    match archive::import_course_bundle(&in_path) {
        Ok((course, summary)) => {
            let course_id = course.id.clone();
            state.store = store::dispatch(
                &state.store,
                Action::TreeLoaded {
                    token: None,
                    course,
                },
            );
            persist_snapshot(state);
            ok(
                &req.id,
                json!({
                    "bundleFormatDetected": summary.bundle_format_detected,
                    "courseId": course_id,
                    "state": state.store.snapshot(),
                }),
            )
        }
        Err(e) => err(&req.id, "import_failed", format!("{e:?}"), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "course.export" => Some(handle_export(state, req)),
        "course.import" => Some(handle_import(state, req)),
        _ => None,
    }
}
