use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{params_object, persist_snapshot, required_str, take_required_str};
use crate::ipc::types::{AppState, Request};
use crate::store::{
    self, Action, ChapterPatch, LessonPatch, NewChapter, NewLesson, NewSection, NewSubsection,
    SectionPatch, SubsectionPatch,
};
use serde_json::{json, Value};
use uuid::Uuid;

/// The shell mints node ids client-side before the backend confirms a
/// create; when a request arrives without one, mint it here so the caller
/// gets the id back in the result.
fn create_params(req: &Request) -> Result<Value, Value> {
    let mut obj = params_object(req)?;
    let has_id = obj
        .get("id")
        .and_then(|v| v.as_str())
        .map_or(false, |s| !s.trim().is_empty());
    if !has_id {
        obj.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    Ok(Value::Object(obj))
}

/// Splits `{ id, parentId, ...fields }` into the target addresses and the
/// remaining patch fields.
fn edit_target(req: &Request) -> Result<(String, String, Value), Value> {
    let mut obj = params_object(req)?;
    let id = take_required_str(req, &mut obj, "id")?;
    let parent_id = take_required_str(req, &mut obj, "parentId")?;
    Ok((id, parent_id, Value::Object(obj)))
}

fn delete_target(req: &Request) -> Result<(String, String), Value> {
    let id = required_str(req, "id")?;
    let parent_id = required_str(req, "parentId")?;
    Ok((id, parent_id))
}

fn handle_chapters_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params = match create_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new: NewChapter = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let chapter_id = new.id.clone();
    state.store = store::dispatch(&state.store, Action::ChapterCreated(new));
    persist_snapshot(state);
    ok(
        &req.id,
        json!({ "chapterId": chapter_id, "state": state.store.snapshot() }),
    )
}

fn handle_chapters_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id, rest) = match edit_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: ChapterPatch = match serde_json::from_value(rest) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    state.store = store::dispatch(&state.store, Action::ChapterEdited { id, parent_id, patch });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_chapters_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id) = match delete_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    state.store = store::dispatch(&state.store, Action::ChapterDeleted { id, parent_id });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_lessons_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params = match create_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new: NewLesson = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let lesson_id = new.id.clone();
    state.store = store::dispatch(&state.store, Action::LessonCreated(new));
    persist_snapshot(state);
    ok(
        &req.id,
        json!({ "lessonId": lesson_id, "state": state.store.snapshot() }),
    )
}

fn handle_lessons_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id, rest) = match edit_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: LessonPatch = match serde_json::from_value(rest) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    state.store = store::dispatch(&state.store, Action::LessonEdited { id, parent_id, patch });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_lessons_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id) = match delete_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    state.store = store::dispatch(&state.store, Action::LessonDeleted { id, parent_id });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_sections_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params = match create_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new: NewSection = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let section_id = new.id.clone();
    state.store = store::dispatch(&state.store, Action::SectionCreated(new));
    persist_snapshot(state);
    ok(
        &req.id,
        json!({ "sectionId": section_id, "state": state.store.snapshot() }),
    )
}

fn handle_sections_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id, rest) = match edit_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: SectionPatch = match serde_json::from_value(rest) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    state.store = store::dispatch(&state.store, Action::SectionEdited { id, parent_id, patch });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_sections_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id) = match delete_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    state.store = store::dispatch(&state.store, Action::SectionDeleted { id, parent_id });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_subsections_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let params = match create_params(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let new: NewSubsection = match serde_json::from_value(params) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    let subsection_id = new.id.clone();
    state.store = store::dispatch(&state.store, Action::SubsectionCreated(new));
    persist_snapshot(state);
    ok(
        &req.id,
        json!({ "subsectionId": subsection_id, "state": state.store.snapshot() }),
    )
}

fn handle_subsections_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id, rest) = match edit_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch: SubsectionPatch = match serde_json::from_value(rest) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    state.store = store::dispatch(
        &state.store,
        Action::SubsectionEdited { id, parent_id, patch },
    );
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

fn handle_subsections_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let (id, parent_id) = match delete_target(req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    state.store = store::dispatch(&state.store, Action::SubsectionDeleted { id, parent_id });
    persist_snapshot(state);
    ok(&req.id, json!({ "state": state.store.snapshot() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "chapters.create" => Some(handle_chapters_create(state, req)),
        "chapters.edit" => Some(handle_chapters_edit(state, req)),
        "chapters.delete" => Some(handle_chapters_delete(state, req)),
        "lessons.create" => Some(handle_lessons_create(state, req)),
        "lessons.edit" => Some(handle_lessons_edit(state, req)),
        "lessons.delete" => Some(handle_lessons_delete(state, req)),
        "sections.create" => Some(handle_sections_create(state, req)),
        "sections.edit" => Some(handle_sections_edit(state, req)),
        "sections.delete" => Some(handle_sections_delete(state, req)),
        "subsections.create" => Some(handle_subsections_create(state, req)),
        "subsections.edit" => Some(handle_subsections_edit(state, req)),
        "subsections.delete" => Some(handle_subsections_delete(state, req)),
        _ => None,
    }
}
