
use serde_json::json;
use test_support::{load_sample_course, request, request_ok, spawn_sidecar};

#[test]
fn editing_a_lesson_title_keeps_its_sections() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let before = load_sample_course(&mut stdin, &mut reader);
    let sections_before = before["course"]["children"][0]["children"][0]["children"].clone();
    assert_eq!(sections_before.as_array().map(|a| a.len()), Some(2));

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.edit",
        json!({
            "id": "les-1",
            "parentId": "ch-1",
            "title": "Numbers, revised"
        }),
    );
    let lesson = &result["state"]["course"]["children"][0]["children"][0];
    assert_eq!(lesson["title"].as_str(), Some("Numbers, revised"));
    assert_eq!(lesson["noteHtml"].as_str(), Some("<p>intro</p>"));
    assert_eq!(lesson["children"], sections_before);
}

#[test]
fn edit_with_unknown_fields_is_rejected() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_sample_course(&mut stdin, &mut reader);

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.edit",
        json!({
            "id": "les-1",
            "parentId": "ch-1",
            "children": []
        }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("bad_params")
    );
}

#[test]
fn edit_under_missing_parent_is_a_successful_noop() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let before = load_sample_course(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "lessons.edit",
        json!({
            "id": "les-1",
            "parentId": "no-such-chapter",
            "title": "never applied"
        }),
    );
    assert_eq!(result["state"], before);
}
