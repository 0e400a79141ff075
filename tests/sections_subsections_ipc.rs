
use serde_json::json;
use test_support::{load_sample_course, request_ok, spawn_sidecar};

#[test]
fn subsection_create_edit_delete_through_the_router() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_sample_course(&mut stdin, &mut reader);

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subsections.create",
        json!({
            "id": "sub-1",
            "title": "Worked example",
            "parentSectionId": "sec-1",
            "noteHtml": "<p>2 + 2</p>"
        }),
    );
    let section = &created["state"]["course"]["children"][0]["children"][0]["children"][0];
    assert_eq!(section["children"].as_array().map(|a| a.len()), Some(1));

    let edited = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "subsections.edit",
        json!({ "id": "sub-1", "parentId": "sec-1", "viewed": true }),
    );
    let sub = &edited["state"]["course"]["children"][0]["children"][0]["children"][0]["children"][0];
    assert_eq!(sub["viewed"].as_bool(), Some(true));
    assert_eq!(sub["noteHtml"].as_str(), Some("<p>2 + 2</p>"));

    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "subsections.delete",
        json!({ "id": "sub-1", "parentId": "sec-1" }),
    );
    let section = &deleted["state"]["course"]["children"][0]["children"][0]["children"][0];
    assert_eq!(section["children"].as_array().map(|a| a.len()), Some(0));
}

#[test]
fn marking_a_section_viewed_preserves_its_content_fields() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_sample_course(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "sections.edit",
        json!({ "id": "sec-2", "parentId": "les-1", "viewed": true }),
    );
    let section = &result["state"]["course"]["children"][0]["children"][0]["children"][1];
    assert_eq!(section["viewed"].as_bool(), Some(true));
    assert_eq!(section["title"].as_str(), Some("Fractions"));
}

#[test]
fn course_edit_merges_partial_fields() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    load_sample_course(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "course.edit",
        json!({ "title": "Algebra I (2026)", "startDate": "2026-09-01" }),
    );
    let course = &result["state"]["course"];
    assert_eq!(course["title"].as_str(), Some("Algebra I (2026)"));
    assert_eq!(course["startDate"].as_str(), Some("2026-09-01"));
    assert_eq!(course["description"].as_str(), Some("Intro algebra"));
    assert_eq!(course["children"].as_array().map(|a| a.len()), Some(2));
}
