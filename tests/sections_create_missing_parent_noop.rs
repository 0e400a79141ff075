
use serde_json::json;
use test_support::{load_sample_course, request_ok, spawn_sidecar};

#[test]
fn section_create_with_unknown_lesson_leaves_the_tree_unchanged() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let before = load_sample_course(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "sections.create",
        json!({
            "id": "sec-orphan",
            "title": "Orphan topic",
            "parentLessonId": "no-such-lesson"
        }),
    );
    assert_eq!(result["state"], before);
}

#[test]
fn subsection_create_with_unknown_section_leaves_the_tree_unchanged() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let before = load_sample_course(&mut stdin, &mut reader);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "subsections.create",
        json!({
            "id": "sub-orphan",
            "title": "Orphan",
            "parentSectionId": "no-such-section"
        }),
    );
    assert_eq!(result["state"], before);
}
