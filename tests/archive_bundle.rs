#[path = "../src/archive.rs"]
mod archive;
#[path = "../src/cache.rs"]
mod cache;
#[path = "../src/model.rs"]
mod model;

use serde_json::json;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::ZipWriter;

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn sample_course() -> model::Course {
    serde_json::from_value(json!({
        "id": "course-1",
        "title": "Algebra I",
        "isActive": true,
        "children": [
            {
                "id": "ch-1",
                "title": "Foundations",
                "parentCourseId": "course-1",
                "children": [
                    {
                        "id": "les-1",
                        "title": "Numbers",
                        "parentChapterId": "ch-1",
                        "noteHtml": "<p>intro</p>"
                    }
                ]
            }
        ]
    }))
    .expect("sample course")
}

#[test]
fn bundle_export_and_import_roundtrip() {
    let out_dir = temp_dir("coursebook-bundle-roundtrip");
    let bundle_path = out_dir.join("algebra.coursebundle.zip");
    let course = sample_course();

    let export = archive::export_course_bundle(&course, &bundle_path).expect("export bundle");
    assert_eq!(export.bundle_format, archive::BUNDLE_FORMAT_V1);
    assert_eq!(export.entry_count, 2);

    let f = File::open(&bundle_path).expect("open bundle");
    let mut zip_archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    zip_archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    assert!(manifest.contains(archive::BUNDLE_FORMAT_V1));
    assert!(manifest.contains("course-1"));
    zip_archive
        .by_name("course/course.json")
        .expect("course entry in bundle");

    let (imported, summary) = archive::import_course_bundle(&bundle_path).expect("import bundle");
    assert_eq!(summary.bundle_format_detected, archive::BUNDLE_FORMAT_V1);
    assert_eq!(imported, course);

    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn import_rejects_a_checksum_mismatch() {
    let out_dir = temp_dir("coursebook-bundle-badsum");
    let bundle_path = out_dir.join("tampered.zip");

    let payload = serde_json::to_string_pretty(&sample_course()).expect("payload");
    let manifest = json!({
        "format": archive::BUNDLE_FORMAT_V1,
        "version": 1,
        "checksum": "0000000000000000000000000000000000000000000000000000000000000000",
    });

    let f = File::create(&bundle_path).expect("create bundle");
    let mut zip = ZipWriter::new(f);
    let opts = FileOptions::default();
    zip.start_file("manifest.json", opts).expect("manifest");
    zip.write_all(manifest.to_string().as_bytes())
        .expect("write manifest");
    zip.start_file("course/course.json", opts).expect("course");
    zip.write_all(payload.as_bytes()).expect("write course");
    zip.finish().expect("finish zip");

    let err = archive::import_course_bundle(&bundle_path).expect_err("must fail");
    assert!(err.to_string().contains("checksum mismatch"), "{err:?}");

    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn import_rejects_an_unknown_format_tag() {
    let out_dir = temp_dir("coursebook-bundle-badformat");
    let bundle_path = out_dir.join("other.zip");

    let f = File::create(&bundle_path).expect("create bundle");
    let mut zip = ZipWriter::new(f);
    let opts = FileOptions::default();
    zip.start_file("manifest.json", opts).expect("manifest");
    zip.write_all(json!({ "format": "markbook-workspace-v2" }).to_string().as_bytes())
        .expect("write manifest");
    zip.finish().expect("finish zip");

    let err = archive::import_course_bundle(&bundle_path).expect_err("must fail");
    assert!(
        err.to_string().contains("unsupported bundle format"),
        "{err:?}"
    );

    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn snapshot_cache_roundtrip_checksum_and_delete() {
    let workspace = temp_dir("coursebook-cache-unit");
    let conn = cache::open_cache(&workspace).expect("open cache");
    let course = sample_course();

    cache::snapshot_put(&conn, &course).expect("put snapshot");
    let restored = cache::snapshot_get(&conn, "course-1").expect("get snapshot");
    assert_eq!(restored, Some(course.clone()));

    assert_eq!(
        cache::snapshot_get(&conn, "missing").expect("get missing"),
        None
    );

    // Overwrites keep a single row per course.
    cache::snapshot_put(&conn, &course).expect("re-put snapshot");
    let listed = cache::snapshot_list(&conn).expect("list snapshots");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].course_id, "course-1");
    assert_eq!(listed[0].title, "Algebra I");

    conn.execute(
        "UPDATE course_snapshots SET payload = replace(payload, 'Algebra', 'Tampered')",
        [],
    )
    .expect("tamper");
    let err = cache::snapshot_get(&conn, "course-1").expect_err("checksum must fail");
    assert!(err.to_string().contains("checksum"), "{err:?}");

    assert!(cache::snapshot_delete(&conn, "course-1").expect("delete"));
    assert!(!cache::snapshot_delete(&conn, "course-1").expect("repeat delete"));

    let _ = std::fs::remove_dir_all(workspace);
}
