use anyhow::{anyhow, Context};
use serde_json::json;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::cache::sha256_hex;
use crate::model::Course;

const MANIFEST_ENTRY: &str = "manifest.json";
const COURSE_ENTRY: &str = "course/course.json";
pub const BUNDLE_FORMAT_V1: &str = "coursebook-course-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
}

pub fn export_course_bundle(course: &Course, out_path: &Path) -> anyhow::Result<ExportSummary> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }

    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let payload =
        serde_json::to_string_pretty(course).context("failed to serialize course tree")?;
    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
        "courseId": course.id,
        "checksum": sha256_hex(payload.as_bytes()),
    });

    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(COURSE_ENTRY, opts)
        .context("failed to start course entry")?;
    zip.write_all(payload.as_bytes())
        .context("failed to write course entry")?;

    zip.finish().context("failed to finalize zip bundle")?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        entry_count: 2,
    })
}

pub fn import_course_bundle(in_path: &Path) -> anyhow::Result<(Course, ImportSummary)> {
    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest
        .get("format")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    if format != BUNDLE_FORMAT_V1 {
        return Err(anyhow!("unsupported bundle format: {}", format));
    }

    let mut payload = String::new();
    archive
        .by_name(COURSE_ENTRY)
        .context("bundle missing course/course.json")?
        .read_to_string(&mut payload)
        .context("failed to read course entry")?;

    // The manifest checksum covers the exact serialized payload bytes.
    if let Some(expected) = manifest.get("checksum").and_then(|v| v.as_str()) {
        let actual = sha256_hex(payload.as_bytes());
        if actual != expected {
            return Err(anyhow!(
                "bundle checksum mismatch: manifest {} vs payload {}",
                expected,
                actual
            ));
        }
    }

    let course: Course =
        serde_json::from_str(&payload).context("course entry is not valid course JSON")?;

    Ok((
        course,
        ImportSummary {
            bundle_format_detected: BUNDLE_FORMAT_V1.to_string(),
        },
    ))
}
