use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Course content forms a strict rooted tree:
/// Course -> Chapter -> Lesson -> Section -> Subsection.
/// Nodes carry their parent's id (`parent_*_id`); lookups always walk
/// top-down from the course root by that link, so the tree is acyclic by
/// construction and no cross-links exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub course_cover_ref: Option<String>,
    #[serde(default)]
    pub children: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub parent_course_id: String,
    #[serde(default)]
    pub children: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub parent_chapter_id: String,
    #[serde(default)]
    pub video_ref: Option<String>,
    #[serde(default)]
    pub youtube_ref: Option<String>,
    #[serde(default)]
    pub embed_ref: Option<String>,
    #[serde(default)]
    pub note_html: String,
    #[serde(default)]
    pub children: Vec<Section>,
}

/// Displayed as "Topic" in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub parent_lesson_id: String,
    #[serde(default)]
    pub video_ref: Option<String>,
    #[serde(default)]
    pub youtube_ref: Option<String>,
    #[serde(default)]
    pub embed_ref: Option<String>,
    #[serde(default)]
    pub note_html: String,
    #[serde(default)]
    pub viewed: bool,
    #[serde(default)]
    pub children: Vec<Subsection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    pub id: String,
    pub title: String,
    pub parent_section_id: String,
    #[serde(default)]
    pub note_html: String,
    #[serde(default)]
    pub viewed: bool,
}

impl Course {
    pub fn chapter_mut(&mut self, chapter_id: &str) -> Option<&mut Chapter> {
        self.children.iter_mut().find(|c| c.id == chapter_id)
    }

    /// Linear scan across chapters; the first lesson carrying the id wins
    /// and scanning stops there, even if a duplicate id exists in a later
    /// chapter.
    pub fn lesson_mut(&mut self, lesson_id: &str) -> Option<&mut Lesson> {
        self.children
            .iter_mut()
            .find_map(|ch| ch.children.iter_mut().find(|l| l.id == lesson_id))
    }

    /// Same first-match rule, one level deeper.
    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.children.iter_mut().find_map(|ch| {
            ch.children
                .iter_mut()
                .find_map(|l| l.children.iter_mut().find(|s| s.id == section_id))
        })
    }
}
