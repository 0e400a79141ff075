use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::model::{Chapter, Course, Lesson, Section, Subsection};

/// Status/message pair carried by a failed course fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(default)]
    pub status: Option<i64>,
    pub message: String,
}

/// The store snapshot handed to the shell: the course tree (if one is
/// loaded) plus the envelope of the most recent fetch. `latest_token` is the
/// monotonic correlation token for in-flight course loads; completions that
/// carry a stale token are dropped whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub course: Option<Course>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    latest_token: u64,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    pub fn snapshot(&self) -> serde_json::Value {
        json!({
            "loading": self.loading,
            "error": self.error,
            "course": self.course,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewChapter {
    pub id: String,
    pub title: String,
    pub parent_course_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewLesson {
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
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSection {
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
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewSubsection {
    pub id: String,
    pub title: String,
    pub parent_section_id: String,
    #[serde(default)]
    pub note_html: String,
    #[serde(default)]
    pub viewed: bool,
}

impl From<NewChapter> for Chapter {
    fn from(new: NewChapter) -> Self {
        Chapter {
            id: new.id,
            title: new.title,
            parent_course_id: new.parent_course_id,
            children: Vec::new(),
        }
    }
}

impl From<NewLesson> for Lesson {
    fn from(new: NewLesson) -> Self {
        Lesson {
            id: new.id,
            title: new.title,
            parent_chapter_id: new.parent_chapter_id,
            video_ref: new.video_ref,
            youtube_ref: new.youtube_ref,
            embed_ref: new.embed_ref,
            note_html: new.note_html,
            children: Vec::new(),
        }
    }
}

impl From<NewSection> for Section {
    fn from(new: NewSection) -> Self {
        Section {
            id: new.id,
            title: new.title,
            parent_lesson_id: new.parent_lesson_id,
            video_ref: new.video_ref,
            youtube_ref: new.youtube_ref,
            embed_ref: new.embed_ref,
            note_html: new.note_html,
            viewed: new.viewed,
            children: Vec::new(),
        }
    }
}

impl From<NewSubsection> for Subsection {
    fn from(new: NewSubsection) -> Self {
        Subsection {
            id: new.id,
            title: new.title,
            parent_section_id: new.parent_section_id,
            note_html: new.note_html,
            viewed: new.viewed,
        }
    }
}

/// Edit payloads are shallow merges: a field left out of the payload keeps
/// its current value, and child collections are never part of an edit, so an
/// edit can never drop a subtree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub course_cover_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChapterPatch {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LessonPatch {
    pub title: Option<String>,
    pub video_ref: Option<String>,
    pub youtube_ref: Option<String>,
    pub embed_ref: Option<String>,
    pub note_html: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SectionPatch {
    pub title: Option<String>,
    pub video_ref: Option<String>,
    pub youtube_ref: Option<String>,
    pub embed_ref: Option<String>,
    pub note_html: Option<String>,
    pub viewed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubsectionPatch {
    pub title: Option<String>,
    pub note_html: Option<String>,
    pub viewed: Option<bool>,
}

/// The closed set of store mutations. Shapes outside this set are rejected
/// where the payload is deserialized; the reducer itself never sees an
/// unknown action.
#[derive(Debug, Clone)]
pub enum Action {
    FetchStarted,
    FetchFailed {
        token: Option<u64>,
        error: ErrorInfo,
    },
    TreeLoaded {
        token: Option<u64>,
        course: Course,
    },
    CourseEdited(CoursePatch),
    ChapterCreated(NewChapter),
    LessonCreated(NewLesson),
    SectionCreated(NewSection),
    SubsectionCreated(NewSubsection),
    ChapterEdited {
        id: String,
        parent_id: String,
        patch: ChapterPatch,
    },
    LessonEdited {
        id: String,
        parent_id: String,
        patch: LessonPatch,
    },
    SectionEdited {
        id: String,
        parent_id: String,
        patch: SectionPatch,
    },
    SubsectionEdited {
        id: String,
        parent_id: String,
        patch: SubsectionPatch,
    },
    ChapterDeleted {
        id: String,
        parent_id: String,
    },
    LessonDeleted {
        id: String,
        parent_id: String,
    },
    SectionDeleted {
        id: String,
        parent_id: String,
    },
    SubsectionDeleted {
        id: String,
        parent_id: String,
    },
    Reset,
}

/// Pure reducer: always returns a fresh `State`, never mutates the previous
/// one, never errors. A mutation whose parent link or target id cannot be
/// located in the current tree is a structural no-op (the returned state is
/// equal to the input), and creating a child whose id already exists under
/// the resolved parent is suppressed rather than duplicated, which makes
/// replayed confirmations safe.
pub fn dispatch(state: &State, action: Action) -> State {
    let mut next = state.clone();
    match action {
        Action::FetchStarted => {
            next.loading = true;
            next.error = None;
            next.latest_token += 1;
        }
        Action::TreeLoaded { token, course } => {
            if is_stale(&next, token) {
                return next;
            }
            next.loading = false;
            next.error = None;
            next.course = Some(course);
        }
        Action::FetchFailed { token, error } => {
            if is_stale(&next, token) {
                return next;
            }
            next.loading = false;
            next.error = Some(error);
        }
        Action::CourseEdited(patch) => {
            if let Some(course) = next.course.as_mut() {
                apply_course_patch(course, patch);
            }
        }
        Action::ChapterCreated(new) => {
            if let Some(course) = next.course.as_mut() {
                if course.id == new.parent_course_id
                    && !course.children.iter().any(|c| c.id == new.id)
                {
                    course.children.push(new.into());
                }
            }
        }
        Action::LessonCreated(new) => {
            if let Some(chapter) = next
                .course
                .as_mut()
                .and_then(|c| c.chapter_mut(&new.parent_chapter_id))
            {
                if !chapter.children.iter().any(|l| l.id == new.id) {
                    chapter.children.push(new.into());
                }
            }
        }
        Action::SectionCreated(new) => {
            if let Some(lesson) = next
                .course
                .as_mut()
                .and_then(|c| c.lesson_mut(&new.parent_lesson_id))
            {
                if !lesson.children.iter().any(|s| s.id == new.id) {
                    lesson.children.push(new.into());
                }
            }
        }
        Action::SubsectionCreated(new) => {
            if let Some(section) = next
                .course
                .as_mut()
                .and_then(|c| c.section_mut(&new.parent_section_id))
            {
                if !section.children.iter().any(|s| s.id == new.id) {
                    section.children.push(new.into());
                }
            }
        }
        Action::ChapterEdited {
            id,
            parent_id,
            patch,
        } => {
            if let Some(course) = next.course.as_mut() {
                if course.id == parent_id {
                    if let Some(chapter) = course.chapter_mut(&id) {
                        if let Some(title) = patch.title {
                            chapter.title = title;
                        }
                    }
                }
            }
        }
        Action::LessonEdited {
            id,
            parent_id,
            patch,
        } => {
            if let Some(lesson) = next
                .course
                .as_mut()
                .and_then(|c| c.chapter_mut(&parent_id))
                .and_then(|ch| ch.children.iter_mut().find(|l| l.id == id))
            {
                apply_lesson_patch(lesson, patch);
            }
        }
        Action::SectionEdited {
            id,
            parent_id,
            patch,
        } => {
            if let Some(section) = next
                .course
                .as_mut()
                .and_then(|c| c.lesson_mut(&parent_id))
                .and_then(|l| l.children.iter_mut().find(|s| s.id == id))
            {
                apply_section_patch(section, patch);
            }
        }
        Action::SubsectionEdited {
            id,
            parent_id,
            patch,
        } => {
            if let Some(sub) = next
                .course
                .as_mut()
                .and_then(|c| c.section_mut(&parent_id))
                .and_then(|s| s.children.iter_mut().find(|x| x.id == id))
            {
                apply_subsection_patch(sub, patch);
            }
        }
        Action::ChapterDeleted { id, parent_id } => {
            if let Some(course) = next.course.as_mut() {
                if course.id == parent_id {
                    course.children.retain(|c| c.id != id);
                }
            }
        }
        Action::LessonDeleted { id, parent_id } => {
            if let Some(chapter) = next.course.as_mut().and_then(|c| c.chapter_mut(&parent_id)) {
                chapter.children.retain(|l| l.id != id);
            }
        }
        Action::SectionDeleted { id, parent_id } => {
            if let Some(lesson) = next.course.as_mut().and_then(|c| c.lesson_mut(&parent_id)) {
                lesson.children.retain(|s| s.id != id);
            }
        }
        Action::SubsectionDeleted { id, parent_id } => {
            if let Some(section) = next.course.as_mut().and_then(|c| c.section_mut(&parent_id)) {
                section.children.retain(|s| s.id != id);
            }
        }
        Action::Reset => {
            next = State::default();
        }
    }
    next
}

/// A completion carrying `Some(token)` only applies if it belongs to the
/// latest `FetchStarted`. `None` keeps last-write-wins for callers that do
/// not thread tokens.
fn is_stale(state: &State, token: Option<u64>) -> bool {
    token.map_or(false, |t| t != state.latest_token)
}

fn apply_course_patch(course: &mut Course, patch: CoursePatch) {
    if let Some(v) = patch.title {
        course.title = v;
    }
    if let Some(v) = patch.description {
        course.description = Some(v);
    }
    if let Some(v) = patch.is_active {
        course.is_active = v;
    }
    if let Some(v) = patch.start_date {
        course.start_date = Some(v);
    }
    if let Some(v) = patch.end_date {
        course.end_date = Some(v);
    }
    if let Some(v) = patch.course_cover_ref {
        course.course_cover_ref = Some(v);
    }
}

fn apply_lesson_patch(lesson: &mut Lesson, patch: LessonPatch) {
    if let Some(v) = patch.title {
        lesson.title = v;
    }
    if let Some(v) = patch.video_ref {
        lesson.video_ref = Some(v);
    }
    if let Some(v) = patch.youtube_ref {
        lesson.youtube_ref = Some(v);
    }
    if let Some(v) = patch.embed_ref {
        lesson.embed_ref = Some(v);
    }
    if let Some(v) = patch.note_html {
        lesson.note_html = v;
    }
}

fn apply_section_patch(section: &mut Section, patch: SectionPatch) {
    if let Some(v) = patch.title {
        section.title = v;
    }
    if let Some(v) = patch.video_ref {
        section.video_ref = Some(v);
    }
    if let Some(v) = patch.youtube_ref {
        section.youtube_ref = Some(v);
    }
    if let Some(v) = patch.embed_ref {
        section.embed_ref = Some(v);
    }
    if let Some(v) = patch.note_html {
        section.note_html = v;
    }
    if let Some(v) = patch.viewed {
        section.viewed = v;
    }
}

fn apply_subsection_patch(sub: &mut Subsection, patch: SubsectionPatch) {
    if let Some(v) = patch.title {
        sub.title = v;
    }
    if let Some(v) = patch.note_html {
        sub.note_html = v;
    }
    if let Some(v) = patch.viewed {
        sub.viewed = v;
    }
}
