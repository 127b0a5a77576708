use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::{ApiClient, UploadFile};
use super::{get_attribute, localized};
use crate::content::{
    ContentBlock, Course, Difficulty, Flashcard, McqOption, McqQuestion, MediaItem, MediaKind,
    Module, Section,
};

pub fn organization_courses(client: &ApiClient, org_id: &str) -> anyhow::Result<Vec<Course>> {
    let body = client.get_json(&format!("/courses/organization/{}", org_id))?;
    collect_courses(&body).with_context(|| format!("parse courses for organization '{}'", org_id))
}

pub fn user_courses(client: &ApiClient, user_id: &str) -> anyhow::Result<Vec<Course>> {
    let body = client.get_json(&format!("/courses/by-user/{}", user_id))?;
    collect_courses(&body).with_context(|| format!("parse courses for user '{}'", user_id))
}

pub fn course_details(client: &ApiClient, course_id: &str) -> anyhow::Result<Course> {
    let body = client.get_json(&format!("/courses/details/{}", course_id))?;
    parse_course(&body).with_context(|| format!("parse course '{}'", course_id))
}

/// Descriptive fields only; module content is edited through its own flow.
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

pub fn update_course(
    client: &ApiClient,
    course_id: &str,
    update: &CourseUpdate,
) -> anyhow::Result<()> {
    client
        .send_json("PUT", &format!("/courses/{}", course_id), update)
        .with_context(|| format!("update course '{}'", course_id))?;
    Ok(())
}

/// Uploads source documents for content generation, all under the `files`
/// form field.
pub fn upload_documents(
    client: &ApiClient,
    course_id: &str,
    files: &[UploadFile],
) -> anyhow::Result<()> {
    client.upload(&format!("/courses/upload/{}", course_id), "files", files)
}

pub fn delete_document(client: &ApiClient, doc_id: &str) -> anyhow::Result<()> {
    client.call_no_body("DELETE", &format!("/courses/documents/{}", doc_id))
}

/// Requires a bearer token on the client.
pub fn enroll(client: &ApiClient, course_id: &str) -> anyhow::Result<()> {
    client.call_no_body("POST", &format!("/courses/enroll/{}", course_id))
}

/// Completion percentage as last recorded by the backend.
pub fn progress(client: &ApiClient, user_id: &str, course_id: &str) -> anyhow::Result<f32> {
    let body = client.get_json(&format!(
        "/courses/progress/{}/course/{}",
        user_id, course_id
    ))?;
    get_attribute::<f32>(&body, "percentage")
        .or_else(|| body.as_f64().map(|f| f as f32))
        .context("progress response has no percentage")
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate<'a> {
    pub user_id: &'a str,
    pub course_id: &'a str,
    pub module_id: &'a str,
    pub section_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

pub fn record_progress(client: &ApiClient, update: &ProgressUpdate) -> anyhow::Result<()> {
    client
        .send_json("POST", "/courses/progress", update)
        .context("record progress")?;
    Ok(())
}

pub fn fetch_module(client: &ApiClient, module_id: &str) -> anyhow::Result<Module> {
    let body = client.get_json(&format!("/courses/module/{}", module_id))?;
    parse_module(&body).with_context(|| format!("parse module '{}'", module_id))
}

pub fn fetch_sections(client: &ApiClient, module_id: &str) -> anyhow::Result<Vec<Section>> {
    let body = client.get_json(&format!("/courses/section/{}", module_id))?;
    rows(&body)
        .context("no sections in response")?
        .iter()
        .enumerate()
        .map(|(index, row)| {
            parse_section(row, index)
                .with_context(|| format!("parse section '{}' of module '{}'", index, module_id))
        })
        .collect()
}

pub fn fetch_paragraphs(client: &ApiClient, section_id: &str) -> anyhow::Result<Vec<ContentBlock>> {
    let body = client.get_json(&format!("/courses/paragraph/{}", section_id))?;
    rows(&body)
        .context("no paragraphs in response")?
        .iter()
        .enumerate()
        .map(|(index, row)| {
            parse_block(row)
                .with_context(|| format!("parse block '{}' of section '{}'", index, section_id))
        })
        .collect()
}

pub fn fetch_flashcards(client: &ApiClient, module_id: &str) -> anyhow::Result<Vec<Flashcard>> {
    let body = client.get_json(&format!("/courses/{}/flashcards", module_id))?;
    rows(&body)
        .context("no flashcards in response")?
        .iter()
        .map(|row| {
            Ok(Flashcard {
                id: get_attribute(row, "id").context("flashcard must set id")?,
                front: localized(row, "front").context("flashcard must set front_en")?,
                back: localized(row, "back").context("flashcard must set back_en")?,
            })
        })
        .collect()
}

/// Exam questions for a section or final exam. Every question is validated
/// before it reaches a quiz attempt.
pub fn fetch_exam_questions(client: &ApiClient, id: &str) -> anyhow::Result<Vec<McqQuestion>> {
    let body = client.get_json(&format!("/courses/questions/{}", id))?;
    rows(&body)
        .context("no questions in response")?
        .iter()
        .map(|row| parse_question(row).with_context(|| format!("parse question for '{}'", id)))
        .collect()
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NextLocation {
    pub module_id: String,
    pub section_id: String,
}

/// Asks the backend what follows the given section. `None` means the course
/// content is exhausted and the final exam is next.
pub fn next_location(
    client: &ApiClient,
    course_id: &str,
    module_id: &str,
    section_id: &str,
) -> anyhow::Result<Option<NextLocation>> {
    let body = client.get_json(&format!(
        "/courses/{}/{}/{}",
        course_id, module_id, section_id
    ))?;

    if body.is_null() {
        return Ok(None);
    }
    let module_id: Option<String> = get_attribute(&body, "moduleId");
    let section_id: Option<String> = get_attribute(&body, "sectionId");
    match (module_id, section_id) {
        (Some(module_id), Some(section_id)) => Ok(Some(NextLocation {
            module_id,
            section_id,
        })),
        _ => Ok(None),
    }
}

fn rows(body: &Value) -> Option<&Vec<Value>> {
    body.as_array().or_else(|| body.get("data")?.as_array())
}

fn collect_courses(body: &Value) -> anyhow::Result<Vec<Course>> {
    rows(body)
        .context("no courses in response")?
        .iter()
        .enumerate()
        .map(|(index, row)| parse_course(row).with_context(|| format!("parse course '{}'", index)))
        .collect()
}

fn parse_course(value: &Value) -> anyhow::Result<Course> {
    let id = get_attribute::<String>(value, "id").context("course must set id")?;
    let title = get_attribute::<String>(value, "title")
        .with_context(|| format!("course '{}' must set title", id))?;

    let difficulty = match get_attribute::<String>(value, "difficulty").as_deref() {
        Some("advanced") => Difficulty::Advanced,
        Some("intermediate") => Difficulty::Intermediate,
        _ => Difficulty::Beginner,
    };

    let tags = value
        .get("tags")
        .and_then(|v| v.as_array())
        .map(|tags| {
            tags.iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    let modules = match value.get("modules").and_then(|v| v.as_array()) {
        Some(rows) => rows
            .iter()
            .map(|row| parse_module(row).with_context(|| format!("in course '{}'", id)))
            .collect::<anyhow::Result<Vec<Module>>>()?,
        None => Vec::new(),
    };

    let final_exam = match value.get("finalExam").and_then(|v| v.as_array()) {
        Some(rows) => Some(
            rows.iter()
                .map(|row| {
                    parse_question(row).with_context(|| format!("final exam of course '{}'", id))
                })
                .collect::<anyhow::Result<Vec<McqQuestion>>>()?,
        ),
        None => None,
    };

    Ok(Course {
        id,
        title,
        description: get_attribute(value, "description"),
        difficulty,
        tags,
        modules,
        final_exam,
    })
}

fn parse_module(value: &Value) -> anyhow::Result<Module> {
    let id = get_attribute::<String>(value, "id").context("module must set id")?;
    let sections = match value.get("sections").and_then(|v| v.as_array()) {
        Some(rows) => rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                parse_section(row, index).with_context(|| format!("in module '{}'", id))
            })
            .collect::<anyhow::Result<Vec<Section>>>()?,
        None => Vec::new(),
    };

    Ok(Module {
        title: localized(value, "title")
            .with_context(|| format!("module '{}' must set title_en", id))?,
        order: get_attribute(value, "order").unwrap_or_default(),
        id,
        sections,
    })
}

fn parse_section(value: &Value, index: usize) -> anyhow::Result<Section> {
    let id = get_attribute::<String>(value, "id").context("section must set id")?;

    let blocks = match value.get("blocks").and_then(|v| v.as_array()) {
        Some(rows) => rows
            .iter()
            .map(|row| parse_block(row).with_context(|| format!("in section '{}'", id)))
            .collect::<anyhow::Result<Vec<ContentBlock>>>()?,
        None => Vec::new(),
    };

    let questions = match value.get("questions").and_then(|v| v.as_array()) {
        Some(rows) => rows
            .iter()
            .map(|row| parse_question(row).with_context(|| format!("in section '{}'", id)))
            .collect::<anyhow::Result<Vec<McqQuestion>>>()?,
        None => Vec::new(),
    };

    Ok(Section {
        title: localized(value, "title")
            .with_context(|| format!("section '{}' must set title_en", id))?,
        order: get_attribute(value, "order").unwrap_or(index),
        id,
        blocks,
        questions,
    })
}

/// A row is a media block when it carries a media url, otherwise a
/// localized paragraph.
fn parse_block(value: &Value) -> anyhow::Result<ContentBlock> {
    if let Some(url) = get_attribute::<String>(value, "mediaUrl") {
        let kind = match get_attribute::<String>(value, "mediaType").as_deref() {
            Some("image") => MediaKind::Image,
            _ => MediaKind::Video,
        };
        return Ok(ContentBlock::Media {
            item: MediaItem {
                kind,
                url,
                caption: get_attribute(value, "caption"),
            },
        });
    }

    Ok(ContentBlock::Paragraph {
        text: localized(value, "text").context("paragraph must set text_en")?,
    })
}

fn parse_question(value: &Value) -> anyhow::Result<McqQuestion> {
    let id = get_attribute::<String>(value, "id").context("question must set id")?;

    let options = value
        .get("options")
        .and_then(|v| v.as_array())
        .with_context(|| format!("question '{}' has no options", id))?
        .iter()
        .map(|row| {
            let option_id = get_attribute::<String>(row, "id")
                .with_context(|| format!("in question '{}', one option has no id", id))?;
            let text = localized(row, "text").with_context(|| {
                format!("in question '{}', option '{}' has no text_en", id, option_id)
            })?;
            Ok(McqOption {
                id: option_id,
                text,
            })
        })
        .collect::<anyhow::Result<Vec<McqOption>>>()?;

    let question = McqQuestion {
        prompt: localized(value, "prompt")
            .with_context(|| format!("question '{}' must set prompt_en", id))?,
        correct_option_id: get_attribute(value, "correctOptionId")
            .with_context(|| format!("question '{}' must set correctOptionId", id))?,
        explanation: localized(value, "explanation"),
        id,
        options,
    };

    question.validate()?;
    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question_row() -> Value {
        json!({
            "id": 5,
            "prompt_en": "What is ownership?",
            "prompt_ar": "ما هي الملكية؟",
            "prompt_fr": "Qu'est-ce que la propriété ?",
            "correctOptionId": "o2",
            "options": [
                {"id": "o1", "text_en": "A lint"},
                {"id": "o2", "text_en": "A memory discipline"},
                {"id": "o3", "text_en": "A macro"}
            ]
        })
    }

    #[test]
    fn parse_question_builds_localized_prompt_and_options() {
        let q = parse_question(&question_row()).unwrap();
        assert_eq!(q.id, "5");
        assert_eq!(q.prompt.en, "What is ownership?");
        assert_eq!(q.options.len(), 3);
        assert_eq!(q.correct_option_id, "o2");
        assert_eq!(q.explanation, None);
    }

    #[test]
    fn parse_question_rejects_dangling_correct_option() {
        let mut row = question_row();
        row["correctOptionId"] = json!("o9");
        assert!(parse_question(&row).is_err());
    }

    #[test]
    fn parse_block_dispatches_on_media_url() {
        let paragraph = json!({"text_en": "Hello", "text_fr": "Bonjour"});
        assert!(matches!(
            parse_block(&paragraph).unwrap(),
            ContentBlock::Paragraph { text } if text.fr == "Bonjour"
        ));

        let media = json!({
            "mediaUrl": "https://youtu.be/abc",
            "mediaType": "video",
            "caption": "Intro"
        });
        assert!(matches!(
            parse_block(&media).unwrap(),
            ContentBlock::Media { item } if item.kind == MediaKind::Video
        ));
    }

    #[test]
    fn parse_course_reads_summary_fields() {
        let row = json!({
            "id": "c1",
            "title": "Rust basics",
            "difficulty": "intermediate",
            "tags": ["rust", "memory"],
        });
        let course = parse_course(&row).unwrap();
        assert_eq!(course.difficulty, Difficulty::Intermediate);
        assert_eq!(course.tags, vec!["rust", "memory"]);
        assert!(course.modules.is_empty());
        assert_eq!(course.final_exam, None);
    }

    #[test]
    fn parse_course_with_modules_and_final_exam() {
        let row = json!({
            "id": "c1",
            "title": "Rust basics",
            "modules": [{
                "id": "m1",
                "title_en": "Getting started",
                "order": 0,
                "sections": [{
                    "id": "s1",
                    "title_en": "Hello",
                    "blocks": [{"text_en": "Welcome"}],
                    "questions": [question_row()]
                }]
            }],
            "finalExam": [question_row()]
        });

        let course = parse_course(&row).unwrap();
        assert_eq!(course.modules.len(), 1);
        assert_eq!(course.modules[0].sections[0].questions.len(), 1);
        assert_eq!(course.final_exam.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn rows_accepts_bare_arrays_and_data_envelopes() {
        let bare = json!([{"id": 1}]);
        let wrapped = json!({"data": [{"id": 1}]});
        assert_eq!(rows(&bare).unwrap().len(), 1);
        assert_eq!(rows(&wrapped).unwrap().len(), 1);
        assert!(rows(&json!({"other": 1})).is_none());
    }
}
