mod chat;
mod client;
mod courses;
mod navigate;
mod users;

pub use chat::{create_session, end_session, messages, post_message, reopen_session};
pub use client::{ApiClient, ApiError, UploadFile};
pub use courses::{
    course_details, delete_document, enroll, fetch_exam_questions, fetch_flashcards, fetch_module,
    fetch_paragraphs, fetch_sections, next_location, organization_courses, progress,
    record_progress, update_course, upload_documents, user_courses, CourseUpdate, NextLocation,
    ProgressUpdate,
};
pub use navigate::{advance, NextStep};
pub use users::{complete_new_password, current_user, verify_token};

use serde_json::Value;
use std::str::FromStr;

use crate::content::LocalizedText;

pub(crate) fn get_attribute<T>(value: &Value, attribute: &str) -> Option<T>
where
    T: FromStr,
{
    value.get(attribute).and_then(|v| match v {
        Value::String(s) => T::from_str(s).ok(),
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                T::from_str(&f.to_string()).ok()
            } else {
                None
            }
        }
        Value::Bool(b) => T::from_str(&b.to_string()).ok(),
        _ => None,
    })
}

/// Collects the backend's `{base}_en` / `{base}_ar` / `{base}_fr` field
/// triple into one record. The English field is required; the others
/// default to empty when a row was never translated.
pub(crate) fn localized(value: &Value, base: &str) -> Option<LocalizedText> {
    let field = |suffix: &str| get_attribute::<String>(value, &format!("{}_{}", base, suffix));
    Some(LocalizedText::new(
        field("en")?,
        field("ar").unwrap_or_default(),
        field("fr").unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_attribute_reads_strings_numbers_and_bools() {
        let value = json!({"id": 7, "title": "intro", "done": true});
        assert_eq!(get_attribute::<String>(&value, "id").as_deref(), Some("7"));
        assert_eq!(
            get_attribute::<String>(&value, "title").as_deref(),
            Some("intro")
        );
        assert_eq!(get_attribute::<bool>(&value, "done"), Some(true));
        assert_eq!(get_attribute::<String>(&value, "missing"), None);
    }

    #[test]
    fn localized_requires_english_and_defaults_the_rest() {
        let value = json!({"title_en": "Intro", "title_fr": "Intro (fr)"});
        let text = localized(&value, "title").unwrap();
        assert_eq!(text.en, "Intro");
        assert_eq!(text.ar, "");
        assert_eq!(text.fr, "Intro (fr)");

        assert!(localized(&value, "body").is_none());
    }
}
