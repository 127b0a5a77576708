use super::client::ApiClient;
use super::courses::{next_location, record_progress, ProgressUpdate};

/// Where sequential traversal goes after a section.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    Section {
        module_id: String,
        section_id: String,
    },
    FinalExam,
}

/// Advances past a just-completed section: posts the completed location,
/// then asks the backend what comes next. A failed next-location read is
/// logged and aborts the navigation; the caller stays where it is. No
/// retries. The backend remains the only authority on progress.
pub fn advance(
    client: &ApiClient,
    user_id: &str,
    course_id: &str,
    module_id: &str,
    section_id: &str,
) -> anyhow::Result<NextStep> {
    record_progress(
        client,
        &ProgressUpdate {
            user_id,
            course_id,
            module_id,
            section_id,
            completed: Some(true),
        },
    )?;

    match next_location(client, course_id, module_id, section_id) {
        Ok(Some(next)) => Ok(NextStep::Section {
            module_id: next.module_id,
            section_id: next.section_id,
        }),
        Ok(None) => Ok(NextStep::FinalExam),
        Err(e) => {
            log::error!(
                "failed to resolve next location after {}/{}/{}: {:#}",
                course_id,
                module_id,
                section_id,
                e
            );
            Err(e)
        }
    }
}
