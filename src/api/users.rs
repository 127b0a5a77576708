use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use super::client::{ApiClient, ApiError};
use super::get_attribute;
use crate::accounts::{Enrollment, Role, User};
use crate::session::SessionStore;

/// Resolves the signed-in user from the subject identifier held in the
/// session. The subject is reread on every call; pages stay stateless.
pub fn current_user(client: &ApiClient, session: &dyn SessionStore) -> anyhow::Result<User> {
    let subject = session.subject().ok_or(ApiError::MissingSession)?;

    let body = client.get_json(&format!("/users/by-sub-db/{}", subject))?;
    parse_user(&body).with_context(|| format!("parse user for subject '{}'", subject))
}

/// Bearer-token gate for protected routes. Only an auth rejection maps to
/// `false`; transport failures propagate.
pub fn verify_token(client: &ApiClient) -> anyhow::Result<bool> {
    let status = client.status_of("GET", "/users/verify")?;
    match status {
        200..=299 => Ok(true),
        401 | 403 => Ok(false),
        other => Err(ApiError::Status { status: other })
            .context("GET /users/verify failed"),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewPasswordBody<'a> {
    email: &'a str,
    session: &'a str,
    new_password: &'a str,
}

pub fn complete_new_password(
    client: &ApiClient,
    email: &str,
    session: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    client
        .send_json(
            "POST",
            "/users/complete-new-password",
            &NewPasswordBody {
                email,
                session,
                new_password,
            },
        )
        .context("password completion failed")?;
    Ok(())
}

fn parse_user(value: &Value) -> anyhow::Result<User> {
    let id = get_attribute::<String>(value, "id").context("user must set id")?;
    let name = get_attribute::<String>(value, "name").unwrap_or_default();
    let email = get_attribute::<String>(value, "email").context("user must set email")?;

    let role = match get_attribute::<String>(value, "role").as_deref() {
        Some("admin") => Role::Admin,
        Some("superadmin") => Role::SuperAdmin,
        _ => Role::Learner,
    };

    let enrollments = value
        .get("enrollments")
        .and_then(|v| v.as_array())
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    let course_id = get_attribute::<String>(row, "courseId")
                        .context("enrollment must set courseId")?;
                    let progress_percent =
                        get_attribute::<f32>(row, "progressPercent").unwrap_or(0.0);
                    Ok(Enrollment {
                        course_id,
                        progress_percent,
                    })
                })
                .collect::<anyhow::Result<Vec<Enrollment>>>()
        })
        .transpose()?
        .unwrap_or_default();

    Ok(User {
        id,
        name,
        email,
        role,
        organization_id: get_attribute(value, "organizationId"),
        enrollments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_user_maps_role_and_enrollments() {
        let body = json!({
            "id": 12,
            "name": "Ana",
            "email": "ana@example.com",
            "role": "admin",
            "organizationId": "org-1",
            "enrollments": [
                {"courseId": "c1", "progressPercent": 62.5},
                {"courseId": "c2"}
            ]
        });

        let user = parse_user(&body).unwrap();
        assert_eq!(user.id, "12");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.organization_id.as_deref(), Some("org-1"));
        assert_eq!(user.enrollments.len(), 2);
        assert_eq!(user.enrollments[0].progress_percent, 62.5);
        assert_eq!(user.enrollments[1].progress_percent, 0.0);
    }

    #[test]
    fn unknown_role_defaults_to_learner() {
        let body = json!({"id": "u1", "email": "x@example.com"});
        let user = parse_user(&body).unwrap();
        assert_eq!(user.role, Role::Learner);
        assert!(user.enrollments.is_empty());
    }

    #[test]
    fn user_without_id_is_rejected() {
        let body = json!({"email": "x@example.com"});
        assert!(parse_user(&body).is_err());
    }
}
