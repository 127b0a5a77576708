use serde::{Deserialize, Serialize};

use crate::store::Keyed;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Admin,
    SuperAdmin,
}

/// Enrollment in one course, mirroring whatever the last progress read
/// returned. The client never owns progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Enrollment {
    pub course_id: String,
    pub progress_percent: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization_id: Option<String>,
    pub enrollments: Vec<Enrollment>,
}

impl Keyed for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Organization {
    pub id: String,
    pub name: String,

    /// user ids with admin rights over this organization
    pub admin_ids: Vec<String>,
}

impl Keyed for Organization {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}
