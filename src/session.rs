/// The one place session state (auth token + user subject identifier) is
/// read or written. Pages receive an implementation instead of reaching
/// into browser storage themselves.
pub trait SessionStore {
    fn token(&self) -> Option<String>;
    fn set_token(&mut self, token: String);

    /// Subject identifier of the signed-in user, resolved to a user id by
    /// `api::users::current_user` on every call that needs one.
    fn subject(&self) -> Option<String>;
    fn set_subject(&mut self, subject: String);

    fn clear(&mut self);
}

#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    token: Option<String>,
    subject: Option<String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn subject(&self) -> Option<String> {
        self.subject.clone()
    }

    fn set_subject(&mut self, subject: String) {
        self.subject = Some(subject);
    }

    fn clear(&mut self) {
        self.token = None;
        self.subject = None;
    }
}
