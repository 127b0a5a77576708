use thiserror::Error;

use crate::accounts::User;
use crate::chat::{ChatMessage, ChatSession};
use crate::content::{Course, McqQuestion, Module};

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("no entity with id '{id}'")]
    NotFound { id: String },
}

/// Entities a `Store` can hold: identified by a string id, assignable when
/// the caller supplied none.
pub trait Keyed {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Keyed for Course {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Handed out by `begin_fetch`; a completed response is applied only when
/// its generation is still the latest issued, so a slow early fetch can
/// never clobber a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchGeneration(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    Stale,
}

/// Keyed in-memory collection behind the add/update/remove operations the
/// views are allowed to use. Insertion order is display order. Stores are
/// passed explicitly to whatever reads them, never kept as globals.
pub struct Store<T: Keyed> {
    items: Vec<T>,
    next_local_id: u64,
    latest_fetch: u64,
}

pub type UserStore = Store<User>;
pub type CourseStore = Store<Course>;
pub type ChatStore = Store<ChatSession>;

impl<T: Keyed> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> Store<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_local_id: 0,
            latest_fetch: 0,
        }
    }

    /// Starts from fixture data.
    pub fn seeded(items: Vec<T>) -> Self {
        Self {
            items,
            next_local_id: 0,
            latest_fetch: 0,
        }
    }

    /// Appends the entity, assigning a generated id when the caller (or a
    /// merged-back server response) supplied none. Returns the id under
    /// which the entity is stored.
    pub fn add(&mut self, mut entity: T) -> String {
        if entity.id().is_empty() {
            self.next_local_id += 1;
            entity.set_id(format!("local-{}", self.next_local_id));
        }
        let id = entity.id().to_string();
        self.items.push(entity);
        id
    }

    /// Applies `patch` to the matching entity. The collection is unchanged
    /// when the id is absent.
    pub fn update(&mut self, id: &str, patch: impl FnOnce(&mut T)) -> Result<(), StoreError> {
        match self.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch(item);
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    /// Removes and returns the matching entity. Closing a detail view that
    /// referenced the id is the caller's job.
    pub fn remove(&mut self, id: &str) -> Result<T, StoreError> {
        match self.items.iter().position(|item| item.id() == id) {
            Some(index) => Ok(self.items.remove(index)),
            None => Err(StoreError::NotFound { id: id.to_string() }),
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Call before issuing a fetch whose response will be applied with
    /// `apply_fetch`.
    pub fn begin_fetch(&mut self) -> FetchGeneration {
        self.latest_fetch += 1;
        FetchGeneration(self.latest_fetch)
    }

    /// Replaces the collection with a fetch response, unless a newer fetch
    /// has been issued since; stale responses are discarded.
    pub fn apply_fetch(&mut self, generation: FetchGeneration, items: Vec<T>) -> SyncOutcome {
        if generation.0 < self.latest_fetch {
            return SyncOutcome::Stale;
        }
        self.items = items;
        SyncOutcome::Applied
    }
}

impl Store<Course> {
    /// Append-only, used by the course-authoring flow.
    pub fn inject_module(&mut self, course_id: &str, module: Module) -> Result<(), StoreError> {
        self.update(course_id, |course| course.modules.push(module))
    }

    /// Appends questions to the final exam, creating it when absent.
    pub fn inject_final_exam(
        &mut self,
        course_id: &str,
        questions: Vec<McqQuestion>,
    ) -> Result<(), StoreError> {
        self.update(course_id, |course| {
            course
                .final_exam
                .get_or_insert_with(Vec::new)
                .extend(questions)
        })
    }
}

impl Store<ChatSession> {
    pub fn end_session(&mut self, id: &str) -> Result<(), StoreError> {
        self.update(id, |session| session.open = false)
    }

    pub fn reopen_session(&mut self, id: &str) -> Result<(), StoreError> {
        self.update(id, |session| session.open = true)
    }

    pub fn append_message(
        &mut self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<(), StoreError> {
        self.update(session_id, |session| session.messages.push(message))
    }
}
