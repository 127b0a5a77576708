use coursebook::accounts::{Enrollment, Role, User};
use coursebook::chat::{ChatMessage, ChatSession, Sender};
use coursebook::store::{ChatStore, StoreError, UserStore};

fn user(id: &str, name: &str, courses: &[&str]) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        role: Role::Learner,
        organization_id: Some("org-1".to_string()),
        enrollments: courses
            .iter()
            .map(|c| Enrollment {
                course_id: c.to_string(),
                progress_percent: 25.0,
            })
            .collect(),
    }
}

fn session(id: &str, user_id: &str) -> ChatSession {
    ChatSession {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: None,
        open: true,
        messages: vec![ChatMessage {
            id: format!("{id}-m1"),
            sender: Sender::User,
            body: "hello".to_string(),
            sent_at: None,
        }],
    }
}

// Seed two users with distinct enrollments and chats; deleting one must not
// touch the other's data. There is deliberately no cascade from users to
// chats.
#[test]
fn deleting_a_user_leaves_others_and_chats_untouched() {
    let mut users = UserStore::seeded(vec![
        user("u1", "ana", &["c1", "c2"]),
        user("u2", "bob", &["c3"]),
    ]);
    let mut chats = ChatStore::seeded(vec![session("s1", "u1"), session("s2", "u2")]);

    let bob_before = users.get("u2").cloned().unwrap();

    let removed = users.remove("u1").unwrap();
    assert_eq!(removed.name, "ana");

    assert_eq!(users.len(), 1);
    assert_eq!(users.get("u2"), Some(&bob_before));
    assert_eq!(
        users.get("u2").unwrap().enrollments[0].course_id,
        "c3".to_string()
    );

    // no cascade: both chat sessions are still there
    assert_eq!(chats.len(), 2);
    assert!(chats.get("s1").is_some());
    assert_eq!(chats.get("s2").unwrap().messages.len(), 1);

    // removing again signals not-found
    assert_eq!(
        users.remove("u1"),
        Err(StoreError::NotFound {
            id: "u1".to_string()
        })
    );

    chats.end_session("s1").unwrap();
    assert!(!chats.get("s1").unwrap().open);
}
