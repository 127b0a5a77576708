use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::client::ApiClient;
use crate::chat::{ChatMessage, ChatSession, Sender};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SessionDto {
    id: String,
    user_id: String,
    title: Option<String>,
    #[serde(default = "default_open")]
    open: bool,
}

fn default_open() -> bool {
    true
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct MessageDto {
    id: String,
    sender: String,
    body: String,
    sent_at: Option<String>,
}

impl From<MessageDto> for ChatMessage {
    fn from(dto: MessageDto) -> Self {
        ChatMessage {
            id: dto.id,
            sender: if dto.sender == "assistant" {
                Sender::Assistant
            } else {
                Sender::User
            },
            body: dto.body,
            sent_at: dto.sent_at,
        }
    }
}

pub fn create_session(client: &ApiClient, user_id: &str) -> anyhow::Result<ChatSession> {
    let body = client
        .send_json("POST", "/chat/session", &json!({ "userId": user_id }))
        .context("create chat session")?;

    let dto: SessionDto =
        serde_json::from_value(body).context("chat session response is malformed")?;
    Ok(ChatSession {
        id: dto.id,
        user_id: dto.user_id,
        title: dto.title,
        open: dto.open,
        messages: Vec::new(),
    })
}

pub fn end_session(client: &ApiClient, session_id: &str) -> anyhow::Result<()> {
    client.call_no_body("POST", &format!("/chat/session/{}/end", session_id))
}

pub fn reopen_session(client: &ApiClient, session_id: &str) -> anyhow::Result<()> {
    client.call_no_body("PATCH", &format!("/chat/session/{}/reopen", session_id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostMessageBody<'a> {
    session_id: &'a str,
    body: &'a str,
}

/// Sends the user's message; the response is the assistant's reply as the
/// backend stored it.
pub fn post_message(
    client: &ApiClient,
    session_id: &str,
    body: &str,
) -> anyhow::Result<ChatMessage> {
    let response = client
        .send_json(
            "POST",
            "/chat/message",
            &PostMessageBody { session_id, body },
        )
        .context("post chat message")?;

    let dto: MessageDto =
        serde_json::from_value(response).context("chat message response is malformed")?;
    Ok(dto.into())
}

pub fn messages(client: &ApiClient, session_id: &str) -> anyhow::Result<Vec<ChatMessage>> {
    let body = client.get_json(&format!("/chat/messages/{}", session_id))?;
    let dtos: Vec<MessageDto> =
        serde_json::from_value(body).context("chat history response is malformed")?;
    Ok(dtos.into_iter().map(ChatMessage::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_dto_maps_sender_tags() {
        let dto = MessageDto {
            id: "m1".to_string(),
            sender: "assistant".to_string(),
            body: "hello".to_string(),
            sent_at: None,
        };
        let message: ChatMessage = dto.into();
        assert_eq!(message.sender, Sender::Assistant);

        let dto = MessageDto {
            id: "m2".to_string(),
            sender: "user".to_string(),
            body: "hi".to_string(),
            sent_at: Some("2026-01-01T00:00:00Z".to_string()),
        };
        let message: ChatMessage = dto.into();
        assert_eq!(message.sender, Sender::User);
    }
}
