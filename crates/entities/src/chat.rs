//! Chat and message entity definitions.

use bson::DateTime;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Kind of conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Direct,
    Group,
}

impl ChatKind {
    /// Returns the wire representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatKind::Direct => "direct",
            ChatKind::Group => "group",
        }
    }

    /// Parses a wire value. Values outside the closed set are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "direct" => Some(ChatKind::Direct),
            "group" => Some(ChatKind::Group),
            _ => None,
        }
    }
}

/// Summary of the most recent message in a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastMessage {
    /// Author of the message.
    pub sender_id: ObjectId,
    /// Message text, possibly truncated.
    pub content: String,
    /// When the message was sent.
    pub sent_at: DateTime,
}

/// A conversation between two or more users.
///
/// Chats are soft-deleted: `is_active` is flipped to `false` rather than
/// removing the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Kind of conversation.
    #[serde(rename = "type")]
    pub kind: ChatKind,
    /// Members of the conversation. Exactly two for direct chats.
    pub participants: Vec<ObjectId>,
    /// Title. Required for group chats.
    pub title: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Members allowed to administer a group chat.
    pub admins: Vec<ObjectId>,
    /// Summary of the most recent message.
    pub last_message: Option<LastMessage>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// When this record was created.
    pub created_at: DateTime,
    /// When this record was last updated.
    pub updated_at: DateTime,
}

impl Chat {
    /// Creates a direct chat between two users.
    pub fn direct(a: ObjectId, b: ObjectId) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            kind: ChatKind::Direct,
            participants: vec![a, b],
            title: None,
            description: None,
            admins: Vec::new(),
            last_message: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a group chat administered by its creator.
    pub fn group(creator: ObjectId, participants: Vec<ObjectId>, title: impl Into<String>) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            kind: ChatKind::Group,
            participants,
            title: Some(title.into()),
            description: None,
            admins: vec![creator],
            last_message: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if `user` is a member of this chat.
    pub fn is_participant(&self, user: ObjectId) -> bool {
        self.participants.contains(&user)
    }

    /// Returns true if `user` administers this chat.
    pub fn is_admin(&self, user: ObjectId) -> bool {
        self.admins.contains(&user)
    }
}

/// A single message within a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Chat this message belongs to.
    pub chat_id: ObjectId,
    /// Author.
    pub sender_id: ObjectId,
    /// Message text.
    pub content: String,
    /// When the message was sent.
    pub created_at: DateTime,
}

impl Message {
    /// Creates a new message in `chat_id`.
    pub fn new(chat_id: ObjectId, sender_id: ObjectId, content: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            chat_id,
            sender_id,
            content: content.into(),
            created_at: DateTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_chat_membership() {
        let (a, b, stranger) = (ObjectId::new(), ObjectId::new(), ObjectId::new());
        let chat = Chat::direct(a, b);

        assert_eq!(chat.kind, ChatKind::Direct);
        assert!(chat.is_participant(a));
        assert!(chat.is_participant(b));
        assert!(!chat.is_participant(stranger));
        assert!(chat.is_active);
    }

    #[test]
    fn test_group_chat_creator_is_admin() {
        let creator = ObjectId::new();
        let other = ObjectId::new();
        let chat = Chat::group(creator, vec![creator, other], "Morning commute");

        assert_eq!(chat.kind, ChatKind::Group);
        assert_eq!(chat.title.as_deref(), Some("Morning commute"));
        assert!(chat.is_admin(creator));
        assert!(!chat.is_admin(other));
    }

    #[test]
    fn test_chat_kind_wire_format() {
        assert_eq!(serde_json::to_string(&ChatKind::Group).unwrap(), "\"group\"");
        assert_eq!(ChatKind::parse("direct"), Some(ChatKind::Direct));
        assert_eq!(ChatKind::parse("broadcast"), None);
    }
}
