use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recipient name that addresses every participant in the room.
pub const ALL_RECIPIENTS: &str = "Todos";

/// Wall-clock format used for the `time` field of every message.
pub const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    /// Last heartbeat, epoch milliseconds.
    #[serde(rename = "lastStatus")]
    pub last_status: i64,
}

impl Participant {
    pub fn new(name: impl Into<String>, last_status: i64) -> Self {
        Self {
            name: name.into(),
            last_status,
        }
    }

    /// True once more than `threshold_ms` has passed since the last heartbeat.
    pub fn is_inactive(&self, now_ms: i64, threshold_ms: i64) -> bool {
        now_ms - self.last_status > threshold_ms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::PrivateMessage => "private_message",
            Self::Status => "status",
        }
    }

    /// Kinds a participant may post directly. Status messages are server-generated.
    pub fn is_user_postable(&self) -> bool {
        matches!(self, Self::Message | Self::PrivateMessage)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessageKind(pub String);

impl fmt::Display for UnknownMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown message type '{}'", self.0)
    }
}

impl std::error::Error for UnknownMessageKind {}

impl FromStr for MessageKind {
    type Err = UnknownMessageKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(Self::Message),
            "private_message" => Ok(Self::PrivateMessage),
            "status" => Ok(Self::Status),
            other => Err(UnknownMessageKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub time: String,
}

impl Message {
    /// Builds a new message stamped with a fresh id and the current local time.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            to: to.into(),
            text: text.into(),
            kind,
            time: clock_time(),
        }
    }

    /// A message is visible to `user` when they sent it, it is addressed to them or
    /// to everyone, or it is a public chat message.
    pub fn is_visible_to(&self, user: &str) -> bool {
        self.from == user
            || self.to == user
            || self.to == ALL_RECIPIENTS
            || self.kind == MessageKind::Message
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.from == user
    }
}

/// Current local wall-clock time as `HH:MM:SS`.
pub fn clock_time() -> String {
    chrono::Local::now().format(TIME_FORMAT).to_string()
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
