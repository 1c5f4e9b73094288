use crate::models::{ALL_RECIPIENTS, Message, MessageKind};

/// Room presence changes that the server announces as status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    /// A participant registered
    Joined,
    /// A participant was swept for inactivity
    Left,
}

impl PresenceEvent {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Joined => "entra na sala...",
            Self::Left => "Sai da sala...",
        }
    }

    /// The status message broadcast to everyone for `name`.
    pub fn announce(&self, name: &str) -> Message {
        Message::new(name, ALL_RECIPIENTS, self.text(), MessageKind::Status)
    }
}
