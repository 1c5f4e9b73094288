use anyhow::Result;
use batepapo_types::{Message, Participant};
use uuid::Uuid;

/// Storage capability used by the HTTP handlers and the inactivity sweep.
///
/// Every call is a single-collection operation; the implementation is the only
/// arbiter of write ordering. Implementations must keep participant names unique
/// and return messages in insertion order.
pub trait ChatStore: Send + Sync {
    // -- Participants --

    /// Inserts `participant`. Returns `false` without writing when the name is taken.
    fn insert_participant(&self, participant: &Participant) -> Result<bool>;

    fn find_participant(&self, name: &str) -> Result<Option<Participant>>;

    fn list_participants(&self) -> Result<Vec<Participant>>;

    /// Sets `lastStatus`. Returns `false` when no such participant exists.
    fn touch_participant(&self, name: &str, last_status: i64) -> Result<bool>;

    fn delete_participant(&self, name: &str) -> Result<bool>;

    // -- Messages --

    fn insert_message(&self, message: &Message) -> Result<()>;

    fn find_message(&self, id: Uuid) -> Result<Option<Message>>;

    /// Messages `user` may read, oldest first. See [`Message::is_visible_to`].
    fn visible_messages(&self, user: &str) -> Result<Vec<Message>>;

    fn delete_message(&self, id: Uuid) -> Result<bool>;
}
