use std::sync::Mutex;

use anyhow::Result;
use batepapo_types::{Message, Participant};
use uuid::Uuid;

use crate::store::ChatStore;

/// In-process store with the same semantics as [`crate::Database`].
/// Backs the test suites and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    participants: Mutex<Vec<Participant>>,
    messages: Mutex<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>> {
    m.lock().map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))
}

impl ChatStore for MemoryStore {
    fn insert_participant(&self, participant: &Participant) -> Result<bool> {
        let mut participants = lock(&self.participants)?;
        if participants.iter().any(|p| p.name == participant.name) {
            return Ok(false);
        }
        participants.push(participant.clone());
        Ok(true)
    }

    fn find_participant(&self, name: &str) -> Result<Option<Participant>> {
        Ok(lock(&self.participants)?.iter().find(|p| p.name == name).cloned())
    }

    fn list_participants(&self) -> Result<Vec<Participant>> {
        Ok(lock(&self.participants)?.clone())
    }

    fn touch_participant(&self, name: &str, last_status: i64) -> Result<bool> {
        let mut participants = lock(&self.participants)?;
        match participants.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.last_status = last_status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_participant(&self, name: &str) -> Result<bool> {
        let mut participants = lock(&self.participants)?;
        let before = participants.len();
        participants.retain(|p| p.name != name);
        Ok(participants.len() != before)
    }

    fn insert_message(&self, message: &Message) -> Result<()> {
        lock(&self.messages)?.push(message.clone());
        Ok(())
    }

    fn find_message(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(lock(&self.messages)?.iter().find(|m| m.id == id).cloned())
    }

    fn visible_messages(&self, user: &str) -> Result<Vec<Message>> {
        Ok(lock(&self.messages)?
            .iter()
            .filter(|m| m.is_visible_to(user))
            .cloned()
            .collect())
    }

    fn delete_message(&self, id: Uuid) -> Result<bool> {
        let mut messages = lock(&self.messages)?;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        Ok(messages.len() != before)
    }
}
