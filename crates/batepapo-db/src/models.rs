//! Database row types. These map directly to SQLite rows and are converted into
//! the shared `batepapo-types` models at the store boundary.

use anyhow::{Context, Result};
use batepapo_types::{Message, Participant};

pub struct ParticipantRow {
    pub name: String,
    pub last_status: i64,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Participant::new(row.name, row.last_status)
    }
}

pub struct MessageRow {
    pub id: String,
    pub from_name: String,
    pub to_name: String,
    pub text: String,
    pub kind: String,
    pub time: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = anyhow::Error;

    fn try_from(row: MessageRow) -> Result<Self> {
        Ok(Message {
            id: row
                .id
                .parse()
                .with_context(|| format!("corrupt message id '{}'", row.id))?,
            kind: row
                .kind
                .parse()
                .with_context(|| format!("corrupt kind on message '{}'", row.id))?,
            from: row.from_name,
            to: row.to_name,
            text: row.text,
            time: row.time,
        })
    }
}
