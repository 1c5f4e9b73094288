use crate::models::{MessageRow, ParticipantRow};
use crate::store::ChatStore;
use crate::Database;
use anyhow::Result;
use batepapo_types::{ALL_RECIPIENTS, Message, MessageKind, Participant};
use rusqlite::{Connection, Row};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str = "id, from_name, to_name, text, kind, time";

impl ChatStore for Database {
    // -- Participants --

    fn insert_participant(&self, participant: &Participant) -> Result<bool> {
        self.with_conn(|conn| {
            // The primary key on `name` makes a concurrent duplicate a no-op.
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO participants (name, last_status) VALUES (?1, ?2)",
                rusqlite::params![participant.name, participant.last_status],
            )?;
            Ok(inserted == 1)
        })
    }

    fn find_participant(&self, name: &str) -> Result<Option<Participant>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT name, last_status FROM participants WHERE name = ?1",
                    [name],
                    participant_from_row,
                )
                .optional()?;
            Ok(row.map(Participant::from))
        })
    }

    fn list_participants(&self) -> Result<Vec<Participant>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT name, last_status FROM participants ORDER BY rowid")?;
            let rows = stmt
                .query_map([], participant_from_row)?
                .map(|row| row.map(Participant::from))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    fn touch_participant(&self, name: &str, last_status: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE participants SET last_status = ?1 WHERE name = ?2",
                rusqlite::params![last_status, name],
            )?;
            Ok(updated > 0)
        })
    }

    fn delete_participant(&self, name: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM participants WHERE name = ?1", [name])?;
            Ok(deleted > 0)
        })
    }

    // -- Messages --

    fn insert_message(&self, message: &Message) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, from_name, to_name, text, kind, time)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    message.id.to_string(),
                    message.from,
                    message.to,
                    message.text,
                    message.kind.as_str(),
                    message.time,
                ],
            )?;
            Ok(())
        })
    }

    fn find_message(&self, id: Uuid) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1");
            let row = conn
                .query_row(&sql, [id.to_string()], message_from_row)
                .optional()?;
            row.map(Message::try_from).transpose()
        })
    }

    fn visible_messages(&self, user: &str) -> Result<Vec<Message>> {
        self.with_conn(|conn| query_visible_messages(conn, user))
    }

    fn delete_message(&self, id: Uuid) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM messages WHERE id = ?1", [id.to_string()])?;
            Ok(deleted > 0)
        })
    }
}

fn query_visible_messages(conn: &Connection, user: &str) -> Result<Vec<Message>> {
    // Same predicate as Message::is_visible_to
    let sql = format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages
         WHERE from_name = ?1 OR to_name = ?1 OR to_name = ?2 OR kind = ?3
         ORDER BY seq"
    );
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map(
            rusqlite::params![user, ALL_RECIPIENTS, MessageKind::Message.as_str()],
            message_from_row,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter().map(Message::try_from).collect()
}

fn participant_from_row(row: &Row<'_>) -> rusqlite::Result<ParticipantRow> {
    Ok(ParticipantRow {
        name: row.get(0)?,
        last_status: row.get(1)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        from_name: row.get(1)?,
        to_name: row.get(2)?,
        text: row.get(3)?,
        kind: row.get(4)?,
        time: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn participant_names_are_unique() {
        let db = db();
        assert!(db.insert_participant(&Participant::new("ana", 1)).unwrap());
        assert!(!db.insert_participant(&Participant::new("ana", 2)).unwrap());

        let all = db.list_participants().unwrap();
        assert_eq!(all, vec![Participant::new("ana", 1)]);
    }

    #[test]
    fn touch_and_delete_participant() {
        let db = db();
        db.insert_participant(&Participant::new("ana", 1)).unwrap();

        assert!(db.touch_participant("ana", 99).unwrap());
        assert!(!db.touch_participant("bia", 99).unwrap());
        assert_eq!(db.find_participant("ana").unwrap().unwrap().last_status, 99);

        assert!(db.delete_participant("ana").unwrap());
        assert!(db.find_participant("ana").unwrap().is_none());
        assert!(!db.delete_participant("ana").unwrap());
    }

    #[test]
    fn visible_messages_keep_insertion_order() {
        let db = db();
        let sent = [
            Message::new("ana", "bia", "1", MessageKind::PrivateMessage),
            Message::new("caio", "dani", "2", MessageKind::PrivateMessage),
            Message::new("caio", "dani", "3", MessageKind::Message),
            Message::new("caio", ALL_RECIPIENTS, "4", MessageKind::Status),
            Message::new("dani", "ana", "5", MessageKind::PrivateMessage),
        ];
        for m in &sent {
            db.insert_message(m).unwrap();
        }

        let texts: Vec<_> = db
            .visible_messages("ana")
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, ["1", "3", "4", "5"]);
    }

    #[test]
    fn find_and_delete_message() {
        let db = db();
        let m = Message::new("ana", "bia", "oi", MessageKind::PrivateMessage);
        db.insert_message(&m).unwrap();

        assert_eq!(db.find_message(m.id).unwrap(), Some(m.clone()));
        assert!(db.delete_message(m.id).unwrap());
        assert!(db.find_message(m.id).unwrap().is_none());
        assert!(!db.delete_message(Uuid::new_v4()).unwrap());
    }
}
