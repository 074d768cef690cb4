//! Token event journal.
//!
//! Every applied operation appends exactly one record. Records are never
//! mutated or removed, so the journal is a replayable history of the
//! ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokenbook_common::{Address, Amount};
use uuid::Uuid;

/// Unique identifier for a journal event.
/// Uses UUID v7 for time-ordered identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Create a new event ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event emitted by a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// Tokens moved between accounts. The genesis credit is recorded as a
    /// transfer from the null address.
    Transfer {
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// An allowance was set to a new absolute value.
    Approval {
        owner: Address,
        spender: Address,
        amount: Amount,
    },
}

/// A recorded event with its journal metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event ID.
    pub id: EventId,
    /// Position in the journal, starting at 0 with the genesis transfer.
    pub seq: u64,
    /// When this event was recorded.
    pub recorded_at: DateTime<Utc>,
    /// The event payload.
    pub event: TokenEvent,
}

/// Append-only journal of emitted events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventJournal {
    records: Vec<EventRecord>,
}

impl EventJournal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append an event, assigning it the next sequence number.
    pub(crate) fn append(&mut self, event: TokenEvent) -> EventId {
        let id = EventId::new();
        self.records.push(EventRecord {
            id,
            seq: self.records.len() as u64,
            recorded_at: Utc::now(),
            event,
        });
        id
    }

    /// All records in emission order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the journal is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently recorded event.
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Iterate over transfer events only.
    pub fn transfers(&self) -> impl Iterator<Item = &EventRecord> {
        self.records
            .iter()
            .filter(|record| matches!(record.event, TokenEvent::Transfer { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenbook_common::ADDRESS_LEN;

    fn addr(byte: u8) -> Address {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 1] = byte;
        Address::new(bytes)
    }

    #[test]
    fn test_append_assigns_sequence() {
        let mut journal = EventJournal::new();
        assert!(journal.is_empty());

        let first = journal.append(TokenEvent::Transfer {
            from: addr(1),
            to: addr(2),
            amount: Amount::from_whole(10),
        });
        let second = journal.append(TokenEvent::Approval {
            owner: addr(1),
            spender: addr(2),
            amount: Amount::from_whole(5),
        });

        assert_ne!(first, second);
        assert_eq!(journal.len(), 2);
        assert_eq!(journal.records()[0].seq, 0);
        assert_eq!(journal.records()[1].seq, 1);
        assert_eq!(journal.last().map(|r| r.seq), Some(1));
    }

    #[test]
    fn test_transfers_filter() {
        let mut journal = EventJournal::new();
        journal.append(TokenEvent::Transfer {
            from: addr(1),
            to: addr(2),
            amount: Amount::ONE,
        });
        journal.append(TokenEvent::Approval {
            owner: addr(1),
            spender: addr(2),
            amount: Amount::ONE,
        });

        assert_eq!(journal.transfers().count(), 1);
    }

    #[test]
    fn test_record_serialization() {
        let mut journal = EventJournal::new();
        journal.append(TokenEvent::Transfer {
            from: addr(1),
            to: addr(2),
            amount: Amount::from_whole(100),
        });

        let json = serde_json::to_string(journal.records()).unwrap();
        let back: Vec<EventRecord> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back[0].event, journal.records()[0].event);
        assert_eq!(back[0].id, journal.records()[0].id);
    }
}
