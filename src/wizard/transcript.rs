//! Append-only log of operation outcomes

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Who a transcript message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub sender: Sender,
    /// Capture time of the entry
    pub timestamp: DateTime<Local>,
}

/// Ordered transcript; insertion order is display order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, text: impl Into<String>, sender: Sender) -> &TranscriptEntry {
        self.entries.push(TranscriptEntry {
            text: text.into(),
            sender,
            timestamp: Local::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Only a full restart does this.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
