use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use enhancer_core::{EnhancementRequest, EnhancementResult};

pub const HISTORY_CAPACITY: usize = 100;
pub const HISTORY_PAGE_SIZE: usize = 50;

/// A completed enhancement, serialized with the result fields inlined.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub original_input: String,
    pub mode: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: EnhancementResult,
}

/// In-memory, most-recent-first record of completed enhancements.
pub struct HistoryStore {
    entries: RwLock<VecDeque<HistoryEntry>>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub async fn record(
        &self,
        request: &EnhancementRequest,
        result: &EnhancementResult,
    ) -> HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            original_input: request.input().to_string(),
            mode: request.mode().to_string(),
            created_at: Utc::now(),
            result: result.clone(),
        };

        let mut entries = self.entries.write().await;
        entries.push_front(entry.clone());
        entries.truncate(self.capacity);

        entry
    }

    pub async fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let entries = self.entries.read().await;
        entries.iter().take(limit).cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<HistoryEntry> {
        let id = Uuid::parse_str(id).ok()?;
        let entries = self.entries.read().await;
        entries.iter().find(|entry| entry.id == id).cloned()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}
