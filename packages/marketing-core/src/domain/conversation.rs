//! In-memory per-(user, group) conversation memory for the Ask Orchestrator
//! (spec §3, §5). A single mutex guards the whole map; readers receive an
//! owned clone of the slice so no reader ever observes a torn write.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

const MAX_TURNS: usize = 3;
const MAX_AGE_HOURS: i64 = 2;

#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
    pub context_block: String,
    pub hits: usize,
    pub at: DateTime<Utc>,
}

type MemoryKey = (i64, i64);

pub struct ConversationMemory {
    turns: Mutex<HashMap<MemoryKey, VecDeque<ConversationTurn>>>,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self {
            turns: Mutex::new(HashMap::new()),
        }
    }

    /// Last <=3 turns no older than 2h for `(user, group)`, oldest first.
    pub fn recent(&self, user_id: i64, group_id: i64, now: DateTime<Utc>) -> Vec<ConversationTurn> {
        let mut guard = self.turns.lock().expect("conversation memory mutex poisoned");
        let key = (user_id, group_id);
        if let Some(queue) = guard.get_mut(&key) {
            evict(queue, now);
            queue.iter().cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Push a turn with a fresh `at` timestamp, evicting on every write.
    pub fn push(&self, user_id: i64, group_id: i64, turn: ConversationTurn) {
        let mut guard = self.turns.lock().expect("conversation memory mutex poisoned");
        let key = (user_id, group_id);
        let queue = guard.entry(key).or_default();
        evict(queue, turn.at);
        queue.push_back(turn);
        while queue.len() > MAX_TURNS {
            queue.pop_front();
        }
    }
}

fn evict(queue: &mut VecDeque<ConversationTurn>, now: DateTime<Utc>) {
    let cutoff = now - Duration::hours(MAX_AGE_HOURS);
    while let Some(front) = queue.front() {
        if front.at < cutoff {
            queue.pop_front();
        } else {
            break;
        }
    }
    while queue.len() > MAX_TURNS {
        queue.pop_front();
    }
}
