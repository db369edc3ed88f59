//! Waiting and service sets with the scheduler's two total orders.
//!
//! Both collections are `BTreeSet`s over composite keys implementing the
//! ordering contract, paired with a room-id index so entries can be removed
//! or re-keyed in O(log n). Elapsed-time advancement rebuilds the sets; the
//! sets are bounded by the room count, so a rebuild is cheaper than trying
//! to re-sort in place.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::core::types::{Priority, RoomId};

/// A queue entry as seen by callers: room, current priority, and minutes
/// elapsed in the containing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    /// Room the entry belongs to.
    pub room_id: RoomId,
    /// Current scheduling priority.
    pub priority: Priority,
    /// Simulated minutes spent in the containing collection.
    pub elapsed_min: u64,
}

/// Waiting-set key: priority descending, elapsed waiting time descending,
/// room id ascending. The minimum of this order is the most eligible waiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WaitingKey {
    priority: Priority,
    elapsed_min: u64,
    room_id: RoomId,
}

impl Ord for WaitingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then(other.elapsed_min.cmp(&self.elapsed_min))
            .then(self.room_id.cmp(&other.room_id))
    }
}

impl PartialOrd for WaitingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Service-set key: priority ascending, elapsed service time descending,
/// room id ascending. The minimum of this order is the most evictable
/// served room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ServiceKey {
    priority: Priority,
    elapsed_min: u64,
    room_id: RoomId,
}

impl Ord for ServiceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then(other.elapsed_min.cmp(&self.elapsed_min))
            .then(self.room_id.cmp(&other.room_id))
    }
}

impl PartialOrd for ServiceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Manager of the waiting and service sets. A room id appears in at most one
/// of the two collections; mutating operations are no-ops for absent rooms.
#[derive(Debug, Default)]
pub struct QueueManager {
    waiting: BTreeSet<WaitingKey>,
    waiting_index: HashMap<RoomId, WaitingKey>,
    service: BTreeSet<ServiceKey>,
    service_index: HashMap<RoomId, ServiceKey>,
}

impl QueueManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a room into the waiting set with elapsed time zero. Replaces
    /// any existing waiting entry for the room.
    pub fn enqueue_waiting(&mut self, room_id: RoomId, priority: Priority) {
        self.remove_waiting(room_id);
        let key = WaitingKey {
            priority,
            elapsed_min: 0,
            room_id,
        };
        self.waiting.insert(key);
        self.waiting_index.insert(room_id, key);
    }

    /// Remove a room from the waiting set. No-op when absent.
    pub fn remove_waiting(&mut self, room_id: RoomId) {
        if let Some(key) = self.waiting_index.remove(&room_id) {
            self.waiting.remove(&key);
        }
    }

    /// The head of the waiting order, if any.
    #[must_use]
    pub fn peek_most_eligible_waiting(&self) -> Option<QueueEntry> {
        self.waiting.first().map(|k| QueueEntry {
            room_id: k.room_id,
            priority: k.priority,
            elapsed_min: k.elapsed_min,
        })
    }

    /// Insert a room into the service set with elapsed time zero.
    pub fn enqueue_service(&mut self, room_id: RoomId, priority: Priority) {
        self.remove_service(room_id);
        let key = ServiceKey {
            priority,
            elapsed_min: 0,
            room_id,
        };
        self.service.insert(key);
        self.service_index.insert(room_id, key);
    }

    /// Remove a room from the service set. No-op when absent.
    pub fn remove_service(&mut self, room_id: RoomId) {
        if let Some(key) = self.service_index.remove(&room_id) {
            self.service.remove(&key);
        }
    }

    /// The head of the "most evictable" service order, if any.
    #[must_use]
    pub fn peek_most_evictable_service(&self) -> Option<QueueEntry> {
        self.service.first().map(|k| QueueEntry {
            room_id: k.room_id,
            priority: k.priority,
            elapsed_min: k.elapsed_min,
        })
    }

    /// Re-key the room's entry in whichever collection holds it. No-op when
    /// the room is in neither.
    pub fn update_priority(&mut self, room_id: RoomId, new_priority: Priority) {
        if let Some(old) = self.waiting_index.remove(&room_id) {
            self.waiting.remove(&old);
            let key = WaitingKey {
                priority: new_priority,
                ..old
            };
            self.waiting.insert(key);
            self.waiting_index.insert(room_id, key);
        }
        if let Some(old) = self.service_index.remove(&room_id) {
            self.service.remove(&old);
            let key = ServiceKey {
                priority: new_priority,
                ..old
            };
            self.service.insert(key);
            self.service_index.insert(room_id, key);
        }
    }

    /// Advance the elapsed-time counter of every entry in both collections
    /// by one minute and restore both total orders.
    pub fn tick_elapsed(&mut self) {
        let waiting: Vec<WaitingKey> = self.waiting.iter().copied().collect();
        self.waiting.clear();
        for mut key in waiting {
            key.elapsed_min += 1;
            self.waiting.insert(key);
            self.waiting_index.insert(key.room_id, key);
        }
        let service: Vec<ServiceKey> = self.service.iter().copied().collect();
        self.service.clear();
        for mut key in service {
            key.elapsed_min += 1;
            self.service.insert(key);
            self.service_index.insert(key.room_id, key);
        }
    }

    /// Whether the room is in the waiting set.
    #[must_use]
    pub fn in_waiting(&self, room_id: RoomId) -> bool {
        self.waiting_index.contains_key(&room_id)
    }

    /// Whether the room is in the service set.
    #[must_use]
    pub fn in_service(&self, room_id: RoomId) -> bool {
        self.service_index.contains_key(&room_id)
    }

    /// Number of waiting entries.
    #[must_use]
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Number of service entries.
    #[must_use]
    pub fn service_len(&self) -> usize {
        self.service.len()
    }

    /// Waiting entry for a room, if present.
    #[must_use]
    pub fn waiting_entry(&self, room_id: RoomId) -> Option<QueueEntry> {
        self.waiting_index.get(&room_id).map(|k| QueueEntry {
            room_id: k.room_id,
            priority: k.priority,
            elapsed_min: k.elapsed_min,
        })
    }

    /// Service entry for a room, if present.
    #[must_use]
    pub fn service_entry(&self, room_id: RoomId) -> Option<QueueEntry> {
        self.service_index.get(&room_id).map(|k| QueueEntry {
            room_id: k.room_id,
            priority: k.priority,
            elapsed_min: k.elapsed_min,
        })
    }

    /// Waiting rooms ordered by elapsed waiting time descending (room id
    /// ascending on ties). Scan order for the time-slice and
    /// priority-decrease checks.
    #[must_use]
    pub fn waiting_by_elapsed(&self) -> Vec<QueueEntry> {
        let mut entries: Vec<QueueEntry> = self
            .waiting
            .iter()
            .map(|k| QueueEntry {
                room_id: k.room_id,
                priority: k.priority,
                elapsed_min: k.elapsed_min,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.elapsed_min
                .cmp(&a.elapsed_min)
                .then(a.room_id.cmp(&b.room_id))
        });
        entries
    }

    /// Service entries in "most evictable first" order.
    #[must_use]
    pub fn service_by_evictability(&self) -> Vec<QueueEntry> {
        self.service
            .iter()
            .map(|k| QueueEntry {
                room_id: k.room_id,
                priority: k.priority,
                elapsed_min: k.elapsed_min,
            })
            .collect()
    }

    /// Waiting room ids, ascending.
    #[must_use]
    pub fn waiting_rooms(&self) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self.waiting_index.keys().copied().collect();
        rooms.sort_unstable();
        rooms
    }

    /// Service room ids, ascending.
    #[must_use]
    pub fn service_rooms(&self) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self.service_index.keys().copied().collect();
        rooms.sort_unstable();
        rooms
    }

    /// Drop every entry from both collections.
    pub fn clear(&mut self) {
        self.waiting.clear();
        self.waiting_index.clear();
        self.service.clear();
        self.service_index.clear();
    }
}
