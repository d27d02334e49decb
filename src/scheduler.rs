/// Timer queue for deferred work, fired cooperatively from `Instrument::tick`
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    id: TaskId,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.due, self.id) == (other.due, other.id)
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Ties on `due` go to whichever was scheduled first
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.id).cmp(&(other.due, other.id))
    }
}

pub struct Scheduler<T> {
    queue: BinaryHeap<Reverse<Entry<T>>>,
    cancelled: HashSet<TaskId>,
    next_id: u64,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn schedule_at(&mut self, due: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.push(Reverse(Entry { due, id, task }));
        id
    }

    /// Returns false if the task already fired or was never scheduled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let pending = self.queue.iter().any(|Reverse(e)| e.id == id);
        pending && self.cancelled.insert(id)
    }

    /// Pop the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        while let Some(Reverse(head)) = self.queue.peek() {
            if head.due > now {
                return None;
            }
            let Some(Reverse(entry)) = self.queue.pop() else {
                return None;
            };
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            return Some(entry.task);
        }
        None
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue
            .iter()
            .filter(|Reverse(e)| !self.cancelled.contains(&e.id))
            .map(|Reverse(e)| e.due)
            .min()
    }

    pub fn len(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
