//! Priority task queue for asynchronous zone side effects.
//!
//! A single worker drains the queue; the highest-priority task runs first and
//! equal priorities preserve insertion order, so tasks for one zone execute
//! in enqueue order. A failed task is re-inserted ahead of later work with
//! its retry count bumped, up to a bounded number of attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;
use zonewatch_core::Coordinates;

/// Total attempts per task before it is dropped and the failure logged.
pub const MAX_TASK_ATTEMPTS: u32 = 3;

/// Work item payloads, tagged by task type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskPayload {
    ZoneUpdate {
        zone_id: String,
    },
    GeofenceCheck {
        tourist_id: String,
        location: Coordinates,
        zone_ids: Vec<String>,
    },
    RiskCalculation {
        zone_id: String,
    },
    AnalyticsUpdate {
        zone_id: String,
        metrics: HashMap<String, f64>,
    },
}

impl TaskPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            TaskPayload::ZoneUpdate { .. } => "zone_update",
            TaskPayload::GeofenceCheck { .. } => "geofence_check",
            TaskPayload::RiskCalculation { .. } => "risk_calculation",
            TaskPayload::AnalyticsUpdate { .. } => "analytics_update",
        }
    }

    /// Geofence evaluation outranks bookkeeping; analytics run last.
    pub fn default_priority(&self) -> u8 {
        match self {
            TaskPayload::GeofenceCheck { .. } => 3,
            TaskPayload::ZoneUpdate { .. } | TaskPayload::RiskCalculation { .. } => 2,
            TaskPayload::AnalyticsUpdate { .. } => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub payload: TaskPayload,
    pub priority: u8,
    pub enqueued_at: DateTime<Utc>,
    pub retries: u32,
    /// Insertion sequence, preserved across retries so a retried task stays
    /// ahead of work enqueued after it.
    pub(crate) seq: u64,
}

struct QueuedTask(Task);

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority && self.0.seq == other.0.seq
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // Max-heap: higher priority wins, then lower sequence (older first).
        self.0
            .priority
            .cmp(&other.0.priority)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

pub struct TaskQueue {
    heap: Mutex<BinaryHeap<QueuedTask>>,
    seq: AtomicU64,
    notify: Notify,
    dropped: AtomicU64,
    max_attempts: u32,
}

impl TaskQueue {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            seq: AtomicU64::new(0),
            notify: Notify::new(),
            dropped: AtomicU64::new(0),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Enqueue a task at its payload's default priority. Returns the task id.
    pub fn enqueue(&self, payload: TaskPayload) -> String {
        let priority = payload.default_priority();
        self.enqueue_with_priority(payload, priority)
    }

    pub fn enqueue_with_priority(&self, payload: TaskPayload, priority: u8) -> String {
        let task = Task {
            id: uuid::Uuid::new_v4().to_string(),
            payload,
            priority,
            enqueued_at: Utc::now(),
            retries: 0,
            seq: self.seq.fetch_add(1, Ordering::SeqCst),
        };
        let id = task.id.clone();

        if let Ok(mut heap) = self.heap.lock() {
            heap.push(QueuedTask(task));
        }
        self.notify.notify_one();
        id
    }

    /// Pop the highest-priority task, oldest first within a priority.
    pub fn pop(&self) -> Option<Task> {
        self.heap.lock().ok()?.pop().map(|queued| queued.0)
    }

    /// Re-insert a failed task with its retry count bumped. Returns false
    /// when the attempt budget is exhausted and the task has been dropped.
    pub fn requeue_failed(&self, mut task: Task) -> bool {
        task.retries += 1;
        if task.retries >= self.max_attempts {
            self.dropped.fetch_add(1, Ordering::SeqCst);
            tracing::warn!(
                task_id = %task.id,
                kind = task.payload.kind(),
                attempts = task.retries,
                "dropping task after exhausting retries"
            );
            return false;
        }

        if let Ok(mut heap) = self.heap.lock() {
            heap.push(QueuedTask(task));
        }
        self.notify.notify_one();
        true
    }

    /// Wait until new work may be available.
    pub async fn wait_for_work(&self) {
        self.notify.notified().await;
    }

    pub fn len(&self) -> usize {
        self.heap.lock().map(|heap| heap.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total tasks dropped after exhausting their attempts.
    pub fn dropped_total(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk_task(zone_id: &str) -> TaskPayload {
        TaskPayload::RiskCalculation {
            zone_id: zone_id.to_string(),
        }
    }

    #[test]
    fn equal_priority_preserves_insertion_order() {
        let queue = TaskQueue::new(MAX_TASK_ATTEMPTS);
        queue.enqueue(risk_task("a"));
        queue.enqueue(risk_task("b"));
        queue.enqueue(risk_task("c"));

        let order: Vec<String> = std::iter::from_fn(|| queue.pop())
            .map(|task| match task.payload {
                TaskPayload::RiskCalculation { zone_id } => zone_id,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn higher_priority_jumps_the_line() {
        let queue = TaskQueue::new(MAX_TASK_ATTEMPTS);
        queue.enqueue(TaskPayload::AnalyticsUpdate {
            zone_id: "a".to_string(),
            metrics: HashMap::new(),
        });
        queue.enqueue(TaskPayload::GeofenceCheck {
            tourist_id: "t1".to_string(),
            location: Coordinates::new(0.0, 0.0),
            zone_ids: vec![],
        });

        let first = queue.pop().unwrap();
        assert_eq!(first.payload.kind(), "geofence_check");
        let second = queue.pop().unwrap();
        assert_eq!(second.payload.kind(), "analytics_update");
    }

    #[test]
    fn always_failing_task_attempted_exactly_three_times() {
        let queue = TaskQueue::new(MAX_TASK_ATTEMPTS);
        queue.enqueue(risk_task("doomed"));

        let mut attempts = 0;
        while let Some(task) = queue.pop() {
            attempts += 1;
            queue.requeue_failed(task);
        }

        assert_eq!(attempts, 3);
        assert_eq!(queue.dropped_total(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn success_on_second_attempt_stops_retrying() {
        let queue = TaskQueue::new(MAX_TASK_ATTEMPTS);
        queue.enqueue(risk_task("flaky"));

        let first = queue.pop().unwrap();
        assert!(queue.requeue_failed(first));

        let second = queue.pop().unwrap();
        assert_eq!(second.retries, 1);
        // Handler succeeds here; nothing is requeued.
        assert!(queue.pop().is_none());
        assert_eq!(queue.dropped_total(), 0);
    }

    #[test]
    fn retried_task_stays_ahead_of_later_work() {
        let queue = TaskQueue::new(MAX_TASK_ATTEMPTS);
        queue.enqueue(risk_task("first"));
        let popped = queue.pop().unwrap();
        queue.enqueue(risk_task("second"));
        assert!(queue.requeue_failed(popped));

        let next = queue.pop().unwrap();
        match next.payload {
            TaskPayload::RiskCalculation { zone_id } => assert_eq!(zone_id, "first"),
            _ => unreachable!(),
        }
    }
}
