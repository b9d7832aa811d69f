//! A closable work queue with a single consumer and pop-time priority.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Contents of a [`WorkQueue`], reachable through [`WorkQueue::lock`] for
/// compound operations that must be atomic with respect to the consumer.
#[derive(Debug)]
pub struct QueueState<T> {
    items: Vec<T>,
    active: Option<T>,
    closed: bool,
}

impl<T> QueueState<T> {
    /// Appends an item. Returns `false` (dropping nothing but the push) once closed.
    pub fn push(&mut self, item: T) -> bool {
        if self.closed {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    /// Removes and returns the first pending item matching `pred`.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.items.iter().position(pred)?;
        Some(self.items.remove(index))
    }

    /// The item the consumer popped and has not yet finished.
    pub fn active(&self) -> Option<&T> {
        self.active.as_ref()
    }

    pub fn clear_active(&mut self) -> Option<T> {
        self.active.take()
    }

    /// Number of pending (not yet popped) items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Mutex-guarded pending list plus a condition variable the consumer sleeps on.
///
/// The consumer pulls with [`WorkQueue::pop_best`], which ranks pending items
/// at pop time, processes the item, and then calls [`WorkQueue::finish`].
/// Closing wakes the consumer and makes every later pop return `None`;
/// whatever is still pending is abandoned.
#[derive(Debug)]
pub struct WorkQueue<T> {
    name: &'static str,
    state: Mutex<QueueState<T>>,
    ready: Condvar,
}

impl<T: Clone> WorkQueue<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(QueueState {
                items: Vec::new(),
                active: None,
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wakes the consumer.
    pub fn notify(&self) {
        self.ready.notify_one();
    }

    /// Pushes an item and wakes the consumer.
    pub fn push(&self, item: T) -> bool {
        let pushed = self.lock().push(item);
        if pushed {
            self.notify();
        }
        pushed
    }

    /// Blocks until an item is pending or the queue is closed.
    ///
    /// Returns the pending item with the lowest `score` (the earliest pushed
    /// among equal scores) and marks it active, or `None` once closed.
    pub fn pop_best(&self, mut score: impl FnMut(&T) -> f32) -> Option<T> {
        let mut state = self.lock();
        loop {
            if state.closed {
                return None;
            }
            if !state.items.is_empty() {
                let mut best = 0;
                let mut best_score = score(&state.items[0]);
                for (index, item) in state.items.iter().enumerate().skip(1) {
                    let s = score(item);
                    if s < best_score {
                        best = index;
                        best_score = s;
                    }
                }
                let item = state.items.remove(best);
                state.active = Some(item.clone());
                return Some(item);
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Clears the active item after the consumer is done with it.
    pub fn finish(&self) -> Option<T> {
        self.lock().clear_active()
    }

    /// Closes the queue and wakes the consumer.
    pub fn close(&self) {
        let abandoned = {
            let mut state = self.lock();
            state.closed = true;
            state.items.len()
        };
        if abandoned > 0 {
            tracing::debug!("{} queue closed with {} pending", self.name, abandoned);
        }
        self.ready.notify_all();
    }

    /// Number of pending items.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_pop_lowest_score() {
        let q = WorkQueue::new("test");
        for v in [5, 1, 3] {
            q.push(v);
        }
        assert_eq!(q.pop_best(|v| *v as f32), Some(1));
        assert_eq!(q.lock().active(), Some(&1));
        assert_eq!(q.finish(), Some(1));
        assert_eq!(q.pop_best(|v| *v as f32), Some(3));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_equal_scores_pop_in_push_order() {
        let q = WorkQueue::new("fifo");
        for v in [7, 2, 9] {
            q.push(v);
        }
        let order: Vec<_> = (0..3).map(|_| q.pop_best(|_| 0.0).unwrap()).collect();
        assert_eq!(order, vec![7, 2, 9]);
    }

    #[test]
    fn test_remove_where() {
        let q = WorkQueue::new("test");
        q.push(1);
        q.push(2);
        assert_eq!(q.lock().remove_where(|v| *v == 2), Some(2));
        assert_eq!(q.lock().remove_where(|v| *v == 2), None);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_closed_queue_refuses_push_and_pop() {
        let q = WorkQueue::new("test");
        q.push(1);
        q.close();
        assert!(!q.push(2));
        assert_eq!(q.pop_best(|_| 0.0), None);
        assert!(q.lock().is_closed());
    }

    #[test]
    fn test_close_wakes_blocked_consumer() {
        let q = Arc::new(WorkQueue::<u32>::new("test"));
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop_best(|_| 0.0))
        };
        thread::sleep(Duration::from_millis(20));
        q.close();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_push_wakes_blocked_consumer() {
        let q = Arc::new(WorkQueue::<u32>::new("test"));
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop_best(|_| 0.0))
        };
        q.push(42);
        assert_eq!(consumer.join().unwrap(), Some(42));
    }
}
