//! The watchpoint pool.
//!
//! Every slot sits on exactly one of two singly-linked lists threaded
//! through `next` indices: the free list, or the active list. Allocation
//! moves the free head to the front of the active list; release unlinks a
//! slot from anywhere in the active list and pushes it onto the free list.

use crate::error::{WatchpointError, WatchpointResult};
use sdb_eval::{evaluate_with, Machine};
use sdb_lexer::Lexer;
use sdb_types::{Limits, Word};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// A monitored expression and the values last observed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchpoint {
    /// Stable slot index in the pool.
    pub id: usize,
    /// Expression text, re-evaluated on every poll.
    pub expression: String,
    pub last_value: Word,
    pub current_value: Word,
    /// Whether the most recent poll saw a different value.
    pub changed: bool,
}

impl Watchpoint {
    fn empty(id: usize) -> Self {
        Self {
            id,
            expression: String::new(),
            last_value: 0,
            current_value: 0,
            changed: false,
        }
    }
}

impl fmt::Display for Watchpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{:<12}\t{:<12}\t{:<12}\t{}",
            self.id,
            self.expression,
            self.last_value,
            self.current_value,
            if self.changed { "True" } else { "False" }
        )
    }
}

#[derive(Debug, Clone)]
struct Slot {
    wp: Watchpoint,
    next: Option<usize>,
}

/// Fixed-capacity watchpoint storage with free-list allocation.
///
/// The pool is owned by one control thread. Sharing it between threads
/// needs a lock around every `&mut self` method, since list surgery spans
/// several field updates.
#[derive(Debug, Clone)]
pub struct WatchpointPool {
    slots: Vec<Slot>,
    free: Option<usize>,
    active: Option<usize>,
    limits: Limits,
}

impl WatchpointPool {
    /// A pool with `limits.watchpoints` slots, all free.
    pub fn new(limits: Limits) -> Self {
        let n = limits.watchpoints;
        let slots = (0..n)
            .map(|i| Slot {
                wp: Watchpoint::empty(i),
                next: (i + 1 < n).then_some(i + 1),
            })
            .collect();
        Self {
            slots,
            free: (n > 0).then_some(0),
            active: None,
            limits,
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    // ══════════════════════════════════════════════════════════════════════
    // List primitives
    // ══════════════════════════════════════════════════════════════════════

    fn walk(&self, head: Option<usize>) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(head, move |&i| self.slots[i].next)
    }

    /// Slot ids on the free list, in list order.
    pub fn free_ids(&self) -> Vec<usize> {
        self.walk(self.free).collect()
    }

    /// Slot ids on the active list, most recently allocated first.
    pub fn active_ids(&self) -> Vec<usize> {
        self.walk(self.active).collect()
    }

    pub fn free_len(&self) -> usize {
        self.walk(self.free).count()
    }

    pub fn active_len(&self) -> usize {
        self.walk(self.active).count()
    }

    /// Returns `true` if `id` is on the active list.
    pub fn is_active(&self, id: usize) -> bool {
        self.walk(self.active).any(|i| i == id)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Allocation
    // ══════════════════════════════════════════════════════════════════════

    /// Take a slot off the free list and put it at the front of the active list.
    pub fn allocate(&mut self) -> WatchpointResult<usize> {
        let id = self.free.ok_or(WatchpointError::PoolExhausted {
            capacity: self.capacity(),
        })?;
        self.free = self.slots[id].next;

        let slot = &mut self.slots[id];
        slot.wp = Watchpoint::empty(id);
        slot.next = self.active;
        self.active = Some(id);

        debug!(id, "watchpoint allocated");
        Ok(id)
    }

    /// Unlink an active slot and return it to the free list.
    ///
    /// The remaining active slots keep their relative order.
    pub fn release(&mut self, id: usize) -> WatchpointResult<()> {
        let mut prev: Option<usize> = None;
        let mut cursor = self.active;
        while let Some(i) = cursor {
            if i == id {
                break;
            }
            prev = Some(i);
            cursor = self.slots[i].next;
        }
        if cursor.is_none() {
            return Err(WatchpointError::NotFound(id));
        }

        let next = self.slots[id].next;
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.active = next,
        }
        self.slots[id].next = self.free;
        self.free = Some(id);

        debug!(id, "watchpoint released");
        Ok(())
    }

    /// Fill an allocated slot. Both values start at `initial`, `changed` at false.
    pub fn set(&mut self, id: usize, expression: &str, initial: Word) -> WatchpointResult<()> {
        if !self.is_active(id) {
            return Err(WatchpointError::NotFound(id));
        }
        self.check_expression_len(expression)?;

        let wp = &mut self.slots[id].wp;
        wp.expression = expression.to_string();
        wp.last_value = initial;
        wp.current_value = initial;
        wp.changed = false;
        Ok(())
    }

    /// Evaluate `expression` once, then allocate and set a watchpoint for it.
    ///
    /// An expression that does not evaluate never takes a slot.
    pub fn watch<M: Machine + ?Sized>(&mut self, expression: &str, machine: &M) -> WatchpointResult<usize> {
        self.check_expression_len(expression)?;
        let initial = evaluate_with(&self.lexer(), expression, machine)?;
        let id = self.allocate()?;
        self.set(id, expression, initial)?;
        Ok(id)
    }

    fn check_expression_len(&self, expression: &str) -> WatchpointResult<()> {
        if expression.len() > self.limits.max_expr_len {
            return Err(WatchpointError::ExpressionTooLong {
                len: expression.len(),
                limit: self.limits.max_expr_len,
            });
        }
        Ok(())
    }

    fn lexer(&self) -> Lexer<'static> {
        Lexer::new(self.limits)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Polling
    // ══════════════════════════════════════════════════════════════════════

    /// Re-evaluate every active watchpoint, in active-list order.
    ///
    /// Either every slot is refreshed or none is: all expressions are
    /// evaluated before any slot is written, and the first failure is
    /// returned with the pool untouched. On success returns the ids whose
    /// value changed.
    pub fn poll_all<M: Machine + ?Sized>(&mut self, machine: &M) -> WatchpointResult<Vec<usize>> {
        let lexer = self.lexer();
        let fresh = self
            .walk(self.active)
            .map(|id| {
                let wp = &self.slots[id].wp;
                evaluate_with(&lexer, &wp.expression, machine)
                    .map(|value| (id, value))
                    .map_err(|source| WatchpointError::Eval {
                        id,
                        expression: wp.expression.clone(),
                        source,
                    })
            })
            .collect::<WatchpointResult<Vec<_>>>()?;

        let mut changed = Vec::new();
        for (id, value) in fresh {
            let wp = &mut self.slots[id].wp;
            wp.changed = value != wp.last_value;
            wp.last_value = value;
            wp.current_value = value;
            trace!(id, value, changed = wp.changed, "watchpoint polled");
            if wp.changed {
                changed.push(id);
            }
        }
        Ok(changed)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Inspection
    // ══════════════════════════════════════════════════════════════════════

    /// The active watchpoint with this id.
    pub fn get(&self, id: usize) -> Option<&Watchpoint> {
        self.is_active(id).then(|| &self.slots[id].wp)
    }

    /// Active watchpoints in active-list order, borrowed.
    pub fn iter_active(&self) -> impl Iterator<Item = &Watchpoint> + '_ {
        self.walk(self.active).map(|i| &self.slots[i].wp)
    }

    /// Snapshots of the active watchpoints, for display.
    pub fn list_active(&self) -> Vec<Watchpoint> {
        self.iter_active().cloned().collect()
    }
}

impl Default for WatchpointPool {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> WatchpointPool {
        WatchpointPool::new(Limits {
            watchpoints: n,
            ..Limits::default()
        })
    }

    #[test]
    fn test_new_pool_is_all_free() {
        let p = pool(4);
        assert_eq!(p.free_ids(), vec![0, 1, 2, 3]);
        assert!(p.active_ids().is_empty());
    }

    #[test]
    fn test_allocate_prepends_to_active() {
        let mut p = pool(4);
        assert_eq!(p.allocate(), Ok(0));
        assert_eq!(p.allocate(), Ok(1));
        assert_eq!(p.active_ids(), vec![1, 0]);
        assert_eq!(p.free_ids(), vec![2, 3]);
    }

    #[test]
    fn test_release_head_middle_and_tail() {
        let mut p = pool(4);
        for _ in 0..4 {
            p.allocate().unwrap();
        }
        assert_eq!(p.active_ids(), vec![3, 2, 1, 0]);

        p.release(3).unwrap();
        assert_eq!(p.active_ids(), vec![2, 1, 0]);
        p.release(1).unwrap();
        assert_eq!(p.active_ids(), vec![2, 0]);
        p.release(0).unwrap();
        assert_eq!(p.active_ids(), vec![2]);
        assert_eq!(p.free_ids(), vec![0, 1, 3]);
    }

    #[test]
    fn test_release_last_active_empties_list() {
        let mut p = pool(2);
        let id = p.allocate().unwrap();
        p.release(id).unwrap();
        assert!(p.active_ids().is_empty());
        assert_eq!(p.free_len(), 2);
    }

    #[test]
    fn test_zero_capacity_pool() {
        let mut p = pool(0);
        assert_eq!(p.allocate(), Err(WatchpointError::PoolExhausted { capacity: 0 }));
    }

    #[test]
    fn test_watchpoint_json() {
        let wp = Watchpoint {
            id: 3,
            expression: "$a0".into(),
            last_value: 1,
            current_value: 2,
            changed: true,
        };
        let json = serde_json::to_string(&wp).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"expression":"$a0","last_value":1,"current_value":2,"changed":true}"#
        );
    }

    #[test]
    fn test_display_row() {
        let mut wp = Watchpoint::empty(0);
        wp.expression = "1+1".into();
        wp.current_value = 2;
        assert_eq!(
            wp.to_string(),
            "0\t1+1         \t0           \t2           \tFalse"
        );
    }
}
