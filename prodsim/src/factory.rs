//! Per-factory production queue state.

use std::collections::HashMap;

use sage_replay::UnitId;

use crate::Ticks;

/// Where one queued unit type stands within its factory.
///
/// "In progress" is not a state here on purpose: an outstanding completion
/// event in the simulator's event list is the single source of truth for
/// what a factory is currently building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum BuildState {
    /// Waiting its turn, no progress banked.
    #[default]
    Pending,

    /// Paused by the player. Carries the remaining build ticks when the
    /// hold interrupted an in-flight build; `None` when the type never
    /// started.
    Held { remaining: Option<Ticks> },

    /// Not held, but interrupted earlier; resumes with this much left.
    Suspended { remaining: Ticks },
}

/// One production building's queue. Created the first time a queue command
/// names its id and never destroyed; an emptied factory just goes inert.
#[derive(Debug)]
pub(crate) struct Factory {
    pub id: u32,
    pub player_id: i32,
    pub powered_down: bool,
    /// Queued unit types in order, one entry per unit.
    order: Vec<UnitId>,
    states: HashMap<UnitId, BuildState>,
}

impl Factory {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            player_id: 0,
            powered_down: false,
            order: Vec::new(),
            states: HashMap::new(),
        }
    }

    /// Appends `count` entries of `unit`. Re-queueing a type that is already
    /// tracked keeps its banked progress.
    pub fn enqueue(&mut self, unit: UnitId, count: u8) {
        for _ in 0..count {
            self.order.push(unit);
        }
        self.states.entry(unit).or_default();
    }

    pub fn is_held(&self, unit: UnitId) -> bool {
        matches!(self.states.get(&unit), Some(BuildState::Held { .. }))
    }

    /// The first queue entry whose type is not held; what the factory would
    /// work on next.
    pub fn first_unheld(&self) -> Option<UnitId> {
        self.order.iter().copied().find(|unit| !self.is_held(*unit))
    }

    /// Marks `unit` held. `remaining` carries interrupted progress when the
    /// hold caught the unit mid-build; otherwise any previously banked
    /// progress is kept.
    pub fn hold(&mut self, unit: UnitId, remaining: Option<Ticks>) {
        let banked = match self.states.get(&unit) {
            Some(BuildState::Suspended { remaining }) => Some(*remaining),
            _ => None,
        };
        self.states.insert(
            unit,
            BuildState::Held {
                remaining: remaining.or(banked),
            },
        );
    }

    /// Releases a held type, back to suspended if it had progress banked.
    pub fn unhold(&mut self, unit: UnitId) {
        if let Some(BuildState::Held { remaining }) = self.states.get(&unit) {
            let next = match remaining {
                Some(remaining) => BuildState::Suspended { remaining: *remaining },
                None => BuildState::Pending,
            };
            self.states.insert(unit, next);
        }
    }

    /// Banks interrupted progress for a type that is not held.
    pub fn suspend(&mut self, unit: UnitId, remaining: Ticks) {
        self.states.insert(unit, BuildState::Suspended { remaining });
    }

    /// Consumes banked progress for `unit`, if any, returning the ticks
    /// still needed.
    pub fn take_banked(&mut self, unit: UnitId) -> Option<Ticks> {
        match self.states.get(&unit) {
            Some(BuildState::Suspended { remaining }) => {
                let remaining = *remaining;
                self.states.insert(unit, BuildState::Pending);
                Some(remaining)
            },
            _ => None,
        }
    }

    /// Removes the most recently queued entry of `unit`.
    pub fn cancel_one(&mut self, unit: UnitId) {
        if let Some(index) = self.order.iter().rposition(|queued| *queued == unit) {
            self.order.remove(index);
        }
        self.purge_if_absent(unit);
    }

    /// Removes every queued entry of `unit`.
    pub fn cancel_all(&mut self, unit: UnitId) {
        self.order.retain(|queued| *queued != unit);
        self.purge_if_absent(unit);
    }

    /// Removes the oldest queued entry of `unit`; the one that just
    /// finished building.
    pub fn complete_one(&mut self, unit: UnitId) {
        let index = self
            .order
            .iter()
            .position(|queued| *queued == unit)
            .expect("completed a unit that was not queued");
        self.order.remove(index);
        self.purge_if_absent(unit);
    }

    pub fn queue_len(&self) -> usize {
        self.order.len()
    }

    /// Full reset on capture. The new owner inherits nothing, the power
    /// state included.
    pub fn flush(&mut self) {
        self.order.clear();
        self.states.clear();
        self.powered_down = false;
    }

    // Types with no queue entry left must not keep hold/progress
    // bookkeeping around.
    fn purge_if_absent(&mut self, unit: UnitId) {
        if !self.order.contains(&unit) {
            self.states.remove(&unit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: UnitId = 0xA;
    const B: UnitId = 0xB;

    #[test]
    fn test_first_unheld_skips_held_types() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 2);
        factory.enqueue(B, 1);

        assert_eq!(factory.first_unheld(), Some(A));
        factory.hold(A, None);
        assert_eq!(factory.first_unheld(), Some(B));
        factory.hold(B, None);
        assert_eq!(factory.first_unheld(), None);
    }

    #[test]
    fn test_hold_and_unhold_carry_banked_progress() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 1);

        factory.hold(A, Some(21));
        assert!(factory.is_held(A));

        factory.unhold(A);
        assert!(!factory.is_held(A));
        assert_eq!(factory.take_banked(A), Some(21));
        assert_eq!(factory.take_banked(A), None);
    }

    #[test]
    fn test_reholding_suspended_progress_keeps_it() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 1);

        factory.suspend(A, 30);
        factory.hold(A, None);
        factory.unhold(A);
        assert_eq!(factory.take_banked(A), Some(30));
    }

    #[test]
    fn test_enqueue_does_not_reset_progress() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 1);
        factory.suspend(A, 12);
        factory.enqueue(A, 1);
        assert_eq!(factory.take_banked(A), Some(12));
    }

    #[test]
    fn test_cancel_one_removes_the_newest_entry() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 1);
        factory.enqueue(B, 1);
        factory.enqueue(A, 1);

        factory.cancel_one(A);
        assert_eq!(factory.queue_len(), 2);
        assert_eq!(factory.first_unheld(), Some(A));

        factory.cancel_one(A);
        // No entries left, so the bookkeeping for A is purged with them.
        assert!(!factory.is_held(A));
        assert_eq!(factory.take_banked(A), None);
        assert_eq!(factory.first_unheld(), Some(B));
    }

    #[test]
    fn test_cancel_all_purges_bookkeeping() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 3);
        factory.enqueue(B, 1);
        factory.hold(A, Some(40));

        factory.cancel_all(A);
        assert_eq!(factory.queue_len(), 1);
        assert!(!factory.is_held(A));
    }

    #[test]
    fn test_complete_one_removes_the_oldest_entry() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 2);
        factory.complete_one(A);
        assert_eq!(factory.queue_len(), 1);
        factory.complete_one(A);
        assert_eq!(factory.queue_len(), 0);
    }

    #[test]
    fn test_flush_resets_everything_including_power() {
        let mut factory = Factory::new(1);
        factory.enqueue(A, 2);
        factory.hold(A, Some(10));
        factory.powered_down = true;

        factory.flush();
        assert_eq!(factory.queue_len(), 0);
        assert!(!factory.powered_down);
        assert!(!factory.is_held(A));
    }
}
