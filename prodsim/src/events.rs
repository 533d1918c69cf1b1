//! The simulator's event list.
//!
//! Events are ordered by time code with a monotonic sequence number as the
//! tie-break, so everything scheduled for the same tick fires in insertion
//! order. Nothing lands past the declared end of the replay.

use std::collections::BTreeMap;

use sage_replay::{Log, UnitCost, UnitId};

use crate::Ticks;

#[derive(Debug)]
pub(crate) enum SimEvent {
    Queue {
        factory: u32,
        unit: UnitId,
        unit_name: String,
        count: u8,
        cost: UnitCost,
    },
    Hold {
        factory: u32,
        unit: UnitId,
        cancel_all: bool,
    },
    Sell {
        target: u32,
    },
    PowerToggle {
        target: u32,
    },
    Complete {
        factory: u32,
        unit: UnitId,
        player_id: i32,
    },
}

impl SimEvent {
    /// The factory a sweep of pending events should catch this one under.
    ///
    /// Sell and power toggles target a building id but are deliberately
    /// unscoped: selling or capturing a factory cancels its production
    /// events, not commands the player already issued against the building
    /// itself.
    fn factory_scope(&self) -> Option<u32> {
        match self {
            Self::Queue { factory, .. } | Self::Hold { factory, .. } | Self::Complete { factory, .. } => {
                Some(*factory)
            },
            Self::Sell { .. } | Self::PowerToggle { .. } => None,
        }
    }
}

/// An outstanding construction, as seen in the event list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingCompletion {
    pub time_code: Ticks,
    pub unit: UnitId,
}

#[derive(Debug)]
pub(crate) struct EventQueue {
    events: BTreeMap<(Ticks, u64), SimEvent>,
    seq: u64,
    end_time: Ticks,
}

impl EventQueue {
    pub fn new(end_time: Ticks) -> Self {
        Self {
            events: BTreeMap::new(),
            seq: 0,
            end_time,
        }
    }

    /// Schedules an event. Anything computed to land past the end of the
    /// replay is dropped; the recording simply ends before it could happen.
    pub fn insert(&mut self, time_code: Ticks, event: SimEvent) {
        if time_code > self.end_time {
            tracing::trace!(target: Log::Sim, time_code, ?event, "Dropping event scheduled past end of replay");
            return;
        }

        self.events.insert((time_code, self.seq), event);
        self.seq += 1;
    }

    pub fn pop_front(&mut self) -> Option<(Ticks, SimEvent)> {
        let ((time_code, _), event) = self.events.pop_first()?;
        Some((time_code, event))
    }

    /// Removes every production-scoped event for `factory`.
    pub fn remove_factory_events(&mut self, factory: u32) {
        self.events.retain(|_, event| event.factory_scope() != Some(factory));
    }

    /// The outstanding completion for `factory`, if any. More than one is a
    /// scheduling bug and aborts.
    pub fn find_completion(&self, factory: u32) -> Option<PendingCompletion> {
        self.completion_entry(factory).map(|(_, pending)| pending)
    }

    /// Removes and returns the outstanding completion for `factory`.
    pub fn take_completion(&mut self, factory: u32) -> Option<PendingCompletion> {
        let (key, pending) = self.completion_entry(factory)?;
        self.events.remove(&key);
        Some(pending)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    fn completion_entry(&self, factory: u32) -> Option<((Ticks, u64), PendingCompletion)> {
        let mut found = None;
        for (&key, event) in &self.events {
            if let SimEvent::Complete { factory: scope, unit, .. } = event {
                if *scope == factory {
                    assert!(
                        found.is_none(),
                        "factory {factory:#010X} has more than one outstanding completion"
                    );
                    found = Some((
                        key,
                        PendingCompletion {
                            time_code: key.0,
                            unit: *unit,
                        },
                    ));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(factory: u32, unit: UnitId) -> SimEvent {
        SimEvent::Complete {
            factory,
            unit,
            player_id: 0,
        }
    }

    #[test]
    fn test_pop_orders_by_time_then_insertion() {
        let mut queue = EventQueue::new(1000);
        queue.insert(10, SimEvent::Sell { target: 1 });
        queue.insert(5, SimEvent::Sell { target: 2 });
        queue.insert(10, SimEvent::Sell { target: 3 });

        let order: Vec<(Ticks, u32)> = std::iter::from_fn(|| queue.pop_front())
            .map(|(time, event)| match event {
                SimEvent::Sell { target } => (time, target),
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(order, vec![(5, 2), (10, 1), (10, 3)]);
    }

    #[test]
    fn test_events_past_end_time_are_dropped() {
        let mut queue = EventQueue::new(100);
        queue.insert(101, SimEvent::Sell { target: 1 });
        assert_eq!(queue.len(), 0);

        queue.insert(100, SimEvent::Sell { target: 1 });
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_factory_sweep_spares_unscoped_events() {
        let mut queue = EventQueue::new(1000);
        queue.insert(
            0,
            SimEvent::Queue {
                factory: 1,
                unit: 0xA,
                unit_name: "A".into(),
                count: 1,
                cost: UnitCost::Flat(100),
            },
        );
        queue.insert(
            1,
            SimEvent::Hold {
                factory: 1,
                unit: 0xA,
                cancel_all: false,
            },
        );
        queue.insert(2, complete(1, 0xA));
        queue.insert(3, SimEvent::Sell { target: 1 });
        queue.insert(4, SimEvent::PowerToggle { target: 1 });
        queue.insert(5, complete(2, 0xB));

        queue.remove_factory_events(1);

        let times: Vec<Ticks> = std::iter::from_fn(|| queue.pop_front()).map(|(time, _)| time).collect();
        assert_eq!(times, vec![3, 4, 5]);
    }

    #[test]
    fn test_take_completion_is_per_factory() {
        let mut queue = EventQueue::new(1000);
        queue.insert(51, complete(1, 0xA));
        queue.insert(62, complete(2, 0xB));

        assert_eq!(
            queue.find_completion(1),
            Some(PendingCompletion {
                time_code: 51,
                unit: 0xA
            })
        );

        let taken = queue.take_completion(1).unwrap();
        assert_eq!(taken.time_code, 51);
        assert_eq!(queue.find_completion(1), None);
        assert!(queue.find_completion(2).is_some());
    }

    #[test]
    #[should_panic(expected = "more than one outstanding completion")]
    fn test_duplicate_completion_aborts() {
        let mut queue = EventQueue::new(1000);
        queue.insert(51, complete(1, 0xA));
        queue.insert(62, complete(1, 0xB));
        let _ = queue.find_completion(1);
    }
}
