//! Discrete-event reconstruction of factory production queues.
//!
//! A replay records what players *asked* for, never what they got; the only
//! way to know when a unit actually left its factory is to replay the
//! queue/hold/cancel/sell/power commands through the games' production
//! rules. [`FactorySim`] does exactly that: feed it the decoded command
//! stream, then call [`FactorySim::run`] until it returns `None`, collecting
//! one [`Completion`] per built unit or structure.
//!
//! Time only moves when an event is popped; there is no per-tick loop. Ties
//! on the same tick resolve in insertion order, so a replay always
//! reconstructs the same way.

mod errors;
mod events;
mod factory;

use std::collections::HashMap;

use sage_replay::{Command, CommandBody, Log, UnitCost, UnitId};
use serde::Serialize;

use events::{EventQueue, SimEvent};
use factory::Factory;

pub use errors::SimError;

pub(crate) type Result<T> = std::result::Result<T, SimError>;

/// Game ticks, as used in replay time codes.
pub type Ticks = u32;

/// One finished construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub player_id: i32,
    /// Tick the unit left the factory.
    pub time_code: Ticks,
    pub cost: u32,
    pub unit: UnitId,
    pub unit_name: String,
}

/// The production simulator for one replay.
///
/// Commands are fed in recording order; each relevant one becomes a
/// scheduled event. Factories come into being the first time a queue
/// command names them and are captured whenever a queue command arrives
/// from a different owner.
#[derive(Debug)]
pub struct FactorySim {
    factories: HashMap<u32, Factory>,
    events: EventQueue,
    clock: Ticks,
    /// Costs and names observed on queue commands, first observation wins.
    costs: HashMap<UnitId, UnitCost>,
    names: HashMap<UnitId, String>,
}

impl FactorySim {
    /// Creates a simulator that will not schedule anything past `end_time`
    /// (the last recorded tick of the replay).
    pub fn new(end_time: Ticks) -> Self {
        Self {
            factories: HashMap::new(),
            events: EventQueue::new(end_time),
            clock: 0,
            costs: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Feeds one decoded command. Production, hold, sell and power commands
    /// become scheduled events; everything else is ignored. Hold, sell and
    /// power commands aimed at a building no queue command has named yet
    /// are dropped, since there is no production state they could affect.
    pub fn feed(&mut self, command: &Command) -> Result<()> {
        match &command.body {
            CommandBody::Queue {
                factory,
                unit,
                unit_name,
                count,
                cost,
            } => {
                let cost = cost.ok_or_else(|| SimError::MissingUnitCost {
                    unit_name: unit_name.clone(),
                    time_code: command.time_code,
                })?;
                self.insert_queue(command.time_code, *factory, *unit, unit_name, *count, cost, command.player_id);
            },
            CommandBody::Hold {
                factory,
                unit,
                cancel_all,
                ..
            } => {
                if self.factories.contains_key(factory) {
                    self.events.insert(
                        command.time_code,
                        SimEvent::Hold {
                            factory: *factory,
                            unit: *unit,
                            cancel_all: *cancel_all,
                        },
                    );
                }
            },
            CommandBody::Sell { target } => {
                if self.factories.contains_key(target) {
                    self.events.insert(command.time_code, SimEvent::Sell { target: *target });
                }
            },
            CommandBody::PowerToggle { target } => {
                if self.factories.contains_key(target) {
                    self.events
                        .insert(command.time_code, SimEvent::PowerToggle { target: *target });
                }
            },
            _ => {},
        }
        Ok(())
    }

    /// Runs until the next construction finishes, returning `None` once the
    /// event list drains. Callers loop until `None`.
    pub fn run(&mut self) -> Option<Completion> {
        while let Some((time_code, event)) = self.events.pop_front() {
            self.clock = time_code;
            match event {
                SimEvent::Queue {
                    factory,
                    unit,
                    unit_name,
                    count,
                    cost,
                } => self.process_queue(factory, unit, unit_name, count, cost),
                SimEvent::Hold {
                    factory,
                    unit,
                    cancel_all,
                } => self.process_hold(factory, unit, cancel_all),
                SimEvent::Sell { target } => self.process_sell(target),
                SimEvent::PowerToggle { target } => self.process_power_toggle(target),
                SimEvent::Complete {
                    factory,
                    unit,
                    player_id,
                } => return Some(self.process_completion(factory, unit, player_id)),
            }
        }
        None
    }

    /// The simulator's clock; the time code of the last event processed.
    pub fn clock(&self) -> Ticks {
        self.clock
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    fn insert_queue(
        &mut self,
        time_code: Ticks,
        factory_id: u32,
        unit: UnitId,
        unit_name: &str,
        count: u8,
        cost: UnitCost,
        player_id: i32,
    ) {
        let factory = self.factories.entry(factory_id).or_insert_with(|| Factory::new(factory_id));
        if factory.player_id != player_id {
            // Capture. The new owner inherits nothing: queue contents and
            // pending production events for the old owner must never fire.
            tracing::debug!(
                target: Log::Sim,
                factory = factory.id,
                old_owner = factory.player_id,
                new_owner = player_id,
                "Factory changed hands"
            );
            factory.flush();
            self.events.remove_factory_events(factory_id);
            factory.player_id = player_id;
        }

        self.events.insert(
            time_code,
            SimEvent::Queue {
                factory: factory_id,
                unit,
                unit_name: unit_name.to_string(),
                count,
                cost,
            },
        );
    }

    fn process_queue(&mut self, factory_id: u32, unit: UnitId, unit_name: String, count: u8, cost: UnitCost) {
        self.costs.entry(unit).or_insert(cost);
        self.names.entry(unit).or_insert(unit_name);

        let factory = self.factories.get_mut(&factory_id).expect("queue event for unknown factory");
        match factory.is_held(unit) {
            // Queueing a held type is how the games express un-pause; it
            // adds nothing to the queue.
            true => factory.unhold(unit),
            false => factory.enqueue(unit, count),
        }

        self.advance(factory_id);
    }

    fn process_hold(&mut self, factory_id: u32, unit: UnitId, cancel_all: bool) {
        let factory = self.factories.get_mut(&factory_id).expect("hold event for unknown factory");

        if factory.is_held(unit) {
            // Holding an already-held type is the cancel gesture.
            match cancel_all {
                true => factory.cancel_all(unit),
                false => factory.cancel_one(unit),
            }
        } else {
            // A held type that was mid-build keeps its progress.
            let mut remaining = None;
            if let Some(pending) = self.events.find_completion(factory_id) {
                if pending.unit == unit {
                    self.events.take_completion(factory_id);
                    remaining = Some(pending.time_code - self.clock);
                }
            }
            let factory = self.factories.get_mut(&factory_id).expect("hold event for unknown factory");
            factory.hold(unit, remaining);
        }

        self.advance(factory_id);
    }

    fn process_sell(&mut self, target: u32) {
        tracing::debug!(target: Log::Sim, factory = target, "Factory sold");
        self.events.remove_factory_events(target);
    }

    fn process_power_toggle(&mut self, target: u32) {
        let factory = self.factories.get_mut(&target).expect("power event for unknown factory");
        factory.powered_down = !factory.powered_down;

        match factory.powered_down {
            // In-flight work is lost outright; unlike a hold, nothing is
            // banked. See the design notes before leaning on this.
            true => {
                self.events.take_completion(target);
            },
            false => self.advance(target),
        }
    }

    fn process_completion(&mut self, factory_id: u32, unit: UnitId, player_id: i32) -> Completion {
        assert!(
            self.events.find_completion(factory_id).is_none(),
            "factory {factory_id:#010X} had more than one outstanding completion"
        );

        let factory = self
            .factories
            .get_mut(&factory_id)
            .expect("completion event for unknown factory");
        factory.complete_one(unit);
        let more_queued = factory.queue_len() > 0;

        let cost = self.costs.get(&unit).expect("completed unit had no recorded cost").amount();
        let unit_name = self.names.get(&unit).expect("completed unit had no recorded name").clone();

        if more_queued {
            self.advance(factory_id);
        }

        Completion {
            player_id,
            time_code: self.clock,
            cost,
            unit,
            unit_name,
        }
    }

    /// Starts the next buildable queue entry, if the factory is idle.
    ///
    /// The factory builds one thing at a time: if a different type is
    /// already in flight, its remaining ticks are banked under that type
    /// before the new one starts. Build time comes from banked progress,
    /// an observed build time, or the cost-derived estimate, in that order.
    fn advance(&mut self, factory_id: u32) {
        let Some(next) = self
            .factories
            .get(&factory_id)
            .expect("advance on unknown factory")
            .first_unheld()
        else {
            return;
        };

        if let Some(pending) = self.events.find_completion(factory_id) {
            if pending.unit == next {
                return;
            }
            self.events.take_completion(factory_id);
            let remaining = pending.time_code - self.clock;
            self.factories
                .get_mut(&factory_id)
                .expect("advance on unknown factory")
                .suspend(pending.unit, remaining);
        }

        let factory = self.factories.get_mut(&factory_id).expect("advance on unknown factory");
        let build_ticks = match factory.take_banked(next) {
            Some(remaining) => remaining,
            None => match self.costs.get(&next) {
                Some(cost) => cost.build_ticks(),
                None => {
                    tracing::trace!(target: Log::Sim, unit = next, "No cost on record, cannot schedule a build");
                    return;
                },
            },
        };

        let player_id = factory.player_id;
        self.events.insert(
            self.clock + build_ticks,
            SimEvent::Complete {
                factory: factory_id,
                unit: next,
                player_id,
            },
        );
    }
}
