//! Resource-spend reconstruction.
//!
//! Structures, support powers and upgrades are charged the second their
//! command was issued. Production is charged when the simulated factory
//! delivers the unit, so a long queue shows up as a ramp rather than a
//! single spike.

use std::collections::HashMap;

use sage_prodsim::{Completion, FactorySim};
use sage_replay::{CommandBody, GameTables, GameVariant, Log, ReplayBody, TICKS_PER_SECOND};
use serde::Serialize;

use crate::Result;

/// Per-player aggregates over one replay body.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceReport {
    /// `spend[player]` is a `(second, cumulative credits)` series with
    /// strictly increasing seconds. Empty when the player never spent.
    pub spend: Vec<Vec<(u32, u32)>>,

    /// `unit_counts[player]` maps display names to how many were produced.
    pub unit_counts: Vec<HashMap<String, u32>>,

    /// Every simulated production completion, in delivery order.
    pub completions: Vec<Completion>,
}

pub struct ResourceAnalyzer<'a> {
    body: &'a ReplayBody,
    tables: &'a GameTables,
    player_count: usize,
}

impl<'a> ResourceAnalyzer<'a> {
    pub fn new(body: &'a ReplayBody, tables: &'a GameTables, player_count: usize) -> Self {
        Self {
            body,
            tables,
            player_count,
        }
    }

    /// Walks the command stream once, splitting it between direct spends and
    /// the production simulator, then folds the simulator's completions back
    /// into the same per-player timelines. Commands with out-of-range player
    /// ids are skipped rather than credited to a phantom player.
    pub fn calc(&self) -> Result<ResourceReport> {
        let mut sim = FactorySim::new(self.body.end_time());
        let mut raw_spend: Vec<Vec<(u32, u32)>> = vec![Vec::new(); self.player_count];
        let mut unit_counts: Vec<HashMap<String, u32>> = vec![HashMap::new(); self.player_count];
        let mut completions: Vec<Completion> = Vec::new();

        for command in self.body.commands() {
            let Some(player) = self.player_index(command.player_id) else {
                continue;
            };
            let second = command.time_code / TICKS_PER_SECOND;

            match &command.body {
                CommandBody::PlaceStructure { cost, free_unit, .. } => {
                    if let Some(cost) = cost {
                        raw_spend[player].push((second, cost.amount()));
                    }
                    if let Some((_, free_name)) = free_unit {
                        count_unit(&mut unit_counts[player], free_name);
                    }
                },
                // Zero-cost skills still mark a timeline point; using a free
                // power is activity worth seeing on the graph.
                CommandBody::Upgrade { cost, .. }
                | CommandBody::SkillXY { cost, .. }
                | CommandBody::Skill2XY { cost, .. }
                | CommandBody::SkillTargetless { cost, .. }
                | CommandBody::SkillTarget { cost, .. } => {
                    raw_spend[player].push((second, *cost));
                },
                CommandBody::Queue { .. }
                | CommandBody::Hold { .. }
                | CommandBody::Sell { .. }
                | CommandBody::PowerToggle { .. } => sim.feed(command)?,
                _ => {},
            }
        }

        while let Some(done) = sim.run() {
            let Some(player) = self.player_index(done.player_id) else {
                continue;
            };
            raw_spend[player].push((done.time_code / TICKS_PER_SECOND, done.cost));
            count_unit(&mut unit_counts[player], &done.unit_name);

            // A queued RA3 refinery core unpacks into the structure plus a
            // collector; the collector never gets a command of its own.
            if self.tables.variant == GameVariant::RedAlert3 {
                if let Some(free) = self.tables.free_units.get(&done.unit) {
                    let free_name = self
                        .tables
                        .units
                        .get(free)
                        .cloned()
                        .unwrap_or_else(|| format!("Unit 0x{free:08X}"));
                    count_unit(&mut unit_counts[player], &free_name);
                }
            }

            completions.push(done);
        }

        tracing::debug!(
            target: Log::Analysis,
            completions = completions.len(),
            "Production reconstruction finished"
        );

        let spend = raw_spend.into_iter().map(cumulative_timeline).collect();

        Ok(ResourceReport {
            spend,
            unit_counts,
            completions,
        })
    }

    fn player_index(&self, player_id: i32) -> Option<usize> {
        usize::try_from(player_id).ok().filter(|id| *id < self.player_count)
    }
}

/// Bumps the histogram entry for `name`. Naval-yard builds are the same unit
/// under a second asset id, so the suffix is folded away first.
fn count_unit(histogram: &mut HashMap<String, u32>, name: &str) {
    let name = name.replace(" (NavYd)", "");
    *histogram.entry(name).or_insert(0) += 1;
}

/// Sorts raw `(second, cost)` pairs, merges spends landing on the same
/// second and turns the costs into a running total.
fn cumulative_timeline(mut raw: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    raw.sort_by_key(|(second, _)| *second);

    let mut timeline: Vec<(u32, u32)> = Vec::with_capacity(raw.len());
    let mut total = 0;
    for (second, cost) in raw {
        total += cost;
        match timeline.last_mut() {
            Some((last, running)) if *last == second => *running = total,
            _ => timeline.push((second, total)),
        }
    }
    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_prodsim::SimError;
    use sage_replay::{Chunk, ChunkKind, Command, GameVariant, ParseStats, UnitCost, UnitId};

    use crate::AnalysisError;

    const FACTORY: u32 = 0x0601;
    const OTHER_FACTORY: u32 = 0x0602;
    const TANK: UnitId = 0xAA01;

    fn body_of(commands: Vec<Command>, end_time: u32) -> ReplayBody {
        let mut chunks: Vec<Chunk> = commands
            .into_iter()
            .map(|command| Chunk {
                time_code: command.time_code,
                kind: ChunkKind::Commands,
                data: Vec::new(),
                commands: vec![command],
            })
            .collect();
        // Trailing heartbeat, as real bodies end with; it carries the end
        // time the simulator is gated on.
        chunks.push(Chunk {
            time_code: end_time,
            kind: ChunkKind::Camera,
            data: Vec::new(),
            commands: Vec::new(),
        });

        ReplayBody {
            chunks,
            stats: ParseStats::default(),
        }
    }

    fn queue(time_code: u32, player_id: i32, factory: u32, unit: UnitId, name: &str, cost: Option<u32>) -> Command {
        Command {
            time_code,
            player_id,
            opcode: 0x2D,
            body: CommandBody::Queue {
                factory,
                unit,
                unit_name: name.to_string(),
                count: 1,
                cost: cost.map(UnitCost::Flat),
            },
        }
    }

    fn skill(time_code: u32, player_id: i32, cost: u32) -> Command {
        Command {
            time_code,
            player_id,
            opcode: 0x26,
            body: CommandBody::SkillTargetless {
                power: 0x41C2_0A85,
                name: "Radar Scan".into(),
                cost,
            },
        }
    }

    fn placedown(time_code: u32, player_id: i32, cost: Option<u32>, free_unit: Option<(UnitId, &str)>) -> Command {
        Command {
            time_code,
            player_id,
            opcode: 0x31,
            body: CommandBody::PlaceStructure {
                building: 0xC2E5_1069,
                name: "GDI Tiberium Refinery".into(),
                cost: cost.map(UnitCost::Flat),
                free_unit: free_unit.map(|(id, name)| (id, name.to_string())),
                substructures: Vec::new(),
            },
        }
    }

    #[test]
    fn test_direct_spends_merge_into_one_point_per_second() {
        let body = body_of(
            vec![
                placedown(30, 0, Some(2000), None), // second 2
                skill(40, 0, 500),                  // second 2 as well
                skill(90, 0, 0),                    // second 6, free power
            ],
            1000,
        );
        let tables = GameTables::bare(GameVariant::KanesWrath);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        assert_eq!(report.spend[0], vec![(2, 2500), (6, 2500)]);
        assert!(report.unit_counts[0].is_empty());
        assert!(report.completions.is_empty());
    }

    #[test]
    fn test_production_charged_on_delivery() {
        let body = body_of(vec![queue(0, 0, FACTORY, TANK, "GDI Predator Tank", Some(300))], 1000);
        let tables = GameTables::bare(GameVariant::KanesWrath);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        // Build time for 300 credits is 51 ticks, 3 whole seconds in.
        assert_eq!(report.spend[0], vec![(3, 300)]);
        assert_eq!(report.unit_counts[0]["GDI Predator Tank"], 1);
        assert_eq!(report.completions.len(), 1);
        assert_eq!(report.completions[0].time_code, 51);
    }

    #[test]
    fn test_timeline_interleaves_simulated_and_direct_spends() {
        let body = body_of(
            vec![
                queue(0, 0, FACTORY, TANK, "GDI Predator Tank", Some(300)),
                skill(150, 0, 500), // second 10, pushed before the completion surfaces
            ],
            1000,
        );
        let tables = GameTables::bare(GameVariant::KanesWrath);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        assert_eq!(report.spend[0], vec![(3, 300), (10, 800)]);
    }

    #[test]
    fn test_navyd_suffix_folds_into_base_name() {
        let body = body_of(
            vec![
                queue(0, 0, FACTORY, 0x2B1B_4860, "Allied Riptide ACV", Some(100)),
                queue(0, 0, OTHER_FACTORY, 0x2B1B_5543, "Allied Riptide ACV (NavYd)", Some(100)),
            ],
            1000,
        );
        let tables = GameTables::bare(GameVariant::RedAlert3);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        assert_eq!(report.unit_counts[0]["Allied Riptide ACV"], 2);
        assert!(!report.unit_counts[0].contains_key("Allied Riptide ACV (NavYd)"));
    }

    #[test]
    fn test_ra3_core_completion_credits_collector() {
        const CORE: UnitId = 0x14FA_7C4B;
        const COLLECTOR: UnitId = 0xAD93_E7CF;

        let mut tables = GameTables::bare(GameVariant::RedAlert3);
        tables.free_units.insert(CORE, COLLECTOR);
        tables.units.insert(COLLECTOR, "Soviet Ore Collector".into());

        let body = body_of(vec![queue(0, 0, FACTORY, CORE, "Soviet Ore Refinery", Some(2000))], 10_000);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        assert_eq!(report.unit_counts[0]["Soviet Ore Refinery"], 1);
        assert_eq!(report.unit_counts[0]["Soviet Ore Collector"], 1);
    }

    #[test]
    fn test_free_unit_credit_on_completion_is_ra3_only() {
        const REFINERY: UnitId = 0xC2E5_1069;
        const HARVESTER: UnitId = 0x5B33_C86A;

        // The Tiberium titles hand out their harvester on placedown, where
        // the decoded command already carries it. A completion never does.
        let mut tables = GameTables::bare(GameVariant::KanesWrath);
        tables.free_units.insert(REFINERY, HARVESTER);
        tables.units.insert(HARVESTER, "GDI Harvester".into());

        let body = body_of(vec![queue(0, 0, FACTORY, REFINERY, "GDI Tiberium Refinery", Some(2000))], 10_000);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        assert_eq!(report.unit_counts[0]["GDI Tiberium Refinery"], 1);
        assert!(!report.unit_counts[0].contains_key("GDI Harvester"));
    }

    #[test]
    fn test_placedown_free_unit_counts_without_cost() {
        let body = body_of(vec![placedown(0, 0, None, Some((0x5B33_C86A, "GDI Harvester")))], 1000);
        let tables = GameTables::bare(GameVariant::KanesWrath);

        let report = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap();
        assert!(report.spend[0].is_empty());
        assert_eq!(report.unit_counts[0]["GDI Harvester"], 1);
    }

    #[test]
    fn test_out_of_range_players_are_skipped() {
        let body = body_of(
            vec![
                skill(0, -1, 500),
                queue(0, 7, FACTORY, TANK, "GDI Predator Tank", Some(300)),
            ],
            1000,
        );
        let tables = GameTables::bare(GameVariant::KanesWrath);

        let report = ResourceAnalyzer::new(&body, &tables, 2).calc().unwrap();
        assert!(report.spend.iter().all(Vec::is_empty));
        assert!(report.unit_counts.iter().all(HashMap::is_empty));
        assert!(report.completions.is_empty());
    }

    #[test]
    fn test_missing_queue_cost_is_an_error() {
        let body = body_of(vec![queue(42, 0, FACTORY, TANK, "Unit 0x0000AA01", None)], 1000);
        let tables = GameTables::bare(GameVariant::KanesWrath);

        let error = ResourceAnalyzer::new(&body, &tables, 1).calc().unwrap_err();
        let AnalysisError::Sim(SimError::MissingUnitCost { unit_name, time_code }) = error;
        assert_eq!(unit_name, "Unit 0x0000AA01");
        assert_eq!(time_code, 42);
    }
}
