//! Static decoding data for the supported titles.
//!
//! None of this was ever published by the games: the framing rules and the
//! asset-id/name/cost pairings below were matched up from observed replays by
//! the community over many years. The tables are plain Rust data so that a
//! newly identified id is a one-line addition.
//!
//! Rosters are representative rather than exhaustive. An id that is missing
//! here still decodes; it just surfaces with a hex display name and no cost,
//! which every downstream consumer has to tolerate anyway.

mod kw;
mod ra3;
mod tw;

use sage_replay::{CommandTable, GameTables, GameVariant, OpcodeEntry, OpcodeKind, RecordRule, UnitCost, UnitId};

/// Returns the decoding tables for one game variant.
pub fn tables_for(variant: GameVariant) -> GameTables {
    match variant {
        GameVariant::TiberiumWars => tw::tables(),
        GameVariant::KanesWrath => kw::tables(),
        GameVariant::RedAlert3 => ra3::tables(),
    }
}

pub(crate) fn load_commands(table: &mut CommandTable, entries: &[(u8, RecordRule, OpcodeKind)]) {
    for &(opcode, rule, kind) in entries {
        table.insert(opcode, OpcodeEntry { rule, kind });
    }
}

/// Loads units and structures. They share one id namespace in every variant,
/// so they also share the name and cost maps.
pub(crate) fn load_units(tables: &mut GameTables, entries: &[(UnitId, &str, UnitCost)]) {
    for &(id, name, cost) in entries {
        tables.units.insert(id, name.to_string());
        tables.unit_costs.insert(id, cost);
    }
}

pub(crate) fn load_powers(tables: &mut GameTables, entries: &[(u32, &str, u32)]) {
    for &(id, name, cost) in entries {
        tables.powers.insert(id, name.to_string());
        if cost > 0 {
            tables.power_costs.insert(id, cost);
        }
    }
}

pub(crate) fn load_upgrades(tables: &mut GameTables, entries: &[(u32, &str, u32)]) {
    for &(id, name, cost) in entries {
        tables.upgrades.insert(id, name.to_string());
        if cost > 0 {
            tables.upgrade_costs.insert(id, cost);
        }
    }
}
