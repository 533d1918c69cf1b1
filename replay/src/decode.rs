//! Per-opcode record decoding.
//!
//! Byte offsets in here were worked out from observed replays, not from any
//! spec the games ever published, so most bodies still contain bytes nobody
//! has identified. Decoders read the fields we trust and leave the rest
//! alone. Ids that the injected tables can't name get a hex display name so
//! they stay visible in timelines.

use std::collections::HashMap;

use crate::command::{Command, CommandBody, Position};
use crate::config::{GameTables, OpcodeKind, UnitId};
use crate::framer::RawRecord;
use crate::Log;

/// RA3 deploy records don't carry a useful asset id; every one of them is
/// an MCV or core unpacking.
const DEPLOY_NAME: &str = "Deploy Core/MCV";

/// Decodes a framed record into a [`Command`], carrying the owning chunk's
/// time code along.
pub(crate) fn decode_record(record: &RawRecord<'_>, time_code: u32, tables: &GameTables) -> Command {
    let player_id = record.player_slot as i32 / 8 - tables.player_slot_bias;
    let body = record.body;

    let kind = tables.commands.get(&record.opcode).map(|entry| entry.kind);
    let decoded = match kind {
        Some(OpcodeKind::Queue) => decode_queue(player_id, body, tables),
        Some(OpcodeKind::QueueRa3) => decode_queue_ra3(body, tables),
        Some(OpcodeKind::Hold) => decode_hold(body, tables),
        Some(OpcodeKind::HoldRa3) => decode_hold_ra3(body, tables),
        Some(OpcodeKind::Sell) => CommandBody::Sell { target: u32_at(body, 1) },
        Some(OpcodeKind::PowerToggle) => CommandBody::PowerToggle { target: u32_at(body, 1) },
        Some(OpcodeKind::Upgrade) => decode_upgrade(body, tables),
        Some(OpcodeKind::Science) => decode_science(body, tables),
        Some(OpcodeKind::SkillXY) => decode_skill_xy(body, tables),
        Some(OpcodeKind::Skill2XY) => decode_skill_2xy(body, tables),
        Some(OpcodeKind::SkillTargetless) => decode_skill_targetless(body, tables),
        Some(OpcodeKind::SkillTarget) => decode_skill_target(player_id, body, tables),
        Some(OpcodeKind::Deploy) => decode_deploy(body),
        Some(OpcodeKind::PlaceStructure) => decode_placedown(body, tables),
        Some(OpcodeKind::Move) => CommandBody::Move { at: position_at(body, 1) },
        Some(OpcodeKind::FormationMove) => CommandBody::FormationMove { at: position_at(body, 1) },
        Some(OpcodeKind::ReverseMove) => CommandBody::ReverseMove { at: position_at(body, 1) },
        Some(OpcodeKind::Gg) => decode_gg(player_id, body),
        Some(OpcodeKind::Opaque) | None => {
            tracing::trace!(target: Log::Replay, opcode = record.opcode, "No decoder for opcode");
            CommandBody::Unresolved { raw: body.to_vec() }
        },
    };

    Command {
        time_code,
        player_id,
        opcode: record.opcode,
        body: decoded,
    }
}

/// TW/KW production queue. The same opcode doubles as one of the ways a
/// player's departure shows up, recognizable by the stunted body shapes.
fn decode_queue(player_id: i32, body: &[u8], tables: &GameTables) -> CommandBody {
    if body.len() <= 2 || body[1] == 0x02 || body.len() <= 18 {
        return CommandBody::EndOfGame { target: player_id };
    }

    let factory = u32_at(body, 1);
    let unit = u32_at(body, 8);
    CommandBody::Queue {
        factory,
        unit,
        unit_name: unit_name(tables, unit),
        count: queue_count(body[17], unit, tables),
        cost: tables.unit_costs.get(&unit).copied(),
    }
}

fn decode_queue_ra3(body: &[u8], tables: &GameTables) -> CommandBody {
    let factory = u32_at(body, 1);
    let unit = u32_at(body, 6);
    CommandBody::Queue {
        factory,
        unit,
        unit_name: unit_name(tables, unit),
        count: queue_count(body[11], unit, tables),
        cost: tables.unit_costs.get(&unit).copied(),
    }
}

/// A nonzero multiplier byte is a shift-click: five units, or four when the
/// unit parks at an airfield and one pad is already spoken for.
fn queue_count(multi: u8, unit: UnitId, tables: &GameTables) -> u8 {
    match multi != 0 {
        true if tables.airfield_units.contains(&unit) => 4,
        true => 5,
        false => 1,
    }
}

fn decode_hold(body: &[u8], tables: &GameTables) -> CommandBody {
    let unit = u32_at(body, 8);
    CommandBody::Hold {
        factory: u32_at(body, 1),
        unit,
        unit_name: unit_name(tables, unit),
        cancel_all: body[13] != 0,
    }
}

fn decode_hold_ra3(body: &[u8], tables: &GameTables) -> CommandBody {
    let unit = u32_at(body, 6);
    CommandBody::Hold {
        factory: u32_at(body, 1),
        unit,
        unit_name: unit_name(tables, unit),
        cancel_all: body[11] != 0,
    }
}

fn decode_upgrade(body: &[u8], tables: &GameTables) -> CommandBody {
    let upgrade = u32_at(body, 1);
    CommandBody::Upgrade {
        upgrade,
        name: resolve_name(&tables.upgrades, upgrade, "Upgrade"),
        cost: tables.upgrade_costs.get(&upgrade).copied().unwrap_or(0),
    }
}

fn decode_science(body: &[u8], tables: &GameTables) -> CommandBody {
    let science = u32_at(body, 1);
    CommandBody::Science {
        science,
        name: resolve_name(&tables.sciences, science, "Science"),
    }
}

fn decode_skill_xy(body: &[u8], tables: &GameTables) -> CommandBody {
    let power = u32_at(body, 0);
    CommandBody::SkillXY {
        power,
        name: resolve_name(&tables.powers, power, "Skill"),
        cost: tables.power_costs.get(&power).copied().unwrap_or(0),
        at: position_at(body, 6),
    }
}

fn decode_skill_2xy(body: &[u8], tables: &GameTables) -> CommandBody {
    let power = u32_at(body, 0);
    CommandBody::Skill2XY {
        power,
        name: resolve_name(&tables.powers, power, "Skill"),
        cost: tables.power_costs.get(&power).copied().unwrap_or(0),
        from: position_at(body, 16),
        to: position_at(body, 28),
    }
}

fn decode_skill_targetless(body: &[u8], tables: &GameTables) -> CommandBody {
    let power = u32_at(body, 0);
    CommandBody::SkillTargetless {
        power,
        name: resolve_name(&tables.powers, power, "Skill"),
        cost: tables.power_costs.get(&power).copied().unwrap_or(0),
    }
}

/// Targeted skill, which RA3 also reuses as a departure marker: a stunted
/// body or a zero power id means the player is gone.
fn decode_skill_target(player_id: i32, body: &[u8], tables: &GameTables) -> CommandBody {
    if body.len() < 5 {
        return CommandBody::EndOfGame { target: player_id };
    }
    let power = u32_at(body, 0);
    if power == 0 {
        return CommandBody::EndOfGame { target: player_id };
    }

    CommandBody::SkillTarget {
        power,
        name: resolve_name(&tables.powers, power, "Skill"),
        cost: tables.power_costs.get(&power).copied().unwrap_or(0),
    }
}

fn decode_deploy(body: &[u8]) -> CommandBody {
    CommandBody::Deploy {
        name: DEPLOY_NAME.to_string(),
        at: position_at(body, 6),
        orientation: f32_at(body, 19),
    }
}

fn decode_placedown(body: &[u8], tables: &GameTables) -> CommandBody {
    let building = u32_at(body, 6);
    let count = body[10] as usize;

    // 18 bytes per substructure; the position floats sit at +4 and +8 inside
    // each one. What the other ten bytes mean is still anyone's guess.
    let mut substructures = Vec::with_capacity(count);
    for i in 0..count {
        let base = 11 + 18 * i;
        substructures.push(position_at(body, base + 4));
    }

    let free_unit = tables
        .free_units
        .get(&building)
        .map(|unit| (*unit, unit_name(tables, *unit)));

    CommandBody::PlaceStructure {
        building,
        name: resolve_name(&tables.units, building, "Bldg"),
        cost: tables.unit_costs.get(&building).copied(),
        free_unit,
        substructures,
    }
}

fn decode_gg(player_id: i32, body: &[u8]) -> CommandBody {
    match body.first() {
        None | Some(&0xFF) => CommandBody::EndOfGame { target: player_id },
        Some(_) => CommandBody::Gg {
            target: body.get(1).copied().unwrap_or(0),
        },
    }
}

fn unit_name(tables: &GameTables, id: UnitId) -> String {
    resolve_name(&tables.units, id, "Unit")
}

fn resolve_name(names: &HashMap<u32, String>, id: u32, fallback: &str) -> String {
    match names.get(&id) {
        Some(name) => name.clone(),
        None => format!("{fallback} 0x{id:08X}"),
    }
}

fn u32_at(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn f32_at(data: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn position_at(data: &[u8], offset: usize) -> Position {
    Position {
        x: f32_at(data, offset),
        y: f32_at(data, offset + 4),
    }
}
