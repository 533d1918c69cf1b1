//! Tiberium Wars (1.09) tables.
//!
//! Asset ids are not stable across the two Tiberium titles, so nothing here
//! is shared with the Kane's Wrath module even where the rosters overlap.

use sage_replay::OpcodeKind::{
    FormationMove, Gg, Hold, Move, Opaque, PlaceStructure, PowerToggle, Queue, ReverseMove, Sell, Skill2XY,
    SkillTarget, SkillTargetless, SkillXY, Upgrade,
};
use sage_replay::RecordRule::{Crawl, CountPrefixed, Fixed, ProductionEither, Scan, TargetedSkill};
use sage_replay::UnitCost::Flat;
use sage_replay::{GameTables, GameVariant, OpcodeKind, RecordRule, UnitCost, UnitId};

use crate::{load_commands, load_powers, load_units, load_upgrades};

const COMMANDS: &[(u8, RecordRule, OpcodeKind)] = &[
    (0x26, Fixed(12), SkillTargetless),
    (0x27, Fixed(17), SkillXY),
    (0x28, TargetedSkill { count_at: 15, base: 29 }, SkillTarget),
    (0x2B, Fixed(17), Upgrade),
    (0x2D, ProductionEither { short: 5, long: 23 }, Queue),
    (0x2E, Fixed(17), Hold),
    (0x31, CountPrefixed { head: 10, per: 18, tail: 3 }, PlaceStructure),
    (0x34, Fixed(8), Sell),
    (0x36, Fixed(8), PowerToggle),
    (0x4C, Scan { min: 11 }, Move),
    (0x4D, Scan { min: 11 }, FormationMove),
    (0x4E, Scan { min: 11 }, ReverseMove),
    (0x8A, Fixed(39), Skill2XY),
    (0x91, Crawl, Gg),
    // Selection and UI bookkeeping, framed but never decoded.
    (0x2F, Fixed(12), Opaque),
    (0x32, Fixed(53), Opaque),
    (0x33, Fixed(8), Opaque),
    (0x35, Fixed(8), Opaque),
    (0x37, Fixed(8), Opaque),
    (0x47, Fixed(8), Opaque),
    (0x48, Fixed(8), Opaque),
    (0x61, Fixed(9), Opaque),
    (0x72, Crawl, Opaque),
    (0xF5, Scan { min: 5 }, Opaque),
    (0xF8, Scan { min: 4 }, Opaque),
    (0xFA, Fixed(8), Opaque),
    (0xFB, Fixed(9), Opaque),
    (0xFE, Fixed(16), Opaque),
    (0xFF, Fixed(35), Opaque),
];

// Faction word first in every display name, as in the other variants.
const UNITS: &[(UnitId, &str, UnitCost)] = &[
    // GDI
    (0x0A11_3E52, "GDI Rifleman Squad", Flat(300)),
    (0x0A11_4019, "GDI Missile Squad", Flat(400)),
    (0x1B22_4F80, "GDI Predator Tank", Flat(1100)),
    (0x1B22_51C7, "GDI Pitbull", Flat(700)),
    (0x1B22_5430, "GDI APC", Flat(700)),
    (0x1B22_56F9, "GDI Mammoth Tank", Flat(2500)),
    (0x2C33_65A6, "GDI Orca Gunship", Flat(1100)),
    (0x2C33_686D, "GDI Firehawk", Flat(1500)),
    (0x0A11_42E0, "GDI Zone Trooper Squad", Flat(1300)),
    (0x0A11_45A7, "GDI Commando", Flat(2000)),
    (0x3D44_77B4, "GDI Harvester", Flat(1600)),
    (0x1B22_596E, "GDI Juggernaut", Flat(2400)),
    // Nod
    (0x4E55_8623, "Nod Militant Squad", Flat(200)),
    (0x4E55_88EA, "Nod Militant Rocket Squad", Flat(300)),
    (0x5F66_97B1, "Nod Attack Bike", Flat(500)),
    (0x5F66_9A78, "Nod Scorpion Tank", Flat(800)),
    (0x5F66_9D3F, "Nod Raider Buggy", Flat(500)),
    (0x7077_AC06, "Nod Avatar", Flat(2200)),
    (0x2C33_6B34, "Nod Vertigo Bomber", Flat(1800)),
    (0x7077_AECD, "Nod Venom", Flat(900)),
    (0x7077_B194, "Nod Stealth Tank", Flat(1500)),
    (0x4E55_8BB1, "Nod Black Hand Squad", Flat(800)),
    (0x4E55_8E78, "Nod Shadow Team", Flat(1200)),
    (0x3D44_7A7B, "Nod Harvester", Flat(1600)),
    // Scrin
    (0x8188_C05B, "Scrin Buzzers", Flat(200)),
    (0x8188_C322, "Scrin Disintegrators", Flat(300)),
    (0x9299_D1E9, "Scrin Gun Walker", Flat(600)),
    (0x9299_D4B0, "Scrin Seeker", Flat(800)),
    (0x9299_D777, "Scrin Devourer Tank", Flat(1100)),
    (0xA3AA_E63E, "Scrin Annihilator Tripod", Flat(3000)),
    (0x2C33_6DFB, "Scrin Stormrider", Flat(1100)),
    (0xA3AA_E905, "Scrin Planetary Assault Carrier", Flat(2700)),
    (0x3D44_7D42, "Scrin Harvester", Flat(1600)),
    // Structures
    (0xB4BB_F7CC, "GDI Power Plant", Flat(700)),
    (0xB4BB_FA93, "GDI Barracks", Flat(500)),
    (0xB4BB_FD5A, "GDI Tiberium Refinery", Flat(3000)),
    (0xB4BC_0021, "GDI War Factory", Flat(2000)),
    (0xB4BC_02E8, "GDI Command Post", Flat(1500)),
    (0xB4BC_05AF, "GDI Airfield", Flat(1000)),
    (0xC5CD_1476, "Nod Power Plant", Flat(600)),
    (0xC5CD_173D, "Nod Hand of Nod", Flat(500)),
    (0xC5CD_1A04, "Nod Tiberium Refinery", Flat(3000)),
    (0xC5CD_1CCB, "Nod War Factory", Flat(2000)),
    (0xC5CD_1F92, "Nod Air Tower", Flat(1000)),
    (0xD6DE_2E59, "Scrin Reactor", Flat(600)),
    (0xD6DE_3120, "Scrin Portal", Flat(500)),
    (0xD6DE_33E7, "Scrin Refinery", Flat(3000)),
    (0xD6DE_36AE, "Scrin Warp Sphere", Flat(2000)),
];

const POWERS: &[(u32, &str, u32)] = &[
    (0xE7EF_4D09, "Radar Scan", 0),
    (0xE7EF_4FD0, "Zone Trooper Drop Pods", 2000),
    (0xE7EF_5297, "Orbital Strike", 2500),
    (0xF900_6C5E, "Decoy Army", 1500),
    (0xF900_6F25, "Shadow Strike Team", 1500),
    (0xF900_71EC, "Catalyst Missile", 1000),
    (0x0A11_7DEC, "Ichor Seed", 1500),
    (0x0A11_80B3, "Wormhole", 1500),
];

const UPGRADES: &[(u32, &str, u32)] = &[
    (0x1B22_8F7A, "Power Packs", 500),
    (0x1B22_9241, "Composite Armor", 1000),
    (0x1B22_9508, "AP Ammo", 2000),
    (0x2C33_A3CF, "Laser Capacitors", 4000),
    (0x2C33_A696, "Tiberium Infusion", 2500),
    (0x3D44_B55D, "Forcefield Generators", 3000),
    (0x3D44_B824, "Shard Launchers", 2000),
];

const AIRFIELD_UNITS: &[UnitId] = &[0x2C33_65A6, 0x2C33_686D, 0x2C33_6B34];

const FREE_UNITS: &[(u32, UnitId)] = &[
    (0xB4BB_FD5A, 0x3D44_77B4), // GDI refinery -> harvester
    (0xC5CD_1A04, 0x3D44_7A7B),
    (0xD6DE_33E7, 0x3D44_7D42),
];

pub(crate) fn tables() -> GameTables {
    let mut tables = GameTables::bare(GameVariant::TiberiumWars);
    load_commands(&mut tables.commands, COMMANDS);
    load_units(&mut tables, UNITS);
    load_powers(&mut tables, POWERS);
    load_upgrades(&mut tables, UPGRADES);
    tables.airfield_units.extend(AIRFIELD_UNITS.iter().copied());
    tables.free_units.extend(FREE_UNITS.iter().copied());
    tables
}
