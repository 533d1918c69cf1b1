//! Kane's Wrath (1.02) tables.
//!
//! KW shares most of its command set with Tiberium Wars but renumbers
//! nothing; the notable addition is the 0x2C formation/grouping command,
//! which only needs framing, not decoding.

use sage_replay::OpcodeKind::{
    FormationMove, Gg, Hold, Move, Opaque, PlaceStructure, PowerToggle, Queue, ReverseMove, Sell, Skill2XY,
    SkillTarget, SkillTargetless, SkillXY, Upgrade,
};
use sage_replay::RecordRule::{Crawl, CountPrefixed, Fixed, ProductionEither, Scan, TargetedSkill, WordGroups};
use sage_replay::UnitCost::Flat;
use sage_replay::{GameTables, GameVariant, OpcodeKind, RecordRule, UnitCost, UnitId};

use crate::{load_commands, load_powers, load_units, load_upgrades};

const COMMANDS: &[(u8, RecordRule, OpcodeKind)] = &[
    (0x26, Fixed(12), SkillTargetless),
    (0x27, Fixed(17), SkillXY),
    (0x28, TargetedSkill { count_at: 15, base: 29 }, SkillTarget),
    (0x2B, Fixed(17), Upgrade),
    (0x2C, WordGroups { head: 5, tail: 4 }, Opaque),
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
    // Selection, grouping and UI bookkeeping. Framed so the records around
    // them stay aligned, never decoded.
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

// Display names lead with the faction word; downstream faction resolution
// relies on that.
const UNITS: &[(UnitId, &str, UnitCost)] = &[
    // GDI
    (0x87C8_4C0D, "GDI Rifleman Squad", Flat(300)),
    (0x87C8_4D52, "GDI Missile Squad", Flat(400)),
    (0x9E24_A3B1, "GDI Predator Tank", Flat(1100)),
    (0x9E24_A55F, "GDI Pitbull", Flat(700)),
    (0x3C5F_0A8E, "GDI APC", Flat(700)),
    (0x9E2B_1D07, "GDI Mammoth Tank", Flat(2500)),
    (0xB1A0_347C, "GDI Orca Gunship", Flat(1100)),
    (0xB1A0_3F19, "GDI Firehawk", Flat(1500)),
    (0x44D9_0272, "GDI Zone Trooper Squad", Flat(1300)),
    (0x44D9_100B, "GDI Commando", Flat(2000)),
    (0x5B33_C86A, "GDI Harvester", Flat(1600)),
    (0x71E8_6D94, "GDI Juggernaut", Flat(2400)),
    (0x71E8_7001, "GDI Titan", Flat(1300)),
    (0x71E8_71AD, "GDI Wolverine", Flat(800)),
    (0x9E24_B8C3, "GDI Slingshot", Flat(900)),
    (0x44D9_1566, "GDI Zone Raider Squad", Flat(1400)),
    // Nod
    (0x12F0_A95E, "Nod Militant Squad", Flat(200)),
    (0x12F0_AA13, "Nod Militant Rocket Squad", Flat(300)),
    (0x60B3_278F, "Nod Attack Bike", Flat(500)),
    (0x60B3_2944, "Nod Scorpion Tank", Flat(800)),
    (0x60B3_2C51, "Nod Raider Buggy", Flat(500)),
    (0x78D4_E60A, "Nod Avatar", Flat(2200)),
    (0xB1A0_47E2, "Nod Vertigo Bomber", Flat(1800)),
    (0x78D4_EB3D, "Nod Venom", Flat(900)),
    (0x78D4_EF90, "Nod Stealth Tank", Flat(1500)),
    (0x12F0_B2C8, "Nod Black Hand Squad", Flat(800)),
    (0x12F0_B477, "Nod Shadow Team", Flat(1200)),
    (0x5B33_CA21, "Nod Harvester", Flat(1600)),
    (0x60B3_311A, "Nod Reckoner", Flat(800)),
    (0x78D4_F4E6, "Nod Specter", Flat(1400)),
    (0x60B3_352B, "Nod Mantis", Flat(900)),
    // Scrin
    (0x25A1_C3F0, "Scrin Buzzers", Flat(200)),
    (0x25A1_C49D, "Scrin Disintegrators", Flat(300)),
    (0x93B7_D012, "Scrin Gun Walker", Flat(600)),
    (0x93B7_D1C8, "Scrin Seeker", Flat(800)),
    (0x93B7_D34A, "Scrin Devourer Tank", Flat(1100)),
    (0xA40E_82D5, "Scrin Annihilator Tripod", Flat(3000)),
    (0xB1A0_5198, "Scrin Stormrider", Flat(1100)),
    (0xA40E_88EC, "Scrin Planetary Assault Carrier", Flat(2700)),
    (0x5B33_CC47, "Scrin Harvester", Flat(1600)),
    (0x93B7_D8A1, "Scrin Ravager Squad", Flat(900)),
    (0xA40E_8D23, "Scrin Mechapede", Flat(2200)),
    (0xA40E_9154, "Scrin Eradicator Hexapod", Flat(3500)),
    // GDI structures
    (0xC2E5_0B37, "GDI Power Plant", Flat(700)),
    (0xC2E5_0DA2, "GDI Barracks", Flat(500)),
    (0xC2E5_1069, "GDI Tiberium Refinery", Flat(3000)),
    (0xC2E5_128E, "GDI War Factory", Flat(2000)),
    (0xC2E5_14F3, "GDI Command Post", Flat(1500)),
    (0xC2E5_1701, "GDI Airfield", Flat(1000)),
    (0xC2E5_1A5C, "GDI Tech Center", Flat(4000)),
    // Nod structures
    (0xD5F6_2049, "Nod Power Plant", Flat(600)),
    (0xD5F6_22B4, "Nod Hand of Nod", Flat(500)),
    (0xD5F6_251B, "Nod Tiberium Refinery", Flat(3000)),
    (0xD5F6_2780, "Nod War Factory", Flat(2000)),
    (0xD5F6_2A37, "Nod Operations Center", Flat(1500)),
    (0xD5F6_2C9E, "Nod Air Tower", Flat(1000)),
    (0xD5F6_2F05, "Nod Tech Lab", Flat(4000)),
    // Scrin structures
    (0xE807_1536, "Scrin Reactor", Flat(600)),
    (0xE807_17A1, "Scrin Portal", Flat(500)),
    (0xE807_1A08, "Scrin Refinery", Flat(3000)),
    (0xE807_1C6F, "Scrin Warp Sphere", Flat(2000)),
    (0xE807_1ED4, "Scrin Nerve Center", Flat(1500)),
    (0xE807_213B, "Scrin Gravity Stabilizer", Flat(1000)),
    (0xE807_23A2, "Scrin Technology Assembler", Flat(4000)),
];

const POWERS: &[(u32, &str, u32)] = &[
    (0x41C2_0A85, "Radar Scan", 0),
    (0x41C2_0CE3, "Zone Trooper Drop Pods", 2000),
    (0x41C2_0F4A, "Shockwave Artillery", 1500),
    (0x41C2_11B1, "Orbital Strike", 2500),
    (0x52D3_1698, "Decoy Army", 1500),
    (0x52D3_18FF, "Catalyst Missile", 1000),
    (0x52D3_1B66, "Shadow Strike Team", 1500),
    (0x52D3_1DCD, "Tiberium Vapor Bomb", 2500),
    (0x63E4_2234, "Ichor Seed", 1500),
    (0x63E4_249B, "Lightning Spike", 1500),
    (0x63E4_2702, "Wormhole", 1500),
];

const UPGRADES: &[(u32, &str, u32)] = &[
    (0x74F5_2B69, "Power Packs", 500),
    (0x74F5_2DD0, "Composite Armor", 1000),
    (0x74F5_3037, "AP Ammo", 2000),
    (0x74F5_329E, "Sonic Grenades", 2000),
    (0x74F5_3505, "Railguns", 5000),
    (0x8506_3A6C, "Laser Capacitors", 4000),
    (0x8506_3CD3, "EMP Coils", 2000),
    (0x8506_3F3A, "Tiberium Infusion", 2500),
    (0x8506_41A1, "Purifying Flame", 3000),
    (0x9617_5608, "Forcefield Generators", 3000),
    (0x9617_586F, "Blink Packs", 2500),
    (0x9617_5AD6, "Shard Launchers", 2000),
];

const AIRFIELD_UNITS: &[UnitId] = &[0xB1A0_347C, 0xB1A0_3F19, 0xB1A0_47E2];

const FREE_UNITS: &[(u32, UnitId)] = &[
    (0xC2E5_1069, 0x5B33_C86A), // GDI refinery -> harvester
    (0xD5F6_251B, 0x5B33_CA21),
    (0xE807_1A08, 0x5B33_CC47),
];

pub(crate) fn tables() -> GameTables {
    let mut tables = GameTables::bare(GameVariant::KanesWrath);
    load_commands(&mut tables.commands, COMMANDS);
    load_units(&mut tables, UNITS);
    load_powers(&mut tables, POWERS);
    load_upgrades(&mut tables, UPGRADES);
    tables.airfield_units.extend(AIRFIELD_UNITS.iter().copied());
    tables.free_units.extend(FREE_UNITS.iter().copied());
    tables
}
