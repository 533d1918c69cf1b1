//! Red Alert 3 (1.12) tables.
//!
//! RA3 renumbered its command set and reshuffled the body layouts, so the
//! production and hold opcodes map to their own decode kinds. Two quirks to
//! know about: structures are queued through the construction yard rather
//! than placed directly, which is why they appear in the unit tables with
//! build times; and naval units buildable from a seaport carry a second
//! asset id, listed here with a `(NavYd)` suffix that consumers fold away.

use sage_replay::OpcodeKind::{
    Deploy, FormationMove, Gg, HoldRa3, Move, Opaque, PlaceStructure, PowerToggle, QueueRa3, ReverseMove, Science,
    Sell, Skill2XY, SkillTarget, SkillTargetless, SkillXY, Upgrade,
};
use sage_replay::RecordRule::{Crawl, CountPrefixed, Fixed, Scan, TargetedSkill};
use sage_replay::UnitCost::{Flat, WithBuildTime};
use sage_replay::{GameTables, GameVariant, OpcodeKind, RecordRule, UnitCost, UnitId};

use crate::{load_commands, load_powers, load_units, load_upgrades};

const COMMANDS: &[(u8, RecordRule, OpcodeKind)] = &[
    (0x21, Fixed(26), Deploy),
    (0x25, CountPrefixed { head: 10, per: 18, tail: 3 }, PlaceStructure),
    (0x28, Fixed(15), QueueRa3),
    (0x29, Fixed(15), HoldRa3),
    (0x2A, Fixed(8), Sell),
    (0x2B, Fixed(8), PowerToggle),
    (0x2C, Fixed(8), Upgrade),
    (0x31, TargetedSkill { count_at: 15, base: 29 }, SkillTarget),
    (0x32, Fixed(12), SkillTargetless),
    (0x33, Fixed(17), SkillXY),
    (0x35, Fixed(39), Skill2XY),
    (0x46, Scan { min: 11 }, Move),
    (0x47, Scan { min: 11 }, FormationMove),
    (0x48, Scan { min: 11 }, ReverseMove),
    (0x4B, Crawl, Gg),
    (0x5F, Fixed(11), Science),
    // Selection and UI bookkeeping, framed but never decoded.
    (0x02, Fixed(40), Opaque),
    (0x0C, Crawl, Opaque),
    (0x34, Fixed(45), Opaque),
    (0x37, Fixed(8), Opaque),
    (0x4D, Crawl, Opaque),
    (0xF5, Scan { min: 5 }, Opaque),
    (0xF8, Scan { min: 4 }, Opaque),
    (0xFF, Fixed(17), Opaque),
];

// Display names lead with the faction word; downstream faction resolution
// relies on that.
const UNITS: &[(UnitId, &str, UnitCost)] = &[
    // Allies
    (0x1F0A_2C44, "Allied Peacekeeper", Flat(200)),
    (0x1F0A_2E0B, "Allied Javelin Soldier", Flat(300)),
    (0x1F0A_30D2, "Allied Attack Dog", Flat(200)),
    (0x1F0A_3399, "Allied Engineer", Flat(500)),
    (0x2B1B_4860, "Allied Riptide ACV", Flat(900)),
    (0x2B1B_4A27, "Allied Guardian Tank", Flat(950)),
    (0x2B1B_4CEE, "Allied Multigunner IFV", Flat(900)),
    (0x2B1B_4FB5, "Allied Athena Cannon", Flat(1400)),
    (0x2B1B_527C, "Allied Mirage Tank", Flat(1800)),
    (0x3C2C_6143, "Allied Apollo Fighter", Flat(1000)),
    (0x3C2C_640A, "Allied Vindicator", Flat(1200)),
    (0x3C2C_66D1, "Allied Century Bomber", Flat(2000)),
    (0x4D3D_7598, "Allied Hydrofoil", Flat(900)),
    (0x4D3D_785F, "Allied Assault Destroyer", Flat(1800)),
    (0x4D3D_7B26, "Allied Aircraft Carrier", Flat(2000)),
    (0x5E4E_89ED, "Allied Prospector", WithBuildTime { cost: 1000, build_ticks: 75 }),
    (0x2B1B_5543, "Allied Riptide ACV (NavYd)", Flat(900)),
    (0x4D3D_7DF3, "Allied Hydrofoil (NavYd)", Flat(900)),
    // Soviets
    (0x6F5F_92B4, "Soviet Conscript", Flat(100)),
    (0x6F5F_947B, "Soviet Flak Trooper", Flat(300)),
    (0x6F5F_9642, "Soviet War Bear", Flat(225)),
    (0x7A60_A809, "Soviet Sickle", Flat(900)),
    (0x7A60_AAD0, "Soviet Bullfrog", Flat(900)),
    (0x7A60_AD97, "Soviet Hammer Tank", Flat(1000)),
    (0x7A60_B05E, "Soviet Apocalypse Tank", Flat(2000)),
    (0x7A60_B325, "Soviet V4 Rocket Launcher", Flat(1800)),
    (0x8B71_C1EC, "Soviet Twinblade", Flat(1200)),
    (0x8B71_C4B3, "Soviet MiG Fighter", Flat(1000)),
    (0x8B71_C77A, "Soviet Kirov Airship", Flat(2500)),
    (0x9C82_D641, "Soviet Stingray", Flat(1000)),
    (0x9C82_D908, "Soviet Dreadnought", Flat(2000)),
    (0xAD93_E7CF, "Soviet Ore Collector", WithBuildTime { cost: 1000, build_ticks: 75 }),
    (0x7A60_B5F2, "Soviet Bullfrog (NavYd)", Flat(900)),
    (0x9C82_DBD5, "Soviet Stingray (NavYd)", Flat(1000)),
    // Empire
    (0xBEA4_F096, "Imperial Warrior", Flat(150)),
    (0xBEA4_F25D, "Imperial Tankbuster", Flat(300)),
    (0xBEA4_F424, "Imperial Shinobi", Flat(1000)),
    (0xCFB5_0AEB, "Imperial Mecha Tengu", Flat(800)),
    (0xCFB5_0DB2, "Imperial Tsunami Tank", Flat(900)),
    (0xCFB5_1079, "Imperial King Oni", Flat(2000)),
    (0xCFB5_1340, "Imperial Wave-Force Artillery", Flat(1750)),
    (0xD0C6_2207, "Imperial Chopper-VX", Flat(900)),
    (0xE1D7_30CE, "Imperial Naginata Cruiser", Flat(1800)),
    (0xE1D7_3395, "Imperial Shogun Battleship", Flat(2500)),
    (0xF2E8_425C, "Imperial Ore Collector", WithBuildTime { cost: 1000, build_ticks: 75 }),
    (0xCFB5_15FD, "Imperial Mecha Tengu (NavYd)", Flat(800)),
    // Structures; queued like units in RA3, so they carry build times.
    (0x03F9_5A13, "Allied Power Plant", Flat(800)),
    (0x03F9_5CDA, "Allied Boot Camp", Flat(500)),
    (0x03F9_5FA1, "Allied Ore Refinery", WithBuildTime { cost: 2000, build_ticks: 150 }),
    (0x03F9_6268, "Allied Armor Facility", Flat(2000)),
    (0x03F9_652F, "Allied Airbase", Flat(1000)),
    (0x03F9_67F6, "Allied Seaport", Flat(1000)),
    (0x14FA_76BD, "Soviet Reactor", Flat(750)),
    (0x14FA_7984, "Soviet Barracks", Flat(500)),
    (0x14FA_7C4B, "Soviet Ore Refinery", WithBuildTime { cost: 2000, build_ticks: 150 }),
    (0x14FA_7F12, "Soviet War Factory", Flat(2000)),
    (0x14FA_81D9, "Soviet Airfield", Flat(1000)),
    (0x14FA_84A0, "Soviet Naval Yard", Flat(1000)),
    (0x250B_9367, "Imperial Instant Dojo", Flat(500)),
    (0x250B_962E, "Imperial Instant Refinery", WithBuildTime { cost: 2000, build_ticks: 150 }),
    (0x250B_98F5, "Imperial Mecha Bay", Flat(2000)),
    (0x250B_9BBC, "Imperial Instant Generator", Flat(800)),
    (0x250B_9E83, "Imperial Docks", Flat(1000)),
];

/// Support powers. They come from protocol purchases and cost no credits,
/// so the cost column stays zero; the spend timeline still records their use.
const POWERS: &[(u32, &str, u32)] = &[
    (0x30D1_4A2F, "Sleeper Ambush", 0),
    (0x30D1_4CF6, "Terror Drone Surprise", 0),
    (0x30D1_4FBD, "Desolator Airstrike", 0),
    (0x41E2_5E84, "Time Bomb", 0),
    (0x41E2_614B, "Chrono Swap", 0),
    (0x41E2_6412, "Cryo Blast", 0),
    (0x52F3_72D9, "Final Squadron", 0),
    (0x52F3_75A0, "Balloon Bombs", 0),
    (0x52F3_7867, "Sneak Attack", 0),
];

const UPGRADES: &[(u32, &str, u32)] = &[
    (0x6304_7D2E, "Advanced Aeronautics", 0),
    (0x6304_80F5, "Cryobeam Technology", 0),
    (0x6314_83BC, "Fortified Fleet", 0),
];

/// Top Secret Protocol picks, bought with security points rather than
/// credits. The other two titles have nothing equivalent.
const SCIENCES: &[(u32, &str)] = &[
    (0x7415_93A8, "Surveillance Sweep"),
    (0x7415_966F, "Cash Bounty"),
    (0x7415_9936, "Desolator Airstrike"),
    (0x8526_A7FD, "Magnetic Singularity"),
    (0x8526_AAC4, "Iron Curtain"),
    (0x8526_AD8B, "Orbital Drop"),
    (0x9637_BC52, "Honorable Discharge"),
    (0x9637_BF19, "Emperor's Rage"),
    (0x9637_C1E0, "Final Squadron"),
];

const AIRFIELD_UNITS: &[UnitId] = &[0x3C2C_6143, 0x3C2C_640A, 0x3C2C_66D1, 0x8B71_C4B3];

const FREE_UNITS: &[(u32, UnitId)] = &[
    (0x03F9_5FA1, 0x5E4E_89ED), // each refinery comes with its collector
    (0x14FA_7C4B, 0xAD93_E7CF),
    (0x250B_962E, 0xF2E8_425C),
];

pub(crate) fn tables() -> GameTables {
    let mut tables = GameTables::bare(GameVariant::RedAlert3);
    load_commands(&mut tables.commands, COMMANDS);
    load_units(&mut tables, UNITS);
    load_powers(&mut tables, POWERS);
    load_upgrades(&mut tables, UPGRADES);
    for &(id, name) in SCIENCES {
        tables.sciences.insert(id, name.to_string());
    }
    tables.airfield_units.extend(AIRFIELD_UNITS.iter().copied());
    tables.free_units.extend(FREE_UNITS.iter().copied());
    tables
}
