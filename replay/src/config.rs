//! Per-variant configuration shapes. Everything the parser and the simulator
//! know about a specific title comes in through [`GameTables`]: opcode framing
//! rules, symbolic names, costs, and the handful of odd per-game unit sets.
//! The assemblies themselves live in the `sage-tables` crate; nothing in here
//! hard-codes game knowledge beyond the slot-bias defaults.

use std::collections::{HashMap, HashSet};

/// In-game asset id, as it appears on the wire. Units, buildings, powers,
/// upgrades and protocols all use the same 32-bit id space.
pub type UnitId = u32;

/// The titles whose replay bodies we can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameVariant {
    TiberiumWars,
    KanesWrath,
    RedAlert3,
}

impl GameVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TiberiumWars => "TW",
            Self::KanesWrath => "KW",
            Self::RedAlert3 => "RA3",
        }
    }
}

/// How to find the end of a record for one opcode.
///
/// Positive fixed lengths and scan offsets include the opcode and player-slot
/// bytes as well as the trailing terminator, matching how the lengths were
/// originally tabulated from observed replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRule {
    /// The whole record is exactly this many bytes.
    Fixed(u16),
    /// Variable length: scan starts `min` bytes into the record and steps
    /// whole coordinate groups, so a data byte equal to the terminator does
    /// not end the record early.
    Scan { min: u16 },
    /// Plain scan to the next terminator byte. Also the fallback for opcodes
    /// we have no rule for.
    Crawl,
    /// Fixed head, a 1-byte count, `per * count` bytes, fixed tail. The tail
    /// includes the terminator.
    CountPrefixed { head: u8, per: u8, tail: u8 },
    /// Fixed head, a 1-byte count, `4 * count` bytes, fixed tail.
    WordGroups { head: u8, tail: u8 },
    /// Production queue records come in three sizes; which one is decided by
    /// peeking for the terminator.
    ProductionEither { short: u8, long: u8 },
    /// Targeted skill: the body byte at `count_at` is a target count and the
    /// body spans `4 * (count + 1) + base` bytes.
    TargetedSkill { count_at: u8, base: u8 },
}

/// What a record means once framed. Queue and hold layouts differ between the
/// Tiberium titles and RA3, so they get separate kinds rather than a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeKind {
    Queue,
    QueueRa3,
    Hold,
    HoldRa3,
    Sell,
    PowerToggle,
    Upgrade,
    Science,
    SkillXY,
    Skill2XY,
    SkillTargetless,
    SkillTarget,
    Deploy,
    PlaceStructure,
    Move,
    FormationMove,
    ReverseMove,
    Gg,
    /// Framed with a known rule but not decoded further.
    Opaque,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub rule: RecordRule,
    pub kind: OpcodeKind,
}

pub type CommandTable = HashMap<u8, OpcodeEntry>;

/// Cost data for one unit or building id. RA3 data sometimes carries an
/// observed build time next to the price; everything else derives the build
/// time from the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCost {
    Flat(u32),
    WithBuildTime { cost: u32, build_ticks: u32 },
}

impl UnitCost {
    /// The money spent, whichever form the entry takes.
    pub fn amount(&self) -> u32 {
        match self {
            Self::Flat(cost) => *cost,
            Self::WithBuildTime { cost, .. } => *cost,
        }
    }

    /// Ticks from production start to completion. Without an observed build
    /// time the estimate is `15 * (cost / 100) + 6`, which tracks the real
    /// games closely enough for timeline work.
    pub fn build_ticks(&self) -> u32 {
        match self {
            Self::WithBuildTime { build_ticks, .. } => *build_ticks,
            Self::Flat(cost) => 15 * (cost / 100) + 6,
        }
    }
}

/// The full table assembly for one variant. All maps are read-only once
/// built; ids missing from them fall back to hex display names upstream.
#[derive(Debug, Clone)]
pub struct GameTables {
    pub variant: GameVariant,
    /// Subtracted from `slot / 8` to turn a record's player-slot byte into a
    /// zero-based player id.
    pub player_slot_bias: i32,
    pub commands: CommandTable,
    /// Display names for units and buildings. One namespace, like the games
    /// themselves use.
    pub units: HashMap<UnitId, String>,
    pub powers: HashMap<u32, String>,
    pub upgrades: HashMap<u32, String>,
    pub sciences: HashMap<u32, String>,
    /// Costs for units and buildings, same namespace as `units`.
    pub unit_costs: HashMap<UnitId, UnitCost>,
    pub power_costs: HashMap<u32, u32>,
    pub upgrade_costs: HashMap<u32, u32>,
    /// Units that dock at an airfield. A multi-queue of these is 4, not 5:
    /// one pad stays occupied.
    pub airfield_units: HashSet<UnitId>,
    /// Structures (by id) that come with a free unit, and queued RA3 cores
    /// that unpack into one. Keyed by the id that triggers the freebie.
    pub free_units: HashMap<u32, UnitId>,
}

impl GameTables {
    /// An empty assembly for `variant` with the right slot bias. Framing
    /// falls back to crawling and every id resolves to its hex name. Tests
    /// build on this; real table data lives in `sage-tables`.
    pub fn bare(variant: GameVariant) -> Self {
        let player_slot_bias = match variant {
            GameVariant::TiberiumWars | GameVariant::KanesWrath => 3,
            GameVariant::RedAlert3 => 2,
        };

        Self {
            variant,
            player_slot_bias,
            commands: HashMap::new(),
            units: HashMap::new(),
            powers: HashMap::new(),
            upgrades: HashMap::new(),
            sciences: HashMap::new(),
            unit_costs: HashMap::new(),
            power_costs: HashMap::new(),
            upgrade_costs: HashMap::new(),
            airfield_units: HashSet::new(),
            free_units: HashMap::new(),
        }
    }
}
