//! The decoded command model. One [`Command`] per framed record, with a
//! [`CommandBody`] variant carrying only the fields that kind of record
//! actually has.

use std::fmt;

use crate::UnitCost;
use crate::UnitId;

/// A map position, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// Inherited from the owning chunk.
    pub time_code: u32,
    /// Zero-based player id derived from the record's slot byte. May be out
    /// of range until the caller validates against the real player count.
    pub player_id: i32,
    pub opcode: u8,
    pub body: CommandBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommandBody {
    /// Queue `count` units of one type at a factory.
    Queue {
        factory: u32,
        unit: UnitId,
        unit_name: String,
        count: u8,
        /// `None` means the tables have no entry. Unknown is not free.
        cost: Option<UnitCost>,
    },
    /// Hold (or, pressed again, cancel) a queued type at a factory.
    Hold {
        factory: u32,
        unit: UnitId,
        unit_name: String,
        cancel_all: bool,
    },
    Sell {
        target: u32,
    },
    PowerToggle {
        target: u32,
    },
    Upgrade {
        upgrade: u32,
        name: String,
        cost: u32,
    },
    /// RA3 top-secret-protocol pick.
    Science {
        science: u32,
        name: String,
    },
    SkillXY {
        power: u32,
        name: String,
        cost: u32,
        at: Position,
    },
    Skill2XY {
        power: u32,
        name: String,
        cost: u32,
        from: Position,
        to: Position,
    },
    SkillTargetless {
        power: u32,
        name: String,
        cost: u32,
    },
    SkillTarget {
        power: u32,
        name: String,
        cost: u32,
    },
    /// RA3 MCV / core unpack.
    Deploy {
        name: String,
        at: Position,
        orientation: f32,
    },
    PlaceStructure {
        building: u32,
        name: String,
        /// `None` when the tables have no entry for the building.
        cost: Option<UnitCost>,
        /// Unit granted for free with the structure, already name-resolved.
        free_unit: Option<(UnitId, String)>,
        substructures: Vec<Position>,
    },
    Move {
        at: Position,
    },
    FormationMove {
        at: Position,
    },
    ReverseMove {
        at: Position,
    },
    /// Good game. `target` is the slot byte of whoever is being saluted.
    Gg {
        target: u8,
    },
    /// Player left the game, by whichever record shape said so.
    EndOfGame {
        target: i32,
    },
    /// Opcode we have no decoder for. The raw body is kept for inspection.
    Unresolved {
        raw: Vec<u8>,
    },
}

impl Command {
    /// Whether this command belongs in a build-order timeline. Movement spam
    /// and undecoded records don't.
    pub fn is_build_order(&self) -> bool {
        !matches!(
            self.body,
            CommandBody::Move { .. }
                | CommandBody::FormationMove { .. }
                | CommandBody::ReverseMove { .. }
                | CommandBody::Unresolved { .. }
        )
    }

}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            CommandBody::Queue { unit_name, count, .. } => write!(f, "Queue {count}x {unit_name}"),
            CommandBody::Hold { unit_name, .. } => write!(f, "Hold/Cancel {unit_name}"),
            CommandBody::Sell { .. } => write!(f, "Sell"),
            CommandBody::PowerToggle { .. } => write!(f, "Power down building"),
            CommandBody::Upgrade { name, .. } => write!(f, "{name}"),
            CommandBody::Science { name, .. } => write!(f, "Select {name}"),
            CommandBody::SkillXY { name, .. }
            | CommandBody::Skill2XY { name, .. }
            | CommandBody::SkillTargetless { name, .. }
            | CommandBody::SkillTarget { name, .. } => write!(f, "{name}"),
            CommandBody::Deploy { name, .. } => write!(f, "{name}"),
            CommandBody::PlaceStructure { name, .. } => write!(f, "{name}"),
            CommandBody::Move { at } => write!(f, "Move to ({:.1}, {:.1})", at.x, at.y),
            CommandBody::FormationMove { at } => write!(f, "Formation move to ({:.1}, {:.1})", at.x, at.y),
            CommandBody::ReverseMove { at } => write!(f, "Reverse move to ({:.1}, {:.1})", at.x, at.y),
            CommandBody::Gg { target } => write!(f, "GG {target}"),
            CommandBody::EndOfGame { .. } => write!(f, "End of game"),
            CommandBody::Unresolved { .. } => write!(f, "Unknown Command"),
        }
    }
}
