//! Decoding for the replay command streams of the late-2000s SAGE RTS
//! titles: Tiberium Wars, Kane's Wrath and Red Alert 3.
//!
//! The body of a replay is the game's own network command log, so "parsing"
//! here means reconstructing what each player did tick by tick. The three
//! games share a chunk container but differ in opcode numbering, record
//! layout and even how a player leaving the game is written down; everything
//! variant-specific is injected through [`GameTables`] rather than baked in,
//! and the community-maintained tables live in a separate crate.
//!
//! Commands this crate can't interpret are framed, counted and carried as
//! [`CommandBody::Unresolved`] instead of being dropped, since frame
//! boundaries must stay exact for the rest of a chunk to decode.

mod chunk;
mod command;
mod config;
mod decode;
mod errors;
mod framer;
mod reader;

pub use chunk::{Chunk, ChunkIter, ChunkKind, ChunkReader, ParseStats, RawChunk, ReplayBody, END_OF_REPLAY};
pub use command::{Command, CommandBody, Position};
pub use config::{CommandTable, GameTables, GameVariant, OpcodeEntry, OpcodeKind, RecordRule, UnitCost, UnitId};
pub use errors::ReplayError;

pub(crate) type Result<T> = std::result::Result<T, ReplayError>;

/// Game logic ticks per wall-clock second, common to all three titles.
pub const TICKS_PER_SECOND: u32 = 15;

/// `target` values for the tracing calls in this crate and the crates built
/// on it, so a frontend can filter logs per area.
#[derive(Debug)]
pub struct Log;

#[allow(non_upper_case_globals)]
impl Log {
    pub const Replay: &'static str = "sage_replay";
    pub const Sim: &'static str = "sage_prodsim";
    pub const Analysis: &'static str = "sage_analysis";
}

/// Renders a tick count as `h:mm:ss` wall time.
pub fn format_time_code(time_code: u32) -> String {
    let seconds = time_code / TICKS_PER_SECOND;
    format!("{}:{:02}:{:02}", seconds / 3600, seconds % 3600 / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_code() {
        assert_eq!(format_time_code(0), "0:00:00");
        assert_eq!(format_time_code(449), "0:00:29");
        assert_eq!(format_time_code(15 * 3672), "1:01:12");
    }
}
