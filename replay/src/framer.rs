//! Splits a command chunk's payload into records.
//!
//! A record is `opcode, player-slot byte, body, 0xFF terminator`. How far the
//! body runs depends on the opcode: most are fixed-length, some scan for the
//! terminator with enough structure awareness not to trip over data bytes
//! that happen to be `0xFF`. See [`RecordRule`] for the full set of shapes.

use crate::config::{CommandTable, RecordRule};
use crate::{ReplayError, Result};

/// Record terminator and, at chunk scope, the final byte of any well-formed
/// command payload.
pub(crate) const TERMINATOR: u8 = 0xFF;

/// One framed record. The body excludes the opcode, the player-slot byte and
/// the terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub opcode: u8,
    pub player_slot: u8,
    pub body: &'a [u8],
    /// Total bytes the record spans in the payload, terminator included.
    pub raw_len: usize,
}

/// Splits `payload` (everything after the chunk's marker and declared count)
/// into records, or fails if the records don't line up with `declared`.
///
/// A partial split is never returned: on any failure the caller throws away
/// the whole chunk's commands and keeps going with the next chunk.
pub(crate) fn split_records<'a>(payload: &'a [u8], declared: u32, table: &CommandTable) -> Result<Vec<RawRecord<'a>>> {
    // The declared count comes straight off the wire and can't be trusted
    // for allocation; a record is at least 3 bytes, so the payload length
    // caps how many can really be in there.
    let mut records = Vec::with_capacity((declared as usize).min(payload.len() / 3));
    let mut pos = 0;

    while pos < payload.len() {
        let record = split_one(payload, pos, declared, table)?;
        pos += record.raw_len;
        records.push(record);
    }

    if records.len() != declared as usize {
        return Err(ReplayError::CommandCountMismatch {
            declared,
            framed: records.len(),
        });
    }

    Ok(records)
}

fn split_one<'a>(payload: &'a [u8], start: usize, declared: u32, table: &CommandTable) -> Result<RawRecord<'a>> {
    let opcode = payload[start];
    let overrun = || ReplayError::RecordOverrun { opcode };
    let player_slot = *payload.get(start + 1).ok_or_else(overrun)?;
    let rule = table.get(&opcode).map(|entry| entry.rule);

    // Records of unmapped opcodes crawl to their terminator, except that a
    // chunk declaring a single record owns the entire payload, stray 0xFF
    // data bytes and all. The chunk-level check already proved the final
    // byte is a terminator.
    if rule.is_none() && declared == 1 && start == 0 {
        return finish(payload, start, payload.len() - 1, opcode, player_slot);
    }

    let terminator_at = match rule.unwrap_or(RecordRule::Crawl) {
        RecordRule::Fixed(len) => start + len.max(3) as usize - 1,

        RecordRule::Scan { min } => {
            let mut pos = start + min as usize;
            loop {
                match payload.get(pos) {
                    None => return Err(ReplayError::UnterminatedRecord { opcode }),
                    Some(&TERMINATOR) => break pos,
                    Some(byte) => {
                        // Nested coordinate group: the high nibble is one
                        // less than the number of 4-byte words that follow.
                        let words = (byte >> 4) as usize + 1;
                        pos += 4 * words + 1;
                    },
                }
            }
        },

        RecordRule::Crawl => {
            let mut pos = start + 2;
            loop {
                match payload.get(pos) {
                    None => return Err(ReplayError::UnterminatedRecord { opcode }),
                    Some(&TERMINATOR) => break pos,
                    Some(_) => pos += 1,
                }
            }
        },

        RecordRule::CountPrefixed { head, per, tail } => {
            let count_pos = start + 2 + head as usize;
            let count = *payload.get(count_pos).ok_or_else(overrun)? as usize;
            count_pos + 1 + per as usize * count + tail as usize - 1
        },

        RecordRule::WordGroups { head, tail } => {
            let count_pos = start + 2 + head as usize;
            let count = *payload.get(count_pos).ok_or_else(overrun)? as usize;
            count_pos + 1 + 4 * count + tail as usize - 1
        },

        RecordRule::ProductionEither { short, long } => {
            let body = start + 2;
            if payload.get(body) == Some(&TERMINATOR) {
                body
            } else if payload.get(body + short as usize) == Some(&TERMINATOR) {
                body + short as usize
            } else {
                body + long as usize
            }
        },

        RecordRule::TargetedSkill { count_at, base } => {
            let count = *payload.get(start + 2 + count_at as usize).ok_or_else(overrun)? as usize;
            start + 2 + 4 * (count + 1) + base as usize
        },
    };

    finish(payload, start, terminator_at, opcode, player_slot)
}

fn finish<'a>(payload: &'a [u8], start: usize, terminator_at: usize, opcode: u8, player_slot: u8) -> Result<RawRecord<'a>> {
    if terminator_at < start + 2 || terminator_at >= payload.len() {
        return Err(ReplayError::RecordOverrun { opcode });
    }
    if payload[terminator_at] != TERMINATOR {
        return Err(ReplayError::UnterminatedRecord { opcode });
    }

    Ok(RawRecord {
        opcode,
        player_slot,
        body: &payload[start + 2..terminator_at],
        raw_len: terminator_at + 1 - start,
    })
}
