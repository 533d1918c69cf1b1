//! Chunk layer of the replay body.
//!
//! A replay body is a flat run of chunks, each stamped with the tick it was
//! recorded on. Only command chunks get decoded further; everything else is
//! carried through with its raw payload so callers can still see it.

use crate::command::Command;
use crate::config::GameTables;
use crate::decode::decode_record;
use crate::errors::ReplayError;
use crate::framer::{split_records, RawRecord, TERMINATOR};
use crate::reader::ByteCursor;
use crate::{Log, Result};

/// Sentinel time code that closes the body. Anything after it is ignored.
pub const END_OF_REPLAY: u32 = 0x7FFF_FFFF;

/// What a chunk carries, from the kind byte in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Player commands, the part we actually decode.
    Commands,

    /// Camera movement. Present in most bodies, opaque to us.
    Camera,

    /// Anything else, with the kind byte preserved.
    Other(u8),
}

impl ChunkKind {
    fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Commands,
            2 => Self::Camera,
            other => Self::Other(other),
        }
    }
}

/// One chunk as it sits in the stream, payload borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    /// Tick the chunk was recorded on.
    pub time_code: u32,

    pub kind: ChunkKind,

    pub data: &'a [u8],
}

/// One chunk of a parsed body, with its commands decoded.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Tick the chunk was recorded on.
    pub time_code: u32,

    pub kind: ChunkKind,

    /// Raw chunk payload, kept for the kinds we don't decode.
    pub data: Vec<u8>,

    /// Decoded commands. Empty for anything but a clean command chunk.
    pub commands: Vec<Command>,
}

/// Walks the chunk layer of a body, one chunk per call.
///
/// The reader stops for good at the sentinel time code; whatever trails it
/// in the file is not chunk data and is never touched.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    cursor: ByteCursor<'a>,
    finished: bool,
    chunks_read: usize,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            finished: false,
            chunks_read: 0,
        }
    }

    /// Reads the next chunk, or `None` once the sentinel is reached. The
    /// sentinel is consumed from the stream but never surfaces as a chunk.
    pub fn next_chunk(&mut self) -> Result<Option<RawChunk<'a>>> {
        if self.finished {
            return Ok(None);
        }

        let time_code = self.cursor.read_u32()?;
        if time_code == END_OF_REPLAY {
            self.finished = true;
            return Ok(None);
        }

        let kind_byte = self.cursor.read_u8()?;
        let size = self.cursor.read_u32()? as usize;
        if self.cursor.remaining() < size {
            return Err(ReplayError::TruncatedChunk {
                time_code,
                declared: size,
                available: self.cursor.remaining(),
            });
        }
        let data = self.cursor.read_bytes(size)?;

        // Every chunk ends with four bytes nobody has identified.
        self.cursor.skip(4)?;

        self.chunks_read += 1;
        Ok(Some(RawChunk {
            time_code,
            kind: ChunkKind::from_byte(kind_byte),
            data,
        }))
    }

    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    /// Converts into a chunk iterator.
    pub fn chunks(self) -> ChunkIter<'a> {
        ChunkIter { reader: self, done: false }
    }
}

/// Iterator adapter over the chunks of a body.
#[derive(Debug)]
pub struct ChunkIter<'a> {
    reader: ChunkReader<'a>,
    done: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<RawChunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(error) => {
                self.done = true;
                Some(Err(error))
            },
        }
    }
}

/// Tallies from a parse, mostly so callers can report how much of a damaged
/// body was salvageable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub chunks: usize,
    pub command_chunks: usize,

    /// Command chunks whose payload was not terminator-closed.
    pub skipped_chunks: usize,

    /// Command chunks discarded because their records did not frame cleanly.
    pub mismatched_chunks: usize,

    pub commands: usize,

    /// Commands dropped later by [`ReplayBody::discard_invalid_players`].
    pub dropped_commands: usize,
}

/// A fully parsed replay body.
#[derive(Debug, Clone)]
pub struct ReplayBody {
    pub chunks: Vec<Chunk>,
    pub stats: ParseStats,
}

impl ReplayBody {
    /// Parses a body stream, decoding command chunks with the given tables.
    ///
    /// Damaged command chunks are dropped whole and tallied in
    /// [`ParseStats`]; a partially decoded chunk would leave downstream
    /// consumers with a command count that lies. Structural damage to the
    /// chunk layer itself is an error, since nothing after it can be framed.
    pub fn parse(data: &[u8], tables: &GameTables) -> Result<Self> {
        let mut reader = ChunkReader::new(data);
        let mut chunks = Vec::new();
        let mut stats = ParseStats::default();

        while let Some(raw) = reader.next_chunk()? {
            stats.chunks += 1;

            let commands = match raw.kind {
                ChunkKind::Commands => {
                    stats.command_chunks += 1;
                    decode_command_chunk(raw.time_code, raw.data, tables, &mut stats)
                },
                _ => Vec::new(),
            };
            stats.commands += commands.len();

            chunks.push(Chunk {
                time_code: raw.time_code,
                kind: raw.kind,
                data: raw.data.to_vec(),
                commands,
            });
        }

        tracing::info!(
            target: Log::Replay,
            chunks = stats.chunks,
            commands = stats.commands,
            "Parsed replay body"
        );

        Ok(Self { chunks, stats })
    }

    /// Iterates every decoded command in recording order.
    ///
    /// The iterator only borrows the body, so analysis passes can take a
    /// fresh one as often as they like.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.chunks.iter().flat_map(|chunk| chunk.commands.iter())
    }

    /// Time code of the last chunk of any kind, in ticks.
    pub fn end_time(&self) -> u32 {
        self.chunks.last().map(|chunk| chunk.time_code).unwrap_or(0)
    }

    /// Drops commands whose player id falls outside `0..player_count`.
    ///
    /// Observer slots and damaged records both produce these, and anything
    /// downstream that keys per-player storage by id would misattribute
    /// them.
    pub fn discard_invalid_players(&mut self, player_count: usize) {
        let mut dropped = 0;
        for chunk in &mut self.chunks {
            chunk.commands.retain(|command| {
                let keep = command.player_id >= 0 && (command.player_id as usize) < player_count;
                if !keep {
                    dropped += 1;
                }
                keep
            });
        }

        if dropped > 0 {
            tracing::warn!(target: Log::Replay, dropped, "Dropped commands from out-of-range player slots");
            self.stats.dropped_commands += dropped;
        }
    }
}

fn decode_command_chunk(time_code: u32, data: &[u8], tables: &GameTables, stats: &mut ParseStats) -> Vec<Command> {
    let marker = data.first().copied().expect("Command chunk with no payload");
    assert_eq!(marker, 1, "Command chunk marker byte should be 1, found {marker}");

    if data.last() != Some(&TERMINATOR) {
        tracing::debug!(target: Log::Replay, time_code, "Command chunk is not terminator-closed, skipping");
        stats.skipped_chunks += 1;
        return Vec::new();
    }

    match frame_chunk_records(data, tables) {
        Ok(records) => records
            .iter()
            .map(|record| decode_record(record, time_code, tables))
            .collect(),
        Err(error) => {
            tracing::warn!(
                target: Log::Replay,
                time_code,
                ?error,
                "Discarding command chunk that did not frame cleanly"
            );
            stats.mismatched_chunks += 1;
            Vec::new()
        },
    }
}

fn frame_chunk_records<'a>(data: &'a [u8], tables: &GameTables) -> Result<Vec<RawRecord<'a>>> {
    let mut cursor = ByteCursor::new(data);
    cursor.skip(1)?;
    let declared = cursor.read_u32()?;
    let len = cursor.remaining();
    let payload = cursor.read_bytes(len)?;
    split_records(payload, declared, &tables.commands)
}
