use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Unexpected end of data: wanted {wanted} more bytes, {available} left")]
    UnexpectedEof { wanted: usize, available: usize },

    #[error("Chunk at time code {time_code} declares {declared} data bytes but only {available} remain")]
    TruncatedChunk {
        time_code: u32,
        declared: usize,
        available: usize,
    },

    #[error("Record for opcode {opcode:#04x} runs past the end of its chunk")]
    RecordOverrun { opcode: u8 },

    #[error("Record for opcode {opcode:#04x} has no terminator")]
    UnterminatedRecord { opcode: u8 },

    #[error("Chunk declares {declared} commands but {framed} were framed")]
    CommandCountMismatch { declared: u32, framed: usize },
}
