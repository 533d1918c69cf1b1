use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// A production command referenced a unit with no cost on record.
    /// Unknown cost is not zero cost; the command is refused.
    #[error("No cost on record for {unit_name} (queued at time code {time_code})")]
    MissingUnitCost { unit_name: String, time_code: u32 },
}
