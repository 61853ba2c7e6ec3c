// Caller-facing error taxonomy.
//
// The simulation has no I/O, so the only recoverable failures are bad input
// from outside the sim: a config that fails to parse or validate, and input
// events that name a face the mesh does not have. Both surface as `SimError`.
//
// Internal invariant violations (placing a sheep on an occupied slot, reading
// a flocking point that must exist) are not represented here. They panic via
// `assert!` at the point of violation, because continuing would corrupt the
// slot-occupancy bookkeeping. "Nothing to do" outcomes (no free face for a
// spawn, no improving move) are plain `Option`/`bool` returns.

use crate::types::FaceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("config JSON did not parse: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("{face} is out of range (mesh has {face_count} faces)")]
    FaceOutOfRange { face: FaceId, face_count: usize },
}

pub type SimResult<T> = Result<T, SimError>;
