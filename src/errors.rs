#[derive(Debug, PartialEq)]
pub enum ShiftXorError {
    NotEnoughStreams(usize),
    StreamLengthMismatch(usize, usize),
    EmptyStream,
    DegenerateOffset(i64),
    IncompleteCycle(i64, usize),

    InvalidDriveIndex(usize, usize),
    WrongSurvivorCount(usize, usize),
    NotEnoughParities(usize),
    DuplicateParityShift(i64),
    UnknownParityShift(i64),
    MissingPlainParity,
    PairRecoveryUnsupported(usize),
    ParityDigestMismatch(i64),
    RecoveredDriveDigestMismatch(usize),

    HeaderSerializationFailed(String),
    HeaderDeserializationFailed(String),
    ParityBlockSerializationFailed(String),
    ParityBlockDeserializationFailed(String),
}

impl std::fmt::Display for ShiftXorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShiftXorError::NotEnoughStreams(n) => write!(f, "need at least 2 streams, got {}", n),
            ShiftXorError::StreamLengthMismatch(expected, got) => write!(f, "stream length mismatch: expected {} words, got {}", expected, got),
            ShiftXorError::EmptyStream => write!(f, "streams must hold at least one word"),
            ShiftXorError::DegenerateOffset(offset) => write!(f, "offset {} is zero modulo stream length, cycle walk cannot make progress", offset),
            ShiftXorError::IncompleteCycle(offset, len) => write!(
                f,
                "offset {} is not coprime with stream length {}, a single anchor cannot reach every position",
                offset, len
            ),

            ShiftXorError::InvalidDriveIndex(index, num_drives) => write!(f, "invalid drive index: {} (num_drives: {})", index, num_drives),
            ShiftXorError::WrongSurvivorCount(expected, got) => write!(f, "expected {} surviving drives, got {}", expected, got),
            ShiftXorError::NotEnoughParities(n) => write!(f, "not enough parity streams in group: {}", n),
            ShiftXorError::DuplicateParityShift(shift) => write!(f, "duplicate shift multiplier in parity family: {}", shift),
            ShiftXorError::UnknownParityShift(shift) => write!(f, "group holds no parity stream for shift multiplier {}", shift),
            ShiftXorError::MissingPlainParity => write!(f, "single-drive recovery needs the shift-0 parity stream"),
            ShiftXorError::PairRecoveryUnsupported(num_drives) => {
                write!(f, "pair recovery is only defined for 2-drive groups (num_drives: {})", num_drives)
            }
            ShiftXorError::ParityDigestMismatch(shift) => write!(f, "parity stream for shift {} does not match its header digest", shift),
            ShiftXorError::RecoveredDriveDigestMismatch(index) => write!(f, "recovered drive {} does not match its header digest", index),

            ShiftXorError::HeaderSerializationFailed(err) => write!(f, "failed to serialize parity group header: {}", err),
            ShiftXorError::HeaderDeserializationFailed(err) => write!(f, "failed to deserialize parity group header: {}", err),
            ShiftXorError::ParityBlockSerializationFailed(err) => write!(f, "failed to serialize parity block: {}", err),
            ShiftXorError::ParityBlockDeserializationFailed(err) => write!(f, "failed to deserialize parity block: {}", err),
        }
    }
}

impl std::error::Error for ShiftXorError {}
