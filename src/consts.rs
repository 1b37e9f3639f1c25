/// Fixed configuration for `bincode` serialization and deserialization.
pub const SHIFTXOR_BINCODE_CONFIG: bincode::config::Configuration = bincode::config::standard();
