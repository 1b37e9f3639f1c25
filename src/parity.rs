use crate::{
    errors::ShiftXorError,
    stream::{ensure_well_formed_group, rotate, xor_into},
    word::Word,
};

/// Encodes one member of the cyclic-shift parity family over an ordered drive group.
///
/// Each drive at index `i` is cyclically rotated by `-(i * shift)` positions and
/// the rotated streams are XOR-combined into one parity stream. Drive 0 always
/// enters unrotated, whatever the shift multiplier, which makes it the common
/// term across the whole parity family for a fixed drive set: XOR-combining two
/// parities with different multipliers cancels drive 0 and leaves a difference
/// sequence relating the remaining drives to rotated copies of themselves.
///
/// `shift = 0` rotates nothing and degenerates to plain cross-drive XOR parity
/// (RAID-4/5); any single missing drive is then recoverable by XOR-combining
/// the parity with all surviving drives.
///
/// # Arguments
///
/// * `drives` - Two or more drive streams of identical, non-zero length, ordered by drive index.
/// * `shift` - The shift multiplier selecting the parity family member.
///
/// # Returns
///
/// Returns a `Result` which is:
/// - `Ok(Vec<W>)` holding the parity stream, shaped like one drive stream.
/// - `Err(ShiftXorError::NotEnoughStreams)` if fewer than 2 drives are given.
/// - `Err(ShiftXorError::EmptyStream)` if the drive streams are zero-length.
/// - `Err(ShiftXorError::StreamLengthMismatch)` if any drive's length differs from the first.
pub fn encode<W: Word, S: AsRef<[W]>>(drives: &[S], shift: i64) -> Result<Vec<W>, ShiftXorError> {
    let len = ensure_well_formed_group(drives)?;

    let mut parity = vec![W::default(); len];
    for (index, drive) in drives.iter().enumerate() {
        // The index-multiplier product is taken in i128 and reduced modulo the
        // stream length before negation, so extreme multipliers cannot overflow.
        let rotation = (index as i128 * shift as i128).rem_euclid(len as i128) as i64;
        let rotated = rotate(drive.as_ref(), -rotation)?;
        xor_into(&mut parity, &rotated);
    }

    Ok(parity)
}
