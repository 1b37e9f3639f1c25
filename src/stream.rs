use crate::{errors::ShiftXorError, word::Word};

/// Checks that `streams` is a well-formed parity group input: at least two
/// streams, none empty, all of the same length. Every public operation taking
/// a stream group validates through this before touching any data.
pub(crate) fn ensure_well_formed_group<W: Word, S: AsRef<[W]>>(streams: &[S]) -> Result<usize, ShiftXorError> {
    if streams.len() < 2 {
        return Err(ShiftXorError::NotEnoughStreams(streams.len()));
    }

    let expected_len = streams[0].as_ref().len();
    if expected_len == 0 {
        return Err(ShiftXorError::EmptyStream);
    }

    for stream in &streams[1..] {
        let len = stream.as_ref().len();
        if len != expected_len {
            return Err(ShiftXorError::StreamLengthMismatch(expected_len, len));
        }
    }

    Ok(expected_len)
}

/// XORs `src` into `acc`, element-wise. Caller must ensure equal lengths.
pub(crate) fn xor_into<W: Word>(acc: &mut [W], src: &[W]) {
    debug_assert_eq!(acc.len(), src.len());

    acc.iter_mut().zip(src.iter()).for_each(|(a, &s)| *a = *a ^ s);
}

/// XOR-combines two or more equal-length word streams into one.
///
/// XOR over fixed-width words is associative, commutative and self-inverse, so
/// the order of `streams` does not affect the result and `combine(&[s, s])` is
/// the all-zero stream. This cancellation is what every recovery path in this
/// crate is built on.
///
/// # Arguments
///
/// * `streams` - Two or more word streams of identical, non-zero length.
///
/// # Returns
///
/// Returns a `Result` which is:
/// - `Ok(Vec<W>)` holding the element-wise XOR of all input streams.
/// - `Err(ShiftXorError::NotEnoughStreams)` if fewer than 2 streams are given.
/// - `Err(ShiftXorError::EmptyStream)` if the streams are zero-length.
/// - `Err(ShiftXorError::StreamLengthMismatch)` if any stream's length differs from the first.
pub fn combine<W: Word, S: AsRef<[W]>>(streams: &[S]) -> Result<Vec<W>, ShiftXorError> {
    ensure_well_formed_group(streams)?;

    let mut result = streams[0].as_ref().to_vec();
    for stream in &streams[1..] {
        xor_into(&mut result, stream.as_ref());
    }

    Ok(result)
}

/// Cyclically rotates a word stream by `amount` positions.
///
/// `result[i] = stream[(i - amount) mod L]`, with Euclidean modulo, so `amount`
/// may be any integer: positive amounts move words towards higher indices,
/// negative towards lower, and `amount = 0` (or any multiple of `L`) is the
/// identity. Rotation amounts compose additively: rotating by `a` then by `b`
/// equals rotating once by `a + b`.
///
/// # Arguments
///
/// * `stream` - The word stream to rotate; must be non-empty.
/// * `amount` - Rotation offset, reduced modulo the stream length internally.
///
/// # Returns
///
/// Returns a `Result` which is:
/// - `Ok(Vec<W>)` holding the rotated stream.
/// - `Err(ShiftXorError::EmptyStream)` if `stream` is zero-length.
pub fn rotate<W: Word>(stream: &[W], amount: i64) -> Result<Vec<W>, ShiftXorError> {
    let len = stream.len();
    if len == 0 {
        return Err(ShiftXorError::EmptyStream);
    }

    // result[i] = stream[(i - amount) mod len]; precomputing the reduced
    // amount keeps all per-element index math in unsigned space.
    let reduced = amount.rem_euclid(len as i64) as usize;
    let result = (0..len).map(|i| stream[(i + len - reduced) % len]).collect();

    Ok(result)
}
