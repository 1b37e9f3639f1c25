use crate::{errors::ShiftXorError, word::Word};

/// Greatest common divisor, plain Euclid. Caller ensures `a > 0 && b > 0`.
fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Regenerates a full word stream from its self-difference sequence and one anchor word.
///
/// `difference` must be the XOR of the lost stream `d` with a rotated copy of
/// itself, `difference == combine(&[d, rotate(d, offset)])`, as produced by
/// XOR-combining two parity family members over a 2-drive group. Starting from
/// position 0 with the known value `anchor` (`d[0]` by convention, fixed between
/// encoder and decoder), the walk repeatedly steps `pos -> (pos + offset) mod L`
/// and XOR-chains the difference value at the new position onto the running
/// value, filling one stream position per step.
///
/// A single anchor reaches every position exactly when the permutation induced
/// by `offset` is one cycle, i.e. when `gcd(offset, L) = 1`. Rather than
/// discovering a short cycle after a full pass, the coprimality check is done
/// up front and surfaced as an error; a partially correct stream is never
/// returned.
///
/// # Arguments
///
/// * `difference` - The self-difference sequence of the lost stream.
/// * `offset` - The rotation offset the difference was built with; any integer, reduced modulo `L`.
/// * `anchor` - The known word at position 0 of the lost stream.
///
/// # Returns
///
/// Returns a `Result` which is:
/// - `Ok(Vec<W>)` holding the regenerated stream.
/// - `Err(ShiftXorError::EmptyStream)` if `difference` is zero-length.
/// - `Err(ShiftXorError::DegenerateOffset)` if `offset` reduces to 0 modulo `L`.
/// - `Err(ShiftXorError::IncompleteCycle)` if `gcd(offset, L) != 1`.
pub fn reconstruct<W: Word>(difference: &[W], offset: i64, anchor: W) -> Result<Vec<W>, ShiftXorError> {
    let len = difference.len();
    if len == 0 {
        return Err(ShiftXorError::EmptyStream);
    }

    let step = offset.rem_euclid(len as i64) as usize;
    if step == 0 {
        return Err(ShiftXorError::DegenerateOffset(offset));
    }
    if gcd(step, len) != 1 {
        return Err(ShiftXorError::IncompleteCycle(offset, len));
    }

    let mut result = vec![W::default(); len];
    result[0] = anchor;

    let mut pos = 0;
    let mut value = anchor;
    for _ in 1..len {
        pos = (pos + step) % len;
        value = value ^ difference[pos];
        result[pos] = value;
    }

    // The coprimality check guarantees the cycle closes only after len steps.
    debug_assert_eq!((pos + step) % len, 0);

    Ok(result)
}
