use crate::{
    consts::SHIFTXOR_BINCODE_CONFIG,
    errors::ShiftXorError,
    parity::encode,
    reconstruct::reconstruct,
    stream::{combine, ensure_well_formed_group, rotate},
    word::{Word, digest_stream},
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One encoded member of a parity family: a parity stream tagged with the
/// shift multiplier it was encoded under.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ParityBlock<W> {
    shift: i64,
    words: Vec<W>,
}

impl<W: Word> ParityBlock<W> {
    pub(crate) fn new(shift: i64, words: Vec<W>) -> Self {
        ParityBlock { shift, words }
    }

    /// Returns the shift multiplier this parity stream was encoded under.
    pub fn get_shift(&self) -> i64 {
        self.shift
    }

    /// Returns the parity stream itself, shaped like one drive stream.
    pub fn get_words(&self) -> &[W] {
        &self.words
    }

    /// Computes the BLAKE3 digest of the parity stream.
    pub fn digest(&self) -> blake3::Hash {
        digest_stream(&self.words)
    }

    /// Serializes the `ParityBlock` into a vector of bytes using `bincode`.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok(Vec<u8>)` containing the serialized bytes if successful.
    /// - `Err(ShiftXorError::ParityBlockSerializationFailed)` if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ShiftXorError> {
        bincode::serde::encode_to_vec(self, SHIFTXOR_BINCODE_CONFIG).map_err(|err| ShiftXorError::ParityBlockSerializationFailed(err.to_string()))
    }

    /// Deserializes a `ParityBlock` from a byte slice using `bincode`.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The byte slice from which to deserialize the parity block.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok((Self, usize))` containing the deserialized `ParityBlock` and the number of bytes read if successful.
    /// - `Err(ShiftXorError::ParityBlockDeserializationFailed)` if deserialization fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), ShiftXorError> {
        bincode::serde::decode_from_slice::<ParityBlock<W>, bincode::config::Configuration>(bytes, SHIFTXOR_BINCODE_CONFIG)
            .map_err(|err| ShiftXorError::ParityBlockDeserializationFailed(err.to_string()))
    }
}

/// Describes a parity group: how many drives it covers, the stream length,
/// which parity family members were encoded, and a BLAKE3 commitment to every
/// drive and parity stream. The header is what the storage layer persists next
/// to the parity blocks; recovery validates everything it touches against it.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ParityGroupHeader {
    num_drives: usize,
    stream_len: usize,
    shifts: Vec<i64>,
    drive_digests: Vec<blake3::Hash>,
    parity_digests: Vec<blake3::Hash>,
}

impl ParityGroupHeader {
    pub fn get_num_drives(&self) -> usize {
        self.num_drives
    }

    pub fn get_stream_len(&self) -> usize {
        self.stream_len
    }

    pub fn get_shifts(&self) -> &[i64] {
        &self.shifts
    }

    pub fn get_drive_digest(&self, drive_index: usize) -> Result<blake3::Hash, ShiftXorError> {
        self.drive_digests
            .get(drive_index)
            .copied()
            .ok_or(ShiftXorError::InvalidDriveIndex(drive_index, self.num_drives))
    }

    /// Checks a recovered (or re-read) drive stream against its commitment.
    pub fn validate_drive<W: Word>(&self, drive_index: usize, words: &[W]) -> Result<bool, ShiftXorError> {
        Ok(digest_stream(words) == self.get_drive_digest(drive_index)?)
    }

    /// Checks a parity block against the commitment recorded for its shift.
    pub fn validate_parity<W: Word>(&self, parity: &ParityBlock<W>) -> bool {
        match self.shifts.iter().position(|&shift| shift == parity.get_shift()) {
            Some(idx) => self.parity_digests[idx] == parity.digest(),
            None => false,
        }
    }

    /// Serializes the `ParityGroupHeader` into a vector of bytes using `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ShiftXorError> {
        bincode::serde::encode_to_vec(self, SHIFTXOR_BINCODE_CONFIG).map_err(|err| ShiftXorError::HeaderSerializationFailed(err.to_string()))
    }

    /// Deserializes a `ParityGroupHeader` from a byte slice using `bincode`,
    /// rejecting headers whose internal counts are inconsistent.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), ShiftXorError> {
        match bincode::serde::decode_from_slice::<ParityGroupHeader, bincode::config::Configuration>(bytes, SHIFTXOR_BINCODE_CONFIG) {
            Ok((header, n)) => {
                if header.stream_len == 0 {
                    return Err(ShiftXorError::HeaderDeserializationFailed(
                        "stream length must be at least one word".to_string(),
                    ));
                }
                if header.drive_digests.len() != header.num_drives {
                    return Err(ShiftXorError::HeaderDeserializationFailed(
                        "number of drives and drive digests do not match".to_string(),
                    ));
                }
                if header.parity_digests.len() != header.shifts.len() {
                    return Err(ShiftXorError::HeaderDeserializationFailed(
                        "number of shifts and parity digests do not match".to_string(),
                    ));
                }

                Ok((header, n))
            }
            Err(err) => Err(ShiftXorError::HeaderDeserializationFailed(err.to_string())),
        }
    }
}

/// A parity family over one drive group: the header plus one `ParityBlock`
/// per shift multiplier.
///
/// Built either from the drive streams themselves at write time (`new`), or
/// re-assembled at recovery time from a persisted header and whatever parity
/// blocks the storage layer could still fetch (`from_parts`).
#[derive(Clone, Debug, PartialEq)]
pub struct ParityGroup<W> {
    header: ParityGroupHeader,
    parities: Vec<ParityBlock<W>>,
}

impl<W: Word> ParityGroup<W> {
    /// Encodes the full parity family for `drives`, one parity stream per
    /// entry in `shifts`, in parallel across family members.
    ///
    /// # Arguments
    ///
    /// * `drives` - Two or more drive streams of identical, non-zero length, ordered by drive index.
    /// * `shifts` - The shift multipliers to encode; must be non-empty and distinct.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok(ParityGroup)` holding the header and all encoded parity blocks.
    /// - `Err(ShiftXorError::NotEnoughParities)` if `shifts` is empty.
    /// - `Err(ShiftXorError::DuplicateParityShift)` if a shift multiplier repeats.
    /// - `Err(_)` with the respective validation error from `encode` for malformed drive groups.
    pub fn new(drives: &[Vec<W>], shifts: &[i64]) -> Result<Self, ShiftXorError> {
        let stream_len = ensure_well_formed_group(drives)?;

        if shifts.is_empty() {
            return Err(ShiftXorError::NotEnoughParities(0));
        }
        if let Some(&duplicate) = shifts.iter().enumerate().find_map(|(i, shift)| shifts[..i].contains(shift).then_some(shift)) {
            return Err(ShiftXorError::DuplicateParityShift(duplicate));
        }

        let parities = shifts
            .par_iter()
            .map(|&shift| encode(drives, shift).map(|words| ParityBlock::new(shift, words)))
            .collect::<Result<Vec<ParityBlock<W>>, ShiftXorError>>()?;

        Ok(ParityGroup {
            header: ParityGroupHeader {
                num_drives: drives.len(),
                stream_len,
                shifts: shifts.to_vec(),
                drive_digests: drives.iter().map(|drive| digest_stream(drive)).collect(),
                parity_digests: parities.iter().map(|parity| parity.digest()).collect(),
            },
            parities,
        })
    }

    /// Re-assembles a parity group from a persisted header and fetched parity
    /// blocks, validating each block against its header commitment.
    ///
    /// The blocks may arrive in any order and need not cover the whole family;
    /// recovery operations fail later if the member they need is missing.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok(ParityGroup)` if every supplied block matches its commitment.
    /// - `Err(ShiftXorError::UnknownParityShift)` if a block's shift is not in the header.
    /// - `Err(ShiftXorError::ParityDigestMismatch)` if a block does not match its commitment.
    /// - `Err(ShiftXorError::StreamLengthMismatch)` if a block's length differs from the header's.
    pub fn from_parts(header: ParityGroupHeader, parities: Vec<ParityBlock<W>>) -> Result<Self, ShiftXorError> {
        for parity in &parities {
            if !header.shifts.contains(&parity.get_shift()) {
                return Err(ShiftXorError::UnknownParityShift(parity.get_shift()));
            }
            if parity.get_words().len() != header.stream_len {
                return Err(ShiftXorError::StreamLengthMismatch(header.stream_len, parity.get_words().len()));
            }
            if !header.validate_parity(parity) {
                return Err(ShiftXorError::ParityDigestMismatch(parity.get_shift()));
            }
        }

        Ok(ParityGroup { header, parities })
    }

    pub fn get_header(&self) -> &ParityGroupHeader {
        &self.header
    }

    /// Looks up the parity block encoded under `shift`.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok(&ParityBlock)` if the group holds that family member.
    /// - `Err(ShiftXorError::UnknownParityShift)` otherwise.
    pub fn get_parity(&self, shift: i64) -> Result<&ParityBlock<W>, ShiftXorError> {
        self.parities
            .iter()
            .find(|parity| parity.get_shift() == shift)
            .ok_or(ShiftXorError::UnknownParityShift(shift))
    }

    /// Recovers a single lost drive from the plain (shift 0) parity and all
    /// surviving drives, then checks the result against the header commitment.
    ///
    /// # Arguments
    ///
    /// * `missing_index` - Index of the lost drive within the group.
    /// * `survivors` - The other `num_drives - 1` drive streams, in any order.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok(Vec<W>)` holding the recovered drive stream.
    /// - `Err(ShiftXorError::InvalidDriveIndex)` if `missing_index` is out of bounds.
    /// - `Err(ShiftXorError::MissingPlainParity)` if the group holds no shift-0 parity.
    /// - `Err(ShiftXorError::WrongSurvivorCount)` if not exactly `num_drives - 1` survivors are given.
    /// - `Err(ShiftXorError::RecoveredDriveDigestMismatch)` if the recovered stream fails verification,
    ///   meaning a survivor or the parity itself was corrupted.
    pub fn recover_drive(&self, missing_index: usize, survivors: &[Vec<W>]) -> Result<Vec<W>, ShiftXorError> {
        if missing_index >= self.header.num_drives {
            return Err(ShiftXorError::InvalidDriveIndex(missing_index, self.header.num_drives));
        }

        let plain = self.get_parity(0).map_err(|_| ShiftXorError::MissingPlainParity)?;
        let expected_survivors = self.header.num_drives - 1;
        if survivors.len() != expected_survivors {
            return Err(ShiftXorError::WrongSurvivorCount(expected_survivors, survivors.len()));
        }

        let mut streams = vec![plain.get_words()];
        streams.extend(survivors.iter().map(|survivor| survivor.as_slice()));

        let recovered = combine(&streams)?;
        if !self.header.validate_drive(missing_index, &recovered)? {
            return Err(ShiftXorError::RecoveredDriveDigestMismatch(missing_index));
        }

        Ok(recovered)
    }

    /// Recovers both drives of a 2-drive group from two parity family members
    /// and one anchor word, with no surviving drive data at all.
    ///
    /// For shifts `a` and `b`, XOR-combining the two parities cancels drive 0
    /// and leaves `rotate(d1, -a) XOR rotate(d1, -b)`; rotating that by `a`
    /// aligns it into the self-difference `d1 XOR rotate(d1, a - b)`, which the
    /// cycle walk regenerates from `anchor` (= `d1[0]`). Drive 0 then falls out
    /// of parity `a` by cancelling the rotated drive 1 back out. Both recovered
    /// streams are checked against their header commitments.
    ///
    /// The effective offset `a - b` must be coprime with the stream length;
    /// otherwise `ShiftXorError::IncompleteCycle` propagates and the caller
    /// must pick a different parity pair. Losses of two or more drives in
    /// larger groups are not solvable by this pairwise scheme and are rejected.
    ///
    /// # Arguments
    ///
    /// * `anchor` - The known first word of drive 1.
    ///
    /// # Returns
    ///
    /// Returns a `Result` which is:
    /// - `Ok([Vec<W>; 2])` holding the recovered drive 0 and drive 1 streams.
    /// - `Err(ShiftXorError::PairRecoveryUnsupported)` if the group covers more than 2 drives.
    /// - `Err(ShiftXorError::NotEnoughParities)` if the group holds fewer than 2 parity blocks.
    /// - `Err(ShiftXorError::DegenerateOffset)` / `Err(ShiftXorError::IncompleteCycle)` from the cycle walk.
    /// - `Err(ShiftXorError::RecoveredDriveDigestMismatch)` if a recovered stream fails verification.
    pub fn recover_drive_pair(&self, anchor: W) -> Result<[Vec<W>; 2], ShiftXorError> {
        if self.header.num_drives != 2 {
            return Err(ShiftXorError::PairRecoveryUnsupported(self.header.num_drives));
        }
        if self.parities.len() < 2 {
            return Err(ShiftXorError::NotEnoughParities(self.parities.len()));
        }

        let parity_a = &self.parities[0];
        let parity_b = &self.parities[1];
        let (a, b) = (parity_a.get_shift(), parity_b.get_shift());

        // Shifts only matter modulo the stream length; reducing up front (the
        // difference in i128) keeps opposite-extreme multipliers from
        // overflowing the subtraction or the later negation.
        let len = self.header.stream_len as i64;
        let a_reduced = a.rem_euclid(len);
        let offset = (a as i128 - b as i128).rem_euclid(len as i128) as i64;

        let difference = combine(&[parity_a.get_words(), parity_b.get_words()])?;
        let aligned = rotate(&difference, a_reduced)?;

        let drive1 = reconstruct(&aligned, offset, anchor)?;
        if !self.header.validate_drive(1, &drive1)? {
            return Err(ShiftXorError::RecoveredDriveDigestMismatch(1));
        }

        let rotated_drive1 = rotate(&drive1, -a_reduced)?;
        let drive0 = combine(&[parity_a.get_words(), rotated_drive1.as_slice()])?;
        if !self.header.validate_drive(0, &drive0)? {
            return Err(ShiftXorError::RecoveredDriveDigestMismatch(0));
        }

        Ok([drive0, drive1])
    }
}

#[cfg(test)]
mod tests {
    use super::{ParityBlock, ParityGroup, ParityGroupHeader};
    use crate::errors::ShiftXorError;
    use rand::Rng;

    fn random_drives(num_drives: usize, len: usize) -> Vec<Vec<u32>> {
        let mut rng = rand::rng();
        (0..num_drives).map(|_| (0..len).map(|_| rng.random()).collect()).collect()
    }

    #[test]
    fn prop_test_group_recovers_every_single_drive() {
        const NUM_TEST_ITERATIONS: usize = 10;
        const NUM_DRIVES: usize = 5;
        const STREAM_LEN: usize = 128;

        (0..NUM_TEST_ITERATIONS).for_each(|_| {
            let drives = random_drives(NUM_DRIVES, STREAM_LEN);
            let group = ParityGroup::new(&drives, &[0, 1, 2]).expect("Must be able to encode parity family");

            for missing in 0..NUM_DRIVES {
                let survivors = drives.iter().enumerate().filter(|&(i, _)| i != missing).map(|(_, d)| d.clone()).collect::<Vec<Vec<u32>>>();

                let recovered = group.recover_drive(missing, &survivors).expect("Must be able to recover a single lost drive");
                assert_eq!(recovered, drives[missing]);
            }
        });
    }

    #[test]
    fn prop_test_pair_recovery_regenerates_both_drives() {
        const NUM_TEST_ITERATIONS: usize = 10;
        const STREAM_LEN: usize = 101;

        (0..NUM_TEST_ITERATIONS).for_each(|_| {
            let drives = random_drives(2, STREAM_LEN);
            let group = ParityGroup::new(&drives, &[0, 1]).expect("Must be able to encode parity family");

            let [drive0, drive1] = group.recover_drive_pair(drives[1][0]).expect("Pair recovery must regenerate both drives");

            assert_eq!(drive0, drives[0]);
            assert_eq!(drive1, drives[1]);
        });
    }

    #[test]
    fn prop_test_pair_recovery_with_arbitrary_shift_pairs() {
        const NUM_TEST_ITERATIONS: usize = 10;
        const STREAM_LEN: usize = 101;

        let mut rng = rand::rng();

        (0..NUM_TEST_ITERATIONS).for_each(|_| {
            let drives = random_drives(2, STREAM_LEN);

            let a = rng.random_range(-50i64..=50);
            let offset = rng.random_range(1i64..STREAM_LEN as i64);
            let b = a - offset;

            // STREAM_LEN is prime, so any offset in 1..STREAM_LEN is coprime with it.
            let group = ParityGroup::new(&drives, &[a, b]).expect("Must be able to encode parity family");
            let [drive0, drive1] = group.recover_drive_pair(drives[1][0]).expect("Pair recovery must regenerate both drives");

            assert_eq!(drive0, drives[0]);
            assert_eq!(drive1, drives[1]);
        });
    }

    #[test]
    fn test_pair_recovery_rejects_non_coprime_shift_pair() {
        const STREAM_LEN: usize = 10;

        let drives = random_drives(2, STREAM_LEN);
        let group = ParityGroup::new(&drives, &[0, 2]).expect("Must be able to encode parity family");

        // The shift difference -2 reduces to 8, sharing a factor with 10.
        assert_eq!(group.recover_drive_pair(drives[1][0]), Err(ShiftXorError::IncompleteCycle(8, STREAM_LEN)));
    }

    #[test]
    fn test_pair_recovery_with_opposite_extreme_shifts() {
        const STREAM_LEN: usize = 11;

        let drives = random_drives(2, STREAM_LEN);
        let group = ParityGroup::new(&drives, &[i64::MAX, i64::MIN]).expect("Must be able to encode parity family");

        let [drive0, drive1] = group
            .recover_drive_pair(drives[1][0])
            .expect("Extreme shift multipliers must reduce cleanly modulo the stream length");

        assert_eq!(drive0, drives[0]);
        assert_eq!(drive1, drives[1]);
    }

    #[test]
    fn test_pair_recovery_detects_wrong_anchor() {
        const STREAM_LEN: usize = 16;

        let drives = random_drives(2, STREAM_LEN);
        let group = ParityGroup::new(&drives, &[0, 1]).expect("Must be able to encode parity family");

        // A wrong anchor XOR-chains through the whole walk; only the digest
        // check catches it.
        let wrong_anchor = drives[1][0] ^ 1;
        assert_eq!(
            group.recover_drive_pair(wrong_anchor),
            Err(ShiftXorError::RecoveredDriveDigestMismatch(1))
        );
    }

    #[test]
    fn test_pair_recovery_rejects_wider_groups_and_thin_families() {
        let wide = random_drives(3, 16);
        let group = ParityGroup::new(&wide, &[0, 1]).unwrap();
        assert_eq!(group.recover_drive_pair(wide[1][0]), Err(ShiftXorError::PairRecoveryUnsupported(3)));

        let narrow = random_drives(2, 16);
        let group = ParityGroup::new(&narrow, &[0]).unwrap();
        assert_eq!(group.recover_drive_pair(narrow[1][0]), Err(ShiftXorError::NotEnoughParities(1)));
    }

    #[test]
    fn test_group_construction_rejects_bad_shift_sets() {
        let drives = random_drives(2, 16);

        assert_eq!(ParityGroup::new(&drives, &[]).err(), Some(ShiftXorError::NotEnoughParities(0)));
        assert_eq!(ParityGroup::new(&drives, &[0, 1, 0]).err(), Some(ShiftXorError::DuplicateParityShift(0)));
    }

    #[test]
    fn test_recover_drive_validates_its_inputs() {
        let drives = random_drives(3, 16);
        let group = ParityGroup::new(&drives, &[0, 1]).unwrap();

        assert_eq!(group.recover_drive(3, &drives[..2].to_vec()).err(), Some(ShiftXorError::InvalidDriveIndex(3, 3)));
        assert_eq!(group.recover_drive(0, &drives[..1].to_vec()).err(), Some(ShiftXorError::WrongSurvivorCount(2, 1)));

        let shifted_only = ParityGroup::new(&drives, &[1, 2]).unwrap();
        assert_eq!(
            shifted_only.recover_drive(0, &drives[1..].to_vec()).err(),
            Some(ShiftXorError::MissingPlainParity)
        );
    }

    #[test]
    fn test_recover_drive_detects_corrupted_survivor() {
        let drives = random_drives(3, 16);
        let group = ParityGroup::new(&drives, &[0]).unwrap();

        let mut survivors = drives[1..].to_vec();
        survivors[0][7] ^= 1;

        assert_eq!(group.recover_drive(0, &survivors).err(), Some(ShiftXorError::RecoveredDriveDigestMismatch(0)));
    }

    #[test]
    fn test_header_and_parity_block_round_trip_through_bincode() {
        let drives = random_drives(2, 32);
        let group = ParityGroup::new(&drives, &[0, 1]).unwrap();

        let header_bytes = group.get_header().to_bytes().expect("Must be able to serialize header");
        let (header, n) = ParityGroupHeader::from_bytes(&header_bytes).expect("Must be able to deserialize header");
        assert_eq!(n, header_bytes.len());
        assert_eq!(&header, group.get_header());

        let parity = group.get_parity(1).expect("Group must hold the shift-1 parity");
        let parity_bytes = parity.to_bytes().expect("Must be able to serialize parity block");
        let (decoded, n) = ParityBlock::<u32>::from_bytes(&parity_bytes).expect("Must be able to deserialize parity block");
        assert_eq!(n, parity_bytes.len());
        assert_eq!(&decoded, parity);
    }

    #[test]
    fn test_header_decoding_rejects_inconsistent_headers() {
        let drives = random_drives(2, 8);
        let group = ParityGroup::new(&drives, &[0]).unwrap();

        let mut zero_len = group.get_header().clone();
        zero_len.stream_len = 0;
        let bytes = zero_len.to_bytes().unwrap();
        assert!(matches!(
            ParityGroupHeader::from_bytes(&bytes),
            Err(ShiftXorError::HeaderDeserializationFailed(_))
        ));

        let mut uneven = group.get_header().clone();
        uneven.drive_digests.pop();
        let bytes = uneven.to_bytes().unwrap();
        assert!(matches!(
            ParityGroupHeader::from_bytes(&bytes),
            Err(ShiftXorError::HeaderDeserializationFailed(_))
        ));
    }

    #[test]
    fn test_from_parts_validates_fetched_blocks() {
        let drives = random_drives(2, 32);
        let group = ParityGroup::new(&drives, &[0, 1]).unwrap();
        let header = group.get_header().clone();

        let blocks = vec![group.get_parity(0).unwrap().clone(), group.get_parity(1).unwrap().clone()];
        let reassembled = ParityGroup::from_parts(header.clone(), blocks).expect("Valid blocks must be accepted");
        let [drive0, drive1] = reassembled.recover_drive_pair(drives[1][0]).unwrap();
        assert_eq!([drive0, drive1], [drives[0].clone(), drives[1].clone()]);

        let mut tampered = group.get_parity(1).unwrap().clone();
        tampered.words[3] ^= 1;
        assert_eq!(
            ParityGroup::from_parts(header.clone(), vec![tampered]).err(),
            Some(ShiftXorError::ParityDigestMismatch(1))
        );

        let foreign = ParityBlock::new(7, vec![0u32; 32]);
        assert_eq!(
            ParityGroup::from_parts(header, vec![foreign]).err(),
            Some(ShiftXorError::UnknownParityShift(7))
        );
    }
}
