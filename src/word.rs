use serde::{Serialize, de::DeserializeOwned};
use std::{fmt::Debug, ops::BitXor};

/// The element type of a drive stream: a fixed-width unsigned integer under XOR.
///
/// The width is picked by the caller, per parity group, not by this crate; all
/// streams taking part in one operation must use the same `Word` type. `Default`
/// supplies the all-zero word (the XOR identity), and `update_digest` feeds the
/// word's little-endian bytes into a BLAKE3 hasher so streams of any width can
/// be committed to uniformly.
pub trait Word: Copy + Eq + Default + Debug + Send + Sync + BitXor<Output = Self> + Serialize + DeserializeOwned {
    /// Feeds this word's canonical (little-endian) byte encoding into `hasher`.
    fn update_digest(&self, hasher: &mut blake3::Hasher);
}

macro_rules! impl_word {
    ($($word_type:ty),+ $(,)?) => {
        $(
            impl Word for $word_type {
                fn update_digest(&self, hasher: &mut blake3::Hasher) {
                    hasher.update(&self.to_le_bytes());
                }
            }
        )+
    };
}

impl_word!(u8, u16, u32, u64, u128);

/// Computes the BLAKE3 digest of a word stream, over its little-endian byte encoding.
pub(crate) fn digest_stream<W: Word>(words: &[W]) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    words.iter().for_each(|word| word.update_digest(&mut hasher));
    hasher.finalize()
}
