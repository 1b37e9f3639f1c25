//! # shiftxor: Cyclic-Shift XOR Parity for Drive Arrays
//!
//! `shiftxor` implements a family of XOR-based redundancy schemes over equal-length
//! word streams ("drives"), generalizing classic single-parity RAID-4/5 protection
//! into a set of shift-parameterized parities that can be combined to recover lost
//! drive data even when the plain parity alone is not enough.
//!
//! Every parity family member is produced by the same rule: each drive beyond
//! index 0 is cyclically rotated in proportion to its index and a shift multiplier,
//! then all drives are XOR-combined. Because drive 0 always enters unrotated,
//! XOR-combining two family members cancels it and leaves a *difference sequence*
//! relating one drive to a rotated copy of itself; a single known anchor word then
//! regenerates that whole drive by walking the rotation's permutation cycle.
//!
//! The core operations (`combine`, `rotate`, `encode`, `reconstruct`) are pure and
//! stateless: O(L) time and space, no I/O, no shared mutable state, safe to call
//! concurrently. How drive blocks are read, where parity streams are persisted and
//! when recovery is triggered are the storage layer's concerns, not this crate's.
//! This is also not a general erasure code: recovery of two or more arbitrary
//! drives from three or more parities is deliberately out of reach of this API.
//!
//! ## How to Use
//!
//! ### 1. Encode a parity family
//!
//! A [`ParityGroup`] encodes one parity stream per shift multiplier over an
//! ordered set of equal-length drive streams, and commits to every stream with
//! a BLAKE3 digest in its header.
//!
//! ```rust
//! use shiftxor::ParityGroup;
//!
//! let d0: Vec<u16> = vec![0, 1, 2, 4, 28989, 46965, 12350, 23716, 21612, 12108, 49903];
//! let d1: Vec<u16> = vec![0, 2, 4, 8, 60001, 8279, 63471, 38186, 35323, 29830, 24039];
//! let drives = vec![d0.clone(), d1.clone()];
//!
//! let group = ParityGroup::new(&drives, &[0, 1]).expect("Must be able to encode parity family");
//! assert_eq!(group.get_header().get_num_drives(), 2);
//! ```
//!
//! ### 2. Recover a single lost drive
//!
//! With the plain (shift 0) parity and all surviving drives, one lost drive
//! falls out by XOR cancellation; the result is verified against the header
//! commitment before it is handed back.
//!
//! ```rust
//! use shiftxor::ParityGroup;
//!
//! let d0: Vec<u16> = vec![0, 1, 2, 4, 28989, 46965, 12350, 23716, 21612, 12108, 49903];
//! let d1: Vec<u16> = vec![0, 2, 4, 8, 60001, 8279, 63471, 38186, 35323, 29830, 24039];
//! let drives = vec![d0.clone(), d1.clone()];
//!
//! let group = ParityGroup::new(&drives, &[0, 1]).expect("Must be able to encode parity family");
//!
//! let recovered = group.recover_drive(0, &[d1.clone()]).expect("Must be able to recover lost drive");
//! assert_eq!(recovered, d0);
//! ```
//!
//! ### 3. Recover both drives of a pair from parities alone
//!
//! When both drives of a 2-drive group are gone, two parity family members plus
//! the anchor word of drive 1 are enough, provided the shift difference is
//! coprime with the stream length (here: length 11 is prime).
//!
//! ```rust
//! use shiftxor::ParityGroup;
//!
//! let d0: Vec<u16> = vec![0, 1, 2, 4, 28989, 46965, 12350, 23716, 21612, 12108, 49903];
//! let d1: Vec<u16> = vec![0, 2, 4, 8, 60001, 8279, 63471, 38186, 35323, 29830, 24039];
//! let drives = vec![d0.clone(), d1.clone()];
//!
//! let group = ParityGroup::new(&drives, &[0, 1]).expect("Must be able to encode parity family");
//!
//! let [r0, r1] = group.recover_drive_pair(d1[0]).expect("Pair recovery must succeed for coprime offsets");
//! assert_eq!(r0, d0);
//! assert_eq!(r1, d1);
//! ```
//!
//! ### 4. Or work with the bare operations
//!
//! The four primitives are exposed directly for callers that manage their own
//! parity bookkeeping.
//!
//! ```rust
//! use shiftxor::{combine, encode, reconstruct, rotate};
//!
//! let stream: Vec<u8> = vec![11, 22, 33, 44, 55];
//!
//! let difference = combine(&[stream.clone(), rotate(&stream, 2).unwrap()]).unwrap();
//! let regenerated = reconstruct(&difference, 2, stream[0]).unwrap();
//! assert_eq!(regenerated, stream);
//!
//! // shift = 0 is plain RAID-style parity.
//! let other: Vec<u8> = vec![1, 2, 3, 4, 5];
//! let parity = encode(&[stream.clone(), other.clone()], 0).unwrap();
//! assert_eq!(combine(&[parity, other]).unwrap(), stream);
//! ```

mod consts;
mod errors;
mod group;
mod parity;
mod reconstruct;
mod stream;
mod word;


pub use errors::ShiftXorError;
pub use group::{ParityBlock, ParityGroup, ParityGroupHeader};
pub use parity::encode;
pub use reconstruct::reconstruct;
pub use stream::{combine, rotate};
pub use word::Word;
