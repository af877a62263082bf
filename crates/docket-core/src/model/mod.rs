//! Persisted record types: cases, their dated updates, and office users.

pub mod case;
pub mod update;
pub mod user;
pub mod wire;

pub use case::{Case, CaseStatus, ParseEnumError};
pub use update::{Update, UpdateDraft};
pub use user::{Role, User};

use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 7;

/// Fresh record id: `prefix` + `-` + seven random base36 characters.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("{prefix}-{suffix}")
}
