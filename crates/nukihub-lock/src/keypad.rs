use crate::{Name, log::Timestamp};

/// One keypad code slot as stored on the lock.
///
/// `Default` is the canonical empty slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeypadEntry {
    pub code_id: u16,
    pub enabled: bool,
    pub name: Name,
    pub created: Timestamp,
    pub lock_count: u16,
}
