use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static OWNER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_@(.+)$").expect("owner pattern compiles"));
static SLOT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_").expect("slot pattern compiles"));

/// Parsed container handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    raw: String,
    owner_id: String,
    slot: Option<usize>,
}

impl ContainerHandle {
    /// Parse a handle; `None` when no `_@<owner>` suffix is present.
    ///
    /// The owner starts after the first `_@`. A leading `<digits>_` segment
    /// selects the slot of a multi-container owner.
    pub fn parse(raw: &str) -> Option<Self> {
        let owner_id = OWNER_PATTERN.captures(raw)?.get(1)?.as_str().to_string();
        let slot = SLOT_PATTERN
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse::<usize>().ok());

        Some(Self {
            raw: raw.to_string(),
            owner_id,
            slot,
        })
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_handle_has_owner_and_no_slot() {
        let handle = ContainerHandle::parse("room_@0").unwrap();
        assert_eq!(handle.owner_id(), "0");
        assert_eq!(handle.slot(), None);
    }

    #[test]
    fn multi_container_handle_carries_slot() {
        let handle = ContainerHandle::parse("3_swiper_@xyz").unwrap();
        assert_eq!(handle.owner_id(), "xyz");
        assert_eq!(handle.slot(), Some(3));
        assert_eq!(handle.to_string(), "3_swiper_@xyz");
    }

    #[test]
    fn owner_starts_after_first_marker() {
        let handle = ContainerHandle::parse("popup_@a_@b").unwrap();
        assert_eq!(handle.owner_id(), "a_@b");
    }

    #[test]
    fn malformed_handles_are_rejected() {
        assert!(ContainerHandle::parse("swiper").is_none());
        assert!(ContainerHandle::parse("room_@").is_none());
        assert!(ContainerHandle::parse("").is_none());
    }

    #[test]
    fn digits_not_at_start_are_not_a_slot() {
        let handle = ContainerHandle::parse("swiper2_@xyz").unwrap();
        assert_eq!(handle.slot(), None);
    }
}
