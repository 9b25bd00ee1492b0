//! Two-step renumber machine
//!
//! The renumber chord arms a pending state instead of mutating anything.
//! The next digit 1-9 commits the new number; any other key disarms and
//! flows on to normal dispatch. The arm expires after a fixed window,
//! measured against a caller-supplied clock so the machine stays
//! deterministic under test.

/// How long an armed renumber waits for its digit.
pub const RENUMBER_TIMEOUT_MS: f64 = 3_000.0;

/// An armed renumber, tied to the field it was armed in.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRenumber {
    pub field: String,
    pub deadline_ms: f64,
}

impl PendingRenumber {
    pub fn arm(field: &str, now_ms: f64) -> Self {
        Self {
            field: field.to_string(),
            deadline_ms: now_ms + RENUMBER_TIMEOUT_MS,
        }
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms > self.deadline_ms
    }
}

/// How the armed machine reads a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenumberKey {
    /// Digit 1-9: commit this number.
    Commit(u32),
    /// Everything else, zero included.
    Disarm,
}

pub fn classify_key(key: &str) -> RenumberKey {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ '1'..='9'), None) => RenumberKey::Commit(c as u32 - '0' as u32),
        _ => RenumberKey::Disarm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_digits() {
        assert_eq!(classify_key("1"), RenumberKey::Commit(1));
        assert_eq!(classify_key("5"), RenumberKey::Commit(5));
        assert_eq!(classify_key("9"), RenumberKey::Commit(9));
    }

    #[test]
    fn test_classify_disarms_everything_else() {
        assert_eq!(classify_key("0"), RenumberKey::Disarm);
        assert_eq!(classify_key("a"), RenumberKey::Disarm);
        assert_eq!(classify_key("Escape"), RenumberKey::Disarm);
        assert_eq!(classify_key("12"), RenumberKey::Disarm);
        assert_eq!(classify_key(""), RenumberKey::Disarm);
    }

    #[test]
    fn test_expiry_window() {
        let pending = PendingRenumber::arm("f0", 1_000.0);
        assert!(!pending.expired(1_000.0));
        assert!(!pending.expired(1_000.0 + RENUMBER_TIMEOUT_MS));
        assert!(pending.expired(1_000.0 + RENUMBER_TIMEOUT_MS + 1.0));
    }
}
