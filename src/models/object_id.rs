use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;

/// 24-character lowercase hex identifier: a 4-byte big-endian unix timestamp
/// followed by 8 random bytes. Sorting by id roughly follows creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn new() -> Self {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);

        let mut hex = String::with_capacity(24);
        for byte in bytes {
            write!(hex, "{byte:02x}").expect("writing to a String cannot fail");
        }
        Self(hex)
    }

    /// Accepts exactly 24 hex digits; uppercase input is normalized down.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == 24 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Wraps a value read back from the store, which is trusted to be valid.
    pub(crate) fn from_store(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_24_hex_chars() {
        let id = ObjectId::new();
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ObjectId::new(), ObjectId::new());
    }

    #[test]
    fn parse_accepts_valid_ids_and_normalizes_case() {
        let id = ObjectId::parse("0123456789ABCDEF01234567").unwrap();
        assert_eq!(id.as_str(), "0123456789abcdef01234567");
    }

    #[test]
    fn parse_rejects_wrong_lengths_and_non_hex() {
        assert!(ObjectId::parse("").is_none());
        assert!(ObjectId::parse("0123456789abcdef0123456").is_none());
        assert!(ObjectId::parse("0123456789abcdef012345678").is_none());
        assert!(ObjectId::parse("0123456789abcdef0123456z").is_none());
    }

    #[test]
    fn id_leads_with_the_creation_timestamp() {
        let before = chrono::Utc::now().timestamp();
        let id = ObjectId::new();
        let after = chrono::Utc::now().timestamp();

        let seconds = i64::from(u32::from_str_radix(&id.as_str()[..8], 16).unwrap());
        assert!(seconds >= before && seconds <= after);
    }

    #[test]
    fn serializes_as_a_bare_string() {
        let id = ObjectId::parse("0123456789abcdef01234567").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"0123456789abcdef01234567\""
        );
    }
}
