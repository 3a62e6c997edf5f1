//! Composite key codec
//!
//! A logical key is a namespace plus ordered string parts
//! (e.g. `Book` / account, division, security). Each segment is
//! NUL-terminated, and the whole key starts with a NUL so composite keys
//! never collide with plain keys. Because every segment carries its own
//! terminator, a partial list of parts encodes to a byte prefix of every
//! key that extends it, which is what makes namespace- and prefix-scoped
//! range scans work.

use crate::{Error, Result};

/// Segment separator. Parts must not contain it.
const SEP: u8 = 0x00;

/// A namespace-qualified, ordered-parts key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    /// Logical namespace (e.g. `Book`, `Security`, `Redeem`)
    pub namespace: String,

    /// Ordered key parts
    pub parts: Vec<String>,
}

impl CompositeKey {
    /// Create a composite key, validating every segment
    pub fn new(namespace: impl Into<String>, parts: &[&str]) -> Result<Self> {
        let namespace = namespace.into();
        validate_segment(&namespace)?;
        for part in parts {
            validate_segment(part)?;
        }
        Ok(Self {
            namespace,
            parts: parts.iter().map(|p| p.to_string()).collect(),
        })
    }

    /// Encode to a storable key
    pub fn encode(&self) -> Vec<u8> {
        encode_segments(&self.namespace, &self.parts)
    }

    /// Encode a (possibly partial) parts list to a scan prefix
    ///
    /// With zero parts this is the namespace prefix, matching every key in
    /// the namespace.
    pub fn prefix(namespace: &str, parts: &[&str]) -> Result<Vec<u8>> {
        validate_segment(namespace)?;
        for part in parts {
            validate_segment(part)?;
        }
        let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
        Ok(encode_segments(namespace, &parts))
    }

    /// Decode a storable key back into namespace and parts
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.first() != Some(&SEP) {
            return Err(Error::Key("not a composite key".to_string()));
        }
        if bytes.last() != Some(&SEP) {
            return Err(Error::Key("truncated composite key".to_string()));
        }

        let mut segments = bytes[1..bytes.len() - 1].split(|b| *b == SEP);

        let namespace = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Key("missing namespace".to_string()))?;
        let namespace = String::from_utf8(namespace.to_vec())
            .map_err(|_| Error::Key("namespace is not utf-8".to_string()))?;

        let mut parts = Vec::new();
        for segment in segments {
            let part = String::from_utf8(segment.to_vec())
                .map_err(|_| Error::Key("key part is not utf-8".to_string()))?;
            parts.push(part);
        }

        Ok(Self { namespace, parts })
    }
}

fn encode_segments(namespace: &str, parts: &[String]) -> Vec<u8> {
    let mut key = Vec::with_capacity(
        2 + namespace.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
    );
    key.push(SEP);
    key.extend_from_slice(namespace.as_bytes());
    key.push(SEP);
    for part in parts {
        key.extend_from_slice(part.as_bytes());
        key.push(SEP);
    }
    key
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::Key("empty key segment".to_string()));
    }
    if segment.bytes().any(|b| b == SEP) {
        return Err(Error::Key(format!(
            "key segment {:?} contains a NUL byte",
            segment
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let key = CompositeKey::new("Book", &["AC1", "D1", "SEC1"]).unwrap();
        let encoded = key.encode();
        let decoded = CompositeKey::decode(&encoded).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn test_partial_prefix_matches_full_key() {
        let key = CompositeKey::new("Book", &["AC1", "D1", "SEC1"]).unwrap();
        let encoded = key.encode();

        let by_namespace = CompositeKey::prefix("Book", &[]).unwrap();
        assert!(encoded.starts_with(&by_namespace));

        let by_account = CompositeKey::prefix("Book", &["AC1"]).unwrap();
        assert!(encoded.starts_with(&by_account));

        let other_account = CompositeKey::prefix("Book", &["AC2"]).unwrap();
        assert!(!encoded.starts_with(&other_account));
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let book = CompositeKey::prefix("Book", &[]).unwrap();
        let redeem = CompositeKey::prefix("Redeem", &[]).unwrap();
        let key = CompositeKey::new("Redeem", &["SEC1"]).unwrap().encode();
        assert!(key.starts_with(&redeem));
        assert!(!key.starts_with(&book));
    }

    #[test]
    fn test_rejects_bad_segments() {
        assert!(CompositeKey::new("Book", &[""]).is_err());
        assert!(CompositeKey::new("Book", &["a\0b"]).is_err());
        assert!(CompositeKey::new("", &["a"]).is_err());
    }

    #[test]
    fn test_decode_rejects_plain_keys() {
        assert!(CompositeKey::decode(b"plain-key").is_err());
        assert!(CompositeKey::decode(&[]).is_err());
    }
}
