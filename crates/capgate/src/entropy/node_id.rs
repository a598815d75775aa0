// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Process-unique node identifiers drawn from the managed entropy source.

use super::EntropySourceManager;
use crate::Result;
use std::fmt;

/// 128-bit random node identifier used as a channel's address at join time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId([u8; 16]);

impl NodeId {
    /// Generate a fresh identifier from the manager's current entropy
    /// source.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::EntropyUnavailable`]: identifier
    /// generation with degraded randomness risks collisions, so failure is
    /// never masked.
    pub fn generate(manager: &EntropySourceManager) -> Result<Self> {
        let mut bytes = [0u8; 16];
        manager.get()?.fill(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Construct from raw bytes (e.g. an identifier received on the wire).
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw identifier bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_yields_distinct_ids() {
        let mgr = EntropySourceManager::new();
        let a = NodeId::generate(&mgr).unwrap();
        let b = NodeId::generate(&mgr).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_is_32_hex_chars() {
        let id = NodeId::from_bytes([0xab; 16]);
        let text = id.to_string();
        assert_eq!(text.len(), 32);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(&text[..2], "ab");
    }
}
