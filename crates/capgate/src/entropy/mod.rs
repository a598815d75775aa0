// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Lazily-initialized, swappable entropy source for identifier generation.
//!
//! The manager models the image-build/runtime-start boundary explicitly: a
//! source captured before image finalization is discarded with [`reset`] and
//! regenerated fresh on the first [`get`] after startup, instead of relying
//! on hidden static reinitialization.
//!
//! [`reset`]: EntropySourceManager::reset
//! [`get`]: EntropySourceManager::get

mod node_id;

pub use node_id::NodeId;

use crate::{Error, Result};
use parking_lot::Mutex;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque generator of random bytes backed by the OS CSPRNG.
///
/// Instances are only handed out as `Arc<EntropySource>` by
/// [`EntropySourceManager`]; each carries the generation number it was
/// constructed under so logs and tests can tell pre-reset instances apart.
pub struct EntropySource {
    rng: SystemRandom,
    generation: u64,
}

impl EntropySource {
    fn construct(generation: u64) -> Result<Arc<Self>> {
        let rng = SystemRandom::new();
        // Draw once up front so "entropy unavailable" surfaces at
        // construction, not on some later identifier-generation path.
        let mut byte = [0u8; 1];
        rng.fill(&mut byte).map_err(|_| Error::EntropyUnavailable)?;
        Ok(Arc::new(Self { rng, generation }))
    }

    /// Fill `buf` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropyUnavailable`] if the OS source fails; callers
    /// generating node identifiers must propagate this, never mask it.
    pub fn fill(&self, buf: &mut [u8]) -> Result<()> {
        self.rng.fill(buf).map_err(|_| Error::EntropyUnavailable)
    }

    /// Generation number this source was constructed under (monotonic per
    /// manager, starts at 1).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Owns the process's entropy source for node-identifier generation.
///
/// Lazily constructs on first use; [`reset`](Self::reset) discards the
/// current instance so the next [`get`](Self::get) builds a fresh one. One
/// exclusive lock covers both paths: concurrent first use observes exactly
/// one construction, and a reset either fully precedes or fully follows any
/// in-flight `get`.
pub struct EntropySourceManager {
    slot: Mutex<Option<Arc<EntropySource>>>,
    generations: AtomicU64,
}

impl EntropySourceManager {
    /// Create a manager with no source constructed yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            generations: AtomicU64::new(0),
        }
    }

    /// Return the current entropy source, constructing it on first call.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::EntropyUnavailable`] if construction fails.
    pub fn get(&self) -> Result<Arc<EntropySource>> {
        let mut slot = self.slot.lock();
        if let Some(source) = slot.as_ref() {
            return Ok(Arc::clone(source));
        }
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let source = EntropySource::construct(generation)?;
        log::debug!("[entropy] constructed source generation {}", generation);
        *slot = Some(Arc::clone(&source));
        Ok(source)
    }

    /// Discard the current source, if any.
    ///
    /// After this returns, no previously issued source is valid for
    /// generating process-unique identifiers; callers must re-call
    /// [`get`](Self::get).
    pub fn reset(&self) {
        let mut slot = self.slot.lock();
        if let Some(old) = slot.take() {
            log::debug!("[entropy] discarded source generation {}", old.generation());
        }
    }
}

impl Default for EntropySourceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    #[test]
    fn test_get_is_lazy_and_cached() {
        let mgr = EntropySourceManager::new();
        let a = mgr.get().unwrap();
        let b = mgr.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.generation(), 1);
    }

    #[test]
    fn test_reset_forces_fresh_instance() {
        let mgr = EntropySourceManager::new();
        let before = mgr.get().unwrap();
        mgr.reset();
        let after = mgr.get().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(after.generation() > before.generation());
    }

    #[test]
    fn test_reset_without_source_is_harmless() {
        let mgr = EntropySourceManager::new();
        mgr.reset();
        assert_eq!(mgr.get().unwrap().generation(), 1);
    }

    #[test]
    fn test_concurrent_first_use_constructs_once() {
        let mgr = Arc::new(EntropySourceManager::new());
        let generations_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mgr = Arc::clone(&mgr);
                let seen = Arc::clone(&generations_seen);
                thread::spawn(move || {
                    let source = mgr.get().unwrap();
                    seen.fetch_max(source.generation() as usize, Ordering::SeqCst);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Every thread observed the same, single construction.
        assert_eq!(generations_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fill_produces_nonconstant_output() {
        let mgr = EntropySourceManager::new();
        let source = mgr.get().unwrap();
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        source.fill(&mut a).unwrap();
        source.fill(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
