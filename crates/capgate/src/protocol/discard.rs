// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Discard fault-injection protocol.
//!
//! Drops a configurable fraction of up (received) and down (sent) messages
//! so operators can exercise retransmission and failure-detection paths.
//! Bundles an optional control window; in headless environments the gated
//! wrapper suppresses it while message filtering keeps working unchanged.

use super::DiagnosticProtocol;
use crate::config::DEFAULT_DISCARD_RATE;
use crate::entropy::EntropySourceManager;
use crate::Result;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Drop probabilities for the discard protocol, each clamped to `0.0..=1.0`.
#[derive(Debug, Clone, Copy)]
pub struct DiscardConfig {
    /// Fraction of received messages to drop.
    pub up_rate: f64,
    /// Fraction of sent messages to drop.
    pub down_rate: f64,
}

impl Default for DiscardConfig {
    fn default() -> Self {
        Self {
            up_rate: DEFAULT_DISCARD_RATE,
            down_rate: DEFAULT_DISCARD_RATE,
        }
    }
}

/// Fault-injection layer sitting in the membership pipeline.
///
/// Lifecycle hooks are intentionally empty: the base protocol contract
/// performs no resource acquisition in `start`/`stop`, and this layer adds
/// none of its own.
pub struct DiscardProtocol {
    up_rate: f64,
    down_rate: f64,
    entropy: Arc<EntropySourceManager>,
    dropped_up: AtomicU64,
    dropped_down: AtomicU64,
    ui_open: AtomicBool,
}

impl DiscardProtocol {
    /// Build a discard layer drawing its per-message coin flips from the
    /// managed entropy source.
    #[must_use]
    pub fn new(config: DiscardConfig, entropy: Arc<EntropySourceManager>) -> Self {
        Self {
            up_rate: config.up_rate.clamp(0.0, 1.0),
            down_rate: config.down_rate.clamp(0.0, 1.0),
            entropy,
            dropped_up: AtomicU64::new(0),
            dropped_down: AtomicU64::new(0),
            ui_open: AtomicBool::new(false),
        }
    }

    /// Decide whether to drop an incoming message.
    pub fn should_discard_up(&self) -> bool {
        let drop = self.coin_flip(self.up_rate);
        if drop {
            self.dropped_up.fetch_add(1, Ordering::Relaxed);
        }
        drop
    }

    /// Decide whether to drop an outgoing message.
    pub fn should_discard_down(&self) -> bool {
        let drop = self.coin_flip(self.down_rate);
        if drop {
            self.dropped_down.fetch_add(1, Ordering::Relaxed);
        }
        drop
    }

    /// Messages dropped on the up (receive) path so far.
    pub fn dropped_up(&self) -> u64 {
        self.dropped_up.load(Ordering::Relaxed)
    }

    /// Messages dropped on the down (send) path so far.
    pub fn dropped_down(&self) -> u64 {
        self.dropped_down.load(Ordering::Relaxed)
    }

    /// Whether the control window is currently open.
    pub fn ui_open(&self) -> bool {
        self.ui_open.load(Ordering::Relaxed)
    }

    fn coin_flip(&self, rate: f64) -> bool {
        if rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        let mut byte = [0u8; 1];
        match self.entropy.get().and_then(|s| s.fill(&mut byte)) {
            // byte/256 < rate
            Ok(()) => f64::from(byte[0]) < rate * 256.0,
            Err(e) => {
                // Fail open: a fault-injection layer must not drop traffic
                // it was never asked to drop.
                log::debug!("[discard] entropy draw failed ({}), delivering", e);
                false
            }
        }
    }
}

impl DiagnosticProtocol for DiscardProtocol {
    fn start(&self) -> Result<()> {
        log::debug!(
            "[discard] started (up_rate={}, down_rate={})",
            self.up_rate,
            self.down_rate
        );
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        log::debug!(
            "[discard] stopped (dropped up={} down={})",
            self.dropped_up(),
            self.dropped_down()
        );
        Ok(())
    }

    fn show_ui(&self) -> Result<()> {
        self.ui_open.store(true, Ordering::Relaxed);
        log::info!("[discard] control window opened");
        Ok(())
    }

    fn hide_ui(&self) -> Result<()> {
        self.ui_open.store(false, Ordering::Relaxed);
        log::info!("[discard] control window closed");
        Ok(())
    }
}
