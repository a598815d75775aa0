// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Capability-gated wrapper around diagnostic protocols.
//!
//! Diagnostic/fault-injection protocols frequently bundle an optional
//! interactive control surface. The wrapper removes that surface cleanly in
//! headless environments without altering the protocol's participation in
//! message delivery: `show_ui`/`hide_ui` degrade to no-ops, while
//! `start`/`stop` keep the inner protocol's semantics exactly.

mod discard;

pub use discard::{DiscardConfig, DiscardProtocol};

use crate::capability::{Capability, CapabilitySet};
use crate::Result;
use parking_lot::Mutex;

/// Lifecycle state of a gated protocol instance.
///
/// Transitions `Created -> Started -> Stopped`; there is no re-entry to
/// `Started` after `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolLifecycleState {
    Created,
    Started,
    Stopped,
}

/// Lifecycle and UI hooks of a diagnostic protocol, as the membership
/// pipeline's configuration/activation sequence invokes them.
pub trait DiagnosticProtocol: Send + Sync {
    /// Called when the protocol stack activates this layer.
    fn start(&self) -> Result<()>;
    /// Called when the protocol stack deactivates this layer.
    fn stop(&self) -> Result<()>;
    /// Open the interactive control surface, where one exists.
    fn show_ui(&self) -> Result<()>;
    /// Close the interactive control surface.
    fn hide_ui(&self) -> Result<()>;
}

/// Wraps a [`DiagnosticProtocol`], replacing its UI hooks with no-ops when
/// the environment has no display.
///
/// Lifecycle violations (double `start`, `stop` before `start`) are
/// downgraded to a logged warning and an idempotent no-op: membership
/// pipelines retry lifecycle calls defensively, and a retry must never
/// crash the stack.
pub struct CapabilityGated<P: DiagnosticProtocol> {
    inner: P,
    gui_available: bool,
    state: Mutex<ProtocolLifecycleState>,
}

impl<P: DiagnosticProtocol> CapabilityGated<P> {
    /// Wrap `inner`, gating its UI hooks on the probed capability set.
    pub fn new(inner: P, capabilities: &CapabilitySet) -> Self {
        Self {
            inner,
            gui_available: capabilities.has(Capability::GuiDisplay),
            state: Mutex::new(ProtocolLifecycleState::Created),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProtocolLifecycleState {
        *self.state.lock()
    }

    /// The wrapped protocol, for calls outside the gated surface (message
    /// filtering, counters).
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Activate the inner protocol.
    ///
    /// # Errors
    ///
    /// Propagates the inner protocol's own `start` failure. Invalid
    /// transitions do not error; they log a warning and return `Ok(())`.
    pub fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ProtocolLifecycleState::Created => {
                self.inner.start()?;
                *state = ProtocolLifecycleState::Started;
                Ok(())
            }
            ProtocolLifecycleState::Started => {
                log::warn!("[protocol] start() while already started, ignoring");
                Ok(())
            }
            ProtocolLifecycleState::Stopped => {
                log::warn!("[protocol] start() after stop(), no re-entry, ignoring");
                Ok(())
            }
        }
    }

    /// Deactivate the inner protocol.
    ///
    /// # Errors
    ///
    /// Propagates the inner protocol's own `stop` failure; invalid
    /// transitions warn and return `Ok(())`.
    pub fn stop(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            ProtocolLifecycleState::Started => {
                self.inner.stop()?;
                *state = ProtocolLifecycleState::Stopped;
                Ok(())
            }
            ProtocolLifecycleState::Created => {
                log::warn!("[protocol] stop() before start(), ignoring");
                Ok(())
            }
            ProtocolLifecycleState::Stopped => {
                log::warn!("[protocol] stop() while already stopped, ignoring");
                Ok(())
            }
        }
    }

    /// Open the control surface, or do nothing where no display exists.
    ///
    /// # Errors
    ///
    /// Propagates the inner hook's failure when a display is available.
    pub fn show_ui(&self) -> Result<()> {
        if !self.gui_available {
            log::debug!("[protocol] show_ui() suppressed, no display");
            return Ok(());
        }
        self.inner.show_ui()
    }

    /// Close the control surface, or do nothing where no display exists.
    ///
    /// # Errors
    ///
    /// Propagates the inner hook's failure when a display is available.
    pub fn hide_ui(&self) -> Result<()> {
        if !self.gui_available {
            log::debug!("[protocol] hide_ui() suppressed, no display");
            return Ok(());
        }
        self.inner.hide_ui()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records every hook invocation so tests can assert zero side effects.
    #[derive(Default)]
    struct CountingProtocol {
        starts: AtomicUsize,
        stops: AtomicUsize,
        shows: AtomicUsize,
        hides: AtomicUsize,
    }

    impl DiagnosticProtocol for CountingProtocol {
        fn start(&self) -> Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn stop(&self) -> Result<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn show_ui(&self) -> Result<()> {
            self.shows.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn hide_ui(&self) -> Result<()> {
            self.hides.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn gated(gui: bool) -> CapabilityGated<CountingProtocol> {
        let caps = CapabilitySet::new(gui, false, true);
        CapabilityGated::new(CountingProtocol::default(), &caps)
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let p = gated(true);
        assert_eq!(p.state(), ProtocolLifecycleState::Created);
        p.start().unwrap();
        assert_eq!(p.state(), ProtocolLifecycleState::Started);
        p.stop().unwrap();
        assert_eq!(p.state(), ProtocolLifecycleState::Stopped);
        assert_eq!(p.inner().starts.load(Ordering::SeqCst), 1);
        assert_eq!(p.inner().stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_double_start_is_idempotent() {
        let p = gated(true);
        p.start().unwrap();
        p.start().unwrap();
        assert_eq!(p.inner().starts.load(Ordering::SeqCst), 1);
        assert_eq!(p.state(), ProtocolLifecycleState::Started);
    }

    #[test]
    fn test_stop_before_start_is_noop() {
        let p = gated(true);
        p.stop().unwrap();
        assert_eq!(p.state(), ProtocolLifecycleState::Created);
        assert_eq!(p.inner().stops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_restart_after_stop() {
        let p = gated(true);
        p.start().unwrap();
        p.stop().unwrap();
        p.start().unwrap();
        assert_eq!(p.state(), ProtocolLifecycleState::Stopped);
        assert_eq!(p.inner().starts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ui_suppressed_without_display() {
        let p = gated(false);
        p.show_ui().unwrap();
        p.hide_ui().unwrap();
        assert_eq!(p.inner().shows.load(Ordering::SeqCst), 0);
        assert_eq!(p.inner().hides.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_ui_forwarded_with_display() {
        let p = gated(true);
        p.show_ui().unwrap();
        p.hide_ui().unwrap();
        assert_eq!(p.inner().shows.load(Ordering::SeqCst), 1);
        assert_eq!(p.inner().hides.load(Ordering::SeqCst), 1);
    }
}
