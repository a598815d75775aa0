// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Runtime capabilities and the one-shot environment probe.
//!
//! A [`CapabilitySet`] is computed exactly once at process start and is
//! read-only afterward: every dependent component treats capability gating
//! as static for the process lifetime. Absence of a capability is never an
//! error; it selects a degraded code path.

mod probe;

pub use probe::FeatureProbe;

/// Optional runtime capabilities a deployment environment may or may not
/// provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// A graphical display is reachable (diagnostic control windows may be
    /// shown).
    GuiDisplay,
    /// An external management/observability facility accepts channel
    /// registrations.
    ManagementRegistration,
    /// The OS entropy source can be (re)opened after process start, so a
    /// discarded entropy source can be regenerated fresh.
    EntropyReinit,
}

/// Immutable result of probing the environment once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    gui_display: bool,
    management_registration: bool,
    entropy_reinit: bool,
}

impl CapabilitySet {
    /// Build a set from explicit flags. Intended for tests and for callers
    /// that already know their deployment profile; production code should
    /// prefer [`FeatureProbe::probe`].
    #[must_use]
    pub fn new(gui_display: bool, management_registration: bool, entropy_reinit: bool) -> Self {
        Self {
            gui_display,
            management_registration,
            entropy_reinit,
        }
    }

    /// Set with every capability absent (most restricted environment).
    #[must_use]
    pub fn restricted() -> Self {
        Self::new(false, false, false)
    }

    /// Whether the given capability is available.
    #[must_use]
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::GuiDisplay => self.gui_display,
            Capability::ManagementRegistration => self.management_registration,
            Capability::EntropyReinit => self.entropy_reinit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_maps_flags() {
        let caps = CapabilitySet::new(true, false, true);
        assert!(caps.has(Capability::GuiDisplay));
        assert!(!caps.has(Capability::ManagementRegistration));
        assert!(caps.has(Capability::EntropyReinit));
    }

    #[test]
    fn test_restricted_has_nothing() {
        let caps = CapabilitySet::restricted();
        for c in [
            Capability::GuiDisplay,
            Capability::ManagementRegistration,
            Capability::EntropyReinit,
        ] {
            assert!(!caps.has(c));
        }
    }
}
