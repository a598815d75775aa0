// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! One-shot environment probe.
//!
//! The probe never fails: a check that cannot run reports the capability as
//! absent, so a missing feature never crashes startup. Operators can force
//! individual results via `CAPGATE_*` environment variables, and
//! `CAPGATE_RESTRICTED=1` selects the headless/native deployment profile
//! wholesale.

use super::CapabilitySet;
use crate::config::{ENV_ENTROPY_REINIT, ENV_GUI, ENV_MGMT, ENV_RESTRICTED};
use ring::rand::{SecureRandom, SystemRandom};

/// Detects at process start which optional capabilities the current runtime
/// environment supports.
pub struct FeatureProbe;

impl FeatureProbe {
    /// Probe the environment and return a fully populated capability set.
    ///
    /// Read-only inspection; no side effects beyond one throwaway draw from
    /// the OS entropy source. Intended to run exactly once during process
    /// initialization, before any membership component is constructed.
    #[must_use]
    pub fn probe() -> CapabilitySet {
        let restricted = env_flag(ENV_RESTRICTED) == Some(true);

        let gui = env_flag(ENV_GUI).unwrap_or_else(|| !restricted && display_reachable());
        let mgmt = env_flag(ENV_MGMT).unwrap_or(!restricted);
        let entropy = env_flag(ENV_ENTROPY_REINIT).unwrap_or_else(entropy_reinit_works);

        let caps = CapabilitySet::new(gui, mgmt, entropy);
        log::info!(
            "[probe] gui_display={} management_registration={} entropy_reinit={}{}",
            gui,
            mgmt,
            entropy,
            if restricted { " (restricted profile)" } else { "" }
        );
        caps
    }
}

/// Parse a `CAPGATE_*` override: `1` => forced present, `0` => forced
/// absent, unset or unrecognized => `None` (fall back to the heuristic).
fn env_flag(name: &str) -> Option<bool> {
    match std::env::var(name) {
        Ok(v) if v == "1" => Some(true),
        Ok(v) if v == "0" => Some(false),
        Ok(v) => {
            log::debug!("[probe] ignoring unrecognized {}={:?}", name, v);
            None
        }
        Err(_) => None,
    }
}

/// A display is considered reachable when the platform windowing handle is
/// present in the environment. Headless containers and native images have
/// neither.
#[cfg(unix)]
fn display_reachable() -> bool {
    let set = |name: &str| std::env::var(name).is_ok_and(|v| !v.is_empty());
    set("DISPLAY") || set("WAYLAND_DISPLAY")
}

#[cfg(windows)]
fn display_reachable() -> bool {
    true
}

#[cfg(not(any(unix, windows)))]
fn display_reachable() -> bool {
    false
}

/// Exercise the OS entropy source once. If it can produce bytes now, a
/// discarded source can be regenerated fresh after startup.
fn entropy_reinit_works() -> bool {
    let mut byte = [0u8; 1];
    SystemRandom::new().fill(&mut byte).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; each uses its own variable name
    // space via the real CAPGATE_* names, so keep them serial-safe by only
    // setting/removing what they assert on.

    #[test]
    fn test_env_flag_parses_binary_values() {
        std::env::set_var("CAPGATE_TEST_FLAG", "1");
        assert_eq!(env_flag("CAPGATE_TEST_FLAG"), Some(true));
        std::env::set_var("CAPGATE_TEST_FLAG", "0");
        assert_eq!(env_flag("CAPGATE_TEST_FLAG"), Some(false));
        std::env::set_var("CAPGATE_TEST_FLAG", "yes");
        assert_eq!(env_flag("CAPGATE_TEST_FLAG"), None);
        std::env::remove_var("CAPGATE_TEST_FLAG");
        assert_eq!(env_flag("CAPGATE_TEST_FLAG"), None);
    }

    #[test]
    fn test_entropy_probe_succeeds_on_host() {
        // Any host able to run the test suite has a working CSPRNG.
        assert!(entropy_reinit_works());
    }
}
