// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Global configuration constants - single source of truth.
//!
//! Centralizes environment-variable names and default tunables.
//! **NEVER hardcode these elsewhere!**

use std::time::Duration;

// =======================================================================
// Environment overrides (operator/test escape hatches for the probe)
// =======================================================================

/// Force the GUI display capability: `1` present, `0` absent, unset = probe.
pub const ENV_GUI: &str = "CAPGATE_GUI";

/// Force the management-registration capability: `1`/`0`, unset = probe.
pub const ENV_MGMT: &str = "CAPGATE_MGMT";

/// Force the entropy-reinitialization capability: `1`/`0`, unset = probe.
pub const ENV_ENTROPY_REINIT: &str = "CAPGATE_ENTROPY_REINIT";

/// Restricted-runtime master switch (`1` = native/headless deployment
/// profile). Disables GUI display and management registration in one go;
/// per-capability overrides above still win.
pub const ENV_RESTRICTED: &str = "CAPGATE_RESTRICTED";

// =======================================================================
// Registration defaults
// =======================================================================

/// Default upper bound on a single management-facility registration call.
///
/// Registration is best-effort; a facility that does not answer within this
/// window is treated as unavailable for that call.
pub const DEFAULT_REGISTRATION_TIMEOUT: Duration = Duration::from_secs(2);

// =======================================================================
// Diagnostic protocol defaults
// =======================================================================

/// Default drop probability for the discard protocol (disabled).
pub const DEFAULT_DISCARD_RATE: f64 = 0.0;
