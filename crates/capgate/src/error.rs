// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Error taxonomy for the capability-gating layer.
//!
//! Capability absence is deliberately *not* represented here: an absent
//! capability selects a degraded code path and never raises an error.

use std::fmt;

/// Errors returned by capgate operations.
#[derive(Debug)]
pub enum Error {
    /// The OS entropy source could not produce bytes.
    ///
    /// Fatal to node-identifier generation: degraded randomness risks
    /// identifier collisions across the cluster, so this always propagates.
    EntropyUnavailable,
    /// A protocol lifecycle call arrived in a state that does not permit it
    /// (e.g. `start` after `stop`). Gated wrappers downgrade this to a
    /// logged warning; the variant exists for diagnostics and tests.
    InvalidLifecycleTransition(String),
    /// The external management facility rejected or timed out a channel
    /// registration. Swallowed at the registrar boundary after logging.
    RegistrationUnavailable(String),
    /// Failure inside a wrapped diagnostic protocol's own hooks.
    Protocol(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EntropyUnavailable => write!(f, "OS entropy source unavailable"),
            Error::InvalidLifecycleTransition(msg) => {
                write!(f, "Invalid lifecycle transition: {}", msg)
            }
            Error::RegistrationUnavailable(msg) => {
                write!(f, "Management registration unavailable: {}", msg)
            }
            Error::Protocol(msg) => write!(f, "Diagnostic protocol error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Convenient alias for API results using the public `Error` type.
pub type Result<T> = core::result::Result<T, Error>;
