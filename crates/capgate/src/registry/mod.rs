// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Pluggable registration of live channels with a management facility.
//!
//! Registration is best-effort observability plumbing: membership must
//! proceed whether or not the facility is reachable, so the live registrar
//! logs and counts failures instead of surfacing them, and environments
//! without a facility get a no-op variant selected once at startup.

use crate::capability::{Capability, CapabilitySet};
use crate::entropy::NodeId;
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Minimal view of a live channel the management facility cares about.
///
/// Implemented by the external protocol stack's channel type; this crate
/// never owns the channel.
pub trait MemberChannel: Send + Sync {
    /// The channel's node address.
    fn node_id(&self) -> NodeId;
    /// Whether the channel is currently connected to its group.
    fn is_connected(&self) -> bool;
}

/// Borrowed reference to a live channel plus its logical name.
///
/// Valid only for the duration of a [`ManagementRegistrar::register`] call.
pub struct ChannelHandle<'a> {
    /// Logical name under which the channel is registered. May be empty.
    pub name: &'a str,
    /// The live channel itself.
    pub channel: &'a dyn MemberChannel,
}

/// External management/observability facility accepting channel
/// registrations (the environment-provided collaborator).
pub trait ManagementFacility: Send + Sync {
    /// Register a channel under `name`, answering within `timeout`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::RegistrationUnavailable`] when the facility is
    /// unreachable or does not answer in time.
    fn register_channel(&self, name: &str, node: NodeId, timeout: Duration) -> Result<()>;
}

/// Registers live channels with the management facility, or does nothing in
/// environments without one. The variant is selected once at construction
/// from the probed capability set, never per call.
pub trait ManagementRegistrar: Send + Sync {
    /// Register `handle`. Always succeeds from the caller's point of view;
    /// facility trouble is reported through logs and counters only.
    ///
    /// # Errors
    ///
    /// Implementations currently never return `Err`; the `Result` keeps the
    /// registration seam uniform for facilities that must hard-fail.
    fn register(&self, handle: &ChannelHandle<'_>) -> Result<()>;
}

/// Selected when the management-registration capability is absent:
/// unconditional success, zero side effects.
pub struct NoOpRegistrar;

impl ManagementRegistrar for NoOpRegistrar {
    fn register(&self, _handle: &ChannelHandle<'_>) -> Result<()> {
        Ok(())
    }
}

/// Best-effort registration counters, in the spirit of runtime metrics
/// snapshots: operators can see failures the pipeline never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationStats {
    pub attempted: u64,
    pub failed: u64,
}

/// Forwards registrations to the external facility under a bounded timeout.
pub struct LiveRegistrar {
    facility: Arc<dyn ManagementFacility>,
    timeout: Duration,
    attempted: AtomicU64,
    failed: AtomicU64,
}

impl LiveRegistrar {
    /// Build a registrar forwarding to `facility`, bounding each call by
    /// `timeout`.
    #[must_use]
    pub fn new(facility: Arc<dyn ManagementFacility>, timeout: Duration) -> Self {
        Self {
            facility,
            timeout,
            attempted: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Snapshot of attempt/failure counters.
    pub fn stats(&self) -> RegistrationStats {
        RegistrationStats {
            attempted: self.attempted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl ManagementRegistrar for LiveRegistrar {
    fn register(&self, handle: &ChannelHandle<'_>) -> Result<()> {
        self.attempted.fetch_add(1, Ordering::Relaxed);
        let node = handle.channel.node_id();
        if !handle.channel.is_connected() {
            log::debug!(
                "[registrar] channel {:?} not yet connected at registration",
                handle.name
            );
        }
        match self
            .facility
            .register_channel(handle.name, node, self.timeout)
        {
            Ok(()) => {
                log::debug!("[registrar] registered channel {:?} node {}", handle.name, node);
            }
            Err(e) => {
                // Best-effort by design: report, never throw.
                self.failed.fetch_add(1, Ordering::Relaxed);
                log::warn!(
                    "[registrar] registration of channel {:?} failed ({}), continuing",
                    handle.name,
                    e
                );
            }
        }
        Ok(())
    }
}

/// Select the registrar variant for the probed environment.
///
/// Falls back to [`NoOpRegistrar`] when the capability is present but no
/// facility was wired in, with a warning: a misconfigured facility must not
/// stall membership either.
pub fn registrar_for(
    capabilities: &CapabilitySet,
    facility: Option<Arc<dyn ManagementFacility>>,
    timeout: Duration,
) -> Arc<dyn ManagementRegistrar> {
    if !capabilities.has(Capability::ManagementRegistration) {
        return Arc::new(NoOpRegistrar);
    }
    match facility {
        Some(facility) => Arc::new(LiveRegistrar::new(facility, timeout)),
        None => {
            log::warn!("[registrar] capability present but no facility configured, using no-op");
            Arc::new(NoOpRegistrar)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use parking_lot::Mutex;

    struct StubChannel {
        id: NodeId,
    }

    impl StubChannel {
        fn new() -> Self {
            Self {
                id: NodeId::from_bytes([7u8; 16]),
            }
        }
    }

    impl MemberChannel for StubChannel {
        fn node_id(&self) -> NodeId {
            self.id
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    /// Facility recording every call; optionally failing.
    struct RecordingFacility {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingFacility {
        fn new(fail: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    impl ManagementFacility for RecordingFacility {
        fn register_channel(&self, name: &str, _node: NodeId, _timeout: Duration) -> Result<()> {
            self.calls.lock().push(name.to_string());
            if self.fail {
                return Err(Error::RegistrationUnavailable("facility down".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_noop_registrar_accepts_any_handle() {
        let registrar = NoOpRegistrar;
        let channel = StubChannel::new();
        for name in ["cluster-a", ""] {
            let handle = ChannelHandle {
                name,
                channel: &channel,
            };
            registrar.register(&handle).unwrap();
        }
    }

    #[test]
    fn test_live_registrar_forwards_to_facility() {
        let facility = Arc::new(RecordingFacility::new(false));
        let registrar = LiveRegistrar::new(facility.clone(), Duration::from_millis(100));
        let channel = StubChannel::new();
        let handle = ChannelHandle {
            name: "cluster-a",
            channel: &channel,
        };
        registrar.register(&handle).unwrap();

        assert_eq!(facility.calls.lock().as_slice(), ["cluster-a"]);
        let stats = registrar.stats();
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.failed, 0);
    }

    #[test]
    fn test_facility_failure_is_swallowed_and_counted() {
        let facility = Arc::new(RecordingFacility::new(true));
        let registrar = LiveRegistrar::new(facility, Duration::from_millis(100));
        let channel = StubChannel::new();
        let handle = ChannelHandle {
            name: "cluster-a",
            channel: &channel,
        };

        // Non-fatal to the caller.
        registrar.register(&handle).unwrap();

        let stats = registrar.stats();
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_selection_without_capability_is_noop() {
        let caps = CapabilitySet::new(true, false, true);
        let facility = Arc::new(RecordingFacility::new(false));
        let registrar = registrar_for(
            &caps,
            Some(facility.clone() as Arc<dyn ManagementFacility>),
            Duration::from_millis(100),
        );

        let channel = StubChannel::new();
        let handle = ChannelHandle {
            name: "cluster-a",
            channel: &channel,
        };
        registrar.register(&handle).unwrap();

        // Capability absent: zero external calls were made.
        assert!(facility.calls.lock().is_empty());
    }

    #[test]
    fn test_selection_without_facility_degrades_to_noop() {
        let caps = CapabilitySet::new(false, true, true);
        let registrar = registrar_for(&caps, None, Duration::from_millis(100));
        let channel = StubChannel::new();
        let handle = ChannelHandle {
            name: "",
            channel: &channel,
        };
        registrar.register(&handle).unwrap();
    }
}
