// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! Startup wiring: probe once, configure everything.
//!
//! [`MembershipRuntime::builder`] runs the environment probe exactly once
//! and injects the result into the gated protocol, the entropy manager, and
//! the registrar. Thereafter the surrounding membership pipeline calls into
//! the components transparently; no capability branching exists outside
//! them.

use crate::capability::{CapabilitySet, FeatureProbe};
use crate::config::DEFAULT_REGISTRATION_TIMEOUT;
use crate::entropy::{EntropySourceManager, NodeId};
use crate::protocol::{CapabilityGated, DiscardConfig, DiscardProtocol};
use crate::registry::{registrar_for, ManagementFacility, ManagementRegistrar};
use crate::Result;
use std::sync::Arc;
use std::time::Duration;

/// Environment-configured bundle of membership-layer components.
pub struct MembershipRuntime {
    capabilities: CapabilitySet,
    entropy: Arc<EntropySourceManager>,
    protocol: CapabilityGated<DiscardProtocol>,
    registrar: Arc<dyn ManagementRegistrar>,
}

impl MembershipRuntime {
    /// Start building a runtime. `build()` probes the environment unless a
    /// capability set is forced.
    #[must_use]
    pub fn builder() -> MembershipRuntimeBuilder {
        MembershipRuntimeBuilder {
            capabilities: None,
            facility: None,
            registration_timeout: DEFAULT_REGISTRATION_TIMEOUT,
            discard: DiscardConfig::default(),
        }
    }

    /// The capability set this runtime was configured with.
    #[must_use]
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    /// Entropy manager feeding node-identifier generation.
    #[must_use]
    pub fn entropy(&self) -> &Arc<EntropySourceManager> {
        &self.entropy
    }

    /// The gated diagnostic protocol participating in the pipeline.
    #[must_use]
    pub fn protocol(&self) -> &CapabilityGated<DiscardProtocol> {
        &self.protocol
    }

    /// The selected channel registrar.
    #[must_use]
    pub fn registrar(&self) -> &Arc<dyn ManagementRegistrar> {
        &self.registrar
    }

    /// Generate a node identifier for a channel about to join its group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::Error::EntropyUnavailable`].
    pub fn generate_node_id(&self) -> Result<NodeId> {
        NodeId::generate(&self.entropy)
    }
}

/// Builder for [`MembershipRuntime`].
pub struct MembershipRuntimeBuilder {
    capabilities: Option<CapabilitySet>,
    facility: Option<Arc<dyn ManagementFacility>>,
    registration_timeout: Duration,
    discard: DiscardConfig,
}

impl MembershipRuntimeBuilder {
    /// Skip the probe and use an explicit capability set (tests, or callers
    /// that know their deployment profile up front).
    #[must_use]
    pub fn capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Wire in the external management facility.
    #[must_use]
    pub fn facility(mut self, facility: Arc<dyn ManagementFacility>) -> Self {
        self.facility = Some(facility);
        self
    }

    /// Upper bound on a single registration call.
    #[must_use]
    pub fn registration_timeout(mut self, timeout: Duration) -> Self {
        self.registration_timeout = timeout;
        self
    }

    /// Drop rates for the discard fault-injection layer.
    #[must_use]
    pub fn discard(mut self, config: DiscardConfig) -> Self {
        self.discard = config;
        self
    }

    /// Probe (once) and construct the configured components.
    #[must_use]
    pub fn build(self) -> MembershipRuntime {
        let capabilities = self.capabilities.unwrap_or_else(FeatureProbe::probe);

        let entropy = Arc::new(EntropySourceManager::new());
        // Discard any source captured before this process started (e.g. at
        // image build time); first use regenerates fresh.
        entropy.reset();

        let protocol = CapabilityGated::new(
            DiscardProtocol::new(self.discard, Arc::clone(&entropy)),
            &capabilities,
        );
        let registrar = registrar_for(&capabilities, self.facility, self.registration_timeout);

        MembershipRuntime {
            capabilities,
            entropy,
            protocol,
            registrar,
        }
    }
}
