// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2026 capgate developers

//! # capgate - environment-aware capability gating for membership stacks
//!
//! Runs a group-communication/clustering library unmodified in both a full
//! dynamic runtime and a restricted native/headless environment. The
//! environment is probed exactly once at startup; the result selects, per
//! capability, between the full implementation and a degraded one that
//! succeeds silently.
//!
//! ## Quick Start
//!
//! ```rust
//! use capgate::{
//!     ChannelHandle, ManagementRegistrar, MemberChannel, MembershipRuntime, NodeId, Result,
//! };
//!
//! struct MyChannel {
//!     id: NodeId,
//! }
//!
//! impl MemberChannel for MyChannel {
//!     fn node_id(&self) -> NodeId {
//!         self.id
//!     }
//!     fn is_connected(&self) -> bool {
//!         true
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     // Probes the environment once and configures every component.
//!     let runtime = MembershipRuntime::builder().build();
//!
//!     // Join: generate the channel's address from managed entropy.
//!     let channel = MyChannel {
//!         id: runtime.generate_node_id()?,
//!     };
//!
//!     // Activate the diagnostic layer; UI hooks are no-ops when headless.
//!     runtime.protocol().start()?;
//!     runtime.protocol().show_ui()?;
//!
//!     // Best-effort management registration; never fails the pipeline.
//!     runtime.registrar().register(&ChannelHandle {
//!         name: "cluster-a",
//!         channel: &channel,
//!     })?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |              Membership pipeline (external)                  |
//! +--------------------------------------------------------------+
//! |  CapabilityGated<DiscardProtocol>  |  ManagementRegistrar    |
//! |  (lifecycle + UI gating)           |  (NoOp | Live variant)  |
//! +--------------------------------------------------------------+
//! |  EntropySourceManager -> NodeId    |  CapabilitySet          |
//! |  (lazy, resettable CSPRNG)         |  (probed once)          |
//! +--------------------------------------------------------------+
//! ```
//!
//! Capability absence is never an error: a degraded path performs zero
//! observable side effects and returns success. Genuine entropy failure is
//! the one fatal condition and always propagates.

/// Runtime capabilities and the one-shot environment probe.
pub mod capability;
/// Global configuration (environment-variable names, default tunables).
pub mod config;
/// Error taxonomy and `Result` alias.
pub mod error;
/// Lazily-initialized, resettable entropy source and node identifiers.
pub mod entropy;
/// Capability-gated diagnostic protocol wrapper and the discard layer.
pub mod protocol;
/// Pluggable channel registration with a management facility.
pub mod registry;
/// Startup wiring: probe once, configure everything.
pub mod runtime;

pub use capability::{Capability, CapabilitySet, FeatureProbe};
pub use entropy::{EntropySource, EntropySourceManager, NodeId};
pub use error::{Error, Result};
pub use protocol::{
    CapabilityGated, DiagnosticProtocol, DiscardConfig, DiscardProtocol, ProtocolLifecycleState,
};
pub use registry::{
    registrar_for, ChannelHandle, LiveRegistrar, ManagementFacility, ManagementRegistrar,
    MemberChannel, NoOpRegistrar, RegistrationStats,
};
pub use runtime::{MembershipRuntime, MembershipRuntimeBuilder};
