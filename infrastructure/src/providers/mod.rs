//! Capability providers shipped with the core.
//!
//! Real assistant capabilities (calendar, reminders, files, web search)
//! live outside this repository and plug in through
//! [`CapabilityProvider`](courier_domain::CapabilityProvider). The one
//! provider here exists to prove the contract end to end and to give
//! integration tests something real to call.

pub mod utility;

pub use utility::UtilityProvider;
