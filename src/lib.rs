//! Curator: capability and service registry with tiered access resolution.
//!
//! Services register themselves and the capabilities, agents, routes and mesh
//! policies they own at startup; other components discover them by realm and
//! query, and invoke capabilities through an ordered fallback chain that
//! degrades to a structured failure instead of an empty result.
//!
//! # Architecture
//!
//! Each registry follows hexagonal principles:
//!
//! - **Domain**: validated record types with no infrastructure dependencies
//! - **Services**: registries that own validation, ownership and logging
//! - **Ports**: trait seams for callables and the access gateway
//! - **Adapters**: in-memory implementations of those ports
//!
//! All registries share one [`store::RecordStore`], a sharded map with
//! per-key linearisable, identity-checked upserts.
//!
//! # Modules
//!
//! - [`store`]: versioned record store shared by every registry
//! - [`realm`]: organisational realms
//! - [`envelope`]: uniform response envelope and error codes
//! - [`service`]: service instance registry and lifecycle
//! - [`capability`]: capability registry and contracts
//! - [`agent`]: agent registry
//! - [`route`]: API route registry
//! - [`policy`]: mesh policy report aggregation
//! - [`curator`]: discovery facade composing the registries
//! - [`resolver`]: tiered capability access
//! - [`config`]: runtime configuration
//! - [`logging`]: tracing subscriber installation

pub mod agent;
pub mod capability;
pub mod config;
pub mod curator;
pub mod envelope;
pub mod logging;
pub mod policy;
pub mod realm;
pub mod resolver;
pub mod route;
pub mod service;
pub mod store;
