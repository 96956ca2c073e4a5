//! # turnstile-std
//!
//! Standard implementations for the Turnstile service pipeline framework.
//!
//! This crate provides:
//! - **Route normalization**: [`routing`] (route-string parsing, wildcard
//!   method expansion, the flattened [`routing::RouteEntry`] table)
//! - **Hook resolution**: [`resolve`] (wildcard/endpoint merge ordering)
//! - **Authorization**: [`auth`] (the gate stage, default token extraction)
//! - **Compilation and execution**: [`pipeline`]
//! - **Registration**: [`registry`] (startup validation, memoized pipelines)
//! - **Error reporting**: [`report`] (the terminal envelope boundary)
//! - **Standard hooks**: Logging, Timeout (behind the `timeout` feature)
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use turnstile_core;

// Modules
pub mod auth;
pub mod hooks;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod routing;
pub mod testing;
