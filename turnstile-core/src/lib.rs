//! # turnstile-core
//!
//! Core types and trait seams for the Turnstile service pipeline framework.
//!
//! This crate has a small dependency set and is designed to be imported by
//! hooks, identity providers and transport adapters that don't need the
//! full `turnstile-std` implementation.
//!
//! # Pipeline Anatomy
//!
//! A registered endpoint compiles into a fixed sequence of stages, executed
//! strictly in order for every request:
//!
//! ## Stage 1: Dialog Setup ([`Dialog`])
//!
//! The transport adapter decomposes the raw request into [`RequestParts`];
//! body, query and path parameters merge into one [`Inputs`] mapping
//! (path wins over query, query over body) and the per-request dialog is
//! created around them.
//!
//! ## Stage 2: Authorization Gate ([`AuthRule`], [`IdentityProvider`])
//!
//! Present only when the endpoint carries an auth rule. Token extraction
//! and verification are delegated to the installed [`IdentityProvider`];
//! the decoded [`Identity`] is attached to the dialog for later stages.
//!
//! ## Stage 3: Before Hooks ([`BeforeHook`])
//!
//! Sequential interceptors that may replace the input mapping, fail the
//! request, or finish the response directly (short-circuiting the rest).
//!
//! ## Stage 4: Handler ([`Handler`])
//!
//! The terminal business-logic stage; its value seeds the reduction.
//!
//! ## Stage 5: After Hooks ([`AfterHook`])
//!
//! A left fold over the handler's value, skipped once the response has
//! been sent.
//!
//! ## Stage 6: Delivery ([`Envelope`])
//!
//! The reduced value normalizes into the canonical
//! `{ success, code, message, ..extra }` envelope.
//!
//! # Error Types
//!
//! - [`RegistrationError`] - startup-time declaration defects
//! - [`AuthError`] - authorization denials
//! - [`PipelineError`] - per-request stage failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod auth;
mod descriptor;
mod dialog;
pub mod envelope;
mod error;
mod handler;
mod hook;

// Re-exports
pub use auth::{AuthRule, Identity, IdentityProvider, REQUIRE_ALL_ROLES};
pub use descriptor::{RouteSpec, ServiceDescriptor, ServiceDescriptorBuilder, WILDCARD};
pub use dialog::{Dialog, Inputs, PipelineState, RequestParts};
pub use envelope::{Envelope, Payload};
pub use error::{AuthError, BoxError, PipelineError, RegistrationError};
pub use handler::{DynHandler, Handler};
pub use hook::{AfterHook, BeforeHook, DynAfterHook, DynBeforeHook};
