//! Pipeline execution.
//!
//! Runs a compiled pipeline for a single request, threading the dialog
//! through every stage in order and honoring the short-circuit semantics:
//! once the dialog is finished or a stage fails, no further stage executes.
//!
//! Stages are awaited strictly sequentially within one request; independent
//! requests execute fully concurrently against the same immutable pipeline.

use crate::pipeline::CompiledPipeline;
use crate::report::report;
use serde_json::Value;
use turnstile_core::{Dialog, Envelope, PipelineError, PipelineState};

/// What a pipeline run produced, before delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// All stages ran; the reduced result is ready for delivery.
    Handled(Value),
    /// A before hook answered the request directly; there is nothing to
    /// deliver. This is the intended short-circuit, not a fault.
    Intercepted,
}

impl CompiledPipeline {
    /// Run stages up to and including the after-hook reduction.
    ///
    /// This is the in-process invocation path: it returns the reduced
    /// result without building an envelope or delivering anything.
    pub async fn run(&self, dialog: &Dialog) -> Result<RunOutcome, PipelineError> {
        let mut inputs = dialog.inputs().clone();

        if let Some(gate) = &self.gate {
            dialog.set_state(PipelineState::Authorizing);
            if let Err(denied) = gate.check(dialog).await {
                dialog.set_state(PipelineState::Aborted);
                return Err(PipelineError::AuthDenied(denied));
            }
        }

        dialog.set_state(PipelineState::BeforeHooks);
        for hook in &self.before {
            if dialog.finished() {
                dialog.set_state(PipelineState::Aborted);
                return Ok(RunOutcome::Intercepted);
            }
            match hook.call_dyn(inputs.clone(), dialog.clone()).await {
                Ok(Some(replacement)) => inputs = replacement,
                Ok(None) => {}
                Err(error) => {
                    dialog.set_state(PipelineState::Aborted);
                    return Err(PipelineError::BeforeHook(error));
                }
            }
        }
        if dialog.finished() {
            dialog.set_state(PipelineState::Aborted);
            return Ok(RunOutcome::Intercepted);
        }

        dialog.set_state(PipelineState::Handling);
        let data = match self.handler.call_dyn(inputs, dialog.clone()).await {
            Ok(data) => data,
            Err(error) => {
                dialog.set_state(PipelineState::Aborted);
                return Err(PipelineError::Handler(error));
            }
        };
        dialog.set_data(data.clone());

        dialog.set_state(PipelineState::AfterHooks);
        let mut result = data;
        for hook in &self.after {
            if dialog.finished() {
                tracing::warn!(
                    service = %self.service,
                    endpoint = %self.endpoint,
                    "response already sent; skipping remaining after hooks"
                );
                break;
            }
            result = match hook.call_dyn(result, dialog.clone()).await {
                Ok(next) => next,
                Err(error) => {
                    dialog.set_state(PipelineState::Aborted);
                    return Err(PipelineError::AfterHook(error));
                }
            };
        }

        if let Some(wrapper) = &self.wrapper {
            if !dialog.finished() {
                result = wrapper(result, dialog);
            }
        }

        dialog.set_result(result.clone());
        Ok(RunOutcome::Handled(result))
    }

    /// Execute the full pipeline for one request, delivery included.
    ///
    /// Returns the envelope the transport should write, or `None` when a
    /// stage already sent the response and there is nothing left to do.
    /// Stage failures funnel into the terminal reporter and come back as a
    /// `code >= 400` envelope; a failure after the response was sent is
    /// logged as a warning only, since the response is already committed.
    pub async fn execute(&self, dialog: &Dialog) -> Option<Envelope> {
        tracing::trace!(
            service = %self.service,
            endpoint = %self.endpoint,
            method = %dialog.request().method,
            path = %dialog.request().path,
            "pipeline starting"
        );

        match self.run(dialog).await {
            Ok(RunOutcome::Intercepted) => None,
            Ok(RunOutcome::Handled(result)) => {
                if dialog.finished() {
                    tracing::warn!(
                        service = %self.service,
                        endpoint = %self.endpoint,
                        "response already sent"
                    );
                    dialog.set_state(PipelineState::Aborted);
                    return None;
                }
                let envelope = dialog.ok(result);
                dialog.set_result(envelope.to_value());
                dialog.finish();
                dialog.set_state(PipelineState::Delivered);
                Some(envelope)
            }
            Err(error) => {
                if dialog.finished() {
                    tracing::warn!(
                        service = %self.service,
                        endpoint = %self.endpoint,
                        error = %error,
                        "stage failed after the response was sent"
                    );
                    return None;
                }
                let envelope = report(&error, dialog, self.environment);
                dialog.set_result(envelope.to_value());
                dialog.finish();
                Some(envelope)
            }
        }
    }
}
