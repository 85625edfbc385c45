//! Observability hook for fail-soft serialization.

/// Receives notifications when masked serialization falls back to unmasked text.
///
/// Implementations must be cheap and must not panic; they run on the caller's
/// thread, often from inside a log call.
pub trait FailureReporter: Send + Sync {
    /// Called once per failed serialization with the value's type name and the
    /// serializer's error message.
    fn report_soft_failure(&self, type_name: &str, message: &str);
}

/// Reporter that drops every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardReporter;

impl FailureReporter for DiscardReporter {
    fn report_soft_failure(&self, _type_name: &str, _message: &str) {}
}

impl<F> FailureReporter for F
where
    F: Fn(&str, &str) + Send + Sync,
{
    fn report_soft_failure(&self, type_name: &str, message: &str) {
        self(type_name, message);
    }
}
