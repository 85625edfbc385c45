//! Adapters for emitting masked values through `slog`.
//!
//! This module connects [`MaskingService`] with `slog` in three ways:
//! - [`MaskedJson`], a `slog::Value` that logs the masked projection of a value
//!   as structured JSON via `slog`'s nested-value support.
//! - [`MaskingService::log`], which runs the argument interceptor against a
//!   logger's level filter and emits the formatted message.
//! - [`SlogReporter`], a [`FailureReporter`] that warns about fail-soft
//!   serialization on a logger.
//!
//! It does not configure `slog` or install drains.

use ::slog::{
    Drain, Key, Level, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue,
};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    log::{format_template, LogArg},
    report::FailureReporter,
    service::MaskingService,
};

/// A `slog::Value` that emits a masked payload as structured JSON.
///
/// The payload is computed eagerly by [`MaskingService::masked_json`]; the
/// original value is never handed to `slog`.
#[derive(Clone, Debug)]
pub struct MaskedJson {
    value: JsonValue,
}

impl MaskedJson {
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for MaskedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = ::slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Reports fail-soft serialization as a warning on a logger.
#[derive(Clone, Debug)]
pub struct SlogReporter {
    logger: Logger,
}

impl SlogReporter {
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl FailureReporter for SlogReporter {
    fn report_soft_failure(&self, type_name: &str, message: &str) {
        ::slog::warn!(
            self.logger,
            "masked serialization failed, value logged unmasked";
            "type_name" => type_name,
            "error" => message,
        );
    }
}

macro_rules! emit {
    ($logger:expr, $level:path, $message:expr, $error:expr) => {
        match $error {
            Some(error) => ::slog::log!($logger, $level, "", "{}", $message; "error" => %error),
            None => ::slog::log!($logger, $level, "", "{}", $message),
        }
    };
}

impl MaskingService {
    /// Masks `value` and wraps it for use as a `slog` key-value.
    ///
    /// ```rust
    /// use fieldmask::{MaskingPolicy, MaskingService};
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize, Debug)]
    /// struct Login {
    ///     user: String,
    ///     password: String,
    /// }
    ///
    /// let service = MaskingService::new(MaskingPolicy::new().with_fields(["password"]));
    /// let login = Login { user: "jane".into(), password: "hunter2".into() };
    /// let logger = slog::Logger::root(slog::Discard, slog::o!());
    /// slog::info!(logger, "login"; "event" => service.masked_json(&login));
    /// ```
    #[must_use]
    pub fn masked_json<T>(&self, value: &T) -> MaskedJson
    where
        T: ?Sized + Serialize + std::fmt::Debug,
    {
        MaskedJson {
            value: self.to_masked_value(value),
        }
    }

    /// Logs `template` at `level` with structured arguments masked.
    ///
    /// Nothing is serialized when `level` is filtered out by `logger`. An
    /// error argument left over after every placeholder is filled is attached
    /// under the `error` key instead of being dropped.
    pub fn log(&self, logger: &Logger, level: Level, template: &str, args: Vec<LogArg<'_>>) {
        let enabled = logger.is_enabled(level);
        if !enabled {
            return;
        }
        let args = self.rewrite_args(enabled, args);
        let formatted = format_template(template, &args);
        let error = match args.get(formatted.consumed..) {
            Some([.., LogArg::Error(error)]) => Some(*error),
            _ => None,
        };
        let message = formatted.message;

        match level {
            Level::Critical => emit!(logger, Level::Critical, message, error),
            Level::Error => emit!(logger, Level::Error, message, error),
            Level::Warning => emit!(logger, Level::Warning, message, error),
            Level::Info => emit!(logger, Level::Info, message, error),
            Level::Debug => emit!(logger, Level::Debug, message, error),
            Level::Trace => emit!(logger, Level::Trace, message, error),
        }
    }
}
