//! Public entry points.
//!
//! [`MaskingService`] bundles the policy, the schema registry and the failure
//! reporter. Build it once at startup and share it by reference (or `Arc`);
//! every method takes `&self` and nothing inside is mutated afterwards.

use std::{any::type_name, borrow::Cow, fmt};

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    policy::{MaskChar, MaskingPolicy},
    report::{DiscardReporter, FailureReporter},
    schema::{MaskSchema, SchemaRegistry},
    ser::{MaskContext, MaskedView},
    style::MaskStyle,
};

/// Masking facade used by serialization and logging call sites.
pub struct MaskingService {
    policy: MaskingPolicy,
    registry: SchemaRegistry,
    reporter: Box<dyn FailureReporter>,
}

impl fmt::Debug for MaskingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskingService")
            .field("policy", &self.policy)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl MaskingService {
    /// Service with an empty schema registry and a discarding reporter.
    #[must_use]
    pub fn new(policy: MaskingPolicy) -> Self {
        Self::builder(policy).build()
    }

    #[must_use]
    pub fn builder(policy: MaskingPolicy) -> MaskingServiceBuilder {
        MaskingServiceBuilder {
            policy,
            registry: SchemaRegistry::new(),
            reporter: Box::new(DiscardReporter),
        }
    }

    pub fn policy(&self) -> &MaskingPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Masks `value` with the policy's default style and character.
    ///
    /// Returns the input unchanged when masking is disabled.
    #[must_use]
    pub fn mask<'a>(&self, value: &'a str) -> Cow<'a, str> {
        self.mask_with(value, self.policy.default_style(), MaskChar::Inherit)
    }

    /// [`MaskingService::mask`] for optional values; `None` stays `None`.
    #[must_use]
    pub fn mask_option<'a>(&self, value: Option<&'a str>) -> Option<Cow<'a, str>> {
        value.map(|value| self.mask(value))
    }

    /// Masks `value` with an explicit style.
    ///
    /// [`MaskChar::Inherit`] resolves to the policy's default character.
    /// Returns the input unchanged when masking is disabled.
    #[must_use]
    pub fn mask_with<'a>(
        &self,
        value: &'a str,
        style: MaskStyle,
        mask_char: impl Into<MaskChar>,
    ) -> Cow<'a, str> {
        if !self.policy.enabled() {
            return Cow::Borrowed(value);
        }
        let mask_char = mask_char.into().or(self.policy.default_mask_char());
        Cow::Owned(style.apply(value, mask_char))
    }

    /// Borrows `value` as a [`MaskedView`] that any serde format can serialize.
    #[must_use]
    pub fn view<'a, T: ?Sized>(&'a self, value: &'a T) -> MaskedView<'a, T> {
        MaskedView::new(value, MaskContext::new(&self.policy, &self.registry))
    }

    /// Serializes `value` to compact JSON with sensitive fields masked.
    ///
    /// Never fails. If `value` cannot be serialized, its `Debug` text is
    /// returned unmasked and the failure is passed to the reporter. Types whose
    /// `Serialize` impl errors therefore bypass masking.
    #[must_use]
    pub fn to_masked_json<T>(&self, value: &T) -> String
    where
        T: ?Sized + Serialize + fmt::Debug,
    {
        match self.try_to_masked_json(value) {
            Ok(json) => json,
            Err(err) => self.fallback(value, &err),
        }
    }

    /// Pretty-printed variant of [`MaskingService::to_masked_json`].
    #[must_use]
    pub fn to_masked_json_pretty<T>(&self, value: &T) -> String
    where
        T: ?Sized + Serialize + fmt::Debug,
    {
        match serde_json::to_string_pretty(&self.view(value)) {
            Ok(json) => json,
            Err(err) => self.fallback(value, &err),
        }
    }

    /// Masked projection as a `serde_json::Value`.
    ///
    /// On failure the value's `Debug` text is returned as a JSON string.
    #[must_use]
    pub fn to_masked_value<T>(&self, value: &T) -> JsonValue
    where
        T: ?Sized + Serialize + fmt::Debug,
    {
        match serde_json::to_value(self.view(value)) {
            Ok(json) => json,
            Err(err) => JsonValue::String(self.fallback(value, &err)),
        }
    }

    /// Serializes `value` to compact JSON, returning serializer errors instead
    /// of falling back.
    pub fn try_to_masked_json<T>(&self, value: &T) -> Result<String, serde_json::Error>
    where
        T: ?Sized + Serialize,
    {
        serde_json::to_string(&self.view(value))
    }

    fn fallback<T>(&self, value: &T, err: &serde_json::Error) -> String
    where
        T: ?Sized + fmt::Debug,
    {
        self.reporter
            .report_soft_failure(type_name::<T>(), &err.to_string());
        format!("{value:?}")
    }
}

/// Builder for [`MaskingService`].
pub struct MaskingServiceBuilder {
    policy: MaskingPolicy,
    registry: SchemaRegistry,
    reporter: Box<dyn FailureReporter>,
}

impl MaskingServiceBuilder {
    /// Replaces the schema registry.
    #[must_use]
    pub fn registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Registers the schema of `T`.
    #[must_use]
    pub fn register<T: MaskSchema>(mut self) -> Self {
        self.registry = self.registry.register::<T>();
        self
    }

    /// Sets the reporter notified on fail-soft serialization.
    #[must_use]
    pub fn reporter(mut self, reporter: impl FailureReporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    #[must_use]
    pub fn build(self) -> MaskingService {
        MaskingService {
            policy: self.policy,
            registry: self.registry,
            reporter: self.reporter,
        }
    }
}
