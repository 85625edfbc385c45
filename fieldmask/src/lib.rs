//! Policy-driven masking of sensitive fields.
//!
//! This crate keeps sensitive values (emails, phone numbers, identifiers) out of
//! two output channels while leaving the values themselves untouched:
//! - **Serialized output**: [`MaskingService::to_masked_json`] and
//!   [`MaskedView`] serialize any `Serialize` value with sensitive fields
//!   replaced by masked text, in any serde format.
//! - **Log messages**: [`MaskingService::rewrite_args`] (and the `slog` adapter
//!   built on it) replaces structured log arguments with their masked JSON
//!   before the message template is formatted.
//!
//! Which fields are sensitive is decided per field:
//! - an explicit [`FieldMaskOverride`] registered through [`MaskSchema`] wins;
//! - otherwise the field name is matched case-insensitively against the
//!   policy's sensitive field set;
//! - a disabled policy masks nothing.
//!
//! Masking is a projection. Source values are only borrowed and never mutated.
//!
//! What it does not do:
//! - encrypt, hash or persist anything
//! - mask bare string arguments of log calls (only structured arguments are
//!   inspected)
//!
//! The `MaskSchema` derive macro lives in `fieldmask-derive` and is re-exported
//! when the `derive` feature is enabled.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[cfg(feature = "derive")]
pub use fieldmask_derive::MaskSchema;

#[allow(unused_extern_crates)]
extern crate self as fieldmask;

// Module declarations
mod config;
mod error;
mod log;
mod policy;
mod report;
mod schema;
mod ser;
mod service;
#[cfg(feature = "slog")]
pub mod slog;
mod style;

// Re-exports
pub use config::MaskingConfig;
pub use error::ConfigError;
pub use log::{FormattedMessage, LogArg, MaskableArg};
pub use policy::{FieldMaskOverride, MaskChar, MaskDecision, MaskingPolicy};
pub use report::{DiscardReporter, FailureReporter};
pub use schema::{FieldSchema, MaskSchema, SchemaRegistry, TypeSchema};
pub use ser::MaskedView;
pub use service::{MaskingService, MaskingServiceBuilder};
pub use style::{MaskStyle, DEFAULT_MASK_CHAR};
