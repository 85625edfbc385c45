//! Log argument interception.
//!
//! Log call sites pass their arguments as [`LogArg`]s. Before the message
//! template is formatted, [`MaskingService::rewrite_args`] replaces every
//! structured argument with its masked JSON. Scalars and errors are left
//! alone: a sensitive value passed as a bare string argument is *not* masked.
//!
//! [`MaskingService::format_message`] rewrites and renders in one step; the
//! template renderer itself is private, so no public path formats a structured
//! argument without masking it first.
//!
//! The rewrite works on a transient argument list; the caller's values are
//! only borrowed.

use std::{borrow::Cow, error::Error, fmt};

use serde::Serialize;

use crate::service::MaskingService;

/// A structured log argument that can render itself in masked form.
///
/// Blanket-implemented for every `Serialize + Debug` type.
pub trait MaskableArg {
    /// Masked JSON text of the value.
    fn masked_text(&self, service: &MaskingService) -> String;

    /// Unmasked text, used when no rewrite took place.
    fn plain_text(&self) -> String;
}

impl<T> MaskableArg for T
where
    T: Serialize + fmt::Debug,
{
    fn masked_text(&self, service: &MaskingService) -> String {
        service.to_masked_json(self)
    }

    fn plain_text(&self) -> String {
        format!("{self:?}")
    }
}

/// One argument of a log call.
pub enum LogArg<'a> {
    Text(Cow<'a, str>),
    Char(char),
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    /// Absent value, rendered as `null`.
    Null,
    /// Errors are never rewritten so diagnostics stay intact.
    Error(&'a (dyn Error + 'a)),
    /// Objects and collections; replaced by masked JSON on rewrite.
    Structured(&'a (dyn MaskableArg + 'a)),
}

impl<'a> LogArg<'a> {
    /// Wraps an object or collection.
    pub fn structured<T: MaskableArg>(value: &'a T) -> Self {
        LogArg::Structured(value)
    }

    pub fn error<E: Error>(error: &'a E) -> Self {
        LogArg::Error(error)
    }

    /// Returns `true` for arguments the interceptor would rewrite.
    pub fn is_structured(&self) -> bool {
        matches!(self, LogArg::Structured(_))
    }
}

impl fmt::Debug for LogArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Text(text) => f.debug_tuple("Text").field(text).finish(),
            LogArg::Char(c) => f.debug_tuple("Char").field(c).finish(),
            LogArg::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            LogArg::I64(n) => f.debug_tuple("I64").field(n).finish(),
            LogArg::U64(n) => f.debug_tuple("U64").field(n).finish(),
            LogArg::F64(n) => f.debug_tuple("F64").field(n).finish(),
            LogArg::Null => f.write_str("Null"),
            LogArg::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            LogArg::Structured(_) => f.write_str("Structured(..)"),
        }
    }
}

impl LogArg<'_> {
    /// Appends the argument's text to `out`.
    ///
    /// A `Structured` argument still present here was left alone by
    /// `rewrite_args` (masking disabled), so its plain text is wanted.
    fn write_to(&self, out: &mut String) {
        match self {
            LogArg::Text(text) => out.push_str(text),
            LogArg::Char(c) => out.push(*c),
            LogArg::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            LogArg::I64(n) => out.push_str(&n.to_string()),
            LogArg::U64(n) => out.push_str(&n.to_string()),
            LogArg::F64(n) => out.push_str(&n.to_string()),
            LogArg::Null => out.push_str("null"),
            LogArg::Error(err) => out.push_str(&err.to_string()),
            LogArg::Structured(value) => out.push_str(&value.plain_text()),
        }
    }
}

impl<'a> From<&'a str> for LogArg<'a> {
    fn from(value: &'a str) -> Self {
        LogArg::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for LogArg<'a> {
    fn from(value: &'a String) -> Self {
        LogArg::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for LogArg<'_> {
    fn from(value: String) -> Self {
        LogArg::Text(Cow::Owned(value))
    }
}

impl From<char> for LogArg<'_> {
    fn from(value: char) -> Self {
        LogArg::Char(value)
    }
}

impl From<bool> for LogArg<'_> {
    fn from(value: bool) -> Self {
        LogArg::Bool(value)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg<'_> {
                fn from(value: $ty) -> Self {
                    LogArg::I64(i64::from(value))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg<'_> {
                fn from(value: $ty) -> Self {
                    LogArg::U64(u64::from(value))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<usize> for LogArg<'_> {
    fn from(value: usize) -> Self {
        LogArg::U64(value as u64)
    }
}

impl From<isize> for LogArg<'_> {
    fn from(value: isize) -> Self {
        LogArg::I64(value as i64)
    }
}

impl From<f32> for LogArg<'_> {
    fn from(value: f32) -> Self {
        LogArg::F64(f64::from(value))
    }
}

impl From<f64> for LogArg<'_> {
    fn from(value: f64) -> Self {
        LogArg::F64(value)
    }
}

impl<'a, T> From<Option<T>> for LogArg<'a>
where
    T: Into<LogArg<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(LogArg::Null, Into::into)
    }
}

impl MaskingService {
    /// Replaces structured arguments with their masked JSON.
    ///
    /// Returns `args` untouched, without inspecting them, when masking is
    /// disabled, the list is empty, or `level_enabled` is false (the target
    /// level is filtered out for the calling logger).
    #[must_use]
    pub fn rewrite_args<'a>(
        &self,
        level_enabled: bool,
        mut args: Vec<LogArg<'a>>,
    ) -> Vec<LogArg<'a>> {
        if !self.policy().enabled() || args.is_empty() || !level_enabled {
            return args;
        }
        for arg in &mut args {
            if let LogArg::Structured(value) = arg {
                let masked = value.masked_text(self);
                *arg = LogArg::Text(Cow::Owned(masked));
            }
        }
        args
    }

    /// Renders `template` with `args` for a log line.
    ///
    /// Structured arguments are masked first, so the message never carries
    /// their raw field values while masking is enabled. Placeholders are
    /// filled in order; `\{}` stays a literal `{}`.
    #[must_use]
    pub fn format_message(&self, template: &str, args: Vec<LogArg<'_>>) -> FormattedMessage {
        let args = self.rewrite_args(true, args);
        format_template(template, &args)
    }
}

/// Result of substituting arguments into a message template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedMessage {
    /// Rendered message.
    pub message: String,
    /// Number of arguments consumed by placeholders.
    pub consumed: usize,
}

/// Substitutes `{}` placeholders with `args`, in order.
///
/// `\{}` renders a literal `{}` and `\\{}` a backslash followed by the next
/// argument. Placeholders without a matching argument stay literal; surplus
/// arguments are not rendered. Callers pass arguments already through
/// [`MaskingService::rewrite_args`].
pub(crate) fn format_template(template: &str, args: &[LogArg<'_>]) -> FormattedMessage {
    let mut message = String::with_capacity(template.len());
    let mut consumed = 0;
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        let before = &rest[..pos];
        rest = &rest[pos + 2..];

        if before.ends_with("\\\\") {
            message.push_str(&before[..before.len() - 1]);
        } else if let Some(escaped) = before.strip_suffix('\\') {
            message.push_str(escaped);
            message.push_str("{}");
            continue;
        } else {
            message.push_str(before);
        }

        match args.get(consumed) {
            Some(arg) => {
                arg.write_to(&mut message);
                consumed += 1;
            }
            None => message.push_str("{}"),
        }
    }
    message.push_str(rest);

    FormattedMessage { message, consumed }
}
