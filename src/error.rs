//! Errors produced while parsing a schema or resolving it against sources.

use core::fmt;
use core::num::{ParseFloatError, ParseIntError};

/// Everything that can go wrong while binding a record to its sources.
///
/// Every variant is fatal to the resolution that produced it: the first error
/// is returned and whatever fields were already populated stay as they are.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The resolution target is not a record, or is an empty optional record.
    UnsupportedType {
        /// Rust type name of the rejected target.
        type_name: &'static str,
    },

    /// An `order` directive names a source that is not registered.
    InvalidOrder {
        /// The offending token.
        name: String,
    },

    /// A namespacing parameter (such as `envPrefix`) has an invalid value.
    InvalidNamespacePrefix {
        /// Source the parameter belongs to.
        source_name: String,
        /// Lower-cased parameter name, e.g. `prefix`.
        param: String,
        /// The rejected value.
        value: String,
    },

    /// A record declares two fields under the same name.
    DuplicateField {
        /// Rust type name of the record.
        record: &'static str,
        /// Dotted path of the repeated field.
        field: String,
    },

    /// A field's declared kind cannot be coerced from text.
    UnsupportedFieldType {
        /// Dotted path of the field.
        field: String,
        /// Human readable kind, e.g. `fixed-size array`.
        kind: &'static str,
    },

    /// A key was registered twice on one source instance.
    KeyAlreadyRegistered {
        /// Source that refused the registration.
        source_name: String,
        /// The key, after the source's own name transform.
        key: String,
    },

    /// The engine asked the registry for a source it does not hold.
    UnknownSource {
        /// The missing source name.
        name: String,
    },

    /// Text that should have been a boolean.
    InvalidBool {
        /// Dotted path of the field.
        field: String,
        /// The raw text.
        value: String,
    },

    /// Text that should have been an integer of the field's width.
    InvalidInteger {
        /// Dotted path of the field.
        field: String,
        /// The raw text.
        value: String,
        /// Underlying parse failure.
        cause: ParseIntError,
    },

    /// Text that should have been a floating point number.
    InvalidFloat {
        /// Dotted path of the field.
        field: String,
        /// The raw text.
        value: String,
        /// Underlying parse failure.
        cause: ParseFloatError,
    },

    /// A command-line flag that no field registered.
    UnknownFlag {
        /// The flag as written, e.g. `--nope`.
        flag: String,
    },

    /// A value flag appeared as the last argument.
    MissingFlagValue {
        /// The flag as written.
        flag: String,
    },

    /// `-h`/`--help` was passed.
    ///
    /// This is not really an "error" but uses the error path to hand the
    /// generated usage text back to the host.
    HelpRequested {
        /// The generated usage text.
        text: String,
    },

    /// Failure reported by a third-party source.
    Source {
        /// Name of the failing source.
        source_name: String,
        /// What went wrong.
        message: String,
    },
}

impl ConfigError {
    /// Returns true if this is a help request (not a real error)
    pub const fn is_help_request(&self) -> bool {
        matches!(self, ConfigError::HelpRequested { .. })
    }

    /// If this is a help request, returns the help text
    pub fn help_text(&self) -> Option<&str> {
        match self {
            ConfigError::HelpRequested { text } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedType { type_name } => {
                write!(f, "unsupported type `{type_name}`: expected a record")
            }
            ConfigError::InvalidOrder { name } => {
                write!(f, "invalid order: `{name}` is not a registered source")
            }
            ConfigError::InvalidNamespacePrefix {
                source_name,
                param,
                value,
            } => write!(
                f,
                "invalid {param} `{value}` for source `{source_name}`"
            ),
            ConfigError::DuplicateField { record, field } => {
                write!(f, "field `{field}` is declared twice in `{record}`")
            }
            ConfigError::UnsupportedFieldType { field, kind } => {
                write!(f, "field `{field}` has unsupported type ({kind})")
            }
            ConfigError::KeyAlreadyRegistered { source_name, key } => {
                write!(f, "key `{key}` is already registered with source `{source_name}`")
            }
            ConfigError::UnknownSource { name } => write!(f, "no source named `{name}`"),
            ConfigError::InvalidBool { field, value } => {
                write!(f, "field `{field}`: `{value}` is not a boolean")
            }
            ConfigError::InvalidInteger {
                field,
                value,
                cause,
            } => write!(f, "field `{field}`: `{value}` is not a valid integer: {cause}"),
            ConfigError::InvalidFloat {
                field,
                value,
                cause,
            } => write!(f, "field `{field}`: `{value}` is not a valid number: {cause}"),
            ConfigError::UnknownFlag { flag } => write!(f, "unknown flag: {flag}"),
            ConfigError::MissingFlagValue { flag } => write!(f, "flag {flag} requires a value"),
            ConfigError::HelpRequested { text } => write!(f, "{text}"),
            ConfigError::Source {
                source_name,
                message,
            } => write!(f, "source `{source_name}`: {message}"),
        }
    }
}

impl core::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ConfigError::InvalidInteger { cause, .. } => Some(cause),
            ConfigError::InvalidFloat { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Shorthand used across the crate.
pub type Result<T, E = ConfigError> = core::result::Result<T, E>;
