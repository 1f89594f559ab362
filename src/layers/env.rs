//! Environment variable source.
//!
//! # Naming Convention
//!
//! A field is looked up under the SCREAMING_SNAKE_CASE form of its key (the
//! field name, or the `env:"..."` override from its tag). When the record's
//! directive sets a prefix, the prefix and an infix (`_` unless `envInfix` says
//! otherwise) are put in front:
//!
//! ```text
//! directive  envPrefix:"REEF"
//! BindAddr                      -> REEF_BIND_ADDR
//! MaxConns   env:"LIMIT"        -> REEF_LIMIT
//! ```
//!
//! Rules:
//! - An unset or empty variable counts as absent
//! - Sequence fields read a single variable; with array support enabled, a
//!   value containing `,` is split into elements
//! - Array support is enabled by `FIGBIND_ENV_ARRAY=1` (or `true`, `y`), or
//!   programmatically with [`EnvBuilder::arrays`]

use std::string::{String, ToString};
use std::vec::Vec;

use heck::ToShoutySnakeCase;
use indexmap::IndexMap;

use crate::error::{ConfigError, Result};
use crate::layers::{ENV, Source, convert_words};
use crate::macros::{debug, trace};
use crate::schema::Kind;
use crate::tag::Params;

/// Variable that switches comma-splitting of array values on.
pub const ARRAY_SWITCH: &str = "FIGBIND_ENV_ARRAY";

const DEFAULT_INFIX: &str = "_";

// ============================================================================
// EnvVars trait
// ============================================================================

/// Trait for abstracting over environment variable lookups.
///
/// This allows testing without modifying the actual environment.
pub trait EnvVars {
    /// Get the value of an environment variable by name.
    fn var(&self, name: &str) -> Option<String>;
}

/// Environment that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvVars for StdEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set an environment variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvVars for MockEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

// ============================================================================
// Env source
// ============================================================================

/// The environment variable source.
pub struct Env {
    vars: Box<dyn EnvVars>,
    /// Forced array support; `None` defers to [`ARRAY_SWITCH`].
    arrays: Option<bool>,
    prefix: String,
    infix: String,
    support_arrays: bool,
    /// Registered variable names (without prefix) and their defaults.
    fields: IndexMap<String, String>,
}

impl Env {
    /// An environment source reading the process environment.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring an environment source.
    pub fn builder() -> EnvBuilder {
        EnvBuilder::default()
    }

    /// The variable a key resolves to, before prefix and infix.
    ///
    /// Case boundaries become underscores. Punctuation written in the key
    /// is kept.
    pub fn field_name(key: &str) -> String {
        convert_words(key, |word| word.to_shouty_snake_case())
    }

    /// The variable a key resolves to under the current prefix and infix.
    pub fn var_name(&self, key: &str) -> String {
        let name = Self::field_name(key);
        if self.prefix.is_empty() {
            name
        } else {
            format!("{}{}{}", self.prefix, self.infix, name)
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the environment source.
#[derive(Default)]
pub struct EnvBuilder {
    vars: Option<Box<dyn EnvVars>>,
    arrays: Option<bool>,
}

impl EnvBuilder {
    /// Use a custom environment (for testing).
    pub fn vars(mut self, vars: impl EnvVars + 'static) -> Self {
        self.vars = Some(Box::new(vars));
        self
    }

    /// Force comma-split array support on or off, ignoring [`ARRAY_SWITCH`].
    pub fn arrays(mut self, enabled: bool) -> Self {
        self.arrays = Some(enabled);
        self
    }

    /// Build the source.
    pub fn build(self) -> Env {
        Env {
            vars: self.vars.unwrap_or_else(|| Box::new(StdEnv)),
            arrays: self.arrays,
            prefix: String::new(),
            infix: DEFAULT_INFIX.to_string(),
            support_arrays: false,
            fields: IndexMap::new(),
        }
    }
}

fn is_var_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn invalid(param: &str, value: &str) -> ConfigError {
    ConfigError::InvalidNamespacePrefix {
        source_name: ENV.to_string(),
        param: param.to_string(),
        value: value.to_string(),
    }
}

impl Source for Env {
    fn check_params(&self, params: &Params) -> Result<()> {
        if let Some(prefix) = params.get("prefix") {
            let mut chars = prefix.chars();
            let valid = match chars.next() {
                None => true,
                Some(first) => is_var_start(first) && chars.all(is_var_char),
            };
            if !valid {
                return Err(invalid("prefix", prefix));
            }
        }
        if let Some(infix) = params.get("infix") {
            if !infix.chars().all(is_var_char) {
                return Err(invalid("infix", infix));
            }
        }
        Ok(())
    }

    fn init(&mut self, params: &Params) -> Result<()> {
        self.prefix = params.get("prefix").cloned().unwrap_or_default();
        self.infix = params
            .get("infix")
            .cloned()
            .unwrap_or_else(|| DEFAULT_INFIX.to_string());
        self.fields.clear();

        self.support_arrays = self.arrays.unwrap_or_else(|| {
            self.vars.var(ARRAY_SWITCH).is_some_and(|v| {
                v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("y")
            })
        });

        debug!(
            prefix = %self.prefix,
            infix = %self.infix,
            arrays = self.support_arrays,
            "env: initialized"
        );
        Ok(())
    }

    fn register(&mut self, key: &str, default: &str, _params: &Params, kind: Kind) -> Result<()> {
        let name = Self::field_name(key);
        if self.fields.contains_key(&name) {
            return Err(ConfigError::KeyAlreadyRegistered {
                source_name: ENV.to_string(),
                key: name,
            });
        }
        trace!(key, var = %self.var_name(key), ?kind, "env: registered");
        self.fields.insert(name, default.to_string());
        Ok(())
    }

    fn get(&mut self, key: &str, fallback: Option<&str>) -> Result<String> {
        let default = match fallback {
            Some(fallback) => fallback.to_string(),
            None => self
                .fields
                .get(&Self::field_name(key))
                .cloned()
                .unwrap_or_default(),
        };

        let var = self.var_name(key);
        match self.vars.var(&var) {
            Some(value) if !value.is_empty() => {
                trace!(var = %var, value = %value, "env: found");
                Ok(value)
            }
            _ => {
                trace!(var = %var, "env: not set, using fallback");
                Ok(default)
            }
        }
    }

    fn get_array(&mut self, key: &str, fallback: Option<&[String]>) -> Result<Vec<String>> {
        let first = fallback.and_then(|values| values.first()).map(String::as_str);
        let value = self.get(key, first)?;

        if value.is_empty() {
            return Ok(Vec::new());
        }
        if self.support_arrays && value.contains(',') {
            return Ok(value.split(',').map(ToString::to_string).collect());
        }
        Ok(vec![value])
    }

    fn cleanup(&mut self) {}
}
