//! Sources of raw configuration text.
//!
//! Every source implements [`Source`] and is stored under a name in a
//! [`Sources`] registry. The names are what `order` directives and field tags
//! refer to.
//!
//! The built-in sources are:
//! - `env`: environment variables ([`env::Env`])
//! - `cmd`: command-line flags ([`cli::CommandLine`])

use std::string::{String, ToString};

use indexmap::IndexMap;

use crate::error::{ConfigError, Result};
use crate::schema::Kind;
use crate::tag::Params;

pub mod cli;
pub mod env;

/// Name of the environment source in [`Sources::standard`].
pub const ENV: &str = "env";

/// Name of the command-line source in [`Sources::standard`].
pub const CMD: &str = "cmd";

/// A named provider of raw textual configuration values.
///
/// A source is stateful and not reentrant: one resolution at a time drives it
/// through `init`, any number of `register` calls, any number of lookups, and
/// finally `cleanup`.
pub trait Source {
    /// Validate the directive parameters meant for this source.
    ///
    /// Called while the schema is parsed, before anything is initialized.
    fn check_params(&self, params: &Params) -> Result<()> {
        let _ = params;
        Ok(())
    }

    /// Prepare for a new resolution, forgetting earlier registrations.
    fn init(&mut self, params: &Params) -> Result<()>;

    /// Declare that a field will be looked up under `key`.
    ///
    /// Must fail with [`ConfigError::KeyAlreadyRegistered`] when `key` was
    /// already registered since the last `init`.
    fn register(&mut self, key: &str, default: &str, params: &Params, kind: Kind) -> Result<()>;

    /// The value for `key`, or `fallback` when the source has none, or the
    /// empty string when neither exists.
    fn get(&mut self, key: &str, fallback: Option<&str>) -> Result<String>;

    /// Multi-valued analogue of [`Source::get`].
    fn get_array(&mut self, key: &str, fallback: Option<&[String]>) -> Result<Vec<String>>;

    /// Undo whatever `init` set up.
    fn cleanup(&mut self);
}

/// Apply a case transform to every alphanumeric run of `key`.
///
/// Punctuation stays where it was written, so `bind_addr` keeps its
/// underscore and `BindAddr.Port` keeps its dot.
pub(crate) fn convert_words(key: &str, convert: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut start = 0;
    for (i, c) in key.char_indices() {
        if !c.is_alphanumeric() {
            if start < i {
                out.push_str(&convert(&key[start..i]));
            }
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    if start < key.len() {
        out.push_str(&convert(&key[start..]));
    }
    out
}

/// The registry of sources a resolution may consult, in registration order.
#[derive(Default)]
pub struct Sources {
    inner: IndexMap<String, Box<dyn Source>>,
}

impl Sources {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The environment and the process command line, consulted in that
    /// order unless a record says otherwise.
    pub fn standard() -> Self {
        Self::new()
            .with(ENV, env::Env::new())
            .with(CMD, cli::CommandLine::new())
    }

    /// Add (or replace) a source, builder style.
    pub fn with(mut self, name: impl Into<String>, source: impl Source + 'static) -> Self {
        self.insert(name, source);
        self
    }

    /// Add (or replace) a source, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        source: impl Source + 'static,
    ) -> Option<Box<dyn Source>> {
        self.inner.insert(name.into(), Box::new(source))
    }

    /// Whether a source is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Borrow a source by name.
    pub fn get(&self, name: &str) -> Option<&dyn Source> {
        let source: &dyn Source = self.inner.get(name)?.as_ref();
        Some(source)
    }

    /// Mutably borrow a source by name, failing with
    /// [`ConfigError::UnknownSource`].
    pub fn source_mut(&mut self, name: &str) -> Result<&mut dyn Source> {
        match self.inner.get_mut(name) {
            Some(source) => {
                let source: &mut dyn Source = source.as_mut();
                Ok(source)
            }
            None => Err(ConfigError::UnknownSource {
                name: name.to_string(),
            }),
        }
    }
}

impl core::fmt::Debug for Sources {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.inner.keys()).finish()
    }
}
