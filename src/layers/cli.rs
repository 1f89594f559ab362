//! Command-line flag source.
//!
//! Every registered field becomes a flag named after the kebab-case form of
//! its key (`BindAddr` is `--bind-addr`, `cmd:"listen"` is `--listen`).
//!
//! Accepted syntax:
//! - `--name value`, `-name value`, `--name=value`, `-name=value`
//! - boolean flags may be given bare (`--verbose` means `true`) or followed by
//!   a textual boolean (`--verbose false`)
//! - sequence flags may be repeated and accumulate in order
//! - `--` or the first argument that is not a flag ends parsing
//!
//! Arguments are parsed once, on the first lookup after registration.

use std::string::{String, ToString};
use std::vec::Vec;

use heck::ToKebabCase;
use indexmap::IndexMap;

use crate::coerce::bool_token;
use crate::error::{ConfigError, Result};
use crate::help::{FlagDoc, HelpConfig, generate_help};
use crate::layers::{CMD, Source, convert_words};
use crate::macros::{debug, trace};
use crate::schema::Kind;
use crate::tag::Params;

/// Field tag params holding the flag description shown in help, in order of
/// preference.
const DESC_PARAMS: [&str; 2] = ["desc", "cmdDesc"];

// ============================================================================
// FlagSet
// ============================================================================

#[derive(Debug, Clone)]
enum FlagValue {
    /// Last occurrence wins; starts out as the registered default.
    Single(String),
    /// Every occurrence is appended after the registered default, if any.
    Multi(Vec<String>),
}

#[derive(Debug, Clone)]
struct Flag {
    kind: Kind,
    description: Option<String>,
    value: FlagValue,
}

/// The flags of one resolution, keyed by flag name.
#[derive(Debug, Clone, Default)]
struct FlagSet {
    flags: IndexMap<String, Flag>,
    parsed: bool,
}

impl FlagSet {
    fn docs(&self) -> Vec<FlagDoc> {
        self.flags
            .iter()
            .map(|(name, flag)| FlagDoc {
                name: name.clone(),
                kind: flag.kind,
                description: flag.description.clone(),
            })
            .collect()
    }

    fn parse(&mut self, args: &[String], help: &HelpConfig) -> Result<()> {
        let mut index = 0;
        while index < args.len() {
            let arg = args[index].as_str();
            index += 1;

            if arg == "--" {
                trace!(rest = args.len() - index, "cli: end of flags");
                break;
            }

            let Some(body) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
                trace!(arg, "cli: stopping at non-flag argument");
                break;
            };
            if body.is_empty() {
                // a lone `-` is an argument, not a flag
                break;
            }

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            let spelled = &arg[..arg.len() - body.len() + name.len()];

            if !self.flags.contains_key(name) && (name == "h" || name == "help") {
                debug!(arg, "cli: help requested");
                return Err(ConfigError::HelpRequested {
                    text: generate_help(&self.docs(), help),
                });
            }
            let Some(flag) = self.flags.get_mut(name) else {
                return Err(ConfigError::UnknownFlag {
                    flag: spelled.to_string(),
                });
            };

            let value = match inline {
                Some(value) => value.to_string(),
                None if flag.kind.is_bool() => {
                    match args.get(index).filter(|next| bool_token(next).is_some()) {
                        Some(next) => {
                            index += 1;
                            next.clone()
                        }
                        None => "true".to_string(),
                    }
                }
                None => match args.get(index) {
                    Some(next) => {
                        index += 1;
                        next.clone()
                    }
                    None => {
                        return Err(ConfigError::MissingFlagValue {
                            flag: spelled.to_string(),
                        });
                    }
                },
            };

            trace!(flag = name, value = %value, "cli: parsed flag");
            match &mut flag.value {
                FlagValue::Single(current) => *current = value,
                FlagValue::Multi(values) => values.push(value),
            }
        }

        self.parsed = true;
        Ok(())
    }
}

// ============================================================================
// CommandLine source
// ============================================================================

/// The command-line source.
///
/// Each resolution gets a fresh flag set in `init`; `cleanup` puts back the
/// one that was active before.
#[derive(Debug, Default)]
pub struct CommandLine {
    /// Injected arguments; `None` reads the process arguments.
    args: Option<Vec<String>>,
    help: HelpConfig,
    flags: Option<FlagSet>,
    saved: Option<FlagSet>,
}

impl CommandLine {
    /// A command-line source reading the process arguments (program name
    /// excluded).
    pub fn new() -> Self {
        Self::default()
    }

    /// A command-line source reading the given arguments instead.
    ///
    /// The program name must not be included.
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: Some(args.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Program name shown in help text.
    pub fn program(mut self, name: impl Into<String>) -> Self {
        self.help.program_name = Some(name.into());
        self
    }

    /// Version shown in help text.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.help.version = Some(version.into());
        self
    }

    /// Description shown in help text.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.help.description = Some(description.into());
        self
    }

    /// The flag a key is exposed as, without dashes.
    ///
    /// Case boundaries become dashes. Punctuation written in the key is kept,
    /// so `cmd:"bind_addr"` is exposed as `--bind_addr`.
    pub fn flag_name(key: &str) -> String {
        convert_words(key, |word| word.to_kebab_case())
    }

    /// Help text for the flags registered so far.
    pub fn help(&self) -> String {
        let docs = self.flags.as_ref().map(FlagSet::docs).unwrap_or_default();
        generate_help(&docs, &self.help)
    }

    fn ensure_parsed(&mut self) -> Result<&FlagSet> {
        let flags = self.flags.get_or_insert_with(FlagSet::default);
        if !flags.parsed {
            let args = match &self.args {
                Some(args) => args.clone(),
                None => std::env::args().skip(1).collect(),
            };
            debug!(args = args.len(), flags = flags.flags.len(), "cli: parsing arguments");
            flags.parse(&args, &self.help)?;
        }
        Ok(flags)
    }
}

impl Source for CommandLine {
    fn init(&mut self, _params: &Params) -> Result<()> {
        self.saved = self.flags.take();
        self.flags = Some(FlagSet::default());
        debug!("cli: initialized fresh flag set");
        Ok(())
    }

    fn register(&mut self, key: &str, default: &str, params: &Params, kind: Kind) -> Result<()> {
        let name = Self::flag_name(key);
        let flags = self.flags.get_or_insert_with(FlagSet::default);
        if flags.flags.contains_key(&name) {
            return Err(ConfigError::KeyAlreadyRegistered {
                source_name: CMD.to_string(),
                key: name,
            });
        }

        let value = if kind.is_sequence() {
            let mut values = Vec::new();
            if !default.is_empty() {
                values.push(default.to_string());
            }
            FlagValue::Multi(values)
        } else {
            FlagValue::Single(default.to_string())
        };

        trace!(key, flag = %name, ?kind, "cli: registered");
        flags.flags.insert(
            name,
            Flag {
                kind,
                description: DESC_PARAMS
                    .iter()
                    .find_map(|param| params.get(*param))
                    .cloned(),
                value,
            },
        );
        Ok(())
    }

    fn get(&mut self, key: &str, fallback: Option<&str>) -> Result<String> {
        let name = Self::flag_name(key);
        let flags = self.ensure_parsed()?;

        if let Some(Flag {
            value: FlagValue::Single(value),
            ..
        }) = flags.flags.get(&name)
        {
            if !value.is_empty() {
                trace!(flag = %name, value = %value, "cli: found");
                return Ok(value.clone());
            }
        }

        trace!(flag = %name, "cli: not given, using fallback");
        Ok(fallback.map(ToString::to_string).unwrap_or_default())
    }

    fn get_array(&mut self, key: &str, fallback: Option<&[String]>) -> Result<Vec<String>> {
        let name = Self::flag_name(key);
        let flags = self.ensure_parsed()?;

        if let Some(Flag {
            value: FlagValue::Multi(values),
            ..
        }) = flags.flags.get(&name)
        {
            if !values.is_empty() {
                trace!(flag = %name, count = values.len(), "cli: found");
                return Ok(values.clone());
            }
        }

        Ok(fallback.map(<[String]>::to_vec).unwrap_or_default())
    }

    fn cleanup(&mut self) {
        self.flags = self.saved.take();
        debug!("cli: restored previous flag set");
    }
}
