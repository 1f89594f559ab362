#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) mod coerce;
pub(crate) mod driver;
pub(crate) mod error;
pub(crate) mod help;
pub mod layers;
pub(crate) mod macros;
pub(crate) mod provenance;
pub(crate) mod schema;
pub(crate) mod tag;

// ==========================================
// PUBLIC INTERFACE
// ==========================================

pub use coerce::bool_token;
pub use driver::{Resolver, Stage, resolve};
pub use error::{ConfigError, Result};
pub use help::{FlagDoc, HelpConfig, generate_help};
pub use layers::cli::CommandLine;
pub use layers::env::{ARRAY_SWITCH, Env, EnvBuilder, EnvVars, MockEnv, StdEnv};
pub use layers::{CMD, ENV, Source, Sources};
pub use provenance::{Origin, Report, Resolved, ResolvedValue};
pub use schema::{
    Bind, Binding, Configure, Element, FieldDescriptor, Kind, Record, Scalar, Schema, SeqSlot,
    Slot,
};
pub use tag::{Params, parse_tag, split_param_key};
