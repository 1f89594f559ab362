//! Driver API: runs one resolution of a record against a source registry.
//!
//! # Phases
//! 1. **Parse** the record into a [`Schema`] (order, source params, fields)
//! 2. **Init** every source in order with its namespacing params
//! 3. **Register** every field with every source, parsing nested records
//!    into child schemas on the way
//! 4. **Populate** fields through the fallback chain, then children
//! 5. **Clean up** every source in order, on every exit path
//!
//! The first failure stops the run. Fields populated before it keep their new
//! values.

use core::mem;
use std::string::String;
use std::vec::Vec;

use crate::coerce;
use crate::error::{ConfigError, Result};
use crate::layers::Sources;
use crate::macros::{debug, trace};
use crate::provenance::{Origin, Report, Resolved, ResolvedValue};
use crate::schema::{Configure, Kind, Schema, Target, dotted, effective_key};

/// How far a resolution got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing has happened yet.
    Unparsed,
    /// The root schema was parsed.
    Parsed,
    /// Every source in the order was initialized.
    SourcesInitialized,
    /// Every field was registered with every source.
    FieldsRegistered,
    /// Every field received its value.
    Populated,
    /// Sources were cleaned up after a successful population.
    SourcesCleanedUp,
}

/// Resolves records against a registry of sources.
///
/// ```rust
/// use figbind::{CommandLine, Configure, Env, MockEnv, Record, Resolver, Sources};
///
/// #[derive(Default)]
/// struct Config {
///     host: String,
///     port: u16,
/// }
///
/// impl Configure for Config {
///     fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
///         record
///             .directive(r#"envPrefix:"APP""#)
///             .field("Host", &mut self.host)
///             .field("Port", &mut self.port);
///     }
/// }
///
/// let mut sources = Sources::new()
///     .with("env", Env::builder().vars(MockEnv::from_pairs([("APP_HOST", "db")])).build())
///     .with("cmd", CommandLine::with_args(["--port", "5432"]));
///
/// let mut config = Config::default();
/// Resolver::new(&mut sources).resolve(&mut config).unwrap();
/// assert_eq!(config.host, "db");
/// assert_eq!(config.port, 5432);
/// ```
#[derive(Debug)]
pub struct Resolver<'s> {
    sources: &'s mut Sources,
    stage: Stage,
}

impl<'s> Resolver<'s> {
    /// A resolver over `sources`.
    pub fn new(sources: &'s mut Sources) -> Self {
        Self {
            sources,
            stage: Stage::Unparsed,
        }
    }

    /// The stage the last resolution reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Fill `target` from the sources and report where each value came from.
    pub fn resolve<C: Configure>(&mut self, target: &mut C) -> Result<Report> {
        self.stage = Stage::Unparsed;

        let mut schema = Schema::parse(target, self.sources)?;
        self.stage = Stage::Parsed;
        debug!(record = schema.type_name(), order = ?schema.order(), "driver: schema parsed");

        let mut guard = CleanupGuard {
            sources: &mut *self.sources,
            order: schema.order().to_vec(),
            stage: &mut self.stage,
        };

        for name in schema.order() {
            let params = schema.params_for(name).cloned().unwrap_or_default();
            trace!(source = %name, ?params, "driver: init source");
            guard.sources.source_mut(name)?.init(&params)?;
        }
        *guard.stage = Stage::SourcesInitialized;

        schema.register_fields(guard.sources)?;
        *guard.stage = Stage::FieldsRegistered;
        debug!(children = schema.children().len(), "driver: fields registered");

        let mut report = Report::new();
        schema.populate(guard.sources, &mut report)?;
        *guard.stage = Stage::Populated;
        debug!(values = report.len(), "driver: populated");

        drop(guard);
        Ok(report)
    }
}

/// Resolve `target` against the environment and the process command line.
pub fn resolve<C: Configure>(target: &mut C) -> Result<Report> {
    let mut sources = Sources::standard();
    Resolver::new(&mut sources).resolve(target)
}

/// Runs `cleanup` on every source in the order when dropped.
struct CleanupGuard<'g> {
    sources: &'g mut Sources,
    order: Vec<String>,
    stage: &'g mut Stage,
}

impl Drop for CleanupGuard<'_> {
    fn drop(&mut self) {
        for name in &self.order {
            if let Ok(source) = self.sources.source_mut(name) {
                trace!(source = %name, "driver: cleanup source");
                source.cleanup();
            }
        }
        if *self.stage == Stage::Populated {
            *self.stage = Stage::SourcesCleanedUp;
        }
    }
}

impl Schema<'_> {
    /// Register every field with every source in the order. Nested records
    /// are parsed into children and registered recursively.
    pub(crate) fn register_fields(&mut self, sources: &mut Sources) -> Result<()> {
        for field in self.fields.values_mut() {
            match mem::replace(&mut field.target, Target::Unsupported) {
                Target::Pending { type_name, target } => {
                    let mut path = self.path.clone();
                    path.push(field.name.clone());
                    trace!(field = %field.name, record = type_name, "driver: nested record");

                    let mut child = Schema::parse_dyn(
                        target,
                        type_name,
                        sources,
                        Some((path.as_slice(), self.order.as_slice())),
                    )?;
                    child.register_fields(sources)?;
                    self.children.push(child);
                    field.target = Target::Child(self.children.len() - 1);
                }
                other => {
                    field.target = other;
                    for name in &self.order {
                        let key = effective_key(&field.source_keys, &field.name, name);
                        trace!(field = %field.name, source = %name, key, "driver: register");
                        sources
                            .source_mut(name)?
                            .register(key, "", &field.params, field.kind)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Fill every field through the fallback chain, then every child.
    pub(crate) fn populate(&mut self, sources: &mut Sources, report: &mut Report) -> Result<()> {
        for field in self.fields.values_mut() {
            let path = dotted(&self.path, &field.name);

            match &mut field.target {
                Target::Scalar(slot) => {
                    let mut previous = slot.render();
                    let mut winner = None;

                    for name in &self.order {
                        let key = effective_key(&field.source_keys, &field.name, name);
                        let value = sources.source_mut(name)?.get(key, Some(previous.as_str()))?;
                        trace!(field = %path, source = %name, value = %value, "driver: lookup");
                        if value != previous {
                            winner = Some(Origin::new(name.as_str(), key));
                        }
                        previous = value;
                    }

                    coerce::assign(slot, &previous, &path)?;
                    debug!(field = %path, value = %previous, "driver: resolved");
                    report.push(Resolved {
                        path,
                        value: ResolvedValue::Scalar(slot.render()),
                        origins: winner.into_iter().collect(),
                    });
                }
                Target::Sequence(seq) => {
                    let mut values = Vec::new();
                    let mut origins = Vec::new();

                    for name in &self.order {
                        let key = effective_key(&field.source_keys, &field.name, name);
                        let found = sources.source_mut(name)?.get_array(key, None)?;
                        trace!(field = %path, source = %name, count = found.len(), "driver: lookup");
                        if !found.is_empty() {
                            origins.push(Origin::new(name.as_str(), key));
                        }
                        values.extend(found);
                    }

                    coerce::append(seq, &values, &path)?;
                    debug!(field = %path, count = values.len(), "driver: resolved");
                    report.push(Resolved {
                        path,
                        value: ResolvedValue::Sequence(seq.render()),
                        origins,
                    });
                }
                Target::Unsupported => {
                    let kind = match field.kind {
                        Kind::Unsupported(kind) => kind,
                        _ => "unknown",
                    };
                    return Err(ConfigError::UnsupportedFieldType { field: path, kind });
                }
                // populated below, once each
                Target::Child(_) | Target::Pending { .. } => {}
            }
        }

        for child in &mut self.children {
            trace!(path = ?child.path(), "driver: populate child");
            child.populate(sources, report)?;
        }
        Ok(())
    }
}
