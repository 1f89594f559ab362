//! Schema representation: what a record declares, parsed and checked against
//! the registered sources.
//!
//! A [`Schema`] is built fresh for every resolution. It holds the resolution
//! order, the per-source namespacing parameters taken from the directive, and
//! one [`FieldDescriptor`] per declared field. Nested records become child
//! schemas when their fields are registered.

use core::fmt;
use std::string::{String, ToString};
use std::vec::Vec;

use indexmap::IndexMap;

use crate::error::{ConfigError, Result};
use crate::layers::Sources;
use crate::macros::{debug, trace};
use crate::tag::{Params, parse_tag, split_param_key};

pub(crate) mod record;


pub use record::{Bind, Binding, Configure, Element, Record, SeqSlot, Slot};

/// The directive key holding the resolution order.
const ORDER_KEY: &str = "order";

/// Scalar kinds a field (or a sequence element) can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// `true`/`false`
    Bool,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// Pointer-sized signed integer
    Isize,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// Pointer-sized unsigned integer
    Usize,
    /// Single precision float
    F32,
    /// Double precision float
    F64,
    /// Text, taken verbatim
    Str,
}

impl Scalar {
    /// Short lowercase name, as used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Scalar::Bool => "bool",
            Scalar::I8 => "i8",
            Scalar::I16 => "i16",
            Scalar::I32 => "i32",
            Scalar::I64 => "i64",
            Scalar::Isize => "isize",
            Scalar::U8 => "u8",
            Scalar::U16 => "u16",
            Scalar::U32 => "u32",
            Scalar::U64 => "u64",
            Scalar::Usize => "usize",
            Scalar::F32 => "f32",
            Scalar::F64 => "f64",
            Scalar::Str => "string",
        }
    }
}

/// The declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// A single value.
    Scalar(Scalar),
    /// A sequence of values; the payload is the element kind.
    Sequence(Scalar),
    /// A nested record with its own schema.
    Record,
    /// Anything that cannot be coerced from text.
    Unsupported(&'static str),
}

impl Kind {
    /// True for sequence kinds, which sources register as accumulating.
    pub const fn is_sequence(self) -> bool {
        matches!(self, Kind::Sequence(_))
    }

    /// True for plain booleans.
    pub const fn is_bool(self) -> bool {
        matches!(self, Kind::Scalar(Scalar::Bool))
    }
}

/// Where a field's value is written.
pub(crate) enum Target<'a> {
    Scalar(Slot<'a>),
    Sequence(SeqSlot<'a>),
    /// A nested record waiting to be parsed during registration.
    Pending {
        type_name: &'static str,
        target: &'a mut dyn Configure,
    },
    /// A nested record already parsed into `children[index]`.
    Child(usize),
    Unsupported,
}

impl<'a> From<Binding<'a>> for Target<'a> {
    fn from(binding: Binding<'a>) -> Self {
        match binding {
            Binding::Scalar(slot) => Target::Scalar(slot),
            Binding::Sequence(seq) => Target::Sequence(seq),
            Binding::Record { type_name, target } => Target::Pending { type_name, target },
            Binding::Unsupported(_) => Target::Unsupported,
        }
    }
}

/// One field of a record, ready for registration.
pub struct FieldDescriptor<'a> {
    pub(crate) name: String,
    pub(crate) kind: Kind,
    /// Explicit lookup keys, by source name.
    pub(crate) source_keys: IndexMap<String, String>,
    /// The whole field tag, handed to sources for auxiliary parameters.
    pub(crate) params: Params,
    pub(crate) target: Target<'a>,
}

impl FieldDescriptor<'_> {
    /// The field name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Explicit per-source keys from the field tag.
    pub fn source_keys(&self) -> &IndexMap<String, String> {
        &self.source_keys
    }

    /// Every pair of the field tag, including auxiliary ones like `desc`.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The key this field is looked up under in `source`.
    pub fn key_for(&self, source: &str) -> &str {
        effective_key(&self.source_keys, &self.name, source)
    }

    /// Index of the child schema, for nested records that were registered.
    pub fn child_index(&self) -> Option<usize> {
        match self.target {
            Target::Child(index) => Some(index),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("source_keys", &self.source_keys)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// The key a field is registered and queried under for one source.
pub(crate) fn effective_key<'k>(
    source_keys: &'k IndexMap<String, String>,
    field: &'k str,
    source: &str,
) -> &'k str {
    source_keys.get(source).map(String::as_str).unwrap_or(field)
}

/// Parsed metadata for one record.
pub struct Schema<'a> {
    pub(crate) type_name: &'static str,
    /// Field names from the root down to this record; empty for the root.
    pub(crate) path: Vec<String>,
    pub(crate) order: Vec<String>,
    pub(crate) source_params: IndexMap<String, Params>,
    pub(crate) fields: IndexMap<String, FieldDescriptor<'a>>,
    pub(crate) children: Vec<Schema<'a>>,
}

impl<'a> Schema<'a> {
    /// Parse the schema of a root record.
    ///
    /// Fails with [`ConfigError::UnsupportedType`] when the target rejects
    /// itself, [`ConfigError::InvalidOrder`] when the `order` directive names
    /// an unknown source, and [`ConfigError::InvalidNamespacePrefix`] when a
    /// source refuses its parameters.
    pub fn parse<C: Configure>(target: &'a mut C, sources: &Sources) -> Result<Self> {
        Self::parse_dyn(target, core::any::type_name::<C>(), sources, None)
    }

    pub(crate) fn parse_dyn(
        target: &'a mut dyn Configure,
        type_name: &'static str,
        sources: &Sources,
        parent: Option<(&[String], &[String])>,
    ) -> Result<Self> {
        let mut record = Record::new();
        target.describe(&mut record);

        if record.rejected {
            return Err(ConfigError::UnsupportedType { type_name });
        }

        let (path, inherited_order) = match parent {
            Some((parent_path, parent_order)) => (parent_path.to_vec(), Some(parent_order)),
            None => (Vec::new(), None),
        };

        let mut schema = Schema {
            type_name,
            path,
            order: inherited_order
                .map(<[String]>::to_vec)
                .unwrap_or_else(|| sources.names().map(ToString::to_string).collect()),
            source_params: IndexMap::new(),
            fields: IndexMap::new(),
            children: Vec::new(),
        };

        if let Some(directive) = record.directive.as_deref() {
            schema.parse_directive(directive, sources)?;
        }

        for (source_name, params) in &schema.source_params {
            if let Some(source) = sources.get(source_name) {
                source.check_params(params)?;
            }
        }

        debug!(
            record = type_name,
            fields = record.fields.len(),
            order = ?schema.order,
            "schema: parsed record"
        );

        for decl in record.fields {
            let params = parse_tag(&decl.tag);
            let source_keys = params
                .iter()
                .filter(|(name, _)| sources.contains(name.as_str()))
                .map(|(name, key)| (name.clone(), key.clone()))
                .collect();
            trace!(field = %decl.name, ?params, "schema: parsed field");

            if schema.fields.contains_key(&decl.name) {
                return Err(ConfigError::DuplicateField {
                    record: type_name,
                    field: dotted(&schema.path, &decl.name),
                });
            }

            schema.fields.insert(
                decl.name.clone(),
                FieldDescriptor {
                    kind: decl.binding.kind(),
                    name: decl.name,
                    source_keys,
                    params,
                    target: decl.binding.into(),
                },
            );
        }

        Ok(schema)
    }

    fn parse_directive(&mut self, directive: &str, sources: &Sources) -> Result<()> {
        for (name, value) in parse_tag(directive) {
            if name == ORDER_KEY {
                let order: Vec<String> = value.split(',').map(ToString::to_string).collect();
                if let Some(unknown) = order.iter().find(|token| !sources.contains(token.as_str())) {
                    return Err(ConfigError::InvalidOrder {
                        name: unknown.clone(),
                    });
                }
                self.order = order;
                continue;
            }

            // envPrefix:"APP" becomes source_params["env"]["prefix"] = "APP"
            if let Some((source, param)) = split_param_key(&name) {
                self.source_params
                    .entry(source)
                    .or_default()
                    .insert(param, value);
            }
        }
        Ok(())
    }

    /// Rust type name of the record.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Sources consulted for every field, in order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Namespacing parameters for every source that has some.
    pub fn source_params(&self) -> &IndexMap<String, Params> {
        &self.source_params
    }

    /// The parameters passed to `source` on init.
    pub fn params_for(&self, source: &str) -> Option<&Params> {
        self.source_params.get(source)
    }

    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<'a>> {
        self.fields.get(name)
    }

    /// Every field, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor<'a>> {
        self.fields.values()
    }

    /// Schemas of nested records, once registered.
    pub fn children(&self) -> &[Schema<'a>] {
        &self.children
    }

    /// Field names leading from the root record to this one.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// True for the schema a resolution was started with.
    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Dotted path of one of this record's fields, e.g. `Database.Host`.
    pub(crate) fn field_path(&self, field: &str) -> String {
        dotted(&self.path, field)
    }
}

impl fmt::Debug for Schema<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("path", &self.path)
            .field("order", &self.order)
            .field("source_params", &self.source_params)
            .field("fields", &self.fields)
            .field("children", &self.children)
            .finish()
    }
}

pub(crate) fn dotted(path: &[String], field: &str) -> String {
    let mut out = String::new();
    for segment in path {
        out.push_str(segment);
        out.push('.');
    }
    out.push_str(field);
    out
}
