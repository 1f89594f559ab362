//! The describe API: how a record hands its fields to the schema parser.
//!
//! A record implements [`Configure`] and, inside [`Configure::describe`],
//! binds each field's storage to a name and an optional tag:
//!
//! ```rust
//! use figbind::{Configure, Record};
//!
//! #[derive(Default)]
//! struct Config {
//!     bind_addr: String,
//!     workers: u16,
//! }
//!
//! impl Configure for Config {
//!     fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
//!         record
//!             .directive(r#"envPrefix:"APP" order:"env,cmd""#)
//!             .field("BindAddr", &mut self.bind_addr)
//!             .tag(r#"env:"BIND_ADDR" cmd:"bind-addr""#)
//!             .field("Workers", &mut self.workers);
//!     }
//! }
//! ```

use std::collections::HashMap;
use std::string::String;
use std::vec::Vec;

use super::{Kind, Scalar};

/// A record type whose fields can be resolved from sources.
pub trait Configure {
    /// Declare the directive and bind every field of this record.
    fn describe<'a>(&'a mut self, record: &mut Record<'a>);
}

impl<C: Configure + ?Sized> Configure for Box<C> {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        (**self).describe(record)
    }
}

/// An optional record is a record when present. An empty one has nothing to
/// write into and is rejected.
impl<C: Configure> Configure for Option<C> {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        match self {
            Some(inner) => inner.describe(record),
            None => {
                record.reject();
            }
        }
    }
}

/// Collects what a record declares about itself.
pub struct Record<'a> {
    pub(crate) directive: Option<String>,
    pub(crate) fields: Vec<FieldDecl<'a>>,
    pub(crate) rejected: bool,
}

/// One declared field, before parsing.
pub(crate) struct FieldDecl<'a> {
    pub(crate) name: String,
    pub(crate) tag: String,
    pub(crate) binding: Binding<'a>,
}

impl<'a> Record<'a> {
    pub(crate) fn new() -> Self {
        Self {
            directive: None,
            fields: Vec::new(),
            rejected: false,
        }
    }

    /// Set the directive tag: `order:"..."` and `<source><Param>:"..."` pairs.
    pub fn directive(&mut self, tag: impl Into<String>) -> &mut Self {
        self.directive = Some(tag.into());
        self
    }

    /// Bind a scalar or sequence field.
    pub fn field<T: Bind + ?Sized>(&mut self, name: impl Into<String>, target: &'a mut T) -> &mut Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            tag: String::new(),
            binding: target.bind(),
        });
        self
    }

    /// Bind a nested record field.
    pub fn nested<C: Configure>(&mut self, name: impl Into<String>, target: &'a mut C) -> &mut Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            tag: String::new(),
            binding: Binding::Record {
                type_name: core::any::type_name::<C>(),
                target,
            },
        });
        self
    }

    /// Attach a tag to the most recently declared field.
    pub fn tag(&mut self, tag: impl Into<String>) -> &mut Self {
        if let Some(last) = self.fields.last_mut() {
            last.tag = tag.into();
        }
        self
    }

    /// Mark this value as not being a record at all.
    pub fn reject(&mut self) -> &mut Self {
        self.rejected = true;
        self
    }
}

/// Mutable storage for one scalar field.
#[derive(Debug)]
pub enum Slot<'a> {
    /// `bool`
    Bool(&'a mut bool),
    /// `i8`
    I8(&'a mut i8),
    /// `i16`
    I16(&'a mut i16),
    /// `i32`
    I32(&'a mut i32),
    /// `i64`
    I64(&'a mut i64),
    /// `isize`
    Isize(&'a mut isize),
    /// `u8`
    U8(&'a mut u8),
    /// `u16`
    U16(&'a mut u16),
    /// `u32`
    U32(&'a mut u32),
    /// `u64`
    U64(&'a mut u64),
    /// `usize`
    Usize(&'a mut usize),
    /// `f32`
    F32(&'a mut f32),
    /// `f64`
    F64(&'a mut f64),
    /// `String`
    Str(&'a mut String),
}

impl Slot<'_> {
    /// The scalar kind stored behind this slot.
    pub fn scalar(&self) -> Scalar {
        match self {
            Slot::Bool(_) => Scalar::Bool,
            Slot::I8(_) => Scalar::I8,
            Slot::I16(_) => Scalar::I16,
            Slot::I32(_) => Scalar::I32,
            Slot::I64(_) => Scalar::I64,
            Slot::Isize(_) => Scalar::Isize,
            Slot::U8(_) => Scalar::U8,
            Slot::U16(_) => Scalar::U16,
            Slot::U32(_) => Scalar::U32,
            Slot::U64(_) => Scalar::U64,
            Slot::Usize(_) => Scalar::Usize,
            Slot::F32(_) => Scalar::F32,
            Slot::F64(_) => Scalar::F64,
            Slot::Str(_) => Scalar::Str,
        }
    }

    /// The current value as text, the seed of the fallback chain.
    ///
    /// Floats use the shortest text that parses back to the same value.
    pub fn render(&self) -> String {
        match self {
            Slot::Bool(v) => v.to_string(),
            Slot::I8(v) => v.to_string(),
            Slot::I16(v) => v.to_string(),
            Slot::I32(v) => v.to_string(),
            Slot::I64(v) => v.to_string(),
            Slot::Isize(v) => v.to_string(),
            Slot::U8(v) => v.to_string(),
            Slot::U16(v) => v.to_string(),
            Slot::U32(v) => v.to_string(),
            Slot::U64(v) => v.to_string(),
            Slot::Usize(v) => v.to_string(),
            Slot::F32(v) => v.to_string(),
            Slot::F64(v) => v.to_string(),
            Slot::Str(v) => (**v).clone(),
        }
    }
}

/// Mutable storage for one sequence field.
#[derive(Debug)]
pub enum SeqSlot<'a> {
    /// `Vec<String>`
    Str(&'a mut Vec<String>),
    /// `Vec<i8>`
    I8(&'a mut Vec<i8>),
    /// `Vec<i16>`
    I16(&'a mut Vec<i16>),
    /// `Vec<i32>`
    I32(&'a mut Vec<i32>),
    /// `Vec<i64>`
    I64(&'a mut Vec<i64>),
    /// `Vec<isize>`
    Isize(&'a mut Vec<isize>),
    /// `Vec<u8>`
    U8(&'a mut Vec<u8>),
    /// `Vec<u16>`
    U16(&'a mut Vec<u16>),
    /// `Vec<u32>`
    U32(&'a mut Vec<u32>),
    /// `Vec<u64>`
    U64(&'a mut Vec<u64>),
    /// `Vec<usize>`
    Usize(&'a mut Vec<usize>),
    /// An element kind that sequences do not fill (floats, booleans).
    /// Values offered for it are dropped.
    Skipped(Scalar),
}

impl SeqSlot<'_> {
    /// The element kind of this sequence.
    pub fn element(&self) -> Scalar {
        match self {
            SeqSlot::Str(_) => Scalar::Str,
            SeqSlot::I8(_) => Scalar::I8,
            SeqSlot::I16(_) => Scalar::I16,
            SeqSlot::I32(_) => Scalar::I32,
            SeqSlot::I64(_) => Scalar::I64,
            SeqSlot::Isize(_) => Scalar::Isize,
            SeqSlot::U8(_) => Scalar::U8,
            SeqSlot::U16(_) => Scalar::U16,
            SeqSlot::U32(_) => Scalar::U32,
            SeqSlot::U64(_) => Scalar::U64,
            SeqSlot::Usize(_) => Scalar::Usize,
            SeqSlot::Skipped(scalar) => *scalar,
        }
    }

    /// Every element as text.
    pub fn render(&self) -> Vec<String> {
        fn texts<T: ToString>(items: &[T]) -> Vec<String> {
            items.iter().map(ToString::to_string).collect()
        }

        match self {
            SeqSlot::Str(v) => (**v).clone(),
            SeqSlot::I8(v) => texts(v.as_slice()),
            SeqSlot::I16(v) => texts(v.as_slice()),
            SeqSlot::I32(v) => texts(v.as_slice()),
            SeqSlot::I64(v) => texts(v.as_slice()),
            SeqSlot::Isize(v) => texts(v.as_slice()),
            SeqSlot::U8(v) => texts(v.as_slice()),
            SeqSlot::U16(v) => texts(v.as_slice()),
            SeqSlot::U32(v) => texts(v.as_slice()),
            SeqSlot::U64(v) => texts(v.as_slice()),
            SeqSlot::Usize(v) => texts(v.as_slice()),
            SeqSlot::Skipped(_) => Vec::new(),
        }
    }
}

/// A field's storage, tagged with its kind.
pub enum Binding<'a> {
    /// A single scalar value.
    Scalar(Slot<'a>),
    /// A growable sequence of scalars.
    Sequence(SeqSlot<'a>),
    /// A nested record, parsed into a child schema during registration.
    Record {
        /// Rust type name of the nested record.
        type_name: &'static str,
        /// The nested record itself.
        target: &'a mut dyn Configure,
    },
    /// A type that cannot be coerced from text.
    Unsupported(&'static str),
}

impl Binding<'_> {
    /// The declared kind of the bound field.
    pub fn kind(&self) -> Kind {
        match self {
            Binding::Scalar(slot) => Kind::Scalar(slot.scalar()),
            Binding::Sequence(seq) => Kind::Sequence(seq.element()),
            Binding::Record { .. } => Kind::Record,
            Binding::Unsupported(what) => Kind::Unsupported(*what),
        }
    }
}

/// Field types that can be bound with [`Record::field`].
pub trait Bind {
    /// Borrow the storage of this value.
    fn bind(&mut self) -> Binding<'_>;
}

/// Element types of `Vec<T>` fields.
pub trait Element: Sized {
    /// Borrow a sequence of this element type.
    fn bind_seq(seq: &mut Vec<Self>) -> SeqSlot<'_>;
}

macro_rules! scalar_bind {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Bind for $ty {
                fn bind(&mut self) -> Binding<'_> {
                    Binding::Scalar(Slot::$variant(self))
                }
            }
        )*
    };
}

scalar_bind! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => Str,
}

macro_rules! seq_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                fn bind_seq(seq: &mut Vec<Self>) -> SeqSlot<'_> {
                    SeqSlot::$variant(seq)
                }
            }
        )*
    };
}

seq_element! {
    String => Str,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
}

impl Element for bool {
    fn bind_seq(_: &mut Vec<Self>) -> SeqSlot<'_> {
        SeqSlot::Skipped(Scalar::Bool)
    }
}

impl Element for f32 {
    fn bind_seq(_: &mut Vec<Self>) -> SeqSlot<'_> {
        SeqSlot::Skipped(Scalar::F32)
    }
}

impl Element for f64 {
    fn bind_seq(_: &mut Vec<Self>) -> SeqSlot<'_> {
        SeqSlot::Skipped(Scalar::F64)
    }
}

impl<T: Element> Bind for Vec<T> {
    fn bind(&mut self) -> Binding<'_> {
        Binding::Sequence(T::bind_seq(self))
    }
}

impl<T, const N: usize> Bind for [T; N] {
    fn bind(&mut self) -> Binding<'_> {
        Binding::Unsupported("fixed-size array")
    }
}

impl<T> Bind for Option<T> {
    fn bind(&mut self) -> Binding<'_> {
        Binding::Unsupported("optional")
    }
}

impl<T: ?Sized> Bind for Box<T> {
    fn bind(&mut self) -> Binding<'_> {
        Binding::Unsupported("pointer")
    }
}

impl<K, V, S> Bind for HashMap<K, V, S> {
    fn bind(&mut self) -> Binding<'_> {
        Binding::Unsupported("map")
    }
}

impl Bind for char {
    fn bind(&mut self) -> Binding<'_> {
        Binding::Unsupported("char")
    }
}
