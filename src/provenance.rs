//! Provenance tracking: which source each resolved value came from.
//!
//! Every resolution returns a [`Report`] with one [`Resolved`] entry per
//! scalar and sequence field, keyed by the dotted field path:
//!
//! ```text
//! Database.Host = "db.internal" <- env(Host)
//! Tags = ["a", "b"] <- env(Tags), cmd(tags)
//! Verbose = "false" (default)
//! ```

use core::fmt;
use std::string::String;
use std::vec::Vec;

use indexmap::IndexMap;
use owo_colors::OwoColorize;

/// One source that contributed to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Source name, e.g. `env`.
    pub source: String,
    /// Key the field was looked up under in that source.
    pub key: String,
}

impl Origin {
    /// Create an origin.
    pub fn new(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.source, self.key)
    }
}

/// A resolved value, rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// The field's value after coercion, rendered back to text, so `01`
    /// given for an integer reads `1`.
    Scalar(String),
    /// Every element, in order.
    Sequence(Vec<String>),
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedValue::Scalar(value) => write!(f, "{value:?}"),
            ResolvedValue::Sequence(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value:?}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// The outcome for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Dotted field path, e.g. `Database.Host`.
    pub path: String,
    /// The value written into the field.
    pub value: ResolvedValue,
    /// Sources that produced the value. Empty when the pre-populated value
    /// was kept.
    pub origins: Vec<Origin>,
}

impl Resolved {
    /// True when no source contributed.
    pub fn is_default(&self) -> bool {
        self.origins.is_empty()
    }

    /// The source that decided a scalar value, or the last contributor of a
    /// sequence.
    pub fn winner(&self) -> Option<&Origin> {
        self.origins.last()
    }
}

/// Where every field of a resolution got its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: IndexMap<String, Resolved>,
}

impl Report {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, resolved: Resolved) {
        self.entries.insert(resolved.path.clone(), resolved);
    }

    /// Look up a field by dotted path.
    pub fn get(&self, path: &str) -> Option<&Resolved> {
        self.entries.get(path)
    }

    /// Every entry, in population order.
    pub fn entries(&self) -> impl Iterator<Item = &Resolved> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render one line per entry, optionally with terminal colors.
    pub fn render(&self, colored: bool) -> String {
        if !colored {
            return self.to_string();
        }

        let mut out = String::new();
        for entry in self.entries() {
            out.push_str(&format!(
                "{} = {}",
                entry.path.bold(),
                entry.value.to_string().green()
            ));
            if entry.is_default() {
                out.push_str(&format!(" {}", "(default)".bright_black()));
            } else {
                out.push_str(&format!(" {} ", "<-".dimmed()));
                for (i, origin) in entry.origins.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&format!(
                        "{}({})",
                        origin.source.cyan(),
                        origin.key.yellow()
                    ));
                }
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            write!(f, "{} = {}", entry.path, entry.value)?;
            if entry.is_default() {
                f.write_str(" (default)")?;
            } else {
                f.write_str(" <- ")?;
                for (i, origin) in entry.origins.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{origin}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
