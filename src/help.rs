//! Help text generation for the command-line source.
//!
//! The text is built from the flags registered during a resolution, so it
//! lists exactly what the command line will accept.

use owo_colors::OwoColorize;
use std::string::String;

use crate::schema::{Kind, Scalar};

/// Configuration for help text generation.
#[derive(Debug, Clone, Default)]
pub struct HelpConfig {
    /// Program name (defaults to executable name)
    pub program_name: Option<String>,
    /// Program version
    pub version: Option<String>,
    /// Additional description to show before the usage line
    pub description: Option<String>,
}

/// What the help text knows about one flag.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagDoc {
    /// Flag name without dashes, e.g. `bind-addr`.
    pub name: String,
    /// Declared kind of the field behind the flag.
    pub kind: Kind,
    /// The `desc` param of the field tag.
    pub description: Option<String>,
}

/// Generate help text for a list of flags.
pub fn generate_help(flags: &[FlagDoc], config: &HelpConfig) -> String {
    let mut out = String::new();

    let program_name = config
        .program_name
        .clone()
        .or_else(|| std::env::args().next())
        .unwrap_or_else(|| "program".to_string());

    if let Some(version) = &config.version {
        out.push_str(&format!("{program_name} {version}\n\n"));
    }

    if let Some(desc) = &config.description {
        out.push_str(desc);
        out.push_str("\n\n");
    }

    out.push_str(&format!("{}:\n    ", "USAGE".yellow().bold()));
    out.push_str(&program_name);
    out.push_str(" [OPTIONS]\n\n");

    out.push_str(&format!("{}:\n", "OPTIONS".yellow().bold()));
    for flag in flags {
        write_flag_help(&mut out, flag);
    }
    out.push_str(&format!("    {}, {}\n", "-h".green(), "--help".green()));
    out.push_str("            Print help\n");

    out
}

fn placeholder(scalar: Scalar) -> String {
    format!("<{}>", scalar.name().to_uppercase())
}

fn write_flag_help(out: &mut String, flag: &FlagDoc) {
    // no short flags, keep long flags aligned with `-h, --help`
    out.push_str("        ");
    out.push_str(&format!("{}", format!("--{}", flag.name).green()));

    match flag.kind {
        Kind::Scalar(Scalar::Bool) => {}
        Kind::Scalar(scalar) | Kind::Sequence(scalar) => {
            out.push(' ');
            out.push_str(&placeholder(scalar));
        }
        Kind::Record | Kind::Unsupported(_) => out.push_str(" <VALUE>"),
    }

    if let Some(desc) = flag.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str("\n            ");
        out.push_str(desc.trim());
    }

    if flag.kind.is_sequence() {
        out.push_str("\n            ");
        out.push_str("[can be repeated]");
    }

    out.push('\n');
}
