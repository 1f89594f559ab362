//! Integration tests for figbind.

mod help;
mod layered;
mod properties;
mod report;

use figbind::{CommandLine, Env, MockEnv, Sources};

/// A registry with a mock environment and injected arguments, registered in
/// the standard `env`, `cmd` order.
pub fn sources(env: &[(&str, &str)], args: &[&str]) -> Sources {
    Sources::new()
        .with(
            "env",
            Env::builder()
                .vars(MockEnv::from_pairs(env.iter().copied()))
                .build(),
        )
        .with(
            "cmd",
            CommandLine::with_args(args.iter().copied()).program("figbind-test"),
        )
}

/// Remove terminal colors from rendered text.
pub fn plain(text: &str) -> String {
    String::from_utf8(strip_ansi_escapes::strip(text)).unwrap()
}
