//! Resolve a small record from the environment and the command line.
//!
//! ```text
//! cargo run --example demo -- -h
//! cargo run --example demo -- -local-addr=test
//! cargo run --example demo -- -local-addr test -remote-addr test
//! BAR_REMOTE_ADDR=test cargo run --example demo
//! BAR_LOCAL_ADDR=test cargo run --example demo -- -local-addr=override
//! RUST_LOG=figbind=trace cargo run --example demo
//! ```

use figbind::{Configure, Record};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Config {
    remote_addr: String,
    local_addr: String,
    verbose: bool,
}

impl Configure for Config {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .directive(r#"envPrefix:"BAR" order:"cmd,env""#)
            .field("RemoteAddr", &mut self.remote_addr)
            .tag(r#"env:"REMOTE_ADDR" cmd:"remote-addr" desc:"Address of the remote peer""#)
            .field("LocalAddr", &mut self.local_addr)
            .tag(r#"env:"LOCAL_ADDR" cmd:"local-addr" desc:"Address to bind locally""#)
            .field("Verbose", &mut self.verbose)
            .tag(r#"desc:"Print where every value came from""#);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::default();
    let report = match figbind::resolve(&mut config) {
        Ok(report) => report,
        Err(err) if err.is_help_request() => {
            print!("{err}");
            return;
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    println!("{config:#?}");
    if config.verbose {
        print!("{}", report.render(true));
    }
}
