//! Tests for help text produced by the command-line source.

use crate::{plain, sources};
use figbind::{CommandLine, Configure, Record, Resolver, Sources};

#[derive(Default)]
struct Server {
    bind_addr: String,
    verbose: bool,
    tags: Vec<String>,
}

impl Configure for Server {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .field("BindAddr", &mut self.bind_addr)
            .tag(r#"desc:"Address to listen on""#)
            .field("Verbose", &mut self.verbose)
            .tag(r#"desc:"Enable verbose logging""#)
            .field("Tags", &mut self.tags);
    }
}

#[test]
fn help_flag_returns_usage() {
    let mut sources = sources(&[], &["--help"]);
    let err = Resolver::new(&mut sources)
        .resolve(&mut Server::default())
        .unwrap_err();

    assert!(err.is_help_request());
    let help = plain(err.help_text().unwrap());

    insta::assert_snapshot!(help.trim_end(), @r"
    USAGE:
        figbind-test [OPTIONS]

    OPTIONS:
            --bind-addr <STRING>
                Address to listen on
            --verbose
                Enable verbose logging
            --tags <STRING>
                [can be repeated]
        -h, --help
                Print help
    ");
}

#[test]
fn short_help_spellings() {
    for spelling in ["-h", "-help"] {
        let mut sources = sources(&[], &[spelling]);
        let err = Resolver::new(&mut sources)
            .resolve(&mut Server::default())
            .unwrap_err();
        assert!(err.is_help_request(), "{spelling}");
    }
}

#[test]
fn help_after_terminator_is_ignored() {
    let mut sources = sources(&[], &["--verbose", "--", "--help"]);
    let mut server = Server::default();
    Resolver::new(&mut sources).resolve(&mut server).unwrap();
    assert!(server.verbose);
}

#[test]
fn banner_and_description() {
    let mut sources = Sources::new().with(
        "cmd",
        CommandLine::with_args(["-h"])
            .program("reef")
            .version("0.3.1")
            .description("Serves coral over HTTP."),
    );
    let err = Resolver::new(&mut sources)
        .resolve(&mut Server::default())
        .unwrap_err();
    let help = plain(&err.to_string());
    assert!(help.starts_with("reef 0.3.1\n\nServes coral over HTTP.\n\nUSAGE:\n    reef [OPTIONS]"));
}

#[test]
fn cmd_desc_is_an_alternate_description() {
    #[derive(Default)]
    struct Legacy {
        remote_addr: String,
    }

    impl Configure for Legacy {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .field("RemoteAddr", &mut self.remote_addr)
                .tag(r#"cmd:"remote-addr" cmdDesc:"Peer to dial""#);
        }
    }

    let mut sources = sources(&[], &["-h"]);
    let err = Resolver::new(&mut sources)
        .resolve(&mut Legacy::default())
        .unwrap_err();
    let help = plain(err.help_text().unwrap());
    assert!(help.contains("--remote-addr <STRING>\n            Peer to dial"), "{help}");
}
