//! Tests for the provenance report returned by a resolution.

use crate::{plain, sources};
use figbind::{Configure, Origin, Record, Resolver, ResolvedValue};

#[derive(Default)]
struct Service {
    host: String,
    port: u16,
    verbose: bool,
    peers: Vec<String>,
}

impl Configure for Service {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .directive(r#"envPrefix:"SVC""#)
            .field("Host", &mut self.host)
            .field("Port", &mut self.port)
            .tag(r#"cmd:"listen""#)
            .field("Verbose", &mut self.verbose)
            .field("Peers", &mut self.peers);
    }
}

fn resolve_sample() -> figbind::Report {
    let mut sources = sources(
        &[("SVC_HOST", "a.local"), ("SVC_PORT", "80"), ("SVC_PEERS", "p1")],
        &["--listen", "8080", "--peers", "p2"],
    );
    let mut service = Service::default();
    Resolver::new(&mut sources).resolve(&mut service).unwrap()
}

#[test]
fn plain_report() {
    let report = resolve_sample();
    insta::assert_snapshot!(report.to_string().trim_end(), @r#"
    Host = "a.local" <- env(Host)
    Port = "8080" <- cmd(listen)
    Verbose = "false" (default)
    Peers = ["p1", "p2"] <- env(Peers), cmd(Peers)
    "#);
}

#[test]
fn colored_report_has_same_text() {
    let report = resolve_sample();
    assert_eq!(plain(&report.render(true)), report.render(false));
}

#[test]
fn report_lookup() {
    let report = resolve_sample();

    let port = report.get("Port").unwrap();
    assert_eq!(port.value, ResolvedValue::Scalar("8080".into()));
    assert_eq!(port.winner(), Some(&Origin::new("cmd", "listen")));

    let peers = report.get("Peers").unwrap();
    assert_eq!(peers.origins.len(), 2);
    assert!(report.get("Verbose").unwrap().is_default());
}

#[test]
fn scalar_values_are_reported_after_coercion() {
    let mut sources = sources(&[("SVC_PORT", "0080")], &[]);
    let mut service = Service::default();
    let report = Resolver::new(&mut sources).resolve(&mut service).unwrap();

    let port = report.get("Port").unwrap();
    assert_eq!(port.value, ResolvedValue::Scalar("80".into()));
    assert_eq!(port.winner(), Some(&Origin::new("env", "Port")));
}
