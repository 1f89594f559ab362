//! Tests for the fallback chain across the environment and the command line.

use crate::sources;
use figbind::{ConfigError, Configure, Record, Resolver, Sources, Stage};

/// Environment first, command line last.
#[derive(Debug, Default)]
struct Foo {
    bind_addr: String,
}

impl Configure for Foo {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .directive(r#"envPrefix:"FOO" order:"env,cmd""#)
            .field("BindAddr", &mut self.bind_addr)
            .tag(r#"env:"BIND_ADDR" cmd:"bind-addr""#);
    }
}

/// Command line first, environment last.
#[derive(Debug, Default)]
struct Bar {
    remote_addr: String,
    local_addr: String,
}

impl Configure for Bar {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .directive(r#"envPrefix:"BAR" order:"cmd,env""#)
            .field("RemoteAddr", &mut self.remote_addr)
            .tag(r#"env:"REMOTE_ADDR" cmd:"remote-addr""#)
            .field("LocalAddr", &mut self.local_addr)
            .tag(r#"env:"LOCAL_ADDR" cmd:"local-addr""#);
    }
}

fn resolve<C: Configure>(sources: &mut Sources, target: &mut C) -> Result<(), ConfigError> {
    Resolver::new(sources).resolve(target).map(|_| ())
}

#[test]
fn command_line_only() {
    let mut sources = sources(&[], &["-bind-addr", "abcdef"]);
    let mut foo = Foo::default();
    resolve(&mut sources, &mut foo).unwrap();
    assert_eq!(foo.bind_addr, "abcdef");
}

#[test]
fn multiple_fields_from_command_line() {
    let mut sources = sources(&[], &["-remote-addr", "foo", "-local-addr", "bar"]);
    let mut bar = Bar::default();
    resolve(&mut sources, &mut bar).unwrap();
    assert_eq!(bar.remote_addr, "foo");
    assert_eq!(bar.local_addr, "bar");
}

#[test]
fn environment_only() {
    let mut sources = sources(&[("FOO_BIND_ADDR", "bindaddr")], &[]);
    let mut foo = Foo::default();
    resolve(&mut sources, &mut foo).unwrap();
    assert_eq!(foo.bind_addr, "bindaddr");
}

#[test]
fn last_source_in_order_wins() {
    let mut sources = sources(&[("FOO_BIND_ADDR", "def")], &["-bind-addr", "abc"]);
    let mut foo = Foo::default();
    resolve(&mut sources, &mut foo).unwrap();
    assert_eq!(foo.bind_addr, "abc");

    let mut reversed = crate::sources(&[("BAR_REMOTE_ADDR", "def")], &["-remote-addr", "abc"]);
    let mut bar = Bar::default();
    resolve(&mut reversed, &mut bar).unwrap();
    assert_eq!(bar.remote_addr, "def");
}

#[test]
fn empty_environment_value_is_absent() {
    let mut sources = sources(&[("BAR_REMOTE_ADDR", "")], &["-remote-addr", "abc"]);
    let mut bar = Bar::default();
    resolve(&mut sources, &mut bar).unwrap();
    assert_eq!(bar.remote_addr, "abc");
}

#[test]
fn pre_populated_value_survives_when_no_source_answers() {
    let mut sources = sources(&[], &[]);
    let mut foo = Foo {
        bind_addr: "127.0.0.1:80".into(),
    };
    resolve(&mut sources, &mut foo).unwrap();
    assert_eq!(foo.bind_addr, "127.0.0.1:80");
}

#[test]
fn pre_populated_floats_survive_when_no_source_answers() {
    #[derive(Default)]
    struct Tuning {
        ratio: f64,
        single: f32,
    }

    impl Configure for Tuning {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .field("Ratio", &mut self.ratio)
                .field("Single", &mut self.single);
        }
    }

    let mut sources = sources(&[], &[]);
    let mut tuning = Tuning {
        ratio: 1e-9,
        single: 0.001_234_567,
    };
    resolve(&mut sources, &mut tuning).unwrap();
    assert_eq!(tuning.ratio, 1e-9);
    assert_eq!(tuning.single, 0.001_234_567);
}

#[test]
fn override_keys_keep_their_punctuation() {
    #[derive(Default)]
    struct Listener {
        addr: String,
        port: u16,
    }

    impl Configure for Listener {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .field("Addr", &mut self.addr)
                .tag(r#"cmd:"bind_addr""#)
                .field("Port", &mut self.port)
                .tag(r#"env:"listen.port""#);
        }
    }

    let mut sources = sources(&[("LISTEN.PORT", "8080")], &["-bind_addr", "x"]);
    let mut listener = Listener::default();
    resolve(&mut sources, &mut listener).unwrap();
    assert_eq!(listener.addr, "x");
    assert_eq!(listener.port, 8080);
}

#[test]
fn duplicate_field_names_fail_before_anything_is_populated() {
    #[derive(Default)]
    struct Twice {
        first: String,
        second: String,
    }

    impl Configure for Twice {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .field("Host", &mut self.first)
                .field("Host", &mut self.second);
        }
    }

    let mut sources = sources(&[("HOST", "h")], &[]);
    let mut twice = Twice::default();
    let mut resolver = Resolver::new(&mut sources);
    let err = resolver.resolve(&mut twice).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DuplicateField { ref field, .. } if field == "Host"
    ));
    assert_eq!(resolver.stage(), Stage::Unparsed);
    assert_eq!(twice.first, "");
    assert_eq!(twice.second, "");
}

#[test]
fn unknown_source_in_order_populates_nothing() {
    #[derive(Default)]
    struct Baz {
        name: String,
    }

    impl Configure for Baz {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .directive(r#"order:"FOO,BAR""#)
                .field("Name", &mut self.name);
        }
    }

    let mut sources = sources(&[("NAME", "x")], &["--name", "y"]);
    let mut baz = Baz::default();
    let mut resolver = Resolver::new(&mut sources);
    let err = resolver.resolve(&mut baz).unwrap_err();

    assert_eq!(err, ConfigError::InvalidOrder { name: "FOO".into() });
    assert_eq!(err.to_string(), "invalid order: `FOO` is not a registered source");
    assert_eq!(resolver.stage(), Stage::Unparsed);
    assert_eq!(baz.name, "");
}

#[test]
fn invalid_prefix_fails() {
    #[derive(Default)]
    struct Bay {
        name: String,
    }

    impl Configure for Bay {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .directive(r#"envPrefix:"!""#)
                .field("Name", &mut self.name);
        }
    }

    let mut sources = sources(&[], &[]);
    let err = resolve(&mut sources, &mut Bay::default()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNamespacePrefix { .. }));
}

#[test]
fn custom_infix() {
    #[derive(Default)]
    struct Infix {
        host: String,
    }

    impl Configure for Infix {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .directive(r#"envPrefix:"APP" envInfix:"__""#)
                .field("Host", &mut self.host);
        }
    }

    let mut sources = sources(&[("APP_HOST", "single"), ("APP__HOST", "double")], &[]);
    let mut infix = Infix::default();
    resolve(&mut sources, &mut infix).unwrap();
    assert_eq!(infix.host, "double");
}

#[test]
fn repeated_resolution_is_idempotent() {
    let mut sources = sources(&[("FOO_BIND_ADDR", "def")], &["-bind-addr", "abc"]);

    let mut first = Foo::default();
    resolve(&mut sources, &mut first).unwrap();
    let mut second = Foo::default();
    resolve(&mut sources, &mut second).unwrap();

    assert_eq!(first.bind_addr, "abc");
    assert_eq!(second.bind_addr, first.bind_addr);

    // resolving into an already-filled record changes nothing either
    resolve(&mut sources, &mut first).unwrap();
    assert_eq!(first.bind_addr, "abc");
}

#[test]
fn duplicate_keys_on_one_source_fail() {
    #[derive(Default)]
    struct Twice {
        a: String,
        b: String,
    }

    impl Configure for Twice {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .field("Host", &mut self.a)
                .field("Other", &mut self.b)
                .tag(r#"env:"HOST""#);
        }
    }

    let mut sources = sources(&[], &[]);
    let err = resolve(&mut sources, &mut Twice::default()).unwrap_err();
    assert_eq!(
        err,
        ConfigError::KeyAlreadyRegistered {
            source_name: "env".into(),
            key: "HOST".into()
        }
    );
}

#[test]
fn failed_resolution_leaves_sources_reusable() {
    let mut sources = sources(&[], &["--bind-addr", "abc", "--nope"]);
    let err = resolve(&mut sources, &mut Foo::default()).unwrap_err();
    assert_eq!(err, ConfigError::UnknownFlag { flag: "--nope".into() });

    // the same sources, with a record that knows the flag, still resolve
    #[derive(Default)]
    struct Knows {
        bind_addr: String,
        nope: bool,
    }

    impl Configure for Knows {
        fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
            record
                .field("BindAddr", &mut self.bind_addr)
                .field("Nope", &mut self.nope);
        }
    }

    let mut knows = Knows::default();
    resolve(&mut sources, &mut knows).unwrap();
    assert_eq!(knows.bind_addr, "abc");
    assert!(knows.nope);
}
