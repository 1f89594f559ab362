//! Property-based tests for the fallback chain.

use crate::sources;
use figbind::{Configure, Record, Resolver};
use proptest::prelude::*;

/// A single string field with a caller-chosen order.
#[derive(Default)]
struct Ordered {
    order: &'static str,
    value: String,
}

impl Configure for Ordered {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .directive(format!("order:\"{}\"", self.order))
            .field("Value", &mut self.value);
    }
}

#[derive(Default)]
struct Numbers {
    wide: i64,
    narrow: u8,
    list: Vec<i32>,
}

impl Configure for Numbers {
    fn describe<'a>(&'a mut self, record: &mut Record<'a>) {
        record
            .field("Wide", &mut self.wide)
            .field("Narrow", &mut self.narrow)
            .field("List", &mut self.list);
    }
}

fn text() -> impl Strategy<Value = String> {
    "[a-z0-9.:]{0,12}"
}

fn resolve_value(order: &'static str, seed: &str, env: &str, cmd: &str) -> String {
    let mut args = Vec::new();
    if !cmd.is_empty() {
        args.push("--value");
        args.push(cmd);
    }
    let mut sources = sources(&[("VALUE", env)], &args);
    let mut record = Ordered {
        order,
        value: seed.to_string(),
    };
    Resolver::new(&mut sources).resolve(&mut record).unwrap();
    record.value
}

proptest! {
    #[test]
    fn last_non_empty_source_wins(seed in text(), env in text(), cmd in text()) {
        let expected = |first: &str, last: &str| {
            if !last.is_empty() {
                last.to_string()
            } else if !first.is_empty() {
                first.to_string()
            } else {
                seed.clone()
            }
        };

        prop_assert_eq!(resolve_value("env,cmd", &seed, &env, &cmd), expected(&env, &cmd));
        prop_assert_eq!(resolve_value("cmd,env", &seed, &env, &cmd), expected(&cmd, &env));
    }

    #[test]
    fn integers_round_trip(wide in any::<i64>(), narrow in any::<u8>()) {
        let wide_text = wide.to_string();
        let narrow_text = narrow.to_string();

        let mut from_cmd = sources(&[], &["--wide", wide_text.as_str(), "--narrow", narrow_text.as_str()]);
        let mut numbers = Numbers::default();
        Resolver::new(&mut from_cmd).resolve(&mut numbers).unwrap();
        prop_assert_eq!(numbers.wide, wide);
        prop_assert_eq!(numbers.narrow, narrow);

        let mut from_env = sources(&[("WIDE", wide_text.as_str()), ("NARROW", narrow_text.as_str())], &[]);
        let mut numbers = Numbers::default();
        Resolver::new(&mut from_env).resolve(&mut numbers).unwrap();
        prop_assert_eq!(numbers.wide, wide);
        prop_assert_eq!(numbers.narrow, narrow);
    }

    #[test]
    fn sequence_length_is_sum_of_contributions(
        from_env in proptest::option::of(any::<i32>()),
        from_cmd in proptest::collection::vec(any::<i32>(), 0..6),
    ) {
        let env_text = from_env.map(|n| n.to_string()).unwrap_or_default();
        let cmd_texts: Vec<String> = from_cmd.iter().map(i32::to_string).collect();
        let mut args = Vec::new();
        for text in &cmd_texts {
            args.push("--list");
            args.push(text.as_str());
        }

        let mut sources = sources(&[("LIST", env_text.as_str())], &args);
        let mut numbers = Numbers::default();
        Resolver::new(&mut sources).resolve(&mut numbers).unwrap();

        let expected: Vec<i32> = from_env.into_iter().chain(from_cmd).collect();
        prop_assert_eq!(numbers.list, expected);
    }
}
