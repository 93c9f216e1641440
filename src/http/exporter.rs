//! Balance page rendering.
//!
//! Turns one published snapshot into the plain-text exposition format:
//!
//! ```text
//! <prefix>eth_balance{name="<name>",address="<address>"} <balance>
//! <prefix>eth_balance_total <total, 18 decimals>
//! <prefix>eth_load_seconds <duration, 2 decimals>
//! <prefix>eth_loaded_addresses <int>
//! <prefix>eth_total_addresses <int>
//! ```

use std::fmt::Write;

use crate::balances::Snapshot;

/// Content type of the rendered page.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render `snapshot`. Pure: the same snapshot always yields the same text.
pub fn render(snapshot: &Snapshot, prefix: &str) -> String {
    let mut out = String::with_capacity(96 * (snapshot.entries.len() + 4));

    // `write!` into a String cannot fail.
    for entry in &snapshot.entries {
        let _ = writeln!(
            out,
            "{prefix}eth_balance{{name=\"{}\",address=\"{}\"}} {}",
            escape_label(&entry.name),
            entry.address,
            entry.balance_or_zero(),
        );
    }

    let _ = writeln!(out, "{prefix}eth_balance_total {}", snapshot.total_balance.to_fixed_string());
    let _ = writeln!(out, "{prefix}eth_load_seconds {:.2}", snapshot.cycle_duration.as_secs_f64());
    let _ = writeln!(out, "{prefix}eth_loaded_addresses {}", snapshot.loaded_count);
    let _ = writeln!(out, "{prefix}eth_total_addresses {}", snapshot.total_count());

    out
}

/// Escape a label value per the exposition format (`\`, `"`, newline).
fn escape_label(value: &str) -> std::borrow::Cow<'_, str> {
    if !value.contains(['\\', '"', '\n']) {
        return value.into();
    }
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::EtherAmount;
    use crate::registry::{parse_line, WatchedAddress};
    use alloy::primitives::U256;
    use std::time::Duration;

    const ALICE: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1";
    const BOB: &str = "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB2";

    fn entry(name: &str, address: &str, wei: Option<u128>) -> WatchedAddress {
        let mut entry = parse_line(&format!("{name}:{address}")).unwrap();
        entry.balance = wei.map(|w| EtherAmount::from_wei(U256::from(w)));
        entry
    }

    fn snapshot(entries: Vec<WatchedAddress>, loaded_count: usize, millis: u64) -> Snapshot {
        let mut snapshot = Snapshot::empty(&[]);
        snapshot.total_balance = Snapshot::sum_balances(&entries);
        snapshot.entries = entries;
        snapshot.loaded_count = loaded_count;
        snapshot.cycle_duration = Duration::from_millis(millis);
        snapshot.cycle = 1;
        snapshot
    }

    #[test]
    fn test_render_two_wallets() {
        let snapshot = snapshot(
            vec![
                entry("alice", ALICE, Some(1_000_000_000_000_000_000)),
                entry("bob", BOB, Some(2_500_000_000_000_000_000)),
            ],
            2,
            1234,
        );

        let expected = format!(
            "eth_balance{{name=\"alice\",address=\"{ALICE}\"}} 1\n\
             eth_balance{{name=\"bob\",address=\"{BOB}\"}} 2.5\n\
             eth_balance_total 3.500000000000000000\n\
             eth_load_seconds 1.23\n\
             eth_loaded_addresses 2\n\
             eth_total_addresses 2\n"
        );
        assert_eq!(render(&snapshot, ""), expected);
    }

    #[test]
    fn test_render_with_prefix() {
        let snapshot = snapshot(vec![entry("alice", ALICE, None)], 0, 0);
        let text = render(&snapshot, "mainnet_");

        let first = format!("mainnet_eth_balance{{name=\"alice\",address=\"{ALICE}\"}} 0\n");
        assert!(text.starts_with(&first));
        assert!(text.contains("mainnet_eth_balance_total 0.000000000000000000\n"));
        assert!(text.contains("mainnet_eth_load_seconds 0.00\n"));
        assert!(text.contains("mainnet_eth_loaded_addresses 0\n"));
        assert!(text.ends_with("mainnet_eth_total_addresses 1\n"));
    }

    #[test]
    fn test_render_empty_registry() {
        let text = render(&Snapshot::empty(&[]), "");
        assert_eq!(
            text,
            "eth_balance_total 0.000000000000000000\n\
             eth_load_seconds 0.00\n\
             eth_loaded_addresses 0\n\
             eth_total_addresses 0\n"
        );
    }

    #[test]
    fn test_render_is_idempotent() {
        let snapshot = snapshot(vec![entry("alice", ALICE, Some(7))], 1, 15);
        assert_eq!(render(&snapshot, "x_"), render(&snapshot, "x_"));
    }

    #[test]
    fn test_render_keeps_full_precision() {
        let snapshot = snapshot(vec![entry("dust", ALICE, Some(1))], 1, 0);
        assert!(render(&snapshot, "").starts_with(&format!(
            "eth_balance{{name=\"dust\",address=\"{ALICE}\"}} 0.000000000000000001\n"
        )));
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("plain"), "plain");
        assert_eq!(escape_label("a\"b\\c"), "a\\\"b\\\\c");
    }
}
