//! Parsing of compact elapsed-time strings such as `"1h5m30s"`.
//!
//! The accepted grammar is a sequence of `<decimal><unit>` components with an
//! optional leading `+`. Units are `h`, `m`, `s`, `ms`, `us` (also `µs`/`μs`)
//! and `ns`. The bare literal `"0"` is also accepted. Negative durations are
//! rejected, as are durations longer than `i64::MAX` nanoseconds.

/// Longest representable duration, `i64::MAX` nanoseconds, in minutes.
const MAX_MINUTES: f64 = i64::MAX as f64 / 60_000_000_000.0;

/// Parse `text` into a number of (fractional) minutes.
///
/// Returns `None` for anything outside the grammar; callers decide whether
/// that matters.
pub fn parse_minutes(text: &str) -> Option<f64> {
    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest == "0" {
        return Some(0.0);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total = 0.0_f64;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        let value = parse_decimal(number)?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let (multiplier, divisor) = unit_ratio(unit)?;

        total += value * multiplier / divisor;
        rest = tail;
    }

    (total.is_finite() && total <= MAX_MINUTES).then_some(total)
}

/// Minutes per unit, as `multiplier / divisor` so whole-second values stay exact.
fn unit_ratio(unit: &str) -> Option<(f64, f64)> {
    match unit {
        "h" => Some((60.0, 1.0)),
        "m" => Some((1.0, 1.0)),
        "s" => Some((1.0, 60.0)),
        "ms" => Some((1.0, 60_000.0)),
        "us" | "µs" | "μs" => Some((1.0, 60_000_000.0)),
        "ns" => Some((1.0, 60_000_000_000.0)),
        _ => None,
    }
}

/// Digits with at most one `.`; at least one digit on either side of it.
fn parse_decimal(number: &str) -> Option<f64> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.contains('.') {
                return None;
            }
            (whole, fraction)
        }
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = if fraction.is_empty() { "0" } else { fraction };
    format!("{whole}.{fraction}").parse().ok()
}
