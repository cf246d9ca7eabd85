//! Duration strings such as `30s`, `500ms` or `1m30s`.

use std::time::Duration;

/// Parse a duration made of one or more `<number><unit>` parts.
///
/// Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. Numbers may carry a
/// fraction (`1.5s`). A bare `0` is accepted; any other number needs a unit.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let input = s.trim();

    if input.is_empty() {
        return Err("duration cannot be empty".to_string());
    }
    if input == "0" {
        return Ok(Duration::ZERO);
    }

    let mut nanos = 0f64;
    let mut rest = input;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_end);
        if number.is_empty() {
            return Err(format!("invalid duration {input:?}"));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid duration {input:?}"))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);

        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit in duration {input:?}")),
            other => return Err(format!("unknown unit {other:?} in duration {input:?}")),
        };

        nanos += value * scale;
        rest = next;
    }

    Ok(Duration::from_nanos(nanos.round() as u64))
}
