//! Decimal half-up rounding for summary and extension fields.
//!
//! The rounded renderings are a byte-level output contract: converted files
//! are compared byte-for-byte against reference output. `f64::round` on a
//! scaled value is not enough here because binary floats under-represent
//! values like `10.15`, which must still round up to `"10.2"`. Rounding
//! therefore operates on a decimal re-rendering of the value.

/// Render `value` with exactly `decimals` fractional digits, rounding
/// half-up on the decimal value.
///
/// `value` must be finite.
///
/// # Example
/// ```
/// use tkl2gpx::rounding::format_half_up;
///
/// assert_eq!(format_half_up(12.345, 2), "12.35");
/// assert_eq!(format_half_up(10.15, 1), "10.2");
/// ```
pub fn format_half_up(value: f64, decimals: usize) -> String {
    // Round on the shortest round-trip rendering: it is the decimal value
    // the f64 stands for. A fixed-width re-render would round once itself
    // and turn e.g. 10.1499 into "10.150" before half-up even runs.
    let rendered = value.to_string();
    let negative = rendered.starts_with('-');
    let unsigned = rendered.trim_start_matches('-');
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some(parts) => parts,
        None => (unsigned, ""),
    };

    let round_up = frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5');

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();
    digits.resize(int_part.len() + decimals, b'0');
    if round_up {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let int_len = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if negative && digits.iter().any(|&d| d != b'0') {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|&d| d as char));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|&d| d as char));
    }
    out
}
