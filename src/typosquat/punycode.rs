//! Best-effort punycode handling (RFC 3492)
//!
//! Decoding here is non-authoritative: it exists so homoglyph detection can
//! look inside IDN labels. Any malformed label is passed through unchanged
//! and decoding never panics.

/// Byte-level case-insensitive `xn--` prefix check, safe on any UTF-8 label
fn has_idna_prefix(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() >= 4
        && (bytes[0] | 0x20) == b'x'
        && (bytes[1] | 0x20) == b'n'
        && bytes[2] == b'-'
        && bytes[3] == b'-'
}

/// Whether any dot-separated label carries the IDNA `xn--` prefix
pub fn is_punycode_domain(domain: &str) -> bool {
    domain.split('.').any(has_idna_prefix)
}

/// Decode every `xn--` label best-effort; failed labels stay as-is
pub fn decode_punycode(domain: &str) -> String {
    domain
        .split('.')
        .map(|label| {
            if has_idna_prefix(label) {
                decode_label(&label[4..]).unwrap_or_else(|| label.to_string())
            } else {
                label.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

const BASE: u32 = 36;
const TMIN: u32 = 1;
const TMAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 128;

fn digit_value(byte: u8) -> Option<u32> {
    match byte {
        b'a'..=b'z' => Some((byte - b'a') as u32),
        b'A'..=b'Z' => Some((byte - b'A') as u32),
        b'0'..=b'9' => Some((byte - b'0') as u32 + 26),
        _ => None,
    }
}

fn adapt(delta: u32, num_points: u32, first_time: bool) -> u32 {
    let mut delta = if first_time { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - TMIN) * TMAX) / 2 {
        delta /= BASE - TMIN;
        k += BASE;
    }
    k + (BASE - TMIN + 1) * delta / (delta + SKEW)
}

/// RFC 3492 decode of the payload after `xn--`
///
/// All arithmetic is checked; overflow or any malformed digit yields `None`.
fn decode_label(encoded: &str) -> Option<String> {
    if !encoded.is_ascii() {
        return None;
    }

    let (basic, extended) = match encoded.rfind('-') {
        Some(pos) => (&encoded[..pos], &encoded[pos + 1..]),
        None => ("", encoded),
    };
    if extended.is_empty() {
        return None;
    }

    let mut output: Vec<char> = basic.chars().collect();
    let mut n = INITIAL_N;
    let mut i: u32 = 0;
    let mut bias = INITIAL_BIAS;

    let bytes = extended.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        let old_i = i;
        let mut w: u32 = 1;
        let mut k = BASE;
        loop {
            if pos >= bytes.len() {
                return None;
            }
            let digit = digit_value(bytes[pos])?;
            pos += 1;
            i = i.checked_add(digit.checked_mul(w)?)?;
            let t = if k <= bias {
                TMIN
            } else if k >= bias + TMAX {
                TMAX
            } else {
                k - bias
            };
            if digit < t {
                break;
            }
            w = w.checked_mul(BASE - t)?;
            k += BASE;
        }

        let len = output.len() as u32 + 1;
        bias = adapt(i.checked_sub(old_i)?, len, old_i == 0);
        n = n.checked_add(i / len)?;
        i %= len;

        let c = char::from_u32(n)?;
        output.insert(i as usize, c);
        i += 1;
    }

    Some(output.into_iter().collect())
}
