use std::cmp::Ordering;

use super::tags::write_tags;
use super::{MetricType, MetricValue};

const MAX_FRACTION_DIGITS: i32 = 6;

// enough to separate any double from a seventh-digit midpoint it is not equal to
const EXACT_FRACTION_DIGITS: usize = 30;

/// Renders one observation as a wire line: `<prefix><name>:<value>|<type><tag-suffix>`.
///
/// `prefix` is used verbatim and must already carry its trailing separator.
/// `constant_tags` is a suffix pre-rendered by [`render_tags`](crate::render_tags).
#[must_use]
pub fn format_line(
    prefix: &str,
    name: &str,
    value: MetricValue,
    metric_type: MetricType,
    tags: &[&str],
    constant_tags: Option<&str>,
) -> String {
    let tags_len: usize = tags.iter().map(|tag| tag.len() + 1).sum();
    let mut line = String::with_capacity(
        prefix.len() + name.len() + 32 + tags_len + constant_tags.map_or(0, str::len),
    );

    line.push_str(prefix);
    line.push_str(name);
    line.push(':');
    value.write_to(&mut line);
    line.push('|');
    line.push_str(metric_type.as_str());
    write_tags(&mut line, tags, constant_tags);

    line
}

/// Appends `value` rounded half-to-even to at most six fractional digits.
///
/// Digits come from the shortest decimal representation that round-trips to `value`, so
/// `0.423` stays `0.423` instead of exposing binary noise. A midpoint in those digits is
/// settled against the exact binary value, so only true ties go to the even neighbour.
pub(crate) fn write_float(out: &mut String, value: f64) {
    if value.is_nan() {
        out.push_str("NaN");
        return;
    }
    if value.is_infinite() {
        out.push_str(if value.is_sign_negative() {
            "-Infinity"
        } else {
            "Infinity"
        });
        return;
    }

    let mut buffer = ryu::Buffer::new();
    let shortest = buffer.format_finite(value);
    let (negative, unsigned) = shortest
        .strip_prefix('-')
        .map_or((false, shortest), |rest| (true, rest));

    // ryu switches to scientific notation for very large and very small magnitudes
    let (mantissa, exponent) = match unsigned.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits = Vec::with_capacity(int_part.len() + frac_part.len() + 1);
    digits.extend_from_slice(int_part.as_bytes());
    digits.extend_from_slice(frac_part.as_bytes());

    // value == 0.<digits> * 10^point
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let mut point = int_part.len() as i32 + exponent;

    round_half_even(&mut digits, &mut point, value);

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    while digits.len() as i32 > point && digits.last() == Some(&b'0') {
        digits.pop();
    }
    if digits.is_empty() {
        digits.push(b'0');
        point = 1;
    }

    if negative {
        out.push('-');
    }

    if point <= 0 {
        out.push('0');
    } else {
        for position in 0..point {
            out.push(digit_at(&digits, position));
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let len = digits.len() as i32;
    if len > point {
        out.push('.');
        for position in point..len {
            out.push(digit_at(&digits, position));
        }
    }
}

fn round_half_even(digits: &mut Vec<u8>, point: &mut i32, value: f64) {
    let keep = *point + MAX_FRACTION_DIGITS;
    if keep < 0 {
        // first significant digit sits below 1e-7, far under the rounding midpoint
        digits.clear();
        return;
    }

    #[allow(clippy::cast_sign_loss)]
    let keep = keep as usize;
    if keep >= digits.len() {
        return;
    }

    let round_up = match digits[keep] {
        b'6'..=b'9' => true,
        b'5' if digits[keep + 1..].iter().any(|&d| d != b'0') => true,
        b'5' => match midpoint_side(value) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                keep.checked_sub(1).is_some_and(|last| (digits[last] - b'0') % 2 == 1)
            }
        },
        _ => false,
    };
    digits.truncate(keep);

    if round_up {
        let mut carried = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carried = false;
                break;
            }
        }
        if carried {
            digits.insert(0, b'1');
            *point += 1;
        }
    }
}

/// Where `value` sits relative to the midpoint its shortest digits end on.
fn midpoint_side(value: f64) -> Ordering {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let fraction = exact.split_once('.').map_or("", |(_, fraction)| fraction);
    #[allow(clippy::cast_sign_loss)]
    let mut tail = fraction.bytes().skip(MAX_FRACTION_DIGITS as usize);
    match tail.next() {
        Some(b'5') if tail.any(|d| d != b'0') => Ordering::Greater,
        Some(b'5') => Ordering::Equal,
        Some(d) if d > b'5' => Ordering::Greater,
        _ => Ordering::Less,
    }
}

fn digit_at(digits: &[u8], position: i32) -> char {
    usize::try_from(position)
        .ok()
        .and_then(|index| digits.get(index))
        .map_or('0', |&digit| char::from(digit))
}
