use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// @module: Repair of malformed SRT timestamp ranges

// @const: Loose timestamp-range regex, 1-3 time fields of 1-2 digits each
static LOOSE_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}(?::\d{1,2}){0,2}),(\d{3})\s*-->\s*(\d{1,2}(?::\d{1,2}){0,2}),(\d{3})")
        .unwrap()
});

/// Rewrite every loose timestamp-range substring so both time fields are
/// exactly `HH:MM:SS`, leaving millisecond fields untouched.
///
/// Missing higher-order fields are inferred as zero: a lone field is seconds,
/// two fields are minutes:seconds, three are hours:minutes:seconds. Values
/// exceeding normal ranges (e.g. 75 seconds) are zero-padded as-is - this
/// fixes formatting, not arithmetic. Non-matching text passes through
/// unchanged.
pub fn normalize_timestamps(content: &str) -> String {
    LOOSE_RANGE_REGEX
        .replace_all(content, |caps: &Captures| {
            format!(
                "{},{} --> {},{}",
                pad_time(&caps[1]),
                &caps[2],
                pad_time(&caps[3]),
                &caps[4]
            )
        })
        .into_owned()
}

/// Zero-pad a 1-3 field time string to `HH:MM:SS`
fn pad_time(time: &str) -> String {
    let fields: Vec<u64> = time
        .split(':')
        .map(|field| field.parse().unwrap_or(0))
        .collect();

    let (hours, minutes, seconds) = match fields.as_slice() {
        [hours, minutes, seconds] => (*hours, *minutes, *seconds),
        [minutes, seconds] => (0, *minutes, *seconds),
        [seconds] => (0, 0, *seconds),
        _ => (0, 0, 0),
    };

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
