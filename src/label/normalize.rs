//! Display formatting for label fields.
//!
//! Every function here is pure and maps resolved raw cell text to the string
//! printed on the label. Blank or unusable input always yields `""`.

use lazy_static::lazy_static;
use regex::Regex;

/// Coating text used when no coating is listed or any coating is blue-light.
pub const BLUE_LIGHT_BLOCKING: &str = "Blue Light Blocking";

/// Prescription type used when none is recorded.
pub const DEFAULT_PRESCRIPTION_TYPE: &str = "Single Vision";

lazy_static! {
    /// Any whitespace run
    static ref RE_WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// `1.D` or `1.DD` not embedded in a longer number
    static ref RE_INDEX: Regex = Regex::new(r"(?:^|[^\d.])(1\.\d{1,2})(?:$|[^\d])").unwrap();
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_text(text: &str) -> String {
    RE_WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Parse a measurement, rejecting blanks, `"/"`, `nan` and non-finite values.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Fixed two-decimal rendering (`-2` → `-2.00`).
pub fn two_decimal(raw: &str) -> String {
    parse_measurement(raw).map(format_two_decimal).unwrap_or_default()
}

fn format_two_decimal(value: f64) -> String {
    let s = format!("{:.2}", value);
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

/// Axis rendered as a rounded integer (`89.6` → `90`).
pub fn axis(raw: &str) -> String {
    parse_measurement(raw)
        .map(|v| {
            let rounded = v.round();
            if rounded == 0.0 {
                "0".to_string()
            } else {
                format!("{}", rounded as i64)
            }
        })
        .unwrap_or_default()
}

/// First lens index in free text, two-decimal (`"1.6 Lens"` → `"1.60"`).
pub fn index_lens(text: &str) -> String {
    RE_INDEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| two_decimal(m.as_str()))
        .unwrap_or_default()
}

/// Lens thickness line.
///
/// An explicit index field is used as-is; otherwise the index is pulled out
/// of the lens text.
pub fn thickness(explicit_index: &str, lens_text: &str) -> String {
    let explicit = normalize_text(explicit_index);
    if !explicit.is_empty() {
        return explicit;
    }
    let index = index_lens(lens_text);
    if index.is_empty() {
        "index lens".to_string()
    } else {
        format!("{} index lens", index)
    }
}

/// Coating line from the bundle's deduplicated coating items.
pub fn coating<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<String> = items
        .iter()
        .map(|s| normalize_text(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() || parts.iter().any(|p| p.to_lowercase().contains("blue")) {
        return BLUE_LIGHT_BLOCKING.to_string();
    }
    parts.join("; ")
}

/// Pupillary distance per eye as `(od, os)`.
///
/// Monocular values win when either is present; otherwise a positive single
/// PD is split evenly between both eyes.
pub fn pupillary_distance(od: &str, os: &str, single: &str) -> (String, String) {
    if !od.trim().is_empty() || !os.trim().is_empty() {
        return (two_decimal(od), two_decimal(os));
    }
    match parse_measurement(single) {
        Some(pd) if pd > 0.0 => {
            let half = format_two_decimal(pd / 2.0);
            (half.clone(), half)
        },
        _ => (String::new(), String::new()),
    }
}

/// Prescription type, defaulting to single vision.
pub fn prescription_type(resolved: &str) -> String {
    let text = normalize_text(resolved);
    if text.is_empty() {
        DEFAULT_PRESCRIPTION_TYPE.to_string()
    } else {
        text
    }
}
