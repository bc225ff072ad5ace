//! The color markup used by [`Logger::write_formatted`](crate::Logger::write_formatted).
//!
//! A tag is a dollar sign, a color name and a colon: `$red:`. Everything
//! after a tag, up to the next tag or the end of the template, is drawn in
//! that color. Text before the first tag uses the default color.
//!
//! ```
//! use klogged::Color;
//! use klogged::markup::{parse, Segment};
//!
//! let segments = parse("hello $green:world", Color::Cyan);
//! assert_eq!(segments, vec![
//!     Segment::new("hello ", Color::Cyan),
//!     Segment::new("world", Color::Green),
//! ]);
//! ```
//!
//! There is no escaping: a message that happens to contain `$word:` is read
//! as a tag.

use crate::Color;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// The tag name that restores the default color.
pub const RESET_TAG: &str = "reset";

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$([A-Za-z][A-Za-z0-9_-]*):").expect("tag pattern is valid")
});

/// A run of text drawn in a single color.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Segment<'a> {
    pub text: Cow<'a, str>,
    pub color: Color,
}

impl<'a> Segment<'a> {
    pub fn new(text: impl Into<Cow<'a, str>>, color: Color) -> Segment<'a> {
        Segment { text: text.into(), color }
    }
}

/// Splits `template` into colored segments.
///
/// Parsing never fails. Unknown color names and `$reset:` both select
/// `default`, and anything that doesn't look like a tag is kept as text.
/// Empty segments (two adjacent tags, or a tag at the very end) are kept so
/// that every tag is accounted for.
pub fn parse(template: &str, default: Color) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut open: Option<(Color, usize)> = None;
    let mut first_start = template.len();

    for caps in TAG.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        match open {
            Some((color, start)) => {
                segments.push(Segment::new(&template[start..whole.start()], color));
            }
            None => first_start = whole.start(),
        }
        open = Some((resolve(name.as_str(), default), whole.end()));
    }

    if first_start > 0 || open.is_none() {
        segments.insert(0, Segment::new(&template[..first_start], default));
    }
    if let Some((color, start)) = open {
        segments.push(Segment::new(&template[start..], color));
    }
    segments
}

/// Maps a tag name to a color, case insensitively.
///
/// `reset` and names outside the palette resolve to `default`.
pub fn resolve(name: &str, default: Color) -> Color {
    if name.eq_ignore_ascii_case(RESET_TAG) {
        return default;
    }
    name.parse().unwrap_or(default)
}

/// Builds the tag that selects `color`, e.g. `$darkred:`.
pub fn tag(color: Color) -> String {
    format!("${color}:")
}

/// Returns `template` with every tag removed.
pub fn strip(template: &str) -> Cow<'_, str> {
    TAG.replace_all(template, "")
}
