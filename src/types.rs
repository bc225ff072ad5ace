use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};
use std::str::FromStr;

/// ColorChoice represents the color preferences of an end user.
///
/// The `Default` implementation for this type will select `Auto`, which tries
/// to do the right thing based on the current environment.
///
/// The `FromStr` implementation for this type converts a lowercase string of
/// the variant name to the corresponding variant. Any other string results in
/// an error.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ColorChoice {
    /// Always emit ANSI color codes, even when the stream is redirected.
    Always,
    /// Use colors only when writing to a terminal that isn't `TERM=dumb` and
    /// when `NO_COLOR` is not defined.
    #[default]
    Auto,
    /// Never emit colors.
    Never,
}

/// Environment variable consulted by [`ColorChoice::from_env`].
pub const COLOR_ENV_VAR: &str = "KLOGGED_COLOR";

impl FromStr for ColorChoice {
    type Err = ColorChoiceParseError;

    fn from_str(s: &str) -> Result<ColorChoice, ColorChoiceParseError> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            "auto" => Ok(ColorChoice::Auto),
            unknown => Err(ColorChoiceParseError {
                unknown_choice: unknown.to_string(),
            }),
        }
    }
}

impl ColorChoice {
    /// Reads the choice from `KLOGGED_COLOR`, falling back to `Auto` when the
    /// variable is not set.
    pub fn from_env() -> Result<ColorChoice, ColorChoiceParseError> {
        ColorChoice::from_env_value(env::var(COLOR_ENV_VAR).ok().as_deref())
    }

    fn from_env_value(
        value: Option<&str>,
    ) -> Result<ColorChoice, ColorChoiceParseError> {
        value.map_or(Ok(ColorChoice::Auto), str::parse)
    }

    /// Returns true if we should attempt to write colored output to a stream
    /// whose terminal status is `is_terminal`.
    pub(crate) fn should_attempt_color(&self, is_terminal: bool) -> bool {
        match *self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                is_terminal
                    && env_allows_color(
                        env::var_os("TERM").as_deref(),
                        env::var_os("NO_COLOR").as_deref(),
                    )
            }
        }
    }
}

/// Decides from the values of `TERM` and `NO_COLOR` whether colors are
/// welcome.
///
/// `TERM=dumb` and any `NO_COLOR` disable colors. A missing `TERM` means a
/// weird environment on Unix, but is the norm on Windows consoles.
fn env_allows_color(term: Option<&OsStr>, no_color: Option<&OsStr>) -> bool {
    match term {
        Some(k) if k == "dumb" => return false,
        None if !cfg!(windows) => return false,
        _ => {}
    }
    no_color.is_none()
}

/// An error that occurs when parsing a `ColorChoice` fails.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "unrecognized color choice '{unknown_choice}': valid choices are: \
     always, never, auto"
)]
pub struct ColorChoiceParseError {
    unknown_choice: String,
}

impl ColorChoiceParseError {
    /// Return the string that couldn't be parsed as a valid color choice.
    pub fn invalid_choice(&self) -> &str {
        &self.unknown_choice
    }
}

/// A color specification: what a sink should switch to before the next
/// write.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColorSpec {
    pub(crate) fg_color: Option<Color>,
    pub(crate) bg_color: Option<Color>,
    pub(crate) reset: bool,
}

impl Default for ColorSpec {
    fn default() -> ColorSpec {
        ColorSpec { fg_color: None, bg_color: None, reset: true }
    }
}

impl ColorSpec {
    /// Create a new color specification that has no colors.
    pub fn new() -> ColorSpec {
        ColorSpec::default()
    }

    /// Get the foreground color.
    pub fn fg(&self) -> Option<&Color> {
        self.fg_color.as_ref()
    }

    /// Set the foreground color.
    pub fn set_fg(&mut self, color: Option<Color>) -> &mut ColorSpec {
        self.fg_color = color;
        self
    }

    /// Get the background color.
    pub fn bg(&self) -> Option<&Color> {
        self.bg_color.as_ref()
    }

    /// Set the background color.
    pub fn set_bg(&mut self, color: Option<Color>) -> &mut ColorSpec {
        self.bg_color = color;
        self
    }

    /// Get whether reset is enabled or not.
    ///
    /// reset is enabled by default. When enabled and using ANSI escape
    /// sequences, a "reset" code is emitted before the colors are applied,
    /// so a missing background never inherits the previous one.
    pub fn reset(&self) -> bool {
        self.reset
    }

    /// Set whether to reset the terminal whenever color settings are applied.
    pub fn set_reset(&mut self, yes: bool) -> &mut ColorSpec {
        self.reset = yes;
        self
    }
}

/// The closed set of console colors, as found on a 16-color terminal.
///
/// The `Dark*` variants (and `Gray`) are the normal-intensity ANSI colors;
/// the plain names are the bright variants.
///
/// This type has a `FromStr` impl that matches the variant names case
/// insensitively (`"darkred"`, `"DarkRed"` and `"DARKRED"` are the same
/// color). `Display` writes the lowercase name, which round-trips through
/// `FromStr` and through markup tags.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl Color {
    /// Every color of the palette, in console order.
    pub const ALL: [Color; 16] = [
        Color::Black,
        Color::DarkBlue,
        Color::DarkGreen,
        Color::DarkCyan,
        Color::DarkRed,
        Color::DarkMagenta,
        Color::DarkYellow,
        Color::Gray,
        Color::DarkGray,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Yellow,
        Color::White,
    ];

    /// The lowercase name of this color.
    pub fn name(&self) -> &'static str {
        match *self {
            Color::Black => "black",
            Color::DarkBlue => "darkblue",
            Color::DarkGreen => "darkgreen",
            Color::DarkCyan => "darkcyan",
            Color::DarkRed => "darkred",
            Color::DarkMagenta => "darkmagenta",
            Color::DarkYellow => "darkyellow",
            Color::Gray => "gray",
            Color::DarkGray => "darkgray",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Red => "red",
            Color::Magenta => "magenta",
            Color::Yellow => "yellow",
            Color::White => "white",
        }
    }

    /// Returns true for the high-intensity half of the palette.
    pub fn is_bright(&self) -> bool {
        matches!(
            *self,
            Color::DarkGray
                | Color::Blue
                | Color::Green
                | Color::Cyan
                | Color::Red
                | Color::Magenta
                | Color::Yellow
                | Color::White
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error from parsing an invalid color name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error(
    "unrecognized color name '{given}'. Choose from: black, darkblue, \
     darkgreen, darkcyan, darkred, darkmagenta, darkyellow, gray, darkgray, \
     blue, green, cyan, red, magenta, yellow, white"
)]
pub struct ParseColorError {
    given: String,
}

impl ParseColorError {
    /// Return the string that couldn't be parsed as a valid color.
    pub fn invalid(&self) -> &str {
        &self.given
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Color, ParseColorError> {
        Color::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseColorError { given: s.to_string() })
    }
}

/// An error from parsing an invalid color specification.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ColorSpecParseError {
    /// An error parsing a color.
    #[error(transparent)]
    InvalidColor(#[from] ParseColorError),
}

impl FromStr for ColorSpec {
    type Err = ColorSpecParseError;

    /// Parses comma separated parts: `fg:<color>`, `bg:<color>`, `reset`,
    /// `noreset`, or a bare color name which sets the foreground.
    fn from_str(spec: &str) -> Result<ColorSpec, ColorSpecParseError> {
        let mut color_spec = ColorSpec::new();
        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some(color_str) = part.strip_prefix("fg:") {
                color_spec.set_fg(Some(color_str.parse()?));
            } else if let Some(color_str) = part.strip_prefix("bg:") {
                color_spec.set_bg(Some(color_str.parse()?));
            } else if part == "reset" {
                color_spec.set_reset(true);
            } else if part == "noreset" {
                color_spec.set_reset(false);
            } else {
                color_spec.set_fg(Some(part.parse()?));
            }
        }
        Ok(color_spec)
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        crate::ansi::ansi_spec(&mut buf, self).map_err(|_| fmt::Error)?;
        write!(f, "{}", String::from_utf8_lossy(&buf))
    }
}

/// Severity of a leveled message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Level {
    Info,
    Debug,
    Warning,
    Error,
}

impl Level {
    /// Every level, in index order.
    pub const ALL: [Level; 4] =
        [Level::Info, Level::Debug, Level::Warning, Level::Error];

    /// Position of this level in per-level tables.
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The capitalized level name, as used in default prefixes.
    pub fn name(&self) -> &'static str {
        match *self {
            Level::Info => "Info",
            Level::Debug => "Debug",
            Level::Warning => "Warning",
            Level::Error => "Error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of independent logger toggles.
///
/// Flags combine with `|`, so `Options::COLOR | Options::TIMESTAMP` turns on
/// both.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Options(u8);

impl Options {
    /// No options.
    pub const NONE: Options = Options(0);
    /// Switch the sink's colors while rendering.
    pub const COLOR: Options = Options(1);
    /// Prefix every render with the current local time.
    pub const TIMESTAMP: Options = Options(1 << 1);
    /// Every known option.
    pub const ALL: Options = Options(Self::COLOR.0 | Self::TIMESTAMP.0);

    /// The raw bit representation.
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Builds options from raw bits, dropping unknown bits.
    pub fn from_bits_truncate(bits: u8) -> Options {
        Options(bits & Self::ALL.0)
    }

    /// Returns true if every flag in `other` is set in `self`.
    pub fn contains(&self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if no flag is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Sets every flag in `other`.
    pub fn insert(&mut self, other: Options) {
        self.0 |= other.0;
    }

    /// Clears every flag in `other`.
    pub fn remove(&mut self, other: Options) {
        self.0 &= !other.0;
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Options) -> Options {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Options) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Options {
    type Output = Options;

    fn bitand(self, rhs: Options) -> Options {
        Options(self.0 & rhs.0)
    }
}

impl Not for Options {
    type Output = Options;

    fn not(self) -> Options {
        Options(!self.0 & Self::ALL.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_names_are_case_insensitive() {
        assert_eq!("Red".parse::<Color>(), Ok(Color::Red));
        assert_eq!("RED".parse::<Color>(), Ok(Color::Red));
        assert_eq!("red".parse::<Color>(), Ok(Color::Red));
        assert_eq!("DarkMagenta".parse::<Color>(), Ok(Color::DarkMagenta));
    }

    #[test]
    fn color_display_parses_back() {
        for color in Color::ALL {
            assert_eq!(color.to_string().parse::<Color>(), Ok(color));
        }
    }

    #[test]
    fn unknown_color_is_an_error() {
        let err = "not-a-color".parse::<Color>().unwrap_err();
        assert_eq!(err.invalid(), "not-a-color");
        assert!(err.to_string().starts_with("unrecognized color name"));
        // The markup reset token is not a color.
        assert!("reset".parse::<Color>().is_err());
    }

    #[test]
    fn bright_half_of_palette() {
        let bright = Color::ALL.iter().filter(|c| c.is_bright()).count();
        assert_eq!(bright, 8);
        assert!(!Color::Gray.is_bright());
        assert!(Color::DarkGray.is_bright());
    }

    #[test]
    fn color_spec_from_str() {
        let spec: ColorSpec = "fg:red, bg:black, noreset".parse().unwrap();
        assert_eq!(spec.fg(), Some(&Color::Red));
        assert_eq!(spec.bg(), Some(&Color::Black));
        assert!(!spec.reset());

        let spec: ColorSpec = "yellow".parse().unwrap();
        assert_eq!(spec.fg(), Some(&Color::Yellow));
        assert!(spec.bg().is_none());
        assert!(spec.reset());

        assert!("fg:purple".parse::<ColorSpec>().is_err());
    }

    #[test]
    fn color_choice_from_str() {
        assert_eq!("always".parse::<ColorChoice>(), Ok(ColorChoice::Always));
        assert_eq!("Never".parse::<ColorChoice>(), Ok(ColorChoice::Never));
        assert_eq!(" auto ".parse::<ColorChoice>(), Ok(ColorChoice::Auto));
        let err = "sometimes".parse::<ColorChoice>().unwrap_err();
        assert_eq!(err.invalid_choice(), "sometimes");
    }

    #[test]
    fn color_choice_ignores_terminal_when_forced() {
        assert!(ColorChoice::Always.should_attempt_color(false));
        assert!(!ColorChoice::Never.should_attempt_color(true));
        assert!(!ColorChoice::Auto.should_attempt_color(false));
    }

    #[test]
    fn color_choice_from_env_value() {
        assert_eq!(ColorChoice::from_env_value(None), Ok(ColorChoice::Auto));
        assert_eq!(
            ColorChoice::from_env_value(Some("never")),
            Ok(ColorChoice::Never)
        );
        assert_eq!(
            ColorChoice::from_env_value(Some("ALWAYS")),
            Ok(ColorChoice::Always)
        );
        let err = ColorChoice::from_env_value(Some("rainbow")).unwrap_err();
        assert_eq!(err.invalid_choice(), "rainbow");
    }

    #[test]
    fn dumb_terminal_disables_color() {
        let dumb = OsStr::new("dumb");
        assert!(!env_allows_color(Some(dumb), None));
        assert!(env_allows_color(Some(OsStr::new("xterm-256color")), None));
    }

    #[test]
    fn no_color_disables_color() {
        let term = Some(OsStr::new("xterm"));
        assert!(!env_allows_color(term, Some(OsStr::new("1"))));
        // Any value counts, even an empty one.
        assert!(!env_allows_color(term, Some(OsStr::new(""))));
    }

    #[test]
    fn missing_term_depends_on_platform() {
        assert_eq!(env_allows_color(None, None), cfg!(windows));
    }

    #[test]
    fn options_are_orthogonal() {
        let mut opts = Options::NONE;
        opts.insert(Options::COLOR);
        assert!(opts.contains(Options::COLOR));
        assert!(!opts.contains(Options::TIMESTAMP));

        opts |= Options::TIMESTAMP;
        assert_eq!(opts, Options::ALL);

        opts.remove(Options::COLOR);
        assert_eq!(opts, Options::TIMESTAMP);
        assert_eq!(!Options::TIMESTAMP, Options::COLOR);
        assert!((Options::COLOR & Options::TIMESTAMP).is_empty());
    }

    #[test]
    fn options_truncate_unknown_bits() {
        assert_eq!(Options::from_bits_truncate(0xff), Options::ALL);
        assert_eq!(Options::from_bits_truncate(1).bits(), 1);
    }

    #[test]
    fn level_indexes_are_dense() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
        assert_eq!(Level::Warning.to_string(), "Warning");
    }
}
