use crate::clock::{Clock, SystemClock};
use crate::markup::{self, Segment};
use crate::{
    Color, ColorChoice, ColorSpec, Error, Level, Options, Result,
    StandardStream, WriteColor,
};
use chrono::{DateTime, Local, Utc};
use std::fmt::{self, Write as _};
use std::io::Write as _;

/// Foreground used for unmarked text, `$reset:` and unknown tags.
pub const DEFAULT_FG: Color = Color::Cyan;
/// Background applied by plain and leveled writes.
pub const DEFAULT_BG: Color = Color::Black;
/// Color of the timestamp prefix.
pub const DEFAULT_TIMESTAMP_COLOR: Color = Color::DarkGray;
/// strftime pattern of the timestamp prefix.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// How a level's prefix is drawn.
///
/// The prefix is itself a markup template, so `"$white:[$red:ERR$white:]"`
/// works as a prefix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelStyle {
    pub color: Color,
    pub prefix: String,
}

impl LevelStyle {
    fn default_for(level: Level) -> LevelStyle {
        let color = match level {
            Level::Info => Color::Green,
            Level::Debug => Color::DarkGray,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
        };
        LevelStyle { color, prefix: format!("[{level}]") }
    }
}

/// A console logger writing colored markup to a [`WriteColor`] sink.
///
/// Every write renders a list of segments: each segment switches the sink to
/// its color (only when [`Options::COLOR`] is on), its text is written
/// verbatim, and once all segments are out the sink is reset and flushed.
/// The reset happens whether or not colors are enabled.
///
/// A `Logger` performs no synchronization of its own. Sharing one sink
/// between threads, or between a logger and other writers, may interleave
/// color changes with foreign text; wrap the logger in a
/// [`LogBridge`](crate::LogBridge) or a mutex when that matters.
#[derive(Debug)]
pub struct Logger<W, C = SystemClock> {
    wtr: W,
    clock: C,
    options: Options,
    fg: Color,
    bg: Color,
    timestamp_color: Color,
    timestamp_format: String,
    styles: [LevelStyle; 4],
}

impl<W: WriteColor> Logger<W> {
    /// Create a logger over `wtr` that reads the system clock.
    pub fn new(wtr: W, options: Options) -> Logger<W> {
        Logger::with_clock(wtr, SystemClock, options)
    }
}

impl Logger<StandardStream> {
    /// Create a logger on standard output.
    ///
    /// Colors are enabled when `choice` resolves to a colored stream.
    pub fn stdout(choice: ColorChoice) -> Logger<StandardStream> {
        let wtr = StandardStream::stdout(choice);
        let options =
            if wtr.supports_color() { Options::COLOR } else { Options::NONE };
        Logger::new(wtr, options)
    }

    /// Create a logger on standard error.
    pub fn stderr(choice: ColorChoice) -> Logger<StandardStream> {
        let wtr = StandardStream::stderr(choice);
        let options =
            if wtr.supports_color() { Options::COLOR } else { Options::NONE };
        Logger::new(wtr, options)
    }
}

impl<W: WriteColor, C: Clock> Logger<W, C> {
    /// Create a logger over `wtr` that reads the time from `clock`.
    pub fn with_clock(wtr: W, clock: C, options: Options) -> Logger<W, C> {
        Logger {
            wtr,
            clock,
            options,
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            timestamp_color: DEFAULT_TIMESTAMP_COLOR,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            styles: Level::ALL.map(LevelStyle::default_for),
        }
    }

    /// Write `text` as-is in the default colors. No markup is parsed.
    pub fn write(&mut self, text: &str) -> Result<()> {
        let segments = vec![Segment::new(text, self.fg)];
        self.render(segments, Some(self.bg))
    }

    /// Like [`write`](Logger::write), followed by a newline.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        let segments = vec![Segment::new(text, self.fg), Segment::new("\n", self.fg)];
        self.render(segments, Some(self.bg))
    }

    /// Render a markup template such as `"$red:anger$white:!!!"`.
    ///
    /// The background is left alone. See [`markup`](crate::markup) for the
    /// tag syntax.
    pub fn write_formatted(&mut self, template: &str) -> Result<()> {
        let segments = markup::parse(template, self.fg);
        self.render(segments, None)
    }

    /// Write `message` on its own line behind the prefix of `level`.
    ///
    /// The message is parsed as markup, so tags inside it take effect.
    pub fn log(&mut self, level: Level, message: &str) -> Result<()> {
        let style = &self.styles[level.index()];
        let template = format!(
            "{}{} ${}:{}\n",
            markup::tag(style.color),
            style.prefix,
            markup::RESET_TAG,
            message
        );
        let segments = markup::parse(&template, self.fg);
        self.render(segments, Some(self.bg))
    }

    /// Like [`log`](Logger::log), for preformatted arguments.
    pub fn log_fmt(&mut self, level: Level, args: fmt::Arguments<'_>) -> Result<()> {
        match args.as_str() {
            Some(message) => self.log(level, message),
            None => self.log(level, &args.to_string()),
        }
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        self.log(Level::Info, message)
    }

    pub fn debug(&mut self, message: &str) -> Result<()> {
        self.log(Level::Debug, message)
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        self.log(Level::Warning, message)
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.log(Level::Error, message)
    }

    /// Turn on every flag in `options`. Takes effect on the next write.
    pub fn enable_options(&mut self, options: Options) {
        self.options.insert(options);
    }

    /// Turn off every flag in `options`. Takes effect on the next write.
    pub fn disable_options(&mut self, options: Options) {
        self.options.remove(options);
    }

    /// The currently enabled options.
    pub fn options(&self) -> Options {
        self.options
    }

    pub fn set_level_color(&mut self, level: Level, color: Color) {
        self.styles[level.index()].color = color;
    }

    pub fn set_level_prefix(&mut self, level: Level, prefix: impl Into<String>) {
        self.styles[level.index()].prefix = prefix.into();
    }

    pub fn level_style(&self, level: Level) -> &LevelStyle {
        &self.styles[level.index()]
    }

    /// Set the default foreground and the fixed background.
    pub fn set_default_colors(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
    }

    /// The default foreground and background.
    pub fn default_colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }

    pub fn set_timestamp_color(&mut self, color: Color) {
        self.timestamp_color = color;
    }

    /// Set the strftime pattern of the timestamp prefix.
    ///
    /// A pattern that can't format a local time (an unknown specifier, or a
    /// parse-only one such as `%#z`) is rejected and the current one is kept.
    pub fn set_timestamp_format(&mut self, format: &str) -> Result<()> {
        let sample: DateTime<Local> = DateTime::<Utc>::UNIX_EPOCH.into();
        let mut text = String::new();
        if write!(text, "{}", sample.format(format)).is_err() {
            return Err(Error::InvalidTimestampFormat { format: format.to_string() });
        }
        self.timestamp_format = format.to_string();
        Ok(())
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Return a reference to the sink.
    pub fn get_ref(&self) -> &W {
        &self.wtr
    }

    /// Return a mutable reference to the sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.wtr
    }

    /// Consume the logger and return the sink.
    pub fn into_inner(self) -> W {
        self.wtr
    }

    fn timestamp(&self) -> Result<Segment<'static>> {
        let now = self.clock.now();
        let mut text = String::new();
        write!(text, "{} ", now.format(&self.timestamp_format)).map_err(|_| {
            Error::InvalidTimestampFormat { format: self.timestamp_format.clone() }
        })?;
        Ok(Segment::new(text, self.timestamp_color))
    }

    fn render(&mut self, segments: Vec<Segment<'_>>, bg: Option<Color>) -> Result<()> {
        let emitted = self.stamped(segments).and_then(|all| self.emit(&all, bg));
        let reset = self.wtr.reset();
        emitted?;
        reset?;
        self.wtr.flush()?;
        Ok(())
    }

    fn stamped<'a>(&self, segments: Vec<Segment<'a>>) -> Result<Vec<Segment<'a>>> {
        if !self.options.contains(Options::TIMESTAMP) {
            return Ok(segments);
        }
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push(self.timestamp()?);
        all.extend(segments);
        Ok(all)
    }

    fn emit(&mut self, segments: &[Segment<'_>], bg: Option<Color>) -> Result<()> {
        let colored = self.options.contains(Options::COLOR);
        let mut spec = ColorSpec::new();
        spec.set_bg(bg);
        for segment in segments {
            if colored {
                spec.set_fg(Some(segment.color));
                self.wtr.set_color(&spec)?;
            }
            self.wtr.write_all(segment.text.as_bytes())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Local, TimeZone};
    use std::io;

    #[derive(Debug, PartialEq)]
    enum Event {
        Color(Option<Color>, Option<Color>),
        Text(String),
        Reset,
    }

    #[derive(Default)]
    struct Recorder(Vec<Event>);

    impl io::Write for Recorder {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let text = String::from_utf8_lossy(buf).into_owned();
            self.0.push(Event::Text(text));
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl WriteColor for Recorder {
        fn supports_color(&self) -> bool {
            true
        }

        fn set_color(&mut self, spec: &ColorSpec) -> io::Result<()> {
            self.0.push(Event::Color(spec.fg().copied(), spec.bg().copied()));
            Ok(())
        }

        fn reset(&mut self) -> io::Result<()> {
            self.0.push(Event::Reset);
            Ok(())
        }
    }

    fn text(s: &str) -> Event {
        Event::Text(s.to_string())
    }

    fn noon() -> FixedClock {
        FixedClock(Local.with_ymd_and_hms(2024, 1, 15, 12, 34, 56).unwrap())
    }

    #[test]
    fn write_without_color_only_resets() {
        let mut logger = Logger::new(Recorder::default(), Options::NONE);
        logger.write("No colors :(\n").unwrap();
        assert_eq!(logger.into_inner().0, vec![text("No colors :(\n"), Event::Reset]);
    }

    #[test]
    fn write_with_color_sets_default_fg_and_bg() {
        let mut logger = Logger::new(Recorder::default(), Options::COLOR);
        logger.write("Yay colors!").unwrap();
        assert_eq!(
            logger.into_inner().0,
            vec![
                Event::Color(Some(DEFAULT_FG), Some(DEFAULT_BG)),
                text("Yay colors!"),
                Event::Reset,
            ]
        );
    }

    #[test]
    fn formatted_write_leaves_background_alone() {
        let mut logger = Logger::new(Recorder::default(), Options::COLOR);
        logger.write_formatted("hi $red:there").unwrap();
        assert_eq!(
            logger.into_inner().0,
            vec![
                Event::Color(Some(DEFAULT_FG), None),
                text("hi "),
                Event::Color(Some(Color::Red), None),
                text("there"),
                Event::Reset,
            ]
        );
    }

    #[test]
    fn toggling_color_between_calls() {
        let mut logger = Logger::new(Recorder::default(), Options::NONE);
        logger.enable_options(Options::COLOR);
        logger.write("a").unwrap();
        logger.disable_options(Options::COLOR);
        logger.write("b").unwrap();
        assert_eq!(
            logger.into_inner().0,
            vec![
                Event::Color(Some(DEFAULT_FG), Some(DEFAULT_BG)),
                text("a"),
                Event::Reset,
                text("b"),
                Event::Reset,
            ]
        );
    }

    #[test]
    fn info_line_uses_level_style() {
        let mut logger = Logger::new(Recorder::default(), Options::COLOR);
        logger.info("boot ok").unwrap();
        assert_eq!(
            logger.into_inner().0,
            vec![
                Event::Color(Some(Color::Green), Some(DEFAULT_BG)),
                text("[Info] "),
                Event::Color(Some(DEFAULT_FG), Some(DEFAULT_BG)),
                text("boot ok\n"),
                Event::Reset,
            ]
        );
    }

    #[test]
    fn level_color_and_prefix_are_mutable() {
        let mut logger = Logger::new(Recorder::default(), Options::COLOR);
        logger.set_level_color(Level::Error, Color::Magenta);
        logger.set_level_prefix(Level::Error, "ERR!");
        assert_eq!(
            logger.level_style(Level::Error),
            &LevelStyle { color: Color::Magenta, prefix: "ERR!".to_string() }
        );
        logger.error("doom").unwrap();
        let events = logger.into_inner().0;
        assert_eq!(events[0], Event::Color(Some(Color::Magenta), Some(DEFAULT_BG)));
        assert_eq!(events[1], text("ERR! "));
    }

    #[test]
    fn default_level_styles() {
        let logger = Logger::new(Recorder::default(), Options::NONE);
        assert_eq!(logger.level_style(Level::Debug).color, Color::DarkGray);
        assert_eq!(logger.level_style(Level::Warning).prefix, "[Warning]");
    }

    #[test]
    fn timestamp_segment_comes_first() {
        let mut logger =
            Logger::with_clock(Recorder::default(), noon(), Options::ALL);
        logger.write_formatted("$green:up").unwrap();
        assert_eq!(
            logger.into_inner().0,
            vec![
                Event::Color(Some(DEFAULT_TIMESTAMP_COLOR), None),
                text("12:34:56 "),
                Event::Color(Some(Color::Green), None),
                text("up"),
                Event::Reset,
            ]
        );
    }

    #[test]
    fn invalid_timestamp_format_is_rejected() {
        let mut logger = Logger::new(Recorder::default(), Options::NONE);
        let err = logger.set_timestamp_format("%Y-%Q").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestampFormat { .. }));
        assert_eq!(logger.timestamp_format(), DEFAULT_TIMESTAMP_FORMAT);

        // Parses as a strftime item, but only works for parsing offsets.
        let err = logger.set_timestamp_format("%#z").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestampFormat { .. }));
        assert_eq!(logger.timestamp_format(), DEFAULT_TIMESTAMP_FORMAT);
        logger.write("still fine").unwrap();

        logger.set_timestamp_format("[%H:%M]").unwrap();
        assert_eq!(logger.timestamp_format(), "[%H:%M]");
    }

    #[test]
    fn log_fmt_formats_arguments() {
        let mut logger = Logger::new(Recorder::default(), Options::NONE);
        logger.log_fmt(Level::Debug, format_args!("{} + {}", 1, 2)).unwrap();
        assert_eq!(
            logger.into_inner().0,
            vec![text("[Debug] "), text("1 + 2\n"), Event::Reset]
        );
    }

    #[test]
    fn unformattable_timestamp_still_resets_sink() {
        let mut logger =
            Logger::with_clock(Recorder::default(), noon(), Options::TIMESTAMP);
        logger.timestamp_format = "%#z".to_string();
        let err = logger.info("lost").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestampFormat { .. }));
        assert_eq!(logger.into_inner().0, vec![Event::Reset]);
    }

    #[test]
    fn stdout_logger_options_follow_color_choice() {
        assert_eq!(Logger::stdout(ColorChoice::Never).options(), Options::NONE);
        assert_eq!(Logger::stdout(ColorChoice::Always).options(), Options::COLOR);
        assert_eq!(Logger::stderr(ColorChoice::Never).options(), Options::NONE);
        assert_eq!(Logger::stderr(ColorChoice::Always).options(), Options::COLOR);
    }
}
