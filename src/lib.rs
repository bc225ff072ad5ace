/*!
A small console logger with inline color markup.

Text is written through the [`WriteColor`] trait, which extends `io::Write`
with methods for switching colors and resetting them. [`StandardStream`]
writes to stdout or stderr, [`Ansi`] and [`NoColor`] wrap any `io::Write`.

A [`Logger`] sits on top of a `WriteColor` sink. Besides plain writes it
renders markup templates, where `$<color>:` switches the color of all
following text:

```rust
use klogged::{Ansi, Logger, Options};

# fn main() -> klogged::Result<()> {
let mut logger = Logger::new(Ansi::new(Vec::new()), Options::COLOR);
logger.write_formatted("$red:anger$white:!!!\n")?;
logger.info("boot ok")?;
# Ok(()) }
```

Leveled helpers (`info`, `debug`, `warning`, `error`) prefix each line with a
per-level colored prefix, and [`Options::TIMESTAMP`] puts the local time in
front of every write. The [`LogBridge`] plugs a logger into the `log` facade.
*/

pub mod ansi;
mod bridge;
pub mod clock;
mod error;
mod logger;
pub mod markup;
mod traits;
mod types;
mod writers;

pub use bridge::{LogBridge, install};
pub use error::{Error, Result};
pub use logger::{
    DEFAULT_BG, DEFAULT_FG, DEFAULT_TIMESTAMP_COLOR, DEFAULT_TIMESTAMP_FORMAT,
    LevelStyle, Logger,
};
pub use traits::WriteColor;
pub use types::{
    COLOR_ENV_VAR, Color, ColorChoice, ColorChoiceParseError, ColorSpec,
    ColorSpecParseError, Level, Options, ParseColorError,
};
pub use writers::{Ansi, NoColor, StandardStream};
