//! ANSI escape sequence generation for the console palette.
//!
//! Normal-intensity colors use SGR codes `30-37` (`40-47` for backgrounds)
//! and the bright half of the palette uses `90-97` (`100-107`).

use crate::{Color, ColorSpec};
use std::io;

/// The escape sequence that restores the terminal's default attributes.
pub const RESET: &str = "\x1B[0m";

/// Writes an ANSI escape sequence corresponding to the given color
/// specification.
///
/// If `spec.reset()` is true, then the reset escape sequence is written
/// before any color escape codes.
pub fn ansi_spec<W: io::Write>(mut wtr: W, spec: &ColorSpec) -> io::Result<()> {
    if spec.reset() {
        wtr.write_all(RESET.as_bytes())?;
    }
    if let Some(c) = spec.fg() {
        ansi_color(&mut wtr, c, false)?;
    }
    if let Some(c) = spec.bg() {
        ansi_color(&mut wtr, c, true)?;
    }
    Ok(())
}

/// Writes an ANSI escape sequence corresponding to the given color.
///
/// If `bg` is true, then the color is treated as a background color.
/// Otherwise, it's treated as a foreground color.
pub fn ansi_color<W: io::Write>(
    mut wtr: W,
    color: &Color,
    bg: bool,
) -> io::Result<()> {
    write!(wtr, "\x1B[{}m", sgr_code(color, bg))
}

/// The SGR parameter selecting `color` as a foreground or background.
pub fn sgr_code(color: &Color, bg: bool) -> u8 {
    let offset = match *color {
        Color::Black | Color::DarkGray => 0,
        Color::DarkRed | Color::Red => 1,
        Color::DarkGreen | Color::Green => 2,
        Color::DarkYellow | Color::Yellow => 3,
        Color::DarkBlue | Color::Blue => 4,
        Color::DarkMagenta | Color::Magenta => 5,
        Color::DarkCyan | Color::Cyan => 6,
        Color::Gray | Color::White => 7,
    };
    let base = match (color.is_bright(), bg) {
        (false, false) => 30,
        (false, true) => 40,
        (true, false) => 90,
        (true, true) => 100,
    };
    base + offset
}
