use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, PrintStyledContent, Stylize};

use crate::color::NamedColor;

const SWATCH: &str = "      ";

/// Print one colored swatch per extracted color, followed by its label and
/// hex value.
pub fn render<W: Write>(out: &mut W, colors: &[NamedColor]) -> io::Result<()> {
    for named in colors {
        let c = named.color.to_srgba_u8();
        let bg = Color::Rgb {
            r: c.red,
            g: c.green,
            b: c.blue,
        };
        queue!(
            out,
            PrintStyledContent(SWATCH.on(bg)),
            Print(format!(" {}  {}\n", named.color.to_hex_rgba(), named.label))
        )?;
    }
    out.flush()
}
