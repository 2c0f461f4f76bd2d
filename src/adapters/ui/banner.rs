//! Welcome banner: "SAKURA" in figlet's standard font, shaded left to right
//! from blossom pink to plum, under a row of petals.

use crossterm::QueueableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{self, Write, stdout};

const BLOSSOM_PINK: Color = Color::Rgb {
    r: 0xff,
    g: 0xb7,
    b: 0xc5,
};
const DEEP_PLUM: Color = Color::Rgb {
    r: 0xc7,
    g: 0x15,
    b: 0x85,
};

/// Colour at `t` in [0.0, 1.0] along the pink to plum ramp.
fn shade(t: f64) -> Color {
    let (Color::Rgb { r: r0, g: g0, b: b0 }, Color::Rgb { r: r1, g: g1, b: b1 }) =
        (BLOSSOM_PINK, DEEP_PLUM)
    else {
        return BLOSSOM_PINK;
    };
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::Rgb {
        r: mix(r0, r1),
        g: mix(g0, g1),
        b: mix(b0, b1),
    }
}

/// Figlet rendering of `text`; plain text if the font cannot render it.
fn figure_lines(text: &str) -> Vec<String> {
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(text).map(|figure| figure.to_string()))
        .unwrap_or_else(|| text.to_string());
    art.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn write_banner(out: &mut impl Write) -> io::Result<()> {
    let lines = figure_lines("SAKURA");
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(1);

    out.queue(SetForegroundColor(BLOSSOM_PINK))?;
    out.queue(Print(format!("{}\r\n", "❀ ".repeat(width / 2))))?;
    for line in &lines {
        for (col, ch) in line.chars().enumerate() {
            out.queue(SetForegroundColor(shade(col as f64 / width as f64)))?;
            out.queue(Print(ch))?;
        }
        out.queue(Print("\r\n"))?;
    }
    out.queue(SetForegroundColor(DEEP_PLUM))?;
    out.queue(Print(format!(
        "v{}  Learn Japanese with Sakura-sensei\r\n",
        env!("CARGO_PKG_VERSION")
    )))?;
    out.queue(ResetColor)?;
    out.flush()
}

/// Print the banner to stdout. Terminal errors are ignored.
pub fn print_welcome() {
    let _ = write_banner(&mut stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_endpoints() {
        assert_eq!(shade(0.0), BLOSSOM_PINK);
        assert_eq!(shade(1.0), DEEP_PLUM);
        assert_eq!(shade(7.0), DEEP_PLUM);
    }

    #[test]
    fn test_banner_renders_figure_and_tagline() {
        assert!(figure_lines("SAKURA").len() > 1);
        let mut buf = Vec::new();
        write_banner(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Sakura-sensei"));
    }
}
