//! Warm paper palette for the terminal dashboard.
//!
//! The line colours of the SEPA charts come from the chart specs as `#rrggbb`
//! strings, so the page and the terminal draw the same series in the same
//! colours. Everything else is a fixed set of style helpers.

use ratatui::style::{Color, Modifier, Style};

use rankboard_core::Action;

pub const ACCENT: Color = Color::Rgb(42, 111, 151);
pub const POSITIVE: Color = Color::Rgb(46, 160, 90);
pub const NEGATIVE: Color = Color::Rgb(214, 90, 49);
pub const WARNING: Color = Color::Rgb(224, 164, 60);
pub const MUTED: Color = Color::Rgb(140, 132, 120);
pub const TEXT: Color = Color::Rgb(236, 230, 218);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn header() -> Style {
    text().add_modifier(Modifier::BOLD)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn tab(active: bool) -> Style {
    if active {
        accent_bold().add_modifier(Modifier::REVERSED)
    } else {
        muted()
    }
}

pub fn action(action: Action) -> Style {
    match action {
        Action::Buy => positive().add_modifier(Modifier::BOLD),
        Action::Sell => negative().add_modifier(Modifier::BOLD),
        Action::Hold => muted(),
    }
}

/// Parse `#rrggbb`. Anything else falls back to plain text colour.
pub fn hex_color(hex: &str) -> Color {
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match (hex.len(), hex.starts_with('#')) {
        (7, true) => match (parse(1..3), parse(3..5), parse(5..7)) {
            (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
            _ => TEXT,
        },
        _ => TEXT,
    }
}

/// Chart line colour. Near-black lines (the close price) would vanish on a
/// dark terminal, so they are drawn in the text colour instead.
pub fn line_color(hex: &str) -> Color {
    match hex_color(hex) {
        Color::Rgb(r, g, b) if u16::from(r) + u16::from(g) + u16::from(b) < 120 => TEXT,
        other => other,
    }
}
