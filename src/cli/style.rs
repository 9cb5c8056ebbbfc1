//! Terminal styling for build output
//!
//! Everything printed by the commands goes through [`Stylize`], so colors are
//! chosen in one place. Each release branch has its own color and a collapsed
//! canary/PTB entry gets a color of its own; unknown tags print plain.
//! `owo-colors` decides per stream whether color is emitted at all.

use std::fmt::{self, Display};

pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();

const CANARY: Style = Style::new().yellow();
const PTB: Style = Style::new().blue();
const STABLE: Style = Style::new().green();
const DEVELOPMENT: Style = Style::new().dimmed();
const COLLAPSED: Style = Style::new().magenta();
const PLAIN: Style = Style::new();

/// Style for a branch tag as stored, or `"collapsed"`
fn branch_style(tag: &str) -> Style {
    match tag {
        "canary" => CANARY,
        "ptb" => PTB,
        "stable" => STABLE,
        "development" => DEVELOPMENT,
        "collapsed" => COLLAPSED,
        _ => PLAIN,
    }
}

/// A value paired with the style and stream it prints to
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }

    /// Print to stderr (hints under an error)
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }

    /// Bold and underline, for builds that are live now
    #[must_use]
    pub const fn highlighted(mut self) -> Self {
        self.style = self.style.bold().underline();
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Styling helpers for anything printable
pub trait Stylize: Display {
    /// Build numbers
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, ACCENT, Stream::Stdout)
    }

    /// Confirmation after a write
    fn success(&self) -> Styled<&Self> {
        Styled::new(self, SUCCESS, Stream::Stdout)
    }

    /// Failure messages, on stderr
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Timestamps and hints
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }

    /// Section headings
    fn emphasis(&self) -> Styled<&Self> {
        Styled::new(self, EMPHASIS, Stream::Stdout)
    }

    /// Color of a branch tag, or `"collapsed"`
    fn branch(&self, tag: &str) -> Styled<&Self> {
        Styled::new(self, branch_style(tag), Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Recorded
pub const CHECK: &str = "✓";

/// Not found
pub const CROSS: &str = "✗";

/// Asset link bullet
pub const ARROW: &str = "→";

/// Marker for the build that is live right now
pub const CURRENT: &str = "●";

/// Separator between inline metadata
pub const DOT: &str = "·";

#[inline]
pub const fn check() -> Styled<&'static str> {
    Styled::new(CHECK, SUCCESS, Stream::Stdout)
}

#[inline]
pub const fn cross() -> Styled<&'static str> {
    Styled::new(CROSS, ERROR, Stream::Stderr)
}

#[inline]
pub const fn arrow() -> Styled<&'static str> {
    Styled::new(ARROW, ACCENT, Stream::Stdout)
}

#[inline]
pub const fn dot() -> Styled<&'static str> {
    Styled::new(DOT, MUTED, Stream::Stdout)
}

const fn to_hyperlink_stream(stream: Stream) -> supports_hyperlinks::Stream {
    match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    }
}

/// OSC 8 link labelled `text`, or the bare URL where links are unsupported
pub fn hyperlink(stream: Stream, text: &str, url: &str) -> String {
    if supports_hyperlinks::on(to_hyperlink_stream(stream)) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        url.to_string()
    }
}

