//! Snapshot rendering: formatting traits, screen control, factories

pub mod colored;
pub mod formatter;

pub use colored::ColoredFormatter;
pub use formatter::{FormattingOptions, PlainFormatter};

use crate::error::Result;
use crate::models::Snapshot;
use std::io::Write;

/// Renders one snapshot per tick to the terminal panel.
///
/// Implementations must not retain references into the snapshot past
/// the call.
pub trait Renderer: Send {
    fn render(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Formats a snapshot into the text of one full panel.
pub trait SnapshotFormatter: Send + Sync {
    fn format(&self, snapshot: &Snapshot) -> Result<String>;
}

/// Factory for the formatter matching the color configuration
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    pub fn create_formatter(
        enable_color: bool,
        options: FormattingOptions,
    ) -> Box<dyn SnapshotFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Terminal renderer: clears the screen and redraws the panel each
/// tick. The cursor is hidden while the renderer lives and restored
/// on drop, covering every exit path.
pub struct ScreenRenderer {
    formatter: Box<dyn SnapshotFormatter>,
    /// When set, no screen clearing and no cursor games: panels are
    /// appended, which keeps piped output readable.
    plain: bool,
}

impl ScreenRenderer {
    pub fn new(formatter: Box<dyn SnapshotFormatter>, plain: bool) -> Self {
        if !plain {
            // ESC[?25l hides the cursor
            print!("\x1b[?25l");
            let _ = std::io::stdout().flush();
        }
        Self { formatter, plain }
    }
}

impl Renderer for ScreenRenderer {
    fn render(&mut self, snapshot: &Snapshot) -> Result<()> {
        let panel = self.formatter.format(snapshot)?;
        let mut stdout = std::io::stdout();
        if !self.plain {
            // ESC[2J clears, ESC[H homes the cursor
            write!(stdout, "\x1b[2J\x1b[H")?;
        }
        write!(stdout, "{}", panel)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Drop for ScreenRenderer {
    fn drop(&mut self) {
        if !self.plain {
            // ESC[?25h restores the cursor
            print!("\x1b[?25h");
            let _ = std::io::stdout().flush();
        }
    }
}

/// Byte-rate formatting with 1024-based units, one decimal.
pub fn human_bytes(bps: f64) -> String {
    const UNITS: [&str; 5] = ["B/s", "KB/s", "MB/s", "GB/s", "TB/s"];
    let mut value = bps;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}
