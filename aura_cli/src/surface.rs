//! Render surfaces for the terminal.

use std::io::{self, Write};
use std::time::Duration;

use aura_core::orb::OrbPhase;
use aura_core::session::{RenderSurface, SessionFrame};
use tracing::warn;

/// One JSON object per frame on stdout.
pub struct JsonLines<W: Write> {
    out: W,
    failed: bool,
}

impl JsonLines<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }
}

impl<W: Write> RenderSurface for JsonLines<W> {
    fn present(&mut self, frame: &SessionFrame) {
        if self.failed {
            return;
        }
        let result = serde_json::to_writer(&mut self.out, frame)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = result {
            // Usually a closed pipe; stop writing instead of spamming.
            warn!(error = %e, "frame output failed");
            self.failed = true;
        }
    }
}

/// Human-readable progress: a line on every phase change and a sample
/// every `every` frames.
pub struct Terminal {
    every: u64,
    presented: u64,
    last_phase: Option<OrbPhase>,
    transitions: Vec<(OrbPhase, Duration)>,
}

impl Terminal {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            presented: 0,
            last_phase: None,
            transitions: Vec::new(),
        }
    }

    /// When each phase was first presented.
    pub fn transitions(&self) -> &[(OrbPhase, Duration)] {
        &self.transitions
    }
}

impl RenderSurface for Terminal {
    fn present(&mut self, frame: &SessionFrame) {
        self.presented += 1;
        let orb = &frame.orb;
        let ms = frame.elapsed.as_millis();

        if self.last_phase != Some(orb.phase) {
            self.last_phase = Some(orb.phase);
            self.transitions.push((orb.phase, frame.elapsed));
            println!(
                "{} {}",
                console::style(format!("{ms:>6}ms")).dim(),
                console::style(format!("▶ {}", orb.phase)).cyan().bold()
            );
        }

        if self.presented % self.every == 0 {
            let sizes: Vec<String> = frame
                .dock
                .items
                .iter()
                .map(|item| {
                    let size = format!("{:.1}", item.size);
                    if item.label_visible {
                        console::style(size).green().to_string()
                    } else {
                        size
                    }
                })
                .collect();
            println!(
                "{} orb x={:>7.1} y={:>7.1} scale={:.3} opacity={:.2} │ dock {:.0}px [{}]",
                console::style(format!("{ms:>6}ms")).dim(),
                orb.x,
                orb.y,
                orb.scale,
                orb.opacity,
                frame.dock.panel_width,
                sizes.join(" ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::config::ConfigStore;
    use aura_core::session::{Session, SessionOptions};

    #[test]
    fn json_lines_writes_one_line_per_frame() {
        let mut session = Session::new(ConfigStore::in_memory(), SessionOptions::default());
        let mut surface = JsonLines::new(Vec::new());
        session.render(Duration::from_millis(16), &mut surface);
        session.render(Duration::from_millis(16), &mut surface);

        let text = String::from_utf8(surface.out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["elapsed"], 32);
    }

    #[test]
    fn terminal_records_phase_changes() {
        let mut session = Session::new(ConfigStore::in_memory(), SessionOptions::default());
        let mut surface = Terminal::new(1000);
        session.render(Duration::from_millis(16), &mut surface);
        session.complete_intro();
        session.render(Duration::from_millis(16), &mut surface);

        let phases: Vec<OrbPhase> = surface.transitions().iter().map(|(p, _)| *p).collect();
        assert_eq!(phases, vec![OrbPhase::Intro, OrbPhase::Handoff]);
    }
}
