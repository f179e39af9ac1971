//! Stand-in for the simulation/network layer: drains the command list each
//! tick and reports what reached it.

use message_stream::{Message, MessageType};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

#[derive(Serialize)]
struct CommandLine<'a> {
    frame: u32,
    #[serde(flatten)]
    message: &'a Message,
}

/// Records drained commands as log lines, or as JSON lines on stdout.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    json: bool,
    ticks: u64,
    commands: u64,
    by_type: BTreeMap<&'static str, u64>,
}

impl CommandRecorder {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            ..Self::default()
        }
    }

    /// Records one tick's commands. Frame ticks are counted, not printed.
    pub fn record(&mut self, frame: u32, commands: &[Message]) -> Result<(), Box<dyn std::error::Error>> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for message in commands {
            if message.kind() == MessageType::FrameTick {
                self.ticks += 1;
                continue;
            }
            self.commands += 1;
            *self.by_type.entry(message.name()).or_default() += 1;

            if self.json {
                serde_json::to_writer(&mut out, &CommandLine { frame, message })?;
                writeln!(out)?;
            } else {
                info!("📤 [frame {:>4}] {}", frame, message);
            }
        }
        Ok(())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Commands recorded, frame ticks excluded.
    pub fn commands(&self) -> u64 {
        self.commands
    }

    pub fn count(&self, kind: MessageType) -> u64 {
        self.by_type.get(kind.name()).copied().unwrap_or(0)
    }

    pub fn log_summary(&self) {
        info!("📊 Command Summary:");
        info!("  - Frame ticks: {}", self.ticks);
        info!("  - Commands: {}", self.commands);
        for (name, count) in &self.by_type {
            info!("    {}: {}", name, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use message_stream::{ICoord2D, PlayerIndex};

    #[test]
    fn test_counts_by_type() {
        let mut recorder = CommandRecorder::new(false);
        let mut move_to = Message::new(MessageType::DoMoveTo, PlayerIndex(0));
        move_to.append_pixel(ICoord2D::new(3, 4));
        let batch = vec![
            Message::new(MessageType::FrameTick, PlayerIndex(0)),
            move_to,
            Message::new(MessageType::DoStop, PlayerIndex(0)),
            Message::new(MessageType::DoStop, PlayerIndex(0)),
        ];
        recorder.record(7, &batch).unwrap();

        assert_eq!(recorder.ticks(), 1);
        assert_eq!(recorder.commands(), 3);
        assert_eq!(recorder.count(MessageType::DoStop), 2);
        assert_eq!(recorder.count(MessageType::DoScatter), 0);
    }

    #[test]
    fn test_json_line_shape() {
        let mut message = Message::new(MessageType::DoMoveTo, PlayerIndex(1));
        message.append_integer(5);
        let line = serde_json::to_value(CommandLine { frame: 12, message: &message }).unwrap();
        assert_eq!(line["frame"], 12);
        assert_eq!(line["kind"], "MSG_DO_MOVETO");
        assert_eq!(line["arguments"][0]["type"], "integer");
        assert_eq!(line["arguments"][0]["value"], 5);
    }
}
