//! Scripted device input, replayed frame by frame.
//!
//! ```toml
//! [[input]]
//! frame = 3
//! event = "key_down"
//! key = "KEY_UP"
//!
//! [[shell]]
//! frame = 40
//! active = true
//! ```

use message_stream::{ClientSession, RawInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One device event and the client frame it is fed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    pub frame: u32,
    #[serde(flatten)]
    pub event: RawInput,
}

/// Raises or dismisses the shell screen on a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellToggle {
    pub frame: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
struct FrameSteps {
    shell: Option<bool>,
    inputs: Vec<RawInput>,
}

/// Script events grouped by frame, file order kept within a frame.
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    frames: BTreeMap<u32, FrameSteps>,
    events: usize,
}

impl InputScript {
    pub fn new(inputs: &[ScriptedInput], shell: &[ShellToggle]) -> Self {
        let mut frames: BTreeMap<u32, FrameSteps> = BTreeMap::new();
        for toggle in shell {
            frames.entry(toggle.frame).or_default().shell = Some(toggle.active);
        }
        for input in inputs {
            frames.entry(input.frame).or_default().inputs.push(input.event);
        }
        Self {
            frames,
            events: inputs.len() + shell.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of scripted entries.
    pub fn len(&self) -> usize {
        self.events
    }

    pub fn last_frame(&self) -> Option<u32> {
        self.frames.keys().next_back().copied()
    }

    /// Feeds the session everything scheduled for `frame`: the shell change
    /// first, then device events. Returns how many device events were queued.
    pub fn apply(&self, frame: u32, session: &mut ClientSession) -> usize {
        let Some(steps) = self.frames.get(&frame) else {
            return 0;
        };
        if let Some(active) = steps.shell {
            debug!("🪟 Frame {}: shell {}", frame, if active { "up" } else { "down" });
            session.set_shell_active(active);
        }
        for input in &steps.inputs {
            session.push_input(input);
        }
        steps.inputs.len()
    }
}
