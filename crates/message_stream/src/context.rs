//! Client state shared with translators during propagation.
//!
//! Replaces process-wide singletons (current frame, shell state, local player,
//! tactical view) with one value owned by the session and lent to each
//! translator call.

use crate::types::PlayerIndex;
use crate::view::View;

/// Environment a translator may read, and in the case of the view, drive.
pub struct ClientContext {
    frame: u32,
    shell_active: bool,
    local_player: PlayerIndex,
    view: Box<dyn View>,
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("frame", &self.frame)
            .field("shell_active", &self.shell_active)
            .field("local_player", &self.local_player)
            .field("view", &"[view]")
            .finish()
    }
}

impl ClientContext {
    /// Starts at frame 0 with the shell inactive.
    pub fn new(local_player: PlayerIndex, view: Box<dyn View>) -> Self {
        Self {
            frame: 0,
            shell_active: false,
            local_player,
            view,
        }
    }

    /// Current client frame. Game-only key bindings stay dormant until
    /// frame 1 so input during map load is ignored.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn set_frame(&mut self, frame: u32) {
        self.frame = frame;
    }

    pub fn advance_frame(&mut self) -> u32 {
        self.frame = self.frame.wrapping_add(1);
        self.frame
    }

    /// Whether a menu/shell screen is up.
    pub fn is_shell_active(&self) -> bool {
        self.shell_active
    }

    pub fn set_shell_active(&mut self, active: bool) {
        self.shell_active = active;
    }

    pub fn local_player(&self) -> PlayerIndex {
        self.local_player
    }

    pub fn set_local_player(&mut self, player: PlayerIndex) {
        self.local_player = player;
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        self.view.as_mut()
    }

    /// Downcasts the view to its concrete type.
    pub fn view_as<T: 'static>(&self) -> Option<&T> {
        self.view.as_any().downcast_ref::<T>()
    }
}
