//! Main application logic and lifecycle management.
//!
//! The `Application` builds a client session from configuration, then
//! drives it one tick per interval: scripted input goes in, the stream
//! propagates, and the command list is drained into the recorder.

use crate::cli::CliArgs;
use crate::config::{AppConfig, ConfigError};
use crate::consumer::CommandRecorder;
use crate::logging::display_banner;
use crate::script::InputScript;
use crate::signals::wait_for_shutdown;
use message_stream::{ClientSession, PlayerIndex, ViewState};
use std::time::Duration;
use tracing::{error, info, warn};

/// Ticks run past the last scripted frame so meta commands emitted on that
/// frame still reach the camera.
const SCRIPT_TAIL_TICKS: u32 = 2;

pub struct Application {
    config: AppConfig,
    session: ClientSession,
    script: InputScript,
    recorder: CommandRecorder,
    /// 0 means run until interrupted
    max_ticks: u32,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// Applies CLI overrides to `config`, validates it, and builds the
    /// session with the configured translator chain.
    pub fn new(args: CliArgs, mut config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if !args.config_path.exists() {
            warn!(
                "⚠️ Config file {} not found, using defaults",
                args.config_path.display()
            );
        }

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Some(ticks) = args.ticks {
            config.session.max_ticks = ticks;
        }

        config.validate().map_err(ConfigError::Invalid)?;
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        let translators = config.to_translator_config()?;
        let settings = &config.session;
        let mut session = ClientSession::with_default_translators(
            PlayerIndex(settings.local_player),
            Box::new(ViewState::new(settings.viewport_width, settings.viewport_height)),
            translators,
        );
        session.set_shell_active(settings.start_in_shell);

        let script = InputScript::new(&config.input, &config.shell);
        let max_ticks = match (settings.max_ticks, script.last_frame()) {
            (0, Some(last)) => last + 1 + SCRIPT_TAIL_TICKS,
            (ticks, _) => ticks,
        };

        info!(
            "📂 Config: {} | {} scripted events",
            args.config_path.display(),
            script.len()
        );

        Ok(Self {
            config,
            session,
            script,
            recorder: CommandRecorder::new(args.json_output),
            max_ticks,
        })
    }

    /// Runs the replay until the tick budget is spent or a shutdown signal
    /// arrives.
    pub async fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting replay");
        self.log_configuration_summary();

        let mut interval = tokio::time::interval(Duration::from_millis(self.config.session.tick_interval_ms));
        let shutdown = wait_for_shutdown();
        tokio::pin!(shutdown);

        if self.max_ticks == 0 {
            info!("🛑 Press Ctrl+C to stop");
        }

        loop {
            tokio::select! {
                result = &mut shutdown => {
                    if let Err(e) = result {
                        error!("❌ Signal handler failed: {}", e);
                    }
                    break;
                }
                _ = interval.tick() => {
                    self.tick()?;
                    if self.max_ticks != 0 && self.session.frame() >= self.max_ticks {
                        info!("🏁 Replayed {} ticks", self.max_ticks);
                        break;
                    }
                }
            }
        }

        self.log_final_statistics();
        info!("✅ Replay complete");
        Ok(())
    }

    /// One client frame.
    fn tick(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let frame = self.session.frame();
        self.script.apply(frame, &mut self.session);
        self.session.update();
        let commands = self.session.drain_commands();
        self.recorder.record(frame, &commands)?;
        Ok(())
    }

    fn log_configuration_summary(&self) {
        let session = &self.config.session;
        info!("📋 Configuration Summary:");
        info!("  🎮 Local player: {}", PlayerIndex(session.local_player));
        info!("  🖥️ Viewport: {}x{}", session.viewport_width, session.viewport_height);
        info!("  ⏱️ Tick interval: {}ms", session.tick_interval_ms);
        if self.max_ticks == 0 {
            info!("  🔁 Ticks: unbounded");
        } else {
            info!("  🔁 Ticks: {}", self.max_ticks);
        }
        if let Some(meta) = self.session.meta_event() {
            info!("  ⌨️ Bindings: {}", meta.map().len());
        }
    }

    fn log_final_statistics(&self) {
        let stats = self.session.stream().stats();
        info!("📊 Final Statistics:");
        info!("  - Propagation passes: {}", stats.passes);
        info!("  - Translate calls: {}", stats.translate_calls);
        info!("  - Messages synthesized: {}", stats.messages_synthesized);
        info!("  - Messages destroyed: {}", stats.messages_destroyed);
        info!("  - Messages forwarded: {}", stats.messages_forwarded);

        if let Some(view) = self.session.client().view_as::<ViewState>() {
            let position = view.position();
            info!(
                "  - Camera: ({:.1}, {:.1}) angle {:.2} pitch {:.2} fov {:.2}",
                position.x,
                position.y,
                view.angle(),
                view.pitch(),
                view.fov()
            );
        }

        self.recorder.log_summary();
    }

    #[cfg(test)]
    pub(crate) fn max_ticks(&self) -> u32 {
        self.max_ticks
    }

    #[cfg(test)]
    pub(crate) fn recorder(&self) -> &CommandRecorder {
        &self.recorder
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &ClientSession {
        &self.session
    }
}
