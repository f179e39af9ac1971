//! Signal handling for stopping a replay early.

use tokio::signal;
use tracing::info;

/// Resolves once the process is asked to stop (SIGINT or SIGTERM on Unix,
/// Ctrl+C elsewhere).
pub async fn wait_for_shutdown() -> Result<(), std::io::Error> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await?;

    info!("📡 Received shutdown signal - stopping replay");
    Ok(())
}
