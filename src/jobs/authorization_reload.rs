use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{authz::AuthorizationManager, config::ReloadConfig};

/// Starts the authorization reload worker.
///
/// Reloads the manager's matrix every `interval_secs` until `cancel` fires.
/// A failed reload keeps the previous matrix and the worker carries on.
pub async fn start_authorization_reload_worker(
    manager: Arc<AuthorizationManager>,
    config: ReloadConfig,
    cancel: CancellationToken,
) {
    if !config.enabled {
        tracing::info!("Authorization reload worker disabled by configuration");
        return;
    }

    let interval = Duration::from_secs(config.interval_secs);
    tracing::info!(
        interval_secs = config.interval_secs,
        "Starting authorization reload worker"
    );

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Authorization reload worker stopped");
                return;
            }
            _ = tokio::time::sleep(interval) => {}
        }

        match manager.reload_authorizations().await {
            Ok(()) => tracing::debug!(
                rule_count = manager.rule_count(),
                last_reload = %manager.last_reload(),
                "Authorization reload run complete"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                last_reload = %manager.last_reload(),
                "Authorization reload run failed"
            ),
        }
    }
}
