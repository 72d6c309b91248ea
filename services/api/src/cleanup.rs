//! Background sweeper for expired sessions.
//!
//! The session resolver already treats expired rows as "no session"; this
//! worker only keeps the table from growing without bound.

use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::db::SessionStore;

#[derive(Debug, Clone)]
pub struct SessionSweeperConfig {
    pub interval: Duration,
    /// Days an expired session is kept before deletion.
    pub expired_grace_days: i32,
}

impl Default for SessionSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
            expired_grace_days: 1,
        }
    }
}

pub struct SessionSweeper {
    sessions: SessionStore,
    config: SessionSweeperConfig,
}

impl SessionSweeper {
    pub fn new(pool: PgPool, config: SessionSweeperConfig) -> Self {
        Self {
            sessions: SessionStore::new(pool),
            config,
        }
    }

    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            expired_grace_days = self.config.expired_grace_days,
            "Starting session sweeper"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.sweep().await;
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Session sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }

    async fn sweep(&self) {
        match self
            .sessions
            .delete_expired(self.config.expired_grace_days)
            .await
        {
            Ok(count) => {
                if count > 0 {
                    info!(deleted = count, "Cleaned up expired sessions");
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to clean up expired sessions");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweeper_config_defaults() {
        let config = SessionSweeperConfig::default();
        assert_eq!(config.interval, Duration::from_secs(3600));
        assert_eq!(config.expired_grace_days, 1);
    }
}
