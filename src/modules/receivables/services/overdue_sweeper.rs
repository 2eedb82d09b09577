use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use super::ReceivableService;

/// Background job that flips past-due PENDING receivables to OVERDUE.
///
/// Runs the same sweep as `POST /receivables/mark-overdue` on a fixed period;
/// spawn it once from `main`.
pub struct OverdueSweeper {
    service: Arc<ReceivableService>,
    period: Duration,
}

impl OverdueSweeper {
    pub fn new(service: Arc<ReceivableService>, period: Duration) -> Self {
        Self { service, period }
    }

    pub async fn run(self) {
        info!(period_secs = self.period.as_secs(), "Starting overdue receivable sweeper");

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Err(e) = self.service.mark_overdue(Utc::now().date_naive()).await {
                error!(error = %e, "Overdue receivable sweep failed");
            }
        }
    }
}
