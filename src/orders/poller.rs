//! Order status polling.
//!
//! A displayed order is kept fresh by re-fetching it on a fixed cadence.
//! Each resolved fetch replaces the published projection wholesale, so the
//! most recently resolved response wins even if it was not the most
//! recently issued one; at this cadence and payload size that is accepted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::warn;

use super::models::Order;
use super::service::OrdersApi;

/// Starts polling tasks for individual orders.
#[derive(Debug)]
pub struct OrderPoller;

impl OrderPoller {
    /// Start polling `order_id`: one immediate fetch, then one per
    /// `interval` tick.
    ///
    /// A failed tick is logged and polling continues on the next tick; no
    /// backoff or retry. The task winds down on its own once the order
    /// reaches a terminal status, or when [`PollHandle::stop`] is called.
    pub fn start(
        orders: Arc<dyn OrdersApi>,
        order_id: impl Into<String>,
        interval: Duration,
    ) -> PollHandle {
        let order_id = order_id.into();
        let (updates_tx, updates_rx) = watch::channel(None);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let outcome =
                            fetch_and_publish(orders.as_ref(), &order_id, &updates_tx).await;

                        if outcome == TickOutcome::Terminal {
                            break;
                        }
                    }
                }
            }
        });

        PollHandle {
            stop: Some(stop_tx),
            task,
            updates: updates_rx,
        }
    }
}

/// Running poll task; dropping the handle cancels polling.
pub struct PollHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    updates: watch::Receiver<Option<Order>>,
}

impl PollHandle {
    /// Subscribe to published order projections. The channel starts at
    /// `None` and holds the latest resolved fetch afterwards.
    #[must_use]
    pub fn updates(&self) -> watch::Receiver<Option<Order>> {
        self.updates.clone()
    }

    /// Stop polling and wait for the task to wind down.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            _ = stop.send(());
        }

        if let Err(error) = (&mut self.task).await {
            if !error.is_cancelled() {
                warn!(%error, "order poll task ended abnormally");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("stopped", &self.stop.is_none())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    Continue,
    Terminal,
}

/// One poll tick: fetch the order and publish it on resolution.
async fn fetch_and_publish(
    orders: &dyn OrdersApi,
    order_id: &str,
    updates: &watch::Sender<Option<Order>>,
) -> TickOutcome {
    match orders.get_order(order_id).await {
        Ok(order) => {
            let terminal = order.status.is_terminal();

            _ = updates.send_replace(Some(order));

            if terminal {
                TickOutcome::Terminal
            } else {
                TickOutcome::Continue
            }
        }
        Err(error) => {
            warn!(%error, order_id, "order poll tick failed");
            TickOutcome::Continue
        }
    }
}
