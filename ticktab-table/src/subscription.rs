//! Worker thread that owns a table state and feeds a subscriber.
//!
//! The transport pushes decoded updates (or transport errors) into the
//! channel returned by [`SubscriptionHandle::sender`]. The worker applies
//! them in channel order and calls the subscriber synchronously, so a slow
//! callback holds back ingestion. The first error of any kind is reported
//! once through [`TickingCallback::on_failure`] and ends the subscription.

use std::thread::{self, JoinHandle};

use arrow::datatypes::Schema;
use crossbeam_channel::{Receiver, Sender, bounded, select};
use ticktab_result::{Error, Result};

use crate::config::SubscriptionConfig;
use crate::schema::TableSchema;
use crate::table_state::TickingTableState;
use crate::ticking::TickingUpdate;
use crate::update::TableUpdate;

/// Receiver of table changes. Called on the subscription worker thread.
pub trait TickingCallback: Send + 'static {
    /// One applied update.
    fn on_tick(&mut self, update: &TickingUpdate);

    /// The subscription failed; no ticks follow.
    fn on_failure(&mut self, error: Error);
}

/// Producer side of a subscription's update channel.
pub type UpdateSender = Sender<Result<TableUpdate>>;

pub struct Subscription;

impl Subscription {
    /// Spawn the worker for a table with the given Arrow schema.
    ///
    /// Schema conversion and thread spawn errors are returned here; the
    /// callback only ever sees errors raised after the worker started.
    pub fn start<C: TickingCallback>(
        schema: &Schema,
        config: SubscriptionConfig,
        callback: C,
    ) -> Result<SubscriptionHandle> {
        let state = TickingTableState::new(TableSchema::from_arrow(schema)?, config.table);
        Self::start_with_state(state, config, callback)
    }

    /// Spawn the worker around an existing state, e.g. one built with
    /// [`TickingTableState::with_initial_data`].
    pub fn start_with_state<C: TickingCallback>(
        state: TickingTableState,
        config: SubscriptionConfig,
        callback: C,
    ) -> Result<SubscriptionHandle> {
        let (update_tx, update_rx) = bounded(config.channel_capacity);
        let (cancel_tx, cancel_rx) = bounded(1);
        let worker = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_worker(state, update_rx, cancel_rx, callback))?;
        tracing::debug!(thread = %config.thread_name, "subscription started");
        Ok(SubscriptionHandle {
            updates: update_tx,
            cancel: Some(cancel_tx),
            worker: Some(worker),
        })
    }
}

/// Owner of a running subscription. Dropping it cancels the subscription.
pub struct SubscriptionHandle {
    updates: UpdateSender,
    cancel: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// A sender for the transport to push updates into.
    pub fn sender(&self) -> UpdateSender {
        self.updates.clone()
    }

    /// True once the worker has exited (failure, cancellation, or every
    /// sender dropped).
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the worker and wait for it. An update being applied runs to
    /// completion first.
    pub fn cancel(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(cancel) = self.cancel.take() {
            // The worker may already be gone; a closed channel is fine.
            let _ = cancel.try_send(());
        }
        match self.worker.take() {
            Some(worker) => worker
                .join()
                .map_err(|_| Error::Internal("subscription worker panicked".into())),
            None => Ok(()),
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::warn!(error = %err, "subscription shutdown failed");
        }
    }
}

fn run_worker<C: TickingCallback>(
    mut state: TickingTableState,
    updates: Receiver<Result<TableUpdate>>,
    cancel: Receiver<()>,
    mut callback: C,
) {
    let mut ticks = 0u64;
    loop {
        select! {
            recv(cancel) -> _ => {
                tracing::debug!(ticks, "subscription cancelled");
                return;
            }
            recv(updates) -> message => match message {
                Err(_) => {
                    tracing::debug!(ticks, "update channel closed");
                    return;
                }
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "transport reported failure");
                    callback.on_failure(err);
                    return;
                }
                Ok(Ok(update)) => match state.apply_update(update) {
                    Ok(ticking) => {
                        ticks += 1;
                        callback.on_tick(&ticking);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, ticks, "update rejected");
                        callback.on_failure(err);
                        return;
                    }
                },
            },
        }
    }
}
