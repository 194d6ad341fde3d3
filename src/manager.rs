// SPDX-License-Identifier: AGPL-3.0-or-later

use std::future::Future;

use anyhow::Result;
use log::{error, info, warn};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task;
use tokio::task::JoinHandle;
use triggered::{Listener, Trigger};

/// Sends messages through the communication bus between services.
pub type Sender<T> = broadcast::Sender<T>;

/// Resolves as soon as the services are asked to shut down.
pub type Shutdown = JoinHandle<()>;

/// Long-running async service receiving the shared context, the shutdown signal and the
/// communication bus.
///
/// Implemented for every matching async function via `async_trait`, so services can be plain
/// `async fn`s or closures.
#[async_trait::async_trait]
pub trait Service<D, M>
where
    D: Clone + Send + Sync + 'static,
    M: Clone + Send + Sync + 'static,
{
    async fn call(&self, context: D, shutdown: Shutdown, tx: Sender<M>) -> Result<()>;
}

#[async_trait::async_trait]
impl<FN, F, D, M> Service<D, M> for FN
where
    FN: Fn(D, Shutdown, Sender<M>) -> F + Sync,
    F: Future<Output = Result<()>> + Send + 'static,
    D: Clone + Send + Sync + 'static,
    M: Clone + Send + Sync + 'static,
{
    async fn call(&self, context: D, shutdown: Shutdown, tx: Sender<M>) -> Result<()> {
        (self)(context, shutdown, tx).await
    }
}

/// Fires the wrapped trigger when dropped, also when the owning task panicked.
#[derive(Clone)]
struct ExitSignal(Trigger);

impl ExitSignal {
    fn trigger(&self) {
        self.0.trigger();
    }
}

impl Drop for ExitSignal {
    fn drop(&mut self) {
        self.trigger();
    }
}

/// Runs services as concurrent tasks sharing a context and a message bus.
///
/// A service stopping for any reason (error, panic or returning early) fires the exit signal
/// which can be awaited with `on_exit`. Services are expected to run until they receive the
/// shutdown signal.
#[allow(missing_debug_implementations)]
pub struct ServiceManager<D, M>
where
    D: Clone + Send + Sync + 'static,
    M: Clone + Send + Sync + 'static,
{
    context: D,

    tx: Sender<M>,

    exit_signal: ExitSignal,

    exit_handle: Listener,

    /// Every running service holds a clone of this sender. Shutdown is complete once all clones
    /// are dropped and the channel closes.
    shutdown_signal: broadcast::Sender<bool>,
}

impl<D, M> ServiceManager<D, M>
where
    D: Clone + Send + Sync + 'static,
    M: Clone + Send + Sync + 'static,
{
    /// Returns a manager whose bus buffers at most `capacity` messages per receiver.
    pub fn new(capacity: usize, context: D) -> Self {
        Self::with_sender(broadcast::channel(capacity).0, context)
    }

    /// Returns a manager using an already created bus sender.
    pub fn with_sender(tx: Sender<M>, context: D) -> Self {
        let (shutdown_signal, _) = broadcast::channel(16);
        let (exit_signal, exit_handle) = triggered::trigger();

        Self {
            context,
            tx,
            exit_signal: ExitSignal(exit_signal),
            exit_handle,
            shutdown_signal,
        }
    }

    /// Sender of the communication bus shared by all services.
    pub fn sender(&self) -> Sender<M> {
        self.tx.clone()
    }

    /// Spawns a service.
    pub fn add<F: Service<D, M> + Send + Sync + Copy + 'static>(
        &mut self,
        name: &'static str,
        service: F,
    ) {
        let tx = self.tx.clone();
        let shutdown_tx = self.shutdown_signal.clone();
        let mut shutdown_rx = shutdown_tx.subscribe();

        let signal = task::spawn(async move {
            let _ = shutdown_rx.recv().await;
        });

        let exit_signal = self.exit_signal.clone();
        let context = self.context.clone();

        task::spawn(async move {
            info!("Start {} service", name);

            let result = service.call(context, signal, tx).await;

            // Marks this service as stopped for `shutdown`
            drop(shutdown_tx);

            match result {
                Ok(()) => info!("Stopped {} service", name),
                Err(err) => {
                    error!("Error in {} service: {}", name, err);
                    exit_signal.trigger();
                }
            }
        });
    }

    /// Resolves as soon as a service returned, failed or panicked.
    pub async fn on_exit(&self) {
        self.exit_handle.clone().await;
    }

    /// Sends the shutdown signal to all services and waits until every one of them stopped.
    pub async fn shutdown(self) {
        info!("Received shutdown signal");

        let mut rx = self.shutdown_signal.subscribe();

        if self.shutdown_signal.send(true).is_err() {
            warn!("No running services to shut down");
        }

        drop(self.shutdown_signal);

        loop {
            if let Err(RecvError::Closed) = rx.recv().await {
                break;
            }
        }
    }
}
