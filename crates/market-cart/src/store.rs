//! The cart store: in-memory cart state with ordered background persistence.
//!
//! A [`CartStore`] owns the current [`CartCollection`] and a single writer
//! task. Mutations run synchronously on the caller, publish the new snapshot
//! through a `watch` channel, and queue a save. The writer task hydrates the
//! cart from storage first, then handles saves one at a time, always writing
//! the latest snapshot, so stored data can never be overwritten by an older
//! cart.

use std::sync::Arc;

use market_storage::{Cache, KeyValueStore, StorageError};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::cart::{CartCollection, Product};
use crate::config::{CartConfig, CorruptSnapshotPolicy};
use crate::error::CartError;
use crate::ids::ProductId;

/// Hydration progress of a cart store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// The stored snapshot has not been read yet. The cart reads as empty.
    Loading,
    /// Hydration finished. Changes are being persisted.
    Ready,
    /// Hydration failed. The cart works in memory but is not persisted.
    Failed(String),
}

/// A published cart snapshot.
#[derive(Debug, Clone)]
pub struct CartState {
    /// Hydration progress.
    pub phase: Phase,
    /// Current cart contents.
    pub products: Arc<CartCollection>,
    /// Incremented on every change to `products`.
    pub revision: u64,
}

impl CartState {
    fn initial() -> Self {
        Self {
            phase: Phase::Loading,
            products: Arc::new(CartCollection::new()),
            revision: 0,
        }
    }
}

enum Command {
    Save,
    Flush(oneshot::Sender<Result<(), CartError>>),
}

/// Handle to a live cart.
///
/// Obtained from [`CartStore::spawn`] or [`CartStore::open`]; there is no
/// other way to reach the cart operations. Must be created inside a Tokio
/// runtime.
///
/// # Example
///
/// ```rust,ignore
/// let store = CartStore::open(Arc::new(MemoryStore::new()), CartConfig::default()).await?;
///
/// store.add_to_cart(Product::new("a", "Shirt", "https://img/a.png", 19.9));
/// store.increment(&ProductId::new("a"));
/// assert_eq!(store.products().item_count(), 2);
///
/// store.shutdown().await?;
/// ```
pub struct CartStore {
    state: Arc<watch::Sender<CartState>>,
    commands: mpsc::UnboundedSender<Command>,
    writer: JoinHandle<()>,
    config: CartConfig,
}

impl CartStore {
    /// Start a cart store without waiting for hydration.
    ///
    /// The store starts in [`Phase::Loading`] with an empty cart. Hydration
    /// replaces the cart wholesale if a snapshot is found, including any
    /// changes made while loading.
    pub fn spawn(storage: Arc<dyn KeyValueStore>, config: CartConfig) -> Self {
        let state = Arc::new(watch::Sender::new(CartState::initial()));
        let (commands, rx) = mpsc::unbounded_channel();

        let writer = Writer {
            cache: Cache::new(storage),
            state: Arc::clone(&state),
            config: config.clone(),
            written_revision: 0,
            last_error: None,
        };
        let writer = tokio::spawn(writer.run(rx));

        Self {
            state,
            commands,
            writer,
            config,
        }
    }

    /// Start a cart store and wait for hydration to finish.
    ///
    /// Returns [`CartError::Hydration`] if the stored snapshot could not be
    /// loaded under [`CorruptSnapshotPolicy::Fail`].
    pub async fn open(
        storage: Arc<dyn KeyValueStore>,
        config: CartConfig,
    ) -> Result<Self, CartError> {
        let store = Self::spawn(storage, config);
        store.hydrated().await?;
        Ok(store)
    }

    /// Wait until hydration has finished.
    pub async fn hydrated(&self) -> Result<(), CartError> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|s| s.phase != Phase::Loading)
            .await
            .map_err(|_| CartError::WriterClosed)?;

        match &state.phase {
            Phase::Failed(reason) => Err(CartError::Hydration(reason.clone())),
            _ => Ok(()),
        }
    }

    /// Add one unit of a product, appending it if it isn't in the cart yet.
    ///
    /// Any quantity the caller's value carries is ignored. Returns whether the
    /// cart changed.
    pub fn add_to_cart(&self, product: impl Into<Product>) -> bool {
        let product = product.into();
        let id = product.id.clone();
        self.apply("add_to_cart", &id, |cart| cart.with_added(product))
    }

    /// Add one unit of a product already in the cart. No-op for unknown ids.
    pub fn increment(&self, id: &ProductId) -> bool {
        self.apply("increment", id, |cart| cart.with_incremented(id))
    }

    /// Remove one unit of a product, dropping it at zero. No-op for unknown ids.
    pub fn decrement(&self, id: &ProductId) -> bool {
        self.apply("decrement", id, |cart| cart.with_decremented(id))
    }

    fn apply<F>(&self, op: &'static str, id: &ProductId, f: F) -> bool
    where
        F: FnOnce(&CartCollection) -> Option<CartCollection>,
    {
        let changed = self.state.send_if_modified(|state| {
            match f(state.products.as_ref()) {
                Some(next) => {
                    state.products = Arc::new(next);
                    state.revision += 1;
                    true
                }
                None => false,
            }
        });

        if changed {
            debug!(op, %id, "cart changed");
            if self.commands.send(Command::Save).is_err() {
                warn!(op, %id, "cart writer stopped, change kept in memory only");
            }
        } else {
            debug!(op, %id, "cart unchanged");
        }
        changed
    }

    /// Current cart contents. Empty until hydration completes.
    pub fn products(&self) -> Arc<CartCollection> {
        Arc::clone(&self.state.borrow().products)
    }

    /// Current hydration phase.
    pub fn phase(&self) -> Phase {
        self.state.borrow().phase.clone()
    }

    /// Full current snapshot.
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// The configuration this store was started with.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Wait for every save queued so far to be written.
    ///
    /// Returns an error if the latest write failed or if hydration failed.
    pub async fn flush(&self) -> Result<(), CartError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command::Flush(tx))
            .map_err(|_| CartError::WriterClosed)?;
        rx.await.map_err(|_| CartError::WriterClosed)?
    }

    /// Flush pending saves and stop the writer task.
    pub async fn shutdown(self) -> Result<(), CartError> {
        let result = self.flush().await;
        drop(self.commands);
        if let Err(e) = self.writer.await {
            error!(error = %e, "cart writer task failed");
            return Err(CartError::WriterClosed);
        }
        result
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// The single task that reads and writes the stored cart.
struct Writer {
    cache: Cache,
    state: Arc<watch::Sender<CartState>>,
    config: CartConfig,
    written_revision: u64,
    last_error: Option<String>,
}

const WRITER_STOPPED: &str = "cart writer stopped before hydration finished";

/// Fails hydration if the writer goes away while still loading, so
/// `hydrated` waiters are released.
impl Drop for Writer {
    fn drop(&mut self) {
        self.state.send_if_modified(|state| {
            if state.phase != Phase::Loading {
                return false;
            }
            error!("{}", WRITER_STOPPED);
            state.phase = Phase::Failed(WRITER_STOPPED.to_string());
            true
        });
    }
}

impl Writer {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let failure = self.hydrate().await;

        while let Some(command) = commands.recv().await {
            match command {
                Command::Save => {
                    if failure.is_none() {
                        self.save().await;
                    }
                }
                Command::Flush(reply) => {
                    let result = match (&failure, &self.last_error) {
                        (Some(reason), _) => Err(CartError::Hydration(reason.clone())),
                        (None, Some(err)) => Err(CartError::Persist(err.clone())),
                        (None, None) => Ok(()),
                    };
                    let _ = reply.send(result);
                }
            }
        }

        debug!("cart writer stopped");
    }

    /// Load the stored snapshot. Returns the failure reason if persistence
    /// must stay off.
    #[instrument(skip(self), fields(key = %self.config.storage_key))]
    async fn hydrate(&mut self) -> Option<String> {
        match self.load().await {
            Ok(Some(collection)) => {
                info!(items = collection.len(), "cart hydrated");
                let mut revision = 0;
                self.state.send_modify(|state| {
                    state.products = Arc::new(collection);
                    state.revision += 1;
                    state.phase = Phase::Ready;
                    revision = state.revision;
                });
                self.written_revision = revision;
                None
            }
            Ok(None) => {
                info!("no stored cart, starting empty");
                self.state.send_modify(|state| state.phase = Phase::Ready);
                None
            }
            Err(e) => match self.config.on_corrupt_snapshot {
                CorruptSnapshotPolicy::Discard => {
                    warn!(error = %e, "discarding unreadable cart snapshot");
                    self.state.send_modify(|state| state.phase = Phase::Ready);
                    None
                }
                CorruptSnapshotPolicy::Fail => {
                    error!(error = %e, "cart hydration failed, persistence disabled");
                    let reason = e.to_string();
                    self.state
                        .send_modify(|state| state.phase = Phase::Failed(reason.clone()));
                    Some(reason)
                }
            },
        }
    }

    async fn load(&self) -> Result<Option<CartCollection>, CartError> {
        match self.cache.get::<CartCollection>(&self.config.storage_key).await {
            Ok(found) => Ok(found),
            Err(StorageError::Serialization(e)) => Err(CartError::CorruptSnapshot(e)),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&mut self) {
        let (revision, snapshot) = {
            let state = self.state.borrow();
            (state.revision, Arc::clone(&state.products))
        };
        if revision == self.written_revision {
            return;
        }

        match self.cache.set(&self.config.storage_key, &*snapshot).await {
            Ok(()) => {
                debug!(revision, items = snapshot.len(), "cart persisted");
                self.written_revision = revision;
                self.last_error = None;
            }
            Err(e) => {
                error!(revision, error = %e, "failed to persist cart");
                self.last_error = Some(e.to_string());
            }
        }
    }
}
