//! Pets gateway: the single entry point for reading and mutating records.
//!
//! # Responsibility
//! - Route identifiers, validate writes, execute against the store and
//!   announce successful mutations.
//!
//! # Invariants
//! - Item-scoped operations always replace any caller selection with the
//!   exact-id predicate.
//! - Validation completes before a write transaction is opened.
//! - Each write runs in its own immediate transaction under the store lock,
//!   so reads never see it half-applied.
//! - Notifications are published after commit, only when at least one row
//!   changed, scoped to the identifier the caller used.

use crate::config::{DatabaseLocation, ShelterConfig};
use crate::db::{open_store, open_store_in_memory, SchemaManager};
use crate::gateway::cursor::PetCursor;
use crate::gateway::error::{GatewayError, GatewayResult, Operation};
use crate::model::pet::{PetId, PetValues};
use crate::model::validation::{validate_for_insert, validate_for_update};
use crate::notify::notifier::{ChangeNotifier, NotifyScope, Subscription, SubscriptionId};
use crate::repo::pet_repo::{PetQuery, PetRepository, RepoError, Selection, SqlitePetRepository};
use crate::resource::router::{ResourceRouter, ResourceType, Route};
use crate::resource::uri::ResourceUri;
use log::{info, warn};
use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use std::time::{Duration, Instant};

/// Thread-safe façade over the pets store. Share it with `Arc`.
pub struct PetGateway {
    conn: Mutex<Connection>,
    router: ResourceRouter,
    notifier: ChangeNotifier,
}

impl PetGateway {
    /// Opens the store described by `config`.
    ///
    /// # Errors
    /// - `GatewayError::Config` for invalid configuration.
    /// - `GatewayError::StorageUnavailable` when the store cannot be opened or
    ///   its schema cannot be brought to the configured version.
    pub fn open(config: &ShelterConfig) -> GatewayResult<Self> {
        config.validate()?;
        let schema =
            SchemaManager::new(config.schema_version).map_err(GatewayError::StorageUnavailable)?;
        let conn = match &config.database {
            DatabaseLocation::Memory => open_store_in_memory(&schema),
            DatabaseLocation::File(path) => open_store(
                path,
                &schema,
                Duration::from_millis(config.busy_timeout_ms),
            ),
        }
        .map_err(GatewayError::StorageUnavailable)?;

        Ok(Self::from_connection(
            conn,
            ResourceRouter::new(config.authority.clone()),
        ))
    }

    /// Opens a private in-memory store with default settings.
    pub fn open_in_memory() -> GatewayResult<Self> {
        Self::open(&ShelterConfig::in_memory())
    }

    /// Wraps an already-prepared connection. The schema must be in place.
    pub fn from_connection(conn: Connection, router: ResourceRouter) -> Self {
        Self {
            conn: Mutex::new(conn),
            router,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn router(&self) -> &ResourceRouter {
        &self.router
    }

    pub fn collection_uri(&self) -> ResourceUri {
        self.router.collection_uri()
    }

    pub fn item_uri(&self, id: PetId) -> ResourceUri {
        self.router.item_uri(id)
    }

    /// Reports whether `uri` names the collection or a single item.
    pub fn resource_type(&self, uri: &ResourceUri) -> GatewayResult<ResourceType> {
        self.router
            .classify(uri)
            .resource_type()
            .ok_or_else(|| GatewayError::UnknownResource(uri.clone()))
    }

    /// MIME-style type tag for `uri`.
    pub fn mime_type(&self, uri: &ResourceUri) -> GatewayResult<String> {
        let resource_type = self.resource_type(uri)?;
        Ok(self.router.mime_type(resource_type))
    }

    /// Reads records under `uri`.
    ///
    /// Collection reads honour the query selection; item reads match the id
    /// only. Reading does not subscribe the caller to changes.
    pub fn query(&self, uri: &ResourceUri, query: &PetQuery) -> GatewayResult<PetCursor> {
        traced(Operation::Read, uri, || {
            let item_selection;
            let selection = match self.router.classify(uri) {
                Route::Collection => query.selection.as_ref(),
                Route::Item(id) => {
                    item_selection = Selection::by_id(id);
                    Some(&item_selection)
                }
                Route::Unmatched => return Err(GatewayError::UnknownResource(uri.clone())),
            };

            let conn = self.conn.lock();
            let rows = SqlitePetRepository::new(&conn).query_pets(
                query.columns(),
                selection,
                &query.sort_order,
            )?;
            Ok((rows.len(), PetCursor::new(rows)))
        })
    }

    /// Inserts one record into the collection and returns its item identifier.
    pub fn insert(&self, uri: &ResourceUri, values: &PetValues) -> GatewayResult<ResourceUri> {
        traced(Operation::Insert, uri, || {
            if self.router.classify(uri) != Route::Collection {
                return Err(unsupported(Operation::Insert, uri));
            }
            validate_for_insert(values)?;

            let insert_failed = |source: RepoError| GatewayError::InsertFailed {
                uri: uri.clone(),
                source,
            };
            let id = {
                let mut conn = self.conn.lock();
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(|err| insert_failed(err.into()))?;
                let id = SqlitePetRepository::new(&tx)
                    .insert_pet(values)
                    .map_err(insert_failed)?;
                tx.commit().map_err(|err| insert_failed(err.into()))?;
                id
            };

            self.notifier.publish(uri, NotifyScope::Collection);
            Ok((1, self.router.item_uri(id)))
        })
    }

    /// Applies the supplied fields to matching records.
    ///
    /// An empty `values` returns 0 without touching the store. Returns the
    /// number of rows changed; 0 means nothing matched.
    pub fn update(
        &self,
        uri: &ResourceUri,
        values: &PetValues,
        selection: Option<&Selection>,
    ) -> GatewayResult<usize> {
        traced(Operation::Update, uri, || {
            let (scope, selection) = self.write_target(Operation::Update, uri, selection)?;
            if values.is_empty() {
                return Ok((0, 0));
            }
            validate_for_update(values)?;

            let changed =
                self.in_write_transaction(|repo| repo.update_pets(values, selection.as_ref()))?;
            if changed > 0 {
                self.notifier.publish(uri, scope);
            }
            Ok((changed, changed))
        })
    }

    /// Removes matching records permanently. Returns the number removed.
    pub fn delete(&self, uri: &ResourceUri, selection: Option<&Selection>) -> GatewayResult<usize> {
        traced(Operation::Delete, uri, || {
            let (scope, selection) = self.write_target(Operation::Delete, uri, selection)?;

            let removed = self.in_write_transaction(|repo| repo.delete_pets(selection.as_ref()))?;
            if removed > 0 {
                self.notifier.publish(uri, scope);
            }
            Ok((removed, removed))
        })
    }

    /// Number of stored records.
    pub fn count(&self) -> GatewayResult<u64> {
        let conn = self.conn.lock();
        Ok(SqlitePetRepository::new(&conn).count_pets()?)
    }

    /// Registers an observer for changes at `uri`.
    ///
    /// A collection subscription sees every change; an item subscription sees
    /// changes to that item and collection-wide changes.
    pub fn subscribe(&self, uri: &ResourceUri) -> GatewayResult<Subscription> {
        let scope = NotifyScope::from_route(self.router.classify(uri))
            .ok_or_else(|| GatewayError::UnknownResource(uri.clone()))?;
        Ok(self.notifier.subscribe(scope))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn write_target(
        &self,
        operation: Operation,
        uri: &ResourceUri,
        selection: Option<&Selection>,
    ) -> GatewayResult<(NotifyScope, Option<Selection>)> {
        match self.router.classify(uri) {
            Route::Collection => Ok((NotifyScope::Collection, selection.cloned())),
            Route::Item(id) => Ok((NotifyScope::Item(id), Some(Selection::by_id(id)))),
            Route::Unmatched => Err(unsupported(operation, uri)),
        }
    }

    fn in_write_transaction<T>(
        &self,
        write: impl FnOnce(&SqlitePetRepository<'_>) -> Result<T, RepoError>,
    ) -> GatewayResult<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = write(&SqlitePetRepository::new(&tx))?;
        tx.commit()?;
        Ok(result)
    }
}

fn unsupported(operation: Operation, uri: &ResourceUri) -> GatewayError {
    GatewayError::UnsupportedOperation {
        operation,
        uri: uri.clone(),
    }
}

/// Runs one gateway operation and logs its outcome. `run` returns the number
/// of rows touched alongside the value.
fn traced<T>(
    operation: Operation,
    uri: &ResourceUri,
    run: impl FnOnce() -> GatewayResult<(usize, T)>,
) -> GatewayResult<T> {
    let started_at = Instant::now();
    match run() {
        Ok((rows, value)) => {
            info!(
                "event=pet_{} module=gateway status=ok uri={} rows={} duration_ms={}",
                operation,
                uri,
                rows,
                started_at.elapsed().as_millis()
            );
            Ok(value)
        }
        Err(err) => {
            warn!(
                "event=pet_{} module=gateway status=error uri={} duration_ms={} error_code={}",
                operation,
                uri,
                started_at.elapsed().as_millis(),
                err.code()
            );
            Err(err)
        }
    }
}
