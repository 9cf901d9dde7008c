use async_trait::async_trait;
use bson::{Bson, Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions, ReturnDocument, UpdateModifications},
};
use std::time::Duration;
use tracing::{debug, info};

use docrest_core::{
    backend::{StoreBackend, StoreBackendBuilder, Touch},
    entity::ID_FIELD,
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, SortDirection},
};

use crate::query::MongoQueryTranslator;

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }
}

fn backend_error(e: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(e.to_string())
}

/// Builds the update for `find_one_and_update`.
///
/// A plain `$set` suffices without a touch. With one, the update becomes a pipeline so the
/// touched field can be computed from its stored value in the same write. Pipeline stages
/// read `$`-prefixed strings as field paths, so patch values are wrapped in `$literal`.
fn update_modifications(patch: Document, touch: Option<Touch<'_>>) -> UpdateModifications {
    let Some(touch) = touch else {
        return doc! { "$set": patch }.into();
    };

    let mut pipeline = Vec::with_capacity(2);
    if !patch.is_empty() {
        let literals = patch
            .into_iter()
            .map(|(key, value)| (key, Bson::Document(doc! { "$literal": value })))
            .collect::<Document>();
        pipeline.push(doc! { "$set": literals });
    }

    let Touch { field, at } = touch;
    let path = format!("${field}");
    pipeline.push(doc! {
        "$set": {
            field: { "$max": [at, { "$add": [path, 1_i64] }] }
        }
    });

    pipeline.into()
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_document(
        &self,
        mut document: Document,
        collection: &str,
    ) -> DocumentStoreResult<ObjectId> {
        document.remove(ID_FIELD);

        let result = self
            .get_collection(collection)
            .insert_one(document)
            .await
            .map_err(backend_error)?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            DocumentStoreError::Backend(format!(
                "expected ObjectId from insert, found {:?}",
                result.inserted_id
            ))
        })
    }

    async fn get_document(
        &self,
        id: ObjectId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        self.get_collection(collection)
            .find_one(doc! { ID_FIELD: id })
            .await
            .map_err(backend_error)
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Document>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }

        self.get_collection(collection)
            .find(MongoQueryTranslator::translate(query.filter.as_ref())?)
            .with_options(options)
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)
    }

    async fn update_document(
        &self,
        id: ObjectId,
        mut patch: Document,
        touch: Option<Touch<'_>>,
        collection: &str,
    ) -> DocumentStoreResult<Option<Document>> {
        patch.remove(ID_FIELD);

        self.get_collection(collection)
            .find_one_and_update(doc! { ID_FIELD: id }, update_modifications(patch, touch))
            .return_document(ReturnDocument::After)
            .await
            .map_err(backend_error)
    }

    async fn delete_document(&self, id: ObjectId, collection: &str) -> DocumentStoreResult<bool> {
        let result = self
            .get_collection(collection)
            .delete_one(doc! { ID_FIELD: id })
            .await
            .map_err(backend_error)?;

        Ok(result.deleted_count > 0)
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        self.get_collection(collection)
            .count_documents(MongoQueryTranslator::translate(filter.as_ref())?)
            .await
            .map_err(backend_error)
    }

    async fn ping(&self) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn shutdown(&self) -> DocumentStoreResult<()> {
        self.client.clone().shutdown().await;
        info!(database = %self.database, "closed MongoDB client");

        Ok(())
    }
}

/// Builder for [`MongoDbStore`].
///
/// Connecting is lazy: `build` parses the connection string and creates the client
/// but does not contact the server. Use [`StoreBackend::ping`] to check reachability.
pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    server_selection_timeout: Option<Duration>,
    app_name: Option<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            server_selection_timeout: None,
            app_name: None,
        }
    }

    /// How long an operation waits for a suitable server before failing.
    pub fn server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = Some(timeout);
        self
    }

    /// Name reported to the server in connection handshakes.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        if let Some(timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
        }
        if let Some(name) = self.app_name {
            options.app_name = Some(name);
        }

        let client = Client::with_options(options)
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;
        debug!(database = %self.database, "created MongoDB client");

        Ok(MongoDbStore::new(client, self.database))
    }
}
