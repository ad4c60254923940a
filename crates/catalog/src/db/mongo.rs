//! MongoDB implementation of [`CatalogStore`].

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument};

use orebi_core::Email;

use super::{CatalogStore, CollectionCounts, RepositoryError};
use crate::config::DatabaseConfig;
use crate::models::{
    BrandDocument, CategoryDocument, Identified, ProductDocument, UserDocument, collections,
};

/// Database used when neither the URI nor `MONGO_DB_NAME` names one.
const DEFAULT_DATABASE: &str = "test";
const APP_NAME: &str = "orebi-seed";
const DUPLICATE_KEY: i32 = 11000;

/// A connected MongoDB database.
///
/// Call [`MongoStore::close`] when done; the client is not shut down on drop.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    operation_timeout: Duration,
}

impl MongoStore {
    /// Connect and verify the server answers a `ping`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the URI is invalid or no server
    /// can be reached, `RepositoryError::Timeout` if the ping exceeds the
    /// operation timeout.
    #[instrument(skip_all, fields(uri = %config.redacted_uri()))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, RepositoryError> {
        let mut options = ClientOptions::parse(config.uri.expose_secret()).await?;
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some(APP_NAME.to_owned());

        let database_name = config
            .database_name
            .clone()
            .or_else(|| options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_owned());

        let client = Client::with_options(options)?;
        let database = client.database(&database_name);

        let store = Self {
            client,
            database,
            operation_timeout: config.operation_timeout,
        };
        let ping = store
            .timed("ping", store.database.run_command(doc! { "ping": 1 }))
            .await;
        if let Err(e) = ping {
            store.close().await;
            return Err(e);
        }

        debug!(database = %database_name, "MongoDB ping succeeded");
        Ok(store)
    }

    /// Name of the database in use.
    #[must_use]
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    /// Shut the client down, closing all pooled connections.
    pub async fn close(self) {
        self.client.shutdown().await;
    }

    fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection::<T>(name)
    }

    /// Run a driver operation under the operation timeout.
    async fn timed<F, T>(&self, operation: &'static str, action: F) -> Result<T, RepositoryError>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>>,
    {
        tokio::time::timeout(self.operation_timeout, action.into_future())
            .await
            .map_err(|_| RepositoryError::Timeout {
                operation,
                after: self.operation_timeout,
            })?
            .map_err(RepositoryError::from)
    }

    async fn insert_all<T>(
        &self,
        name: &'static str,
        mut documents: Vec<T>,
    ) -> Result<Vec<T>, RepositoryError>
    where
        T: Identified + Serialize + Send + Sync,
    {
        if documents.is_empty() {
            return Ok(documents);
        }
        for document in &mut documents {
            document.ensure_id();
        }

        let result = self
            .timed(name, self.collection::<T>(name).insert_many(&documents))
            .await?;
        debug!(collection = name, inserted = result.inserted_ids.len(), "Bulk insert complete");
        Ok(documents)
    }

    async fn delete_all(&self, name: &'static str) -> Result<u64, RepositoryError> {
        let result = self
            .timed(
                name,
                self.collection::<bson::Document>(name).delete_many(doc! {}),
            )
            .await?;
        Ok(result.deleted_count)
    }

    async fn count(&self, name: &'static str) -> Result<u64, RepositoryError> {
        self.timed(
            name,
            self.collection::<bson::Document>(name).count_documents(doc! {}),
        )
        .await
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl CatalogStore for MongoStore {
    async fn insert_categories(
        &self,
        categories: Vec<CategoryDocument>,
    ) -> Result<Vec<CategoryDocument>, RepositoryError> {
        self.insert_all(collections::CATEGORIES, categories).await
    }

    async fn insert_brands(
        &self,
        brands: Vec<BrandDocument>,
    ) -> Result<Vec<BrandDocument>, RepositoryError> {
        self.insert_all(collections::BRANDS, brands).await
    }

    async fn insert_products(
        &self,
        products: Vec<ProductDocument>,
    ) -> Result<Vec<ProductDocument>, RepositoryError> {
        self.insert_all(collections::PRODUCTS, products).await
    }

    async fn clear_products(&self) -> Result<u64, RepositoryError> {
        self.delete_all(collections::PRODUCTS).await
    }

    async fn clear_categories(&self) -> Result<u64, RepositoryError> {
        self.delete_all(collections::CATEGORIES).await
    }

    async fn clear_brands(&self) -> Result<u64, RepositoryError> {
        self.delete_all(collections::BRANDS).await
    }

    async fn user_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        let matches = self
            .timed(
                collections::USERS,
                self.collection::<bson::Document>(collections::USERS)
                    .count_documents(doc! { "email": email.as_str() })
                    .limit(1),
            )
            .await?;
        Ok(matches > 0)
    }

    async fn insert_user(&self, mut user: UserDocument) -> Result<UserDocument, RepositoryError> {
        user.ensure_id();
        let inserted = tokio::time::timeout(
            self.operation_timeout,
            self.collection::<UserDocument>(collections::USERS)
                .insert_one(&user)
                .into_future(),
        )
        .await
        .map_err(|_| RepositoryError::Timeout {
            operation: collections::USERS,
            after: self.operation_timeout,
        })?;

        match inserted {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(RepositoryError::Conflict(format!(
                "user already exists with email: {}",
                user.email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn counts(&self) -> Result<CollectionCounts, RepositoryError> {
        Ok(CollectionCounts {
            categories: self.count(collections::CATEGORIES).await?,
            brands: self.count(collections::BRANDS).await?,
            products: self.count(collections::PRODUCTS).await?,
            users: self.count(collections::USERS).await?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_to_unreachable_server_fails_and_returns() {
        let mut config = DatabaseConfig::new("mongodb://127.0.0.1:1/orebi");
        config.server_selection_timeout = Duration::from_millis(200);
        config.operation_timeout = Duration::from_secs(2);

        let result = tokio::time::timeout(Duration::from_secs(10), MongoStore::connect(&config))
            .await
            .unwrap();

        assert!(result.is_err());
    }
}
