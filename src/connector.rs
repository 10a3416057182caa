//! Connection establishment and the owned connection handle.

use bson::doc;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

use crate::{
    error::{ModelError, ModelResult},
    options::DatabaseConfig,
};

/// Builds a client from a connection string and binds it to one database.
///
/// `connect` consumes the connector, so a single connector can create at
/// most one client; the returned [`Connection`] owns that client and must
/// be shut down explicitly by its owner.
#[derive(Debug)]
pub struct Connector {
    uri: String,
    database: String,
    database_config: Option<DatabaseConfig>,
    client_options: Option<ClientOptions>,
}

impl Connector {
    /// Create a connector for the given connection string and database name.
    ///
    /// The URI format is owned entirely by the server; it is parsed by the
    /// driver and never reinterpreted here.
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            database_config: None,
            client_options: None,
        }
    }

    /// Apply database-level configuration when the handle is obtained.
    pub fn database_config(mut self, config: DatabaseConfig) -> Self {
        self.database_config = Some(config);
        self
    }

    /// Replace the URI-derived client options wholesale.
    ///
    /// The supplied options are used as-is; they are not merged with
    /// anything parsed from the connection string.
    pub fn client_options(mut self, options: ClientOptions) -> Self {
        self.client_options = Some(options);
        self
    }

    /// Establish the client connection and return the bound database handle.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Connection`] when the connection string cannot
    /// be parsed or the client cannot be constructed.
    pub async fn connect(self) -> ModelResult<Connection> {
        let options = match self.client_options {
            Some(options) => options,
            None => ClientOptions::parse(&self.uri)
                .await
                .map_err(|e| ModelError::connection(format!("failed to parse connection string: {e}")))?,
        };

        let client = Client::with_options(options)
            .map_err(|e| ModelError::connection(format!("failed to create client: {e}")))?;

        let database = match &self.database_config {
            Some(config) => client.database_with_options(&self.database, config.to_driver()),
            None => client.database(&self.database),
        };

        info!(database = %self.database, "connected to database");

        Ok(Connection { client, database })
    }
}

/// An owned client connection bound to one database.
///
/// The handle is cheap to clone through [`Connection::database`] views and
/// safe to share across tasks. Teardown never happens implicitly: the owner
/// calls [`Connection::shutdown`] when the connection is no longer needed.
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    database: Database,
}

impl Connection {
    /// Returns the bound database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Check that the server is reachable by issuing a ping command.
    pub async fn ping(&self) -> ModelResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ModelError::connection(format!("ping failed: {e}")))?;

        Ok(())
    }

    /// Release the client and every resource it holds.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}
