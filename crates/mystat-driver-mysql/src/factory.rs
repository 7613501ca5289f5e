//! Connection factory for the sampler's reconnect epochs

use async_trait::async_trait;
use mystat_connection::ConnectionFactory;
use mystat_core::{Connection, ConnectionConfig, Result};
use std::sync::Arc;

use crate::MySqlConnection;

/// Opens a fresh [`MySqlConnection`] from a fixed configuration
#[derive(Debug, Clone)]
pub struct MySqlConnectionFactory {
    config: ConnectionConfig,
}

impl MySqlConnectionFactory {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

#[async_trait]
impl ConnectionFactory for MySqlConnectionFactory {
    async fn create(&self) -> Result<Arc<dyn Connection>> {
        let conn = MySqlConnection::connect(&self.config).await?;
        Ok(Arc::new(conn))
    }
}
