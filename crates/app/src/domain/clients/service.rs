//! Clients service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        clients::{
            data::{AddressData, NewClient},
            errors::ClientsServiceError,
            records::{AddressKind, AddressRecord, ClientRecord},
            repository::PgClientsRepository,
        },
        identity::Identity,
    },
};

#[derive(Debug, Clone)]
pub struct PgClientsService {
    db: Db,
    repository: PgClientsRepository,
}

impl PgClientsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgClientsRepository::new(),
        }
    }
}

#[async_trait]
impl ClientsService for PgClientsService {
    async fn create_client(&self, client: NewClient) -> Result<ClientRecord, ClientsServiceError> {
        client.validate()?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_client(&mut tx, client).await?;

        tx.commit().await?;

        info!(client_uuid = %created.uuid, "created client");

        Ok(created)
    }

    async fn get_client(&self, identity: &Identity) -> Result<ClientRecord, ClientsServiceError> {
        let email = identity.email().ok_or(ClientsServiceError::Unauthenticated)?;

        let mut tx = self.db.begin().await?;

        let client = self
            .repository
            .find_client_by_email(&mut tx, email)
            .await
            .map_err(unauthenticated_if_missing)?;

        tx.commit().await?;

        Ok(client)
    }

    async fn put_address(
        &self,
        identity: &Identity,
        kind: AddressKind,
        address: AddressData,
    ) -> Result<AddressRecord, ClientsServiceError> {
        let email = identity.email().ok_or(ClientsServiceError::Unauthenticated)?;

        address.validate()?;

        let mut tx = self.db.begin().await?;

        let client = self
            .repository
            .find_client_by_email(&mut tx, email)
            .await
            .map_err(unauthenticated_if_missing)?;

        let address = self
            .repository
            .upsert_address(&mut tx, client.uuid, kind, address)
            .await?;

        tx.commit().await?;

        info!(client_uuid = %client.uuid, %kind, "stored client address");

        Ok(address)
    }
}

/// An identity that does not resolve to an enabled client is not a valid
/// caller, rather than a missing resource.
pub(crate) fn unauthenticated_if_missing(error: sqlx::Error) -> ClientsServiceError {
    match ClientsServiceError::from(error) {
        ClientsServiceError::NotFound => ClientsServiceError::Unauthenticated,
        other => other,
    }
}

#[automock]
#[async_trait]
pub trait ClientsService: Send + Sync {
    /// Registers a new client.
    async fn create_client(&self, client: NewClient) -> Result<ClientRecord, ClientsServiceError>;

    /// Resolves the calling client, with its current addresses.
    async fn get_client(&self, identity: &Identity) -> Result<ClientRecord, ClientsServiceError>;

    /// Creates or replaces the caller's address of the given kind.
    async fn put_address(
        &self,
        identity: &Identity,
        kind: AddressKind,
        address: AddressData,
    ) -> Result<AddressRecord, ClientsServiceError>;
}
