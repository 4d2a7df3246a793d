//! Clients Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::clients::{
    data::{AddressData, NewClient},
    records::{AddressKind, AddressRecord, AddressUuid, ClientRecord, ClientUuid},
};

const CREATE_CLIENT_SQL: &str = include_str!("sql/create_client.sql");
const FIND_CLIENT_BY_EMAIL_SQL: &str = include_str!("sql/find_client_by_email.sql");
const LIST_CLIENT_ADDRESSES_SQL: &str = include_str!("sql/list_client_addresses.sql");
const UPSERT_ADDRESS_SQL: &str = include_str!("sql/upsert_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgClientsRepository;

impl PgClientsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_client(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client: NewClient,
    ) -> Result<ClientRecord, sqlx::Error> {
        query_as::<Postgres, ClientRecord>(CREATE_CLIENT_SQL)
            .bind(client.uuid.into_uuid())
            .bind(client.email.trim())
            .bind(client.name.trim())
            .fetch_one(&mut **tx)
            .await
    }

    /// Enabled client with both of its current addresses attached.
    #[tracing::instrument(
        name = "clients.repository.find_client_by_email",
        skip(self, tx),
        fields(address_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn find_client_by_email(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
    ) -> Result<ClientRecord, sqlx::Error> {
        let mut client = query_as::<Postgres, ClientRecord>(FIND_CLIENT_BY_EMAIL_SQL)
            .bind(email)
            .fetch_one(&mut **tx)
            .await?;

        let addresses = query_as::<Postgres, AddressRecord>(LIST_CLIENT_ADDRESSES_SQL)
            .bind(client.uuid.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("address_count", addresses.len());

        client.attach_addresses(addresses);

        Ok(client)
    }

    pub(crate) async fn upsert_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client: ClientUuid,
        kind: AddressKind,
        address: AddressData,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(UPSERT_ADDRESS_SQL)
            .bind(AddressUuid::new().into_uuid())
            .bind(client.into_uuid())
            .bind(kind.as_str())
            .bind(address.recipient.trim())
            .bind(address.street.trim())
            .bind(address.city.trim())
            .bind(address.province.trim())
            .bind(address.postal_code.trim())
            .bind(address.country.trim())
            .bind(address.phone.as_deref().map(str::trim))
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ClientRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ClientUuid::from_uuid(row.try_get("uuid")?),
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            enabled: row.try_get("enabled")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            charge_address: None,
            deliver_address: None,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;

        let kind = kind
            .parse::<AddressKind>()
            .map_err(|error| sqlx::Error::ColumnDecode {
                index: "kind".to_string(),
                source: error.into(),
            })?;

        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            client_uuid: ClientUuid::from_uuid(row.try_get("client_uuid")?),
            kind,
            recipient: row.try_get("recipient")?,
            street: row.try_get("street")?,
            city: row.try_get("city")?,
            province: row.try_get("province")?,
            postal_code: row.try_get("postal_code")?,
            country: row.try_get("country")?,
            phone: row.try_get("phone")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
