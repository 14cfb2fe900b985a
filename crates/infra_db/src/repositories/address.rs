//! Address repository implementation
//!
//! Database access for the `enderecos` table.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use domain_address::{Address, AddressFilter, AddressPatch, NewAddress};

use crate::error::DatabaseError;

const SELECT_ADDRESS: &str =
    "SELECT id, cep, uf, bairro, cidade, logradouro, complemento, created_at FROM enderecos";

/// Database row for the enderecos table
#[derive(Debug, Clone, FromRow)]
pub struct AddressRow {
    pub id: Uuid,
    pub cep: String,
    pub uf: String,
    pub bairro: String,
    pub cidade: String,
    pub logradouro: String,
    pub complemento: String,
    pub created_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Address {
            id: row.id.into(),
            cep: row.cep,
            uf: row.uf,
            bairro: row.bairro,
            cidade: row.cidade,
            logradouro: row.logradouro,
            complemento: row.complemento,
        }
    }
}

/// Repository for address records
#[derive(Debug, Clone)]
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists addresses matching every set filter field, oldest first
    pub async fn list(&self, filter: &AddressFilter) -> Result<Vec<AddressRow>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_ADDRESS);
        query.push(" WHERE 1 = 1");

        if let Some(id) = filter.id {
            query.push(" AND id = ").push_bind(Uuid::from(id));
        }
        let text_filters = [
            ("cep", &filter.cep),
            ("uf", &filter.uf),
            ("bairro", &filter.bairro),
            ("cidade", &filter.cidade),
            ("logradouro", &filter.logradouro),
            ("complemento", &filter.complemento),
        ];
        for (column, value) in text_filters {
            if let Some(value) = value {
                query.push(format!(" AND {} = ", column)).push_bind(value.clone());
            }
        }
        query.push(" ORDER BY created_at, id");

        let rows = query
            .build_query_as::<AddressRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn insert(&self, id: Uuid, address: &NewAddress) -> Result<AddressRow, DatabaseError> {
        insert_with(&self.pool, id, address).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<AddressRow, DatabaseError> {
        sqlx::query_as::<_, AddressRow>(&format!("{} WHERE id = $1", SELECT_ADDRESS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Endereco", id))
    }

    /// Overwrites the columns set in the patch
    pub async fn update(&self, id: Uuid, patch: &AddressPatch) -> Result<AddressRow, DatabaseError> {
        sqlx::query_as::<_, AddressRow>(
            r#"
            UPDATE enderecos SET
                cep = COALESCE($2, cep),
                uf = COALESCE($3, uf),
                bairro = COALESCE($4, bairro),
                cidade = COALESCE($5, cidade),
                logradouro = COALESCE($6, logradouro),
                complemento = COALESCE($7, complemento)
            WHERE id = $1
            RETURNING id, cep, uf, bairro, cidade, logradouro, complemento, created_at
            "#,
        )
        .bind(id)
        .bind(&patch.cep)
        .bind(&patch.uf)
        .bind(&patch.bairro)
        .bind(&patch.cidade)
        .bind(&patch.logradouro)
        .bind(&patch.complemento)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Endereco", id))
    }

    /// Deletes one address; persons referencing it go with it
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM enderecos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Endereco", id));
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM enderecos").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Returns the earliest-inserted address with this postal code
    pub async fn find_first_by_cep(&self, cep: &str) -> Result<Option<AddressRow>, DatabaseError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "{} WHERE cep = $1 ORDER BY created_at, id LIMIT 1",
            SELECT_ADDRESS
        ))
        .bind(cep)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

/// Inserts an address on any executor, so person creation can reuse it
/// inside its transaction
pub(crate) async fn insert_with<'e, E>(
    executor: E,
    id: Uuid,
    address: &NewAddress,
) -> Result<AddressRow, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, AddressRow>(
        r#"
        INSERT INTO enderecos (id, cep, uf, bairro, cidade, logradouro, complemento)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, cep, uf, bairro, cidade, logradouro, complemento, created_at
        "#,
    )
    .bind(id)
    .bind(&address.cep)
    .bind(&address.uf)
    .bind(&address.bairro)
    .bind(&address.cidade)
    .bind(&address.logradouro)
    .bind(&address.complemento)
    .fetch_one(executor)
    .await?;
    Ok(row)
}
