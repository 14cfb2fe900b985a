//! Person repository implementation
//!
//! Database access for the `pessoas` table. Reads join the referenced
//! address so a person always comes back with its address embedded.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use domain_address::Address;
use domain_person::{NewPerson, Person, PersonFilter, PersonPatch};

use crate::error::DatabaseError;
use crate::repositories::address::insert_with as insert_address;

const SELECT_PERSON: &str = r#"
    SELECT
        p.id, p.nome, p.idade, p.email, p.created_at,
        p.endereco_id,
        e.cep AS endereco_cep,
        e.uf AS endereco_uf,
        e.bairro AS endereco_bairro,
        e.cidade AS endereco_cidade,
        e.logradouro AS endereco_logradouro,
        e.complemento AS endereco_complemento
    FROM pessoas p
    LEFT JOIN enderecos e ON e.id = p.endereco_id
"#;

/// Database row for a person joined with its address
#[derive(Debug, Clone, FromRow)]
pub struct PersonRow {
    pub id: Uuid,
    pub nome: String,
    pub idade: i32,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub endereco_id: Option<Uuid>,
    pub endereco_cep: Option<String>,
    pub endereco_uf: Option<String>,
    pub endereco_bairro: Option<String>,
    pub endereco_cidade: Option<String>,
    pub endereco_logradouro: Option<String>,
    pub endereco_complemento: Option<String>,
}

impl PersonRow {
    fn address(&self) -> Option<Address> {
        let id = self.endereco_id?;
        Some(Address {
            id: id.into(),
            cep: self.endereco_cep.clone()?,
            uf: self.endereco_uf.clone()?,
            bairro: self.endereco_bairro.clone()?,
            cidade: self.endereco_cidade.clone()?,
            logradouro: self.endereco_logradouro.clone()?,
            complemento: self.endereco_complemento.clone()?,
        })
    }
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        let endereco = row.address();
        Person {
            id: row.id.into(),
            nome: row.nome,
            idade: row.idade,
            email: row.email,
            endereco,
        }
    }
}

/// Repository for person records
#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists persons matching every set filter field, oldest first
    pub async fn list(&self, filter: &PersonFilter) -> Result<Vec<PersonRow>, DatabaseError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_PERSON);
        query.push(" WHERE 1 = 1");

        if let Some(id) = filter.id {
            query.push(" AND p.id = ").push_bind(Uuid::from(id));
        }
        if let Some(nome) = &filter.nome {
            query.push(" AND p.nome = ").push_bind(nome.clone());
        }
        if let Some(idade) = filter.idade {
            query.push(" AND p.idade = ").push_bind(idade);
        }
        if let Some(email) = &filter.email {
            query.push(" AND p.email = ").push_bind(email.clone());
        }
        if let Some(endereco) = filter.endereco {
            query.push(" AND p.endereco_id = ").push_bind(Uuid::from(endereco));
        }
        query.push(" ORDER BY p.created_at, p.id");

        let rows = query
            .build_query_as::<PersonRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<PersonRow, DatabaseError> {
        fetch_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Pessoa", id))
    }

    /// Inserts a person, creating its nested address first when present
    ///
    /// Both inserts share one transaction.
    pub async fn insert(
        &self,
        id: Uuid,
        address_id: Uuid,
        person: &NewPerson,
    ) -> Result<PersonRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let endereco_id = match &person.endereco {
            Some(address) => Some(insert_address(&mut *tx, address_id, address).await?.id),
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO pessoas (id, nome, idade, email, endereco_id)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(&person.nome)
        .bind(person.idade)
        .bind(&person.email)
        .bind(endereco_id)
        .execute(&mut *tx)
        .await?;

        let row = fetch_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Pessoa", id))?;

        tx.commit().await?;
        Ok(row)
    }

    /// Overwrites the columns set in the patch
    pub async fn update(&self, id: Uuid, patch: &PersonPatch) -> Result<PersonRow, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE pessoas SET
                nome = COALESCE($2, nome),
                idade = COALESCE($3, idade),
                email = COALESCE($4, email),
                endereco_id = COALESCE($5, endereco_id)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&patch.nome)
        .bind(patch.idade)
        .bind(&patch.email)
        .bind(patch.endereco.map(Uuid::from))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Pessoa", id));
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM pessoas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Pessoa", id));
        }
        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM pessoas").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Checks whether another person already uses this email
    pub async fn email_exists(&self, email: &str, except: Option<Uuid>) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM pessoas WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}

async fn fetch_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<PersonRow>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, PersonRow>(&format!("{} WHERE p.id = $1", SELECT_PERSON))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> PersonRow {
        PersonRow {
            id: Uuid::now_v7(),
            nome: "Maria".to_string(),
            idade: 30,
            email: "maria@example.com".to_string(),
            created_at: Utc::now(),
            endereco_id: None,
            endereco_cep: None,
            endereco_uf: None,
            endereco_bairro: None,
            endereco_cidade: None,
            endereco_logradouro: None,
            endereco_complemento: None,
        }
    }

    #[test]
    fn test_row_without_address() {
        let person: Person = row().into();
        assert!(person.endereco.is_none());
        assert_eq!(person.nome, "Maria");
    }

    #[test]
    fn test_row_with_joined_address() {
        let address_id = Uuid::now_v7();
        let person: Person = PersonRow {
            endereco_id: Some(address_id),
            endereco_cep: Some("64082550".to_string()),
            endereco_uf: Some("PI".to_string()),
            endereco_bairro: Some("Centro".to_string()),
            endereco_cidade: Some("Teresina".to_string()),
            endereco_logradouro: Some("Rua Alfa".to_string()),
            endereco_complemento: Some(String::new()),
            ..row()
        }
        .into();

        let address = person.endereco.unwrap();
        assert_eq!(*address.id.as_uuid(), address_id);
        assert_eq!(address.cidade, "Teresina");
        assert_eq!(address.complemento, "");
    }
}
