use crate::repositories::columns::{millis, timestamp, uuid};
use crate::{DbError, Result as DbErrorResult};

use bc_core::{Category, CollaboratorError, CollaboratorResult, Contact, ContactStore};

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Contacts, categories and their membership rows
#[derive(Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_category(&self, category: &Category) -> DbErrorResult<()> {
        sqlx::query(
            "INSERT INTO bc_categories (id, owner_id, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(category.id.to_string())
        .bind(category.owner_id.to_string())
        .bind(&category.name)
        .bind(millis(Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_categories(&self, owner_id: Uuid) -> DbErrorResult<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, owner_id, name FROM bc_categories WHERE owner_id = ? ORDER BY name, id",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DbErrorResult<Category> {
                Ok(Category {
                    id: uuid(row, "id")?,
                    owner_id: uuid(row, "owner_id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect()
    }

    /// Insert a contact with its category memberships
    pub async fn create_contact(&self, contact: &Contact) -> DbErrorResult<()> {
        let contact_id = contact.id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
                INSERT INTO bc_contacts (id, owner_id, name, phone, email, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&contact_id)
        .bind(contact.owner_id.to_string())
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(millis(contact.created_at))
        .execute(&mut *tx)
        .await?;

        for category_id in &contact.category_ids {
            sqlx::query(
                r#"
                    INSERT INTO bc_contact_categories (contact_id, category_id)
                    VALUES (?, ?)
                    ON CONFLICT(contact_id, category_id) DO NOTHING
                "#,
            )
            .bind(&contact_id)
            .bind(category_id.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The subset of `category_ids` that belongs to `owner_id`
    pub async fn find_owned_categories(
        &self,
        owner_id: Uuid,
        category_ids: &[Uuid],
    ) -> DbErrorResult<Vec<Uuid>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; category_ids.len()].join(", ");
        let sql = format!(
            "SELECT id FROM bc_categories WHERE owner_id = ? AND id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(owner_id.to_string());
        for id in category_ids {
            query = query.bind(id.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(|row| uuid(row, "id")).collect()
    }

    /// Every contact of `owner_id` ordered by (created_at, id)
    pub async fn find_by_owner(&self, owner_id: Uuid) -> DbErrorResult<Vec<Contact>> {
        let owner = owner_id.to_string();

        let rows = sqlx::query(
            r#"
                SELECT id, owner_id, name, phone, email, created_at
                FROM bc_contacts
                WHERE owner_id = ?
                ORDER BY created_at, id
            "#,
        )
        .bind(&owner)
        .fetch_all(&self.pool)
        .await?;

        let memberships = sqlx::query(
            r#"
                SELECT cc.contact_id, cc.category_id
                FROM bc_contact_categories cc
                JOIN bc_contacts c ON c.id = cc.contact_id
                WHERE c.owner_id = ?
                ORDER BY cc.category_id
            "#,
        )
        .bind(&owner)
        .fetch_all(&self.pool)
        .await?;

        let mut categories_by_contact: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in &memberships {
            categories_by_contact
                .entry(uuid(row, "contact_id")?)
                .or_default()
                .push(uuid(row, "category_id")?);
        }

        rows.iter()
            .map(|row| -> DbErrorResult<Contact> {
                let id = uuid(row, "id")?;
                Ok(Contact {
                    id,
                    owner_id: uuid(row, "owner_id")?,
                    name: row.try_get("name")?,
                    phone: row.try_get("phone")?,
                    email: row.try_get("email")?,
                    category_ids: categories_by_contact.remove(&id).unwrap_or_default(),
                    created_at: timestamp(row, "created_at")?,
                })
            })
            .collect()
    }
}

fn store_error(error: DbError) -> CollaboratorError {
    CollaboratorError::unavailable("contact store", error.to_string())
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn owned_categories(
        &self,
        owner_id: Uuid,
        category_ids: &[Uuid],
    ) -> CollaboratorResult<Vec<Uuid>> {
        self.find_owned_categories(owner_id, category_ids)
            .await
            .map_err(store_error)
    }

    async fn contacts(&self, owner_id: Uuid) -> CollaboratorResult<Vec<Contact>> {
        self.find_by_owner(owner_id).await.map_err(store_error)
    }
}
