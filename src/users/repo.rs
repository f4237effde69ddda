use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use crate::auth::password::hash_password;

use super::dto::{NewUser, UserPatch};

const USER_COLUMNS: &str =
    "id, user_name, email, first_name, last_name, age, password_hash, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Equality filters for `User::list`. A `None` field does not constrain the
/// result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    pub id: Option<i64>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<i32>,
}

fn build_list_query(filter: &UserFilter, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
    let mut sep = " WHERE ";
    if let Some(id) = filter.id {
        qb.push(sep).push("id = ").push_bind(id);
        sep = " AND ";
    }
    if let Some(user_name) = &filter.user_name {
        qb.push(sep).push("user_name = ").push_bind(user_name.clone());
        sep = " AND ";
    }
    if let Some(email) = &filter.email {
        qb.push(sep).push("email = ").push_bind(email.clone());
        sep = " AND ";
    }
    if let Some(first_name) = &filter.first_name {
        qb.push(sep).push("first_name = ").push_bind(first_name.clone());
        sep = " AND ";
    }
    if let Some(last_name) = &filter.last_name {
        qb.push(sep).push("last_name = ").push_bind(last_name.clone());
        sep = " AND ";
    }
    if let Some(age) = filter.age {
        qb.push(sep).push("age = ").push_bind(age);
    }
    qb.push(" LIMIT ").push_bind(limit);
    qb
}

/// Builds the dynamic UPDATE for a patch, or `None` when no field was
/// provided. Ordering is unspecified at the store level, matching the rest of
/// the queries here.
fn build_update_query(id: i64, patch: &UserPatch) -> Option<QueryBuilder<'static, Postgres>> {
    let provided = patch.user_name.is_provided()
        || patch.email.is_provided()
        || patch.first_name.is_provided()
        || patch.last_name.is_provided()
        || patch.age.is_provided();
    if !provided {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE users SET ");
    let mut sets = qb.separated(", ");
    if patch.user_name.is_provided() {
        sets.push("user_name = ")
            .push_bind_unseparated(patch.user_name.clone().into_option());
    }
    if patch.email.is_provided() {
        sets.push("email = ")
            .push_bind_unseparated(patch.email.clone().into_option());
    }
    if patch.first_name.is_provided() {
        sets.push("first_name = ")
            .push_bind_unseparated(patch.first_name.clone().into_option());
    }
    if patch.last_name.is_provided() {
        sets.push("last_name = ")
            .push_bind_unseparated(patch.last_name.clone().into_option());
    }
    if patch.age.is_provided() {
        sets.push("age = ")
            .push_bind_unseparated(patch.age.clone().into_option());
    }
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(format!(" RETURNING {USER_COLUMNS}"));
    Some(qb)
}

impl User {
    /// Insert a new user. The plaintext password is hashed first and never
    /// stored; the returned row reflects the generated id and defaults.
    pub async fn save(db: &PgPool, new: NewUser) -> anyhow::Result<User> {
        let password_hash = hash_password(&new.password)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_name, email, first_name, last_name, age, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_name, email, first_name, last_name, age, password_hash, created_at
            "#,
        )
        .bind(new.user_name)
        .bind(new.email)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.age)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Absence is an expected outcome, not an error.
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// List users matching every provided filter field, up to `limit` rows.
    pub async fn list(db: &PgPool, filter: &UserFilter, limit: i64) -> anyhow::Result<Vec<User>> {
        let mut qb = build_list_query(filter, limit);
        let rows = qb.build_query_as::<User>().fetch_all(db).await?;
        Ok(rows)
    }

    /// Apply a partial update, skipping fields the caller did not provide,
    /// then reload this row from the store. A patch with nothing provided is
    /// a no-op.
    pub async fn update(&mut self, db: &PgPool, patch: &UserPatch) -> anyhow::Result<()> {
        let Some(mut qb) = build_update_query(self.id, patch) else {
            return Ok(());
        };
        let updated = qb.build_query_as::<User>().fetch_one(db).await?;
        *self = updated;
        Ok(())
    }

    pub async fn delete(self, db: &PgPool) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(self.id)
            .execute(db)
            .await?;
        Ok(())
    }
}
