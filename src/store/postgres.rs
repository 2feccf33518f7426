//! PostgreSQL-backed repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{Repository, StoreError, StoreResult};
use crate::account::Account;
use crate::blog::{Post, PostPatch};

const POST_COLUMNS: &str = "id, title, author, url, likes, user_id";
const ACCOUNT_COLUMNS: &str = "id, username, name, password_hash, blogs";

fn post_from_row(r: &PgRow) -> Result<Post, sqlx::Error> {
    Ok(Post {
        id: r.try_get("id")?,
        title: r.try_get("title")?,
        author: r.try_get("author")?,
        url: r.try_get("url")?,
        likes: r.try_get("likes")?,
        user: r.try_get("user_id")?,
    })
}

fn account_from_row(r: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: r.try_get("id")?,
        username: r.try_get("username")?,
        name: r.try_get("name")?,
        password_hash: r.try_get("password_hash")?,
        blogs: r.try_get("blogs")?,
    })
}

/// Repository over the `accounts` and `posts` tables
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PgStore {
    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(&format!("SELECT {} FROM posts ORDER BY seq", POST_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(post_from_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn find_post(&self, id: &str) -> StoreResult<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(post_from_row).transpose()?)
    }

    async fn insert_owned_post(&self, post: Post) -> StoreResult<Post> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO posts (id, title, author, url, likes, user_id)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&post.author)
        .bind(&post.url)
        .bind(post.likes)
        .bind(&post.user)
        .execute(&mut *tx)
        .await?;

        if let Some(owner) = &post.user {
            sqlx::query(r#"UPDATE accounts SET blogs = array_append(blogs, $2) WHERE id = $1"#)
                .bind(owner)
                .bind(&post.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    async fn update_post(&self, id: &str, patch: &PostPatch) -> StoreResult<Option<Post>> {
        let row = sqlx::query(&format!(
            r#"UPDATE posts
               SET title  = COALESCE($2, title),
                   author = COALESCE($3, author),
                   url    = COALESCE($4, url),
                   likes  = COALESCE($5, likes)
               WHERE id = $1
               RETURNING {}"#,
            POST_COLUMNS
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.author)
        .bind(&patch.url)
        .bind(patch.likes)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(post_from_row).transpose()?)
    }

    async fn delete_post(&self, id: &str) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM accounts ORDER BY seq",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(account_from_row).collect::<Result<Vec<_>, sqlx::Error>>()?)
    }

    async fn find_account(&self, id: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(account_from_row).transpose()?)
    }

    async fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM accounts WHERE username = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(account_from_row).transpose()?)
    }

    async fn insert_account(&self, account: Account) -> StoreResult<Account> {
        let res = sqlx::query(
            r#"INSERT INTO accounts (id, username, name, password_hash, blogs)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(&account.blogs)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(account),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate("username"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
