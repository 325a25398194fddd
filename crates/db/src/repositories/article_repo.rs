//! Repository for the `articles` table.

use sqlx::PgPool;
use stockqr_core::types::DbId;

use crate::models::article::{Article, CreateArticle, ImportArticle, UpdateArticle};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, length, width, height, category, qr_code, qr_fields, \
    warehouse_id, manufacturer_id, supplier_id, created_at, updated_at";

/// Provides CRUD and import operations for articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Reserve the next serial number from the identity sequence.
    ///
    /// The QR payload embeds the serial number, so it has to be known
    /// before the row is written.
    pub async fn next_id(pool: &PgPool) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) =
            sqlx::query_as("SELECT nextval(pg_get_serial_sequence('articles', 'id'))")
                .fetch_one(pool)
                .await?;
        Ok(id)
    }

    /// Insert a new article, returning the created row.
    ///
    /// Fails with a primary-key violation if `input.id` is already taken.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (id, name, length, width, height, category, qr_code, qr_fields,
                 warehouse_id, manufacturer_id, supplier_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(input.length)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.category)
            .bind(&input.qr_code)
            .bind(&input.qr_fields)
            .bind(input.warehouse_id)
            .bind(input.manufacturer_id)
            .bind(input.supplier_id)
            .fetch_one(pool)
            .await?;

        Self::advance_id_sequence(pool, article.id).await?;
        Ok(article)
    }

    /// Find an article by its serial number.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all articles, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Article>(&query).fetch_all(pool).await
    }

    /// Replace every editable column of an article.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArticle,
    ) -> Result<Option<Article>, sqlx::Error> {
        let query = format!(
            "UPDATE articles SET
                name = $2,
                length = $3,
                width = $4,
                height = $5,
                category = $6,
                qr_code = $7,
                qr_fields = $8,
                warehouse_id = $9,
                manufacturer_id = $10,
                supplier_id = $11,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.length)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.category)
            .bind(&input.qr_code)
            .bind(&input.qr_fields)
            .bind(input.warehouse_id)
            .bind(input.manufacturer_id)
            .bind(input.supplier_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or merge an article recovered from a QR image.
    ///
    /// A new row takes the recovered values (an unnamed article gets an
    /// empty name). An existing row only has the recovered, non-`None`
    /// values written over it; its references are kept. In both cases the
    /// imported image and field list replace the stored ones.
    pub async fn import(pool: &PgPool, input: &ImportArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (id, name, length, width, height, category, qr_code, qr_fields)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                name = COALESCE($2, articles.name),
                length = COALESCE($3, articles.length),
                width = COALESCE($4, articles.width),
                height = COALESCE($5, articles.height),
                category = COALESCE($6, articles.category),
                qr_code = EXCLUDED.qr_code,
                qr_fields = EXCLUDED.qr_fields,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(input.length)
            .bind(input.width)
            .bind(input.height)
            .bind(&input.category)
            .bind(&input.qr_code)
            .bind(&input.qr_fields)
            .fetch_one(pool)
            .await?;

        Self::advance_id_sequence(pool, article.id).await?;
        Ok(article)
    }

    /// Permanently delete an article. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move the identity sequence past a client-supplied serial number so
    /// later generated ids cannot collide with it. Never moves it backwards.
    ///
    /// Callers are serialised on an advisory lock, and the new value is the
    /// greater of `id` and the sequence's own last value, computed in the
    /// same statement as the `setval`.
    async fn advance_id_sequence(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('articles.id'))")
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "SELECT setval(
                pg_get_serial_sequence('articles', 'id'),
                GREATEST(
                    $1,
                    COALESCE(
                        pg_sequence_last_value(pg_get_serial_sequence('articles', 'id')::regclass),
                        0
                    )
                )
             )",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await
    }
}
