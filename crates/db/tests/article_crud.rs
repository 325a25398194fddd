//! Integration tests for the article and reference repositories.
//!
//! Exercises the repository layer against a real database:
//! - Serial number reservation and client-supplied ids
//! - Full-replacement updates and deletes
//! - QR import merging into existing rows
//! - Reference lookups and `ON DELETE SET NULL`

use sqlx::PgPool;
use stockqr_db::models::article::{CreateArticle, ImportArticle, UpdateArticle};
use stockqr_db::models::reference::{CreateReference, ReferenceKind};
use stockqr_db::repositories::{ArticleRepo, ReferenceRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_article(id: i64, name: &str) -> CreateArticle {
    CreateArticle {
        id,
        name: name.to_string(),
        length: None,
        width: None,
        height: None,
        category: None,
        qr_code: None,
        qr_fields: Vec::new(),
        warehouse_id: None,
        manufacturer_id: None,
        supplier_id: None,
    }
}

fn new_reference(name: &str) -> CreateReference {
    CreateReference {
        name: name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_with_reserved_id(pool: PgPool) {
    let id = ArticleRepo::next_id(&pool).await.unwrap();
    let mut input = new_article(id, "Bolt");
    input.length = Some(5.0);
    input.qr_code = Some(vec![1, 2, 3]);
    input.qr_fields = vec!["name".to_string()];

    let article = ArticleRepo::create(&pool, &input).await.unwrap();
    assert_eq!(article.id, id);
    assert_eq!(article.name, "Bolt");
    assert_eq!(article.length, Some(5.0));
    assert_eq!(article.qr_code.as_deref(), Some(&[1u8, 2, 3][..]));
    assert_eq!(article.qr_fields, vec!["name".to_string()]);

    let found = ArticleRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(found.name, "Bolt");
}

#[sqlx::test(migrations = "./migrations")]
async fn reserved_ids_are_distinct(pool: PgPool) {
    let a = ArticleRepo::next_id(&pool).await.unwrap();
    let b = ArticleRepo::next_id(&pool).await.unwrap();
    assert_ne!(a, b);
}

#[sqlx::test(migrations = "./migrations")]
async fn client_supplied_id_advances_sequence(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article(500, "Manual"))
        .await
        .unwrap();

    let next = ArticleRepo::next_id(&pool).await.unwrap();
    assert!(next > 500, "sequence should move past 500, got {next}");
}

#[sqlx::test(migrations = "./migrations")]
async fn lower_client_id_does_not_move_sequence_back(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article(500, "High"))
        .await
        .unwrap();
    ArticleRepo::create(&pool, &new_article(400, "Low"))
        .await
        .unwrap();

    let next = ArticleRepo::next_id(&pool).await.unwrap();
    assert!(next > 500, "sequence should stay past 500, got {next}");
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_client_ids_leave_sequence_past_the_highest(pool: PgPool) {
    let inputs: Vec<CreateArticle> = (0..8)
        .map(|i| new_article(1000 - i * 100, &format!("Article {i}")))
        .collect();
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| {
            let pool = pool.clone();
            tokio::spawn(async move { ArticleRepo::create(&pool, &input).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let next = ArticleRepo::next_id(&pool).await.unwrap();
    assert!(next > 1000, "sequence should be past 1000, got {next}");
    let fresh = new_article(next, "Generated");
    ArticleRepo::create(&pool, &fresh).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_id_violates_primary_key(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article(10, "First"))
        .await
        .unwrap();
    let err = ArticleRepo::create(&pool, &new_article(10, "Second"))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_replaces_columns(pool: PgPool) {
    let warehouse = ReferenceRepo::create(&pool, ReferenceKind::Warehouse, &new_reference("North"))
        .await
        .unwrap();
    let mut input = new_article(1, "Old");
    input.category = Some("Misc".to_string());
    ArticleRepo::create(&pool, &input).await.unwrap();

    let update = UpdateArticle {
        name: "New".to_string(),
        length: Some(2.5),
        width: None,
        height: None,
        category: None,
        qr_code: Some(vec![9]),
        qr_fields: vec!["warehouse".to_string()],
        warehouse_id: Some(warehouse.id),
        manufacturer_id: None,
        supplier_id: None,
    };
    let updated = ArticleRepo::update(&pool, 1, &update).await.unwrap().unwrap();

    assert_eq!(updated.name, "New");
    assert_eq!(updated.length, Some(2.5));
    assert_eq!(updated.category, None);
    assert_eq!(updated.warehouse_id, Some(warehouse.id));
    assert_eq!(updated.qr_fields, vec!["warehouse".to_string()]);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_article_returns_none(pool: PgPool) {
    let update = UpdateArticle {
        name: "Ghost".to_string(),
        length: None,
        width: None,
        height: None,
        category: None,
        qr_code: None,
        qr_fields: Vec::new(),
        warehouse_id: None,
        manufacturer_id: None,
        supplier_id: None,
    };
    assert!(ArticleRepo::update(&pool, 999, &update)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_row(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article(3, "Gone"))
        .await
        .unwrap();

    assert!(ArticleRepo::delete(&pool, 3).await.unwrap());
    assert!(!ArticleRepo::delete(&pool, 3).await.unwrap());
    assert!(ArticleRepo::find_by_id(&pool, 3).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_returns_all_articles(pool: PgPool) {
    ArticleRepo::create(&pool, &new_article(1, "A")).await.unwrap();
    ArticleRepo::create(&pool, &new_article(2, "B")).await.unwrap();

    let articles = ArticleRepo::list(&pool).await.unwrap();
    assert_eq!(articles.len(), 2);
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn import_creates_missing_article(pool: PgPool) {
    let input = ImportArticle {
        id: 77,
        name: Some("Scanned".to_string()),
        length: Some(4.0),
        width: None,
        height: None,
        category: None,
        qr_code: vec![7, 7],
        qr_fields: vec!["name".to_string(), "length".to_string()],
    };
    let article = ArticleRepo::import(&pool, &input).await.unwrap();

    assert_eq!(article.id, 77);
    assert_eq!(article.name, "Scanned");
    assert_eq!(article.length, Some(4.0));
    assert_eq!(article.qr_code, Some(vec![7, 7]));
    assert!(ArticleRepo::next_id(&pool).await.unwrap() > 77);
}

#[sqlx::test(migrations = "./migrations")]
async fn import_without_name_creates_unnamed_article(pool: PgPool) {
    let input = ImportArticle {
        id: 5,
        name: None,
        length: None,
        width: None,
        height: None,
        category: Some("Tools".to_string()),
        qr_code: vec![1],
        qr_fields: vec!["category".to_string()],
    };
    let article = ArticleRepo::import(&pool, &input).await.unwrap();
    assert_eq!(article.name, "");
    assert_eq!(article.category.as_deref(), Some("Tools"));
}

#[sqlx::test(migrations = "./migrations")]
async fn import_merges_into_existing_article(pool: PgPool) {
    let supplier = ReferenceRepo::create(&pool, ReferenceKind::Supplier, &new_reference("Acme"))
        .await
        .unwrap();
    let mut existing = new_article(8, "Original");
    existing.category = Some("Kept".to_string());
    existing.supplier_id = Some(supplier.id);
    ArticleRepo::create(&pool, &existing).await.unwrap();

    let input = ImportArticle {
        id: 8,
        name: Some("Renamed".to_string()),
        length: None,
        width: Some(1.5),
        height: None,
        category: None,
        qr_code: vec![4, 2],
        qr_fields: vec!["name".to_string(), "width".to_string()],
    };
    let article = ArticleRepo::import(&pool, &input).await.unwrap();

    assert_eq!(article.name, "Renamed");
    assert_eq!(article.width, Some(1.5));
    assert_eq!(article.category.as_deref(), Some("Kept"));
    assert_eq!(article.supplier_id, Some(supplier.id));
    assert_eq!(article.qr_code, Some(vec![4, 2]));
    assert_eq!(
        article.qr_fields,
        vec!["name".to_string(), "width".to_string()]
    );
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reference_tables_are_independent(pool: PgPool) {
    let warehouse = ReferenceRepo::create(&pool, ReferenceKind::Warehouse, &new_reference("North"))
        .await
        .unwrap();
    ReferenceRepo::create(&pool, ReferenceKind::Manufacturer, &new_reference("Acme"))
        .await
        .unwrap();

    let found = ReferenceRepo::find_by_id(&pool, ReferenceKind::Warehouse, warehouse.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "North");

    assert_eq!(
        ReferenceRepo::list(&pool, ReferenceKind::Manufacturer)
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(ReferenceRepo::list(&pool, ReferenceKind::Supplier)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn references_list_in_name_order(pool: PgPool) {
    for name in ["Zeta", "Alpha", "Mid"] {
        ReferenceRepo::create(&pool, ReferenceKind::Supplier, &new_reference(name))
            .await
            .unwrap();
    }
    let names: Vec<String> = ReferenceRepo::list(&pool, ReferenceKind::Supplier)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_reference_clears_article_link(pool: PgPool) {
    let warehouse = ReferenceRepo::create(&pool, ReferenceKind::Warehouse, &new_reference("East"))
        .await
        .unwrap();
    let mut input = new_article(4, "Linked");
    input.warehouse_id = Some(warehouse.id);
    ArticleRepo::create(&pool, &input).await.unwrap();

    sqlx::query("DELETE FROM warehouses WHERE id = $1")
        .bind(warehouse.id)
        .execute(&pool)
        .await
        .unwrap();

    let article = ArticleRepo::find_by_id(&pool, 4).await.unwrap().unwrap();
    assert_eq!(article.warehouse_id, None);
}
