use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    models::{Product, ProductGroup, SortField},
    store::{NewProduct, ProductReplacement},
};

pub async fn find_all(pool: &PgPool, sort: SortField) -> sqlx::Result<Vec<Product>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT id, item, price, quantity, about FROM products ORDER BY ");

    // seq is insertion order and breaks ties
    match sort.column() {
        Some(column @ ("item" | "about")) => {
            query.push(column);
            query.push(" COLLATE \"C\" ASC, seq ASC");
        }
        Some(column) => {
            query.push(column);
            query.push(" ASC, seq ASC");
        }
        None => {
            query.push("seq ASC");
        }
    }

    query.build_query_as::<Product>().fetch_all(pool).await
}

pub async fn insert(pool: &PgPool, product: &NewProduct) -> sqlx::Result<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (id, item, price, quantity, about)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, item, price, quantity, about
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&product.item)
    .bind(product.price)
    .bind(product.quantity)
    .bind(&product.about)
    .fetch_one(pool)
    .await
}

/// Returns `(matched, modified)` row counts. A `NULL` parameter keeps the
/// stored value of that column.
pub async fn replace(
    pool: &PgPool,
    id: Uuid,
    replacement: &ProductReplacement,
) -> sqlx::Result<(i64, i64)> {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        WITH target AS (
            SELECT id, item, price, quantity, about FROM products WHERE id = $1
        ),
        updated AS (
            UPDATE products p
            SET item = COALESCE($2::text, t.item),
                price = COALESCE($3::float8, t.price),
                quantity = COALESCE($4::int8, t.quantity),
                about = $5::text
            FROM target t
            WHERE p.id = t.id
              AND (t.item, t.price, t.quantity, t.about) IS DISTINCT FROM (
                  COALESCE($2::text, t.item),
                  COALESCE($3::float8, t.price),
                  COALESCE($4::int8, t.quantity),
                  $5::text
              )
            RETURNING p.id
        )
        SELECT (SELECT COUNT(*) FROM target), (SELECT COUNT(*) FROM updated)
        "#,
    )
    .bind(id)
    .bind(&replacement.item)
    .bind(replacement.price)
    .bind(replacement.quantity)
    .bind(&replacement.about)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn group_by_item(pool: &PgPool) -> sqlx::Result<Vec<ProductGroup>> {
    sqlx::query_as::<_, ProductGroup>(
        r#"
        SELECT
            item,
            SUM(quantity)::bigint AS quantity,
            SUM(price * quantity)::float8 AS productvalue
        FROM products
        GROUP BY item
        ORDER BY MIN(seq) ASC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn ping(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
