//! Postgres-backed store (feature `postgres`).

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};

use cinedex_core::{Direction, Movie, MovieCriteria, MovieId, NewMovie, Pageable, RangeFilter, StringFilter};

use super::{MoviePage, MovieStore, StoreError};

const COLUMNS: &str = "id, name, category, rating";

#[derive(Debug, Clone)]
pub struct PostgresMovieStore {
    pool: PgPool,
}

impl PostgresMovieStore {
    /// Connect and make sure the `movies` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id       BIGSERIAL PRIMARY KEY,
                name     VARCHAR(255) NULL,
                category VARCHAR(255) NULL,
                rating   DOUBLE PRECISION NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn row_to_movie(row: &PgRow) -> Result<Movie, sqlx::Error> {
    Ok(Movie {
        id: MovieId::new(row.try_get::<i64, _>("id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        rating: row.try_get("rating")?,
    })
}

/// `%` and `_` in user input match literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_range<T>(qb: &mut QueryBuilder<'static, Postgres>, column: &'static str, filter: &RangeFilter<T>)
where
    T: Copy + Send + 'static + sqlx::Encode<'static, Postgres> + sqlx::Type<Postgres>,
    Vec<T>: sqlx::Encode<'static, Postgres> + sqlx::Type<Postgres>,
{
    if let Some(specified) = filter.specified {
        qb.push(format!(" AND {column} IS {}NULL", if specified { "NOT " } else { "" }));
    }
    let comparisons = [
        ("=", filter.equals),
        ("<>", filter.not_equals),
        (">", filter.greater_than),
        ("<", filter.less_than),
        (">=", filter.greater_than_or_equal),
        ("<=", filter.less_than_or_equal),
    ];
    for (op, value) in comparisons {
        if let Some(value) = value {
            qb.push(format!(" AND {column} {op} ")).push_bind(value);
        }
    }
    if let Some(values) = &filter.in_list {
        qb.push(format!(" AND {column} = ANY(")).push_bind(values.clone()).push(")");
    }
    if let Some(values) = &filter.not_in_list {
        qb.push(format!(" AND NOT ({column} = ANY(")).push_bind(values.clone()).push("))");
    }
}

fn push_string(qb: &mut QueryBuilder<'static, Postgres>, column: &'static str, filter: &StringFilter) {
    if let Some(specified) = filter.specified {
        qb.push(format!(" AND {column} IS {}NULL", if specified { "NOT " } else { "" }));
    }
    if let Some(value) = &filter.equals {
        qb.push(format!(" AND {column} = ")).push_bind(value.clone());
    }
    if let Some(value) = &filter.not_equals {
        qb.push(format!(" AND {column} <> ")).push_bind(value.clone());
    }
    if let Some(values) = &filter.in_list {
        qb.push(format!(" AND {column} = ANY(")).push_bind(values.clone()).push(")");
    }
    if let Some(values) = &filter.not_in_list {
        qb.push(format!(" AND NOT ({column} = ANY(")).push_bind(values.clone()).push("))");
    }
    if let Some(value) = &filter.contains {
        qb.push(format!(" AND LOWER({column}) LIKE "))
            .push_bind(format!("%{}%", escape_like(&value.to_lowercase())));
    }
    if let Some(value) = &filter.does_not_contain {
        qb.push(format!(" AND LOWER({column}) NOT LIKE "))
            .push_bind(format!("%{}%", escape_like(&value.to_lowercase())));
    }
}

fn push_criteria(qb: &mut QueryBuilder<'static, Postgres>, criteria: &MovieCriteria) {
    qb.push(" WHERE TRUE");
    push_range(qb, "id", &criteria.id.map(i64::from));
    push_string(qb, "name", &criteria.name);
    push_string(qb, "category", &criteria.category);
    push_range(qb, "rating", &criteria.rating);
}

#[async_trait]
impl MovieStore for PostgresMovieStore {
    async fn insert(&self, movie: NewMovie) -> Result<Movie, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO movies (name, category, rating) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(movie.name)
        .bind(movie.category)
        .bind(movie.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_movie(&row)?)
    }

    async fn save(&self, movie: Movie) -> Result<Movie, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE movies SET name = $2, category = $3, rating = $4 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(movie.id.get())
        .bind(movie.name)
        .bind(movie.category)
        .bind(movie.rating)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(row_to_movie(&row)?),
            None => Err(StoreError::NotFound(movie.id)),
        }
    }

    async fn find(&self, id: MovieId) -> Result<Option<Movie>, StoreError> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM movies WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_movie).transpose()?)
    }

    async fn exists(&self, id: MovieId) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<bool, _>(0)?)
    }

    async fn delete(&self, id: MovieId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_page(
        &self,
        criteria: &MovieCriteria,
        pageable: &Pageable,
    ) -> Result<MoviePage, StoreError> {
        let total = self.count(criteria).await?;

        let mut qb = QueryBuilder::<'static, Postgres>::new(format!("SELECT {COLUMNS} FROM movies"));
        push_criteria(&mut qb, criteria);
        qb.push(" ORDER BY ");
        for order in &pageable.sort {
            let direction = match order.direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            qb.push(format!("{} {direction}, ", order.field.as_str()));
        }
        qb.push("id ASC LIMIT ")
            .push_bind(i64::from(pageable.size))
            .push(" OFFSET ")
            .push_bind(i64::try_from(pageable.offset()).unwrap_or(i64::MAX));

        let rows = qb.build().fetch_all(&self.pool).await?;
        let items = rows.iter().map(row_to_movie).collect::<Result<Vec<_>, _>>()?;
        Ok(MoviePage { items, total })
    }

    async fn count(&self, criteria: &MovieCriteria) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<'static, Postgres>::new("SELECT COUNT(*) FROM movies");
        push_criteria(&mut qb, criteria);
        let row = qb.build().fetch_one(&self.pool).await?;
        let count: i64 = row.try_get(0)?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn search_by_name_or_category(&self, keyword: &str) -> Result<Vec<Movie>, StoreError> {
        let pattern = format!("{}%", escape_like(&keyword.to_lowercase()));
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM movies WHERE LOWER(name) LIKE $1 OR LOWER(category) LIKE $1 ORDER BY id"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_movie).collect::<Result<Vec<_>, _>>()?)
    }
}
