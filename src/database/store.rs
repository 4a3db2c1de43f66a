use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use tracing::info;

use super::manager::DatabaseError;
use super::models::drink::{Drink, Ingredient, NewDrink};

/// Persistence for drinks. Each call is a single-row (or single-scan)
/// operation; atomicity is whatever the backend gives one statement.
#[async_trait]
pub trait DrinkStore: Send + Sync {
    /// All drinks, ordered by id
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Drink>, DatabaseError>;

    /// Insert and return the drink with its assigned id
    async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError>;

    /// Overwrite title and recipe of an existing row. `None` if the row is gone.
    async fn update(&self, drink: &Drink) -> Result<Option<Drink>, DatabaseError>;

    /// Hard delete. `false` if nothing matched.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Drop every drink and start over with the seed drink
    async fn reset(&self) -> Result<(), DatabaseError>;
}

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(80) NOT NULL,
        recipe JSONB NOT NULL
    )
"#;

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: Json<Vec<Ingredient>>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        Drink {
            id: row.id,
            title: row.title,
            recipe: row.recipe.0,
        }
    }
}

/// Drink store on a PostgreSQL `drinks` table
#[derive(Clone)]
pub struct PgDrinkStore {
    pool: PgPool,
}

impl PgDrinkStore {
    /// Wrap the pool, creating the table if it does not exist yet
    pub async fn open(pool: PgPool) -> Result<Self, DatabaseError> {
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DrinkStore for PgDrinkStore {
    async fn list(&self) -> Result<Vec<Drink>, DatabaseError> {
        let rows = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Drink::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Drink>, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>("SELECT id, title, recipe FROM drinks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Drink::from))
    }

    async fn insert(&self, drink: NewDrink) -> Result<Drink, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "INSERT INTO drinks (title, recipe) VALUES ($1, $2) RETURNING id, title, recipe",
        )
        .bind(&drink.title)
        .bind(Json(&drink.recipe))
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, drink: &Drink) -> Result<Option<Drink>, DatabaseError> {
        let row = sqlx::query_as::<_, DrinkRow>(
            "UPDATE drinks SET title = $2, recipe = $3 WHERE id = $1 RETURNING id, title, recipe",
        )
        .bind(drink.id)
        .bind(&drink.title)
        .bind(Json(&drink.recipe))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Drink::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM drinks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn reset(&self) -> Result<(), DatabaseError> {
        let seed = NewDrink::seed();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DROP TABLE IF EXISTS drinks").execute(&mut *tx).await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO drinks (title, recipe) VALUES ($1, $2)")
            .bind(&seed.title)
            .bind(Json(&seed.recipe))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!("Drinks table recreated and seeded");
        Ok(())
    }
}
