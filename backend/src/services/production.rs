//! Read access to production tracking records

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::ProductionRecord;

/// Production record repository
#[derive(Clone)]
pub struct ProductionService {
    db: PgPool,
}

/// Database row for a production record joined with its variety
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductionRow {
    pub id: i32,
    pub variety_name: String,
    pub hectares: Option<Decimal>,
    pub quantity_harvested: Option<Decimal>,
    pub harvest_date: NaiveDate,
}

impl TryFrom<ProductionRow> for ProductionRecord {
    type Error = AppError;

    fn try_from(row: ProductionRow) -> Result<Self, Self::Error> {
        let to_f64 = |value: Option<Decimal>, field: &str| -> AppResult<f64> {
            match value {
                None => Ok(0.0),
                Some(d) => d.to_f64().ok_or_else(|| {
                    AppError::Internal(format!("{} of record {} is out of range", field, row.id))
                }),
            }
        };

        Ok(ProductionRecord {
            id: row.id,
            hectares: to_f64(row.hectares, "hectares")?,
            quantity_harvested: to_f64(row.quantity_harvested, "quantity_harvested")?,
            variety_name: row.variety_name,
            harvest_date: row.harvest_date,
        })
    }
}

impl ProductionService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Records for one variety, or every variety when `variety` is `None`,
    /// ordered by harvest date
    pub async fn get_records(&self, variety: Option<&str>) -> AppResult<Vec<ProductionRecord>> {
        let rows = sqlx::query_as::<_, ProductionRow>(
            r#"
            SELECT
                p.id,
                v.variety_name,
                p.hectares,
                p.quantity_harvested,
                p.harvest_date
            FROM production_tracking p
            JOIN rice_varieties v ON v.id = p.rice_variety_id
            WHERE ($1::text IS NULL OR v.variety_name = $1)
            ORDER BY p.harvest_date, p.id
            "#,
        )
        .bind(variety)
        .fetch_all(&self.db)
        .await?;

        tracing::debug!(variety = variety.unwrap_or("All"), count = rows.len(), "Loaded production records");

        rows.into_iter().map(ProductionRecord::try_from).collect()
    }
}
