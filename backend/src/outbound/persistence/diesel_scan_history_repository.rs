//! PostgreSQL-backed `ScanHistoryRepository` implementation using Diesel ORM.
//!
//! List and payload fields are encoded to JSON text on insert and decoded on
//! every read through [`super::json_fields`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ScanHistoryRepository, ScanHistoryRepositoryError};
use crate::domain::{NewScanRecord, NutritionFacts, RiskLevel, ScanId, ScanRecord, UserKey};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::json_fields::{decode_payload, decode_string_list, encode_payload, encode_string_list};
use super::models::{NewScanHistoryRow, ScanHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::scan_history;

/// Diesel-backed implementation of the `ScanHistoryRepository` port.
#[derive(Clone)]
pub struct DieselScanHistoryRepository {
    pool: DbPool,
}

impl DieselScanHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScanHistoryRepositoryError {
    map_basic_pool_error(error, |message| {
        ScanHistoryRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ScanHistoryRepositoryError {
    map_basic_diesel_error(
        error,
        |message| ScanHistoryRepositoryError::query(message),
        |message| ScanHistoryRepositoryError::connection(message),
    )
}

fn map_encoding_error(error: serde_json::Error) -> ScanHistoryRepositoryError {
    ScanHistoryRepositoryError::encoding(error.to_string())
}

fn new_row(key: UserKey, record: &NewScanRecord) -> Result<NewScanHistoryRow<'_>, ScanHistoryRepositoryError> {
    Ok(NewScanHistoryRow {
        user_id: key.get(),
        product_name: &record.product_name,
        risk_level: record.risk_level.as_str(),
        risk_score: record.risk_score,
        risk_reason: &record.risk_reason,
        calories: record.nutrition.calories,
        carbs: record.nutrition.carbs,
        protein: record.nutrition.protein,
        fat: record.nutrition.fat,
        detected_ingredients: encode_string_list(&record.detected_ingredients)
            .map_err(map_encoding_error)?,
        detected_allergens: encode_string_list(record.detected_allergens())
            .map_err(map_encoding_error)?,
        diet_warnings: encode_string_list(&record.diet_warnings).map_err(map_encoding_error)?,
        analysis_payload: encode_payload(&record.analysis_payload).map_err(map_encoding_error)?,
    })
}

/// Convert a row, skipping it when the risk level is unreadable.
fn row_to_record(row: ScanHistoryRow) -> Option<ScanRecord> {
    let risk_level = match row.risk_level.parse::<RiskLevel>() {
        Ok(level) => level,
        Err(err) => {
            warn!(record_id = row.id, error = %err, "skipping scan record with unknown risk level");
            return None;
        }
    };

    Some(ScanRecord {
        id: ScanId::new(row.id),
        risk_level,
        risk_score: row.risk_score,
        nutrition: NutritionFacts {
            calories: row.calories,
            carbs: row.carbs,
            protein: row.protein,
            fat: row.fat,
        },
        detected_ingredients: decode_string_list(
            &row.detected_ingredients,
            row.id,
            "detected_ingredients",
        ),
        detected_allergens: decode_string_list(
            &row.detected_allergens,
            row.id,
            "detected_allergens",
        ),
        diet_warnings: decode_string_list(&row.diet_warnings, row.id, "diet_warnings"),
        analysis_payload: decode_payload(&row.analysis_payload, row.id),
        product_name: row.product_name,
        risk_reason: row.risk_reason,
        scanned_at: row.scanned_at,
    })
}

#[async_trait]
impl ScanHistoryRepository for DieselScanHistoryRepository {
    async fn append(
        &self,
        key: UserKey,
        record: &NewScanRecord,
    ) -> Result<ScanId, ScanHistoryRepositoryError> {
        let row = new_row(key, record)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let id: i64 = diesel::insert_into(scan_history::table)
            .values(&row)
            .returning(scan_history::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(ScanId::new(id))
    }

    async fn list_since(
        &self,
        key: UserKey,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ScanRecord>, ScanHistoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = scan_history::table
            .filter(scan_history::user_id.eq(key.get()))
            .select(ScanHistoryRow::as_select())
            .order_by((scan_history::scanned_at.desc(), scan_history::id.desc()))
            .into_boxed();
        if let Some(since) = since {
            query = query.filter(scan_history::scanned_at.ge(since));
        }

        let rows: Vec<ScanHistoryRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().filter_map(row_to_record).collect())
    }
}
