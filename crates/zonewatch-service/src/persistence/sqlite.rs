//! SQLite repository adapter.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;
use zonewatch_core::{
    AccessRestrictions, AlertSettings, BoundingBox, RiskLevel, Zone, ZoneFilter, ZoneGeometry,
    ZoneStatistics, ZoneType,
};

use super::{ZoneAnalytics, ZoneRepository};

#[derive(Clone)]
pub struct SqliteZoneRepository {
    pool: SqlitePool,
}

impl SqliteZoneRepository {
    /// Open (or create) the database file and run migrations.
    pub async fn connect(db_path: &str, max_connections: u32) -> Result<Self> {
        if db_path != ":memory:" {
            if let Some(parent) = Path::new(db_path).parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path);
        info!("Connecting to zone database: {}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&db_url)
            .await?;

        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let migration_sql = include_str!("../../migrations/001_init.sql");

    info!("Running zone database migrations...");
    for statement in migration_sql.split(';') {
        let statement: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Zone database migrations complete");
    Ok(())
}

#[async_trait]
impl ZoneRepository for SqliteZoneRepository {
    async fn fetch_zones(&self, filter: Option<ZoneFilter>) -> Result<Vec<Zone>> {
        let rows = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, zone_type, geometry, bounding_box, risk_level, risk_score, \
             access_restrictions, alert_settings, statistics, created_at, updated_at \
             FROM zones ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let zones: Result<Vec<Zone>> = rows.into_iter().map(Zone::try_from).collect();
        // Zone counts are small; filtering in memory keeps the SQL trivial.
        Ok(zones?
            .into_iter()
            .filter(|zone| filter.as_ref().map_or(true, |f| f.matches(zone)))
            .collect())
    }

    async fn fetch_zone(&self, id: &str) -> Result<Option<Zone>> {
        let row = sqlx::query_as::<_, ZoneRow>(
            "SELECT id, name, zone_type, geometry, bounding_box, risk_level, risk_score, \
             access_restrictions, alert_settings, statistics, created_at, updated_at \
             FROM zones WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Zone::try_from).transpose()
    }

    async fn create_zone(&self, zone: &Zone) -> Result<()> {
        self.upsert(zone).await
    }

    async fn update_zone(&self, zone: &Zone) -> Result<()> {
        self.upsert(zone).await
    }

    async fn delete_zone(&self, id: &str) -> Result<bool> {
        sqlx::query("DELETE FROM zone_analytics WHERE zone_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let result = sqlx::query("DELETE FROM zones WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_analytics(&self, zone_id: &str) -> Result<Option<ZoneAnalytics>> {
        let row: Option<(String, i64, String)> = sqlx::query_as(
            "SELECT zone_id, visits_today, metrics FROM zone_analytics WHERE zone_id = ?1",
        )
        .bind(zone_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(zone_id, visits_today, metrics)| {
            let metrics: HashMap<String, f64> = serde_json::from_str(&metrics)?;
            Ok(ZoneAnalytics {
                zone_id,
                visits_today: visits_today.max(0) as u64,
                metrics,
            })
        })
        .transpose()
    }

    async fn upsert_analytics(&self, analytics: &ZoneAnalytics) -> Result<()> {
        let metrics_json = serde_json::to_string(&analytics.metrics)?;
        sqlx::query(
            r#"
            INSERT INTO zone_analytics (zone_id, visits_today, metrics)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(zone_id) DO UPDATE SET
                visits_today = ?2, metrics = ?3
            "#,
        )
        .bind(&analytics.zone_id)
        .bind(analytics.visits_today as i64)
        .bind(&metrics_json)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl SqliteZoneRepository {
    async fn upsert(&self, zone: &Zone) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO zones (id, name, zone_type, geometry, bounding_box, risk_level,
                risk_score, access_restrictions, alert_settings, statistics, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
                name = ?2, zone_type = ?3, geometry = ?4, bounding_box = ?5,
                risk_level = ?6, risk_score = ?7, access_restrictions = ?8,
                alert_settings = ?9, statistics = ?10, updated_at = ?12
            "#,
        )
        .bind(&zone.id)
        .bind(&zone.name)
        .bind(serde_json::to_string(&zone.zone_type)?)
        .bind(serde_json::to_string(&zone.geometry)?)
        .bind(serde_json::to_string(&zone.bounding_box)?)
        .bind(serde_json::to_string(&zone.risk_level)?)
        .bind(zone.risk_score)
        .bind(serde_json::to_string(&zone.access_restrictions)?)
        .bind(serde_json::to_string(&zone.alert_settings)?)
        .bind(serde_json::to_string(&zone.statistics)?)
        .bind(zone.created_at.to_rfc3339())
        .bind(zone.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct ZoneRow {
    id: String,
    name: String,
    zone_type: String,
    geometry: String,
    bounding_box: String,
    risk_level: String,
    risk_score: f64,
    access_restrictions: String,
    alert_settings: String,
    statistics: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ZoneRow> for Zone {
    type Error = anyhow::Error;

    fn try_from(row: ZoneRow) -> Result<Self> {
        let zone_type: ZoneType = serde_json::from_str(&row.zone_type)?;
        let geometry: ZoneGeometry = serde_json::from_str(&row.geometry)?;
        let bounding_box: BoundingBox = serde_json::from_str(&row.bounding_box)?;
        let risk_level: RiskLevel = serde_json::from_str(&row.risk_level)?;
        let access_restrictions: AccessRestrictions =
            serde_json::from_str(&row.access_restrictions)?;
        let alert_settings: AlertSettings = serde_json::from_str(&row.alert_settings)?;
        let statistics: ZoneStatistics = serde_json::from_str(&row.statistics)?;

        Ok(Zone {
            id: row.id,
            name: row.name,
            zone_type,
            geometry,
            bounding_box,
            risk_level,
            risk_score: row.risk_score,
            access_restrictions,
            alert_settings,
            statistics,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        })
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
