//! `SQLite` implementation of [`EngineStateStore`].

use std::future::Future;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use dryplug_app::ports::EngineStateStore;
use dryplug_domain::engine_state::EngineState;
use dryplug_domain::entity::{EntityState, UnknownEntityState};
use dryplug_domain::error::DryPlugError;
use dryplug_domain::time::{Timestamp, now};

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`EngineState`].
struct Wrapper(EngineState);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<EngineState> {
        value.map(|w| w.0)
    }
}

fn decode_timestamp(value: Option<String>) -> Result<Option<Timestamp>, sqlx::Error> {
    value
        .map(|s| DateTime::parse_from_rfc3339(&s).map(|dt| dt.with_timezone(&Utc)))
        .transpose()
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

fn encode_timestamp(value: Option<Timestamp>) -> Option<String> {
    value.map(|dt| dt.to_rfc3339())
}

fn decode_switch(value: Option<String>) -> Result<Option<bool>, sqlx::Error> {
    value
        .map(|s| {
            EntityState::from_str(&s)?
                .as_bool()
                .ok_or(UnknownEntityState(s))
        })
        .transpose()
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

fn encode_switch(value: Option<bool>) -> Option<String> {
    value.map(|on| EntityState::from_bool(on).to_string())
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let last_auto_on: Option<String> = row.try_get("last_auto_on")?;
        let power_low_since: Option<String> = row.try_get("power_low_since")?;
        let last_switch_state: Option<String> = row.try_get("last_switch_state")?;

        Ok(Self(EngineState {
            last_auto_on: decode_timestamp(last_auto_on)?,
            power_low_since: decode_timestamp(power_low_since)?,
            manual_override: row.try_get("manual_override")?,
            last_switch_state: decode_switch(last_switch_state)?,
            is_full_latched: row.try_get("is_full_latched")?,
            auto_turning_on: row.try_get("auto_turning_on")?,
        }))
    }
}

const UPSERT: &str = "INSERT INTO engine_state \
    (storage_key, last_auto_on, power_low_since, manual_override, last_switch_state, is_full_latched, auto_turning_on, updated_at) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
    ON CONFLICT(storage_key) DO UPDATE SET \
    last_auto_on = excluded.last_auto_on, \
    power_low_since = excluded.power_low_since, \
    manual_override = excluded.manual_override, \
    last_switch_state = excluded.last_switch_state, \
    is_full_latched = excluded.is_full_latched, \
    auto_turning_on = excluded.auto_turning_on, \
    updated_at = excluded.updated_at";
const SELECT_BY_KEY: &str = "SELECT * FROM engine_state WHERE storage_key = ?";
const DELETE_BY_KEY: &str = "DELETE FROM engine_state WHERE storage_key = ?";

/// `SQLite`-backed engine state store.
#[derive(Clone)]
pub struct SqliteEngineStateStore {
    pool: SqlitePool,
}

impl SqliteEngineStateStore {
    /// Create a new store using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl EngineStateStore for SqliteEngineStateStore {
    fn load(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<EngineState>, DryPlugError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_KEY)
                .bind(&key)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(Wrapper::maybe(row))
        }
    }

    fn save(
        &self,
        key: &str,
        state: &EngineState,
    ) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        let state = state.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(&key)
                .bind(encode_timestamp(state.last_auto_on))
                .bind(encode_timestamp(state.power_low_since))
                .bind(state.manual_override)
                .bind(encode_switch(state.last_switch_state))
                .bind(state.is_full_latched)
                .bind(state.auto_turning_on)
                .bind(now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), DryPlugError>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            sqlx::query(DELETE_BY_KEY)
                .bind(&key)
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
