//! Engine bookkeeping kept in the `system_state` table.
//!
//! Only the instant of the last successful catch-up is tracked. It is
//! informational: generation never depends on it, since idempotence comes from
//! the per-period existence check.

use crate::{
    entities::{SystemState, system_state},
    errors::{Error, Result},
};
use chrono::{Local, NaiveDateTime};
use sea_orm::{Set, prelude::*};

const LAST_GENERATION_RUN_KEY: &str = "last_generation_run";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Instant of the last successful catch-up pass, if one was recorded.
pub async fn get_last_generation_run<C>(db: &C) -> Result<Option<NaiveDateTime>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_GENERATION_RUN_KEY))
        .one(db)
        .await?;

    match state {
        Some(s) => NaiveDateTime::parse_from_str(&s.value, TIMESTAMP_FORMAT)
            .map(Some)
            .map_err(|e| Error::Config {
                message: format!("Failed to parse last generation run: {e}"),
            }),
        None => Ok(None),
    }
}

/// Records `at` as the instant of the last successful catch-up pass.
pub async fn set_last_generation_run<C>(db: &C, at: NaiveDateTime) -> Result<()>
where
    C: ConnectionTrait,
{
    let value = at.format(TIMESTAMP_FORMAT).to_string();
    let now = Local::now().naive_local();

    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(LAST_GENERATION_RUN_KEY))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(LAST_GENERATION_RUN_KEY.to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}
