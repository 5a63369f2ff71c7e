//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the PostgreSQL implementation of
//! the `MealPlanStore` and `ChatStore` ports. It is used instead of the JSON
//! files for those two collections when `DATABASE_URL` is configured.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use health_tracker_core::domain::{ChatMessage, ChatRole, MealPlanEntry, MealSlot, Weekday};
use health_tracker_core::ports::{ChatStore, MealPlanStore, PortError, PortResult};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the meal-plan and chat ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

// Enums are stored as their serde (camelCase) names.
fn to_text<T: Serialize>(value: &T) -> PortResult<String> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(text)) => Ok(text),
        Ok(other) => Err(PortError::Unexpected(format!("Expected a string enum, got {}", other))),
        Err(e) => Err(PortError::Unexpected(e.to_string())),
    }
}

fn from_text<T: DeserializeOwned>(text: String) -> PortResult<T> {
    serde_json::from_value(serde_json::Value::String(text))
        .map_err(|e| PortError::Unexpected(format!("Unknown stored value: {}", e)))
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct MealPlanRecord {
    id: Uuid,
    user_id: Uuid,
    week_start: NaiveDate,
    day: String,
    meal_type: String,
    recipe_id: Option<Uuid>,
    recipe_title: String,
    calories: f64,
    created_at: DateTime<Utc>,
}
impl MealPlanRecord {
    fn to_domain(self) -> PortResult<MealPlanEntry> {
        Ok(MealPlanEntry {
            id: self.id,
            user_id: self.user_id,
            week_start: self.week_start,
            day: from_text::<Weekday>(self.day)?,
            meal_type: from_text::<MealSlot>(self.meal_type)?,
            recipe_id: self.recipe_id,
            recipe_title: self.recipe_title,
            calories: self.calories,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct ChatMessageRecord {
    id: Uuid,
    user_id: Uuid,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}
impl ChatMessageRecord {
    fn to_domain(self) -> PortResult<ChatMessage> {
        Ok(ChatMessage {
            id: self.id,
            user_id: self.user_id,
            role: from_text::<ChatRole>(self.role)?,
            content: self.content,
            created_at: self.created_at,
        })
    }
}

const MEAL_PLAN_COLUMNS: &str =
    "id, user_id, week_start, day, meal_type, recipe_id, recipe_title, calories, created_at";

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl MealPlanStore for DbAdapter {
    async fn list_meal_plans(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> PortResult<Vec<MealPlanEntry>> {
        let records = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans WHERE user_id = $1 AND week_start = $2 ORDER BY created_at ASC, id ASC"
        ))
        .bind(user_id)
        .bind(week_start)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_meal_plan(&self, entry_id: Uuid) -> PortResult<MealPlanEntry> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans WHERE id = $1"
        ))
        .bind(entry_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Meal plan {} not found", entry_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        record.to_domain()
    }

    async fn create_meal_plan(&self, entry: MealPlanEntry) -> PortResult<MealPlanEntry> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "INSERT INTO meal_plans ({MEAL_PLAN_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {MEAL_PLAN_COLUMNS}"
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.week_start)
        .bind(to_text(&entry.day)?)
        .bind(to_text(&entry.meal_type)?)
        .bind(entry.recipe_id)
        .bind(&entry.recipe_title)
        .bind(entry.calories)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        record.to_domain()
    }

    async fn delete_meal_plan(&self, entry_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Meal plan {} not found", entry_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatStore for DbAdapter {
    async fn list_messages(&self, user_id: Uuid) -> PortResult<Vec<ChatMessage>> {
        let records = sqlx::query_as::<_, ChatMessageRecord>(
            "SELECT id, user_id, role, content, created_at FROM chat_messages WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn save_message(&self, message: ChatMessage) -> PortResult<ChatMessage> {
        sqlx::query(
            "INSERT INTO chat_messages (id, user_id, role, content, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(message.id)
        .bind(message.user_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(message)
    }
}
