//! crates/health_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture: the core never
//! knows whether records live in JSON files, PostgreSQL or memory.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    ChatMessage, Goal, GoalType, MealPlanEntry, Note, Profile, ProgressRecord, Recipe, User,
    UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., files, database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Repository Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores a new user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, credentials: UserCredentials) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a session id to its user. Expired sessions are `Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> PortResult<Option<Profile>>;

    /// Inserts or replaces the profile keyed by `profile.user_id`.
    async fn put_profile(&self, profile: Profile) -> PortResult<Profile>;
}

#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Goals for a user, most recently updated first.
    async fn list_goals(&self, user_id: Uuid, goal_type: Option<GoalType>) -> PortResult<Vec<Goal>>;

    async fn get_goal(&self, goal_id: Uuid) -> PortResult<Goal>;

    async fn create_goal(&self, goal: Goal) -> PortResult<Goal>;

    /// Replaces the stored goal with the same id. `NotFound` if it does not exist.
    async fn update_goal(&self, goal: Goal) -> PortResult<Goal>;

    async fn delete_goal(&self, goal_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes(&self, user_id: Uuid) -> PortResult<Vec<Note>>;

    async fn get_note(&self, note_id: Uuid) -> PortResult<Note>;

    async fn create_note(&self, note: Note) -> PortResult<Note>;

    async fn update_note(&self, note: Note) -> PortResult<Note>;

    async fn delete_note(&self, note_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Recipes for a user, newest first.
    async fn list_recipes(&self, user_id: Uuid) -> PortResult<Vec<Recipe>>;

    async fn get_recipe(&self, recipe_id: Uuid) -> PortResult<Recipe>;

    async fn create_recipe(&self, recipe: Recipe) -> PortResult<Recipe>;

    async fn update_recipe(&self, recipe: Recipe) -> PortResult<Recipe>;

    async fn delete_recipe(&self, recipe_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Progress records for a user, latest `date` first.
    async fn list_progress(&self, user_id: Uuid) -> PortResult<Vec<ProgressRecord>>;

    async fn get_progress(&self, record_id: Uuid) -> PortResult<ProgressRecord>;

    async fn create_progress(&self, record: ProgressRecord) -> PortResult<ProgressRecord>;

    async fn update_progress(&self, record: ProgressRecord) -> PortResult<ProgressRecord>;

    async fn delete_progress(&self, record_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait MealPlanStore: Send + Sync {
    /// Entries of one planning week, in insertion order.
    async fn list_meal_plans(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> PortResult<Vec<MealPlanEntry>>;

    async fn get_meal_plan(&self, entry_id: Uuid) -> PortResult<MealPlanEntry>;

    async fn create_meal_plan(&self, entry: MealPlanEntry) -> PortResult<MealPlanEntry>;

    async fn delete_meal_plan(&self, entry_id: Uuid) -> PortResult<()>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    /// A user's conversation, oldest message first.
    async fn list_messages(&self, user_id: Uuid) -> PortResult<Vec<ChatMessage>>;

    async fn save_message(&self, message: ChatMessage) -> PortResult<ChatMessage>;
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ChatResponder: Send + Sync {
    /// Produces the assistant's reply to `prompt`, given the earlier conversation.
    async fn respond(&self, history: &[ChatMessage], prompt: &str) -> PortResult<String>;
}
