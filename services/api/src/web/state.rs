//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{EchoResponder, FileStore};
use crate::config::Config;
use health_tracker_core::ports::{
    ChatResponder, ChatStore, GoalStore, MealPlanStore, NoteStore, ProfileStore, ProgressStore,
    RecipeStore, UserStore,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub goals: Arc<dyn GoalStore>,
    pub notes: Arc<dyn NoteStore>,
    pub recipes: Arc<dyn RecipeStore>,
    pub progress: Arc<dyn ProgressStore>,
    pub meal_plans: Arc<dyn MealPlanStore>,
    pub chat: Arc<dyn ChatStore>,
    pub responder: Arc<dyn ChatResponder>,
}

impl AppState {
    /// Wires every port to the same `FileStore`, with the echo chat responder.
    ///
    /// The binary swaps individual ports afterwards (database-backed meal
    /// plans and chat, the LLM responder) depending on configuration.
    pub fn from_file_store(config: Arc<Config>, store: Arc<FileStore>) -> Self {
        Self {
            config,
            users: store.clone(),
            profiles: store.clone(),
            goals: store.clone(),
            notes: store.clone(),
            recipes: store.clone(),
            progress: store.clone(),
            meal_plans: store.clone(),
            chat: store,
            responder: Arc::new(EchoResponder),
        }
    }

    /// Fully in-memory state, used by the integration tests.
    pub fn in_memory() -> Self {
        Self::from_file_store(Arc::new(Config::default()), Arc::new(FileStore::in_memory()))
    }
}
