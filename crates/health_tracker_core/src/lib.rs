pub mod domain;
pub mod goals;
pub mod meal_plan;
pub mod metrics;
pub mod notes;
pub mod ports;
pub mod rollback;

pub use domain::{
    ActivityLevel, AuthSession, ChatMessage, ChatRole, Gender, Goal, GoalPatch, GoalType,
    HealthInfo, MealPlanEntry, MealSlot, Measurements, Milestone, Note, PersonalInfo, Preferences,
    Profile, ProgressRecord, Recipe, User, UserCredentials, Weekday,
};
pub use goals::GoalError;
pub use metrics::{BmiCategory, HealthMetrics};
pub use ports::{
    ChatResponder, ChatStore, GoalStore, MealPlanStore, NoteStore, PortError, PortResult,
    ProfileStore, ProgressStore, RecipeStore, UserStore,
};
pub use rollback::{apply_then_persist, RollbackError};
