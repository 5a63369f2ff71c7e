//! services/api/src/adapters/file_store.rs
//!
//! The default storage adapter: one JSON file per collection inside the data
//! directory. The same adapter runs fully in memory for tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use health_tracker_core::domain::{
    AuthSession, ChatMessage, Goal, GoalType, MealPlanEntry, Note, Profile, ProgressRecord,
    Recipe, User, UserCredentials,
};
use health_tracker_core::ports::{
    ChatStore, GoalStore, MealPlanStore, NoteStore, PortError, PortResult, ProfileStore,
    ProgressStore, RecipeStore, UserStore,
};
use std::path::Path;
use uuid::Uuid;

use super::collection::{Collection, Keyed};

//=========================================================================================
// Record Keys
//=========================================================================================

impl Keyed for UserCredentials {
    fn key(&self) -> Uuid {
        self.user.user_id
    }
}

impl Keyed for Profile {
    fn key(&self) -> Uuid {
        self.user_id
    }
}

impl Keyed for Goal {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Note {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for Recipe {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for ProgressRecord {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for MealPlanEntry {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for ChatMessage {
    fn key(&self) -> Uuid {
        self.id
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A storage adapter that implements every repository port over JSON collections.
pub struct FileStore {
    users: Collection<UserCredentials>,
    sessions: Collection<AuthSession>,
    profiles: Collection<Profile>,
    goals: Collection<Goal>,
    notes: Collection<Note>,
    recipes: Collection<Recipe>,
    progress: Collection<ProgressRecord>,
    meal_plans: Collection<MealPlanEntry>,
    chats: Collection<ChatMessage>,
}

impl FileStore {
    /// Opens (or creates) the collections under `data_dir`.
    pub async fn open(data_dir: &Path) -> PortResult<Self> {
        tokio::fs::create_dir_all(data_dir).await.map_err(|e| {
            PortError::Unexpected(format!("Failed to create {}: {}", data_dir.display(), e))
        })?;
        Ok(Self {
            users: Collection::open(data_dir.join("users.json"), "User").await?,
            sessions: Collection::open(data_dir.join("sessions.json"), "Session").await?,
            profiles: Collection::open(data_dir.join("profiles.json"), "Profile").await?,
            goals: Collection::open(data_dir.join("goals.json"), "Goal").await?,
            notes: Collection::open(data_dir.join("notes.json"), "Note").await?,
            recipes: Collection::open(data_dir.join("recipes.json"), "Recipe").await?,
            progress: Collection::open(data_dir.join("progress.json"), "Progress record").await?,
            meal_plans: Collection::open(data_dir.join("mealplans.json"), "Meal plan").await?,
            chats: Collection::open(data_dir.join("chats.json"), "Chat message").await?,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            users: Collection::in_memory("User"),
            sessions: Collection::in_memory("Session"),
            profiles: Collection::in_memory("Profile"),
            goals: Collection::in_memory("Goal"),
            notes: Collection::in_memory("Note"),
            recipes: Collection::in_memory("Recipe"),
            progress: Collection::in_memory("Progress record"),
            meal_plans: Collection::in_memory("Meal plan"),
            chats: Collection::in_memory("Chat message"),
        }
    }
}

//=========================================================================================
// Users and Auth Sessions
//=========================================================================================

#[async_trait]
impl UserStore for FileStore {
    async fn create_user(&self, credentials: UserCredentials) -> PortResult<User> {
        self.users
            .mutate(|users| {
                let email = credentials.user.email.to_lowercase();
                if users.iter().any(|u| u.user.email.to_lowercase() == email) {
                    return Err(PortError::Conflict(
                        "A user with this email already exists".to_string(),
                    ));
                }
                let user = credentials.user.clone();
                users.push(credentials);
                Ok(user)
            })
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let email = email.to_lowercase();
        self.users
            .read(|users| {
                users
                    .iter()
                    .find(|u| u.user.email.to_lowercase() == email)
                    .cloned()
            })
            .await
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let session = AuthSession {
            id: session_id.to_string(),
            user_id,
            expires_at,
        };
        self.sessions
            .mutate(|sessions| {
                // Expired sessions are dropped whenever a new one is written.
                let now = Utc::now();
                sessions.retain(|s| s.expires_at > now);
                sessions.push(session);
                Ok(())
            })
            .await
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let now = Utc::now();
        self.sessions
            .read(|sessions| {
                sessions
                    .iter()
                    .find(|s| s.id == session_id && s.expires_at > now)
                    .map(|s| s.user_id)
            })
            .await
            .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.sessions
            .mutate(|sessions| {
                sessions.retain(|s| s.id != session_id);
                Ok(())
            })
            .await
    }
}

//=========================================================================================
// Profiles
//=========================================================================================

#[async_trait]
impl ProfileStore for FileStore {
    async fn get_profile(&self, user_id: Uuid) -> PortResult<Option<Profile>> {
        Ok(self
            .profiles
            .read(|profiles| profiles.iter().find(|p| p.user_id == user_id).cloned())
            .await)
    }

    async fn put_profile(&self, profile: Profile) -> PortResult<Profile> {
        self.profiles
            .mutate(|profiles| {
                match profiles.iter_mut().find(|p| p.user_id == profile.user_id) {
                    Some(existing) => *existing = profile.clone(),
                    None => profiles.push(profile.clone()),
                }
                Ok(profile)
            })
            .await
    }
}

//=========================================================================================
// Goals
//=========================================================================================

#[async_trait]
impl GoalStore for FileStore {
    async fn list_goals(&self, user_id: Uuid, goal_type: Option<GoalType>) -> PortResult<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .read(|goals| {
                goals
                    .iter()
                    .filter(|g| g.user_id == user_id)
                    .filter(|g| goal_type.map_or(true, |t| g.goal_type == t))
                    .cloned()
                    .collect()
            })
            .await;
        goals.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(goals)
    }

    async fn get_goal(&self, goal_id: Uuid) -> PortResult<Goal> {
        self.goals.get(goal_id).await
    }

    async fn create_goal(&self, goal: Goal) -> PortResult<Goal> {
        self.goals.insert(goal).await
    }

    async fn update_goal(&self, goal: Goal) -> PortResult<Goal> {
        self.goals.replace(goal).await
    }

    async fn delete_goal(&self, goal_id: Uuid) -> PortResult<()> {
        self.goals.remove(goal_id).await
    }
}

//=========================================================================================
// Notes, Recipes and Progress Records
//=========================================================================================

#[async_trait]
impl NoteStore for FileStore {
    async fn list_notes(&self, user_id: Uuid) -> PortResult<Vec<Note>> {
        Ok(self
            .notes
            .read(|notes| notes.iter().filter(|n| n.user_id == user_id).cloned().collect())
            .await)
    }

    async fn get_note(&self, note_id: Uuid) -> PortResult<Note> {
        self.notes.get(note_id).await
    }

    async fn create_note(&self, note: Note) -> PortResult<Note> {
        self.notes.insert(note).await
    }

    async fn update_note(&self, note: Note) -> PortResult<Note> {
        self.notes.replace(note).await
    }

    async fn delete_note(&self, note_id: Uuid) -> PortResult<()> {
        self.notes.remove(note_id).await
    }
}

#[async_trait]
impl RecipeStore for FileStore {
    async fn list_recipes(&self, user_id: Uuid) -> PortResult<Vec<Recipe>> {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .read(|recipes| recipes.iter().filter(|r| r.user_id == user_id).cloned().collect())
            .await;
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn get_recipe(&self, recipe_id: Uuid) -> PortResult<Recipe> {
        self.recipes.get(recipe_id).await
    }

    async fn create_recipe(&self, recipe: Recipe) -> PortResult<Recipe> {
        self.recipes.insert(recipe).await
    }

    async fn update_recipe(&self, recipe: Recipe) -> PortResult<Recipe> {
        self.recipes.replace(recipe).await
    }

    async fn delete_recipe(&self, recipe_id: Uuid) -> PortResult<()> {
        self.recipes.remove(recipe_id).await
    }
}

#[async_trait]
impl ProgressStore for FileStore {
    async fn list_progress(&self, user_id: Uuid) -> PortResult<Vec<ProgressRecord>> {
        let mut records: Vec<ProgressRecord> = self
            .progress
            .read(|records| records.iter().filter(|r| r.user_id == user_id).cloned().collect())
            .await;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn get_progress(&self, record_id: Uuid) -> PortResult<ProgressRecord> {
        self.progress.get(record_id).await
    }

    async fn create_progress(&self, record: ProgressRecord) -> PortResult<ProgressRecord> {
        self.progress.insert(record).await
    }

    async fn update_progress(&self, record: ProgressRecord) -> PortResult<ProgressRecord> {
        self.progress.replace(record).await
    }

    async fn delete_progress(&self, record_id: Uuid) -> PortResult<()> {
        self.progress.remove(record_id).await
    }
}

//=========================================================================================
// Meal Plans and Chat
//=========================================================================================

#[async_trait]
impl MealPlanStore for FileStore {
    async fn list_meal_plans(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> PortResult<Vec<MealPlanEntry>> {
        Ok(self
            .meal_plans
            .read(|entries| {
                entries
                    .iter()
                    .filter(|e| e.user_id == user_id && e.week_start == week_start)
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn get_meal_plan(&self, entry_id: Uuid) -> PortResult<MealPlanEntry> {
        self.meal_plans.get(entry_id).await
    }

    async fn create_meal_plan(&self, entry: MealPlanEntry) -> PortResult<MealPlanEntry> {
        self.meal_plans.insert(entry).await
    }

    async fn delete_meal_plan(&self, entry_id: Uuid) -> PortResult<()> {
        self.meal_plans.remove(entry_id).await
    }
}

#[async_trait]
impl ChatStore for FileStore {
    async fn list_messages(&self, user_id: Uuid) -> PortResult<Vec<ChatMessage>> {
        Ok(self
            .chats
            .read(|messages| messages.iter().filter(|m| m.user_id == user_id).cloned().collect())
            .await)
    }

    async fn save_message(&self, message: ChatMessage) -> PortResult<ChatMessage> {
        self.chats.insert(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use health_tracker_core::domain::Gender;

    fn credentials(email: &str) -> UserCredentials {
        UserCredentials {
            user: User {
                user_id: Uuid::new_v4(),
                name: "Ayla".to_string(),
                email: email.to_string(),
                age: 29,
                gender: Some(Gender::Female),
            },
            hashed_password: "hash".to_string(),
        }
    }

    fn goal(user_id: Uuid, goal_type: GoalType, updated_at: DateTime<Utc>) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            user_id,
            title: format!("{:?}", goal_type),
            description: String::new(),
            goal_type,
            target_value: 10.0,
            current_value: 0.0,
            unit: "kg".to_string(),
            deadline: NaiveDate::from_ymd_opt(2027, 1, 1).unwrap(),
            milestones: Vec::new(),
            completed: false,
            created_at: updated_at,
            updated_at,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_regardless_of_case() {
        let store = FileStore::in_memory();
        store.create_user(credentials("me@example.com")).await.unwrap();
        let err = store
            .create_user(credentials("ME@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Conflict(_)));
        let found = store.get_user_by_email("Me@Example.com").await.unwrap();
        assert_eq!(found.user.name, "Ayla");
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected() {
        let store = FileStore::in_memory();
        let user_id = Uuid::new_v4();
        store
            .create_auth_session("old", user_id, Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        store
            .create_auth_session("fresh", user_id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        assert!(matches!(
            store.validate_auth_session("old").await,
            Err(PortError::Unauthorized)
        ));
        assert_eq!(store.validate_auth_session("fresh").await.unwrap(), user_id);

        store.delete_auth_session("fresh").await.unwrap();
        assert!(store.validate_auth_session("fresh").await.is_err());
    }

    #[tokio::test]
    async fn goals_are_listed_newest_first_and_filtered() {
        let store = FileStore::in_memory();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        store
            .create_goal(goal(user_id, GoalType::Weight, now - Duration::days(2)))
            .await
            .unwrap();
        store
            .create_goal(goal(user_id, GoalType::Fitness, now))
            .await
            .unwrap();
        store
            .create_goal(goal(Uuid::new_v4(), GoalType::Fitness, now))
            .await
            .unwrap();

        let all = store.list_goals(user_id, None).await.unwrap();
        let types: Vec<GoalType> = all.iter().map(|g| g.goal_type).collect();
        assert_eq!(types, vec![GoalType::Fitness, GoalType::Weight]);

        let weight = store.list_goals(user_id, Some(GoalType::Weight)).await.unwrap();
        assert_eq!(weight.len(), 1);
    }

    #[tokio::test]
    async fn profiles_are_upserted_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let user_id = Uuid::new_v4();
        {
            let store = FileStore::open(dir.path()).await.unwrap();
            assert!(store.get_profile(user_id).await.unwrap().is_none());

            let mut profile = Profile::empty(user_id, Utc::now());
            profile.personal_info.weight = 70.0;
            store.put_profile(profile.clone()).await.unwrap();
            profile.personal_info.weight = 68.5;
            store.put_profile(profile).await.unwrap();
        }

        let reopened = FileStore::open(dir.path()).await.unwrap();
        let profile = reopened.get_profile(user_id).await.unwrap().unwrap();
        assert_eq!(profile.personal_info.weight, 68.5);
        assert!(dir.path().join("profiles.json").exists());
    }
}
