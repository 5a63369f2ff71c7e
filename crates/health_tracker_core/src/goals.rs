//! crates/health_tracker_core/src/goals.rs
//!
//! Goal progress and completion rules.
//!
//! Progress is driven only by `current_value / target_value`. Milestones are a
//! second, informational signal: they never gate completion, but a goal's
//! completion state is copied onto all of its milestones whenever it changes.

use crate::domain::{Goal, GoalPatch, Milestone};
use crate::metrics::round_half_up;
use std::collections::HashSet;
use uuid::Uuid;

/// Business-rule rejections raised by goal mutations.
///
/// These are distinct from storage failures: the goal is left untouched and
/// the caller is expected to show the message to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GoalError {
    #[error("cannot complete: progress incomplete ({progress}%)")]
    ProgressIncomplete { progress: u8 },
    #[error("milestone title must not be blank")]
    BlankMilestoneTitle,
    #[error("milestone {0} not found")]
    MilestoneNotFound(Uuid),
    #[error("milestone {0} appears more than once")]
    DuplicateMilestone(Uuid),
}

/// `round(current / target * 100)` clamped to `0..=100`.
///
/// A zero or non-finite target, or a non-finite current value, yields 0.
pub fn ratio_percent(current_value: f64, target_value: f64) -> u8 {
    if target_value == 0.0 || !target_value.is_finite() || !current_value.is_finite() {
        return 0;
    }
    let percent = round_half_up(current_value / target_value * 100.0);
    percent.clamp(0.0, 100.0) as u8
}

impl Goal {
    /// Completion percentage shown for the goal. A completed goal is always 100.
    pub fn progress_percent(&self) -> u8 {
        if self.completed {
            return 100;
        }
        ratio_percent(self.current_value, self.target_value)
    }

    /// Number of completed milestones and the total count.
    pub fn milestone_fraction(&self) -> (usize, usize) {
        let done = self.milestones.iter().filter(|m| m.completed).count();
        (done, self.milestones.len())
    }

    /// Sets the completion flag, enforcing the progress guard.
    ///
    /// Marking an incomplete goal as completed requires 100% progress.
    /// Un-completing is always allowed. When the flag actually changes, every
    /// milestone takes the new value. Setting the current value again is a no-op.
    pub fn set_completed(&mut self, completed: bool) -> Result<(), GoalError> {
        if completed == self.completed {
            return Ok(());
        }
        if completed {
            let progress = self.progress_percent();
            if progress < 100 {
                return Err(GoalError::ProgressIncomplete { progress });
            }
        }
        self.completed = completed;
        for milestone in &mut self.milestones {
            milestone.completed = completed;
        }
        Ok(())
    }

    /// Flips the completion flag. Returns the new value.
    pub fn toggle_completed(&mut self) -> Result<bool, GoalError> {
        let next = !self.completed;
        self.set_completed(next)?;
        Ok(next)
    }

    /// Appends a milestone with a trimmed title.
    pub fn add_milestone(&mut self, title: &str) -> Result<&Milestone, GoalError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GoalError::BlankMilestoneTitle);
        }
        self.milestones.push(Milestone {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: false,
        });
        // Just pushed, so the vec is non-empty.
        Ok(&self.milestones[self.milestones.len() - 1])
    }

    /// Removes a milestone, keeping the order of the rest.
    pub fn remove_milestone(&mut self, milestone_id: Uuid) -> Result<Milestone, GoalError> {
        let index = self
            .milestones
            .iter()
            .position(|m| m.id == milestone_id)
            .ok_or(GoalError::MilestoneNotFound(milestone_id))?;
        Ok(self.milestones.remove(index))
    }

    /// Flips a single milestone. Not tied to goal progress in either direction.
    pub fn toggle_milestone(&mut self, milestone_id: Uuid) -> Result<bool, GoalError> {
        let milestone = self
            .milestones
            .iter_mut()
            .find(|m| m.id == milestone_id)
            .ok_or(GoalError::MilestoneNotFound(milestone_id))?;
        milestone.completed = !milestone.completed;
        Ok(milestone.completed)
    }

    /// Applies a partial update atomically.
    ///
    /// A requested completion change is checked against the patched values.
    /// On rejection `self` is left exactly as it was.
    pub fn apply_patch(&mut self, patch: GoalPatch) -> Result<(), GoalError> {
        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = title;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(goal_type) = patch.goal_type {
            next.goal_type = goal_type;
        }
        if let Some(target_value) = patch.target_value {
            next.target_value = target_value;
        }
        if let Some(current_value) = patch.current_value {
            next.current_value = current_value;
        }
        if let Some(unit) = patch.unit {
            next.unit = unit;
        }
        if let Some(deadline) = patch.deadline {
            next.deadline = deadline;
        }
        if let Some(milestones) = patch.milestones {
            next.milestones = checked_milestones(milestones)?;
        }
        if let Some(completed) = patch.completed {
            next.set_completed(completed)?;
        }
        *self = next;
        Ok(())
    }
}

/// Trims every title and rejects blank titles or repeated ids.
fn checked_milestones(milestones: Vec<Milestone>) -> Result<Vec<Milestone>, GoalError> {
    let mut seen = HashSet::with_capacity(milestones.len());
    milestones
        .into_iter()
        .map(|mut milestone| {
            if !seen.insert(milestone.id) {
                return Err(GoalError::DuplicateMilestone(milestone.id));
            }
            let title = milestone.title.trim();
            if title.is_empty() {
                return Err(GoalError::BlankMilestoneTitle);
            }
            milestone.title = title.to_string();
            Ok(milestone)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GoalType;
    use chrono::{NaiveDate, Utc};

    fn goal(current_value: f64, target_value: f64) -> Goal {
        let now = Utc::now();
        Goal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Run 100km".to_string(),
            description: String::new(),
            goal_type: GoalType::Fitness,
            target_value,
            current_value,
            unit: "km".to_string(),
            deadline: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            milestones: Vec::new(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn progress_is_ratio_capped_at_100() {
        assert_eq!(goal(50.0, 100.0).progress_percent(), 50);
        assert_eq!(goal(100.0, 100.0).progress_percent(), 100);
        assert_eq!(goal(150.0, 100.0).progress_percent(), 100);
        assert_eq!(goal(1.0, 3.0).progress_percent(), 33);
        assert_eq!(goal(2.0, 3.0).progress_percent(), 67);
    }

    #[test]
    fn zero_or_invalid_target_yields_zero_progress() {
        assert_eq!(goal(50.0, 0.0).progress_percent(), 0);
        assert_eq!(goal(0.0, 0.0).progress_percent(), 0);
        assert_eq!(goal(50.0, f64::NAN).progress_percent(), 0);
        assert_eq!(goal(-10.0, 100.0).progress_percent(), 0);
    }

    #[test]
    fn completed_goal_reports_full_progress() {
        let mut g = goal(10.0, 100.0);
        g.completed = true;
        assert_eq!(g.progress_percent(), 100);
    }

    #[test]
    fn completing_incomplete_goal_is_rejected_and_state_unchanged() {
        let mut g = goal(60.0, 100.0);
        g.add_milestone("First 10km").unwrap();
        let before = g.clone();

        let err = g.toggle_completed().unwrap_err();
        assert_eq!(err, GoalError::ProgressIncomplete { progress: 60 });
        assert_eq!(err.to_string(), "cannot complete: progress incomplete (60%)");
        assert_eq!(g, before);
    }

    #[test]
    fn completing_full_goal_cascades_to_milestones() {
        let mut g = goal(100.0, 100.0);
        g.add_milestone("a").unwrap();
        g.add_milestone("b").unwrap();

        assert!(g.toggle_completed().unwrap());
        assert!(g.completed);
        assert!(g.milestones.iter().all(|m| m.completed));
        assert_eq!(g.milestone_fraction(), (2, 2));
    }

    #[test]
    fn uncompleting_is_always_allowed_and_cascades() {
        let mut g = goal(100.0, 100.0);
        g.add_milestone("a").unwrap();
        g.toggle_completed().unwrap();

        // Progress drops below 100 after completion; un-completing still works.
        g.current_value = 20.0;
        assert!(!g.toggle_completed().unwrap());
        assert!(!g.completed);
        assert!(g.milestones.iter().all(|m| !m.completed));
        assert_eq!(g.progress_percent(), 20);
    }

    #[test]
    fn milestones_never_gate_completion() {
        let mut g = goal(10.0, 100.0);
        let id = g.add_milestone("only one").unwrap().id;
        g.toggle_milestone(id).unwrap();
        assert_eq!(g.milestone_fraction(), (1, 1));
        assert!(g.toggle_completed().is_err());
    }

    #[test]
    fn milestone_add_remove_toggle() {
        let mut g = goal(0.0, 10.0);
        assert_eq!(g.add_milestone("   "), Err(GoalError::BlankMilestoneTitle));

        let a = g.add_milestone("  first ").unwrap().id;
        let b = g.add_milestone("second").unwrap().id;
        let c = g.add_milestone("third").unwrap().id;
        assert_eq!(g.milestones[0].title, "first");

        assert!(g.toggle_milestone(b).unwrap());
        assert!(!g.toggle_milestone(b).unwrap());

        let removed = g.remove_milestone(b).unwrap();
        assert_eq!(removed.title, "second");
        let order: Vec<Uuid> = g.milestones.iter().map(|m| m.id).collect();
        assert_eq!(order, vec![a, c]);

        let missing = Uuid::new_v4();
        assert_eq!(g.remove_milestone(missing), Err(GoalError::MilestoneNotFound(missing)));
        assert_eq!(g.toggle_milestone(missing), Err(GoalError::MilestoneNotFound(missing)));
    }

    #[test]
    fn patch_checks_completion_against_patched_values() {
        let mut g = goal(40.0, 100.0);
        g.apply_patch(GoalPatch {
            current_value: Some(100.0),
            completed: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert!(g.completed);
        assert_eq!(g.current_value, 100.0);
    }

    #[test]
    fn rejected_patch_leaves_goal_untouched() {
        let mut g = goal(40.0, 100.0);
        let before = g.clone();
        let err = g
            .apply_patch(GoalPatch {
                title: Some("renamed".to_string()),
                current_value: Some(90.0),
                completed: Some(true),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, GoalError::ProgressIncomplete { progress: 90 });
        assert_eq!(g, before);
    }

    #[test]
    fn patched_milestones_are_trimmed() {
        let mut g = goal(0.0, 10.0);
        let id = Uuid::new_v4();
        g.apply_patch(GoalPatch {
            milestones: Some(vec![Milestone {
                id,
                title: "  halfway ".to_string(),
                completed: true,
            }]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(g.milestones.len(), 1);
        assert_eq!(g.milestones[0].title, "halfway");
        assert!(g.milestones[0].completed);
    }

    #[test]
    fn patched_milestones_reject_blank_titles_and_repeated_ids() {
        let mut g = goal(0.0, 10.0);
        g.add_milestone("kept").unwrap();
        let before = g.clone();

        let blank = GoalPatch {
            title: Some("renamed".to_string()),
            milestones: Some(vec![Milestone {
                id: Uuid::new_v4(),
                title: "   ".to_string(),
                completed: false,
            }]),
            ..Default::default()
        };
        assert_eq!(g.apply_patch(blank), Err(GoalError::BlankMilestoneTitle));
        assert_eq!(g, before);

        let id = Uuid::new_v4();
        let twice = |title: &str| Milestone {
            id,
            title: title.to_string(),
            completed: false,
        };
        let repeated = GoalPatch {
            milestones: Some(vec![twice("a"), twice("b")]),
            ..Default::default()
        };
        assert_eq!(g.apply_patch(repeated), Err(GoalError::DuplicateMilestone(id)));
        assert_eq!(g, before);
    }

    #[test]
    fn patch_without_completion_keeps_completed_goal_completed() {
        let mut g = goal(100.0, 100.0);
        g.toggle_completed().unwrap();
        g.apply_patch(GoalPatch {
            current_value: Some(50.0),
            ..Default::default()
        })
        .unwrap();
        assert!(g.completed);
        assert_eq!(g.progress_percent(), 100);
    }
}
