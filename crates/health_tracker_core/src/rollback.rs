//! crates/health_tracker_core/src/rollback.rs
//!
//! Apply-then-persist with rollback.
//!
//! Mutations are applied to in-memory state first, then persisted. If either
//! the mutation is rejected or the persistence round-trip fails, the state is
//! restored to the snapshot taken before the mutation, so in-memory state never
//! silently diverges from what was actually stored.

use crate::ports::PortError;
use std::future::Future;

#[derive(Debug, thiserror::Error)]
pub enum RollbackError<E> {
    /// The mutation itself refused to apply.
    #[error("{0}")]
    Rejected(E),
    /// The mutation applied but could not be persisted; state was restored.
    #[error("persistence failed, changes rolled back: {0}")]
    Persist(PortError),
}

impl From<RollbackError<PortError>> for PortError {
    fn from(err: RollbackError<PortError>) -> Self {
        match err {
            RollbackError::Rejected(e) | RollbackError::Persist(e) => e,
        }
    }
}

/// Runs `apply` on `state`, then `persist` with a copy of the tentative state.
///
/// On success the mutated state is kept and `apply`'s output returned. On any
/// failure `state` is reset to its value before the call.
pub async fn apply_then_persist<T, R, E, A, P, Fut>(
    state: &mut T,
    apply: A,
    persist: P,
) -> Result<R, RollbackError<E>>
where
    T: Clone,
    A: FnOnce(&mut T) -> Result<R, E>,
    P: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<(), PortError>>,
{
    let snapshot = state.clone();

    let outcome = match apply(state) {
        Ok(outcome) => outcome,
        Err(e) => {
            *state = snapshot;
            return Err(RollbackError::Rejected(e));
        }
    };

    if let Err(e) = persist(state.clone()).await {
        *state = snapshot;
        return Err(RollbackError::Persist(e));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[tokio::test]
    async fn keeps_state_when_persist_succeeds() {
        let mut items = vec![1, 2];
        let len = apply_then_persist(
            &mut items,
            |items| -> Result<usize, Infallible> {
                items.push(3);
                Ok(items.len())
            },
            |tentative| async move {
                assert_eq!(tentative, vec![1, 2, 3]);
                Ok(())
            },
        )
        .await
        .unwrap();
        assert_eq!(len, 3);
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn restores_snapshot_when_persist_fails() {
        let mut items = vec![1, 2];
        let err = apply_then_persist(
            &mut items,
            |items| -> Result<(), Infallible> {
                items.clear();
                Ok(())
            },
            |_| async { Err(PortError::Unexpected("disk full".to_string())) },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RollbackError::Persist(PortError::Unexpected(_))));
        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn restores_snapshot_when_apply_rejects_after_partial_mutation() {
        let mut items = vec![1, 2];
        let mut persisted = false;
        let err = apply_then_persist(
            &mut items,
            |items| -> Result<(), &'static str> {
                items.push(99);
                Err("nope")
            },
            |_| {
                persisted = true;
                async { Ok::<(), PortError>(()) }
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RollbackError::Rejected("nope")));
        assert!(!persisted);
        assert_eq!(items, vec![1, 2]);
    }
}
