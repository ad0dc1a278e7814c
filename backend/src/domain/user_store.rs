//! In-memory user store implementing the [`UserDirectory`] port.
//!
//! Records live in a single insertion-ordered list owned by the store for its
//! whole lifetime. The list and the identifier counter sit behind one mutex,
//! so every operation is atomic with respect to every other; no lock is held
//! across an await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{USER_DELETED_MESSAGE, UserDirectory, UserDirectoryError};
use crate::domain::{MinimumAge, User, UserDraft, UserId, UserPatch};

#[derive(Debug)]
struct StoreState {
    users: Vec<User>,
    next_id: u64,
}

impl StoreState {
    fn position(&self, id: UserId) -> Result<usize, UserDirectoryError> {
        self.users
            .iter()
            .position(|user| user.id() == id)
            .ok_or_else(|| UserDirectoryError::not_found(id))
    }
}

/// Mutex-guarded in-memory user store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use userbase::domain::{MinimumAge, UserStore};
///
/// let store = UserStore::new(MinimumAge::new(18), Arc::new(DefaultClock));
/// assert_eq!(store.minimum_age().years(), 18);
/// ```
pub struct UserStore {
    state: Mutex<StoreState>,
    minimum_age: MinimumAge,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    /// Create an empty store; the first record receives identifier 1.
    pub fn new(minimum_age: MinimumAge, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                users: Vec::new(),
                next_id: 1,
            }),
            minimum_age,
            clock,
        }
    }

    /// Threshold applied by the age rule.
    pub fn minimum_age(&self) -> MinimumAge {
        self.minimum_age
    }

    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    fn check_age(&self, birth_date: NaiveDate, today: NaiveDate) -> Result<(), UserDirectoryError> {
        if self.minimum_age.permits(birth_date, today) {
            Ok(())
        } else {
            Err(UserDirectoryError::invalid_age(self.minimum_age))
        }
    }

    /// Full-field validation followed by the age rule.
    fn admit(
        &self,
        draft: UserDraft,
        id: UserId,
        today: NaiveDate,
    ) -> Result<User, UserDirectoryError> {
        let user = draft
            .into_user(id, today)
            .map_err(UserDirectoryError::validation_failed)?;
        self.check_age(user.birth_date(), today)?;
        Ok(user)
    }
}

#[async_trait]
impl UserDirectory for UserStore {
    async fn list(&self) -> Vec<User> {
        let state = self.lock_state();
        debug!(count = state.users.len(), "listing users");
        state.users.clone()
    }

    async fn get(&self, id: UserId) -> Result<User, UserDirectoryError> {
        let state = self.lock_state();
        let index = state.position(id)?;
        debug!(user_id = %id, "fetched user");
        Ok(state.users[index].clone())
    }

    async fn create(&self, draft: UserDraft) -> Result<User, UserDirectoryError> {
        info!("creating new user");
        let today = self.today();
        let mut state = self.lock_state();
        let id = UserId::new(state.next_id);
        let user = self.admit(draft, id, today)?;
        // Only advance the counter once the record is accepted.
        state.next_id += 1;
        state.users.push(user.clone());
        info!(user_id = %id, "user created");
        Ok(user)
    }

    async fn update(&self, id: UserId, draft: UserDraft) -> Result<User, UserDirectoryError> {
        info!(user_id = %id, "updating user");
        let today = self.today();
        let user = draft
            .into_user(id, today)
            .map_err(UserDirectoryError::validation_failed)?;

        let mut state = self.lock_state();
        let index = state.position(id)?;
        self.check_age(user.birth_date(), today)?;
        state.users[index] = user.clone();
        info!(user_id = %id, "user updated");
        Ok(user)
    }

    async fn patch(&self, id: UserId, patch: UserPatch) -> Result<User, UserDirectoryError> {
        info!(user_id = %id, "patching user");
        let today = self.today();
        let mut state = self.lock_state();
        let index = state.position(id)?;
        if let Some(birth_date) = patch.birth_date {
            self.check_age(birth_date, today)?;
        }

        let candidate = patch.apply_to(&state.users[index]);
        let user = candidate
            .into_user(id, today)
            .map_err(UserDirectoryError::validation_failed)?;
        state.users[index] = user.clone();
        info!(user_id = %id, "user patched");
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<String, UserDirectoryError> {
        info!(user_id = %id, "deleting user");
        let mut state = self.lock_state();
        let index = state.position(id)?;
        state.users.remove(index);
        info!(user_id = %id, "user deleted");
        Ok(USER_DELETED_MESSAGE.to_owned())
    }

    async fn search_by_birth_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<User>, UserDirectoryError> {
        info!(%from, %to, "searching users by birth date");
        if from > to {
            return Err(UserDirectoryError::invalid_range(from, to));
        }

        let state = self.lock_state();
        let mut matches: Vec<User> = state
            .users
            .iter()
            .filter(|user| user.birth_date() > from && user.birth_date() < to)
            .cloned()
            .collect();
        matches.sort_by_key(User::birth_date);
        Ok(matches)
    }
}
