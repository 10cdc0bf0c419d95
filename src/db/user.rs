use crate::{error::AppError, models::user::User};
use sled::Db;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

pub struct UserDb {
    tree: sled::Tree,
    /// lowercase username -> user id
    usernames: sled::Tree,
    /// lowercase email -> user id
    emails: sled::Tree,
}

impl UserDb {
    pub fn new(db: Arc<Db>) -> Result<Self, AppError> {
        Ok(Self {
            tree: db.open_tree("users")?,
            usernames: db.open_tree("user_usernames")?,
            emails: db.open_tree("user_emails")?,
        })
    }

    /// Insert a new user, claiming the username and email index entries
    /// first. The index inserts are compare-and-swap, so two concurrent
    /// registrations for the same identity cannot both succeed.
    pub fn create(&self, user: &User) -> Result<(), AppError> {
        let username_key = user.username.to_lowercase();
        let email_key = user.email.to_lowercase();

        if self
            .usernames
            .compare_and_swap(
                username_key.as_bytes(),
                None as Option<&[u8]>,
                Some(user.id.as_bytes()),
            )?
            .is_err()
        {
            return Err(AppError::Conflict("User already registered".to_string()));
        }

        if self
            .emails
            .compare_and_swap(
                email_key.as_bytes(),
                None as Option<&[u8]>,
                Some(user.id.as_bytes()),
            )?
            .is_err()
        {
            // Release the username claim before reporting the conflict.
            self.usernames.remove(username_key.as_bytes())?;
            return Err(AppError::Conflict("User already registered".to_string()));
        }

        let value = bincode::serialize(user)?;
        self.tree.insert(user.id.as_bytes(), value)?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tree
            .get(id.as_bytes())?
            .map(|v| bincode::deserialize(&v))
            .transpose()?)
    }

    pub fn get_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.get_via_index(&self.usernames, &username.to_lowercase())
    }

    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.get_via_index(&self.emails, &email.to_lowercase())
    }

    fn get_via_index(&self, index: &sled::Tree, key: &str) -> Result<Option<User>, AppError> {
        let Some(id) = index.get(key.as_bytes())? else {
            return Ok(None);
        };
        let id = String::from_utf8_lossy(&id).to_string();
        self.get(&id)
    }

    /// Replace the stored refresh-session token. `None` clears it.
    pub fn set_refresh_token(
        &self,
        id: &str,
        token: Option<String>,
    ) -> Result<Option<User>, AppError> {
        let result = self.tree.update_and_fetch(id.as_bytes(), move |old| {
            let token = token.clone();
            old.and_then(|bytes| {
                let mut user: User = bincode::deserialize(bytes).ok()?;
                user.refresh_token = token;
                user.updated_at = chrono::Utc::now();
                bincode::serialize(&user).ok()
            })
        })?;

        match result {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Batch-resolve users by id, deduplicating the input. Missing ids are
    /// silently absent from the result.
    pub fn get_many(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> Result<HashMap<String, User>, AppError> {
        let unique: HashSet<String> = ids.into_iter().collect();
        let mut users = HashMap::with_capacity(unique.len());
        for id in unique {
            if let Some(user) = self.get(&id)? {
                users.insert(id, user);
            }
        }
        Ok(users)
    }
}
