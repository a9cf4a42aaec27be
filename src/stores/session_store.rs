use crate::core::config::SessionConfig;
use crate::core::error::SessionError;
use crate::models::session::Session;
use crate::models::user::{Role, User, UserProfile};
use crate::storage::{read_json, write_json, KeyValueStore, CURRENT_USER_KEY, IS_LOGGED_IN_KEY, USERS_KEY};
use crate::utils::auth::{hash_password, verify_password};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Account written into an empty registry so a fresh store can be signed into
#[derive(Clone, Debug)]
pub struct SeedAccount {
    pub id: u32,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for SeedAccount {
    fn default() -> Self {
        Self {
            id: 1,
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        }
    }
}

impl From<&SessionConfig> for SeedAccount {
    fn from(config: &SessionConfig) -> Self {
        Self {
            id: 1,
            username: config.seed_username.clone(),
            email: config.seed_email.clone(),
            password: config.seed_password.clone(),
        }
    }
}

/// Authentication flag, current profile and the user registry
///
/// Every mutation is written through to storage. Storage problems are logged
/// and read back as empty defaults.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    seed: SeedAccount,
    session: Mutex<Session>,
}

impl SessionStore {
    /// Create the store, restoring the session from storage
    pub fn new(storage: Arc<dyn KeyValueStore>, seed: SeedAccount) -> Self {
        let is_authenticated = read_json::<bool>(storage.as_ref(), IS_LOGGED_IN_KEY).unwrap_or(false);
        let current_user = read_json::<Option<UserProfile>>(storage.as_ref(), CURRENT_USER_KEY).flatten();

        Self {
            storage,
            seed,
            session: Mutex::new(Session {
                is_authenticated,
                current_user,
            }),
        }
    }

    pub fn session(&self) -> Session {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.lock().current_user.clone()
    }

    /// Read the registry, seeding the default account when it is empty
    pub fn users(&self) -> Vec<User> {
        let _session = self.lock();
        self.load_users()
    }

    /// Registry read behind `users`; callers hold the session lock
    fn load_users(&self) -> Vec<User> {
        let stored = match self.storage.get(USERS_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Failed to read user registry");
                return Vec::new();
            }
        };

        let users: Vec<User> = match stored {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(e) => {
                    warn!(error = %e, "User registry is unreadable, treating it as empty");
                    return Vec::new();
                }
            },
            None => Vec::new(),
        };

        if !users.is_empty() {
            return users;
        }

        match self.seed_registry() {
            Ok(seeded) => seeded,
            Err(e) => {
                warn!(error = %e, "Failed to seed default account");
                Vec::new()
            }
        }
    }

    fn seed_registry(&self) -> Result<Vec<User>, SessionError> {
        let user = User::new(
            self.seed.id,
            self.seed.username.clone(),
            self.seed.email.clone(),
            hash_password(&self.seed.password)?,
            Role::Admin,
        );

        let users = vec![user];
        write_json(self.storage.as_ref(), USERS_KEY, &users);

        info!(username = %self.seed.username, "Default account seeded");

        Ok(users)
    }

    /// Add a new account with the `user` role
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<User, SessionError> {
        // Held for the whole read-modify-write of the registry
        let _session = self.lock();

        let mut users = self.load_users();

        if users.iter().any(|u| u.username == username || u.email == email) {
            warn!(username, email, "Registration rejected, user already exists");
            return Err(SessionError::DuplicateUser);
        }

        let id = users.iter().map(|u| u.id).max().map_or(1, |max| max + 1);

        let user = User::new(
            id,
            username.to_string(),
            email.to_string(),
            hash_password(password)?,
            Role::User,
        );

        users.push(user.clone());
        write_json(self.storage.as_ref(), USERS_KEY, &users);

        info!(user_id = id, username, "User registered");

        Ok(user)
    }

    /// Sign in; on failure the session is left untouched
    pub fn login(&self, username: &str, password: &str) -> Result<UserProfile, SessionError> {
        let mut session = self.lock();

        let user = self
            .load_users()
            .into_iter()
            .find(|u| u.username == username && verify_password(password, &u.password_hash))
            .ok_or_else(|| {
                warn!(username, "Login failed");
                SessionError::InvalidCredentials
            })?;

        let profile = user.profile();
        *session = Session::signed_in(profile.clone());
        self.persist(&session);

        info!(username, role = ?profile.role, "Login succeeded");

        Ok(profile)
    }

    pub fn logout(&self) {
        let mut session = self.lock();
        let username = session.current_user.take().map(|u| u.username);
        *session = Session::default();
        self.persist(&session);

        info!(username = ?username, "User logged out");
    }

    fn persist(&self, session: &Session) {
        write_json(self.storage.as_ref(), IS_LOGGED_IN_KEY, &session.is_authenticated);
        write_json(self.storage.as_ref(), CURRENT_USER_KEY, &session.current_user);
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
