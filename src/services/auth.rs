// src/services/auth.rs
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 4;

/// Public view of an account. Never carries the password.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
struct Account {
    user: User,
    // Plaintext, in memory only. Hashing is out of scope for this prototype.
    password: String,
}

#[derive(Default)]
struct Store {
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, String>,
}

/// Registration, login and session lookup. Held in memory; restarting the
/// process forgets every account.
#[derive(Clone, Default)]
pub struct AuthService {
    inner: Arc<RwLock<Store>>,
}

impl Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account and log it in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Session, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if !is_valid_email(email) {
            return Err(AppError::Validation("Please enter a valid email address".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }

        let mut store = self.inner.write().await;
        if store.accounts.contains_key(email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let account = Account { user: user.clone(), password: password.to_string() };
        store.accounts.insert(email.to_string(), account);
        info!(user_id = %user.id, "account registered");

        Ok(open_session(&mut store, user))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        if !is_valid_email(email) {
            return Err(AppError::Validation("Please enter a valid email address".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }

        let mut store = self.inner.write().await;
        let user = match store.accounts.get(email) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AppError::Unauthorized("Invalid email or password".to_string())),
        };
        info!(user_id = %user.id, "login");

        Ok(open_session(&mut store, user))
    }

    /// Drop a session. Returns false if the token was unknown.
    pub async fn logout(&self, token: &str) -> bool {
        self.inner.write().await.sessions.remove(token).is_some()
    }

    pub async fn current_session(&self, token: &str) -> Option<User> {
        let store = self.inner.read().await;
        let email = store.sessions.get(token)?;
        store.accounts.get(email).map(|a| a.user.clone())
    }
}

fn open_session(store: &mut Store, user: User) -> Session {
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user.email.clone());
    Session { token, user }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
