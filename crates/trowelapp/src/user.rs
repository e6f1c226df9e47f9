//! Current surveyor session. The core trusts `site` and `email` as-is for the
//! `site`/`created_by` fields of new finds; there is no authentication here,
//! by the product's single-device design.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrowelError};

const USER_FILE: &str = "user.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: String,
    pub site: String,
}

impl User {
    /// All four fields are required; whitespace-only input counts as missing.
    pub fn new(name: &str, email: &str, role: &str, site: &str) -> Result<Self> {
        let user = Self {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            role: role.trim().to_string(),
            site: site.trim().to_string(),
        };
        if user.name.is_empty() || user.email.is_empty() || user.role.is_empty() || user.site.is_empty()
        {
            return Err(TrowelError::Validation(
                "Name, email, role and site are all required".to_string(),
            ));
        }
        Ok(user)
    }
}

pub trait UserStore {
    /// The logged-in user, if any. Unreadable or incomplete stored state is
    /// treated as logged out, never an error.
    fn load(&self) -> Option<User>;
    fn save(&self, user: &User) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub struct FsUserStore {
    root: PathBuf,
}

impl FsUserStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn user_path(&self) -> PathBuf {
        self.root.join(USER_FILE)
    }
}

impl UserStore for FsUserStore {
    fn load(&self) -> Option<User> {
        let raw = fs::read_to_string(self.user_path()).ok()?;
        let user: User = serde_json::from_str(&raw).ok()?;
        if user.name.is_empty() || user.email.is_empty() || user.role.is_empty() || user.site.is_empty()
        {
            return None;
        }
        Some(user)
    }

    fn save(&self, user: &User) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(TrowelError::Io)?;
        }
        let contents = serde_json::to_vec_pretty(user).map_err(TrowelError::Serialization)?;
        fs::write(self.user_path(), contents).map_err(TrowelError::Io)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(self.user_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(TrowelError::Io(err)),
        }
    }
}

/// In-memory user store for tests.
#[derive(Default)]
pub struct MemUserStore {
    user: std::cell::RefCell<Option<User>>,
}

impl MemUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in(user: User) -> Self {
        Self {
            user: std::cell::RefCell::new(Some(user)),
        }
    }
}

impl UserStore for MemUserStore {
    fn load(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    fn save(&self, user: &User) -> Result<()> {
        *self.user.borrow_mut() = Some(user.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.user.borrow_mut() = None;
        Ok(())
    }
}
