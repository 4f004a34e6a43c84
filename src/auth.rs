//! Credential lookup.
//!
//! Admins, plain users and employees live in one lookup table. Credentials are
//! compared as stored, in table order: admins, then users, then employees.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::employee::Employee;
use crate::error::{Error, FieldErrors, Result};
use crate::fields::{FormField, Role};
use crate::store::{Store, ADMIN_KEY, EMPLOYEES_KEY, USERS_KEY};

/// A login-only account record (`admin` and `users` keys).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password: String,
}

impl Account {
    pub fn new(id: &str, email: &str, password: &str) -> Self {
        Account {
            id: id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// The authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// First name, for employees only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Name to greet the actor with.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

struct Entry {
    id: String,
    email: String,
    password: String,
    role: Role,
    name: Option<String>,
}

/// One table of every account that can log in.
pub struct Directory {
    entries: Vec<Entry>,
}

impl Directory {
    /// Build the table from the `admin`, `users` and `employees` records.
    pub fn load(store: &Store) -> Result<Self> {
        let admins: Vec<Account> = store.get_json(ADMIN_KEY)?.unwrap_or_default();
        let users: Vec<Account> = store.get_json(USERS_KEY)?.unwrap_or_default();
        let employees: Vec<Employee> = store.get_json(EMPLOYEES_KEY)?.unwrap_or_default();
        Ok(Self::from_records(&admins, &users, &employees))
    }

    pub fn from_records(admins: &[Account], users: &[Account], employees: &[Employee]) -> Self {
        let accounts = |list: &[Account], role: Role| {
            list.iter()
                .map(|a| Entry {
                    id: a.id.clone(),
                    email: a.email.clone(),
                    password: a.password.clone(),
                    role,
                    name: None,
                })
                .collect::<Vec<_>>()
        };

        let mut entries = accounts(admins, Role::Admin);
        entries.extend(accounts(users, Role::User));
        entries.extend(employees.iter().map(|e| Entry {
            id: e.id.clone(),
            email: e.email.clone(),
            password: e.password.clone(),
            role: Role::Employee,
            name: Some(e.first_name.clone()),
        }));
        Directory { entries }
    }

    /// Check credentials and return the matching identity.
    ///
    /// Blank input is a validation error. An unknown email and a wrong password
    /// both fail with `InvalidCredentials`.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let mut errors = FieldErrors::new();
        if email.trim().is_empty() {
            errors.add(FormField::Email, "Please fill in all fields");
        }
        if password.is_empty() {
            errors.add(FormField::Password, "Please fill in all fields");
        }
        errors.into_result()?;

        let email = email.trim();
        match self
            .entries
            .iter()
            .find(|e| e.email == email && e.password == password)
        {
            Some(entry) => {
                info!(id = %entry.id, role = entry.role.label(), "login succeeded");
                Ok(Identity {
                    id: entry.id.clone(),
                    email: entry.email.clone(),
                    role: entry.role,
                    name: entry.name.clone(),
                })
            }
            None => {
                warn!(email, "login failed");
                Err(Error::InvalidCredentials)
            }
        }
    }
}
