//! # User Module
//!
//! The identity owning accounts, cards, bills and loans. Passwords are
//! stored as given; credential scheme design is out of scope here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Stored lowercase; unique
    pub email: String,
    pub name: String,
    pub password: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: String, email: String, name: String, password: String) -> Self {
        Self {
            id,
            email: email.to_lowercase(),
            name,
            password,
            phone: None,
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
