//! Admin shell context: API endpoint, signed-in admin and navigation
//!
//! Screens receive the context explicitly at construction.

use serde::{Deserialize, Serialize};

use crate::record::RecordId;

/// The signed-in administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl AdminUser {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
            role: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Up to two uppercase initials of the name, e.g. "JD" for "John Doe"
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

/// Up to two uppercase initials of `name`
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// One sidebar navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavRoute {
    pub href: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl NavRoute {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            badge: None,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Active when `pathname` is the route itself or nested below it
    pub fn is_active(&self, pathname: &str) -> bool {
        match pathname.strip_prefix(self.href.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Shared state of the admin shell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminContext {
    #[serde(rename = "apiUrl")]
    pub api_url: String,
    #[serde(default)]
    pub admin: Option<AdminUser>,
    #[serde(default)]
    pub routes: Vec<NavRoute>,
}

impl AdminContext {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            admin: None,
            routes: Vec::new(),
        }
    }

    pub fn with_admin(mut self, admin: AdminUser) -> Self {
        self.admin = Some(admin);
        self
    }

    pub fn route(mut self, route: NavRoute) -> Self {
        self.routes.push(route);
        self
    }

    /// Replace or clear the signed-in admin
    pub fn set_admin(&mut self, admin: Option<AdminUser>) {
        self.admin = admin;
    }

    /// First route active for `pathname`
    pub fn active_route(&self, pathname: &str) -> Option<&NavRoute> {
        self.routes.iter().find(|route| route.is_active(pathname))
    }
}
