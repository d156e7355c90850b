//! Admin allow-list.
//!
//! Membership in this list is the only authorization primitive: an admin is
//! any authenticated identity whose email appears here, compared
//! case-insensitively. The list is parsed once from configuration and never
//! changes for the life of the process.

use std::collections::BTreeSet;

/// Set of administrator emails, stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminDirectory {
    emails: BTreeSet<String>,
}

impl AdminDirectory {
    /// Parse a comma-separated list such as `"owner@shop.com, Manager@Shop.com"`.
    ///
    /// Entries are trimmed and lower-cased; blank entries are dropped.
    ///
    /// ```
    /// use jewelry_orders_core::AdminDirectory;
    ///
    /// let directory = AdminDirectory::from_csv("Owner@Shop.com, ,manager@shop.com");
    /// assert_eq!(directory.len(), 2);
    /// assert!(directory.is_admin(Some("owner@shop.com")));
    /// assert!(!directory.is_admin(None));
    /// ```
    #[must_use]
    pub fn from_csv(raw: &str) -> Self {
        raw.split(',').collect()
    }

    /// Whether `email` belongs to an administrator.
    ///
    /// An absent or blank email is never an admin, and an empty directory
    /// grants nobody access.
    #[must_use]
    pub fn is_admin(&self, email: Option<&str>) -> bool {
        let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
            return false;
        };
        self.emails.contains(&email.to_lowercase())
    }

    /// Number of configured admins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// True when no admin is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    /// Configured admin emails, lower-cased and sorted.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for AdminDirectory {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let emails = iter
            .into_iter()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { emails }
    }
}
