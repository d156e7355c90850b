//! Customer accounts as seen by the admin panel.
//!
//! Admins create orders for customers by email. The identity provider has no
//! lookup-by-email call, so the directory pages through all users. When no
//! account exists one is provisioned on the spot with a throwaway password;
//! the customer gets in later through the provider's password reset.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use rand::{Rng, distr::Alphanumeric};
use secrecy::SecretString;

use jewelry_orders_core::{Email, UserId};

use crate::error::AppError;
use crate::identity::{Identity, IdentityError, IdentityProvider};

/// Users requested per page while searching.
pub const USER_PAGE_SIZE: u32 = 1000;

/// Pages searched before giving up.
pub const MAX_USER_PAGES: u32 = 100;

/// Random characters in a temporary password.
const TEMP_PASSWORD_LEN: usize = 24;

/// Appended so the password satisfies provider complexity rules.
const TEMP_PASSWORD_SUFFIX: &str = "A1!";

/// Customer lookups and provisioning over an identity provider.
pub struct CustomerDirectory<'a> {
    provider: &'a dyn IdentityProvider,
}

impl<'a> CustomerDirectory<'a> {
    #[must_use]
    pub const fn new(provider: &'a dyn IdentityProvider) -> Self {
        Self { provider }
    }

    /// Find the account whose email matches, ignoring case.
    ///
    /// Stops at the first match, at an empty page, or at a page shorter than
    /// [`USER_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`IdentityError::SearchLimit`] after
    /// [`MAX_USER_PAGES`] full pages without reaching the end.
    #[tracing::instrument(skip(self, email), fields(email = %email))]
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<Identity>, IdentityError> {
        for page in 1..=MAX_USER_PAGES {
            let users = self.provider.list_users(page, USER_PAGE_SIZE).await?;

            if let Some(user) = users
                .iter()
                .find(|u| u.email.as_deref().is_some_and(|e| email.matches(e)))
            {
                tracing::debug!(page, user_id = %user.id, "Customer found");
                return Ok(Some(user.clone()));
            }

            if users.len() < USER_PAGE_SIZE as usize {
                return Ok(None);
            }
        }

        Err(IdentityError::SearchLimit {
            pages: MAX_USER_PAGES,
        })
    }

    /// Resolve `email` to an account, creating a confirmed one if needed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::IdentityLookup` if the search fails and
    /// `AppError::IdentityCreate` if provisioning fails.
    pub async fn find_or_create(&self, email: &Email) -> Result<Identity, AppError> {
        if let Some(existing) = self
            .find_by_email(email)
            .await
            .map_err(AppError::IdentityLookup)?
        {
            return Ok(existing);
        }

        let password = temporary_password();
        let created = self
            .provider
            .create_user(email.as_str(), &password)
            .await
            .map_err(AppError::IdentityCreate)?;

        tracing::info!(user_id = %created.id, "Provisioned customer account");
        Ok(created)
    }

    /// Email of a single user; `None` if the lookup fails.
    pub async fn email_for(&self, id: UserId) -> Option<String> {
        match self.provider.get_user(id).await {
            Ok(identity) => identity.email,
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Customer email lookup failed");
                None
            }
        }
    }

    /// Emails for many users, looked up concurrently, one call per distinct id.
    pub async fn emails_for(
        &self,
        ids: impl IntoIterator<Item = UserId>,
    ) -> HashMap<UserId, Option<String>> {
        let distinct: Vec<UserId> = ids
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let emails = join_all(distinct.iter().map(|id| self.email_for(*id))).await;

        distinct.into_iter().zip(emails).collect()
    }
}

/// Random password for an account nobody will log into with it.
#[must_use]
pub fn temporary_password() -> SecretString {
    let random: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TEMP_PASSWORD_LEN)
        .map(char::from)
        .collect();
    SecretString::from(format!("{random}{TEMP_PASSWORD_SUFFIX}"))
}
