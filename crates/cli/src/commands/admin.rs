//! Admin allow-list inspection.
//!
//! Admin status is configuration, not data: these commands read
//! the allow-list exactly as the server does and report on it.

use jewelry_orders_core::{AdminDirectory, Email};
use jewelry_orders_server::config::admins_from_lookup;

use super::CommandError;

fn directory() -> AdminDirectory {
    admins_from_lookup(&|key| std::env::var(key).ok())
}

/// Report whether `email` is on the allow-list.
///
/// # Errors
///
/// Returns `CommandError::InvalidEmail` if `email` is not an email address.
pub fn check(email: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidEmail(e.to_string()))?;
    let is_admin = directory().is_admin(Some(email.as_str()));

    #[allow(clippy::print_stdout)]
    {
        if is_admin {
            println!("{email} is an admin");
        } else {
            println!("{email} is NOT an admin");
        }
    }
    Ok(())
}

/// Print every configured admin email.
pub fn list() {
    let directory = directory();
    if directory.is_empty() {
        tracing::warn!("Admin allow-list is empty; nobody can use the admin API");
        return;
    }

    #[allow(clippy::print_stdout)]
    for email in directory.emails() {
        println!("{email}");
    }
}
