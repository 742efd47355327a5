//! Session lifecycle commands.

use smartstock_client::{ApiClient, SessionStore};

use super::CommandError;

/// Log in and persist the returned credential pair.
///
/// A rejected login leaves any previously stored session untouched.
pub async fn login(
    client: &ApiClient,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> Result<(), CommandError> {
    match client.login(username, password).await {
        Ok(credential) => {
            store.set(&credential)?;
            println!("Logged in as {username}.");
            Ok(())
        }
        Err(error) if error.is_auth_failure() => {
            Err("Login failed. Please check your credentials and try again.".into())
        }
        Err(error) => Err(error.into()),
    }
}

/// Clear the persisted session.
pub fn logout(store: &SessionStore) -> Result<(), CommandError> {
    store.clear()?;
    println!("Logged out.");
    Ok(())
}
