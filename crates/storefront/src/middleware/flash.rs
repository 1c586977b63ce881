//! Session-backed flash messages.
//!
//! A handler pushes a message before redirecting; the next rendered page
//! takes (and thereby clears) all pending messages.

use tower_sessions::Session;

use silk_saree_core::FlashMessage;

/// Session key holding pending flash messages.
pub const FLASH_KEY: &str = "flash";

/// Queue a message for the next rendered page.
///
/// # Errors
///
/// Returns the session store error if the session cannot be read or written.
pub async fn push(
    session: &Session,
    message: FlashMessage,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<FlashMessage> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(message);
    session.insert(FLASH_KEY, messages).await
}

/// Remove and return all pending messages.
///
/// Store failures are logged and yield no messages so a page still renders.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    match session.remove::<Vec<FlashMessage>>(FLASH_KEY).await {
        Ok(messages) => messages.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash messages");
            Vec::new()
        }
    }
}
