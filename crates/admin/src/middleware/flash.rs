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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_push_then_take_clears() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push(&session, FlashMessage::warning("Please fill all fields and upload an image."))
            .await
            .unwrap();
        push(&session, FlashMessage::success("Saree added successfully.")).await.unwrap();

        let messages = take(&session).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "Please fill all fields and upload an image.");
        assert!(take(&session).await.is_empty());
    }
}
