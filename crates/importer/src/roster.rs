use storage::UserStore;
use storage::dto::user::CreateUserRequest;
use storage::models::User;
use tracing::{debug, info};

use crate::error::{ImporterError, Result};
use crate::retry::{RetryPolicy, retry_transient};
use crate::traits::StandingsProvider;

/// Start tracking a handle once the provider confirms it exists.
///
/// Nothing is written when the provider does not know the handle or cannot
/// be reached.
pub async fn register_user<S, P>(
    store: &S,
    provider: &P,
    req: &CreateUserRequest,
    retry: RetryPolicy,
) -> Result<User>
where
    S: UserStore + ?Sized,
    P: StandingsProvider + ?Sized,
{
    let handle = req.handle.as_str();
    let exists = retry_transient("user.info", retry, || provider.lookup_user(handle)).await?;
    if !exists {
        debug!(provider = provider.name(), handle, "Handle not found");
        return Err(ImporterError::UnknownHandle(req.handle.clone()));
    }

    let user = store.create_user(req).await?;
    info!(handle = %user.handle, user_id = %user.user_id, "User added");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;
    use storage::MemoryStore;

    #[tokio::test]
    async fn test_unknown_handle_is_not_stored() {
        let store = MemoryStore::new();
        let provider = FakeProvider::new().with_handles(&["tourist"]);

        let err = register_user(
            &store,
            &provider,
            &CreateUserRequest::new("nobody_here", None),
            RetryPolicy::none(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ImporterError::UnknownHandle(ref handle) if handle == "nobody_here"));
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_known_handle_is_stored() {
        let store = MemoryStore::new();
        let provider = FakeProvider::new().with_handles(&["tourist", "petr"]);

        let user = register_user(
            &store,
            &provider,
            &CreateUserRequest::new("tourist", Some("Gennady".to_string())),
            RetryPolicy::none(),
        )
        .await
        .unwrap();

        assert_eq!(user.label(), "Gennady");
        assert_eq!(store.find_user_by_handle("tourist").await.unwrap().user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_duplicate_handle_surfaces_store_error() {
        let store = MemoryStore::new();
        let provider = FakeProvider::new().with_handles(&["tourist"]);
        let req = CreateUserRequest::new("tourist", None);

        register_user(&store, &provider, &req, RetryPolicy::none())
            .await
            .unwrap();
        let err = register_user(&store, &provider, &req, RetryPolicy::none())
            .await
            .unwrap_err();

        assert!(matches!(err, ImporterError::StorageError(ref e) if e.is_unique_violation()));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }
}
