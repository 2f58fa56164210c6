//! Refresh-on-401 retry
//!
//! A call rejected with 401 triggers at most one credential refresh and one
//! retry. Every other failure, 403 included, is returned unchanged.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::auth::AuthSession;
use super::errors::ApiError;
use super::transport::{EndpointRequest, HttpTransport};

/// Run `op`, refreshing the session and retrying once if it fails with 401.
///
/// The access token is noted before the first attempt and handed to the
/// refresh, so concurrent callers rejected with the same token share one
/// refresh. A failed refresh signs the session out and returns the original
/// 401. The retried result is returned as-is, even another 401.
///
/// # Errors
/// The error of the last attempt, or the original 401 when the refresh fails.
pub async fn with_oauth_refresh<S, T, F, Fut>(
    session: &S,
    attempt_refresh: bool,
    mut op: F,
) -> Result<T, ApiError>
where
    S: AuthSession + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let observed = session.access_token().await;

    let error = match op().await {
        Ok(value) => return Ok(value),
        Err(error) => error,
    };

    if !error.is_unauthorized() {
        return Err(error);
    }
    if !attempt_refresh {
        debug!("401 on a call that does not refresh");
        return Err(error);
    }

    info!("Request rejected with 401, refreshing credential");
    session.refresh(observed.as_deref(), Some(error)).await?;

    op().await
}

/// [`HttpTransport`] decorator applying [`with_oauth_refresh`] to each request
pub struct RetryingTransport<T: HttpTransport> {
    inner: T,
    auth: Arc<dyn AuthSession>,
}

impl<T: HttpTransport> RetryingTransport<T> {
    pub fn new(inner: T, auth: Arc<dyn AuthSession>) -> Self {
        Self { inner, auth }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RetryingTransport<T> {
    async fn execute(&self, request: &EndpointRequest) -> Result<Option<Value>, ApiError> {
        with_oauth_refresh(self.auth.as_ref(), request.attempt_refresh, || {
            self.inner.execute(request)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Session whose refresh outcome is fixed up front
    struct CountingSession {
        token: Mutex<String>,
        refresh_ok: bool,
        refreshes: AtomicUsize,
        stale_seen: Mutex<Option<String>>,
    }

    impl CountingSession {
        fn new(refresh_ok: bool) -> Self {
            Self {
                token: Mutex::new("a1".to_string()),
                refresh_ok,
                refreshes: AtomicUsize::new(0),
                stale_seen: Mutex::new(None),
            }
        }

        fn refreshes(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AuthSession for CountingSession {
        async fn access_token(&self) -> Option<String> {
            Some(self.token.lock().unwrap().clone())
        }

        async fn refresh(
            &self,
            stale: Option<&str>,
            passthrough: Option<ApiError>,
        ) -> Result<(), ApiError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            *self.stale_seen.lock().unwrap() = stale.map(str::to_string);
            if self.refresh_ok {
                *self.token.lock().unwrap() = "a2".to_string();
                Ok(())
            } else {
                Err(passthrough.unwrap_or(ApiError::NotLoggedIn))
            }
        }

        async fn sign_in(&self, _: &str, _: &str, _: Option<&str>) -> Result<(), ApiError> {
            Ok(())
        }

        async fn sign_out_with(&self, error: Option<ApiError>) -> Result<(), ApiError> {
            error.map_or(Ok(()), Err)
        }

        async fn is_signed_in(&self) -> bool {
            true
        }
    }

    fn http(status: u16) -> ApiError {
        ApiError::Http { status, message: format!("status {status}") }
    }

    /// Each call pops the next scripted outcome.
    fn script(
        outcomes: Vec<Result<u32, ApiError>>,
    ) -> (impl FnMut() -> std::future::Ready<Result<u32, ApiError>>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let outcomes = Mutex::new(outcomes.into_iter());
        let op = move || {
            counter.fetch_add(1, Ordering::SeqCst);
            let next = outcomes.lock().unwrap().next().expect("scripted outcome");
            std::future::ready(next)
        };
        (op, calls)
    }

    #[tokio::test]
    async fn success_is_returned_without_refresh() {
        let session = CountingSession::new(true);
        let (op, calls) = script(vec![Ok(7)]);

        assert_eq!(with_oauth_refresh(&session, true, op).await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.refreshes(), 0);
    }

    #[tokio::test]
    async fn server_errors_and_403_do_not_refresh() {
        for status in [403, 500, 503] {
            let session = CountingSession::new(true);
            let (op, calls) = script(vec![Err(http(status))]);

            assert_eq!(with_oauth_refresh(&session, true, op).await, Err(http(status)));
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert_eq!(session.refreshes(), 0);
        }
    }

    #[tokio::test]
    async fn unauthorized_refreshes_once_and_retries() {
        let session = CountingSession::new(true);
        let (op, calls) = script(vec![Err(http(401)), Ok(42)]);

        assert_eq!(with_oauth_refresh(&session, true, op).await, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.refreshes(), 1);
        assert_eq!(session.stale_seen.lock().unwrap().as_deref(), Some("a1"));
    }

    #[tokio::test]
    async fn unauthorized_without_refresh_flag_is_surfaced() {
        let session = CountingSession::new(true);
        let (op, calls) = script(vec![Err(http(401))]);

        assert_eq!(with_oauth_refresh(&session, false, op).await, Err(http(401)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.refreshes(), 0);
    }

    #[tokio::test]
    async fn second_unauthorized_is_returned_as_is() {
        let session = CountingSession::new(true);
        let (op, calls) = script(vec![Err(http(401)), Err(http(401))]);

        assert_eq!(with_oauth_refresh(&session, true, op).await, Err(http(401)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.refreshes(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_original_error_without_retry() {
        let session = CountingSession::new(false);
        let (op, calls) = script(vec![Err(http(401))]);

        assert_eq!(with_oauth_refresh(&session, true, op).await, Err(http(401)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.refreshes(), 1);
    }
}
