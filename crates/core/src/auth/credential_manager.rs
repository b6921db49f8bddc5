//! Credential manager with lazy acquisition and on-demand refresh
//!
//! Owns the session's only mutable state: the cached identity assertion
//! and the cached access credential.
//!
//! `get_token` resolves in this order:
//! 1. valid cached credential: returned with no network call
//! 2. no identity assertion: identity exchange (stage 1)
//! 3. no credential: access exchange (stage 2)
//! 4. stale credential and a refresh token: refresh exchange
//! 5. stale credential, no refresh token: access exchange again
//!
//! A rejected access or refresh exchange clears the cache, so the next call
//! starts again from stage 1. Timeouts leave the cache as it was.
//!
//! There is no background refresh; expiry is judged against the clock at
//! the moment of use.

use std::sync::Arc;

use async_trait::async_trait;
use riskscreen_common::time::{Clock, SystemClock};
use riskscreen_domain::{
    AccessGrant, Credential, IdentityAssertion, IdentityGrant, Result, ScreeningConfig,
};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::exchange::{access_request, exchange, identity_request, into_identity, refresh_request};
use crate::ports::{RequestPerformer, TokenProvider};

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Arc<IdentityAssertion>>,
    credential: Option<Arc<Credential>>,
}

/// Produces valid bearer tokens for one account
///
/// Cached values are immutable and replaced wholesale. Reads of a valid
/// credential take a shared lock; acquisition takes the exclusive lock and
/// re-checks, so concurrent callers that all find a stale credential
/// trigger one exchange between them.
pub struct CredentialManager {
    config: Arc<ScreeningConfig>,
    performer: Arc<dyn RequestPerformer>,
    clock: Arc<dyn Clock>,
    state: RwLock<SessionState>,
}

impl CredentialManager {
    /// Create a credential manager using the system clock
    pub fn new(config: Arc<ScreeningConfig>, performer: Arc<dyn RequestPerformer>) -> Self {
        Self::with_clock(config, performer, Arc::new(SystemClock))
    }

    /// Create a credential manager with an injected clock
    pub fn with_clock(
        config: Arc<ScreeningConfig>,
        performer: Arc<dyn RequestPerformer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { config, performer, clock, state: RwLock::new(SessionState::default()) }
    }

    /// Return the access token, acquiring or refreshing it first if needed
    ///
    /// # Errors
    /// - `ScreeningError::Authentication` if an exchange is rejected, the
    ///   auth endpoint is unreachable, or its response is malformed
    /// - `ScreeningError::Timeout` if the auth endpoint times out
    #[instrument(skip(self), fields(client_id = %self.config.client_id))]
    pub async fn get_token(&self) -> Result<String> {
        {
            let state = self.state.read().await;
            if let Some(credential) = valid(state.credential.as_ref(), self.clock.now()) {
                return Ok(credential.access_token().to_string());
            }
        }

        let mut state = self.state.write().await;

        // Another caller may have finished an exchange while we waited.
        if let Some(credential) = valid(state.credential.as_ref(), self.clock.now()) {
            debug!("credential acquired by a concurrent caller");
            return Ok(credential.access_token().to_string());
        }

        let identity = match state.identity.clone() {
            Some(identity) => identity,
            None => {
                debug!("no identity assertion cached; performing identity exchange");
                let grant: IdentityGrant =
                    exchange(self.performer.as_ref(), identity_request(&self.config)).await?;
                let identity = Arc::new(into_identity(grant));
                state.identity = Some(Arc::clone(&identity));
                identity
            }
        };

        let refresh_token = identity.refresh_token().filter(|_| state.credential.is_some());

        let credential = match refresh_token {
            Some(refresh_token) => {
                debug!("credential stale; performing refresh exchange");
                let refreshed = exchange::<AccessGrant>(
                    self.performer.as_ref(),
                    refresh_request(&self.config, refresh_token),
                )
                .await;

                let grant = match refreshed {
                    Ok(grant) => grant,
                    Err(err) => {
                        // A rejected refresh token is dead; start over next time.
                        if !err.is_timeout() {
                            warn!(error = %err, "refresh failed; session will log in again");
                            *state = SessionState::default();
                        }
                        return Err(err);
                    }
                };

                if let Some(rotated) = grant.refresh_token.as_deref() {
                    debug!("refresh token rotated");
                    state.identity = Some(Arc::new(identity.with_refresh_token(rotated)));
                }

                let credential = self.issue(grant);
                info!(expires_at = %credential.expires_at(), "access token refreshed");
                credential
            }
            None => {
                debug!("performing access exchange");
                let exchanged = exchange::<AccessGrant>(
                    self.performer.as_ref(),
                    access_request(&self.config, &identity),
                )
                .await;

                let grant = match exchanged {
                    Ok(grant) => grant,
                    Err(err) => {
                        // The identity token may be dead; log in again next time.
                        if !err.is_timeout() {
                            warn!(
                                error = %err,
                                "access exchange failed; session will log in again"
                            );
                            *state = SessionState::default();
                        }
                        return Err(err);
                    }
                };

                let credential = self.issue(grant);
                info!(expires_at = %credential.expires_at(), "access token acquired");
                credential
            }
        };

        let token = credential.access_token().to_string();
        state.credential = Some(credential);
        Ok(token)
    }

    /// Full reset: drop the identity assertion and the credential
    ///
    /// The next [`get_token`](Self::get_token) repeats both stages.
    pub async fn invalidate(&self) {
        *self.state.write().await = SessionState::default();
        info!(client_id = %self.config.client_id, "authentication reset");
    }

    /// Drop only the access credential, keeping the identity assertion
    ///
    /// The next [`get_token`](Self::get_token) repeats stage 2 only.
    pub async fn discard_credential(&self) {
        self.state.write().await.credential = None;
        debug!(client_id = %self.config.client_id, "access credential discarded");
    }

    /// Cached credential, if any, without touching the network
    ///
    /// May be stale; check [`Credential::is_valid_at`].
    pub async fn current_credential(&self) -> Option<Arc<Credential>> {
        self.state.read().await.credential.clone()
    }

    /// Whether an identity assertion is cached
    pub async fn has_identity(&self) -> bool {
        self.state.read().await.identity.is_some()
    }

    fn issue(&self, grant: AccessGrant) -> Arc<Credential> {
        Arc::new(Credential::issue(grant.access_token, grant.expires_in, self.clock.now()))
    }
}

fn valid(
    credential: Option<&Arc<Credential>>,
    now: chrono::DateTime<chrono::Utc>,
) -> Option<&Arc<Credential>> {
    credential.filter(|credential| credential.is_valid_at(now))
}

#[async_trait]
impl TokenProvider for CredentialManager {
    async fn get_token(&self) -> Result<String> {
        CredentialManager::get_token(self).await
    }

    async fn invalidate(&self) {
        CredentialManager::invalidate(self).await;
    }
}
