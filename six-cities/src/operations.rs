//! Async operations.
//!
//! Each requested action maps to one transport call wrapped in an
//! [`Operation`], so the store receives exactly one terminal action per
//! request. Token persistence happens inside the operation, before the
//! terminal action is produced.

use crate::action::{AppAction, OperationKind};
use crate::api::ApiError;
use crate::environment::AppEnvironment;
use crate::token::TokenStore;
use six_cities_core::effect::Effect;
use six_cities_core::operation::Operation;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

/// Build the effect for a requested action
///
/// Returns `None` for synchronous and terminal actions.
#[must_use]
pub fn effect_for(action: &AppAction, env: &AppEnvironment) -> Option<Effect<AppAction>> {
    let api = &env.api;

    let effect = match action {
        AppAction::FetchOffers => run(
            OperationKind::FetchOffers,
            api.offers(),
            |offers| AppAction::OffersFetched {
                offers: Arc::new(offers),
            },
            |error| AppAction::FetchOffersFailed { error },
        ),

        AppAction::CheckAuth => {
            let request = api.check_auth();
            let tokens = Arc::clone(&env.tokens);
            run(
                OperationKind::CheckAuth,
                async move {
                    let info = request.await?;
                    save_token(tokens.as_ref(), &info.token);
                    Ok::<_, ApiError>(info.email)
                },
                |email| AppAction::AuthChecked { email },
                |error| AppAction::CheckAuthFailed { error },
            )
        },

        AppAction::Login { credentials } => {
            let request = api.login(credentials);
            let tokens = Arc::clone(&env.tokens);
            run(
                OperationKind::Login,
                async move {
                    let info = request.await?;
                    save_token(tokens.as_ref(), &info.token);
                    Ok::<_, ApiError>(info.email)
                },
                |email| AppAction::LoggedIn { email },
                |error| AppAction::LoginFailed { error },
            )
        },

        AppAction::Logout => {
            let request = api.logout();
            let tokens = Arc::clone(&env.tokens);
            run(
                OperationKind::Logout,
                async move {
                    let result = request.await;
                    // The local session ends whether or not the service confirms it
                    if let Err(error) = tokens.drop_token() {
                        tracing::warn!(%error, "Could not drop session token");
                    }
                    result
                },
                |()| AppAction::LoggedOut,
                |error| AppAction::LogoutFailed { error },
            )
        },

        AppAction::FetchOffer { offer_id } => {
            let (success_id, failure_id) = (offer_id.clone(), offer_id.clone());
            run(
                OperationKind::FetchOffer,
                api.offer(offer_id),
                move |offer| AppAction::OfferFetched {
                    offer_id: success_id,
                    offer,
                },
                move |error| AppAction::FetchOfferFailed {
                    offer_id: failure_id,
                    error,
                },
            )
        },

        AppAction::FetchNearbyOffers { offer_id } => {
            let (success_id, failure_id) = (offer_id.clone(), offer_id.clone());
            run(
                OperationKind::FetchNearbyOffers,
                api.nearby_offers(offer_id),
                move |offers| AppAction::NearbyOffersFetched {
                    offer_id: success_id,
                    offers: Arc::new(offers),
                },
                move |error| AppAction::FetchNearbyOffersFailed {
                    offer_id: failure_id,
                    error,
                },
            )
        },

        AppAction::FetchComments { offer_id } => {
            let (success_id, failure_id) = (offer_id.clone(), offer_id.clone());
            run(
                OperationKind::FetchComments,
                api.comments(offer_id),
                move |reviews| AppAction::CommentsFetched {
                    offer_id: success_id,
                    reviews: Arc::new(reviews),
                },
                move |error| AppAction::FetchCommentsFailed {
                    offer_id: failure_id,
                    error,
                },
            )
        },

        AppAction::PostComment { draft } => {
            let (review_id, failure_id) = (draft.offer_id.clone(), draft.offer_id.clone());
            let request = api.post_comment(draft);
            run(
                OperationKind::PostComment,
                async move {
                    let mut review = request.await?;
                    if review.offer_id.as_str().is_empty() {
                        review.offer_id = review_id;
                    }
                    Ok::<_, ApiError>(review)
                },
                |review| AppAction::CommentPosted { review },
                move |error| AppAction::PostCommentFailed {
                    offer_id: failure_id,
                    error,
                },
            )
        },

        AppAction::FetchFavorites => run(
            OperationKind::FetchFavorites,
            api.favorites(),
            |offers| AppAction::FavoritesFetched {
                offers: Arc::new(offers),
            },
            |error| AppAction::FetchFavoritesFailed { error },
        ),

        AppAction::ToggleFavoriteStatus { offer_id, status } => {
            let failure_id = offer_id.clone();
            run(
                OperationKind::ToggleFavoriteStatus,
                api.set_favorite(offer_id, *status),
                |offer| AppAction::FavoriteStatusToggled { offer },
                move |error| AppAction::ToggleFavoriteStatusFailed {
                    offer_id: failure_id,
                    error,
                },
            )
        },

        AppAction::ChangeCity { .. }
        | AppAction::LoadOffers { .. }
        | AppAction::RequireAuthorization { .. }
        | AppAction::SetUserEmail { .. }
        | AppAction::OffersFetched { .. }
        | AppAction::FetchOffersFailed { .. }
        | AppAction::AuthChecked { .. }
        | AppAction::CheckAuthFailed { .. }
        | AppAction::LoggedIn { .. }
        | AppAction::LoginFailed { .. }
        | AppAction::LoggedOut
        | AppAction::LogoutFailed { .. }
        | AppAction::OfferFetched { .. }
        | AppAction::FetchOfferFailed { .. }
        | AppAction::NearbyOffersFetched { .. }
        | AppAction::FetchNearbyOffersFailed { .. }
        | AppAction::CommentsFetched { .. }
        | AppAction::FetchCommentsFailed { .. }
        | AppAction::CommentPosted { .. }
        | AppAction::PostCommentFailed { .. }
        | AppAction::FavoritesFetched { .. }
        | AppAction::FetchFavoritesFailed { .. }
        | AppAction::FavoriteStatusToggled { .. }
        | AppAction::ToggleFavoriteStatusFailed { .. } => return None,
    };

    Some(effect)
}

/// Wrap a transport call in a traced operation
fn run<T, E, Fut, S, F>(
    kind: OperationKind,
    request: Fut,
    on_success: S,
    on_failure: F,
) -> Effect<AppAction>
where
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    S: FnOnce(T) -> AppAction + Send + 'static,
    F: FnOnce(E) -> AppAction + Send + 'static,
{
    tracing::debug!(operation = %kind, "Operation requested");

    let span = tracing::info_span!("operation", operation = %kind);
    let request = async move {
        let result = request.await;
        match &result {
            Ok(_) => tracing::debug!("Operation succeeded"),
            Err(error) => tracing::warn!(%error, "Operation failed"),
        }
        result
    }
    .instrument(span);

    Operation::new(request, on_success, on_failure).into_effect()
}

fn save_token(tokens: &dyn TokenStore, token: &str) {
    if let Err(error) = tokens.save(token) {
        tracing::warn!(%error, "Could not persist session token");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, StubTransport};
    use crate::token::InMemoryTokenStore;
    use crate::types::OfferId;
    use serde_json::json;

    fn environment(stub: &StubTransport, tokens: Arc<InMemoryTokenStore>) -> AppEnvironment {
        AppEnvironment::new(Arc::new(stub.clone()), tokens)
    }

    async fn settle(effect: Option<Effect<AppAction>>) -> Option<AppAction> {
        match effect {
            Some(Effect::Future(future)) => future.await,
            _ => None,
        }
    }

    #[test]
    fn synchronous_and_terminal_actions_have_no_effect() {
        let env = environment(&StubTransport::new(), Arc::new(InMemoryTokenStore::new()));
        assert!(effect_for(&AppAction::ChangeCity { city: "Hamburg".into() }, &env).is_none());
        assert!(effect_for(&AppAction::LoggedOut, &env).is_none());
        assert!(effect_for(&AppAction::FetchFavorites, &env).is_some());
    }

    #[tokio::test]
    async fn check_auth_persists_token() {
        let stub = StubTransport::new();
        stub.respond(
            Method::Get,
            "/login",
            json!({
                "name": "Oliver",
                "avatarUrl": "a.jpg",
                "isPro": false,
                "email": "oliver@mail.com",
                "token": "T1"
            }),
        );
        let tokens = Arc::new(InMemoryTokenStore::new());
        let env = environment(&stub, Arc::clone(&tokens));

        let action = settle(effect_for(&AppAction::CheckAuth, &env)).await;

        assert_eq!(
            action,
            Some(AppAction::AuthChecked {
                email: "oliver@mail.com".into()
            })
        );
        assert_eq!(tokens.read().ok().flatten().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn logout_drops_token_even_when_rejected() {
        let stub = StubTransport::new();
        stub.fail(Method::Delete, "/logout", ApiError::Request("offline".into()));
        let tokens = Arc::new(InMemoryTokenStore::with_token("T1"));
        let env = environment(&stub, Arc::clone(&tokens));

        let action = settle(effect_for(&AppAction::Logout, &env)).await;

        assert_eq!(
            action,
            Some(AppAction::LogoutFailed {
                error: ApiError::Request("offline".into())
            })
        );
        assert!(matches!(tokens.read(), Ok(None)));
    }

    #[tokio::test]
    async fn detail_failures_carry_the_requested_id() {
        let env = environment(&StubTransport::new(), Arc::new(InMemoryTokenStore::new()));
        let offer_id = OfferId::new("missing");

        let action = settle(effect_for(
            &AppAction::FetchOffer {
                offer_id: offer_id.clone(),
            },
            &env,
        ))
        .await;

        assert_eq!(
            action,
            Some(AppAction::FetchOfferFailed {
                offer_id,
                error: ApiError::NotFound
            })
        );
    }
}
