//! Backend operations built on [`ApiClient::execute`].

use crate::auth::{parse_refresh_cookie, peek_claims, AuthState, Session};
use crate::error::{ApiError, ApiResult};
use crate::forms::{check, LoginForm, PromoteForm, RegisterForm, TradeForm};
use crate::models::wire::{CredentialsBody, PromoteBody, TradeBody};
use crate::models::{
    Dashboard, DataEnvelope, MessageResponse, PortfolioItem, TokenResponse, Trade, User,
};
use crate::traits::Response;
use crate::view::View;

use super::client::ApiClient;
use super::request::ApiRequest;

/// Decode a `{"message": ...}` acknowledgement; an empty body is fine.
fn message_of(response: &Response) -> ApiResult<String> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(String::new());
    }
    Ok(response.json::<MessageResponse>()?.message)
}

/// Account for a fresh token when the login body does not carry one.
fn user_from_token(access_token: &str, email: &str) -> ApiResult<User> {
    let claims = peek_claims(access_token)
        .ok_or_else(|| ApiError::Decode("Access token carries no readable claims".to_string()))?;
    Ok(User::new(claims.sub, email, claims.role))
}

impl ApiClient {
    /// Sign in and persist the session.
    pub async fn login(&self, form: &LoginForm) -> ApiResult<AuthState> {
        check(form)?;
        let body = CredentialsBody {
            email: &form.email,
            password: &form.password,
        };
        let response = self
            .execute(ApiRequest::post("/auth/login", &body)?.public())
            .await?;

        let issued_cookie = response
            .header("set-cookie")
            .and_then(parse_refresh_cookie)
            .flatten();
        let token: TokenResponse = response.json()?;
        let user = match token.user {
            Some(user) => user,
            None => user_from_token(&token.access_token, &form.email)?,
        };

        let cookie = match issued_cookie {
            Some(cookie) => Some(cookie),
            None => self.session().await?.and_then(|s| s.refresh_cookie),
        };
        let role = user.role;
        let session = Session::signed_in(token.access_token, cookie, user);
        self.replace_session(&session).await?;

        tracing::info!(email = %form.email, %role, "Signed in");
        self.navigate(View::Dashboard);
        Ok(session.auth)
    }

    /// Create an account. The user signs in afterwards.
    pub async fn register(&self, form: &RegisterForm) -> ApiResult<String> {
        check(form)?;
        let body = CredentialsBody {
            email: &form.email,
            password: &form.password,
        };
        let response = self
            .execute(ApiRequest::post("/auth/register", &body)?.public())
            .await?;
        let message = message_of(&response)?;

        tracing::info!(email = %form.email, "Account registered");
        self.navigate(View::Login);
        Ok(message)
    }

    /// End the session. The server call is best effort; the local session is
    /// always cleared.
    pub async fn logout(&self) -> ApiResult<()> {
        match self
            .execute(ApiRequest::empty_post("/auth/logout").public())
            .await
        {
            Ok(_) => tracing::debug!("Server session invalidated"),
            Err(err) => tracing::warn!("Logout request failed, clearing local session anyway: {}", err),
        }

        self.end_session().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Exchange the admin secret for the admin role, then sign out so the
    /// next sign-in carries the new role.
    pub async fn promote(&self, form: &PromoteForm) -> ApiResult<String> {
        check(form)?;
        let response = self
            .execute(ApiRequest::post(
                "/auth/promote",
                &PromoteBody {
                    secret: &form.secret,
                },
            )?)
            .await?;
        let message = message_of(&response)?;

        tracing::info!("Account promoted to admin");
        if let Err(err) = self.logout().await {
            tracing::warn!("Promotion succeeded but sign-out failed: {}", err);
        }
        Ok(message)
    }

    /// Record a trade.
    pub async fn submit_trade(&self, form: &TradeForm) -> ApiResult<String> {
        check(form)?;
        let body = TradeBody {
            symbol: &form.symbol,
            side: form.side,
            price: form.price,
            quantity: form.quantity,
        };
        let response = self.execute(ApiRequest::post("/trades", &body)?).await?;
        let message = message_of(&response)?;

        tracing::info!(symbol = %form.symbol, side = %form.side, "Trade submitted");
        Ok(message)
    }

    /// Holdings of the signed-in user.
    pub async fn portfolio(&self) -> ApiResult<Vec<PortfolioItem>> {
        let envelope: DataEnvelope<Vec<PortfolioItem>> = self.get_json("/portfolio").await?;
        Ok(envelope.into_inner())
    }

    /// Trade history of the signed-in user.
    pub async fn trades(&self) -> ApiResult<Vec<Trade>> {
        let envelope: DataEnvelope<Vec<Trade>> = self.get_json("/trades").await?;
        Ok(envelope.into_inner())
    }

    /// Portfolio and history, fetched concurrently.
    pub async fn dashboard(&self) -> ApiResult<Dashboard> {
        let (portfolio, trades) = futures::try_join!(self.portfolio(), self.trades())?;
        Ok(Dashboard { portfolio, trades })
    }

    /// Every user's trades. Non-admins are sent back to the dashboard.
    pub async fn admin_ledger(&self) -> ApiResult<Vec<Trade>> {
        match self.get_json::<DataEnvelope<Vec<Trade>>>("/admin/trades").await {
            Ok(envelope) => Ok(envelope.into_inner()),
            Err(ApiError::Forbidden { message }) => {
                tracing::warn!("Admin ledger denied: {}", message);
                self.navigate(View::Dashboard);
                Err(ApiError::Forbidden { message })
            }
            Err(err) => Err(err),
        }
    }

    /// Authentication state of the stored session.
    pub async fn auth_state(&self) -> ApiResult<AuthState> {
        Ok(self
            .session()
            .await?
            .map(|session| session.auth)
            .unwrap_or_default())
    }
}
