//! Token mutations
//!
//! `tokenAuth` exchanges credentials for a signed token, `verifyToken`
//! checks one, and `refreshToken` extends a still-valid session. None of
//! them require prior authentication.

use super::prelude::*;

use crate::services::{AuthError, TokenClaims};

fn auth_error(e: AuthError) -> async_graphql::Error {
    async_graphql::Error::new(e.to_string()).extend_with(|_, ext| ext.set("code", "UNAUTHORIZED"))
}

fn claims_to_payload(claims: &TokenClaims) -> TokenPayload {
    TokenPayload {
        username: claims.username.clone(),
        exp: claims.exp,
        orig_iat: claims.orig_iat,
    }
}

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Authenticate with username and password, returning a signed token
    async fn token_auth(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<TokenResult> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.authenticate(&username, &password).await {
            Ok((user, issued)) => {
                tracing::info!(user_id = %user.id, username = %user.username, "Token issued");
                Ok(TokenResult {
                    token: issued.token,
                    payload: claims_to_payload(&issued.claims),
                })
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Authentication failed");
                Err(auth_error(e))
            }
        }
    }

    /// Validate a token's signature and expiry, returning its payload
    async fn verify_token(&self, ctx: &Context<'_>, token: String) -> Result<VerifyResult> {
        let auth = ctx.data_unchecked::<AuthService>();

        let claims = auth.verify_token(&token).map_err(auth_error)?;
        Ok(VerifyResult {
            payload: claims_to_payload(&claims),
        })
    }

    /// Exchange a still-valid token for a fresh one
    async fn refresh_token(&self, ctx: &Context<'_>, token: String) -> Result<TokenResult> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.refresh_token(&token) {
            Ok(issued) => {
                tracing::debug!(username = %issued.claims.username, "Token refreshed");
                Ok(TokenResult {
                    token: issued.token,
                    payload: claims_to_payload(&issued.claims),
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                Err(auth_error(e))
            }
        }
    }
}
