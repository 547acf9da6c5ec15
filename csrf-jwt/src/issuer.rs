use crate::config::GuardConfig;
use crate::cookie::render_set_cookie;
use crate::error::CodecError;
use crate::token::{CsrfClaims, CsrfToken, TokenCodec};
use csrf_jwt_core::HttpResponse;
use csrf_jwt_core::logging::trace;
use std::sync::Arc;

/// Mints tokens and stages them on outgoing responses.
#[derive(Clone)]
pub struct TokenIssuer {
    config: Arc<GuardConfig>,
    codec: Arc<dyn TokenCodec>,
}

impl TokenIssuer {
    pub fn new(config: Arc<GuardConfig>, codec: Arc<dyn TokenCodec>) -> Self {
        Self { config, codec }
    }

    /// Mint a token bound to `cookie_name`.
    pub fn issue_for(&self, cookie_name: &str) -> Result<CsrfToken, CodecError> {
        let claims = CsrfClaims::new(cookie_name, self.config.token_ttl);
        let value = self.codec.sign(&claims)?;
        trace!(nonce = %claims.jti, cookie = cookie_name, "Issued CSRF token");
        Ok(CsrfToken::new(value, claims))
    }

    /// Token for a safe request, staged under the issuance cookie
    pub fn issue(&self) -> Result<CsrfToken, CodecError> {
        self.issue_for(&self.config.cookie_name)
    }

    /// Replacement token after a validated request, staged under the rotation cookie
    pub fn rotate(&self) -> Result<CsrfToken, CodecError> {
        self.issue_for(&self.config.rotation_cookie_name)
    }

    /// Put `token` in the response header and add the cookie it is bound to,
    /// alongside any cookies the handler already set.
    pub fn attach(&self, response: &mut HttpResponse, token: &CsrfToken) {
        response
            .headers
            .insert(self.config.header_name.clone(), token.value().to_string());

        let cookie = render_set_cookie(
            &self.config,
            token.cookie_name(),
            token.value(),
            self.config.token_ttl.as_secs(),
        );
        response.set_cookie(cookie);
    }
}
