//! Token pair issuance shared by sign-up and sign-in.

use std::fmt;

use crate::application::ledger::RefreshTokenLedger;
use crate::application::token::TokenIssuer;
use crate::domain::repository::RefreshTokenRepository;
use crate::domain::value_object::UserId;
use crate::error::AuthResult;

#[derive(Clone)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Mint an access/refresh pair and record the refresh token.
pub async fn start_session<R>(
    issuer: &TokenIssuer,
    ledger: &RefreshTokenLedger<R>,
    user_id: &UserId,
) -> AuthResult<SessionTokens>
where
    R: RefreshTokenRepository,
{
    let access = issuer.issue_access_token(user_id)?;
    let refresh = issuer.issue_refresh_token(user_id)?;

    ledger.record(user_id, &refresh).await?;

    Ok(SessionTokens {
        access_token: access.token,
        refresh_token: refresh.token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_tokens() {
        let tokens = SessionTokens {
            access_token: "access.jwt.value".into(),
            refresh_token: "refresh.jwt.value".into(),
        };
        let debug = format!("{tokens:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("access.jwt.value"));
        assert!(!debug.contains("refresh.jwt.value"));
    }
}
