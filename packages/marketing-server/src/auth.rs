//! Identity extraction. Auth token parsing is explicitly out of scope; this
//! is a dev-mode stub that trusts an `X-User-Id` header, standing in for
//! whatever auth middleware a deployment puts in front of this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;

pub struct AuthenticatedUser {
    pub user_id: i64,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("X-User-Id")
            .ok_or((StatusCode::UNAUTHORIZED, "missing X-User-Id header"))?;

        let value = header.to_str().map_err(|_| (StatusCode::UNAUTHORIZED, "invalid X-User-Id header"))?;

        let user_id = value.parse::<i64>().map_err(|_| (StatusCode::UNAUTHORIZED, "X-User-Id must be an integer"))?;

        Ok(AuthenticatedUser { user_id })
    }
}
