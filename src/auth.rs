// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Session checks for the admin API.
//!
//! Access tokens are HS256 JWTs issued by the backend's auth service. A
//! signed-out session stays revoked until the process exits.

use axum::{
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::AuthConfig;
use crate::error::{AdminError, Result};

/// Claims the backend puts in its access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub aud: String,
    pub exp: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Authenticated operator, attached to every request past the auth layer
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Key the session is revoked under
    #[serde(skip)]
    pub revocation_key: String,
}

impl Session {
    fn from_claims(claims: Claims, token: &str) -> Self {
        let revocation_key = claims
            .session_id
            .clone()
            .unwrap_or_else(|| token.to_string());
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Self {
            user_id: claims.sub,
            email: claims.email,
            expires_at,
            session_id: claims.session_id,
            revocation_key,
        }
    }
}

/// Signed-out sessions, kept until their token would have expired anyway
#[derive(Debug, Default)]
pub struct SessionRegistry {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn revoke(&self, session: &Session) {
        let now = Utc::now();
        let mut revoked = self.revoked.write().await;
        // Expired tokens fail verification, so their entries are dead weight
        revoked.retain(|_, expires_at| *expires_at > now);
        if session.expires_at > now {
            revoked.insert(session.revocation_key.clone(), session.expires_at);
        }
        info!("Session for {} signed out", session.user_id);
    }

    pub async fn is_revoked(&self, session: &Session) -> bool {
        self.revoked
            .read()
            .await
            .contains_key(&session.revocation_key)
    }
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Check signature, expiry and audience of an access token
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<Session> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| AdminError::Unauthorized(format!("invalid access token: {}", e)))?;

    Ok(Session::from_claims(data.claims, token))
}

/// Auth layer in front of every `/api` route
pub async fn require_session<B>(
    State(state): State<AppState>,
    mut req: Request<B>,
    next: Next<B>,
) -> std::result::Result<Response, AdminError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AdminError::Unauthorized("missing bearer token".to_string()))?;

    let session = verify_token(token, &state.config.auth)?;
    if state.sessions.is_revoked(&session).await {
        return Err(AdminError::Unauthorized("session signed out".to_string()));
    }

    debug!("{} {} as {}", req.method(), req.uri().path(), session.user_id);
    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
