use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};

use crate::config::Config;
use crate::error::AppResult;
use crate::sdk::Auth;

/// Claims of the per-user token
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaims {
    pub exp: i64,
    pub user_id: i64,
}

/// Claims of the app signature
#[derive(Debug, Serialize, Deserialize)]
pub struct AppClaims {
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub version: String,
}

/// Derives per-call credentials from the app identity
#[derive(Debug, Clone)]
pub struct Signer {
    app_id: String,
    app_secret: String,
    callback_version: String,
    jwt_secret: String,
    token_hours: i64,
}

impl Signer {
    pub fn new(config: &Config) -> Self {
        Self {
            app_id: config.shimo_sdk.app_id.clone(),
            app_secret: config.shimo_sdk.app_secret.clone(),
            callback_version: config.shimo_sdk.callback_version.clone(),
            jwt_secret: config.jwt.secret.clone(),
            token_hours: config.jwt.expiration_hours,
        }
    }

    /// HS256 user token signed with the JWT secret
    pub fn user_token(&self, user_id: i64) -> AppResult<String> {
        let exp = OffsetDateTime::now_utc() + Duration::hours(self.token_hours);
        let claims = UserClaims {
            exp: exp.unix_timestamp(),
            user_id,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// HS256 app signature keyed by app id; strict signatures are short lived
    /// and carry the license scope
    pub fn app_signature(&self, strict: bool) -> AppResult<String> {
        let lifetime = if strict {
            Duration::minutes(4)
        } else {
            Duration::days(365)
        };
        let claims = AppClaims {
            exp: (OffsetDateTime::now_utc() + lifetime).unix_timestamp(),
            scope: strict.then(|| "license".to_string()),
            version: self.callback_version.clone(),
        };

        let mut header = Header::default();
        header.kid = Some(self.app_id.clone());

        let signature = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.app_secret.as_bytes()),
        )?;

        Ok(signature)
    }

    /// SHA-256 hex of the decimal user id
    pub fn user_uuid(user_id: i64) -> String {
        hex::encode(Sha256::digest(user_id.to_string().as_bytes()))
    }

    pub fn auth_for(&self, user_id: i64) -> AppResult<Auth> {
        Ok(Auth {
            token: self.user_token(user_id)?,
            signature: self.app_signature(false)?,
            user_uuid: (self.callback_version == "v2").then(|| Self::user_uuid(user_id)),
        })
    }

    /// Credentials for app and seat management calls
    pub fn license_auth(&self) -> AppResult<Auth> {
        Ok(Auth {
            token: String::new(),
            signature: self.app_signature(true)?,
            user_uuid: None,
        })
    }
}
