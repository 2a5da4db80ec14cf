/// 연결 인증 및 권한 정책
/// 1. 자격 증명(JWT) 검증
/// 2. 관리자 권한 확인
// region:    --- Modules
pub mod policy;

// endregion: --- Modules

// region:    --- Imports
use crate::error::RoomError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Identity
/// 사용자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(other)]
    User,
}

/// 검증된 사용자 정보 (토큰 클레임)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub role: Role,
    pub exp: i64,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// endregion: --- Identity

// region:    --- Verifier
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("no token provided")]
    MissingToken,
    #[error("malformed authorization value")]
    Malformed,
    #[error("invalid token: {0}")]
    Invalid(String),
}

impl From<AuthError> for RoomError {
    fn from(e: AuthError) -> Self {
        RoomError::Unauthorized(e.to_string())
    }
}

/// 자격 증명 검증기 트레이트 (토큰 발급 서비스와의 경계)
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// HS256 JWT 검증기
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        decode::<Identity>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::Invalid(e.to_string()))
    }
}

/// "Bearer <token>" 또는 토큰 단독 값에서 토큰 추출
pub fn bearer_token(value: Option<&str>) -> Result<&str, AuthError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let value = value.ok_or(AuthError::MissingToken)?;
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() || token.contains(' ') {
                Err(AuthError::Malformed)
            } else {
                Ok(token)
            }
        }
        Some(_) => Err(AuthError::Malformed),
        None => Ok(value),
    }
}

/// 연결 시 1회 호출: 자격 증명을 검증하여 사용자 정보 반환
pub fn authenticate(
    verifier: &dyn CredentialVerifier,
    authorization: Option<&str>,
) -> Result<Identity, AuthError> {
    let token = bearer_token(authorization)?;
    verifier.verify(token)
}

// endregion: --- Verifier

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(id: &str, role: &str, exp: i64, secret: &str) -> String {
        let claims = serde_json::json!({ "id": id, "role": role, "exp": exp });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(Some("abc")), Ok("abc"));
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("  ")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::Malformed));
        assert_eq!(bearer_token(Some("Bearer a b")), Err(AuthError::Malformed));
    }

    #[test]
    fn test_verify_admin_token() {
        let verifier = JwtVerifier::new(SECRET);
        let raw = format!("Bearer {}", token("u-1", "admin", in_one_hour(), SECRET));
        let identity = authenticate(&verifier, Some(&raw)).unwrap();
        assert_eq!(identity.id, "u-1");
        assert!(identity.is_admin());
    }

    #[test]
    fn test_unknown_role_is_user() {
        let verifier = JwtVerifier::new(SECRET);
        let identity = verifier
            .verify(&token("u-2", "bidder", in_one_hour(), SECRET))
            .unwrap();
        assert_eq!(identity.role, Role::User);
        assert!(!identity.is_admin());
    }

    #[test]
    fn test_reject_wrong_secret() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier.verify(&token("u-1", "admin", in_one_hour(), "other"));
        assert!(matches!(result, Err(AuthError::Invalid(_))));
    }

    #[test]
    fn test_reject_expired_token() {
        let verifier = JwtVerifier::new(SECRET);
        let expired = chrono::Utc::now().timestamp() - 3600;
        let result = verifier.verify(&token("u-1", "user", expired, SECRET));
        assert!(matches!(result, Err(AuthError::Invalid(_))));
    }

    #[test]
    fn test_auth_error_maps_to_unauthorized() {
        let err: RoomError = AuthError::MissingToken.into();
        assert_eq!(err.code(), "UNAUTHORIZED");
    }
}
