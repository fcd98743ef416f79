//! JWT 토큰 발급 및 검증 서비스
//!
//! HMAC-SHA256으로 서명된 액세스/리프레시 토큰을 발급하고 검증합니다.
//! 두 토큰은 서로 다른 비밀키를 사용하므로 한쪽 토큰을 다른 쪽 용도로
//! 제출하면 서명 검증에서 거부됩니다.
//!
//! 검증 실패는 전부 401(AuthenticationError)로 귀결됩니다. 만료와 그 외의
//! 사유(서명 불일치, 형식 오류)만 메시지로 구분합니다. 잘못된 형식의 토큰이
//! 서버 에러로 새는 일은 없습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::JwtConfig;
use crate::domain::entities::users::User;
use crate::domain::{AccessClaims, RefreshClaims, TokenPair};
use crate::errors::{AppError, AppResult};

/// JWT 토큰 서비스
///
/// 생성 시점에 서명/검증 키를 고정합니다. 요청 처리 중에는 설정을 다시
/// 읽지 않습니다.
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl_minutes: i64,
    refresh_ttl_days: i64,
}

impl TokenService {
    /// JWT 설정으로 토큰 서비스 생성
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes,
            refresh_ttl_days: config.refresh_ttl_days,
        }
    }

    /// 액세스 토큰 발급
    ///
    /// 사용자 ID를 `sub`로, 이메일/사용자명을 보조 클레임으로 싣습니다.
    pub fn issue_access(&self, user: &User) -> AppResult<String> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let now = Utc::now();

        let claims = AccessClaims {
            sub: user_id,
            email: user.email.clone(),
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_ttl_minutes)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AppError::InternalError(format!("액세스 토큰 발급 실패: {}", e)))
    }

    /// 리프레시 토큰 발급 (사용자 ID만 포함)
    ///
    /// `jti`가 매번 새로 생성되므로 같은 사용자에게 같은 초에 발급해도
    /// 토큰 문자열은 항상 다릅니다.
    pub fn issue_refresh(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now();

        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.refresh_ttl_days)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AppError::InternalError(format!("리프레시 토큰 발급 실패: {}", e)))
    }

    /// 액세스/리프레시 토큰 쌍 발급
    pub fn issue_pair(&self, user: &User) -> AppResult<TokenPair> {
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        Ok(TokenPair {
            access_token: self.issue_access(user)?,
            refresh_token: self.issue_refresh(&user_id)?,
        })
    }

    /// 액세스 토큰 검증 후 클레임 반환
    pub fn verify_access(&self, token: &str) -> AppResult<AccessClaims> {
        decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// 리프레시 토큰 검증 후 클레임 반환
    ///
    /// 서명과 만료만 확인합니다. 저장된 토큰과의 대조는 서비스 계층의
    /// 책임입니다.
    pub fn verify_refresh(&self, token: &str) -> AppResult<RefreshClaims> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }
}

/// 토큰 디코딩 실패를 인증 에러로 변환합니다.
fn map_decode_error(error: jsonwebtoken::errors::Error) -> AppError {
    use jsonwebtoken::errors::ErrorKind;

    match error.kind() {
        ErrorKind::ExpiredSignature => {
            AppError::AuthenticationError("만료된 토큰입니다".to_string())
        }
        _ => AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 60,
            refresh_ttl_days: 10,
        }
    }

    fn test_user() -> User {
        let mut user = User::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "alice smith".to_string(),
            "$2b$04$hash".to_string(),
            "https://assets.example/a.png".to_string(),
            None,
        );
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = TokenService::new(&test_config());
        let user = test_user();

        let token = service.issue_access(&user).unwrap();
        let claims = service.verify_access(&token).unwrap();

        assert_eq!(claims.sub, user.id_string().unwrap());
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let service = TokenService::new(&test_config());

        let token = service.issue_refresh("507f1f77bcf86cd799439011").unwrap();
        let claims = service.verify_refresh(&token).unwrap();

        assert_eq!(claims.sub, "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_refresh_tokens_are_unique_per_issue() {
        let service = TokenService::new(&test_config());

        let first = service.issue_refresh("507f1f77bcf86cd799439011").unwrap();
        let second = service.issue_refresh("507f1f77bcf86cd799439011").unwrap();

        // 같은 초에 발급되어도 jti가 달라 토큰이 달라야 한다
        assert_ne!(first, second);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let service = TokenService::new(&test_config());
        let user = test_user();
        let pair = service.issue_pair(&user).unwrap();

        // 액세스 토큰을 리프레시 검증에, 리프레시 토큰을 액세스 검증에
        assert!(service.verify_refresh(&pair.access_token).is_err());
        assert!(service.verify_access(&pair.refresh_token).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let service = TokenService::new(&test_config());
        let other = TokenService::new(&JwtConfig {
            access_secret: "different-secret".to_string(),
            ..test_config()
        });

        let token = service.issue_access(&test_user()).unwrap();

        let error = other.verify_access(&token).unwrap_err();
        assert!(matches!(error, AppError::AuthenticationError(_)));
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        // 기본 검증에 60초 leeway가 있으므로 충분히 과거로 만든다
        let service = TokenService::new(&JwtConfig {
            access_ttl_minutes: -120,
            ..test_config()
        });

        let token = service.issue_access(&test_user()).unwrap();

        let error = service.verify_access(&token).unwrap_err();
        assert!(matches!(error, AppError::AuthenticationError(_)));
    }

    #[test]
    fn test_malformed_token_is_unauthorized_not_internal() {
        let service = TokenService::new(&test_config());

        for garbage in ["", "abc", "a.b.c", "header.payload"] {
            let error = service.verify_access(garbage).unwrap_err();
            assert!(
                matches!(error, AppError::AuthenticationError(_)),
                "{:?} should be 401",
                garbage
            );
        }
    }
}
