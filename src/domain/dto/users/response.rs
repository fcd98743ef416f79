//! 사용자 응답 DTO
//!
//! 프로필을 반환하는 모든 작업은 [`UserResponse`]를 거칩니다.
//! 비밀번호 해시, 리프레시 토큰, 시청 기록 등 내부 필드의 제거(redaction)는
//! 이 변환의 하드 계약입니다.

use mongodb::bson::DateTime;
use serde::Serialize;

use crate::domain::entities::users::User;

/// 사용자 응답 DTO (민감 정보 제거)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            username,
            email,
            fullname,
            avatar,
            cover_image,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            username,
            email,
            fullname,
            avatar,
            cover_image,
            created_at,
            updated_at,
        }
    }
}

/// 로그인 응답 DTO (토큰 쌍 포함)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

impl LoginResponse {
    /// 새 로그인 응답 생성
    pub fn new(user: User, access_token: String, refresh_token: String) -> Self {
        Self {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn sample_user() -> User {
        let mut user = User::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "alice smith".to_string(),
            "$2b$10$secret-hash".to_string(),
            "https://assets.example/avatar.png".to_string(),
            Some("https://assets.example/cover.png".to_string()),
        );
        user.id = Some(ObjectId::new());
        user.refresh_token = Some("some-refresh-token".to_string());
        user
    }

    #[test]
    fn test_user_response_redacts_sensitive_fields() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).expect("serialization");
        let obj = json.as_object().expect("object");

        assert_eq!(obj["username"], "alice");
        assert!(!obj.contains_key("password"));
        assert!(!obj.contains_key("passwordHash"));
        assert!(!obj.contains_key("refreshToken"));
        assert!(!obj.contains_key("watchHistory"));
    }

    #[test]
    fn test_login_response_carries_both_tokens() {
        let response = LoginResponse::new(
            sample_user(),
            "access.jwt".to_string(),
            "refresh.jwt".to_string(),
        );
        let json = serde_json::to_value(&response).expect("serialization");

        assert_eq!(json["accessToken"], "access.jwt");
        assert_eq!(json["refreshToken"], "refresh.jwt");
        assert!(json["user"].get("password").is_none());
    }
}
