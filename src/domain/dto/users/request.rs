//! 사용자 요청 DTO
//!
//! JSON 바디로 들어오는 요청들의 역직렬화 및 검증 구조체입니다.
//! 멀티파트(register, update-profile) 요청은 `utils::upload`에서 별도로
//! 파싱됩니다.

use serde::Deserialize;
use validator::Validate;

/// 로그인 요청
///
/// username 또는 email 중 하나로 로그인할 수 있습니다.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// 로그인 식별자 (username 우선, 없으면 email)
    pub fn identifier(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.trim().is_empty()))
    }
}

/// 비밀번호 변경 요청
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(rename = "oldPassword")]
    #[validate(length(min = 1, message = "old password is required"))]
    pub old_password: String,
    #[serde(rename = "newPassword")]
    #[validate(length(min = 8, message = "new password must be at least 8 characters"))]
    pub new_password: String,
}

/// 토큰 갱신 요청 (쿠키가 없을 때의 바디 폴백)
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}
