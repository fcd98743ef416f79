//! JWT 인증 토큰 클레임 및 토큰 쌍
//!
//! RFC 7519 JWT 표준 클레임을 따르는 액세스/리프레시 클레임과,
//! 클라이언트에 전달되는 토큰 쌍을 정의합니다.
//!
//! 액세스 토큰은 서명과 만료만으로 신뢰되는 짧은 수명의 클레임이고,
//! 리프레시 토큰은 사용자 문서에 보관된 현재 값과 대조되는 긴 수명의
//! 클레임입니다. 두 토큰은 서로 다른 비밀키로 서명됩니다.

use serde::{Deserialize, Serialize};

/// 액세스 토큰 클레임 (Payload)
///
/// 개인정보 보호를 위해 최소한의 정보만 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// 토큰의 주체 (사용자 ID)
    pub sub: String,
    /// 사용자 이메일
    pub email: String,
    /// 사용자 이름
    pub username: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 리프레시 토큰 클레임 (Payload)
///
/// 사용자 ID 외에는 어떤 정보도 싣지 않습니다. `jti`는 발급마다 달라지는
/// 고유 식별자로, 같은 초에 재발급해도 토큰 문자열이 항상 달라지는 것을
/// 보장합니다. 회전(rotation)이 실제로 이전 토큰을 무효화하려면 이
/// 고유성이 필요합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// 토큰의 주체 (사용자 ID)
    pub sub: String,
    /// 토큰 고유 식별자 (발급마다 새로 생성)
    pub jti: String,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// JWT 토큰 쌍 구조체
///
/// 로그인/갱신 시 클라이언트에게 전달되는 토큰 집합입니다.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// 액세스 토큰 (API 접근용 단기 토큰)
    pub access_token: String,
    /// 리프레시 토큰 (토큰 갱신용 장기 토큰)
    pub refresh_token: String,
}
