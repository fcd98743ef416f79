//! # Authentication Configuration Module
//!
//! JWT 토큰과 비밀번호 해싱 관련 설정을 관리하는 모듈입니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ### JWT 토큰 설정
//! ```bash
//! export ACCESS_TOKEN_SECRET="your-access-token-secret"
//! export REFRESH_TOKEN_SECRET="your-refresh-token-secret"
//! export ACCESS_TOKEN_TTL_MINUTES="60"
//! export REFRESH_TOKEN_TTL_DAYS="10"
//! ```
//!
//! ### 비밀번호 해싱 설정
//! ```bash
//! export BCRYPT_COST="10"
//! ```
//!
//! 액세스 토큰과 리프레시 토큰은 서로 다른 비밀키와 만료 시간을 사용합니다.
//! 액세스 토큰은 모든 요청에 실리므로 짧게, 리프레시 토큰은 서버 측 상태와
//! 대조되므로 길게 유지합니다.

use std::env;

/// JSON Web Token (JWT) 관련 설정
///
/// 액세스/리프레시 두 가지 토큰 구성을 담는 평범한 데이터 구조체입니다.
/// `TokenService` 생성자로 주입되며, 토큰 발급과 검증에만 사용됩니다.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// 액세스 토큰 서명 비밀키
    pub access_secret: String,
    /// 리프레시 토큰 서명 비밀키 (액세스와 반드시 상이해야 함)
    pub refresh_secret: String,
    /// 액세스 토큰 만료 시간 (분)
    pub access_ttl_minutes: i64,
    /// 리프레시 토큰 만료 시간 (일)
    pub refresh_ttl_days: i64,
}

impl JwtConfig {
    /// 환경변수에서 JWT 설정을 읽어옵니다.
    ///
    /// 비밀키가 설정되지 않은 경우 개발용 기본값을 사용하며 경고를 남깁니다.
    /// 프로덕션에서는 두 비밀키 모두 256비트 이상의 랜덤 키를 사용해야 합니다.
    pub fn from_env() -> Self {
        let access_secret = env::var("ACCESS_TOKEN_SECRET").unwrap_or_else(|_| {
            log::warn!("ACCESS_TOKEN_SECRET not set, using default (not secure for production!)");
            "access-token-secret".to_string()
        });

        let refresh_secret = env::var("REFRESH_TOKEN_SECRET").unwrap_or_else(|_| {
            log::warn!("REFRESH_TOKEN_SECRET not set, using default (not secure for production!)");
            "refresh-token-secret".to_string()
        });

        Self {
            access_secret,
            refresh_secret,
            access_ttl_minutes: env_i64("ACCESS_TOKEN_TTL_MINUTES", 60),
            refresh_ttl_days: env_i64("REFRESH_TOKEN_TTL_DAYS", 10),
        }
    }
}

/// 비밀번호 해싱 설정
///
/// bcrypt cost factor를 관리합니다. cost가 높을수록 무차별 대입 공격에
/// 강해지지만 해싱 시간이 지수적으로 증가합니다.
#[derive(Debug, Clone, Copy)]
pub struct PasswordConfig {
    /// bcrypt cost factor
    pub cost: u32,
}

impl PasswordConfig {
    /// 기본 cost factor
    pub const DEFAULT_COST: u32 = 10;

    /// 환경변수 `BCRYPT_COST`에서 설정을 읽어옵니다. 기본값은 10입니다.
    pub fn from_env() -> Self {
        let cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(Self::DEFAULT_COST);

        Self {
            cost: clamp_bcrypt_cost(cost),
        }
    }
}

/// bcrypt가 허용하는 cost 범위(4..=31)로 보정합니다.
fn clamp_bcrypt_cost(cost: u32) -> u32 {
    cost.clamp(4, 31)
}

/// i64 환경변수 파싱 (실패 시 기본값)
fn env_i64(key: &str, default: i64) -> i64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}
