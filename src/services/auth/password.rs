//! 비밀번호 해싱 및 검증
//!
//! bcrypt 기반 단방향 해싱입니다. 해싱과 검증은 CPU 바운드 작업이므로
//! 호출자(서비스 계층)가 `web::block`으로 워커 스레드풀에 위임합니다.

use crate::config::PasswordConfig;
use crate::errors::{AppError, AppResult};

/// 평문 비밀번호를 bcrypt로 해싱합니다.
pub fn hash_password(password: &str, config: &PasswordConfig) -> AppResult<String> {
    bcrypt::hash(password, config.cost)
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))
}

/// 평문 비밀번호를 저장된 해시와 대조합니다.
///
/// 불일치는 `Ok(false)`로, 해시 파싱 실패 등 연산 자체의 오류만 에러로
/// 반환합니다.
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))
}
