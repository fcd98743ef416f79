//! 자격 증명 저장소 추상화
//!
//! 사용자 계정의 영속 계층 인터페이스입니다. 서비스 계층은 이 트레이트에만
//! 의존하므로 MongoDB 없이 인메모리 구현으로 세션 흐름을 검증할 수 있습니다.

use async_trait::async_trait;

use crate::domain::entities::users::User;
use crate::errors::AppResult;

/// 프로필 갱신 패치
///
/// 갱신 가능한 필드만 담습니다. 비밀번호 해시와 리프레시 토큰은
/// 전용 연산으로만 변경할 수 있고 이 패치로는 건드릴 수 없습니다.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub username: Option<String>,
    pub fullname: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

impl ProfilePatch {
    /// 갱신할 필드가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.fullname.is_none()
            && self.avatar.is_none()
            && self.cover_image.is_none()
    }
}

/// 사용자 계정 영속 계층 인터페이스
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// username 또는 email 둘 중 하나라도 일치하는 사용자 조회
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>>;

    /// username으로 사용자 조회
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// ID 문자열로 사용자 조회
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// 새 사용자 생성 (중복 시 ConflictError)
    async fn create(&self, user: User) -> AppResult<User>;

    /// 프로필 필드 갱신 후 갱신된 사용자 반환
    async fn update_profile(&self, id: &str, patch: ProfilePatch) -> AppResult<User>;

    /// 리프레시 토큰 저장 (`None`이면 제거)
    async fn set_refresh_token(&self, id: &str, token: Option<&str>) -> AppResult<()>;

    /// 비밀번호 해시 교체
    async fn set_password_hash(&self, id: &str, password_hash: &str) -> AppResult<()>;
}
