//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 비디오 플랫폼 계정의 자격증명(비밀번호 해시, 현재 리프레시 토큰)과
//! 프로필(아바타, 커버 이미지)을 하나의 문서로 보관합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// `username`과 `email`은 전체 사용자에 대해 유니크하며 소문자로 정규화되어
/// 저장됩니다. `password_hash`에는 생성/변경 이후 평문이 절대 남지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이름 (unique, 소문자 정규화)
    pub username: String,
    /// 사용자 이메일 (unique, 소문자 정규화)
    pub email: String,
    /// 전체 이름
    pub fullname: String,
    /// 해시된 비밀번호
    pub password_hash: String,
    /// 아바타 이미지 URL (필수)
    pub avatar: String,
    /// 커버 이미지 URL (선택)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// 시청 기록 (비디오 문서 참조)
    #[serde(default)]
    pub watch_history: Vec<ObjectId>,
    /// 현재 유효한 리프레시 토큰 (로그아웃 시 제거됨)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl User {
    /// 새 사용자 생성
    ///
    /// 호출자는 username/email/fullname을 이미 정규화하고 비밀번호를 해싱한
    /// 상태여야 합니다. 리프레시 토큰 없이, 빈 시청 기록으로 시작합니다.
    pub fn new(
        username: String,
        email: String,
        fullname: String,
        password_hash: String,
        avatar: String,
        cover_image: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            username,
            email,
            fullname,
            password_hash,
            avatar,
            cover_image,
            watch_history: Vec::new(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "alice".to_string(),
            "alice@x.com".to_string(),
            "alice smith".to_string(),
            "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            "https://assets.example/avatar.png".to_string(),
            None,
        )
    }

    #[test]
    fn test_new_user_starts_without_session() {
        let user = sample_user();

        assert!(user.id.is_none());
        assert!(user.id_string().is_none());
        assert!(user.refresh_token.is_none());
        assert!(user.watch_history.is_empty());
        assert!(user.cover_image.is_none());
    }

    #[test]
    fn test_id_string_round_trip() {
        let mut user = sample_user();
        let oid = ObjectId::new();
        user.id = Some(oid);

        assert_eq!(user.id_string(), Some(oid.to_hex()));
    }
}
