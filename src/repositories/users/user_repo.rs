//! 사용자 리포지토리 (MongoDB 구현)
//!
//! `users` 컬렉션에 대한 [`CredentialStore`] 구현체입니다.
//! username/email 유니크 인덱스를 부트스트랩하고, 중복 키 에러(E11000)를
//! ConflictError로 변환합니다.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Bson, DateTime};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::db::Database;
use crate::domain::entities::users::User;
use crate::errors::{AppError, AppResult};
use crate::repositories::users::credential_store::{CredentialStore, ProfilePatch};

const COLLECTION_NAME: &str = "users";

/// 사용자 컬렉션 리포지토리
#[derive(Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    /// 데이터베이스 연결에서 리포지토리 생성
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.get_database().collection::<User>(COLLECTION_NAME),
        }
    }

    /// username/email 유니크 인덱스를 생성합니다.
    ///
    /// 애플리케이션 기동 시 한 번 호출됩니다. 이미 존재하는 인덱스는
    /// MongoDB가 무시하므로 재기동에 안전합니다.
    pub async fn ensure_indexes(&self) -> AppResult<()> {
        for field in ["username", "email"] {
            let model = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();

            self.collection.create_index(model).await.map_err(|e| {
                AppError::DatabaseError(format!("{} 인덱스 생성 실패: {}", field, e))
            })?;
        }

        log::info!("✅ users 컬렉션 유니크 인덱스 준비 완료");
        Ok(())
    }

    fn parse_object_id(id: &str) -> AppResult<ObjectId> {
        ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("잘못된 사용자 ID 형식입니다".to_string()))
    }

    /// 유니크 인덱스 위반(E11000) 여부 판별
    fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
        match error.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == 11000,
            _ => false,
        }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! {
                "$or": [
                    { "username": username },
                    { "email": email }
                ]
            })
            .await
            .map_err(|e| AppError::DatabaseError(format!("사용자 조회 실패: {}", e)))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.collection
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(format!("사용자 조회 실패: {}", e)))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let object_id = Self::parse_object_id(id)?;

        self.collection
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(format!("사용자 조회 실패: {}", e)))
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        let result = self.collection.insert_one(&user).await.map_err(|e| {
            if Self::is_duplicate_key(&e) {
                AppError::ConflictError(
                    "User with email or username already exists".to_string(),
                )
            } else {
                AppError::DatabaseError(format!("사용자 생성 실패: {}", e))
            }
        })?;

        user.id = result.inserted_id.as_object_id();
        Ok(user)
    }

    async fn update_profile(&self, id: &str, patch: ProfilePatch) -> AppResult<User> {
        let object_id = Self::parse_object_id(id)?;

        let mut set_doc = doc! { "updated_at": DateTime::now() };
        if let Some(username) = patch.username {
            set_doc.insert("username", username);
        }
        if let Some(fullname) = patch.fullname {
            set_doc.insert("fullname", fullname);
        }
        if let Some(avatar) = patch.avatar {
            set_doc.insert("avatar", avatar);
        }
        if let Some(cover_image) = patch.cover_image {
            set_doc.insert("cover_image", cover_image);
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": object_id }, doc! { "$set": set_doc })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| {
                if Self::is_duplicate_key(&e) {
                    AppError::ConflictError("Username already in use".to_string())
                } else {
                    AppError::DatabaseError(format!("프로필 갱신 실패: {}", e))
                }
            })?;

        updated.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn set_refresh_token(&self, id: &str, token: Option<&str>) -> AppResult<()> {
        let object_id = Self::parse_object_id(id)?;

        let update = match token {
            Some(token) => doc! {
                "$set": {
                    "refresh_token": token,
                    "updated_at": DateTime::now()
                }
            },
            None => doc! {
                "$unset": { "refresh_token": Bson::String(String::new()) },
                "$set": { "updated_at": DateTime::now() }
            },
        };

        let result = self
            .collection
            .update_one(doc! { "_id": object_id }, update)
            .await
            .map_err(|e| AppError::DatabaseError(format!("리프레시 토큰 갱신 실패: {}", e)))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    async fn set_password_hash(&self, id: &str, password_hash: &str) -> AppResult<()> {
        let object_id = Self::parse_object_id(id)?;

        let result = self
            .collection
            .update_one(
                doc! { "_id": object_id },
                doc! {
                    "$set": {
                        "password_hash": password_hash,
                        "updated_at": DateTime::now()
                    }
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(format!("비밀번호 갱신 실패: {}", e)))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_rejects_malformed_input() {
        assert!(UserRepository::parse_object_id("not-an-oid").is_err());
        assert!(UserRepository::parse_object_id("").is_err());
    }

    #[test]
    fn test_parse_object_id_accepts_hex_form() {
        let oid = ObjectId::new();
        let parsed = UserRepository::parse_object_id(&oid.to_hex()).expect("valid oid");
        assert_eq!(parsed, oid);
    }
}
