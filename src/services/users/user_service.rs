//! 사용자 계정/세션 서비스
//!
//! 회원가입, 로그인, 토큰 갱신, 로그아웃, 비밀번호 변경, 프로필 조회/갱신의
//! 비즈니스 로직입니다. 영속 계층은 [`CredentialStore`] 트레이트로만
//! 접근하므로 MongoDB 없이도 전 흐름을 테스트할 수 있습니다.
//!
//! ## 리프레시 토큰 회전
//!
//! 사용자 문서에는 항상 최근 발급된 리프레시 토큰 하나만 저장됩니다.
//! 갱신 요청은 제출된 토큰이 저장된 토큰과 정확히 일치할 때만 성공하며,
//! 성공 즉시 새 토큰으로 덮어씁니다. 따라서 한 번 사용된(회전된) 토큰은
//! 만료 전이라도 재사용할 수 없습니다.

use std::sync::Arc;

use actix_web::web;
use validator::{Validate, ValidateEmail};

use crate::config::PasswordConfig;
use crate::domain::entities::users::User;
use crate::domain::{ChangePasswordRequest, LoginRequest, LoginResponse, TokenPair, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::repositories::{CredentialStore, ProfilePatch};
use crate::services::auth::password;
use crate::services::auth::TokenService;
use crate::utils::string_utils::normalize_identifier;

/// 회원가입 입력
///
/// 핸들러가 멀티파트 폼을 파싱하고 이미지를 에셋 호스트에 올린 뒤,
/// 업로드된 URL과 함께 전달합니다.
#[derive(Debug)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password: String,
    pub avatar_url: String,
    pub cover_image_url: Option<String>,
}

/// 사용자 계정/세션 서비스
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn CredentialStore>,
    token_service: TokenService,
    password_config: PasswordConfig,
}

impl UserService {
    /// 의존성을 주입받아 서비스를 생성합니다.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        token_service: TokenService,
        password_config: PasswordConfig,
    ) -> Self {
        Self {
            store,
            token_service,
            password_config,
        }
    }

    /// 회원가입 사전 검사
    ///
    /// 필드 검증과 중복 계정 확인만 수행합니다. 핸들러는 이미지를 에셋
    /// 호스트에 올리기 **전에** 이 검사를 거쳐야 합니다. 400/409로 끝날
    /// 가입 시도가 외부 호스트에 고아 이미지를 남기면 안 됩니다.
    pub async fn precheck_registration(
        &self,
        username: &str,
        email: &str,
        fullname: &str,
        password: &str,
    ) -> AppResult<()> {
        let (username, email, _) = validate_registration_fields(username, email, fullname, password)?;

        if self
            .store
            .find_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Err(AppError::ConflictError(
                "User with email or username already exists".to_string(),
            ));
        }
        Ok(())
    }

    /// 회원가입
    ///
    /// username/email/fullname을 소문자로 정규화하고, 중복 계정을 사전 확인한 뒤
    /// 비밀번호를 해싱해 저장합니다. 스토어의 유니크 제약이 경합 상황의
    /// 최종 방어선입니다.
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserResponse> {
        let (username, email, fullname) = validate_registration_fields(
            &input.username,
            &input.email,
            &input.fullname,
            &input.password,
        )?;

        if self
            .store
            .find_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Err(AppError::ConflictError(
                "User with email or username already exists".to_string(),
            ));
        }

        let password_hash = self.hash_on_worker(input.password).await?;

        let user = User::new(
            username,
            email,
            fullname,
            password_hash,
            input.avatar_url,
            input.cover_image_url,
        );

        let created = self.store.create(user).await?;
        log::info!("✅ 신규 사용자 등록: {}", created.username);

        Ok(UserResponse::from(created))
    }

    /// 로그인
    ///
    /// username 또는 email로 사용자를 찾아 비밀번호를 대조하고,
    /// 성공 시 토큰 쌍을 발급하며 리프레시 토큰을 저장합니다.
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let identifier = request
            .identifier()
            .map(normalize_identifier)
            .ok_or_else(|| {
                AppError::ValidationError("username or email is required".to_string())
            })?;

        let user = self
            .store
            .find_by_username_or_email(&identifier, &identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        let matched = self
            .verify_on_worker(request.password, user.password_hash.clone())
            .await?;
        if !matched {
            return Err(AppError::AuthenticationError(
                "Invalid user credentials".to_string(),
            ));
        }

        let pair = self.token_service.issue_pair(&user)?;
        let user_id = user
            .id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        self.store
            .set_refresh_token(&user_id, Some(&pair.refresh_token))
            .await?;

        log::info!("🔓 로그인 성공: {}", user.username);

        Ok(LoginResponse::new(
            user,
            pair.access_token,
            pair.refresh_token,
        ))
    }

    /// 토큰 갱신 (리프레시 토큰 회전)
    ///
    /// 제출된 토큰의 서명/만료를 확인한 뒤 저장된 토큰과 정확히 일치하는지
    /// 대조합니다. 일치하면 새 토큰 쌍을 발급하고 저장 토큰을 덮어씁니다.
    pub async fn refresh_session(&self, presented: &str) -> AppResult<TokenPair> {
        let claims = self.token_service.verify_refresh(presented)?;

        let user = self
            .store
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        // 저장된 토큰과의 완전 일치가 회전의 핵심 검사다
        match user.refresh_token.as_deref() {
            Some(stored) if stored == presented => {}
            _ => {
                return Err(AppError::AuthenticationError(
                    "Refresh token is expired or used".to_string(),
                ));
            }
        }

        let pair = self.token_service.issue_pair(&user)?;
        self.store
            .set_refresh_token(&claims.sub, Some(&pair.refresh_token))
            .await?;

        Ok(pair)
    }

    /// 로그아웃 (저장된 리프레시 토큰 제거)
    ///
    /// 이후의 갱신 시도는 모두 거부됩니다. 이미 발급된 액세스 토큰은
    /// 남은 수명 동안 유효합니다.
    pub async fn logout(&self, user_id: &str) -> AppResult<()> {
        self.store.set_refresh_token(user_id, None).await
    }

    /// 비밀번호 변경
    ///
    /// 기존 비밀번호 대조에 성공해야만 새 해시로 교체합니다.
    pub async fn change_password(
        &self,
        user_id: &str,
        request: ChangePasswordRequest,
    ) -> AppResult<()> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let matched = self
            .verify_on_worker(request.old_password, user.password_hash.clone())
            .await?;
        if !matched {
            return Err(AppError::AuthenticationError(
                "Invalid old password".to_string(),
            ));
        }

        let new_hash = self.hash_on_worker(request.new_password).await?;
        self.store.set_password_hash(user_id, &new_hash).await?;

        log::info!("🔐 비밀번호 변경 완료: {}", user.username);
        Ok(())
    }

    /// 현재 사용자 프로필 조회
    pub async fn current_profile(&self, user_id: &str) -> AppResult<UserResponse> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// username으로 채널 프로필 조회
    pub async fn channel_profile(&self, username: &str) -> AppResult<UserResponse> {
        let username = normalize_identifier(username);
        if username.is_empty() {
            return Err(AppError::ValidationError(
                "username은(는) 필수입니다".to_string(),
            ));
        }

        self.store
            .find_by_username(&username)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("Channel does not exist".to_string()))
    }

    /// 프로필 갱신
    ///
    /// 전달된 필드만 갱신합니다. 새 username은 소문자로 정규화되며,
    /// 다른 계정과의 충돌은 스토어의 유니크 제약이 잡아냅니다.
    pub async fn update_profile(
        &self,
        user_id: &str,
        mut patch: ProfilePatch,
    ) -> AppResult<UserResponse> {
        if patch.is_empty() {
            return Err(AppError::ValidationError(
                "갱신할 필드가 없습니다".to_string(),
            ));
        }

        if let Some(username) = patch.username.take() {
            let username = normalize_identifier(&username);
            if username.is_empty() {
                return Err(AppError::ValidationError(
                    "username은(는) 필수입니다".to_string(),
                ));
            }
            patch.username = Some(username);
        }

        if let Some(fullname) = patch.fullname.take() {
            let fullname = normalize_identifier(&fullname);
            if fullname.is_empty() {
                return Err(AppError::ValidationError(
                    "fullname은(는) 필수입니다".to_string(),
                ));
            }
            patch.fullname = Some(fullname);
        }

        let updated = self.store.update_profile(user_id, patch).await?;
        Ok(UserResponse::from(updated))
    }

    /// bcrypt 해싱을 워커 스레드풀에서 수행합니다.
    async fn hash_on_worker(&self, password: String) -> AppResult<String> {
        let config = self.password_config;
        web::block(move || password::hash_password(&password, &config))
            .await
            .map_err(|e| AppError::InternalError(format!("해싱 작업 실행 실패: {}", e)))?
    }

    /// bcrypt 검증을 워커 스레드풀에서 수행합니다.
    async fn verify_on_worker(&self, password: String, hash: String) -> AppResult<bool> {
        web::block(move || password::verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::InternalError(format!("검증 작업 실행 실패: {}", e)))?
    }
}

/// 회원가입 필드 검증 및 정규화
///
/// 검증에 통과하면 (username, email, fullname)을 소문자 정규화된 형태로
/// 반환합니다. 사전 검사와 실제 가입이 같은 규칙을 공유합니다.
fn validate_registration_fields(
    username: &str,
    email: &str,
    fullname: &str,
    password: &str,
) -> AppResult<(String, String, String)> {
    let username = normalize_identifier(username);
    let email = normalize_identifier(email);
    let fullname = normalize_identifier(fullname);

    if username.is_empty() || email.is_empty() || fullname.is_empty() {
        return Err(AppError::ValidationError(
            "All fields are required".to_string(),
        ));
    }
    if !email.validate_email() {
        return Err(AppError::ValidationError(
            "유효한 이메일 주소가 아닙니다".to_string(),
        ));
    }
    if password.len() < 8 {
        return Err(AppError::ValidationError(
            "비밀번호는 8자 이상이어야 합니다".to_string(),
        ));
    }

    Ok((username, email, fullname))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use async_trait::async_trait;
    use mongodb::bson::oid::ObjectId;
    use std::sync::Mutex;

    /// MongoDB 없이 세션 흐름을 검증하기 위한 인메모리 스토어
    #[derive(Default)]
    struct InMemoryStore {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl CredentialStore for InMemoryStore {
        async fn find_by_username_or_email(
            &self,
            username: &str,
            email: &str,
        ) -> AppResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| u.username == username || u.email == email)
                .cloned())
        }

        async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.username == username).cloned())
        }

        async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
            let users = self.users.lock().unwrap();
            Ok(users
                .iter()
                .find(|u| u.id_string().as_deref() == Some(id))
                .cloned())
        }

        async fn create(&self, mut user: User) -> AppResult<User> {
            let mut users = self.users.lock().unwrap();
            if users
                .iter()
                .any(|u| u.username == user.username || u.email == user.email)
            {
                return Err(AppError::ConflictError("duplicate user".to_string()));
            }
            user.id = Some(ObjectId::new());
            users.push(user.clone());
            Ok(user)
        }

        async fn update_profile(&self, id: &str, patch: ProfilePatch) -> AppResult<User> {
            let mut users = self.users.lock().unwrap();
            if let Some(username) = patch.username.as_deref() {
                if users
                    .iter()
                    .any(|u| u.username == username && u.id_string().as_deref() != Some(id))
                {
                    return Err(AppError::ConflictError("username in use".to_string()));
                }
            }
            let user = users
                .iter_mut()
                .find(|u| u.id_string().as_deref() == Some(id))
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

            if let Some(username) = patch.username {
                user.username = username;
            }
            if let Some(fullname) = patch.fullname {
                user.fullname = fullname;
            }
            if let Some(avatar) = patch.avatar {
                user.avatar = avatar;
            }
            if let Some(cover_image) = patch.cover_image {
                user.cover_image = Some(cover_image);
            }
            Ok(user.clone())
        }

        async fn set_refresh_token(&self, id: &str, token: Option<&str>) -> AppResult<()> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id_string().as_deref() == Some(id))
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
            user.refresh_token = token.map(|t| t.to_string());
            Ok(())
        }

        async fn set_password_hash(&self, id: &str, password_hash: &str) -> AppResult<()> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id_string().as_deref() == Some(id))
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
            user.password_hash = password_hash.to_string();
            Ok(())
        }
    }

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_ttl_minutes: 60,
            refresh_ttl_days: 10,
        }
    }

    fn test_service() -> UserService {
        UserService::new(
            Arc::new(InMemoryStore::default()),
            TokenService::new(&jwt_config()),
            PasswordConfig { cost: 4 },
        )
    }

    fn alice_input() -> RegisterInput {
        RegisterInput {
            username: "Alice".to_string(),
            email: "Alice@X.Com".to_string(),
            fullname: "Alice Kim".to_string(),
            password: "p@ssw0rd123".to_string(),
            avatar_url: "https://assets.example/avatar.png".to_string(),
            cover_image_url: None,
        }
    }

    fn login_as(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            email: None,
            password: password.to_string(),
        }
    }

    #[actix_web::test]
    async fn test_register_normalizes_identifiers() {
        let service = test_service();

        let response = service.register(alice_input()).await.unwrap();

        assert_eq!(response.username, "alice");
        assert_eq!(response.email, "alice@x.com");
        assert_eq!(response.fullname, "alice kim");
    }

    #[actix_web::test]
    async fn test_register_duplicate_is_conflict() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();

        let error = service.register(alice_input()).await.unwrap_err();

        assert!(matches!(error, AppError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn test_register_rejects_bad_input() {
        let service = test_service();

        let short_password = RegisterInput {
            password: "short".to_string(),
            ..alice_input()
        };
        assert!(matches!(
            service.register(short_password).await.unwrap_err(),
            AppError::ValidationError(_)
        ));

        let bad_email = RegisterInput {
            email: "not-an-email".to_string(),
            ..alice_input()
        };
        assert!(matches!(
            service.register(bad_email).await.unwrap_err(),
            AppError::ValidationError(_)
        ));
    }

    #[actix_web::test]
    async fn test_login_issues_tokens_and_persists_refresh() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();

        let response = service.login(login_as("alice", "p@ssw0rd123")).await.unwrap();

        assert!(!response.access_token.is_empty());
        assert!(!response.refresh_token.is_empty());
        // 갱신이 곧장 성공해야 한다 (저장된 토큰과 일치)
        service.refresh_session(&response.refresh_token).await.unwrap();
    }

    #[actix_web::test]
    async fn test_login_case_insensitive_identifier() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();

        let response = service.login(login_as("ALICE", "p@ssw0rd123")).await.unwrap();

        assert_eq!(response.user.username, "alice");
    }

    #[actix_web::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();

        let error = service
            .login(login_as("alice", "wrong-password"))
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::AuthenticationError(_)));
    }

    #[actix_web::test]
    async fn test_login_unknown_user_is_not_found() {
        let service = test_service();

        let error = service
            .login(login_as("nobody", "p@ssw0rd123"))
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_refresh_rotation_invalidates_previous_token() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();
        let login = service.login(login_as("alice", "p@ssw0rd123")).await.unwrap();

        let rotated = service.refresh_session(&login.refresh_token).await.unwrap();
        assert_ne!(rotated.refresh_token, login.refresh_token);

        // 회전된 이전 토큰은 만료 전이라도 재사용할 수 없다
        let error = service
            .refresh_session(&login.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::AuthenticationError(_)));

        // 새 토큰은 계속 유효하다
        service.refresh_session(&rotated.refresh_token).await.unwrap();
    }

    #[actix_web::test]
    async fn test_logout_blocks_further_refresh() {
        let service = test_service();
        let user = service.register(alice_input()).await.unwrap();
        let login = service.login(login_as("alice", "p@ssw0rd123")).await.unwrap();

        service.logout(&user.id).await.unwrap();

        let error = service
            .refresh_session(&login.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::AuthenticationError(_)));
    }

    #[actix_web::test]
    async fn test_refresh_unknown_subject_is_not_found() {
        let service = test_service();
        let tokens = TokenService::new(&jwt_config());

        // 서명은 유효하지만 어떤 사용자와도 연결되지 않은 토큰
        let orphan = tokens.issue_refresh(&ObjectId::new().to_hex()).unwrap();

        let error = service.refresh_session(&orphan).await.unwrap_err();

        assert!(matches!(error, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn test_precheck_registration_gates_bad_and_duplicate_input() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();

        // 유효한 신규 계정은 통과
        service
            .precheck_registration("bob", "bob@x.com", "Bob Park", "p@ssw0rd123")
            .await
            .unwrap();

        // 중복 계정은 업로드 단계에 도달하기 전에 409
        let duplicate = service
            .precheck_registration("alice", "new@x.com", "Alice Kim", "p@ssw0rd123")
            .await
            .unwrap_err();
        assert!(matches!(duplicate, AppError::ConflictError(_)));

        // 필드 검증도 같은 단계에서 걸러진다
        let short_password = service
            .precheck_registration("bob", "bob@x.com", "Bob Park", "short")
            .await
            .unwrap_err();
        assert!(matches!(short_password, AppError::ValidationError(_)));

        let bad_email = service
            .precheck_registration("bob", "not-an-email", "Bob Park", "p@ssw0rd123")
            .await
            .unwrap_err();
        assert!(matches!(bad_email, AppError::ValidationError(_)));
    }

    #[actix_web::test]
    async fn test_refresh_rejects_garbage_token() {
        let service = test_service();

        let error = service.refresh_session("not.a.jwt").await.unwrap_err();

        assert!(matches!(error, AppError::AuthenticationError(_)));
    }

    #[actix_web::test]
    async fn test_change_password_requires_correct_old_password() {
        let service = test_service();
        let user = service.register(alice_input()).await.unwrap();

        let error = service
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "wrong".to_string(),
                    new_password: "new-password-1".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::AuthenticationError(_)));
    }

    #[actix_web::test]
    async fn test_change_password_switches_login_credential() {
        let service = test_service();
        let user = service.register(alice_input()).await.unwrap();

        service
            .change_password(
                &user.id,
                ChangePasswordRequest {
                    old_password: "p@ssw0rd123".to_string(),
                    new_password: "new-password-1".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(service.login(login_as("alice", "p@ssw0rd123")).await.is_err());
        service
            .login(login_as("alice", "new-password-1"))
            .await
            .unwrap();
    }

    #[actix_web::test]
    async fn test_update_profile_partial_patch() {
        let service = test_service();
        let user = service.register(alice_input()).await.unwrap();

        let updated = service
            .update_profile(
                &user.id,
                ProfilePatch {
                    fullname: Some("Alice Lee".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.fullname, "alice lee");
        assert_eq!(updated.email, "alice@x.com");
    }

    #[actix_web::test]
    async fn test_update_profile_rejects_empty_patch() {
        let service = test_service();
        let user = service.register(alice_input()).await.unwrap();

        assert!(matches!(
            service
                .update_profile(&user.id, ProfilePatch::default())
                .await
                .unwrap_err(),
            AppError::ValidationError(_)
        ));
    }

    #[actix_web::test]
    async fn test_update_profile_username_change_and_conflict() {
        let service = test_service();
        let alice = service.register(alice_input()).await.unwrap();
        service
            .register(RegisterInput {
                username: "bob".to_string(),
                email: "bob@x.com".to_string(),
                ..alice_input()
            })
            .await
            .unwrap();

        let updated = service
            .update_profile(
                &alice.id,
                ProfilePatch {
                    username: Some("Alicia".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.username, "alicia");

        // 다른 계정이 쓰는 username으로는 바꿀 수 없다
        let error = service
            .update_profile(
                &alice.id,
                ProfilePatch {
                    username: Some("bob".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::ConflictError(_)));
    }

    #[actix_web::test]
    async fn test_channel_profile_lookup() {
        let service = test_service();
        service.register(alice_input()).await.unwrap();

        let profile = service.channel_profile("Alice").await.unwrap();
        assert_eq!(profile.username, "alice");

        let error = service.channel_profile("ghost").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound(_)));
    }
}
