//! 사용자 계정/세션 HTTP 핸들러
//!
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환합니다. 성공은
//! `ApiResponse` 봉투로, 실패는 `AppError`의 `ResponseError` 구현이 만드는
//! 에러 봉투로 내려갑니다.
//!
//! 토큰은 응답 바디와 함께 `accessToken`/`refreshToken` 쿠키로도 실립니다.
//! 두 쿠키 모두 HttpOnly + Secure + SameSite=Lax입니다.

use actix_multipart::Multipart;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::UploadConfig;
use crate::domain::{
    ApiResponse, AuthenticatedUser, ChangePasswordRequest, LoginRequest, RefreshRequest,
};
use crate::errors::AppError;
use crate::middlewares::auth_inner::ACCESS_TOKEN_COOKIE;
use crate::repositories::ProfilePatch;
use crate::services::users::RegisterInput;
use crate::services::{AssetHostClient, UserService};
use crate::utils::upload::{parse_multipart, TempUpload};

/// 리프레시 토큰이 실리는 쿠키 이름
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// 인증 토큰 쿠키 생성 (HttpOnly + Secure + SameSite=Lax)
fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// 인증 토큰 쿠키 제거용 쿠키 생성
fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// 업로드 파일을 에셋 호스트에 올리고 URL을 반환합니다.
async fn upload_asset(assets: &AssetHostClient, file: &TempUpload) -> Result<String, AppError> {
    let uploaded = assets.upload(file.path(), file.original_name()).await?;
    Ok(uploaded.url)
}

/// POST /api/v1/users/register
///
/// 멀티파트 폼으로 계정 정보와 이미지를 받습니다. 아바타는 필수,
/// 커버 이미지는 선택입니다. 이미지 업로드가 모두 성공한 뒤에야 사용자를
/// 저장하므로 업로드 실패 시 부분 상태가 남지 않습니다.
pub async fn register(
    payload: Multipart,
    upload_config: web::Data<UploadConfig>,
    assets: web::Data<AssetHostClient>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let mut form = parse_multipart(payload, &upload_config).await?;

    let username = form.required_text("username")?;
    let email = form.required_text("email")?;
    let fullname = form.required_text("fullname")?;
    let password = form.required_text("password")?;

    // 임시 파일 가드: 핸들러를 어떤 경로로 빠져나가도 삭제된다
    let avatar = form
        .take_file("avatar")
        .ok_or_else(|| AppError::ValidationError("Avatar file is required".to_string()))?;
    let cover = form.take_file("coverimage");

    // 400/409로 끝날 요청이 에셋 호스트에 고아 이미지를 남기지 않도록
    // 업로드 전에 검증과 중복 확인을 마친다
    users
        .precheck_registration(&username, &email, &fullname, &password)
        .await?;

    let avatar_url = upload_asset(&assets, &avatar).await?;
    let cover_image_url = match &cover {
        Some(file) => Some(upload_asset(&assets, file).await?),
        None => None,
    };

    let user = users
        .register(RegisterInput {
            username,
            email,
            fullname,
            password,
            avatar_url,
            cover_image_url,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(user, "User registered successfully")))
}

/// POST /api/v1/users/login
pub async fn login(
    request: web::Json<LoginRequest>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let response = users.login(request.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(
            ACCESS_TOKEN_COOKIE,
            response.access_token.clone(),
        ))
        .cookie(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            response.refresh_token.clone(),
        ))
        .json(ApiResponse::ok(response, "User logged in successfully")))
}

/// GET /api/v1/users/refresh
///
/// 리프레시 토큰은 쿠키에서 우선 읽고, 없으면 JSON 바디의 `refreshToken`
/// 필드로 폴백합니다. 성공 시 새 토큰 쌍이 쿠키와 바디 양쪽에 실립니다.
pub async fn refresh(
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let presented = req
        .cookie(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| body.and_then(|json| json.into_inner().refresh_token))
        .ok_or_else(|| {
            AppError::AuthenticationError("리프레시 토큰이 없습니다".to_string())
        })?;

    let pair = users.refresh_session(&presented).await?;

    Ok(HttpResponse::Ok()
        .cookie(auth_cookie(ACCESS_TOKEN_COOKIE, pair.access_token.clone()))
        .cookie(auth_cookie(
            REFRESH_TOKEN_COOKIE,
            pair.refresh_token.clone(),
        ))
        .json(ApiResponse::ok(pair, "Access token refreshed")))
}

/// POST /api/v1/users/logout
///
/// 저장된 리프레시 토큰을 제거하고 양쪽 쿠키를 만료시킵니다.
pub async fn logout(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    users.logout(&user.user_id).await?;

    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(ACCESS_TOKEN_COOKIE))
        .cookie(removal_cookie(REFRESH_TOKEN_COOKIE))
        .json(ApiResponse::ok(
            serde_json::json!({}),
            "User logged out successfully",
        )))
}

/// POST /api/v1/users/change-password
pub async fn change_password(
    user: AuthenticatedUser,
    request: web::Json<ChangePasswordRequest>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    users
        .change_password(&user.user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    )))
}

/// GET /api/v1/users/profile
pub async fn profile(
    user: AuthenticatedUser,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let response = users.current_profile(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response, "User fetched successfully")))
}

/// GET /api/v1/users/profile/{username}
pub async fn channel_profile(
    path: web::Path<String>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let response = users.channel_profile(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response, "Channel fetched successfully")))
}

/// POST /api/v1/users/update-profile
///
/// 멀티파트 폼으로 전달된 필드만 갱신합니다. 텍스트 필드(newUsername,
/// newFullname)와 이미지 필드(avatar, coverimage) 모두 선택이지만,
/// 최소 한 필드는 있어야 합니다.
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: Multipart,
    upload_config: web::Data<UploadConfig>,
    assets: web::Data<AssetHostClient>,
    users: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let mut form = parse_multipart(payload, &upload_config).await?;

    let mut patch = ProfilePatch {
        username: form.optional_text("newUsername"),
        fullname: form.optional_text("newFullname"),
        ..Default::default()
    };

    let avatar = form.take_file("avatar");
    let cover = form.take_file("coverimage");

    if let Some(file) = &avatar {
        patch.avatar = Some(upload_asset(&assets, file).await?);
    }
    if let Some(file) = &cover {
        patch.cover_image = Some(upload_asset(&assets, file).await?);
    }

    let response = users.update_profile(&user.user_id, patch).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response, "Profile updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_cookie_attributes() {
        let cookie = auth_cookie(ACCESS_TOKEN_COOKIE, "token-value".to_string());

        assert_eq!(cookie.name(), "accessToken");
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(REFRESH_TOKEN_COOKIE);

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        // make_removal은 과거 만료 시각을 심는다
        assert!(cookie.expires().is_some());
    }
}
