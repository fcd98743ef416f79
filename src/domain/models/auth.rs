//! 인증된 사용자 모델
//!
//! 인증 미들웨어가 요청 확장(extensions)에 심어주는 신원 정보입니다.
//! 핸들러는 `FromRequest` 구현을 통해 인자로 바로 추출할 수 있습니다.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};

use crate::errors::AppError;

/// 액세스 토큰 검증을 통과한 요청의 신원 정보
///
/// 액세스 토큰의 클레임에서 복원되며, 영속 상태와는 대조되지 않습니다.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// 사용자 ID (MongoDB ObjectId 문자열)
    pub user_id: String,
    /// 사용자 이름
    pub username: String,
    /// 사용자 이메일
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// 미들웨어가 심어놓은 신원 정보를 추출합니다.
    ///
    /// `AuthMiddleware`를 거치지 않은 라우트에서 추출을 시도하면
    /// 401 응답으로 이어집니다.
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();

        ready(user.ok_or_else(|| {
            AppError::AuthenticationError("인증 정보가 없습니다".to_string()).into()
        }))
    }
}
