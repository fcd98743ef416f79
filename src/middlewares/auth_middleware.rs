//! 인증 미들웨어 팩토리
//!
//! 보호된 라우트 스코프에 `wrap()`으로 끼워 넣는 Transform 구현입니다.
//! 실제 토큰 검증 로직은 [`auth_inner`](super::auth_inner)의 서비스에
//! 있습니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;

use crate::middlewares::auth_inner::AuthMiddlewareService;

/// 액세스 토큰 인증 미들웨어
///
/// 쿠키 또는 Authorization 헤더의 액세스 토큰을 검증하고, 성공 시
/// `AuthenticatedUser`를 요청 확장에 심습니다. 토큰이 없거나 유효하지
/// 않으면 핸들러에 도달하기 전에 401로 끝납니다.
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// 인증이 필수인 스코프용 미들웨어 생성
    pub fn required() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService::new(Rc::new(service))))
    }
}
