//! 인증 미들웨어 내부 서비스
//!
//! 요청마다 액세스 토큰을 찾아 검증합니다. 토큰은 `accessToken` 쿠키를
//! 우선 확인하고, 없으면 `Authorization: Bearer` 헤더로 폴백합니다.
//! 검증에 성공하면 클레임에서 복원한 [`AuthenticatedUser`]를 요청 확장에
//! 넣어 핸들러가 추출할 수 있게 합니다.

use std::rc::Rc;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::auth::TokenService;

/// 액세스 토큰이 실리는 쿠키 이름
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// 인증 미들웨어의 요청 처리 서비스
pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> AuthMiddlewareService<S> {
    pub(crate) fn new(service: Rc<S>) -> Self {
        Self { service }
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token_service = req
                .app_data::<web::Data<TokenService>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalError("토큰 서비스가 등록되지 않았습니다".to_string())
                })?;

            let token = extract_access_token(req.request()).ok_or_else(|| {
                AppError::AuthenticationError("인증 토큰이 없습니다".to_string())
            })?;

            let claims = token_service.verify_access(&token)?;

            req.extensions_mut().insert(AuthenticatedUser {
                user_id: claims.sub,
                username: claims.username,
                email: claims.email,
            });

            service.call(req).await
        })
    }
}

/// 요청에서 액세스 토큰을 찾습니다. 쿠키 우선, 헤더 폴백.
fn extract_access_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(ACCESS_TOKEN_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}
