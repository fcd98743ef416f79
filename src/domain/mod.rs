//! 도메인 계층
//!
//! 엔티티, 요청/응답 DTO, 그리고 토큰/인증 모델을 담는 모듈입니다.

pub mod dto;
pub mod entities;
pub mod models;

pub use dto::users::request::{ChangePasswordRequest, LoginRequest, RefreshRequest};
pub use dto::users::response::{LoginResponse, UserResponse};
pub use models::api_response::ApiResponse;
pub use models::auth::AuthenticatedUser;
pub use models::token::{AccessClaims, RefreshClaims, TokenPair};
