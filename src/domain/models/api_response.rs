//! 표준 성공 응답 봉투
//!
//! 모든 성공 응답은 `{statusCode, data, message, success: true}` 형태로
//! 내려갑니다. 에러 봉투는 `errors::AppError`의 `ResponseError` 구현이
//! 담당합니다.

use serde::Serialize;

/// API 성공 응답 봉투
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// 상태 코드를 지정한 성공 응답 생성
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: true,
        }
    }

    /// 200 OK 성공 응답 생성
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(200, data, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let response = ApiResponse::ok(
            serde_json::json!({ "username": "alice" }),
            "User registered successfully",
        );
        let json = serde_json::to_value(&response).expect("serialization");

        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "User registered successfully");
        assert_eq!(json["data"]["username"], "alice");
    }
}
