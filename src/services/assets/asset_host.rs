//! 외부 에셋 호스트 클라이언트
//!
//! 아바타/커버 이미지를 외부 이미지 호스트에 업로드하고 공개 URL을
//! 돌려받습니다. 이미지는 로컬에 남기지 않고 URL만 사용자 문서에
//! 저장합니다.
//!
//! 업로드는 타임아웃이 걸린 단일 HTTP 요청이며, 실패는 전부
//! `UploadError`(500)로 변환됩니다. 임시 파일 정리는 호출자가 쥐고 있는
//! `TempUpload` 가드의 몫입니다.

use std::path::Path;

use actix_web::web;
use serde::Deserialize;

use crate::config::AssetHostConfig;
use crate::errors::{AppError, AppResult};

/// 업로드 완료된 에셋 정보
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    /// 공개 접근 가능한 에셋 URL
    pub url: String,
    /// 호스트 측 에셋 식별자 (제공하지 않는 호스트도 있음)
    pub public_id: Option<String>,
}

/// 에셋 호스트 업로드 응답
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
    #[serde(rename = "publicId")]
    public_id: Option<String>,
}

/// 외부 에셋 호스트 HTTP 클라이언트
#[derive(Clone)]
pub struct AssetHostClient {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl AssetHostClient {
    /// 설정으로 클라이언트를 생성합니다.
    ///
    /// 업로드 타임아웃은 클라이언트 수준에서 고정됩니다.
    pub fn new(config: &AssetHostConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// 로컬 파일을 에셋 호스트에 업로드하고 공개 URL을 반환합니다.
    pub async fn upload(&self, path: &Path, original_name: &str) -> AppResult<UploadedAsset> {
        let read_path = path.to_path_buf();
        let bytes = web::block(move || std::fs::read(&read_path))
            .await
            .map_err(|e| AppError::InternalError(format!("업로드 작업 실행 실패: {}", e)))?
            .map_err(|e| AppError::UploadError(format!("업로드 파일 읽기 실패: {}", e)))?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(original_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::UploadError(format!("에셋 호스트 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::UploadError(format!(
                "에셋 호스트 응답 에러: {}",
                response.status()
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::UploadError(format!("에셋 호스트 응답 파싱 실패: {}", e)))?;

        log::info!("📦 에셋 업로드 완료: {}", body.url);

        Ok(UploadedAsset {
            url: body.url,
            public_id: body.public_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_response_parses_with_and_without_public_id() {
        let full: UploadResponse =
            serde_json::from_str(r#"{"url":"https://a/x.png","publicId":"x"}"#).unwrap();
        assert_eq!(full.url, "https://a/x.png");
        assert_eq!(full.public_id.as_deref(), Some("x"));

        let minimal: UploadResponse = serde_json::from_str(r#"{"url":"https://a/y.png"}"#).unwrap();
        assert!(minimal.public_id.is_none());
    }
}
