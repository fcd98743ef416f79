//! # 멀티파트 업로드 유틸리티
//!
//! `multipart/form-data` 요청을 텍스트 필드와 임시 파일로 분해합니다.
//! 파일 필드는 uuid 기반 이름으로 임시 디렉토리에 내려쓰고,
//! [`TempUpload`] 가드가 스코프를 벗어날 때 파일을 삭제합니다.
//! 업로드 성공/실패 어느 경로에서도 임시 파일이 남지 않습니다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::web;
use futures_util::StreamExt;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::errors::AppError;
use crate::utils::string_utils::{clean_optional_string, validate_required_string};

/// 임시 업로드 파일 가드
///
/// 드롭 시점에 디스크의 임시 파일을 제거합니다. 에셋 호스트 업로드가
/// 성공하든 중간에 에러로 반환되든 정리는 항상 일어납니다.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    original_name: String,
}

impl TempUpload {
    /// 디스크 상의 임시 파일 경로
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 클라이언트가 보낸 원본 파일명
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    #[cfg(test)]
    fn from_parts(path: PathBuf, original_name: String) -> Self {
        Self {
            path,
            original_name,
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("임시 업로드 파일 삭제 실패 {}: {}", self.path.display(), e);
            }
        }
    }
}

/// 파싱이 끝난 멀티파트 폼
///
/// 텍스트 필드와 파일 필드를 이름으로 조회할 수 있습니다.
#[derive(Debug, Default)]
pub struct ParsedForm {
    fields: HashMap<String, String>,
    files: HashMap<String, TempUpload>,
}

impl ParsedForm {
    /// 필수 텍스트 필드를 꺼냅니다. 없거나 공백이면 ValidationError.
    pub fn required_text(&self, name: &str) -> Result<String, AppError> {
        let value = self
            .fields
            .get(name)
            .ok_or_else(|| AppError::ValidationError(format!("{}은(는) 필수입니다", name)))?;
        validate_required_string(value, name)
    }

    /// 선택 텍스트 필드를 꺼냅니다. 없거나 공백이면 None.
    pub fn optional_text(&self, name: &str) -> Option<String> {
        clean_optional_string(self.fields.get(name).cloned())
    }

    /// 파일 필드의 소유권을 가져옵니다.
    pub fn take_file(&mut self, name: &str) -> Option<TempUpload> {
        self.files.remove(name)
    }

    #[cfg(test)]
    fn insert_text(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }
}

/// 파일명에서 경로 구분자 등 위험한 문자를 제거합니다.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// 멀티파트 페이로드를 텍스트 필드와 임시 파일로 분해합니다.
///
/// 파일 필드는 `{uuid}-{원본파일명}` 형태로 임시 디렉토리에 저장되며,
/// 필드당 `max_file_bytes`를 넘으면 ValidationError를 반환합니다.
/// 파일 쓰기는 블로킹 I/O이므로 워커 스레드풀로 넘깁니다.
pub async fn parse_multipart(
    mut payload: Multipart,
    config: &UploadConfig,
) -> Result<ParsedForm, AppError> {
    let mut form = ParsedForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| AppError::ValidationError(format!("잘못된 멀티파트 요청: {}", e)))?;

        let name = field.name().to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|f| f.to_string());

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|e| AppError::ValidationError(format!("멀티파트 읽기 실패: {}", e)))?;
            if bytes.len() + chunk.len() > config.max_file_bytes {
                return Err(AppError::ValidationError(format!(
                    "{} 필드가 허용된 크기를 초과했습니다",
                    name
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(original_name) if !original_name.trim().is_empty() => {
                if bytes.is_empty() {
                    // 빈 파일 파트는 필드가 안 온 것으로 취급
                    continue;
                }
                let temp_upload = persist_temp_file(config, &original_name, bytes).await?;
                form.files.insert(name, temp_upload);
            }
            _ => {
                let text = String::from_utf8(bytes).map_err(|_| {
                    AppError::ValidationError(format!("{} 필드가 올바른 UTF-8이 아닙니다", name))
                })?;
                form.fields.insert(name, text);
            }
        }
    }

    Ok(form)
}

/// 업로드된 바이트를 임시 디렉토리에 내려쓰고 가드를 반환합니다.
async fn persist_temp_file(
    config: &UploadConfig,
    original_name: &str,
    bytes: Vec<u8>,
) -> Result<TempUpload, AppError> {
    let sanitized = sanitize_filename(original_name);
    let path = config
        .temp_dir
        .join(format!("{}-{}", Uuid::new_v4(), sanitized));

    let write_path = path.clone();
    web::block(move || -> std::io::Result<()> {
        if let Some(parent) = write_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&write_path, &bytes)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("업로드 작업 실행 실패: {}", e)))?
    .map_err(|e| AppError::InternalError(format!("임시 파일 쓰기 실패: {}", e)))?;

    Ok(TempUpload {
        path,
        original_name: original_name.to_string(),
    })
}
