//! 데이터 스토어, 에셋 호스트, HTTP 서버 설정
//!
//! MongoDB 연결, 외부 이미지 호스트, 업로드 임시 디렉토리, 서버 바인딩 등
//! 인프라 측 설정을 담당합니다.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// MongoDB 연결 설정
#[derive(Debug, Clone)]
pub struct MongoConfig {
    /// MongoDB 연결 URI
    pub uri: String,
    /// 사용할 데이터베이스 이름
    pub database_name: String,
}

impl MongoConfig {
    /// 환경변수 `MONGODB_URI`, `DATABASE_NAME`에서 설정을 읽어옵니다.
    pub fn from_env() -> Self {
        Self {
            uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| "vidstream_dev".to_string()),
        }
    }
}

/// 외부 에셋 호스트 (이미지 업로드) 설정
///
/// 아바타/커버 이미지는 로컬에 저장하지 않고 외부 호스트에 업로드한 뒤
/// URL만 보관합니다. 업로드는 바운드된 타임아웃을 가집니다.
#[derive(Debug, Clone)]
pub struct AssetHostConfig {
    /// 업로드 엔드포인트 URL
    pub upload_url: String,
    /// API 키
    pub api_key: String,
    /// 업로드 요청 타임아웃
    pub timeout: Duration,
}

impl AssetHostConfig {
    /// 환경변수에서 에셋 호스트 설정을 읽어옵니다.
    ///
    /// * `ASSET_HOST_UPLOAD_URL` - 업로드 엔드포인트
    /// * `ASSET_HOST_API_KEY` - API 키
    /// * `ASSET_UPLOAD_TIMEOUT_SECS` - 타임아웃 (기본값: 30초)
    pub fn from_env() -> Self {
        let timeout_secs = env::var("ASSET_UPLOAD_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Self {
            upload_url: env::var("ASSET_HOST_UPLOAD_URL")
                .unwrap_or_else(|_| "http://localhost:9000/upload".to_string()),
            api_key: env::var("ASSET_HOST_API_KEY").unwrap_or_default(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// 멀티파트 업로드 처리 설정
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// 업로드 파일이 잠시 머무는 임시 디렉토리
    pub temp_dir: PathBuf,
    /// 파일 필드당 최대 허용 크기 (바이트)
    pub max_file_bytes: usize,
}

impl UploadConfig {
    /// 환경변수 `TEMP_UPLOAD_DIR`, `MAX_UPLOAD_BYTES`에서 설정을 읽어옵니다.
    pub fn from_env() -> Self {
        let max_file_bytes = env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5 * 1024 * 1024);

        Self {
            temp_dir: PathBuf::from(
                env::var("TEMP_UPLOAD_DIR").unwrap_or_else(|_| "./public/temp".to_string()),
            ),
            max_file_bytes,
        }
    }
}

/// HTTP 서버 설정 (바인딩 주소, 워커 수, Rate Limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub workers: usize,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst_size: u32,
}

impl ServerConfig {
    /// 환경변수에서 서버 설정을 읽어옵니다.
    ///
    /// * `BIND_ADDRESS` - 바인딩 주소 (기본값: 127.0.0.1:8080)
    /// * `SERVER_WORKERS` - 워커 스레드 수 (기본값: 4)
    /// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
    /// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            workers: env::var("SERVER_WORKERS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(4),
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(100),
            rate_limit_burst_size: env::var("RATE_LIMIT_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(200),
        }
    }
}
