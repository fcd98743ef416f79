//! 애플리케이션 설정 모듈
//!
//! 환경변수 기반 설정을 프로세스 시작 시점에 한 번 읽어 명시적인 설정
//! 구조체로 고정합니다. 각 서비스는 필요한 설정을 생성자로 주입받으며,
//! 요청 처리 중에 환경변수를 다시 읽지 않습니다.

pub mod auth_config;
pub mod data_config;

pub use auth_config::{JwtConfig, PasswordConfig};
pub use data_config::{AssetHostConfig, MongoConfig, ServerConfig, UploadConfig};
