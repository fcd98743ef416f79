//! Database Connection Management Module
//!
//! MongoDB 데이터베이스 연결 관리를 담당하는 모듈입니다.
//! 연결 풀링과 연결 검증을 제공하며, 설정은 [`MongoConfig`]로 주입받습니다.
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use vidstream_backend::config::MongoConfig;
//! use vidstream_backend::db::Database;
//!
//! let database = Database::connect(&MongoConfig::from_env()).await?;
//! let users = database.get_database().collection::<User>("users");
//! ```

use log::info;
use mongodb::{options::ClientOptions, Client};

use crate::config::MongoConfig;

/// MongoDB 데이터베이스 연결 래퍼
///
/// MongoDB 클라이언트와 데이터베이스 연결을 관리하며,
/// 리포지토리 계층에서 데이터베이스 작업을 위한 기본 인터페이스를 제공합니다.
#[derive(Clone)]
pub struct Database {
    /// MongoDB 클라이언트 인스턴스
    client: Client,
    /// 사용할 데이터베이스 이름
    database_name: String,
}

impl Database {
    /// 새 MongoDB 데이터베이스 연결을 생성합니다.
    ///
    /// 주입받은 설정으로 MongoDB 클라이언트를 초기화하고,
    /// ping으로 연결 상태를 검증한 후 Database 인스턴스를 반환합니다.
    pub async fn connect(config: &MongoConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let mut client_options = ClientOptions::parse(&config.uri).await?;

        // 애플리케이션 이름 설정 (모니터링 및 로깅에 유용)
        client_options.app_name = Some("vidstream".to_string());

        let client = Client::with_options(client_options)?;

        // 연결 테스트
        client
            .database(&config.database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", config.database_name);

        Ok(Self {
            client,
            database_name: config.database_name.clone(),
        })
    }

    /// MongoDB 데이터베이스 인스턴스를 반환합니다.
    ///
    /// 리포지토리에서 컬렉션에 접근할 때 사용됩니다.
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }
}
