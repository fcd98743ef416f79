//! VidStream 사용자 계정 백엔드 메인 애플리케이션
//!
//! Actix-web 기반의 HTTP 서버를 구동하고 모든 서비스를 초기화합니다.
//! MongoDB 연결을 설정하고 JWT 인증 기반의 REST API를 제공합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use vidstream_backend::config::{
    AssetHostConfig, JwtConfig, MongoConfig, PasswordConfig, ServerConfig, UploadConfig,
};
use vidstream_backend::db::Database;
use vidstream_backend::repositories::UserRepository;
use vidstream_backend::routes::configure_all_routes;
use vidstream_backend::services::{AssetHostClient, TokenService, UserService};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 VidStream 계정 서비스 시작중...");

    let jwt_config = JwtConfig::from_env();
    let password_config = PasswordConfig::from_env();
    let mongo_config = MongoConfig::from_env();
    let asset_config = AssetHostConfig::from_env();
    let upload_config = UploadConfig::from_env();
    let server_config = ServerConfig::from_env();

    // 데이터 스토어 초기화
    info!("📡 데이터베이스 연결 중...");
    let database = Database::connect(&mongo_config)
        .await
        .expect("데이터베이스 연결 실패");

    let user_repository = UserRepository::new(&database);
    user_repository
        .ensure_indexes()
        .await
        .expect("유니크 인덱스 생성 실패");

    // 서비스 구성 (명시적 의존성 주입)
    let token_service = TokenService::new(&jwt_config);
    let asset_client = AssetHostClient::new(&asset_config).expect("에셋 클라이언트 생성 실패");
    let user_service = UserService::new(
        Arc::new(user_repository),
        token_service.clone(),
        password_config,
    );

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(
        server_config,
        upload_config,
        token_service,
        asset_client,
        user_service,
    )
    .await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// CORS, 로깅, 경로 정규화, Rate Limiting 미들웨어를 포함합니다.
async fn start_http_server(
    server_config: ServerConfig,
    upload_config: UploadConfig,
    token_service: TokenService,
    asset_client: AssetHostClient,
    user_service: UserService,
) -> std::io::Result<()> {
    let bind_address = server_config.bind_address.clone();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);
    info!("📍 API 엔드포인트: http://{}/api/v1/users", bind_address);

    // Rate Limiting 설정
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(server_config.rate_limit_per_second)
        .burst_size(server_config.rate_limit_burst_size)
        .use_headers()
        .finish()
        .expect("Rate Limiting 설정이 유효하지 않습니다");

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        server_config.rate_limit_per_second, server_config.rate_limit_burst_size
    );

    HttpServer::new(move || {
        let cors = configure_cors();

        App::new()
            // Rate Limiting 미들웨어 (가장 먼저 적용)
            .wrap(Governor::new(&governor_conf))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            // 공유 상태 등록
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(asset_client.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(upload_config.clone()))
            // 라우트 설정
            .configure(configure_all_routes)
    })
    .bind(&bind_address)?
    .workers(server_config.workers)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// PROFILE 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 `RUST_LOG`를 기반으로 로깅 레벨을 설정합니다.
/// 기본값은 info 레벨이며, actix_web은 debug 레벨로 설정됩니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정을 구성합니다
///
/// 개발용 로컬호스트 origin들과, `CORS_ORIGIN` 환경변수로 지정한
/// 프론트엔드 origin을 허용합니다. 쿠키 인증을 위해 자격 증명을
/// 지원합니다.
fn configure_cors() -> Cors {
    let mut cors = Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080")
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600);

    if let Ok(origin) = std::env::var("CORS_ORIGIN") {
        if !origin.trim().is_empty() {
            cors = cors.allowed_origin(origin.trim());
        }
    }

    cors
}
