//! VidStream 사용자 계정 백엔드
//!
//! 비디오 플랫폼을 위한 사용자 계정/세션 관리 서비스입니다.
//! JWT 이중 토큰(액세스/리프레시) 인증, bcrypt 비밀번호 해싱,
//! 외부 에셋 호스트 기반 프로필 이미지 업로드를 제공합니다.
//!
//! # Features
//!
//! - **회원가입**: 멀티파트 업로드(아바타/커버) + 계정 생성 원자적 처리
//! - **JWT 인증**: 액세스/리프레시 토큰, 사용 즉시 회전되는 리프레시 토큰
//! - **세션 관리**: 로그인/로그아웃/토큰 갱신, 쿠키 + Bearer 헤더 동시 지원
//! - **프로필**: 조회/부분 갱신, 비밀번호 변경
//! - **MongoDB**: 유니크 인덱스 기반 계정 중복 방지
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 멀티파트 파싱, 쿠키 발급, 응답 봉투
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 세션/토큰/업로드 비즈니스 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← CredentialStore 트레이트 + MongoDB 구현
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     MongoDB     │ ← 사용자 문서 저장소
//! └─────────────────┘
//! ```

pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
