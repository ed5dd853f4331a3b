//! # Pulse API
//!
//! 분석 서비스의 REST 표면입니다.
//!
//! - `POST /api/sentiment/analyze` - 기사 한 건의 심볼 감성 추출
//! - `POST /api/predict/price` - 심볼의 가격 방향 예측
//! - `GET /health` - 서비스/의존성 준비 상태
//!
//! 바이너리 엔트리포인트는 HTTP 서버와 함께 뉴스 큐 컨슈머를 백그라운드
//! 태스크로 기동합니다.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
