//! # Pulse AI
//!
//! 생성형 모델 기반 분석 레이어를 제공합니다.
//!
//! - **GeminiClient**: 모델 호출 (텍스트+설정 → 텍스트, 실패 가능,
//!   지연 존재, 비결정적) — 호출당 데드라인 적용
//! - **SentimentAnalyzer**: 기사 한 건당 한 번의 호출로 심볼별 감성 추출
//! - **PricePredictor**: 지표 + 감성 요약 → 프롬프트 → primary/fallback
//!   2단계 시도 → 검증된 가격 방향 예측

pub mod analyzer;
pub mod client;
pub mod error;
pub mod predictor;
pub mod prompts;

pub use analyzer::SentimentAnalyzer;
pub use client::{GeminiClient, GenerationRequest};
pub use error::AiError;
pub use predictor::{PredictError, PricePredictor};
