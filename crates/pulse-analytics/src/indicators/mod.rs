//! 기술적 지표 모듈.
//!
//! 예측 프롬프트에 들어가는 기술적 지표들을 제공합니다.
//! 테스트 재현성을 위해 알고리즘은 고정되어 있습니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (MA20 / MA50)
//! - **EMA**: 지수 이동평균 (재귀형, 첫 값으로 시드)
//! - **MACD**: 이동평균 수렴/확산 (12, 26, 9)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (14기간 단순 롤링 평균 방식)
//!
//! # 사용 예시
//!
//! ```ignore
//! use pulse_analytics::IndicatorEngine;
//!
//! let engine = IndicatorEngine::new();
//! let snapshot = engine.compute(&candles)?;
//! ```

pub mod momentum;
pub mod snapshot;
pub mod trend;

use thiserror::Error;

pub use momentum::{MomentumCalculator, RsiParams};
pub use snapshot::{IndicatorEngine, MIN_CANDLES};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("Insufficient data: need at least {required} candles, got {provided}")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;
