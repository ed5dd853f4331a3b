//! 모델 호출에 사용되는 고정 프롬프트.
//!
//! 시스템 지시문은 호출 종류별로 고정되어 있고, 예측 사용자 프롬프트는
//! 필드 순서와 라벨이 고정된 결정적 텍스트입니다. 동일한 지표/감성
//! 입력이면 항상 동일한 프롬프트가 생성됩니다.

use rust_decimal::Decimal;

use pulse_core::domain::{NewsArticle, SentimentSummary, TechnicalIndicators};
use pulse_core::types::Symbol;

/// 감성 추출용 시스템 지시문.
pub const SENTIMENT_SYSTEM_INSTRUCTION: &str = r#"You are a financial market impact analyst.

Your task is to analyze the following news article and identify ONLY the financial symbols that are likely to experience a MEANINGFUL SHORT-TERM PRICE IMPACT.

You are NOT analyzing emotional tone or general sentiment.
You are predicting BUY or SELL PRESSURE relevant to market participants.

Instructions:

1. SYMBOL SELECTION (CRITICAL):
   - Identify ONLY publicly traded symbols (stocks, ETFs, crypto, indices) for which the news creates a plausible short-term market reaction.
   - EXCLUDE symbols that are mentioned only for background, historical reference, or general context.
   - Ignore private companies and non-tradable entities.

2. IMPACT TYPE CLASSIFICATION:
   For each selected symbol, classify the type of impact:
   - "direct": News directly affects the company's fundamentals, valuation, or outlook.
   - "sector": Indirect read-through from industry or peer developments.
   - "contextual": Mentioned only for narrative or illustration (use sparingly).

3. MARKET IMPACT VS. EMOTION:
   - Distinguish societal or reputational negativity from actual market impact.
   - Consider whether the information is new or already priced in.
   - If no new tradable information is present, assign Neutral (0.0).

4. SCORING:
   - Assign a score between -1.0 and +1.0:
     +1.0 = Strong Buy Pressure
      0.0 = Neutral / No material impact
     -1.0 = Strong Sell Pressure
   - Scores with |score| >= 0.7 MUST be supported by a clear catalyst:
     earnings surprise, guidance change, regulation, M&A, product launch, or legal ruling.

5. TIME HORIZON:
   - Focus strictly on short-term price action (next 1-5 trading days).

6. RATIONALE:
   - Provide ONE concise sentence explaining WHY the price may move.
   - Focus on supply/demand or valuation logic.

Return STRICTLY valid JSON.
Do NOT include any explanation outside the JSON.

Output format:
{
  "symbols": [
    {
      "symbol": "string",
      "category": "Bullish" | "Bearish" | "Neutral",
      "score": number,
      "impact_type": "direct" | "sector" | "contextual",
      "rationale": "string"
    }
  ]
}
"#;

/// 가격 예측용 시스템 지시문.
pub const PREDICTION_SYSTEM_INSTRUCTION: &str = r#"You are an expert cryptocurrency market analyst with deep knowledge of technical analysis and market sentiment.

Your task is to predict the short-term price direction (next 24 hours) based on:
1. Historical price data and technical indicators
2. Recent news sentiment analysis

Be objective, data-driven, and provide clear reasoning. Consider both bullish and bearish factors.

IMPORTANT: Respond ONLY with valid JSON in this exact format:
{
  "prediction": "UP" | "DOWN" | "NEUTRAL",
  "confidence": 0.XX,
  "reasoning": "Brief explanation combining technical and sentiment factors",
  "key_factors": ["factor1", "factor2", "factor3"],
  "risk_factors": ["risk1", "risk2"]
}
"#;

/// 기사에서 모델 입력 텍스트 블록을 구성합니다.
pub fn build_news_text(article: &NewsArticle) -> String {
    format!(
        "News article:\n\"\"\"\n- Header: {}\n- Subheader: {}\n- Content: {}\n\"\"\"",
        article.header, article.subheader, article.content
    )
}

/// 예측용 사용자 프롬프트를 구성합니다.
///
/// 필드 순서와 라벨은 고정입니다. 골든 출력 테스트가 이 레이아웃에
/// 의존하므로 변경 시 테스트도 함께 갱신해야 합니다.
pub fn build_prediction_prompt(
    symbol: &Symbol,
    technical: &TechnicalIndicators,
    sentiment: &SentimentSummary,
) -> String {
    let mut prompt = format!(
        "Analyze {symbol} trend for the next 24 hours.\n\
         \n\
         **Price Data (Last 100 candles):**\n\
         Current Price: ${current_price:.2}\n\
         24h Change: {change}%\n\
         24h High: ${high:.2}\n\
         24h Low: ${low:.2}\n\
         \n\
         **Technical Indicators:**\n\
         RSI(14): {rsi:.1} ({rsi_label})\n\
         MACD: {macd_label} signal (value: {macd:.2})\n\
         MA20: ${ma20:.2} (price is {vs20})\n\
         MA50: ${ma50:.2} (price is {vs50})\n\
         Volume: {volume}% vs 7-day average ({volume_label})\n\
         \n\
         **News Sentiment (Last 24h):**\n\
         Articles Analyzed: {articles}\n\
         Bullish: {bullish}, Bearish: {bearish}, Neutral: {neutral}\n\
         Average Score: {avg_score:+.2} ({overall})\n\
         Trend: {trend}\n",
        symbol = symbol,
        current_price = technical.current_price,
        change = signed(technical.price_change_24h, 2),
        high = technical.high_24h,
        low = technical.low_24h,
        rsi = technical.rsi,
        rsi_label = technical.rsi_interpretation,
        macd_label = capitalize(&technical.macd_signal.to_string()),
        macd = technical.macd_value,
        ma20 = technical.ma20,
        vs20 = technical.price_vs_ma20,
        ma50 = technical.ma50,
        vs50 = technical.price_vs_ma50,
        volume = signed(technical.volume_change_pct, 1),
        volume_label = technical.volume_trend,
        articles = sentiment.articles_count,
        bullish = sentiment.bullish_count,
        bearish = sentiment.bearish_count,
        neutral = sentiment.neutral_count,
        avg_score = sentiment.average_score,
        overall = sentiment.overall_sentiment,
        trend = capitalize(&sentiment.sentiment_trend.to_string()),
    );

    if !sentiment.top_rationales.is_empty() {
        prompt.push_str("\nTop News Rationales:\n");
        for (i, rationale) in sentiment.top_rationales.iter().enumerate() {
            prompt.push_str(&format!("{}. \"{}\"\n", i + 1, rationale));
        }
    }

    prompt.push_str("\nPredict: UP, DOWN, or NEUTRAL with confidence (0-1) and reasoning.");

    prompt
}

/// 부호를 항상 표기하는 십진수 포맷 (예: "+2.50", "-0.3").
fn signed(value: Decimal, dp: usize) -> String {
    if value.is_sign_negative() {
        format!("{:.*}", dp, value)
    } else {
        format!("+{:.*}", dp, value)
    }
}

/// 첫 글자만 대문자로 (예: "bullish" → "Bullish").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::domain::{
        MacdSignal, OverallSentiment, PricePosition, RsiInterpretation, SentimentTrend,
        VolumeTrend,
    };
    use rust_decimal_macros::dec;

    fn sample_technical() -> TechnicalIndicators {
        TechnicalIndicators {
            current_price: dec!(45123.50),
            price_change_24h: dec!(2.35),
            high_24h: dec!(45800.00),
            low_24h: dec!(44100.00),
            rsi: dec!(62.4),
            rsi_interpretation: RsiInterpretation::Neutral,
            macd_signal: MacdSignal::Bullish,
            macd_value: dec!(125.43),
            ma20: dec!(44500.12),
            ma50: dec!(43800.77),
            price_vs_ma20: PricePosition::Above,
            price_vs_ma50: PricePosition::Above,
            volume_change_pct: dec!(-5.2),
            volume_trend: VolumeTrend::Normal,
        }
    }

    fn sample_sentiment() -> SentimentSummary {
        SentimentSummary {
            articles_count: 5,
            average_score: 0.42,
            bullish_count: 3,
            bearish_count: 1,
            neutral_count: 1,
            overall_sentiment: OverallSentiment::Bullish,
            sentiment_trend: SentimentTrend::Improving,
            top_rationales: vec![
                "ETF inflows accelerating".to_string(),
                "Exchange outage raises custody concerns".to_string(),
            ],
        }
    }

    #[test]
    fn test_prompt_layout_is_deterministic() {
        let symbol = Symbol::new("BTCUSDT");
        let technical = sample_technical();
        let sentiment = sample_sentiment();

        let first = build_prediction_prompt(&symbol, &technical, &sentiment);
        let second = build_prediction_prompt(&symbol, &technical, &sentiment);
        assert_eq!(first, second);
    }

    #[test]
    fn test_prompt_contains_fixed_labels_in_order() {
        let prompt =
            build_prediction_prompt(&Symbol::new("BTCUSDT"), &sample_technical(), &sample_sentiment());

        let labels = [
            "Analyze BTCUSDT trend",
            "**Price Data (Last 100 candles):**",
            "Current Price: $45123.50",
            "24h Change: +2.35%",
            "**Technical Indicators:**",
            "RSI(14): 62.4 (neutral)",
            "MACD: Bullish signal (value: 125.43)",
            "MA20: $44500.12 (price is above)",
            "Volume: -5.2% vs 7-day average (normal)",
            "**News Sentiment (Last 24h):**",
            "Bullish: 3, Bearish: 1, Neutral: 1",
            "Average Score: +0.42 (BULLISH)",
            "Trend: Improving",
            "Top News Rationales:",
            "1. \"ETF inflows accelerating\"",
            "Predict: UP, DOWN, or NEUTRAL",
        ];

        let mut cursor = 0;
        for label in labels {
            let found = prompt[cursor..]
                .find(label)
                .unwrap_or_else(|| panic!("label not found in order: {}", label));
            cursor += found + label.len();
        }
    }

    #[test]
    fn test_prompt_omits_rationales_block_when_empty() {
        let mut sentiment = sample_sentiment();
        sentiment.top_rationales.clear();

        let prompt =
            build_prediction_prompt(&Symbol::new("BTCUSDT"), &sample_technical(), &sentiment);
        assert!(!prompt.contains("Top News Rationales"));
    }

    #[test]
    fn test_news_text_block() {
        let article = NewsArticle {
            header: "Header".to_string(),
            subheader: "Subheader".to_string(),
            content: "Content".to_string(),
            url: "https://example.com".to_string(),
            crawled_at: chrono::Utc::now(),
        };

        let text = build_news_text(&article);
        assert!(text.contains("- Header: Header"));
        assert!(text.contains("- Subheader: Subheader"));
        assert!(text.contains("- Content: Content"));
    }

    #[test]
    fn test_signed_formatting() {
        assert_eq!(signed(dec!(2.35), 2), "+2.35");
        assert_eq!(signed(dec!(-5.2), 1), "-5.2");
        assert_eq!(signed(dec!(0), 2), "+0.00");
    }
}
