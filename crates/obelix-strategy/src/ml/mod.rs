//! 분류기 기반 전략을 위한 머신러닝 구성요소.
//!
//! ```text
//! PriceSeries
//!     │
//!     ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ extract_features│     │ label_future_    │ ← 미래 수익률 (학습 전용)
//! │ (sma_diff, mom.)│     │ returns          │
//! └────────┬────────┘     └────────┬─────────┘
//!          └───────────┬───────────┘
//!                      ▼
//!              ┌───────────────┐
//!              │ KnnClassifier │ fit → predict
//!              └───────────────┘
//!                      │
//!                      ▼
//!                  Label → Signal
//! ```

pub mod error;
pub mod features;
pub mod knn;
pub mod labels;

pub use error::{MlError, MlResult};
pub use features::{extract_features, FeatureRow, FEATURE_NAMES};
pub use knn::KnnClassifier;
pub use labels::{label_future_returns, ClassMode, Label};
