// Library interface for WellRS modules
// This allows integration tests to access the core functionality

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod risk;
pub mod token;

#[cfg(feature = "charts")]
pub mod charts;

// Re-export commonly used types for convenience
pub use client::OuraClient;
pub use config::AppConfig;
pub use error::{Result, WellRsError};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{
    DailyActivityRecord, DailySleepRecord, DailyStressRecord, MetricBundle, MetricWindow,
    UserProfile,
};
pub use risk::{CompositeAssessment, RiskBand, RiskCalculator, RiskConfig};
pub use token::{Credential, TokenStore};
