use serde::{Deserialize, Serialize};
use std::fmt;

/// Color used for models that have no entry in the palette.
pub const DEFAULT_MODEL_COLOR: &str = "#333";

/// Forecasting model served by the prediction backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModelId {
    Lstm,
    Prophet,
    Xgboost,
    Arima,
    Tft,
    /// Any identifier the palette does not know about, stored lowercase.
    Other(String),
}

impl ModelId {
    /// Wire name used in the prediction URL path.
    pub fn as_str(&self) -> &str {
        match self {
            ModelId::Lstm => "lstm",
            ModelId::Prophet => "prophet",
            ModelId::Xgboost => "xgboost",
            ModelId::Arima => "arima",
            ModelId::Tft => "tft",
            ModelId::Other(name) => name,
        }
    }

    /// Upper-case display label.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// Series color. Total over all identifiers.
    pub fn color(&self) -> &'static str {
        match self {
            ModelId::Lstm => "#6200ea",
            ModelId::Prophet => "#00bfa5",
            ModelId::Xgboost => "#ff6d00",
            ModelId::Arima => "#2962ff",
            ModelId::Tft => "#d50000",
            ModelId::Other(_) => DEFAULT_MODEL_COLOR,
        }
    }

    /// All models known to the backend, in selection-form order.
    pub fn all() -> Vec<ModelId> {
        vec![
            ModelId::Lstm,
            ModelId::Prophet,
            ModelId::Xgboost,
            ModelId::Arima,
            ModelId::Tft,
        ]
    }
}

impl From<&str> for ModelId {
    fn from(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "lstm" => ModelId::Lstm,
            "prophet" => ModelId::Prophet,
            "xgboost" => ModelId::Xgboost,
            "arima" => ModelId::Arima,
            "tft" => ModelId::Tft,
            _ => ModelId::Other(name),
        }
    }
}

impl From<String> for ModelId {
    fn from(name: String) -> Self {
        ModelId::from(name.as_str())
    }
}

impl From<ModelId> for String {
    fn from(model: ModelId) -> Self {
        model.as_str().to_string()
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
