use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
