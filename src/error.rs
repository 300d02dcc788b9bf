use wasm_bindgen::JsValue;

/// Failures while wiring the controller to the document.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("required element not found: {0}")]
    MissingElement(String),
    #[error("canvas has no 2d context")]
    NoCanvasContext,
    #[error("page controller not started")]
    NotStarted,
    #[error("invalid page config: {0}")]
    Config(String),
    #[error("js error: {0}")]
    Js(String),
}

impl From<JsValue> for PageError {
    fn from(value: JsValue) -> Self {
        PageError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<PageError> for JsValue {
    fn from(err: PageError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
