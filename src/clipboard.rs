//! JavaScript interop for the async Clipboard API.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["navigator", "clipboard"], js_name = writeText, catch)]
    async fn write_text(text: &str) -> Result<JsValue, JsValue>;
}

/// Write `text` to the system clipboard.
///
/// Fails when the page lacks clipboard permission or focus.
pub async fn copy_text(text: &str) -> Result<(), String> {
    write_text(text)
        .await
        .map(|_| ())
        .map_err(|e| format!("{:?}", e))
}
