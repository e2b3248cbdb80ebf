use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn layout_table_json(json: &str) -> Result<JsValue, JsValue> {
    let result = crate::layout_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
