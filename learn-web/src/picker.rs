//! Google Picker via JS interop.
//!
//! The picker only ships as a script (`apis.google.com/js/api.js` plus
//! `gapi.load('picker')`), so a small inline shim loads it and wraps the
//! builder in a promise. Rust passes the token and filter as call arguments
//! and receives the picked documents as a JSON string.

use async_trait::async_trait;
use learn_core::{PickerError, PickerWidget};
use shared_types::PickedDocument;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

const LOAD_FN: &str = "__learn_load_picker";
const OPEN_FN: &str = "__learn_open_picker";

/// Inject the loader and opener once into the page.
/// Idempotent — guarded by `window.__learn_picker_shim`.
pub fn inject_shim() {
    let js = r#"
if (!window.__learn_picker_shim) {
  window.__learn_load_picker = function() {
    if (window.__learn_picker_loading) return window.__learn_picker_loading;
    window.__learn_picker_loading = new Promise(function(resolve, reject) {
      if (window.google && window.google.picker) { resolve(); return; }
      const onApi = function() {
        window.gapi.load('picker', {
          callback: function() { resolve(); },
          onerror: function() { reject(new Error('picker module failed to load')); }
        });
      };
      if (window.gapi) { onApi(); return; }
      const script = document.createElement('script');
      script.src = 'https://apis.google.com/js/api.js';
      script.async = true;
      script.onload = onApi;
      script.onerror = function() { reject(new Error('api.js failed to load')); };
      document.head.appendChild(script);
    });
    window.__learn_picker_loading.catch(function() { window.__learn_picker_loading = null; });
    return window.__learn_picker_loading;
  };
  window.__learn_open_picker = function(token, mimeTypes, developerKey, appId) {
    return new Promise(function(resolve) {
      const gp = window.google.picker;
      const view = new gp.DocsView(gp.ViewId.DOCS);
      if (mimeTypes) view.setMimeTypes(mimeTypes);
      let builder = new gp.PickerBuilder()
        .enableFeature(gp.Feature.MULTISELECT_ENABLED)
        .setOAuthToken(token)
        .addView(view)
        .setCallback(function(data) {
          if (data.action === gp.Action.PICKED) {
            resolve(JSON.stringify((data.docs || []).map(function(d) {
              return { id: d.id, name: d.name, mimeType: d.mimeType };
            })));
          } else if (data.action === gp.Action.CANCEL) {
            resolve('[]');
          }
        });
      if (developerKey) builder = builder.setDeveloperKey(developerKey);
      if (appId) builder = builder.setAppId(appId);
      builder.build().setVisible(true);
    });
  };
  window.__learn_picker_shim = true;
}
"#;
    let _ = js_sys::eval(js);
}

fn shim_function(name: &str) -> Result<js_sys::Function, String> {
    let window = web_sys::window().ok_or("no global `window` exists")?;
    js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .map_err(|e| format!("{e:?}"))?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| format!("{name} is not installed"))
}

/// Pull `.message` out of a rejected promise value.
fn js_error_message(e: JsValue) -> String {
    let obj = js_sys::Object::from(e);
    js_sys::Reflect::get(&obj, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

pub fn parse_picked(json: &str) -> Result<Vec<PickedDocument>, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse picker result: {e}"))
}

#[derive(Debug, Clone, Default)]
pub struct GooglePicker {
    pub developer_key: String,
    pub app_id: String,
}

#[async_trait(?Send)]
impl PickerWidget for GooglePicker {
    async fn load(&self) -> Result<(), PickerError> {
        inject_shim();
        let load = shim_function(LOAD_FN).map_err(PickerError::LoadFailed)?;
        let promise: js_sys::Promise = load
            .call0(&JsValue::NULL)
            .map_err(|e| PickerError::LoadFailed(js_error_message(e)))?
            .dyn_into()
            .map_err(|_| PickerError::LoadFailed("loader did not return a promise".into()))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| PickerError::LoadFailed(js_error_message(e)))?;
        Ok(())
    }

    async fn open_picker(
        &self,
        access_token: &str,
        mime_filter: &str,
    ) -> Result<Vec<PickedDocument>, PickerError> {
        let open = shim_function(OPEN_FN).map_err(PickerError::Widget)?;
        let args = js_sys::Array::of4(
            &JsValue::from_str(access_token),
            &JsValue::from_str(mime_filter),
            &JsValue::from_str(&self.developer_key),
            &JsValue::from_str(&self.app_id),
        );
        let promise: js_sys::Promise = open
            .apply(&JsValue::NULL, &args)
            .map_err(|e| PickerError::Widget(js_error_message(e)))?
            .dyn_into()
            .map_err(|_| PickerError::Widget("picker did not return a promise".into()))?;
        let result = JsFuture::from(promise)
            .await
            .map_err(|e| PickerError::Widget(js_error_message(e)))?;
        let json = result
            .as_string()
            .ok_or_else(|| PickerError::Widget("unexpected non-string result".into()))?;
        parse_picked(&json).map_err(PickerError::Widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picked_documents_parse_from_shim_json() {
        let docs =
            parse_picked(r#"[{"id":"1a","name":"Syllabus","mimeType":"application/pdf"}]"#)
                .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].name, "Syllabus");
        assert!(parse_picked("[]").unwrap().is_empty());
        assert!(parse_picked("nope").is_err());
    }
}
