#![forbid(unsafe_code)]
//! WASM-friendly bridge for the revtree version manager.
//! Versions cross the boundary as JSON in the same shape hosts persist them.

use revtree_core::{new_version, Version, VersionId, VersionManager};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn versions_to_js<'a>(
    versions: impl IntoIterator<Item = &'a Version>,
) -> Result<JsValue, JsValue> {
    let versions: Vec<&Version> = versions.into_iter().collect();
    to_value(&versions).map_err(js_err)
}

/// Create a version diffing `old_text` into `new_text`, returned as JSON.
#[wasm_bindgen(js_name = newVersion)]
pub fn new_version_json(
    old_text: &str,
    new_text: &str,
    parent: Option<String>,
) -> Result<String, JsValue> {
    let parent = parent.map(VersionId::from);
    let version = new_version(old_text, new_text, parent.as_ref());
    serde_json::to_string(&version).map_err(js_err)
}

#[wasm_bindgen]
pub struct WasmVersionManager {
    inner: VersionManager,
}

#[wasm_bindgen]
impl WasmVersionManager {
    /// Rehydrate from a JSON array of versions, or start empty.
    #[wasm_bindgen(constructor)]
    pub fn new(versions_json: Option<String>) -> Result<WasmVersionManager, JsValue> {
        let inner = match versions_json {
            Some(json) => {
                let versions: Vec<Version> = serde_json::from_str(&json).map_err(js_err)?;
                VersionManager::from_versions(versions).map_err(js_err)?
            }
            None => VersionManager::new(),
        };
        Ok(WasmVersionManager { inner })
    }

    #[wasm_bindgen(js_name = addVersion)]
    pub fn add_version(&mut self, version_json: String) -> Result<(), JsValue> {
        let version: Version = serde_json::from_str(&version_json).map_err(js_err)?;
        self.inner.add_version(version).map_err(js_err)
    }

    #[wasm_bindgen(js_name = mainBranch)]
    pub fn main_branch(&self) -> Result<JsValue, JsValue> {
        let branch = self.inner.main_branch().map_err(js_err)?;
        versions_to_js(branch.iter().map(|v| v.as_ref()))
    }

    pub fn branch(&self, id: String) -> Result<JsValue, JsValue> {
        let branch = self.inner.branch(&VersionId::from(id)).map_err(js_err)?;
        versions_to_js(branch.iter().map(|v| v.as_ref()))
    }

    #[wasm_bindgen(js_name = allVersions)]
    pub fn all_versions(&self) -> Result<JsValue, JsValue> {
        let versions = self.inner.all_versions();
        versions_to_js(versions.iter().map(|v| v.as_ref()))
    }

    #[wasm_bindgen(js_name = lastVersion)]
    pub fn last_version(&self) -> Result<Option<String>, JsValue> {
        let tip = self.inner.last_version().map_err(js_err)?;
        Ok(tip.map(ToString::to_string))
    }

    #[wasm_bindgen(js_name = versionCount)]
    pub fn version_count(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(js_name = compileMainBranch)]
    pub fn compile_main_branch(&self) -> Result<String, JsValue> {
        self.inner.compile_main_branch().map_err(js_err)
    }

    #[wasm_bindgen(js_name = compileBranch)]
    pub fn compile_branch(&self, id: String) -> Result<String, JsValue> {
        self.inner.compile_branch(&VersionId::from(id)).map_err(js_err)
    }
}
