//! Script-facing wrapper around the directory selection.

use std::cell::RefCell;
use std::rc::Rc;

use directory::{DirectoryClient, DirectoryError, Endpoint, Level, Selection};
use js_sys::{Array, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

fn parse_level(level: &str) -> Result<Level, JsValue> {
    match level {
        "state" | "states" => Ok(Level::State),
        "district" | "districts" => Ok(Level::District),
        "subdistrict" | "subdistricts" | "sub-district" | "sub-districts" => {
            Ok(Level::SubDistrict)
        }
        "village" | "villages" => Ok(Level::Village),
        other => Err(JsValue::from_str(&format!("unknown level {other:?}"))),
    }
}

fn to_array(names: &[String]) -> Array {
    names.iter().map(|n| JsValue::from_str(n)).collect()
}

/// Apply a finished request and decide what its promise settles with.
///
/// A response for a superseded selection resolves with an empty list so the
/// caller never sees names that belong to another selection.
fn settle(
    selection: &mut Selection,
    endpoint: &Endpoint,
    result: Result<Vec<String>, DirectoryError>,
) -> Result<Vec<String>, &'static str> {
    let failed = result.is_err();
    if !selection.apply(endpoint, result) {
        return Ok(Vec::new());
    }
    if failed {
        return Err(endpoint.level().failure_message());
    }
    Ok(selection.list(endpoint.level()).to_vec())
}

/// Cascading state/district/sub-district/village lookup.
///
/// Each selection resolves with the freshly loaded list for the next level,
/// or rejects with the level's failure message. Requests overtaken by a
/// newer selection resolve with an empty list.
#[wasm_bindgen]
pub struct DirectoryLookup {
    client: DirectoryClient,
    selection: Rc<RefCell<Selection>>,
}

#[wasm_bindgen]
impl DirectoryLookup {
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: base_url.map(DirectoryClient::new).unwrap_or_default(),
            selection: Rc::new(RefCell::new(Selection::new())),
        }
    }

    #[wasm_bindgen(js_name = loadStates)]
    pub fn load_states(&self) -> Promise {
        let endpoint = self.selection.borrow_mut().load_states();
        self.fetch(endpoint)
    }

    #[wasm_bindgen(js_name = selectState)]
    pub fn select_state(&self, state: &str) -> Promise {
        let endpoint = self.selection.borrow_mut().select_state(state);
        self.fetch(endpoint)
    }

    #[wasm_bindgen(js_name = selectDistrict)]
    pub fn select_district(&self, district: &str) -> Result<Promise, JsValue> {
        let endpoint = self
            .selection
            .borrow_mut()
            .select_district(district)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.fetch(endpoint))
    }

    #[wasm_bindgen(js_name = selectSubDistrict)]
    pub fn select_sub_district(&self, sub_district: &str) -> Result<Promise, JsValue> {
        let endpoint = self
            .selection
            .borrow_mut()
            .select_sub_district(sub_district)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.fetch(endpoint))
    }

    #[wasm_bindgen(getter)]
    pub fn loading(&self) -> bool {
        self.selection.borrow().loading()
    }

    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.selection.borrow().error().map(str::to_string)
    }

    pub fn list(&self, level: &str) -> Result<Array, JsValue> {
        let level = parse_level(level)?;
        Ok(to_array(self.selection.borrow().list(level)))
    }

    fn fetch(&self, endpoint: Endpoint) -> Promise {
        let client = self.client.clone();
        let selection = Rc::clone(&self.selection);
        future_to_promise(async move {
            let result = client.fetch(&endpoint).await;
            let settled = settle(&mut selection.borrow_mut(), &endpoint, result);
            settled
                .map(|names| to_array(&names).into())
                .map_err(JsValue::from_str)
        })
    }
}

#[cfg(test)]
mod tests {
    use directory::{DirectoryError, Level, Selection};
    use pretty_assertions::assert_eq;

    use super::settle;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn current_response_resolves_with_its_list() {
        let mut sel = Selection::new();
        let ep = sel.select_state("Kerala");
        assert_eq!(
            settle(&mut sel, &ep, Ok(names(&["Idukki"]))),
            Ok(names(&["Idukki"]))
        );
    }

    #[test]
    fn superseded_response_resolves_empty() {
        let mut sel = Selection::new();
        let goa = sel.select_state("Goa");
        let kerala = sel.select_state("Kerala");
        settle(&mut sel, &kerala, Ok(names(&["Idukki"]))).unwrap();

        assert_eq!(settle(&mut sel, &goa, Ok(names(&["North Goa"]))), Ok(Vec::new()));
        assert_eq!(sel.list(Level::District), names(&["Idukki"]).as_slice());
    }

    #[test]
    fn current_failure_rejects_with_level_message() {
        let mut sel = Selection::new();
        let ep = sel.select_state("Kerala");
        assert_eq!(
            settle(&mut sel, &ep, Err(DirectoryError::Server { status: 503 })),
            Err("Failed to fetch districts")
        );
    }

    #[test]
    fn superseded_failure_does_not_reject() {
        let mut sel = Selection::new();
        let goa = sel.select_state("Goa");
        sel.select_state("Kerala");
        assert_eq!(
            settle(&mut sel, &goa, Err(DirectoryError::NotFound { path: "/districts/Goa".into() })),
            Ok(Vec::new())
        );
        assert_eq!(sel.error(), None);
    }
}
