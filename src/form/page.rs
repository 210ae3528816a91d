use crate::error::{Result, WatchError};
use headless_chrome::Tab;
use serde_json::Value;

/// The page operations the form controller needs.
///
/// Every query is a single non-blocking check; waiting is done by the
/// controller through [`crate::browser::await_condition`].
pub trait FormPage {
    /// Whether an element matching `selector` exists
    fn exists(&self, selector: &str) -> Result<bool>;

    /// Whether the element exists and is rendered
    fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Whether the element exists and is not disabled
    fn is_enabled(&self, selector: &str) -> Result<bool>;

    /// Strip the disabled / read-only state from an element
    fn force_enable(&self, selector: &str) -> Result<()>;

    /// Click the first visible element among `selectors`; `false` when none is visible
    fn click_first_visible(&self, selectors: &[String]) -> Result<bool>;

    /// Focus an input, select its content and clear it
    fn focus_and_clear(&self, selector: &str) -> Result<()>;

    /// Assign a value and fire the input / keyup / change notifications widgets listen for
    fn set_value(&self, selector: &str, value: &str) -> Result<()>;

    /// Whether an autocomplete list is visible and has at least one item
    fn suggestions_ready(&self, list_selector: &str) -> Result<bool>;

    /// Scroll an element into view and click it like a user would
    fn click(&self, selector: &str) -> Result<()>;

    /// Click the first item of a list from inside the page
    fn dom_click_first(&self, list_selector: &str) -> Result<bool>;

    fn press_key(&self, key: &str) -> Result<()>;

    /// Whether the table exists and has at least one body row
    fn table_has_rows(&self, table_selector: &str) -> Result<bool>;

    /// Current page markup
    fn content(&self) -> Result<String>;
}

/// Call one of the bundled page functions with JSON-encoded arguments
fn call(function: &str, args: &[Value]) -> String {
    let args: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("{}({})", function.trim_end(), args.join(", "))
}

fn evaluate(tab: &Tab, script: String) -> Result<Value> {
    let result = tab.evaluate(&script, false).map_err(|e| WatchError::EvaluationFailed(e.to_string()))?;
    Ok(result.value.unwrap_or(Value::Null))
}

fn evaluate_bool(tab: &Tab, function: &str, args: &[Value]) -> Result<bool> {
    Ok(evaluate(tab, call(function, args))?.as_bool().unwrap_or(false))
}

impl FormPage for Tab {
    fn exists(&self, selector: &str) -> Result<bool> {
        evaluate_bool(self, include_str!("js/exists.js"), &[selector.into()])
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        evaluate_bool(self, include_str!("js/is_visible.js"), &[selector.into()])
    }

    fn is_enabled(&self, selector: &str) -> Result<bool> {
        evaluate_bool(self, include_str!("js/is_enabled.js"), &[selector.into()])
    }

    fn force_enable(&self, selector: &str) -> Result<()> {
        if evaluate_bool(self, include_str!("js/force_enable.js"), &[selector.into()])? {
            Ok(())
        } else {
            Err(WatchError::EvaluationFailed(format!("Element '{}' not found", selector)))
        }
    }

    fn click_first_visible(&self, selectors: &[String]) -> Result<bool> {
        evaluate_bool(self, include_str!("js/click_first_visible.js"), &[Value::from(selectors.to_vec())])
    }

    fn focus_and_clear(&self, selector: &str) -> Result<()> {
        // a real click first so the widget sees the focus it expects
        if let Ok(element) = self.find_element(selector) {
            if let Err(e) = element.click() {
                log::debug!("Focus click on {} failed: {}", selector, e);
            }
        }

        let focused = evaluate_bool(self, include_str!("js/focus_and_clear.js"), &[selector.into()])?;
        if !focused {
            log::debug!("Field {} did not keep focus after clearing", selector);
        }

        FormPage::press_key(self, "Backspace")
    }

    fn set_value(&self, selector: &str, value: &str) -> Result<()> {
        if evaluate_bool(self, include_str!("js/set_value.js"), &[selector.into(), value.into()])? {
            Ok(())
        } else {
            Err(WatchError::EvaluationFailed(format!("Value was not accepted by '{}'", selector)))
        }
    }

    fn suggestions_ready(&self, list_selector: &str) -> Result<bool> {
        evaluate_bool(self, include_str!("js/suggestions_ready.js"), &[list_selector.into()])
    }

    fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .find_element(selector)
            .map_err(|e| WatchError::EvaluationFailed(format!("Element '{}' not found: {}", selector, e)))?;

        element
            .scroll_into_view()
            .map_err(|e| WatchError::EvaluationFailed(format!("Failed to scroll to '{}': {}", selector, e)))?;
        element
            .click()
            .map_err(|e| WatchError::EvaluationFailed(format!("Failed to click '{}': {}", selector, e)))?;

        Ok(())
    }

    fn dom_click_first(&self, list_selector: &str) -> Result<bool> {
        evaluate_bool(self, include_str!("js/dom_click_first.js"), &[list_selector.into()])
    }

    fn press_key(&self, key: &str) -> Result<()> {
        Tab::press_key(self, key).map_err(|e| WatchError::EvaluationFailed(format!("Failed to press {}: {}", key, e)))?;
        Ok(())
    }

    fn table_has_rows(&self, table_selector: &str) -> Result<bool> {
        evaluate_bool(self, include_str!("js/table_has_rows.js"), &[table_selector.into()])
    }

    fn content(&self) -> Result<String> {
        self.get_content()
            .map_err(|e| WatchError::EvaluationFailed(format!("Failed to read page content: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_quotes_arguments() {
        let script = call("(function (sel) { return sel; })\n", &["#city \"x\"".into()]);
        assert_eq!(script, r##"(function (sel) { return sel; })("#city \"x\"")"##);
    }

    #[test]
    fn test_call_with_array_and_multiple_args() {
        let script = call("(f)", &[Value::from(vec!["a".to_string(), "b".to_string()]), "v".into()]);
        assert_eq!(script, r#"(f)(["a","b"], "v")"#);
    }

    #[test]
    fn test_bundled_scripts_are_function_expressions() {
        for script in [
            include_str!("js/exists.js"),
            include_str!("js/is_visible.js"),
            include_str!("js/is_enabled.js"),
            include_str!("js/force_enable.js"),
            include_str!("js/click_first_visible.js"),
            include_str!("js/focus_and_clear.js"),
            include_str!("js/set_value.js"),
            include_str!("js/suggestions_ready.js"),
            include_str!("js/dom_click_first.js"),
            include_str!("js/table_has_rows.js"),
        ] {
            let trimmed = script.trim();
            assert!(trimmed.starts_with("(function"), "{}", trimmed);
            assert!(trimmed.ends_with("})"), "{}", trimmed);
        }
    }
}
