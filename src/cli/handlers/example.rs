//! Example command handler

use crate::error::AppResult;
use crate::models::{Payload, examples};

/// Prints a template payload to start custom formatting from
pub struct ExampleCommandHandler;

impl ExampleCommandHandler {
    pub fn execute(attachments: bool) -> AppResult<()> {
        println!("{}", Self::render(attachments)?);
        Ok(())
    }

    pub fn render(attachments: bool) -> AppResult<String> {
        let template: Payload = if attachments {
            examples::with_attachments()
        } else {
            examples::simple()
        };
        Ok(serde_json::to_string_pretty(&template)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_simple_template() {
        let value: Value = serde_json::from_str(&ExampleCommandHandler::render(false).unwrap()).unwrap();
        assert_eq!(value["username"], "hookcast");
        assert!(value.get("attachments").is_none());
    }

    #[test]
    fn test_attachments_template() {
        let value: Value = serde_json::from_str(&ExampleCommandHandler::render(true).unwrap()).unwrap();
        assert_eq!(value["attachments"].as_array().map(Vec::len), Some(2));
    }
}
