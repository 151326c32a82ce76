use strata_core::{Source, Value};

/// Settings passed in directly by the caller, such as the explicit JSON layer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiteralSource {
    tree: Value,
}

impl LiteralSource {
    pub fn new(tree: Value) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }
}

impl From<serde_json::Value> for LiteralSource {
    fn from(json: serde_json::Value) -> Self {
        Self::new(Value::from(json))
    }
}

impl From<Value> for LiteralSource {
    fn from(tree: Value) -> Self {
        Self::new(tree)
    }
}

impl Source for LiteralSource {
    fn load(&self, _env: &str) -> strata_core::Result<Value> {
        Ok(self.tree.clone())
    }

    fn describe(&self) -> String {
        "explicit settings".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_the_same_tree_for_every_env() {
        let source = LiteralSource::from(json!({"feature": {"enabled": true}}));
        let expected = Value::from(json!({"feature": {"enabled": true}}));

        assert_eq!(source.load("development").unwrap(), expected);
        assert_eq!(source.load("production").unwrap(), expected);
    }
}
