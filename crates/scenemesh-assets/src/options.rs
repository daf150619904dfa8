use serde::{Deserialize, Serialize};

/// Settings controlling how a scene is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Replace `v` with `1 - v` so the texture origin sits at the top-left.
    pub flip_v: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { flip_v: true }
    }
}

impl ImportOptions {
    /// Options that leave texture coordinates untouched.
    pub fn without_v_flip() -> Self {
        Self { flip_v: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_v_by_default() {
        assert!(ImportOptions::default().flip_v);
        assert!(!ImportOptions::without_v_flip().flip_v);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let options: ImportOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ImportOptions::default());

        let options: ImportOptions = serde_json::from_str(r#"{"flip_v": false}"#).unwrap();
        assert!(!options.flip_v);
    }
}
