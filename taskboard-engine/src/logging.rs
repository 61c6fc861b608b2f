//! Helpers for formatting values in log output

use serde::Serialize;
use std::fmt::{self, Debug};

/// Renders a value as YAML on a fresh line, for tracing statements:
///
/// ```
/// use taskboard_engine::Pretty;
/// use tracing::debug;
///
/// let remaps = vec!["a", "b"];
/// debug!("identity repairs: {}", Pretty(&remaps));
/// ```
///
/// Falls back to `{:#?}` when YAML serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> Pretty<T> {
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_yaml_ng::to_string(&self.0) {
            Ok(yaml) => write!(f, "\n{}", yaml),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

impl<T: Serialize + Debug> fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::IdRemap;

    #[test]
    fn test_pretty_renders_yaml() {
        let remap = IdRemap {
            from: "old".into(),
            to: "new".into(),
        };
        let text = Pretty(&remap).to_string();
        assert!(text.starts_with('\n'));
        assert!(text.contains("from: old"));
        assert!(text.contains("to: new"));
    }
}
