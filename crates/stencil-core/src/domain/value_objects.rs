//! Value objects: template variables and the parallelism bound.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;

use crate::domain::error::DomainError;

/// Template variable bindings: name → any scalar, list or mapping.
pub type Values = BTreeMap<String, serde_json::Value>;

/// Combine a group reference's override values with a file's own defaults.
///
/// Starts from the file-level values and overlays the group-level ones, so a
/// key present in both resolves to the group value.
pub fn merge_values(group_values: &Values, file_values: &Values) -> Values {
    let mut merged = file_values.clone();
    merged.extend(
        group_values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    merged
}

/// Maximum number of repositories processed at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parallelism(NonZeroUsize);

impl Parallelism {
    pub const DEFAULT: usize = 5;

    /// Rejects zero.
    pub fn new(value: usize) -> Result<Self, DomainError> {
        NonZeroUsize::new(value)
            .map(Self)
            .ok_or(DomainError::InvalidParallelism { value })
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self(NonZeroUsize::new(Self::DEFAULT).unwrap_or(NonZeroUsize::MIN))
    }
}

impl fmt::Display for Parallelism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, serde_json::Value)]) -> Values {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn group_values_override_file_defaults() {
        let group = values(&[("a", json!(1)), ("b", json!(2))]);
        let file = values(&[("b", json!(3)), ("c", json!(4))]);

        let merged = merge_values(&group, &file);

        assert_eq!(
            merged,
            values(&[("a", json!(1)), ("b", json!(2)), ("c", json!(4))])
        );
    }

    #[test]
    fn missing_group_values_leave_file_defaults_intact() {
        let file = values(&[("Name", json!("default"))]);
        assert_eq!(merge_values(&Values::new(), &file), file);
    }

    #[test]
    fn both_empty_is_empty() {
        assert!(merge_values(&Values::new(), &Values::new()).is_empty());
    }

    #[test]
    fn parallelism_rejects_zero() {
        assert_eq!(
            Parallelism::new(0),
            Err(DomainError::InvalidParallelism { value: 0 })
        );
        assert_eq!(Parallelism::new(3).unwrap().get(), 3);
    }

    #[test]
    fn parallelism_default_is_five() {
        assert_eq!(Parallelism::default().get(), 5);
    }
}
