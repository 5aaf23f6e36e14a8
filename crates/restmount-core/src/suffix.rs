//! Suffixes: extra path segments spliced into a controller's path.

use crate::path;

/// Inserts `value` at `index` and returns the sequence.
///
/// `index == len` appends and `index < len` shifts the tail right. An
/// `index` past the end leaves the sequence untouched and drops `value`.
///
/// ```rust
/// use restmount_core::suffix::insert;
///
/// let tree = vec!["users".to_string()];
/// assert_eq!(insert(tree.clone(), 0, "v1".to_string()), ["v1", "users"]);
/// assert_eq!(insert(tree.clone(), 2, ":system".to_string()), ["users"]);
/// ```
#[must_use]
pub fn insert<T>(mut sequence: Vec<T>, index: usize, value: T) -> Vec<T> {
    if index <= sequence.len() {
        sequence.insert(index, value);
    }
    sequence
}

/// An extra segment to splice into a controller's natural path tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffix {
    index: usize,
    value: String,
    description: String,
}

impl Suffix {
    /// Creates a suffix placed before the natural segment at `index`.
    #[must_use]
    pub fn new(index: usize, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
            description: String::new(),
        }
    }

    /// Sets the description used for the documented path parameter.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Position in the natural tree.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Segment text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// True when the value contains a `{identifier}` token.
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        path::is_param(&self.value)
    }
}

/// Splices `suffixes` into `natural`, in declaration order.
///
/// Every index refers to a position in the natural tree. Suffixes already
/// spliced at or before that position shift it right, so two suffixes
/// sharing an index keep their declaration order. A suffix whose index is
/// beyond the natural tree is dropped.
pub fn splice(natural: &[String], suffixes: &[Suffix]) -> Vec<String> {
    let mut tree = natural.to_vec();
    let mut spliced: Vec<usize> = Vec::with_capacity(suffixes.len());

    for suffix in suffixes {
        let index = suffix.index();
        if index > natural.len() {
            tracing::debug!(
                index,
                value = suffix.value(),
                segments = natural.len(),
                "suffix index beyond path, ignoring"
            );
            continue;
        }
        let offset = spliced.iter().filter(|&&i| i <= index).count();
        tree = insert(tree, index + offset, suffix.value().to_string());
        spliced.push(index);
    }

    tree
}
