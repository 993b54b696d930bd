//! Node identity and selector model

use std::fmt;

/// Stable identity of an element for the lifetime of the page
///
/// Surfaces are identified by element reference; the id plays that role
/// here. A replaced surface gets a fresh id, which is exactly what makes
/// re-attachment observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an element is, as far as interception cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// The document body, root of every propagation path
    Body,
    /// A generic container element
    Container,
    /// An `input[type=file]`
    FileInput,
}

/// The selector forms surface discovery consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Every listed class must be present on the element
    Classes(Vec<String>),
    /// Element id match
    Id(String),
}

impl Selector {
    pub fn classes(names: &[&str]) -> Self {
        Selector::Classes(names.iter().map(|s| (*s).to_string()).collect())
    }

    pub fn id(name: &str) -> Self {
        Selector::Id(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(42).to_string(), "#42");
    }

    #[test]
    fn test_selector_constructors() {
        assert_eq!(
            Selector::classes(&["content_box", "img_upcont"]),
            Selector::Classes(vec!["content_box".to_string(), "img_upcont".to_string()])
        );
        assert_eq!(Selector::id("sortable"), Selector::Id("sortable".to_string()));
    }
}
