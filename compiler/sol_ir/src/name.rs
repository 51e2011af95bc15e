//! Identifier names.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An identifier.
///
/// Cheap to clone: the text is shared. Names compare and hash by content.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Arc<str>);

impl Name {
    pub fn new(text: &str) -> Self {
        Name(Arc::from(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Name(Arc::from(text))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", &*self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_equality_is_by_content() {
        assert_eq!(Name::new("x"), Name::from(String::from("x")));
        assert_ne!(Name::new("x"), Name::new("y"));
    }

    #[test]
    fn test_name_hash_lookup_by_str() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Name::new("prec"), 1);
        assert_eq!(map.get("prec"), Some(&1));
    }
}
