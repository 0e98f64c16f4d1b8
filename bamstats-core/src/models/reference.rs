///
/// Reference id to reference name lookup, in header order.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceTable {
    names: Vec<String>,
}

impl ReferenceTable {
    ///
    /// Resolve a reference id. Unknown or missing ids resolve to `None`.
    ///
    pub fn name(&self, id: Option<usize>) -> Option<&str> {
        id.and_then(|id| self.names.get(id)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for ReferenceTable {
    fn from(names: Vec<String>) -> Self {
        ReferenceTable { names }
    }
}

impl<S: Into<String>> FromIterator<S> for ReferenceTable {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        ReferenceTable {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_name_lookup() {
        let refs: ReferenceTable = ["chr1", "chr2"].into_iter().collect();

        assert_eq!(refs.len(), 2);
        assert_eq!(refs.name(Some(1)), Some("chr2"));
        assert_eq!(refs.name(Some(2)), None);
        assert_eq!(refs.name(None), None);
    }
}
