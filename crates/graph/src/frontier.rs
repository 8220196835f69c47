use crate::types::TermId;
use std::collections::HashSet;

/// Ordered set of leaf terms at the current pruning frontier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    order: Vec<TermId>,
    members: HashSet<TermId>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the term was already a leaf
    pub fn insert(&mut self, id: TermId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        self.members.insert(id.clone());
        self.order.push(id);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        if !self.members.remove(id) {
            return false;
        }
        self.order.retain(|leaf| leaf != id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TermId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_vec(self) -> Vec<TermId> {
        self.order
    }
}

impl FromIterator<TermId> for Frontier {
    fn from_iter<I: IntoIterator<Item = TermId>>(iter: I) -> Self {
        let mut frontier = Frontier::new();
        for id in iter {
            frontier.insert(id);
        }
        frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_insertion_order() {
        let mut frontier: Frontier = ["b", "a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(frontier.len(), 2);
        assert!(!frontier.insert("a".to_string()));
        assert!(frontier.remove("b"));
        assert!(!frontier.remove("b"));
        frontier.insert("b".to_string());
        assert_eq!(frontier.into_vec(), vec!["a".to_string(), "b".to_string()]);
    }
}
