use std::collections::HashMap;
use std::fmt;

use crate::classifier::{SizeCode, StaffCount};

pub const PAGE_NOT_FOUND: &str = "linkedin page not found";

/// Slug of a LinkedIn company or school page, or the "not found" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageId {
    Slug(String),
    NotFound,
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageId::Slug(slug) => f.write_str(slug),
            PageId::NotFound => f.write_str(PAGE_NOT_FOUND),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyRecord {
    pub name: String,
    pub page_identifier: Option<PageId>,
    pub size_code: Option<SizeCode>,
    pub size_range_start: Option<StaffCount>,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>) -> Self {
        CompanyRecord {
            name: name.into(),
            page_identifier: None,
            size_code: None,
            size_range_start: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.size_code.is_some()
    }
}

fn field<T: fmt::Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "unset".to_string(), |v| v.to_string())
}

impl fmt::Display for CompanyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page={} size_code={} size_range_start={}",
            field(&self.page_identifier),
            field(&self.size_code),
            field(&self.size_range_start)
        )
    }
}

/// Companies in input order, addressable by name.
#[derive(Debug, Default)]
pub struct CompanyRegistry {
    records: Vec<CompanyRecord>,
    index: HashMap<String, usize>,
}

impl CompanyRegistry {
    /// Seeds the registry. A repeated name keeps its first position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = CompanyRegistry::default();
        for name in names {
            let name = name.into();
            if registry.index.contains_key(&name) {
                continue;
            }
            registry.index.insert(name.clone(), registry.records.len());
            registry.records.push(CompanyRecord::new(name));
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&CompanyRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut CompanyRecord> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.records[i]),
            None => None,
        }
    }

    /// Record at a 0-based position.
    pub fn at_mut(&mut self, position: usize) -> Option<&mut CompanyRecord> {
        self.records.get_mut(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompanyRecord> {
        self.records.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_resolved()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_input_order_and_first_duplicate() {
        let registry = CompanyRegistry::from_names(["Beta", "Acme", "Beta", "Gamma"]);
        let names: Vec<_> = registry.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Acme", "Gamma"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_new_records_are_unresolved() {
        let registry = CompanyRegistry::from_names(["Acme"]);
        let record = registry.get("Acme").unwrap();
        assert!(!record.is_resolved());
        assert_eq!(record.page_identifier, None);
        assert_eq!(registry.pending_count(), 1);
    }

    #[test]
    fn test_not_found_code_counts_as_resolved() {
        let mut registry = CompanyRegistry::from_names(["Acme", "Beta"]);
        registry.get_mut("Beta").unwrap().size_code = Some(SizeCode::NotFound);
        assert!(registry.get("Beta").unwrap().is_resolved());
        assert_eq!(registry.pending_count(), 1);
    }

    #[test]
    fn test_display_shows_unset_fields() {
        let mut record = CompanyRecord::new("Acme");
        record.page_identifier = Some(PageId::Slug("acme".into()));
        assert_eq!(
            record.to_string(),
            "page=acme size_code=unset size_range_start=unset"
        );
    }
}
