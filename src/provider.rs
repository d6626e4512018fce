use serde::Deserialize;

use crate::errors::LookupError;

/// The parts of a LinkedIn company record this tool reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetails {
    #[serde(default)]
    pub universal_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub staff_count_range: Option<StaffCountRange>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct StaffCountRange {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

/// Outcome of reading the staff count from a successful lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffLookup {
    Start(i64),
    /// The page exists but publishes no staff-count range.
    Absent,
}

impl CompanyDetails {
    pub fn staff_lookup(&self) -> StaffLookup {
        match self.staff_count_range.and_then(|range| range.start) {
            Some(start) => StaffLookup::Start(start),
            None => StaffLookup::Absent,
        }
    }
}

/// Source of company records keyed by page identifier.
pub trait CompanyInfoProvider {
    fn get_company(&mut self, page_id: &str) -> Result<CompanyDetails, LookupError>;
}

impl<T: CompanyInfoProvider + ?Sized> CompanyInfoProvider for Box<T> {
    fn get_company(&mut self, page_id: &str) -> Result<CompanyDetails, LookupError> {
        (**self).get_company(page_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_lookup_from_json() {
        let details: CompanyDetails = serde_json::from_str(
            r#"{"universalName":"acme","name":"Acme","staffCountRange":{"start":51,"end":200}}"#,
        )
        .unwrap();
        assert_eq!(details.universal_name.as_deref(), Some("acme"));
        assert_eq!(details.staff_lookup(), StaffLookup::Start(51));
    }

    #[test]
    fn test_missing_range_is_absent() {
        let details: CompanyDetails = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(details.staff_lookup(), StaffLookup::Absent);

        let details: CompanyDetails =
            serde_json::from_str(r#"{"staffCountRange":{"end":10}}"#).unwrap();
        assert_eq!(details.staff_lookup(), StaffLookup::Absent);
    }
}
