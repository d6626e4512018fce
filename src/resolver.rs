use log::{error, info, warn};

use crate::classifier::{classify, StaffCount};
use crate::errors::{error_chain, LookupError, ResolveError};
use crate::operator::{search_page_url, Operator};
use crate::provider::{CompanyInfoProvider, StaffLookup};
use crate::registry::{CompanyRecord, CompanyRegistry, PageId};
use crate::resume_manager::ProgressStore;

/// Operator answer that gives up on the current company.
pub const SKIP_SIGNAL: &str = "s";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Companies resolved by the operator during this run.
    pub resolved: usize,
    /// Companies that were already resolved when the run started.
    pub already_known: usize,
    pub rows_written: usize,
}

/// Extracts the page slug from a company or school URL, e.g. `google` from
/// `https://www.linkedin.com/company/google/` or `ucla` from
/// `https://www.linkedin.com/school/ucla/`.
pub fn page_identifier(url: &str) -> Result<&str, LookupError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.split('/')
        .nth(4)
        .filter(|slug| !slug.is_empty())
        .ok_or_else(|| LookupError::MalformedUrl(url.to_string()))
}

/// Walks the registry in input order and resolves every company without a size code.
pub struct Resolver<P, O> {
    provider: P,
    operator: O,
}

impl<P: CompanyInfoProvider, O: Operator> Resolver<P, O> {
    pub fn new(provider: P, operator: O) -> Self {
        Resolver { provider, operator }
    }

    pub fn into_parts(self) -> (P, O) {
        (self.provider, self.operator)
    }

    pub fn run(
        &mut self,
        registry: &mut CompanyRegistry,
        store: &mut ProgressStore,
    ) -> Result<RunSummary, ResolveError> {
        let total = registry.len();
        let mut summary = RunSummary::default();

        for position in 1..=total {
            let Some(record) = registry.at_mut(position - 1) else {
                break;
            };
            let tag = format!("[{}/{}] {}", position, total, record.name);

            if record.is_resolved() {
                info!(
                    "{}: Already know it has at least {} staff (size code {})",
                    tag,
                    record.size_range_start.unwrap_or(StaffCount::NotFound),
                    record.size_code.map(|c| c.to_string()).unwrap_or_default()
                );
                summary.already_known += 1;
            } else {
                self.resolve(&tag, record)?;
                info!("{}: Full data: {}", tag, record);
                summary.resolved += 1;
            }

            if store.append(position, record)? {
                summary.rows_written += 1;
            }
        }

        Ok(summary)
    }

    fn resolve(&mut self, tag: &str, record: &mut CompanyRecord) -> Result<(), ResolveError> {
        let search_page = search_page_url(&record.name);
        info!("{}: Opening search page \"{}\"...", tag, search_page);
        self.operator.open_search_page(&search_page);

        let question = format!("{}: Input LinkedIn URL (\"{}\" to skip):", tag, SKIP_SIGNAL);
        let staff = loop {
            let answer = self
                .operator
                .ask(&question)
                .map_err(ResolveError::Prompt)?
                .ok_or(ResolveError::InputClosed)?;

            if answer == SKIP_SIGNAL {
                info!("{}: Skipped.", tag);
                record.page_identifier = Some(PageId::NotFound);
                break StaffLookup::Absent;
            }

            match self.lookup(tag, &answer) {
                Ok((slug, staff)) => {
                    record.page_identifier = Some(PageId::Slug(slug));
                    break staff;
                }
                Err(e) => error!("{}: {}. Try again.", tag, error_chain(&e)),
            }
        };

        let start = match staff {
            StaffLookup::Start(n) => StaffCount::Start(n),
            StaffLookup::Absent => StaffCount::NotFound,
        };
        record.size_range_start = Some(start);
        record.size_code = Some(classify(Some(start))?);
        Ok(())
    }

    fn lookup(&mut self, tag: &str, url: &str) -> Result<(String, StaffLookup), LookupError> {
        let slug = page_identifier(url)?.to_string();
        info!("{}: Searching for {}...", tag, slug);

        let details = self.provider.get_company(&slug)?;
        match details.staff_lookup() {
            StaffLookup::Start(n) if n < 0 => Err(LookupError::InvalidStaffCount(n)),
            StaffLookup::Absent => {
                warn!("{}: LinkedIn page may be missing staff size data", tag);
                Ok((slug, StaffLookup::Absent))
            }
            staff => Ok((slug, staff)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_identifier_company_and_school() {
        assert_eq!(page_identifier("https://www.linkedin.com/company/google/").unwrap(), "google");
        assert_eq!(page_identifier("https://www.linkedin.com/school/ucla/").unwrap(), "ucla");
        assert_eq!(page_identifier("https://www.linkedin.com/company/acme").unwrap(), "acme");
    }

    #[test]
    fn test_page_identifier_drops_query() {
        assert_eq!(
            page_identifier("https://www.linkedin.com/company/acme?trk=search#about").unwrap(),
            "acme"
        );
    }

    #[test]
    fn test_page_identifier_too_short() {
        let urls = [
            "",
            "acme",
            "https://www.linkedin.com/company",
            "https://www.linkedin.com/company/",
        ];
        for url in urls {
            assert!(
                matches!(page_identifier(url), Err(LookupError::MalformedUrl(_))),
                "{url:?}"
            );
        }
    }
}
