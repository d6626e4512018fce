use std::io::{self, BufRead, Write};
use std::process::Command;
use log::warn;

const SEARCH_PAGE_URL: &str = "https://www.linkedin.com/search/results/companies/";

/// The human in the loop: sees a search page, answers with a page URL.
pub trait Operator {
    /// Fire-and-forget; failing to open a browser must not stop the run.
    fn open_search_page(&mut self, url: &str);

    /// Blocks for one line of input. `Ok(None)` means the input stream closed.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;
}

pub fn search_page_url(company: &str) -> String {
    format!(
        "{}?keywords={}&spellCorrectionEnabled=false",
        SEARCH_PAGE_URL,
        urlencoding::encode(company)
    )
}

/// Operator on the controlling terminal, with the system browser.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn open_search_page(&mut self, url: &str) {
        if let Err(e) = open_in_browser(url) {
            warn!("Could not open a browser for {}: {}", url, e);
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", question)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

pub fn open_in_browser(url: &str) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("rundll32");
        c.arg("url.dll,FileProtocolHandler").arg(url);
        c
    };
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(url);
        c
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    command.spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_url_encodes_name() {
        assert_eq!(
            search_page_url("Gamma & Sons"),
            concat!(
                "https://www.linkedin.com/search/results/companies/",
                "?keywords=Gamma%20%26%20Sons&spellCorrectionEnabled=false"
            )
        );
    }
}
