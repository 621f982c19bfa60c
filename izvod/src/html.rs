//! Raw fragment extraction from the statement HTML.

use std::io::Read;

use scraper::{Html, Selector};

use crate::error::ConvertError;
use crate::metadata::scan_metadata;
use crate::model::BankStatement;
use crate::transactions::parse_transactions;

/// The statement reduced to its ordered `span` text fragments.
///
/// The bank's HTML carries no usable structure; everything downstream works
/// off this flat sequence. Each fragment is trimmed and non-empty, with
/// non-breaking spaces already replaced. Nested spans contribute both their
/// composite text and the inner texts, which the fragment heuristics
/// tolerate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlData {
    pub fragments: Vec<String>,
}

impl HtmlData {
    /// Reads statement HTML and extracts the fragment sequence.
    ///
    /// The only failure mode is the read itself (including invalid UTF-8);
    /// any well-formed or malformed markup yields a fragment sequence.
    pub fn parse<R: Read>(mut reader: R) -> Result<HtmlData, ConvertError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let document = Html::parse_document(&content);
        let selector = Selector::parse("span").expect("valid selector");

        let mut fragments = Vec::new();
        for span in document.select(&selector) {
            let mut chunks = Vec::new();
            for chunk in span.text() {
                let cleaned = chunk.replace('\u{00A0}', " ");
                let trimmed = cleaned.trim();
                if !trimmed.is_empty() {
                    chunks.push(trimmed.to_string());
                }
            }

            if !chunks.is_empty() {
                fragments.push(chunks.join("\n"));
            }
        }

        Ok(HtmlData { fragments })
    }
}

impl From<Vec<String>> for HtmlData {
    fn from(fragments: Vec<String>) -> Self {
        HtmlData { fragments }
    }
}

impl From<HtmlData> for BankStatement {
    fn from(data: HtmlData) -> Self {
        BankStatement {
            metadata: scan_metadata(&data.fragments),
            transactions: parse_transactions(&data.fragments),
        }
    }
}
