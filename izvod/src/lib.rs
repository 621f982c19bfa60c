pub mod error;
pub mod html;
pub mod metadata;
pub mod model;
pub mod serialization;
pub mod transactions;

mod utils;

pub use crate::error::ConvertError;
pub use crate::html::HtmlData;
pub use crate::metadata::scan_metadata;
pub use crate::model::{Balance, BankStatement, Benefit, Currency, StatementMetadata, Transaction};
pub use crate::transactions::parse_transactions;
