use chrono::NaiveDate;
use std::fmt;

/// Signed balance in minor units (para), for statement-level figures.
pub type Balance = i64;

/// Currency of the statement, as printed next to `Valuta:`.
///
/// Serbian statements are almost always [`Currency::RSD`]; the
/// foreign-exchange layout shows up with EUR/USD/CHF. Anything else is kept
/// verbatim in [`Currency::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Currency {
    /// Serbian dinar
    RSD,
    /// Euro
    EUR,
    /// US dollar
    USD,
    /// Swiss franc
    CHF,
    /// Any other three-letter code, kept as-is
    Other(String),
}

impl Currency {
    /// Three-letter code, the way it is emitted into `curdef`.
    pub fn code(&self) -> &str {
        match self {
            Currency::RSD => "RSD",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::CHF => "CHF",
            Currency::Other(code) => code,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::RSD
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Direction of a transaction relative to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Benefit {
    /// Outgoing
    #[default]
    Debit,
    /// Incoming
    Credit,
}

impl fmt::Display for Benefit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Benefit::Debit => write!(f, "debit"),
            Benefit::Credit => write!(f, "credit"),
        }
    }
}

/// Statement-level header data scanned from the fragment sequence.
///
/// Every field except `currency` is optional: `None` means the statement
/// simply did not carry that label (or its value did not parse), which is
/// normal for this layout and never an error.
#[derive(Debug, Default, PartialEq)]
pub struct StatementMetadata {
    /// ordinal from `Izvod broj i datum:`
    pub statement_number: Option<String>,
    /// statement date, raw `DD.MM.YYYY` text as printed
    pub statement_date: Option<String>,
    /// 12- or 18-digit account number
    pub account_number: Option<String>,
    /// `RS` + 20 digits
    pub iban: Option<String>,
    /// currency code, `RSD` unless the statement says otherwise
    pub currency: Currency,
    /// account holder line (company name)
    pub account_holder: Option<String>,
    /// balance before the first transaction
    pub beginning_balance: Option<Balance>,
    /// balance after the last transaction
    pub ending_balance: Option<Balance>,
    /// statement total of the debit column
    pub total_debit: Option<Balance>,
    /// statement total of the credit column
    pub total_credit: Option<Balance>,
}

/// One reconstructed transaction.
///
/// Built field by field by the stream parser; any field whose fragment was
/// missing or failed its predicate stays at the default. `amount` is in
/// minor units and is strictly positive for every record that ends up in a
/// [`BankStatement`], zero-amount decodes are discarded by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// ordinal within the statement, as printed in the first column
    pub serial_no: String,
    /// external payment-system reference (`FT…` token or dashed reference)
    pub fitid: Option<String>,
    /// debit/credit direction
    pub benefit: Benefit,
    /// booking date
    pub posted: Option<NaiveDate>,
    /// user date; the domestic layout prints it together with the booking date
    pub user: Option<NaiveDate>,
    /// availability date
    pub available: Option<NaiveDate>,
    /// amount in minor units, always > 0 once emitted
    pub amount: u64,
    /// payment purpose, at most 140 characters
    pub purpose: Option<String>,
    pub payee_name: Option<String>,
    pub payee_account: Option<String>,
    pub payee_bank: Option<String>,
    pub payee_refnumber: Option<String>,
    /// reference model, `97` on every observed statement
    pub payee_refmodel: String,
    /// payment purpose code
    pub purposecode: String,
    /// processing urgency marker
    pub urgency: String,
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction {
            serial_no: String::new(),
            fitid: None,
            benefit: Benefit::default(),
            posted: None,
            user: None,
            available: None,
            amount: 0,
            purpose: None,
            payee_name: None,
            payee_account: None,
            payee_bank: None,
            payee_refnumber: None,
            payee_refmodel: "97".to_string(),
            purposecode: "221".to_string(),
            urgency: "INT".to_string(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let posted_str = self
            .posted
            .map(|d| d.to_string())
            .unwrap_or_default();

        write!(
            f,
            "{:<4} {:<10} {:<6} {:>12} {} {}",
            self.serial_no,
            posted_str,
            self.benefit,
            self.amount,
            self.payee_name.as_deref().unwrap_or(""),
            self.purpose.as_deref().unwrap_or(""),
        )
    }
}

/// Central structure of the library: one parsed bank statement.
///
/// Converting a statement fills this structure from the HTML fragment
/// sequence; serialization then reads it once to write the notification
/// document. Transactions keep document order.
///
/// ```no_run
/// use std::{fs::File, io};
/// use izvod::{BankStatement, HtmlData};
///
/// # fn main() -> Result<(), izvod::ConvertError> {
/// let data = HtmlData::parse(File::open("izvod.html")?)?;
/// let statement = BankStatement::from(data);
///
/// let stdout = io::stdout();
/// statement.write_ibank(stdout.lock())?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, PartialEq)]
pub struct BankStatement {
    pub metadata: StatementMetadata,
    pub transactions: Vec<Transaction>,
}

impl BankStatement {
    /// Sum of credit amounts, in minor units.
    pub fn income(&self) -> u64 {
        self.transactions
            .iter()
            .filter(|t| t.benefit == Benefit::Credit)
            .map(|t| t.amount)
            .sum()
    }

    /// Sum of debit amounts, in minor units.
    pub fn outflow(&self) -> u64 {
        self.transactions
            .iter()
            .filter(|t| t.benefit == Benefit::Debit)
            .map(|t| t.amount)
            .sum()
    }
}
