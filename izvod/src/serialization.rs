mod common;
mod ibank;

pub use common::format_minor_units;

use std::io::Write;

use quick_xml::se::Serializer;
use serde::Serialize;

use crate::error::ConvertError;
use crate::model::BankStatement;

impl BankStatement {
    /// Writes the statement as an iBank `pmtnotification` document.
    ///
    /// The element tree is fixed: unset values render as empty elements and
    /// missing balances as `0.00`, so any statement, including one with no
    /// transactions, produces a complete well-formed document.
    pub fn write_ibank<W: Write>(&self, mut writer: W) -> Result<(), ConvertError> {
        let document = ibank::document_from_statement(self);

        let mut xml = String::new();
        let mut ser = Serializer::new(&mut xml);
        ser.indent(' ', 2);
        document.serialize(ser)?;

        writer.write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{BankStatement, Benefit, StatementMetadata, Transaction};
    use chrono::NaiveDate;

    fn render(statement: &BankStatement) -> String {
        let mut out = Vec::new();
        statement.write_ibank(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_statement_renders_full_skeleton() {
        let xml = render(&BankStatement::default());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<pmtnotification>"));
        assert!(xml.contains(
            "<notificationtype>ibank.payment.notification.ledger</notificationtype>"
        ));
        assert!(xml.contains("<severity>INFO</severity>"));
        assert!(xml.contains("<curdef>RSD</curdef>"));
        assert!(xml.contains("<balamt>0.00</balamt>"));
        assert!(xml.contains("<income>0.00</income>"));
        assert!(xml.contains("<outflow>0.00</outflow>"));
        assert!(xml.contains("<trnlist count=\"0\"/>"));
        assert!(xml.contains("<rejected count=\"0\"/>"));
        assert!(xml.contains("<feecomment>Oslobođeno poreza po članu 25. Zakona o PDV.</feecomment>"));
        assert!(xml.contains("<intem order=\"\" label=\"\" value=\"\"/>"));
        assert!(!xml.contains("<stmttrn>"));
    }

    #[test]
    fn elements_keep_the_fixed_document_order() {
        let xml = render(&BankStatement::default());

        let positions: Vec<usize> = [
            "<notificationtype>",
            "<status>",
            "<curdef>",
            "<acctid",
            "<stmtnumber",
            "<ledgerbal>",
            "<availbal>",
            "<reservedfunds>",
            "<instantbal>",
            "<extension>",
            "<feetotal>",
            "<income>",
            "<outflow>",
            "<overdraft>",
            "<trnlist",
            "<rejected",
            "<reservedfundstype>",
        ]
        .iter()
        .map(|tag| xml.find(tag).unwrap_or_else(|| panic!("missing {tag}")))
        .collect();

        for pair in positions.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn transactions_render_with_amounts_and_status() {
        let statement = BankStatement {
            metadata: StatementMetadata {
                statement_number: Some("7".to_string()),
                statement_date: Some("15.03.2025".to_string()),
                account_number: Some("160000000000012345".to_string()),
                ending_balance: Some(40257019),
                ..StatementMetadata::default()
            },
            transactions: vec![
                Transaction {
                    serial_no: "1".to_string(),
                    fitid: Some("FT25075NXLR8".to_string()),
                    benefit: Benefit::Debit,
                    posted: NaiveDate::from_ymd_opt(2025, 3, 15),
                    user: NaiveDate::from_ymd_opt(2025, 3, 15),
                    available: NaiveDate::from_ymd_opt(2025, 3, 16),
                    amount: 12000000,
                    purpose: Some("Plaćanje po računu 55/2025".to_string()),
                    payee_name: Some("ELEKTRODISTRIBUCIJA BEOGRAD".to_string()),
                    payee_refnumber: Some("FT25075NXLR8".to_string()),
                    ..Transaction::default()
                },
                Transaction {
                    serial_no: "2".to_string(),
                    benefit: Benefit::Credit,
                    amount: 15156588,
                    ..Transaction::default()
                },
            ],
        };

        let xml = render(&statement);

        assert!(xml.contains("<acctid>160-0000000000123-45</acctid>"));
        assert!(xml.contains("<stmtnumber>7</stmtnumber>"));
        assert!(xml.contains("<trnlist count=\"2\">"));
        assert!(xml.contains("<trntype>ibank.payment.pp3</trntype>"));
        assert!(xml.contains("<fitid>FT25075NXLR8</fitid>"));
        assert!(xml.contains("<benefit>debit</benefit>"));
        assert!(xml.contains("<benefit>credit</benefit>"));
        assert!(xml.contains("<trnamt>120000.00</trnamt>"));
        assert!(xml.contains("<trnamt>151565.88</trnamt>"));
        assert!(xml.contains("<dtposted>2025-03-15T00:00:00</dtposted>"));
        assert!(xml.contains("<dtavail>2025-03-16T00:00:00</dtavail>"));
        assert!(xml.contains("<name>ELEKTRODISTRIBUCIJA BEOGRAD</name>"));
        assert!(xml.contains("<trnplace>999905 OfficeBanking</trnplace>"));
        assert!(xml.contains("<payeerefmodel>97</payeerefmodel>"));
        assert!(xml.contains("<purposecode>221</purposecode>"));
        assert!(xml.contains("<urgency>INT</urgency>"));
        assert!(xml.contains("<fee>0</fee>"));
        assert!(xml.contains("<code>80</code>"));
        assert!(xml.contains("<timeposted>2025-03-15T00:00:00</timeposted>"));
        assert!(xml.contains("<income>151565.88</income>"));
        assert!(xml.contains("<outflow>120000.00</outflow>"));
    }

    #[test]
    fn unset_transaction_fields_render_as_empty_elements() {
        let statement = BankStatement {
            metadata: StatementMetadata::default(),
            transactions: vec![Transaction {
                serial_no: "1".to_string(),
                amount: 100,
                ..Transaction::default()
            }],
        };

        let xml = render(&statement);

        assert!(xml.contains("<fitid/>"));
        assert!(xml.contains("<dtposted/>"));
        assert!(xml.contains("<purpose/>"));
        assert!(xml.contains("<timeposted/>"));
    }

    #[test]
    fn output_is_deterministic() {
        let statement = BankStatement {
            metadata: StatementMetadata {
                statement_number: Some("3".to_string()),
                ..StatementMetadata::default()
            },
            transactions: vec![Transaction {
                serial_no: "1".to_string(),
                amount: 4200,
                ..Transaction::default()
            }],
        };

        assert_eq!(render(&statement), render(&statement));
    }
}
