//! Serde models of the `pmtnotification` element tree.
//!
//! The tree is fixed: every element is always present, in this order, and
//! unset values serialize as empty elements. All values are strings so the
//! models stay a faithful mirror of the document rather than of the domain.

use serde::Serialize;

use crate::model::{BankStatement, Transaction};
use crate::serialization::common::{format_account_number, format_minor_units};
use crate::utils::{format_iso_midnight, normalize_date};

const NOTIFICATION_TYPE: &str = "ibank.payment.notification.ledger";
const TRANSACTION_TYPE: &str = "ibank.payment.pp3";
const TRANSACTION_PLACE: &str = "999905 OfficeBanking";
const FEE_COMMENT: &str = "Oslobođeno poreza po članu 25. Zakona o PDV.";

#[derive(Debug, Serialize)]
#[serde(rename = "pmtnotification")]
pub(super) struct PmtNotification {
    notificationtype: String,
    status: Status,
    curdef: String,
    acctid: String,
    stmtnumber: String,
    ledgerbal: BalanceInfo,
    availbal: BalanceInfo,
    reservedfunds: String,
    instantbal: BalanceInfo,
    extension: Extension,
    overdraftremaining: String,
    overdraftused: String,
    directdebitreserved: String,
    projectedavail: String,
    marketingmessage: String,
    overdraftinterest: String,
    period: String,
    feetotal: String,
    noncashorders: String,
    income: String,
    outflow: String,
    accountfee: String,
    feecomment: String,
    overdraft: Overdraft,
    trnlist: TrnList,
    rejected: Rejected,
    reservedfundstype: ReservedFundsType,
}

#[derive(Debug, Serialize)]
struct Status {
    code: String,
    severity: String,
    details: String,
}

#[derive(Debug, Serialize)]
struct BalanceInfo {
    balamt: String,
    dtasof: String,
}

#[derive(Debug, Serialize)]
struct Extension {
    headercomment: String,
    footercomment: String,
    headerdetails: HeaderDetails,
}

#[derive(Debug, Serialize)]
struct HeaderDetails {
    intem: Intem,
}

#[derive(Debug, Serialize)]
struct Intem {
    #[serde(rename = "@order")]
    order: String,
    #[serde(rename = "@label")]
    label: String,
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Debug, Serialize)]
struct Overdraft {
    amount: String,
    dtasof: String,
    dtasto: String,
    intrt: String,
}

#[derive(Debug, Serialize)]
struct TrnList {
    #[serde(rename = "@count")]
    count: String,
    #[serde(rename = "stmttrn")]
    transactions: Vec<StmtTrn>,
}

#[derive(Debug, Serialize)]
struct StmtTrn {
    trntype: String,
    fitid: String,
    trnuid: String,
    benefit: String,
    payeeinfo: PayeeInfo,
    payeeaccountinfo: PayeeAccountInfo,
    dtposted: String,
    trnamt: String,
    purpose: String,
    purposecode: String,
    curdef: String,
    payeerefnumber: String,
    trnplace: String,
    dtuser: String,
    dtavail: String,
    refnumber: String,
    refmodel: String,
    payeerefmodel: String,
    urgency: String,
    fee: String,
    statusinfo: TrnStatus,
}

#[derive(Debug, Serialize)]
struct PayeeInfo {
    name: String,
    city: String,
}

#[derive(Debug, Serialize)]
struct PayeeAccountInfo {
    acctid: String,
    bankid: String,
    bankname: String,
}

#[derive(Debug, Serialize)]
struct TrnStatus {
    code: String,
    timeposted: String,
}

#[derive(Debug, Serialize)]
struct Rejected {
    #[serde(rename = "@count")]
    count: String,
}

#[derive(Debug, Serialize)]
struct ReservedFundsType {
    reserveditem: ReservedItem,
}

#[derive(Debug, Serialize)]
struct ReservedItem {
    description: String,
    ordercount: String,
    ordersum: String,
    comment: String,
}

pub(super) fn document_from_statement(statement: &BankStatement) -> PmtNotification {
    let metadata = &statement.metadata;

    let currency = metadata.currency.code().to_string();
    let ending_balance = format_minor_units(metadata.ending_balance.unwrap_or(0), '.');
    let statement_dtasof = metadata
        .statement_date
        .as_deref()
        .map(normalize_date)
        .unwrap_or_default();

    PmtNotification {
        notificationtype: NOTIFICATION_TYPE.to_string(),
        status: Status {
            code: "0".to_string(),
            severity: "INFO".to_string(),
            details: String::new(),
        },
        curdef: currency.clone(),
        acctid: format_account_number(metadata.account_number.as_deref().unwrap_or("")),
        stmtnumber: metadata.statement_number.clone().unwrap_or_default(),
        ledgerbal: BalanceInfo {
            balamt: ending_balance.clone(),
            dtasof: statement_dtasof.clone(),
        },
        availbal: BalanceInfo {
            balamt: ending_balance.clone(),
            dtasof: statement_dtasof,
        },
        reservedfunds: "0.00".to_string(),
        instantbal: BalanceInfo {
            balamt: ending_balance,
            dtasof: String::new(),
        },
        extension: Extension {
            headercomment: String::new(),
            footercomment: String::new(),
            headerdetails: HeaderDetails {
                intem: Intem {
                    order: String::new(),
                    label: String::new(),
                    value: String::new(),
                },
            },
        },
        overdraftremaining: String::new(),
        overdraftused: String::new(),
        directdebitreserved: String::new(),
        projectedavail: String::new(),
        marketingmessage: String::new(),
        overdraftinterest: String::new(),
        period: String::new(),
        feetotal: "0.00".to_string(),
        noncashorders: "0.00".to_string(),
        income: format_minor_units(statement.income(), '.'),
        outflow: format_minor_units(statement.outflow(), '.'),
        accountfee: "0.00".to_string(),
        feecomment: FEE_COMMENT.to_string(),
        overdraft: Overdraft {
            amount: "0.00".to_string(),
            dtasof: String::new(),
            dtasto: String::new(),
            intrt: String::new(),
        },
        trnlist: TrnList {
            count: statement.transactions.len().to_string(),
            transactions: statement
                .transactions
                .iter()
                .map(|txn| stmttrn_from(txn, &currency))
                .collect(),
        },
        rejected: Rejected {
            count: "0".to_string(),
        },
        reservedfundstype: ReservedFundsType {
            reserveditem: ReservedItem {
                description: String::new(),
                ordercount: "0".to_string(),
                ordersum: "0".to_string(),
                comment: String::new(),
            },
        },
    }
}

fn stmttrn_from(txn: &Transaction, currency: &str) -> StmtTrn {
    let dtposted = txn.posted.map(format_iso_midnight).unwrap_or_default();

    StmtTrn {
        trntype: TRANSACTION_TYPE.to_string(),
        fitid: txn.fitid.clone().unwrap_or_default(),
        trnuid: String::new(),
        benefit: txn.benefit.to_string(),
        payeeinfo: PayeeInfo {
            name: txn.payee_name.clone().unwrap_or_default(),
            city: String::new(),
        },
        payeeaccountinfo: PayeeAccountInfo {
            acctid: txn.payee_account.clone().unwrap_or_default(),
            bankid: String::new(),
            bankname: txn.payee_bank.clone().unwrap_or_default(),
        },
        dtposted: dtposted.clone(),
        trnamt: format_minor_units(txn.amount, '.'),
        purpose: txn.purpose.clone().unwrap_or_default(),
        purposecode: txn.purposecode.clone(),
        curdef: currency.to_string(),
        payeerefnumber: txn.payee_refnumber.clone().unwrap_or_default(),
        trnplace: TRANSACTION_PLACE.to_string(),
        dtuser: txn.user.map(format_iso_midnight).unwrap_or_default(),
        dtavail: txn.available.map(format_iso_midnight).unwrap_or_default(),
        refnumber: String::new(),
        refmodel: String::new(),
        payeerefmodel: txn.payee_refmodel.clone(),
        urgency: txn.urgency.clone(),
        fee: "0".to_string(),
        statusinfo: TrnStatus {
            code: "80".to_string(),
            timeposted: dtposted,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatementMetadata;

    #[test]
    fn document_carries_statement_totals_and_count() {
        let statement = BankStatement {
            metadata: StatementMetadata {
                statement_number: Some("7".to_string()),
                statement_date: Some("15.03.2025".to_string()),
                account_number: Some("160000000000012345".to_string()),
                ending_balance: Some(40257019),
                ..StatementMetadata::default()
            },
            transactions: vec![Transaction {
                amount: 12000000,
                ..Transaction::default()
            }],
        };

        let document = document_from_statement(&statement);

        assert_eq!(document.stmtnumber, "7");
        assert_eq!(document.acctid, "160-0000000000123-45");
        assert_eq!(document.ledgerbal.balamt, "402570.19");
        assert_eq!(document.ledgerbal.dtasof, "2025-03-15T00:00:00");
        assert_eq!(document.instantbal.dtasof, "");
        assert_eq!(document.outflow, "120000.00");
        assert_eq!(document.income, "0.00");
        assert_eq!(document.trnlist.count, "1");
    }

    #[test]
    fn missing_metadata_renders_as_zero_and_empty() {
        let document = document_from_statement(&BankStatement::default());

        assert_eq!(document.curdef, "RSD");
        assert_eq!(document.acctid, "");
        assert_eq!(document.ledgerbal.balamt, "0.00");
        assert_eq!(document.ledgerbal.dtasof, "");
        assert_eq!(document.trnlist.count, "0");
        assert!(document.trnlist.transactions.is_empty());
    }

    #[test]
    fn malformed_statement_date_falls_back_to_sentinel() {
        let statement = BankStatement {
            metadata: StatementMetadata {
                statement_date: Some("bogus".to_string()),
                ..StatementMetadata::default()
            },
            transactions: Vec::new(),
        };

        let document = document_from_statement(&statement);

        assert_eq!(document.ledgerbal.dtasof, "2025-01-01T00:00:00");
    }
}
