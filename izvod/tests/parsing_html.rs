use izvod::{BankStatement, Benefit, Currency, HtmlData};
use std::{fs::File, io::BufReader, path::PathBuf};

fn fixture_path(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel)
}

fn parse_html_fixture(rel: &str) -> BankStatement {
    let path = fixture_path(rel);
    let file =
        File::open(&path).unwrap_or_else(|e| panic!("failed to open HTML fixture {path:?}: {e}"));
    let reader = BufReader::new(file);

    let data = HtmlData::parse(reader).expect("failed to extract fragments from HTML fixture");

    BankStatement::from(data)
}

#[test]
fn domestic_statement_metadata_is_complete() {
    let stmt = parse_html_fixture("domestic.html");
    let metadata = &stmt.metadata;

    assert_eq!(metadata.statement_number.as_deref(), Some("7"));
    assert_eq!(metadata.statement_date.as_deref(), Some("15.03.2025"));
    assert_eq!(metadata.currency, Currency::RSD);
    assert_eq!(
        metadata.account_number.as_deref(),
        Some("160000000000012345")
    );
    assert_eq!(metadata.iban.as_deref(), Some("RS35160005010000012345"));
    assert_eq!(
        metadata.account_holder.as_deref(),
        Some("FIRMA PLUS DOO BEOGRAD")
    );
    assert_eq!(metadata.beginning_balance, Some(37100431));
    assert_eq!(metadata.ending_balance, Some(40257019));
    assert_eq!(metadata.total_debit, Some(12000000));
    assert_eq!(metadata.total_credit, Some(15156588));
}

#[test]
fn domestic_statement_reconstructs_both_records() {
    let stmt = parse_html_fixture("domestic.html");

    assert_eq!(
        stmt.transactions.len(),
        2,
        "statement should contain two transactions"
    );

    let debit = &stmt.transactions[0];
    assert_eq!(debit.serial_no, "1");
    assert_eq!(debit.benefit, Benefit::Debit);
    assert_eq!(debit.amount, 12000000);
    assert_eq!(debit.fitid.as_deref(), Some("FT25075NXLR8"));
    assert_eq!(debit.purpose.as_deref(), Some("Plaćanje po računu 55/2025"));
    assert_eq!(
        debit.payee_name.as_deref(),
        Some("ELEKTRODISTRIBUCIJA BEOGRAD")
    );

    let credit = &stmt.transactions[1];
    assert_eq!(credit.serial_no, "2");
    assert_eq!(credit.benefit, Benefit::Credit);
    assert_eq!(credit.amount, 15156588);
    assert_eq!(credit.fitid.as_deref(), Some("940-254-789123"));
    assert_eq!(credit.payee_name.as_deref(), Some("FIRMA PLUS DOO"));
}

#[test]
fn domestic_totals_match_reconstructed_directions() {
    let stmt = parse_html_fixture("domestic.html");

    assert_eq!(stmt.outflow() as i64, stmt.metadata.total_debit.unwrap());
    assert_eq!(stmt.income() as i64, stmt.metadata.total_credit.unwrap());
}

#[test]
fn foreign_statement_decodes_composite_block() {
    let stmt = parse_html_fixture("foreign.html");

    assert_eq!(stmt.metadata.currency, Currency::EUR);
    assert_eq!(
        stmt.metadata.account_holder.as_deref(),
        Some("EXPORT TIM D.O.O. NOVI SAD")
    );
    assert_eq!(stmt.metadata.beginning_balance, Some(1234050));
    assert_eq!(stmt.metadata.ending_balance, Some(1684050));
    assert_eq!(stmt.metadata.total_debit, None);
    assert_eq!(stmt.metadata.total_credit, None);

    assert_eq!(stmt.transactions.len(), 1);
    let txn = &stmt.transactions[0];
    assert_eq!(txn.benefit, Benefit::Credit);
    assert_eq!(txn.amount, 450000);
    assert_eq!(txn.fitid.as_deref(), Some("FT25068QWRT1"));
    assert_eq!(txn.payee_bank.as_deref(), Some("DEUTSCHE BANK AG"));
    assert_eq!(txn.payee_name.as_deref(), Some("ACME GMBH"));
    assert_eq!(txn.purpose.as_deref(), Some("Payment for services"));
}

#[test]
fn parsing_is_deterministic_across_runs() {
    let first = parse_html_fixture("domestic.html");
    let second = parse_html_fixture("domestic.html");

    assert_eq!(first, second);
}
