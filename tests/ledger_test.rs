mod common;

use anyhow::Result;
use common::{parse_date, test_service, AprilLedger};
use seisan::application::{AppError, ValidationError};
use seisan::domain::{sum_amounts, ExpenseRecord, Period};

#[tokio::test]
async fn test_append_then_load_round_trip() -> Result<()> {
    let (service, _temp) = test_service()?;

    service
        .submit(
            "Yamada",
            parse_date("2024-04-03"),
            "ABC Store",
            "Taxi",
            "to station",
            1200,
        )
        .await?;

    let records = service.load_ledger().await?;
    assert_eq!(records.len(), 1);

    let r = &records[0];
    assert_eq!(r.owner, "Yamada");
    assert_eq!(r.date, parse_date("2024-04-03"));
    assert_eq!(r.payee, "ABC Store");
    assert_eq!(r.item, "Taxi");
    assert_eq!(r.memo, "to station");
    assert_eq!(r.amount, 1200);

    Ok(())
}

#[tokio::test]
async fn test_appends_preserve_insertion_order() -> Result<()> {
    let (service, _temp) = test_service()?;
    AprilLedger::seed(&service).await?;

    let records = service.load_ledger().await?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].payee, "ABC Store");
    assert_eq!(records[1].payee, "XYZ Corp");

    Ok(())
}

#[tokio::test]
async fn test_empty_backend_loads_as_empty() -> Result<()> {
    let (service, _temp) = test_service()?;

    // No file exists yet; reads must degrade to an empty ledger, not fail.
    assert!(service.load_ledger().await?.is_empty());
    assert!(service.periods().await?.is_empty());

    let period: Period = "2024-04".parse()?;
    assert!(service.list_for_period(None, period).await?.is_empty());
    assert_eq!(service.total_for_period(None, period).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_non_positive_amount_is_rejected_without_side_effect() -> Result<()> {
    let (service, _temp) = test_service()?;

    for bad_amount in [0, -500] {
        let result = service
            .submit(
                "Yamada",
                parse_date("2024-04-03"),
                "ABC Store",
                "Taxi",
                "",
                bad_amount,
            )
            .await;

        match result {
            Err(AppError::Validation(ValidationError::NonPositiveAmount(a))) => {
                assert_eq!(a, bad_amount)
            }
            other => panic!("expected NonPositiveAmount, got {:?}", other.map(|_| ())),
        }
    }

    // Storage was never touched.
    assert!(service.load_ledger().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_required_fields_are_rejected() -> Result<()> {
    let (service, _temp) = test_service()?;
    let date = parse_date("2024-04-03");

    let cases: [(&str, &str, &str, ValidationError); 3] = [
        ("", "ABC Store", "Taxi", ValidationError::MissingOwner),
        ("Yamada", "  ", "Taxi", ValidationError::MissingPayee),
        ("Yamada", "ABC Store", "", ValidationError::MissingItem),
    ];

    for (owner, payee, item, expected) in cases {
        let result = service.submit(owner, date, payee, item, "", 100).await;
        match result {
            Err(AppError::Validation(e)) => assert_eq!(e, expected),
            other => panic!("expected {:?}, got {:?}", expected, other.map(|_| ())),
        }
    }

    assert!(service.load_ledger().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_delete_removes_first_match_only() -> Result<()> {
    let (service, _temp) = test_service()?;
    let date = parse_date("2024-04-03");

    // Two records differing only in memo share the same (owner, date, amount).
    service
        .submit("Yamada", date, "ABC Store", "Taxi", "outbound", 1200)
        .await?;
    service
        .submit("Yamada", date, "ABC Store", "Taxi", "return", 1200)
        .await?;

    let target = ExpenseRecord::new("Yamada", date, "ABC Store", "Taxi", 1200);
    service.delete_record(&target).await?;

    let records = service.load_ledger().await?;
    assert_eq!(records.len(), 1);
    // First matching row in storage order went; the second survives.
    assert_eq!(records[0].memo, "return");

    Ok(())
}

#[tokio::test]
async fn test_delete_missing_record_is_not_found() -> Result<()> {
    let (service, _temp) = test_service()?;
    AprilLedger::seed(&service).await?;

    let target = ExpenseRecord::new("Suzuki", parse_date("2024-04-03"), "-", "-", 9999);
    let result = service.delete_record(&target).await;

    assert!(matches!(result, Err(AppError::RecordNotFound { .. })));
    assert_eq!(service.load_ledger().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_reference_scenario() -> Result<()> {
    let (service, _temp) = test_service()?;
    AprilLedger::seed(&service).await?;

    let period: Period = "2024-04".parse()?;

    let records = service.list_for_period(Some("Yamada"), period).await?;
    assert_eq!(records.len(), 2);
    assert_eq!(sum_amounts(&records), 1500);

    let report = service.monthly_report(period).await?;
    assert_eq!(report.owners.len(), 1);
    assert_eq!(report.owners[0].owner, "Yamada");
    assert_eq!(report.owners[0].total, 1500);

    // Deleting the 1200-yen taxi entry leaves only the 300-yen one.
    let target = ExpenseRecord::new("Yamada", parse_date("2024-04-03"), "ABC Store", "Taxi", 1200);
    service.delete_record(&target).await?;

    let records = service.list_for_period(Some("Yamada"), period).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(sum_amounts(&records), 300);

    Ok(())
}

#[tokio::test]
async fn test_list_filters_by_owner_and_period() -> Result<()> {
    let (service, _temp) = test_service()?;
    AprilLedger::seed(&service).await?;
    service
        .submit("Sato", parse_date("2024-04-05"), "Cafe", "Meeting", "", 800)
        .await?;
    service
        .submit("Yamada", parse_date("2024-05-01"), "JR", "Train", "", 450)
        .await?;

    let april: Period = "2024-04".parse()?;
    let may: Period = "2024-05".parse()?;

    assert_eq!(service.list_for_period(None, april).await?.len(), 3);
    assert_eq!(
        service.list_for_period(Some("Yamada"), april).await?.len(),
        2
    );
    assert_eq!(service.list_for_period(Some("Sato"), april).await?.len(), 1);
    assert_eq!(service.list_for_period(Some("Sato"), may).await?.len(), 0);
    assert_eq!(service.total_for_period(Some("Yamada"), may).await?, 450);

    Ok(())
}
