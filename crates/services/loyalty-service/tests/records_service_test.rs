//! Spreadsheet record linkage tests.

use std::sync::Arc;

use chrono::Utc;

use common::AppError;
use domain::{DiopterData, LoyaltyUser, Points, UserRole};
use loyalty_service_lib::integrations::{MockSheetSource, Sheet};
use loyalty_service_lib::repository::MockUserRepository;
use loyalty_service_lib::service::{RecordsService, SheetRecords, NO_PHONE};

fn member(phone: &str) -> LoyaltyUser {
    LoyaltyUser {
        id: 4,
        username: "Tarik Šehić".to_string(),
        email: "tarik@example.ba".to_string(),
        phone: phone.to_string(),
        rfid: 50000005,
        points: Points::ZERO,
        has_diopter: false,
        diopter: DiopterData::default(),
        is_app: true,
        role: UserRole::User,
        notification_settings: None,
        push_token: None,
        registered_at: Utc::now(),
    }
}

fn users(phone: &'static str) -> MockUserRepository {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(member(phone))));
    users
}

fn cells(row: &[&str]) -> Vec<String> {
    row.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_member_without_phone_cannot_be_linked() {
    let mut sheets = MockSheetSource::new();
    sheets.expect_rows().never();

    let records = SheetRecords::new(Arc::new(users("  ")), Arc::new(sheets));
    let err = tokio_test::block_on(records.glasses(4)).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == NO_PHONE));
}

#[tokio::test]
async fn test_glasses_linked_by_phone_form() {
    let mut sheets = MockSheetSource::new();
    sheets
        .expect_rows()
        .withf(|sheet| *sheet == Sheet::Glasses)
        .returning(|_| {
            Ok(vec![
                cells(&["IME", "PREZIME", "BR TEL", "OKVIR"]),
                cells(&["Tarik", "Šehić", "+387 62 267 066", "RAY-BAN RB3025"]),
                cells(&["Amar", "Delić", "061 000 111", "OAKLEY"]),
            ])
        });

    let records = SheetRecords::new(Arc::new(users("062267066")), Arc::new(sheets));
    let glasses = records.glasses(4).await.unwrap();
    assert_eq!(glasses.len(), 1);
    assert_eq!(glasses[0].row_number, 2);
}

#[tokio::test]
async fn test_unconfigured_sheet_is_unavailable() {
    let mut sheets = MockSheetSource::new();
    sheets
        .expect_rows()
        .returning(|_| Err(AppError::service_unavailable("Review sheet")));

    let records = SheetRecords::new(Arc::new(users("062267066")), Arc::new(sheets));
    let err = records.review_history(4).await.unwrap_err();
    assert!(matches!(err, AppError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn test_companies_skip_blank_names() {
    let mut sheets = MockSheetSource::new();
    sheets.expect_rows().returning(|_| {
        Ok(vec![
            cells(&["Naziv", "Adresa"]),
            cells(&["BH Telecom", "Franca Lehara 7, Sarajevo"]),
            cells(&["", "Mostar"]),
        ])
    });

    let records = SheetRecords::new(Arc::new(MockUserRepository::new()), Arc::new(sheets));
    let companies = records.companies().await.unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].name, "BH Telecom");
}
