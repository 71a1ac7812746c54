//! Route handlers and their JSON payloads.
//!
//! Monetary values travel as JSON numbers. Responses are rounded to one
//! decimal place; the service keeps full precision.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::calculations::common::round_to_one_decimal;
use tax_core::{AllowanceDetail, AllowanceType, BracketResult, CalculationInput, TaxCalculation};
use tracing::info;

use crate::app::AppState;
use crate::csv_loader;
use crate::error::ApiError;

/// Multipart field carrying the CSV upload.
pub const CSV_FIELD: &str = "taxes";

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRequest {
    pub allowance_type: AllowanceType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub wht: Decimal,
    #[serde(default)]
    pub allowances: Vec<AllowanceRequest>,
}

impl From<TaxRequest> for CalculationInput {
    fn from(req: TaxRequest) -> Self {
        let allowances = req
            .allowances
            .into_iter()
            .map(|a| AllowanceDetail::new(a.allowance_type, a.amount))
            .collect();
        CalculationInput::new(req.total_income, req.wht, allowances)
    }
}

#[derive(Debug, Serialize)]
pub struct TaxLevelResponse {
    pub level: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
}

impl From<BracketResult> for TaxLevelResponse {
    fn from(row: BracketResult) -> Self {
        Self {
            level: row.label,
            tax: round_to_one_decimal(row.tax),
        }
    }
}

/// `tax` is the liability before withholding, `total_tax` what is still
/// owed after it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    pub tax_level: Vec<TaxLevelResponse>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_tax: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_refund: Option<Decimal>,
}

impl From<TaxCalculation> for TaxResponse {
    fn from(calc: TaxCalculation) -> Self {
        Self {
            tax: round_to_one_decimal(calc.tax),
            tax_level: calc.brackets.into_iter().map(Into::into).collect(),
            total_tax: round_to_one_decimal(calc.net_tax),
            tax_refund: calc.refund.map(round_to_one_decimal),
        }
    }
}

/// One row of a CSV upload result. `tax` is the amount still owed after
/// withholding.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvTaxResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax_refund: Option<Decimal>,
}

impl CsvTaxResponse {
    fn new(
        input: &CalculationInput,
        calc: &TaxCalculation,
    ) -> Self {
        Self {
            total_income: round_to_one_decimal(input.total_income),
            tax: round_to_one_decimal(calc.net_tax),
            tax_refund: calc.refund.map(round_to_one_decimal),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeductionAmount {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub name: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        name: state.app_info.name.clone(),
        version: state.app_info.version.clone(),
    })
}

/// `POST /tax/calculations`
pub async fn calculate_tax(
    State(state): State<AppState>,
    payload: Result<Json<TaxRequest>, JsonRejection>,
) -> Result<Json<TaxResponse>, ApiError> {
    let Json(request) = payload?;
    let input = CalculationInput::from(request);

    let calc = state.service.calculate(&input).await?;
    Ok(Json(calc.into()))
}

/// `POST /tax/calculations/upload-csv`
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<CsvTaxResponse>>, ApiError> {
    let mut multipart = multipart?;

    let mut contents = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(CSV_FIELD) {
            contents = Some(field.bytes().await?);
            break;
        }
    }
    let contents = contents
        .ok_or_else(|| ApiError::BadRequest(format!("missing file field '{CSV_FIELD}'")))?;

    let inputs = csv_loader::load_from_bytes(&contents)?;
    let results = state.service.calculate_batch(&inputs).await?;

    info!(rows = inputs.len(), "processed CSV upload");
    Ok(Json(
        inputs
            .iter()
            .zip(&results)
            .map(|(input, calc)| CsvTaxResponse::new(input, calc))
            .collect(),
    ))
}

/// `POST /admin/deductions/personal`
pub async fn set_personal_deduction(
    state: State<AppState>,
    payload: Result<Json<DeductionAmount>, JsonRejection>,
) -> Result<Json<DeductionAmount>, ApiError> {
    set_deduction(state, AllowanceType::Personal, payload).await
}

/// `POST /admin/deductions/k-receipt`
pub async fn set_k_receipt_deduction(
    state: State<AppState>,
    payload: Result<Json<DeductionAmount>, JsonRejection>,
) -> Result<Json<DeductionAmount>, ApiError> {
    set_deduction(state, AllowanceType::KReceipt, payload).await
}

async fn set_deduction(
    State(state): State<AppState>,
    allowance_type: AllowanceType,
    payload: Result<Json<DeductionAmount>, JsonRejection>,
) -> Result<Json<DeductionAmount>, ApiError> {
    let Json(request) = payload?;

    let amount = state
        .service
        .set_deduction(allowance_type, request.amount)
        .await?;
    Ok(Json(DeductionAmount { amount }))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn calculation(refund: Option<Decimal>) -> TaxCalculation {
        TaxCalculation {
            taxable_income: dec!(410000),
            tax: dec!(41000.04),
            brackets: vec![BracketResult {
                label: "150001-500000".to_string(),
                tax: dec!(41000.04),
            }],
            net_tax: if refund.is_some() { dec!(0) } else { dec!(11000.05) },
            refund,
        }
    }

    #[test]
    fn request_accepts_integers_and_floats() {
        let req: TaxRequest = serde_json::from_value(json!({
            "totalIncome": 500000,
            "wht": 0.5,
            "allowances": [{ "allowanceType": "k-receipt", "amount": 200.0 }]
        }))
        .expect("should deserialize");

        let input = CalculationInput::from(req);

        assert_eq!(input.total_income, dec!(500000));
        assert_eq!(input.withholding, dec!(0.5));
        assert_eq!(
            input.allowances,
            vec![AllowanceDetail::new(AllowanceType::KReceipt, dec!(200))]
        );
    }

    #[test]
    fn request_without_allowances_is_accepted() {
        let req: TaxRequest =
            serde_json::from_value(json!({ "totalIncome": 500000.0, "wht": 0.0 }))
                .expect("should deserialize");

        assert!(req.allowances.is_empty());
    }

    #[test]
    fn request_with_unknown_allowance_type_is_rejected() {
        let result = serde_json::from_value::<TaxRequest>(json!({
            "totalIncome": 500000.0,
            "wht": 0.0,
            "allowances": [{ "allowanceType": "pension", "amount": 1.0 }]
        }));

        assert!(result.is_err());
    }

    #[test]
    fn response_without_refund_omits_field() {
        let body = serde_json::to_value(TaxResponse::from(calculation(None))).unwrap();

        assert_eq!(
            body,
            json!({
                "tax": 41000.0,
                "taxLevel": [{ "level": "150001-500000", "tax": 41000.0 }],
                "totalTax": 11000.1
            })
        );
    }

    #[test]
    fn response_with_refund_reports_it() {
        let body =
            serde_json::to_value(TaxResponse::from(calculation(Some(dec!(9000.25))))).unwrap();

        assert_eq!(body["totalTax"], json!(0.0));
        assert_eq!(body["taxRefund"], json!(9000.3));
    }

    #[test]
    fn csv_row_reports_net_tax() {
        let input = CalculationInput::new(dec!(500000), dec!(30000), vec![]);

        let owed = serde_json::to_value(CsvTaxResponse::new(&input, &calculation(None))).unwrap();
        let refunded = serde_json::to_value(CsvTaxResponse::new(
            &input,
            &calculation(Some(dec!(9000))),
        ))
        .unwrap();

        assert_eq!(owed, json!({ "totalIncome": 500000.0, "tax": 11000.1 }));
        assert_eq!(
            refunded,
            json!({ "totalIncome": 500000.0, "tax": 0.0, "taxRefund": 9000.0 })
        );
    }
}
