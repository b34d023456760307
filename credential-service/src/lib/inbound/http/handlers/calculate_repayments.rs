use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::mortgage::errors::MortgageError;
use crate::domain::mortgage::models::MortgageTerms;
use crate::domain::mortgage::models::RepaymentSummary;
use crate::domain::mortgage::models::RepaymentType;

pub async fn calculate_repayments(
    Json(body): Json<CalculateRepaymentsRequest>,
) -> Result<ApiSuccess<CalculateRepaymentsResponseData>, ApiError> {
    let terms = body.try_into_terms()?;
    Ok(ApiSuccess::new(StatusCode::OK, terms.calculate().into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalculateRepaymentsRequest {
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    repayment_type: String,
}

impl CalculateRepaymentsRequest {
    fn try_into_terms(self) -> Result<MortgageTerms, MortgageError> {
        let repayment_type: RepaymentType = self.repayment_type.parse()?;
        MortgageTerms::new(
            self.principal,
            self.annual_rate_percent,
            self.term_years,
            repayment_type,
        )
    }
}

/// Payments rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculateRepaymentsResponseData {
    pub monthly_payment: f64,
    pub total_payment: f64,
}

impl From<RepaymentSummary> for CalculateRepaymentsResponseData {
    fn from(summary: RepaymentSummary) -> Self {
        Self {
            monthly_payment: round_to_cents(summary.monthly_payment),
            total_payment: round_to_cents(summary.total_payment),
        }
    }
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
