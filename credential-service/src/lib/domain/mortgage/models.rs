use std::str::FromStr;

use crate::domain::mortgage::errors::MortgageError;

/// How the loan is paid back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaymentType {
    /// Capital and interest, fully amortized over the term
    Repayment,
    /// Interest only; the principal is due at the end of the term
    InterestOnly,
}

impl FromStr for RepaymentType {
    type Err = MortgageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repayment" => Ok(Self::Repayment),
            "interest_only" | "interest-only" => Ok(Self::InterestOnly),
            other => Err(MortgageError::UnknownRepaymentType(other.to_string())),
        }
    }
}

/// Validated calculator input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MortgageTerms {
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    repayment_type: RepaymentType,
}

impl MortgageTerms {
    /// Longest accepted loan term.
    pub const MAX_TERM_YEARS: u32 = 100;

    /// Validate calculator input.
    ///
    /// # Errors
    /// * `InvalidPrincipal` - Principal is not a finite positive number
    /// * `InvalidRate` - Rate is negative or not finite
    /// * `InvalidTerm` - Term is zero or longer than `MAX_TERM_YEARS`
    pub fn new(
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
        repayment_type: RepaymentType,
    ) -> Result<Self, MortgageError> {
        if !principal.is_finite() || principal <= 0.0 {
            return Err(MortgageError::InvalidPrincipal(principal));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(MortgageError::InvalidRate(annual_rate_percent));
        }
        if term_years == 0 || term_years > Self::MAX_TERM_YEARS {
            return Err(MortgageError::InvalidTerm(term_years));
        }

        Ok(Self {
            principal,
            annual_rate_percent,
            term_years,
            repayment_type,
        })
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    pub fn number_of_payments(&self) -> u32 {
        self.term_years * 12
    }

    /// Compute monthly and total payments.
    pub fn calculate(&self) -> RepaymentSummary {
        let rate = self.monthly_rate();
        let payments = f64::from(self.number_of_payments());

        match self.repayment_type {
            RepaymentType::Repayment => {
                let monthly_payment = if rate == 0.0 {
                    self.principal / payments
                } else {
                    self.principal * rate / (1.0 - (1.0 + rate).powf(-payments))
                };

                RepaymentSummary {
                    monthly_payment,
                    total_payment: monthly_payment * payments,
                }
            }
            RepaymentType::InterestOnly => {
                let monthly_payment = self.principal * rate;

                RepaymentSummary {
                    monthly_payment,
                    total_payment: monthly_payment * payments + self.principal,
                }
            }
        }
    }
}

/// Calculator output, unrounded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepaymentSummary {
    pub monthly_payment: f64,
    pub total_payment: f64,
}
