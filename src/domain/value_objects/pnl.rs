use crate::domain::errors::ValidationError;

/// Profit and Loss value object
///
/// Unlike Price, PnL can be negative to represent losses.
/// Construction guarantees the value is finite, which is the
/// single test for whether a trade counts toward metrics.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PnL(f64);

impl PnL {
    /// Create a new PnL value
    ///
    /// # Errors
    /// Returns ValidationError::MustBeFinite if the value is NaN or infinite
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::MustBeFinite);
        }
        Ok(PnL(value))
    }

    /// Realized PnL from an optional raw field, `None` when absent or non-finite
    pub fn realized(raw: Option<f64>) -> Option<Self> {
        raw.and_then(|value| PnL::new(value).ok())
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_profit(&self) -> bool {
        self.0 > 0.0
    }

    pub fn is_loss(&self) -> bool {
        self.0 < 0.0
    }

    pub fn abs(&self) -> f64 {
        self.0.abs()
    }

    pub fn zero() -> Self {
        PnL(0.0)
    }

    /// Add two PnL values, returning `None` if the sum overflows to infinity
    pub fn checked_add(self, other: PnL) -> Option<PnL> {
        PnL::new(self.0 + other.0).ok()
    }

    /// Add `other`, keeping `self` unchanged when the sum would not be finite
    pub fn saturating_accumulate(self, other: PnL) -> PnL {
        self.checked_add(other).unwrap_or(self)
    }
}

impl Default for PnL {
    fn default() -> Self {
        PnL::zero()
    }
}

impl std::fmt::Display for PnL {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 >= 0.0 {
            write!(f, "+${:.2}", self.0)
        } else {
            write!(f, "-${:.2}", self.0.abs())
        }
    }
}
