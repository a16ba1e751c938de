use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{pnl::PnL, price::Price, quantity::Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a journaled trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "long" => Ok(PositionSide::Long),
            "short" => Ok(PositionSide::Short),
            other => Err(format!("unknown position side: {}", other)),
        }
    }
}

/// A trade as stored in the journal.
///
/// Numeric fields stay raw: rows imported from brokers can carry a missing
/// or non-finite `pnl`, and the metrics engine must tolerate them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub user_id: String,
    pub symbol: String,
    pub position: PositionSide,
    pub entry_date: DateTime<Utc>,
    pub exit_date: Option<DateTime<Utc>>,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub pnl: Option<f64>,
    pub fees: Option<f64>,
    pub strategy: Option<String>,
    pub broker: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Trade {
    /// Realized PnL if present and finite
    pub fn realized_pnl(&self) -> Option<PnL> {
        PnL::realized(self.pnl)
    }

    pub fn is_open(&self) -> bool {
        self.exit_date.is_none()
    }
}

/// Payload for logging a new trade
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    pub user_id: String,
    pub symbol: String,
    pub position: PositionSide,
    pub entry_date: DateTime<Utc>,
    pub exit_date: Option<DateTime<Utc>>,
    pub entry_price: f64,
    pub exit_price: Option<f64>,
    pub quantity: f64,
    pub pnl: Option<f64>,
    pub fees: Option<f64>,
    pub strategy: Option<String>,
    pub broker: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewTrade {
    /// Validate the payload and turn it into a storable trade.
    ///
    /// When `pnl` is omitted on a closed trade it is derived from the
    /// entry/exit prices, quantity and fees.
    pub fn into_trade(self, id: String) -> Result<Trade, ValidationError> {
        let user_id = validate_user_id(&self.user_id)?;

        let symbol = self.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::InvalidSymbol(
                "symbol must not be empty".to_string(),
            ));
        }

        let entry_price = Price::new(self.entry_price)?;
        let exit_price = self.exit_price.map(Price::new).transpose()?;
        let quantity = Quantity::new(self.quantity)?;

        if let Some(fees) = self.fees {
            if !fees.is_finite() {
                return Err(ValidationError::InvalidFees("fees must be finite".to_string()));
            }
            if fees < 0.0 {
                return Err(ValidationError::InvalidFees(format!(
                    "fees must be non-negative, got {}",
                    fees
                )));
            }
        }

        if let Some(exit_date) = self.exit_date {
            if exit_date < self.entry_date {
                return Err(ValidationError::InvalidDates(
                    "exit_date precedes entry_date".to_string(),
                ));
            }
        }

        let pnl = match (self.pnl, exit_price, self.exit_date) {
            (Some(pnl), _, _) => Some(PnL::new(pnl)?.value()),
            (None, Some(exit), Some(_)) => Some(
                derive_pnl(
                    self.position,
                    entry_price,
                    exit,
                    quantity,
                    self.fees.unwrap_or(0.0),
                )?
                .value(),
            ),
            _ => None,
        };

        Ok(Trade {
            id,
            user_id,
            symbol,
            position: self.position,
            entry_date: self.entry_date,
            exit_date: self.exit_date,
            entry_price: entry_price.value(),
            exit_price: exit_price.map(|p| p.value()),
            quantity: quantity.value(),
            pnl,
            fees: self.fees,
            strategy: normalize_optional(self.strategy),
            broker: normalize_optional(self.broker),
            notes: normalize_optional(self.notes),
            tags: self
                .tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        })
    }
}

/// Realized PnL of a closed round trip, net of fees
///
/// # Errors
/// `MustBeFinite` when price times quantity overflows
pub fn derive_pnl(
    side: PositionSide,
    entry: Price,
    exit: Price,
    quantity: Quantity,
    fees: f64,
) -> Result<PnL, ValidationError> {
    let gross = match side {
        PositionSide::Long => (exit.value() - entry.value()) * quantity.value(),
        PositionSide::Short => (entry.value() - exit.value()) * quantity.value(),
    };
    PnL::new(gross - fees)
}

/// Trim a user identifier and reject blanks
pub fn validate_user_id(user_id: &str) -> Result<String, ValidationError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidUserId(
            "user_id must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_trade() -> NewTrade {
        NewTrade {
            user_id: "user-1".to_string(),
            symbol: " aapl ".to_string(),
            position: PositionSide::Long,
            entry_date: Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap(),
            exit_date: None,
            entry_price: 100.0,
            exit_price: None,
            quantity: 10.0,
            pnl: None,
            fees: None,
            strategy: Some("  breakout ".to_string()),
            broker: Some("".to_string()),
            notes: None,
            tags: vec!["swing".to_string(), " ".to_string()],
        }
    }

    #[test]
    fn test_open_trade_has_no_pnl() {
        let trade = new_trade().into_trade("t-1".to_string()).unwrap();
        assert_eq!(trade.symbol, "AAPL");
        assert!(trade.is_open());
        assert!(trade.pnl.is_none());
        assert_eq!(trade.strategy.as_deref(), Some("breakout"));
        assert!(trade.broker.is_none());
        assert_eq!(trade.tags, vec!["swing".to_string()]);
    }

    #[test]
    fn test_long_pnl_derived_net_of_fees() {
        let mut payload = new_trade();
        payload.exit_date = Some(payload.entry_date + Duration::hours(2));
        payload.exit_price = Some(110.0);
        payload.fees = Some(5.0);

        let trade = payload.into_trade("t-2".to_string()).unwrap();
        assert_eq!(trade.pnl, Some(95.0));
    }

    #[test]
    fn test_short_pnl_derived() {
        let mut payload = new_trade();
        payload.position = PositionSide::Short;
        payload.exit_date = Some(payload.entry_date + Duration::days(1));
        payload.exit_price = Some(90.0);

        let trade = payload.into_trade("t-3".to_string()).unwrap();
        assert_eq!(trade.pnl, Some(100.0));
    }

    #[test]
    fn test_explicit_pnl_wins_over_prices() {
        let mut payload = new_trade();
        payload.exit_date = Some(payload.entry_date + Duration::hours(1));
        payload.exit_price = Some(110.0);
        payload.pnl = Some(42.0);

        let trade = payload.into_trade("t-4".to_string()).unwrap();
        assert_eq!(trade.pnl, Some(42.0));
    }

    #[test]
    fn test_overflowing_derived_pnl_is_rejected() {
        let mut payload = new_trade();
        payload.entry_price = 1.0;
        payload.exit_date = Some(payload.entry_date + Duration::hours(1));
        payload.exit_price = Some(1e308);
        payload.quantity = 1e10;

        assert_eq!(
            payload.into_trade("t-5".to_string()),
            Err(ValidationError::MustBeFinite)
        );
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let mut payload = new_trade();
        payload.entry_price = 0.0;
        assert!(matches!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::InvalidPrice(_))
        ));

        let mut payload = new_trade();
        payload.quantity = -1.0;
        assert!(matches!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::InvalidQuantity(_))
        ));

        let mut payload = new_trade();
        payload.symbol = "   ".to_string();
        assert!(matches!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::InvalidSymbol(_))
        ));

        let mut payload = new_trade();
        payload.fees = Some(-1.0);
        assert!(matches!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::InvalidFees(_))
        ));

        let mut payload = new_trade();
        payload.exit_date = Some(payload.entry_date - Duration::minutes(1));
        assert!(matches!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::InvalidDates(_))
        ));

        let mut payload = new_trade();
        payload.user_id = "".to_string();
        assert!(matches!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::InvalidUserId(_))
        ));

        let mut payload = new_trade();
        payload.pnl = Some(f64::NAN);
        assert_eq!(
            payload.into_trade("x".to_string()),
            Err(ValidationError::MustBeFinite)
        );
    }

    #[test]
    fn test_position_side_parsing() {
        assert_eq!("LONG".parse::<PositionSide>(), Ok(PositionSide::Long));
        assert_eq!("short".parse::<PositionSide>(), Ok(PositionSide::Short));
        assert!("flat".parse::<PositionSide>().is_err());
        assert_eq!(PositionSide::Short.to_string(), "short");
    }

    #[test]
    fn test_trade_deserializes_without_tags() {
        let json = serde_json::json!({
            "id": "t-1",
            "user_id": "u",
            "symbol": "BTC-USD",
            "position": "short",
            "entry_date": "2024-01-01T00:00:00Z",
            "exit_date": null,
            "entry_price": 40000.0,
            "exit_price": null,
            "quantity": 0.5,
            "pnl": null,
            "fees": null,
            "strategy": null,
            "broker": null,
            "notes": null
        });
        let trade: Trade = serde_json::from_value(json).unwrap();
        assert_eq!(trade.position, PositionSide::Short);
        assert!(trade.tags.is_empty());
        assert!(trade.realized_pnl().is_none());
    }
}
