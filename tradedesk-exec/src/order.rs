//! Order request built from one side of a trade proposal.

use serde::{Deserialize, Serialize};
use tradedesk_domain::{Leg, Side, TradeParameterSet};

/// Order as sent to the execution endpoint.
///
/// Prices and volume are the textual values the operator typed, passed on
/// verbatim; no normalization or re-formatting happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Side being submitted
    pub side: Side,
    /// Instrument
    pub symbol: String,
    /// Entry price text
    pub entry: String,
    /// Take-profit text
    pub tp: String,
    /// Stop-loss text
    pub sl: String,
    /// Volume text
    pub volume: String,
}

impl OrderRequest {
    /// Build the request for `side` from the current proposal.
    pub fn from_trade(side: Side, trade: &TradeParameterSet) -> Self {
        let params = trade.side(side);
        let text = |leg: Leg| params.leg(leg).as_str().to_string();
        Self {
            side,
            symbol: trade.symbol.clone(),
            entry: text(Leg::Entry),
            tp: text(Leg::TakeProfit),
            sl: text(Leg::StopLoss),
            volume: text(Leg::Volume),
        }
    }
}
