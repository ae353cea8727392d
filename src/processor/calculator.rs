use crate::feed::event::TokenCreationEvent;

/// Per-event market metrics derived from the bonding curve reserves and the
/// SOL reference price. Computed per notification, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedMetrics {
    pub price_sol: f64,
    pub price_usd: f64,
    pub market_cap_usd: f64,
    pub liquidity_usd: f64,
    pub total_supply: f64,
}

/// Missing operands degrade to zero instead of erroring: the output feeds a
/// cosmetic display, not a financial decision.
pub fn compute_metrics(event: &TokenCreationEvent, sol_price_usd: Option<f64>) -> DerivedMetrics {
    let sol_price = sol_price_usd.filter(|p| p.is_finite()).unwrap_or(0.0);

    let price_sol = if event.v_tokens_in_bonding_curve > 0.0 {
        event.v_sol_in_bonding_curve / event.v_tokens_in_bonding_curve
    } else {
        0.0
    };

    DerivedMetrics {
        price_sol: finite_or_zero(price_sol),
        price_usd: finite_or_zero(price_sol * sol_price),
        market_cap_usd: finite_or_zero(event.market_cap_sol * sol_price),
        liquidity_usd: finite_or_zero(event.sol_amount * sol_price),
        total_supply: finite_or_zero(event.v_tokens_in_bonding_curve),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> TokenCreationEvent {
        TokenCreationEvent {
            mint: "A".to_string(),
            v_sol_in_bonding_curve: 10.0,
            v_tokens_in_bonding_curve: 100.0,
            market_cap_sol: 1000.0,
            sol_amount: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_metrics_with_reference_price() {
        let metrics = compute_metrics(&sample_event(), Some(200.0));
        assert!((metrics.price_sol - 0.1).abs() < 1e-12);
        assert!((metrics.price_usd - 20.0).abs() < 1e-9);
        assert!((metrics.market_cap_usd - 200_000.0).abs() < 1e-6);
        assert!((metrics.liquidity_usd - 1000.0).abs() < 1e-9);
        assert!((metrics.total_supply - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_price_degrades_to_zero() {
        let metrics = compute_metrics(&sample_event(), None);
        assert!((metrics.price_sol - 0.1).abs() < 1e-12);
        assert_eq!(metrics.price_usd, 0.0);
        assert_eq!(metrics.market_cap_usd, 0.0);
        assert_eq!(metrics.liquidity_usd, 0.0);
    }

    #[test]
    fn test_empty_event_yields_finite_zeros() {
        let metrics = compute_metrics(&TokenCreationEvent::default(), Some(100.0));
        for value in [
            metrics.price_sol,
            metrics.price_usd,
            metrics.market_cap_usd,
            metrics.liquidity_usd,
            metrics.total_supply,
        ] {
            assert!(value.is_finite());
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_zero_token_reserves_guard() {
        let event = TokenCreationEvent {
            mint: "B".to_string(),
            v_sol_in_bonding_curve: 50.0,
            v_tokens_in_bonding_curve: 0.0,
            ..Default::default()
        };
        let metrics = compute_metrics(&event, Some(150.0));
        assert_eq!(metrics.price_sol, 0.0);
        assert_eq!(metrics.price_usd, 0.0);
    }
}
