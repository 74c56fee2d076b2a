//! Unit tests for the valuation service.

use super::*;
use crate::activities::TransactionStoreTrait;
use crate::clock::ManualClock;
use crate::config::ValuationConfig;
use crate::errors::Error;
use crate::testing::{
    buy, date, instant, portfolio, price, sell, InMemoryLedger, SlowTransactionStore,
    StaticRateConverter,
};
use chrono::{Duration, NaiveDate};
use rust_decimal_macros::dec;
use std::sync::Arc;

struct Fixture {
    ledger: Arc<InMemoryLedger>,
    converter: Arc<StaticRateConverter>,
    clock: Arc<ManualClock>,
    service: ValuationService,
}

fn fixture(ledger: InMemoryLedger) -> Fixture {
    fixture_with(ledger, StaticRateConverter::new(), ValuationConfig::default())
}

fn fixture_with(
    ledger: InMemoryLedger,
    converter: StaticRateConverter,
    config: ValuationConfig,
) -> Fixture {
    let ledger = Arc::new(ledger);
    let converter = Arc::new(converter);
    let clock = Arc::new(ManualClock::new(instant(2024, 6, 1)));
    let cache = Arc::new(ValuationCache::from_config(&config, clock.clone()));
    let service = ValuationService::new(
        ledger.clone(),
        ledger.clone(),
        ledger.clone(),
        ledger.clone(),
        converter.clone(),
        cache,
        config,
    );
    Fixture {
        ledger,
        converter,
        clock,
        service,
    }
}

fn base_ledger() -> InMemoryLedger {
    InMemoryLedger::new()
        .with_portfolio(portfolio("p1", "u1"))
        .with_base_currency("u1", "USD")
}

fn jan(d: u32) -> NaiveDate {
    date(2024, 1, d)
}

#[tokio::test]
async fn test_portfolio_without_holdings_is_worth_zero() {
    let f = fixture(base_ledger());

    let value = f.service.valuate("u1", "p1", jan(10)).await.unwrap();

    assert_eq!(value, PortfolioValueAtDate::zero(jan(10), "USD"));
    assert_eq!(f.ledger.price_fetches(), 0);
}

#[tokio::test]
async fn test_values_holdings_at_carried_forward_price() {
    let ledger = base_ledger()
        .with_transactions(vec![
            buy("p1", "AAPL", jan(2), dec!(10), dec!(1000)),
            sell("p1", "AAPL", jan(3), dec!(4), dec!(480)),
        ])
        .with_prices(vec![price("AAPL", jan(2), dec!(100)), price("AAPL", jan(5), dec!(130))]);
    let f = fixture(ledger);

    let on_fourth = f.service.valuate("u1", "p1", jan(4)).await.unwrap();
    let on_sixth = f.service.valuate("u1", "p1", jan(6)).await.unwrap();

    assert_eq!(on_fourth.total_value, dec!(600));
    assert_eq!(on_fourth.total_cost_basis, dec!(600));
    assert_eq!(on_fourth.unrealized_gain, dec!(0));
    assert_eq!(on_sixth.total_value, dec!(780));
    assert_eq!(on_sixth.unrealized_gain, dec!(180));
}

#[tokio::test]
async fn test_unpriced_holding_falls_back_to_cost_basis() {
    let ledger = base_ledger()
        .with_transactions(vec![
            buy("p1", "PRIVATE", jan(2), dec!(5), dec!(500)),
            buy("p1", "AAPL", jan(2), dec!(1), dec!(100)),
        ])
        .with_prices(vec![price("AAPL", jan(2), dec!(150))]);
    let f = fixture(ledger);

    let value = f.service.valuate("u1", "p1", jan(3)).await.unwrap();

    assert_eq!(value.total_value, dec!(650));
    assert_eq!(value.total_cost_basis, dec!(600));
    assert_eq!(value.unrealized_gain, dec!(50));
}

#[tokio::test]
async fn test_foreign_holdings_are_converted_to_base_currency() {
    let mut sap = buy("p1", "SAP", jan(2), dec!(2), dec!(330));
    sap.currency = "EUR".to_string();
    let ledger = base_ledger()
        .with_transactions(vec![sap, buy("p1", "AAPL", jan(2), dec!(1), dec!(100))])
        .with_prices(vec![price("SAP", jan(2), dec!(150)), price("AAPL", jan(2), dec!(100))]);
    let converter = StaticRateConverter::new().with_rate("EUR", "USD", dec!(1.1));
    let f = fixture_with(ledger, converter, ValuationConfig::default());

    let value = f.service.valuate("u1", "p1", jan(2)).await.unwrap();

    assert_eq!(value.total_value, dec!(430));
    assert_eq!(value.currency, "USD");
    // Same-currency holdings never reach the converter.
    assert_eq!(f.converter.conversions(), 1);
}

#[tokio::test]
async fn test_missing_conversion_rate_fails_valuation() {
    let mut sap = buy("p1", "SAP", jan(2), dec!(2), dec!(330));
    sap.currency = "EUR".to_string();
    let ledger = base_ledger()
        .with_transactions(vec![sap])
        .with_prices(vec![price("SAP", jan(2), dec!(150))]);
    let f = fixture(ledger);

    let err = f.service.valuate("u1", "p1", jan(2)).await.unwrap_err();

    assert!(matches!(err, Error::Fx(_)));
}

#[tokio::test]
async fn test_unknown_portfolio_or_currency_is_not_found() {
    let ledger = base_ledger().with_portfolio(portfolio("p2", "u2"));
    let f = fixture(ledger);

    let foreign = f.service.valuate("u1", "p2", jan(2)).await.unwrap_err();
    let missing = f.service.valuate("u1", "nope", jan(2)).await.unwrap_err();
    let no_currency = f.service.valuate("u2", "p2", jan(2)).await.unwrap_err();

    assert!(foreign.is_not_found());
    assert!(missing.is_not_found());
    assert!(no_currency.is_not_found());
}

#[tokio::test]
async fn test_cached_value_is_reused_until_ttl() {
    let ledger = base_ledger()
        .with_transactions(vec![buy("p1", "AAPL", jan(2), dec!(1), dec!(100))])
        .with_prices(vec![price("AAPL", jan(2), dec!(120))]);
    let f = fixture(ledger);

    f.service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    f.clock.advance(Duration::days(29));
    f.service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    assert_eq!(f.ledger.transaction_fetches(), 1);

    f.clock.advance(Duration::days(2));
    f.service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    assert_eq!(f.ledger.transaction_fetches(), 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let ledger = base_ledger().with_transactions(vec![buy("p1", "AAPL", jan(2), dec!(1), dec!(100))]);
    let f = fixture(ledger);
    f.ledger.fail_portfolio("p1");

    let first = f.service.get_portfolio_value_at_date("u1", "p1", jan(5)).await;
    assert!(matches!(first, Err(Error::Database(_))));
    assert!(f.service.cache().is_empty());

    f.ledger.heal_portfolio("p1");
    let second = f
        .service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    assert_eq!(second.total_value, dec!(100));
}

#[tokio::test]
async fn test_range_is_sorted_and_deduplicated() {
    let ledger = base_ledger()
        .with_transactions(vec![buy("p1", "AAPL", jan(2), dec!(1), dec!(100))])
        .with_prices(vec![price("AAPL", jan(2), dec!(120))]);
    let f = fixture(ledger);

    let values = f
        .service
        .valuate_range("u1", "p1", &[jan(4), jan(3), jan(4)])
        .await
        .unwrap();

    let dates: Vec<NaiveDate> = values.iter().map(|v| v.date).collect();
    assert_eq!(dates, vec![jan(3), jan(4)]);
    assert_eq!(f.ledger.transaction_fetches(), 2);
}

#[tokio::test]
async fn test_range_only_computes_cache_misses() {
    let ledger = base_ledger()
        .with_transactions(vec![buy("p1", "AAPL", jan(2), dec!(1), dec!(100))])
        .with_prices(vec![price("AAPL", jan(2), dec!(120))]);
    let f = fixture(ledger);

    f.service
        .get_portfolio_value_at_date("u1", "p1", jan(3))
        .await
        .unwrap();
    let values = f
        .service
        .valuate_range("u1", "p1", &[jan(1), jan(3), jan(5)])
        .await
        .unwrap();

    assert_eq!(values.len(), 3);
    assert_eq!(values[0].total_value, dec!(0));
    assert_eq!(values[1].total_value, dec!(120));
    // One fetch for the warm-up plus one per miss.
    assert_eq!(f.ledger.transaction_fetches(), 3);
    assert_eq!(f.service.cache().len(), 3);
}

#[tokio::test]
async fn test_range_fails_when_any_date_fails() {
    let f = fixture(base_ledger());
    f.ledger.fail_portfolio("p1");

    let result = f.service.valuate_range("u1", "p1", &[jan(1), jan(2)]).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_empty_range_returns_nothing() {
    let f = fixture(base_ledger());

    let values = f.service.valuate_range("u1", "p1", &[]).await.unwrap();

    assert!(values.is_empty());
    assert_eq!(f.ledger.transaction_fetches(), 0);
}

#[tokio::test]
async fn test_invalidate_portfolio_forces_recompute() {
    let ledger = base_ledger().with_transactions(vec![buy("p1", "AAPL", jan(2), dec!(1), dec!(100))]);
    let f = fixture(ledger);

    f.service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    f.ledger
        .transactions
        .write()
        .unwrap()
        .push(buy("p1", "AAPL", jan(4), dec!(1), dec!(50)));
    f.service.invalidate_portfolio("p1");

    let value = f
        .service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    assert_eq!(value.total_value, dec!(150));
}

#[tokio::test(start_paused = true)]
async fn test_slow_valuation_times_out_and_is_not_cached() {
    let ledger = Arc::new(base_ledger());
    let clock = Arc::new(ManualClock::new(instant(2024, 6, 1)));
    let config = ValuationConfig {
        valuation_timeout: Some(std::time::Duration::from_secs(5)),
        ..ValuationConfig::default()
    };
    let cache = Arc::new(ValuationCache::from_config(&config, clock));
    let slow: Arc<dyn TransactionStoreTrait> = Arc::new(SlowTransactionStore::new(
        ledger.clone(),
        std::time::Duration::from_secs(60),
    ));
    let service = ValuationService::new(
        ledger.clone(),
        ledger.clone(),
        slow,
        ledger.clone(),
        Arc::new(StaticRateConverter::new()),
        cache,
        config,
    );

    let err = service
        .get_portfolio_value_at_date("u1", "p1", jan(2))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(_)));
    assert!(service.cache().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_range_misses_are_computed_concurrently_up_to_limit() {
    let ledger = Arc::new(base_ledger());
    let clock = Arc::new(ManualClock::new(instant(2024, 6, 1)));
    let config = ValuationConfig {
        max_concurrent_valuations: 2,
        ..ValuationConfig::default()
    };
    let cache = Arc::new(ValuationCache::from_config(&config, clock));
    let slow = Arc::new(SlowTransactionStore::new(
        ledger.clone(),
        std::time::Duration::from_secs(10),
    ));
    let service = ValuationService::new(
        ledger.clone(),
        ledger.clone(),
        slow.clone(),
        ledger.clone(),
        Arc::new(StaticRateConverter::new()),
        cache,
        config,
    );

    let started = tokio::time::Instant::now();
    let values = service
        .valuate_range("u1", "p1", &[jan(1), jan(2), jan(3), jan(4), jan(5)])
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(values.len(), 5);
    assert_eq!(slow.max_in_flight(), 2);
    // Three waves of two, not five sequential fetches.
    assert!(elapsed >= std::time::Duration::from_secs(30), "{:?}", elapsed);
    assert!(elapsed < std::time::Duration::from_secs(40), "{:?}", elapsed);
}

#[tokio::test]
async fn test_cached_value_is_not_served_to_another_user() {
    let ledger = base_ledger()
        .with_base_currency("u2", "EUR")
        .with_transactions(vec![buy("p1", "AAPL", jan(2), dec!(1), dec!(100))])
        .with_prices(vec![price("AAPL", jan(2), dec!(120))]);
    let f = fixture(ledger);

    let owner = f
        .service
        .get_portfolio_value_at_date("u1", "p1", jan(5))
        .await
        .unwrap();
    let other = f
        .service
        .get_portfolio_value_at_date("u2", "p1", jan(5))
        .await
        .unwrap_err();
    let other_range = f
        .service
        .valuate_range("u2", "p1", &[jan(5)])
        .await
        .unwrap_err();

    assert_eq!(owner.total_value, dec!(120));
    assert!(other.is_not_found());
    assert!(other_range.is_not_found());
    assert_eq!(f.service.cache().len(), 1);
}
