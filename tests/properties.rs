//! Property-based tests for the pivot, Fibonacci and backtest invariants.

use elwave::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn zigzag_indices_strictly_increasing_and_alternating(
        prices in prop::collection::vec(1.0f64..1000.0, 0..120),
        threshold in 0.01f64..0.9,
    ) {
        let turning = zigzag(&prices, threshold);

        prop_assert!(turning.windows(2).all(|w| w[0] < w[1]));
        if !prices.is_empty() {
            prop_assert!(!turning.is_empty());
            prop_assert_eq!(turning[0], 0);
            prop_assert!(*turning.last().unwrap() < prices.len());
        }

        let labeled = classify(&prices, &turning);
        prop_assert!(labeled.windows(2).all(|w| w[0].kind != w[1].kind));
    }

    #[test]
    fn zigzag_is_deterministic(
        prices in prop::collection::vec(1.0f64..1000.0, 0..80),
        threshold in 0.01f64..0.9,
    ) {
        prop_assert_eq!(zigzag(&prices, threshold), zigzag(&prices, threshold));
    }

    #[test]
    fn fib_endpoints_are_exact(
        start in 0.01f64..10_000.0,
        end in 0.01f64..10_000.0,
    ) {
        let levels = FibLevels::between(start, end);
        prop_assert_eq!(levels.level(0.0), Some(start));
        prop_assert_eq!(levels.level(1.0), Some(end));
    }

    #[test]
    fn fib_levels_are_monotonic_in_move_direction(
        start in 0.01f64..10_000.0,
        delta in 0.01f64..5_000.0,
    ) {
        // For an upward move every ratio step moves the level upward.
        let levels = FibLevels::between(start, start + delta);
        let prices: Vec<f64> = levels.iter().map(|(_, p)| p).collect();
        prop_assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn wrong_pivot_count_is_invalid_never_panics(count in 0usize..12) {
        let points: Vec<(usize, f64)> = (0..count)
            .map(|i| (i, 100.0 + (i % 2) as f64 * 10.0))
            .collect();

        let impulse = WavePattern::new(WaveKind::Impulse, points.clone());
        if count != 6 {
            prop_assert!(!impulse.is_valid());
            prop_assert!(impulse.next_target().is_none());
        }

        let corrective = WavePattern::new(WaveKind::Corrective, points);
        if count != 4 {
            prop_assert!(!corrective.is_valid());
        }
    }

    #[test]
    fn backtest_on_flat_series_never_trades(
        len in 0usize..70,
        price in 1.0f64..500.0,
    ) {
        let quotes = vec![price; len];
        let analyzer = WaveAnalyzer::new();
        let backtester = Backtester::new(&analyzer);
        let report = backtester.run(&quotes, 0, len.saturating_sub(1));

        prop_assert!(report.trades.is_empty());
        prop_assert_eq!(report.final_equity, report.initial_investment);
        prop_assert_eq!(report.max_drawdown, 0.0);
    }

    #[test]
    fn backtest_trade_list_round_trips(
        seed in 0u64..50,
        len in 70usize..120,
    ) {
        // Deterministic pseudo-random walk; whatever trades occur must
        // alternate buy/sell starting with a buy, with matching shares.
        let mut price = 100.0f64;
        let quotes: Vec<f64> = (0..len)
            .map(|i| {
                let step = ((i as u64 * 2654435761 + seed * 97) % 200) as f64 / 100.0 - 1.0;
                price = (price * (1.0 + step * 0.04)).max(1.0);
                price
            })
            .collect();

        let analyzer = WaveAnalyzer::new();
        let backtester = Backtester::new(&analyzer);
        let report = backtester.run(&quotes, 0, len - 1);

        for (i, trade) in report.trades.iter().enumerate() {
            let expected = if i % 2 == 0 { TradeAction::Buy } else { TradeAction::Sell };
            prop_assert_eq!(trade.action, expected);
            prop_assert!((trade.value - trade.shares * trade.price).abs() < 1e-6);
        }
        for pair in report.trades.chunks_exact(2) {
            prop_assert_eq!(pair[0].shares, pair[1].shares);
        }
        prop_assert_eq!(report.num_trades, report.trades.len() / 2);
        prop_assert_eq!(report.equity_curve.len(), len);
    }
}
