#[cfg(test)]
mod tests {
    use chrono::Local;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::models::{Holding, Position, TradeType, Transaction};
    use crate::services::accounting::{
        apply_buy, apply_sell, clamp_cash, debit_cash, round_currency,
    };

    fn holding(lots: i64, average_cost: Decimal) -> Holding {
        Holding::new(
            String::from("005930"),
            String::from("Samsung Electronics"),
            lots,
            average_cost,
        )
    }

    #[test]
    fn buy_at_same_price_keeps_average_cost() {
        let updated = apply_buy(
            Some(&holding(10, dec!(1000))),
            "005930",
            "Samsung Electronics",
            10,
            dec!(1000),
        );

        assert_eq!(*updated.lots(), 20);
        assert_eq!(*updated.average_cost(), dec!(1000));
    }

    #[test]
    fn buy_blends_lot_weighted_average() {
        // (10 * 1000 + 5 * 1300) / 15 = 1100
        let updated = apply_buy(
            Some(&holding(10, dec!(1000))),
            "005930",
            "Samsung Electronics",
            5,
            dec!(1300),
        );

        assert_eq!(*updated.lots(), 15);
        assert_eq!(*updated.average_cost(), dec!(1100));
    }

    #[test]
    fn buy_rounds_average_half_up() {
        // (1 * 1000 + 1 * 1001) / 2 = 1000.5, rounds to 1001
        let updated = apply_buy(
            Some(&holding(1, dec!(1000))),
            "005930",
            "Samsung Electronics",
            1,
            dec!(1001),
        );

        assert_eq!(*updated.average_cost(), dec!(1001));
    }

    #[test]
    fn buy_creates_missing_holding_at_rounded_price() {
        let created = apply_buy(None, "005930", "Samsung Electronics", 3, dec!(71900.4));

        assert_eq!(created.ticker(), "005930");
        assert_eq!(created.name(), "Samsung Electronics");
        assert_eq!(*created.lots(), 3);
        assert_eq!(*created.average_cost(), dec!(71900));
    }

    #[test]
    fn sell_keeps_average_cost() {
        let updated = apply_sell(&holding(10, dec!(1000)), 4).unwrap();

        assert_eq!(*updated.lots(), 6);
        assert_eq!(*updated.average_cost(), dec!(1000));
    }

    #[test]
    fn sell_of_every_lot_closes_position() {
        assert!(apply_sell(&holding(10, dec!(1000)), 10).is_none());
    }

    #[test]
    fn oversell_clamps_to_closed_position() {
        assert!(apply_sell(&holding(10, dec!(1000)), 15).is_none());
    }

    #[test]
    fn mixed_sequence_never_goes_negative() {
        let mut current: Option<Holding> = None;
        for (lots, price) in [(5i64, dec!(1200)), (3, dec!(900)), (7, dec!(1500))] {
            let updated = apply_buy(current.as_ref(), "005930", "Samsung Electronics", lots, price);
            assert!(*updated.lots() > 0);
            assert!(*updated.average_cost() >= Decimal::ZERO);
            current = Some(updated);
        }
        for lots in [2i64, 4, 100] {
            let Some(held) = &current else { break };
            current = apply_sell(held, lots);
            if let Some(remaining) = &current {
                assert!(*remaining.lots() > 0);
                assert!(*remaining.average_cost() >= Decimal::ZERO);
            }
        }
        assert!(current.is_none());
    }

    #[test]
    fn currency_rounding_is_half_away_from_zero() {
        assert_eq!(round_currency(dec!(2.5)), dec!(3));
        assert_eq!(round_currency(dec!(2.4)), dec!(2));
        assert_eq!(round_currency(dec!(-2.5)), dec!(-3));
    }

    #[test]
    fn cash_debit_floors_at_zero() {
        assert_eq!(debit_cash(dec!(500), dec!(800)), Decimal::ZERO);
        assert_eq!(debit_cash(dec!(500), dec!(200)), dec!(300));
        assert_eq!(clamp_cash(dec!(-10)), Decimal::ZERO);
    }

    #[test]
    fn filled_transaction_totals_lots_times_shares() {
        let entry = Transaction::filled(
            TradeType::Buy,
            String::from("005930"),
            2,
            dec!(1500),
            Local::now(),
            None,
        );

        // 2 lots of 100 shares at 1500 each
        assert_eq!(*entry.total_amount(), dec!(300000));
    }

    #[test]
    fn position_valuation_from_holding_and_price() {
        let position = Position::valued(&holding(3, dec!(1000)), dec!(1200));

        assert_eq!(*position.market_value(), dec!(360000));
        assert_eq!(*position.cost_basis(), dec!(300000));
        assert_eq!(*position.unrealized_gain(), dec!(60000));
        assert_eq!(position.unrealized_gain_percent().normalize(), dec!(20));
    }
}
