use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;

#[derive(Clone, Debug, Default, Eq, Getters, PartialEq, new)]
pub struct Growth {
    value: Decimal,
    percent: Decimal,
}
