/// Maps an assigned order to its reward amount.
///
/// Pure and stateless: earlier orders earn higher tiers, tapering to zero
/// beyond the last tier. Non-positive orders (which the coordinator never
/// forwards) fall through to zero as well.
pub fn reward_amount(order: i64) -> i64 {
    match order {
        1..=100 => 100_000,
        101..=2_000 => 50_000,
        2_001..=5_000 => 20_000,
        5_001..=10_000 => 10_000,
        _ => 0,
    }
}
