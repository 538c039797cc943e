use crate::models::{Coupon, TierCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    White,
    Blue,
    Red,
    Gold,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::White, Tier::Blue, Tier::Red, Tier::Gold];

    pub fn from_prize_amount(amount: i64) -> Option<Self> {
        match amount {
            100 => Some(Tier::White),
            2500 => Some(Tier::Blue),
            10000 => Some(Tier::Red),
            50000 => Some(Tier::Gold),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::White => "white",
            Tier::Blue => "blue",
            Tier::Red => "red",
            Tier::Gold => "gold",
        }
    }

    pub fn prize_amount(self) -> i64 {
        match self {
            Tier::White => 100,
            Tier::Blue => 2500,
            Tier::Red => 10000,
            Tier::Gold => 50000,
        }
    }
}

impl TierCounts {
    pub fn get(&self, tier: Tier) -> u64 {
        match tier {
            Tier::White => self.white,
            Tier::Blue => self.blue,
            Tier::Red => self.red,
            Tier::Gold => self.gold,
        }
    }

    fn bump(&mut self, tier: Tier) {
        let slot = match tier {
            Tier::White => &mut self.white,
            Tier::Blue => &mut self.blue,
            Tier::Red => &mut self.red,
            Tier::Gold => &mut self.gold,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        Tier::ALL.iter().map(|tier| self.get(*tier)).sum()
    }
}

/// Buckets coupons by prize tier. Amounts outside the four tiers are dropped.
pub fn build_stats<'a, I>(coupons: I) -> TierCounts
where
    I: IntoIterator<Item = &'a Coupon>,
{
    let mut counts = TierCounts::default();
    for tier in coupons
        .into_iter()
        .filter_map(|coupon| coupon.prize_amount.and_then(Tier::from_prize_amount))
    {
        counts.bump(tier);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupons(amounts: &[i64]) -> Vec<Coupon> {
        amounts
            .iter()
            .map(|amount| Coupon {
                prize_amount: Some(*amount),
            })
            .collect()
    }

    #[test]
    fn buckets_known_amounts_and_drops_the_rest() {
        let stats = build_stats(&coupons(&[100, 100, 2500, 10000, 50000, 999]));
        assert_eq!(
            stats,
            TierCounts {
                white: 2,
                blue: 1,
                red: 1,
                gold: 1
            }
        );
        assert_eq!(stats.total(), 5);
    }

    #[test]
    fn empty_list_is_all_zero() {
        let stats = build_stats(&Vec::<Coupon>::new());
        assert_eq!(stats, TierCounts::default());
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn total_matches_tiered_coupon_count() {
        let amounts = [50000, 7, 100, -100, 2500, 2500, 0, 10000, 100, 50001];
        let list = coupons(&amounts);
        let tiered = amounts
            .iter()
            .filter(|amount| Tier::from_prize_amount(**amount).is_some())
            .count() as u64;
        assert_eq!(build_stats(&list).total(), tiered);
    }

    #[test]
    fn order_does_not_matter() {
        let mut list = coupons(&[100, 2500, 2500, 50000, 10000, 100]);
        let forward = build_stats(&list);
        list.reverse();
        assert_eq!(build_stats(&list), forward);
    }

    #[test]
    fn missing_amount_is_untiered() {
        let list = vec![Coupon { prize_amount: None }, Coupon { prize_amount: Some(100) }];
        assert_eq!(build_stats(&list).total(), 1);
    }

    #[test]
    fn tiers_round_trip_through_amounts() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_prize_amount(tier.prize_amount()), Some(tier));
        }
    }
}
