use crate::domain::model::NumberCategory;

/// 單一類別的費率，金額單位為便士
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tariff {
    pub cost_per_minute: u64,
    pub connection_charge: u64,
    /// 離峰時段的除數；`None` 表示沒有離峰折扣
    pub off_peak_divisor: Option<u64>,
}

pub struct TariffTable;

impl TariffTable {
    pub const fn lookup(category: NumberCategory) -> Tariff {
        match category {
            NumberCategory::International => Tariff {
                cost_per_minute: 80,
                connection_charge: 50,
                off_peak_divisor: None,
            },
            NumberCategory::Landline => Tariff {
                cost_per_minute: 15,
                connection_charge: 0,
                off_peak_divisor: Some(3),
            },
            NumberCategory::Mobile => Tariff {
                cost_per_minute: 30,
                connection_charge: 0,
                off_peak_divisor: Some(3),
            },
            NumberCategory::FreePhone | NumberCategory::Invalid => Tariff {
                cost_per_minute: 0,
                connection_charge: 0,
                off_peak_divisor: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let international = TariffTable::lookup(NumberCategory::International);
        assert_eq!(international.cost_per_minute, 80);
        assert_eq!(international.connection_charge, 50);
        assert_eq!(international.off_peak_divisor, None);

        assert_eq!(TariffTable::lookup(NumberCategory::Landline).off_peak_divisor, Some(3));
        assert_eq!(TariffTable::lookup(NumberCategory::Mobile).cost_per_minute, 30);
    }

    #[test]
    fn test_free_categories_cost_nothing() {
        for category in [NumberCategory::FreePhone, NumberCategory::Invalid] {
            let tariff = TariffTable::lookup(category);
            assert_eq!(tariff.cost_per_minute, 0);
            assert_eq!(tariff.connection_charge, 0);
            assert_eq!(tariff.off_peak_divisor, None);
        }
    }
}
