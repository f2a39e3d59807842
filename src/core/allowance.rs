use serde::{Deserialize, Serialize};

use crate::domain::model::{AllowanceClass, NumberCategory};

pub const DEFAULT_INTERNATIONAL_MINUTES: u64 = 10;
pub const DEFAULT_LANDLINE_MOBILE_MINUTES: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceLimits {
    pub international_minutes: u64,
    pub landline_mobile_minutes: u64,
}

impl Default for AllowanceLimits {
    fn default() -> Self {
        Self {
            international_minutes: DEFAULT_INTERNATIONAL_MINUTES,
            landline_mobile_minutes: DEFAULT_LANDLINE_MOBILE_MINUTES,
        }
    }
}

/// 單次計費流程的免費分鐘餘額。
///
/// 餘額只減不增，且依紀錄讀入的順序扣除；每次處理一份通話紀錄檔都要建立新的 tracker。
#[derive(Debug)]
pub struct AllowanceTracker {
    international_remaining: u64,
    landline_mobile_remaining: u64,
}

impl AllowanceTracker {
    pub fn new() -> Self {
        Self::with_limits(AllowanceLimits::default())
    }

    pub fn with_limits(limits: AllowanceLimits) -> Self {
        Self {
            international_remaining: limits.international_minutes,
            landline_mobile_remaining: limits.landline_mobile_minutes,
        }
    }

    /// 從對應的分鐘池扣除，回傳實際給予的免費分鐘數（不會超過餘額）
    pub fn consume(&mut self, category: NumberCategory, requested_minutes: u64) -> u64 {
        let Some(class) = category.allowance_class() else {
            return 0;
        };

        let remaining = self.pool_mut(class);
        let granted = requested_minutes.min(*remaining);
        *remaining -= granted;

        tracing::trace!(
            "Allowance {:?}: granted {} of {} minutes, {} left",
            class,
            granted,
            requested_minutes,
            *remaining
        );
        granted
    }

    pub fn remaining(&self, class: AllowanceClass) -> u64 {
        match class {
            AllowanceClass::International => self.international_remaining,
            AllowanceClass::LandlineMobile => self.landline_mobile_remaining,
        }
    }

    fn pool_mut(&mut self, class: AllowanceClass) -> &mut u64 {
        match class {
            AllowanceClass::International => &mut self.international_remaining,
            AllowanceClass::LandlineMobile => &mut self.landline_mobile_remaining,
        }
    }
}

impl Default for AllowanceTracker {
    fn default() -> Self {
        Self::new()
    }
}
