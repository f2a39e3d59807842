use crate::domain::model::NumberCategory;

/// 已正規化的電話號碼與其類別；類別在建構時決定，之後不再改變
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    number: String,
    category: NumberCategory,
}

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.number
    }

    pub fn category(&self) -> NumberCategory {
        self.category
    }

    pub fn into_string(self) -> String {
        self.number
    }
}

/// 國碼寫法統一成 `00`，英國國碼 `0044` 折回國內格式 `0`
pub fn normalize(raw: &str) -> String {
    let number = raw.replace('+', "00");
    match number.strip_prefix("0044") {
        Some(rest) => format!("0{}", rest),
        None => number,
    }
}

/// 依前綴判斷類別，先符合者優先；無法辨識的號碼一律為 Invalid
pub fn categorize(number: &str) -> NumberCategory {
    if number.starts_with("00") {
        NumberCategory::International
    } else if number.starts_with("01") || number.starts_with("02") {
        NumberCategory::Landline
    } else if number.starts_with("080") {
        NumberCategory::FreePhone
    } else if number.starts_with("07")
        && (number.as_bytes().get(2) != Some(&b'6') || number.starts_with("07624"))
    {
        NumberCategory::Mobile
    } else {
        NumberCategory::Invalid
    }
}

pub fn classify(raw: &str) -> PhoneNumber {
    let number = normalize(raw);
    let category = categorize(&number);
    PhoneNumber { number, category }
}
