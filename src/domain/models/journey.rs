use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JourneyType {
    WelcomeSms,
    BulkSms,
    GoodbyeSms,
    UnstopConfirmationSms,
}

impl JourneyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyType::WelcomeSms => "WELCOME_SMS",
            JourneyType::BulkSms => "BULK_SMS",
            JourneyType::GoodbyeSms => "GOODBYE_SMS",
            JourneyType::UnstopConfirmationSms => "UNSTOP_CONFIRMATION_SMS",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "WELCOME_SMS" => Some(JourneyType::WelcomeSms),
            "BULK_SMS" => Some(JourneyType::BulkSms),
            "GOODBYE_SMS" => Some(JourneyType::GoodbyeSms),
            "UNSTOP_CONFIRMATION_SMS" => Some(JourneyType::UnstopConfirmationSms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journey_type_string_form_round_trips() {
        for journey in [
            JourneyType::WelcomeSms,
            JourneyType::BulkSms,
            JourneyType::GoodbyeSms,
            JourneyType::UnstopConfirmationSms,
        ] {
            assert_eq!(JourneyType::from_str(journey.as_str()), Some(journey));
        }
        assert_eq!(JourneyType::from_str("bulk_sms"), None);
    }

    #[test]
    fn serde_uses_the_database_spelling() {
        let json = serde_json::to_string(&JourneyType::BulkSms).unwrap();
        assert_eq!(json, r#""BULK_SMS""#);
    }
}
