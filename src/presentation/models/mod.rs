use poem_openapi::Enum;

use crate::domain::models::JourneyType;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum JourneyTypeKind {
    #[oai(rename = "WELCOME_SMS")]
    WelcomeSms,
    #[oai(rename = "BULK_SMS")]
    BulkSms,
    #[oai(rename = "GOODBYE_SMS")]
    GoodbyeSms,
    #[oai(rename = "UNSTOP_CONFIRMATION_SMS")]
    UnstopConfirmationSms,
}

impl Default for JourneyTypeKind {
    fn default() -> Self {
        JourneyTypeKind::BulkSms
    }
}

impl From<JourneyTypeKind> for JourneyType {
    fn from(value: JourneyTypeKind) -> Self {
        match value {
            JourneyTypeKind::WelcomeSms => JourneyType::WelcomeSms,
            JourneyTypeKind::BulkSms => JourneyType::BulkSms,
            JourneyTypeKind::GoodbyeSms => JourneyType::GoodbyeSms,
            JourneyTypeKind::UnstopConfirmationSms => JourneyType::UnstopConfirmationSms,
        }
    }
}

impl From<JourneyType> for JourneyTypeKind {
    fn from(value: JourneyType) -> Self {
        match value {
            JourneyType::WelcomeSms => JourneyTypeKind::WelcomeSms,
            JourneyType::BulkSms => JourneyTypeKind::BulkSms,
            JourneyType::GoodbyeSms => JourneyTypeKind::GoodbyeSms,
            JourneyType::UnstopConfirmationSms => JourneyTypeKind::UnstopConfirmationSms,
        }
    }
}
