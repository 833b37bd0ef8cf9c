use serde::{Deserialize, Serialize};

use crate::domain::models::{DispatchSummary, RecipientEntry};

const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

// Reached through the escape character, so each costs two septets.
const GSM7_EXTENSION: &str = "\u{0C}^{}\\[~]|€";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SmsEncoding {
    Gsm7,
    Ucs2,
}

/// Capacity of one segment when the body fits in a single message, and of
/// each part once the body is split (the remainder goes to the UDH).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentLimits {
    pub single: u32,
    pub multipart: u32,
}

/// Provider segmentation table. Kept as data so a provider change only
/// means a new table, not new counting code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SegmentRules {
    pub gsm7: SegmentLimits,
    pub ucs2: SegmentLimits,
}

impl SegmentRules {
    pub const TWILIO: SegmentRules = SegmentRules {
        gsm7: SegmentLimits {
            single: 160,
            multipart: 153,
        },
        ucs2: SegmentLimits {
            single: 70,
            multipart: 67,
        },
    };

    pub fn encoding(body: &str) -> SmsEncoding {
        if body.chars().all(is_gsm7) {
            SmsEncoding::Gsm7
        } else {
            SmsEncoding::Ucs2
        }
    }

    /// Septets for GSM-7, UTF-16 code units for UCS-2.
    pub fn encoded_units(body: &str, encoding: SmsEncoding) -> u32 {
        let units: usize = match encoding {
            SmsEncoding::Gsm7 => body
                .chars()
                .map(|c| if GSM7_EXTENSION.contains(c) { 2 } else { 1 })
                .sum(),
            SmsEncoding::Ucs2 => body.encode_utf16().count(),
        };
        u32::try_from(units).unwrap_or(u32::MAX)
    }

    pub fn count(&self, body: &str) -> u32 {
        if body.is_empty() {
            return 0;
        }

        let encoding = Self::encoding(body);
        let units = Self::encoded_units(body, encoding);
        let limits = match encoding {
            SmsEncoding::Gsm7 => self.gsm7,
            SmsEncoding::Ucs2 => self.ucs2,
        };

        if units <= limits.single {
            1
        } else {
            units.div_ceil(limits.multipart)
        }
    }
}

impl Default for SegmentRules {
    fn default() -> Self {
        Self::TWILIO
    }
}

fn is_gsm7(c: char) -> bool {
    GSM7_BASIC.contains(c) || GSM7_EXTENSION.contains(c)
}

/// Billed segments for one body under the default provider rules.
pub fn count_segments(body: &str) -> u32 {
    SegmentRules::default().count(body)
}

/// Totals for a batch without sending anything. Gives the same answer before
/// and after a dispatch since delivery outcome never enters into it.
pub fn count_messages_and_segments(batch: &[RecipientEntry]) -> DispatchSummary {
    batch
        .iter()
        .fold(DispatchSummary::default(), |acc, entry| {
            let segments: u64 = entry
                .messages
                .iter()
                .map(|message| u64::from(count_segments(&message.body)))
                .sum();

            acc + DispatchSummary::new(segments, entry.messages.len() as u64)
        })
}
