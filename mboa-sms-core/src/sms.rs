//! SMS encoding detection and segment counting.

use serde::{Deserialize, Serialize};

const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";
const GSM7_EXTENSION: &str = "\u{c}^{}\\[~]|€";

/// Character set an SMS will be sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsEncoding {
    /// GSM 03.38 default alphabet, 7 bits per character.
    Gsm7,
    /// UCS-2, 16 bits per character.
    Ucs2,
}

impl SmsEncoding {
    /// Characters that fit in a single-part message.
    pub fn single_limit(&self) -> usize {
        match self {
            SmsEncoding::Gsm7 => 160,
            SmsEncoding::Ucs2 => 70,
        }
    }

    /// Characters per part once the message is concatenated.
    pub fn multipart_limit(&self) -> usize {
        match self {
            SmsEncoding::Gsm7 => 153,
            SmsEncoding::Ucs2 => 67,
        }
    }
}

/// Measured size of an SMS body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsSegments {
    /// Encoding the text requires.
    pub encoding: SmsEncoding,
    /// Length in encoding units (septets or UTF-16 code units).
    pub length: usize,
    /// Number of billed parts.
    pub parts: usize,
}

impl SmsSegments {
    /// Measure a message body.
    pub fn measure(text: &str) -> Self {
        let (encoding, length) = match gsm7_length(text) {
            Some(septets) => (SmsEncoding::Gsm7, septets),
            None => (SmsEncoding::Ucs2, text.encode_utf16().count()),
        };

        let parts = if length == 0 {
            0
        } else if length <= encoding.single_limit() {
            1
        } else {
            length.div_ceil(encoding.multipart_limit())
        };

        Self {
            encoding,
            length,
            parts,
        }
    }

    /// Units left before another part is needed.
    pub fn remaining(&self) -> usize {
        let capacity = match self.parts {
            0 | 1 => self.encoding.single_limit(),
            n => n * self.encoding.multipart_limit(),
        };
        capacity.saturating_sub(self.length)
    }
}

/// Septet count, or `None` when a character falls outside GSM-7.
fn gsm7_length(text: &str) -> Option<usize> {
    text.chars().try_fold(0usize, |acc, c| {
        if GSM7_BASIC.contains(c) {
            Some(acc + 1)
        } else if GSM7_EXTENSION.contains(c) {
            Some(acc + 2)
        } else {
            None
        }
    })
}
