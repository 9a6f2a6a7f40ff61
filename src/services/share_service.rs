//! Simulated quote sharing.
//!
//! Builds the shareable link from the compared hotel ids and a timestamp,
//! and fakes the e-mail hand-off. Nothing leaves the process; the receipt
//! only exists so the widget can confirm the action to the user.

use crate::models::hotel::Hotel;

/// No server resolves these links; the domain is part of the fixture.
pub const SHARE_DOMAIN: &str = "https://dsei2027.eventbooking.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareReceipt {
    pub recipient: String,
    pub link: String,
}

pub struct ShareService;

impl ShareService {
    /// `<domain>/quote/<hyphen-joined-hotel-ids>/<base36-timestamp>`.
    pub fn quote_link(hotels: &[&Hotel], timestamp_ms: i64) -> String {
        let ids = hotels
            .iter()
            .map(|h| h.id.to_string())
            .collect::<Vec<_>>()
            .join("-");
        format!(
            "{}/quote/{}/{}",
            SHARE_DOMAIN,
            ids,
            to_base36(timestamp_ms.max(0) as u64)
        )
    }

    /// Pretend to e-mail the quote. Blank or malformed recipients make the
    /// send a no-op, mirroring a disabled send button.
    pub fn send_quote(recipient: &str, link: &str) -> Option<ShareReceipt> {
        let recipient = recipient.trim();
        if recipient.is_empty() || !is_valid_email(recipient) {
            return None;
        }
        log::info!("Quote link shared with {}", recipient);
        Some(ShareReceipt {
            recipient: recipient.to_string(),
            link: link.to_string(),
        })
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn is_valid_email(email: &str) -> bool {
    let re = regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
    );
    re.unwrap().is_match(email)
}
