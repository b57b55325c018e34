//! Outbound deep links.

/// Country code prepended to provider phone numbers.
const COUNTRY_CODE: &str = "91";

/// WhatsApp chat link to a provider with a prefilled greeting.
///
/// Non-digits are stripped from `phone`. Returns `None` when no digits
/// remain, so providers without a phone number get no contact button.
///
/// ```
/// use gharkakaam_storefront::links::whatsapp_link;
///
/// let link = whatsapp_link("98765 43210", "Sunita", "Home Cook").unwrap();
/// assert!(link.starts_with("https://wa.me/919876543210?text=Hi%20Sunita"));
/// assert_eq!(whatsapp_link("", "Sunita", "Home Cook"), None);
/// ```
#[must_use]
pub fn whatsapp_link(phone: &str, provider_name: &str, service_title: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let message = format!(
        "Hi {provider_name}, I found your profile on GharKaKaam and I'm interested in your \
         {service_title} services. Could you please share more details?"
    );
    Some(format!(
        "https://wa.me/{COUNTRY_CODE}{digits}?text={}",
        urlencoding::encode(&message)
    ))
}

/// `tel:` link for a phone number.
#[must_use]
pub fn tel_link(phone: &str) -> String {
    let digits: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    format!("tel:{digits}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_link_message() {
        let link = whatsapp_link("+91-98765-43210", "Asha", "Tutoring").unwrap();
        let (base, text) = link.split_once("?text=").unwrap();
        // "+91" is part of the digits the user typed; the prefix is always added.
        assert_eq!(base, "https://wa.me/91919876543210");
        assert_eq!(
            urlencoding::decode(text).unwrap(),
            "Hi Asha, I found your profile on GharKaKaam and I'm interested in your Tutoring \
             services. Could you please share more details?"
        );
    }

    #[test]
    fn test_whatsapp_link_requires_digits() {
        assert_eq!(whatsapp_link("", "Asha", "Tutoring"), None);
        assert_eq!(whatsapp_link("n/a", "Asha", "Tutoring"), None);
    }

    #[test]
    fn test_tel_link() {
        assert_eq!(tel_link("+91 98765 43210"), "tel:+919876543210");
    }
}
