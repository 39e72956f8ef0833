//! # Customer Links
//!
//! Each dining table gets a printed QR code that opens the customer page
//! pre-set to that table and language.
//!
//! ```text
//!   https://tabs.example.ma/          (public base URL)
//!        │ join "customer.html"
//!        ▼
//!   https://tabs.example.ma/customer.html?table=t-7&lang=ar
//!        │ url-encoded into ?data=
//!        ▼
//!   https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=https%3A%2F%2F...
//! ```

use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::i18n::Language;
use crate::{CUSTOMER_PAGE, QR_CODE_SERVICE_URL, QR_CODE_SIZE};

fn invalid_url(url: &str, err: impl ToString) -> CoreError {
    CoreError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

/// Deep link to the customer page for one table.
///
/// `base` is the site origin (or any page on it); the customer page is
/// resolved relative to it.
pub fn customer_link(base: &str, table_id: &str, lang: Language) -> CoreResult<Url> {
    let base_url = Url::parse(base).map_err(|e| invalid_url(base, e))?;
    let mut link = base_url
        .join(CUSTOMER_PAGE)
        .map_err(|e| invalid_url(base, e))?;

    link.query_pairs_mut()
        .clear()
        .append_pair("table", table_id)
        .append_pair("lang", lang.code());
    Ok(link)
}

/// QR code image URL encoding the customer link for `table_id`.
///
/// ## Example
/// ```rust
/// use dinetab_core::links::qr_code_url;
/// use dinetab_core::Language;
///
/// let url = qr_code_url("https://tabs.example.ma/", "12", Language::Fr).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://api.qrserver.com/v1/create-qr-code/?size=300x300&data=\
///      https%3A%2F%2Ftabs.example.ma%2Fcustomer.html%3Ftable%3D12%26lang%3Dfr"
/// );
/// ```
pub fn qr_code_url(base: &str, table_id: &str, lang: Language) -> CoreResult<Url> {
    let link = customer_link(base, table_id, lang)?;
    Url::parse_with_params(
        QR_CODE_SERVICE_URL,
        &[("size", QR_CODE_SIZE), ("data", link.as_str())],
    )
    .map_err(|e| invalid_url(QR_CODE_SERVICE_URL, e))
}
