// Recognizing reference pages in the reference manager's web app

use url::Url;

pub const SERVICE_HOST: &str = "sciwheel.com";

/// Which page of the web app the URL points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceView {
    /// `/work/#/items/<id>/detail`
    Detail,
    /// `/work/#/items/unsorted/<id>`
    UnsortedDetail,
    /// `/work/item/<id>/resources/<res>/pdf`
    Pdf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLocation {
    pub reference_id: String,
    pub view: ReferenceView,
}

/// Extracts the reference id from a page URL, or `None` when the page is not
/// a single reference.
pub fn classify_url(raw: &str) -> Option<ReferenceLocation> {
    let url = parse_page_url(raw.trim())?;

    let host = url.host_str()?;
    if host != SERVICE_HOST && !host.ends_with(&format!(".{}", SERVICE_HOST)) {
        return None;
    }

    let path = url.path().trim_end_matches('/');
    let fragment = url.fragment().unwrap_or_default();

    if path == "/work"
        && let Some(id) = fragment.strip_prefix("/items/").and_then(leading_digits)
    {
        return Some(ReferenceLocation {
            reference_id: id,
            view: ReferenceView::Detail,
        });
    }

    if let Some(id) = url.path().strip_prefix("/work/item/").and_then(leading_digits) {
        return Some(ReferenceLocation {
            reference_id: id,
            view: ReferenceView::Pdf,
        });
    }

    if path == "/work"
        && let Some(id) = fragment
            .strip_prefix("/items/unsorted/")
            .and_then(leading_digits)
    {
        return Some(ReferenceLocation {
            reference_id: id,
            view: ReferenceView::UnsortedDetail,
        });
    }

    None
}

/// Parses the URL, retrying with `https://` when the scheme is missing.
fn parse_page_url(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Some(url),
        _ => Url::parse(&format!("https://{}", raw)).ok(),
    }
}

fn leading_digits(s: &str) -> Option<String> {
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    (!digits.is_empty()).then_some(digits)
}
