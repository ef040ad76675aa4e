//! `Link` header pagination.
//!
//! GitHub announces further pages in a `Link` response header:
//!
//! ```text
//! <https://api.github.com/organizations/123/repos?per_page=100&page=2>; rel="next",
//! <https://api.github.com/organizations/123/repos?per_page=100&page=5>; rel="last"
//! ```
//!
//! The client follows the `next` URL verbatim, which also covers endpoints
//! that paginate with `since=` instead of `page=`.

/// Pagination links extracted from a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// Absent on the last page
    pub next_url: Option<String>,
    pub next_page: Option<u32>,
    pub last_page: Option<u32>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub links: LinkPagination,
}

/// Parse the Link header to extract pagination info.
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let part = part.trim();

        let mut url = None;
        let mut rel = None;

        for segment in part.split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel_value) = segment.strip_prefix("rel=") {
                rel = Some(rel_value.trim_matches('"'));
            }
        }

        let (Some(url), Some(rel)) = (url, rel) else {
            continue;
        };

        // rel may hold several space-separated relation types
        for rel_type in rel.split_whitespace() {
            match rel_type {
                "next" => {
                    info.next_url = Some(url.to_string());
                    info.next_page = extract_page_from_url(url);
                }
                "last" => info.last_page = extract_page_from_url(url),
                _ => {}
            }
        }
    }

    info
}

/// Extract the page parameter from a URL.
fn extract_page_from_url(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|param| param.strip_prefix("page="))
        .and_then(|value| value.parse().ok())
}
