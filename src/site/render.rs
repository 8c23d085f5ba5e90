//! Minimal HTML shell for public pages.
//!
//! Page bodies are owner-authored HTML and are emitted as is; every other
//! value is escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::content::{NavItem, Page};
use crate::website::Website;

/// Full page with navigation. `preview` adds a banner for owners viewing
/// through the editor API.
pub fn render_page(website: &Website, page: &Page, nav: &[NavItem], preview: bool) -> String {
    let mut menu = String::new();
    for item in nav {
        let class = if item.slug == page.slug { " class=\"active\"" } else { "" };
        menu.push_str(&format!(
            "<li><a href=\"{}\"{}>{}</a></li>",
            encode_double_quoted_attribute(&item.slug),
            class,
            encode_text(&item.name),
        ));
    }

    let banner = if preview {
        "<div class=\"preview-banner\">Preview mode</div>\n"
    } else {
        ""
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{} | {}</title>\n</head>\n<body>\n{}<nav><ul>{}</ul></nav>\n<main>\n{}\n</main>\n</body>\n</html>\n",
        encode_text(&page.name),
        encode_text(&website.name),
        banner,
        menu,
        page.content,
    )
}

/// Status page for the not-found and not-published outcomes.
pub fn render_message(title: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<h1>{}</h1>\n<p>{}</p>\n</body>\n</html>\n",
        encode_text(title),
        encode_text(title),
        encode_text(message),
    )
}
