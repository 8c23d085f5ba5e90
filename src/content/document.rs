//! Website content document and the page locator.
//!
//! A stored document is `{"pages": [{"name", "slug", "position", "content"}]}`.
//! Documents arrive as opaque JSON and are parsed once into [`Document`];
//! anything that does not have that shape is `Malformed`, which every
//! projection treats as "no pages".

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::content::slug::ROOT;

/// Sort key used for pages without a usable position.
pub const UNPOSITIONED: i64 = 999;

/// A single page of a website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub name: String,
    /// Absolute path, `/` for the homepage.
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    pub content: String,
}

impl Page {
    /// Parse one entry of the `pages` list. Legacy `Name`/`Slug` keys are
    /// accepted. Returns `None` when the entry has no string slug.
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let slug = field(obj, "slug", "Slug").and_then(Value::as_str)?;
        let name = field(obj, "name", "Name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let content = obj
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some(Self {
            name: name.to_string(),
            slug: slug.to_string(),
            position: obj.get("position").and_then(parse_position),
            content: content.to_string(),
        })
    }

    /// Position used for ordering.
    pub fn sort_key(&self) -> i64 {
        self.position.unwrap_or(UNPOSITIONED)
    }
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str, legacy: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| obj.get(legacy))
}

/// Integer, integral float or numeric string; anything else counts as missing.
pub(crate) fn parse_position(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: String,
    pub slug: String,
    pub position: i64,
}

/// Page data submitted by the editor form.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub position: Option<Value>,
    #[serde(default)]
    pub content: Option<String>,
}

/// A parsed content document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    WellFormed { pages: Vec<Page> },
    Malformed,
}

impl Default for Document {
    fn default() -> Self {
        Document::WellFormed { pages: Vec::new() }
    }
}

impl Document {
    /// Parse a stored document. Never fails: a missing document, a value that
    /// is not a mapping, a `pages` key that is not a list, or a list entry
    /// without a slug all produce `Malformed`.
    pub fn from_value(value: Option<&Value>) -> Self {
        let Some(list) = value
            .and_then(Value::as_object)
            .and_then(|obj| obj.get("pages"))
            .and_then(Value::as_array)
        else {
            return Document::Malformed;
        };

        let pages: Option<Vec<Page>> = list.iter().map(Page::from_value).collect();
        match pages {
            Some(pages) => Document::WellFormed { pages },
            None => Document::Malformed,
        }
    }

    /// Build a document from editor form input. Entries missing a name or a
    /// slug are skipped; slugs get a leading `/`; positions default to the
    /// entry's 1-based index.
    pub fn from_page_inputs(inputs: &[PageInput]) -> Self {
        let pages = inputs
            .iter()
            .enumerate()
            .filter_map(|(index, input)| {
                let name = present(input.name.as_deref())?;
                let slug = present(input.slug.as_deref())?;
                let slug = if slug.starts_with('/') {
                    slug.to_string()
                } else {
                    format!("/{}", slug)
                };
                let position = input
                    .position
                    .as_ref()
                    .and_then(parse_position)
                    .unwrap_or(index as i64 + 1);

                Some(Page {
                    name: name.to_string(),
                    slug,
                    position: Some(position),
                    content: input.content.clone().unwrap_or_default(),
                })
            })
            .collect();

        Document::WellFormed { pages }
    }

    /// Canonical JSON form. `None` for a malformed document, which has none.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Document::WellFormed { pages } => Some(json!({ "pages": pages })),
            Document::Malformed => None,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        matches!(self, Document::WellFormed { .. })
    }

    /// Pages in document order.
    pub fn pages(&self) -> &[Page] {
        match self {
            Document::WellFormed { pages } => pages,
            Document::Malformed => &[],
        }
    }

    pub fn has_pages(&self) -> bool {
        !self.pages().is_empty()
    }

    /// Exact, case-sensitive slug match. The first match in document order
    /// wins when slugs repeat.
    pub fn find_page(&self, slug: &str) -> Option<&Page> {
        self.pages().iter().find(|p| p.slug == slug)
    }

    pub fn page_exists(&self, slug: &str) -> bool {
        self.find_page(slug).is_some()
    }

    pub fn find_by_position(&self, position: i64) -> Option<&Page> {
        self.pages().iter().find(|p| p.position == Some(position))
    }

    /// The `/` page, or the first page in position order.
    pub fn homepage(&self) -> Option<&Page> {
        self.find_page(ROOT)
            .or_else(|| self.sorted_by_position().into_iter().next())
    }

    /// Stable ascending sort by position; unpositioned pages sink to the end.
    pub fn sorted_by_position(&self) -> Vec<&Page> {
        let mut sorted: Vec<&Page> = self.pages().iter().collect();
        sorted.sort_by_key(|p| p.sort_key());
        sorted
    }

    /// Pages nested under `parent`. The root has no children relationship.
    pub fn child_pages(&self, parent: &str) -> Vec<&Page> {
        if parent == ROOT {
            return Vec::new();
        }
        let prefix = format!("{}/", parent);
        self.pages()
            .iter()
            .filter(|p| p.slug.starts_with(&prefix) && p.slug != parent)
            .collect()
    }

    /// One past the highest position, counting missing positions as 0.
    pub fn next_position(&self) -> i64 {
        self.pages()
            .iter()
            .map(|p| p.position.unwrap_or(0))
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }

    /// Reorder pages by position and renumber them 1..N. Returns false, and
    /// leaves the document alone, when it is malformed.
    pub fn normalize_positions(&mut self) -> bool {
        let Document::WellFormed { pages } = self else {
            return false;
        };

        pages.sort_by_key(|p| p.sort_key());
        for (index, page) in pages.iter_mut().enumerate() {
            page.position = Some(index as i64 + 1);
        }
        true
    }

    /// Replace the body of the page at `slug`. Absent content is stored as an
    /// empty string. Returns false, without touching the document, when the
    /// page does not exist.
    pub fn set_page_content(&mut self, slug: &str, body: Option<&str>) -> bool {
        let Document::WellFormed { pages } = self else {
            return false;
        };

        match pages.iter_mut().find(|p| p.slug == slug) {
            Some(page) => {
                page.content = body.unwrap_or_default().to_string();
                true
            }
            None => false,
        }
    }

    pub fn page_slugs(&self) -> Vec<&str> {
        self.pages().iter().map(|p| p.slug.as_str()).collect()
    }

    pub fn page_slugs_by_position(&self) -> Vec<&str> {
        self.sorted_by_position()
            .into_iter()
            .map(|p| p.slug.as_str())
            .collect()
    }

    pub fn page_names(&self) -> Vec<&str> {
        self.pages().iter().map(|p| p.name.as_str()).collect()
    }

    pub fn page_names_by_position(&self) -> Vec<&str> {
        self.sorted_by_position()
            .into_iter()
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Menu entries in display order.
    pub fn navigation_items(&self) -> Vec<NavItem> {
        self.sorted_by_position()
            .into_iter()
            .map(|p| NavItem {
                name: p.name.clone(),
                slug: p.slug.clone(),
                position: p.sort_key(),
            })
            .collect()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
