use std::ops::Range;
use std::sync::OnceLock;

use regex::bytes::Regex;
use url::Url;

use crate::address::PageAddress;
use crate::naming::{asset_local_path, derive_assets_directory_name, derive_file_name};

/// Elements whose content is text, never markup.
const RAW_TEXT: &[&str] = &["script", "style", "textarea", "title"];

/// Elements whose URL attribute may point at a downloadable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Link,
    Script,
    Img,
}

impl TagKind {
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "link" => Some(TagKind::Link),
            "script" => Some(TagKind::Script),
            "img" => Some(TagKind::Img),
            _ => None,
        }
    }

    /// Name of the attribute holding the asset URL.
    pub fn url_attribute(self) -> &'static str {
        match self {
            TagKind::Link => "href",
            TagKind::Script | TagKind::Img => "src",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ValueSpan {
    range: Range<usize>,
    quote: Option<u8>,
}

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    value: String,
    span: Option<ValueSpan>,
    changed: bool,
}

/// A start tag of one of the [`TagKind`]s, with byte positions of its
/// attribute values in the source document.
#[derive(Debug, Clone)]
pub struct AssetElement {
    kind: TagKind,
    attributes: Vec<Attribute>,
}

impl AssetElement {
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// Decoded value of the first attribute called `name` (ASCII case-insensitive).
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.find(name).map(|attribute| attribute.value.as_str())
    }

    /// Replaces the value of an existing attribute. Returns `false` when the
    /// attribute is absent or was written without a value.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> bool {
        match self
            .attributes
            .iter_mut()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
        {
            Some(attribute) if attribute.span.is_some() => {
                attribute.value = value.to_string();
                attribute.changed = true;
                true
            }
            _ => false,
        }
    }

    fn find(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
    }

    fn edits(&self) -> impl Iterator<Item = Edit> + '_ {
        self.attributes
            .iter()
            .filter(|attribute| attribute.changed)
            .filter_map(|attribute| {
                attribute.span.as_ref().map(|span| Edit {
                    range: span.range.clone(),
                    replacement: quote_attribute(&attribute.value, span.quote),
                })
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    range: Range<usize>,
    replacement: String,
}

/// One same-origin asset found in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub id: usize,
    pub kind: TagKind,
    pub source_url: Url,
    pub local_path: String,
}

/// Everything decided about a page before any asset is downloaded.
#[derive(Debug, Clone)]
pub struct RewritePlan {
    source: Vec<u8>,
    edits: Vec<Edit>,
    resources: Vec<ResourceDescriptor>,
    html_file_name: String,
    assets_directory_name: String,
}

impl RewritePlan {
    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn html_file_name(&self) -> &str {
        &self.html_file_name
    }

    pub fn assets_directory_name(&self) -> &str {
        &self.assets_directory_name
    }

    /// The page with every same-origin asset attribute replaced by its local
    /// path. All other bytes are copied from the source unchanged, whatever
    /// their encoding.
    pub fn render(&self) -> Vec<u8> {
        let mut rendered = Vec::with_capacity(self.source.len());
        let mut cursor = 0;

        for edit in &self.edits {
            rendered.extend_from_slice(&self.source[cursor..edit.range.start]);
            rendered.extend_from_slice(edit.replacement.as_bytes());
            cursor = edit.range.end;
        }
        rendered.extend_from_slice(&self.source[cursor..]);

        rendered
    }
}

/// Finds same-origin assets in a page and plans their local names.
#[derive(Clone)]
pub struct HtmlParser {
    address: PageAddress,
    name_base_part: String,
    assets_directory_name: String,
}

impl HtmlParser {
    pub fn new(address: &PageAddress) -> Self {
        let name_base_part = address.name_base_part();
        let assets_directory_name = derive_assets_directory_name(address.url(), &name_base_part);

        Self {
            address: address.clone(),
            name_base_part,
            assets_directory_name,
        }
    }

    pub fn html_file_name(&self) -> String {
        derive_file_name(self.address.url(), &self.name_base_part)
    }

    pub fn extract(&self, html_content: &[u8]) -> RewritePlan {
        let mut resources = Vec::new();
        let mut edits = Vec::new();

        for mut element in scan_asset_elements(html_content) {
            let attribute = element.kind().url_attribute();

            let Some(source_url) = element
                .get_attribute(attribute)
                .filter(|value| !value.is_empty())
                .and_then(|value| self.address.resolve(value))
            else {
                continue;
            };

            if !self.address.is_same_origin(&source_url) {
                continue;
            }

            let file_name = derive_file_name(&source_url, &self.name_base_part);
            let local_path = asset_local_path(&self.assets_directory_name, &file_name);

            element.set_attribute(attribute, &local_path);
            edits.extend(element.edits());

            resources.push(ResourceDescriptor {
                id: resources.len(),
                kind: element.kind(),
                source_url,
                local_path,
            });
        }

        RewritePlan {
            source: html_content.to_vec(),
            edits,
            resources,
            html_file_name: self.html_file_name(),
            assets_directory_name: self.assets_directory_name.clone(),
        }
    }
}

fn start_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?-u)\A<([A-Za-z][A-Za-z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("start tag pattern is valid")
    })
}

fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?-u)([^\s"'>/=]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'=<>`]+))?"#)
            .expect("attribute pattern is valid")
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Scans `html` for `link`, `script` and `img` start tags in document order.
///
/// Works on raw bytes, so pages in any ASCII-compatible encoding are scanned
/// as-is. Comments and the text content of [`RAW_TEXT`] elements are skipped.
pub fn scan_asset_elements(html: &[u8]) -> Vec<AssetElement> {
    let lowered = html.to_ascii_lowercase();
    let mut elements = Vec::new();
    let mut pos = 0;

    while let Some(offset) = html[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        let rest = &html[start..];

        if rest.starts_with(b"<!--") {
            pos = match find_bytes(&html[start + 4..], b"-->") {
                Some(end) => start + 4 + end + 3,
                None => html.len(),
            };
            continue;
        }

        let Some(captures) = start_tag_regex().captures(rest) else {
            pos = start + 1;
            continue;
        };

        let (Some(whole), Some(name), Some(attrs)) = (captures.get(0), captures.get(1), captures.get(2)) else {
            pos = start + 1;
            continue;
        };
        pos = start + whole.end();

        let tag_name = String::from_utf8_lossy(name.as_bytes()).to_ascii_lowercase();

        if let Some(kind) = TagKind::from_tag_name(&tag_name) {
            elements.push(AssetElement {
                kind,
                attributes: parse_attributes(attrs.as_bytes(), start + attrs.start()),
            });
        }

        let self_closing = attrs.as_bytes().trim_ascii_end().ends_with(b"/");
        if !self_closing && RAW_TEXT.contains(&tag_name.as_str()) {
            let closing = format!("</{}", tag_name);
            pos = match find_bytes(&lowered[pos..], closing.as_bytes()) {
                Some(end) => pos + end,
                None => html.len(),
            };
        }
    }

    elements
}

fn parse_attributes(source: &[u8], base: usize) -> Vec<Attribute> {
    attribute_regex()
        .captures_iter(source)
        .filter_map(|captures| {
            let name = captures.get(1)?;
            let (value, span) = match captures.get(2) {
                Some(raw) => {
                    let bytes = raw.as_bytes();
                    let quote = bytes.first().copied().filter(|b| *b == b'"' || *b == b'\'');
                    let inner = match quote {
                        Some(_) => &bytes[1..bytes.len() - 1],
                        None => bytes,
                    };
                    let span = ValueSpan {
                        range: base + raw.start()..base + raw.end(),
                        quote,
                    };
                    let text = String::from_utf8_lossy(inner);
                    (html_escape::decode_html_entities(&text).into_owned(), Some(span))
                }
                None => (String::new(), None),
            };

            Some(Attribute {
                name: String::from_utf8_lossy(name.as_bytes()).to_ascii_lowercase(),
                value,
                span,
                changed: false,
            })
        })
        .collect()
}

/// Quotes `value` the way the original attribute was quoted; unquoted values
/// get double quotes.
fn quote_attribute(value: &str, quote: Option<u8>) -> String {
    match quote {
        Some(b'\'') => format!("'{}'", html_escape::encode_single_quoted_attribute(value)),
        _ => format!("\"{}\"", html_escape::encode_double_quoted_attribute(value)),
    }
}
