//! Locating a release file inside a mirror's auto-generated directory listing.
//!
//! Mirrors publish no API, only an HTML table of links. Instead of reading
//! every link on the page we follow a fixed chain of element names down to
//! the anchors (`html > body > table > tbody > tr > td > a`) and take the
//! first `href` with the wanted suffix.
//!
//! The walk only needs [`ListingNode`], so any HTML tree can be searched.
//! [`HtmlListing`] provides one backed by `scraper`.

mod html;
mod mirror;

pub use html::{HtmlListing, HtmlNode};
pub use mirror::find_on_mirror;

use std::fmt;
use std::str::FromStr;

/// Minimal view of a parsed document node.
pub trait ListingNode: Sized {
    /// Element name, or `None` for text, comments and the document itself.
    fn tag_name(&self) -> Option<&str>;

    /// Attributes in document order.
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// Direct children in document order.
    fn children(&self) -> Vec<Self>;
}

/// Ordered element names from the document root down to the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPath(Vec<String>);

impl TagPath {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagPath(tags.into_iter().map(Into::into).collect())
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TagPath {
    /// Layout of Apache/nginx style autoindex tables after HTML5 parsing.
    fn default() -> Self {
        TagPath::new(["html", "body", "table", "tbody", "tr", "td", "a"])
    }
}

impl FromStr for TagPath {
    type Err = String;

    /// Accepts `html>body>table` or `html,body,table` (whitespace ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tags: Vec<String> = s
            .split(|c: char| c == '>' || c == ',')
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if tags.is_empty() {
            return Err(format!("empty tag path: {:?}", s));
        }
        Ok(TagPath(tags))
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" > "))
    }
}

/// Returns the first `href` ending in `suffix` among anchors reached from
/// `root` through exactly `path`.
///
/// Children are tried in document order and the first hit wins. A child whose
/// tag does not match the head of the path is skipped entirely, so links
/// nested deeper or shallower than `path` are never seen.
pub fn locate<N: ListingNode>(root: &N, path: &TagPath, suffix: &str) -> Option<String> {
    walk(root, path.tags(), suffix)
}

fn walk<N: ListingNode>(node: &N, remaining: &[String], suffix: &str) -> Option<String> {
    let Some((head, tail)) = remaining.split_first() else {
        return node
            .attributes()
            .into_iter()
            .find(|(key, value)| *key == "href" && value.ends_with(suffix))
            .map(|(_, value)| value.to_string());
    };

    node.children()
        .iter()
        .filter(|child| child.tag_name() == Some(head.as_str()))
        .find_map(|child| walk(child, tail, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Parser-free tree used to exercise the walk.
    #[derive(Debug, Clone)]
    struct Synthetic {
        tag: Option<&'static str>,
        attrs: Vec<(&'static str, &'static str)>,
        children: Vec<Synthetic>,
    }

    fn el(tag: &'static str, children: Vec<Synthetic>) -> Synthetic {
        Synthetic {
            tag: Some(tag),
            attrs: Vec::new(),
            children,
        }
    }

    fn a(href: &'static str) -> Synthetic {
        Synthetic {
            tag: Some("a"),
            attrs: vec![("class", "link"), ("href", href)],
            children: vec![text()],
        }
    }

    fn text() -> Synthetic {
        Synthetic {
            tag: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    fn document(children: Vec<Synthetic>) -> Synthetic {
        Synthetic {
            tag: None,
            attrs: Vec::new(),
            children,
        }
    }

    fn rows(cells: Vec<Synthetic>) -> Synthetic {
        document(vec![el(
            "html",
            vec![el(
                "body",
                vec![el("table", vec![el("tbody", cells)])],
            )],
        )])
    }

    impl ListingNode for Synthetic {
        fn tag_name(&self) -> Option<&str> {
            self.tag
        }

        fn attributes(&self) -> Vec<(&str, &str)> {
            self.attrs.clone()
        }

        fn children(&self) -> Vec<Self> {
            self.children.clone()
        }
    }

    #[test]
    fn finds_iso_in_minimal_listing() {
        let doc = rows(vec![el(
            "tr",
            vec![el("td", vec![a("archlinux-2024.01.01-x86_64.iso")])],
        )]);
        assert_eq!(
            locate(&doc, &TagPath::default(), ".iso").as_deref(),
            Some("archlinux-2024.01.01-x86_64.iso")
        );
    }

    #[test]
    fn missing_suffix_is_none() {
        let doc = rows(vec![el(
            "tr",
            vec![el("td", vec![a("sha256sums.txt"), a("../")])],
        )]);
        assert_eq!(locate(&doc, &TagPath::default(), ".iso"), None);
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let doc = rows(vec![
            el("tr", vec![el("td", vec![a("../")])]),
            el("tr", vec![el("td", vec![a("archlinux-x86_64.iso.sig")])]),
            el("tr", vec![el("td", vec![a("archlinux-2024.02.01-x86_64.iso")])]),
            el("tr", vec![el("td", vec![a("archlinux-x86_64.iso")])]),
        ]);
        let path = TagPath::default();
        assert_eq!(
            locate(&doc, &path, ".iso").as_deref(),
            Some("archlinux-2024.02.01-x86_64.iso")
        );
        assert_eq!(
            locate(&doc, &path, ".iso.sig").as_deref(),
            Some("archlinux-x86_64.iso.sig")
        );
    }

    #[test]
    fn anchor_one_level_deeper_is_ignored() {
        let doc = rows(vec![el(
            "tr",
            vec![el("td", vec![el("span", vec![a("archlinux.iso")])])],
        )]);
        assert_eq!(locate(&doc, &TagPath::default(), ".iso"), None);
    }

    #[test]
    fn anchor_one_level_shallower_is_ignored() {
        let doc = rows(vec![el("tr", vec![a("archlinux.iso")])]);
        assert_eq!(locate(&doc, &TagPath::default(), ".iso"), None);
    }

    #[test]
    fn later_sibling_branch_is_searched_after_dead_end() {
        let doc = document(vec![el(
            "html",
            vec![el(
                "body",
                vec![
                    el("table", vec![el("tbody", vec![el("tr", vec![el("td", vec![a("README")])])])]),
                    el("pre", vec![a("decoy.iso")]),
                    el("table", vec![el("tbody", vec![el("tr", vec![el("td", vec![a("real.iso")])])])]),
                ],
            )],
        )]);
        assert_eq!(
            locate(&doc, &TagPath::default(), ".iso").as_deref(),
            Some("real.iso")
        );
    }

    #[test]
    fn only_href_attribute_is_considered() {
        let anchor = Synthetic {
            tag: Some("a"),
            attrs: vec![("title", "latest.iso"), ("href", "latest/")],
            children: Vec::new(),
        };
        let doc = rows(vec![el("tr", vec![el("td", vec![anchor])])]);
        assert_eq!(locate(&doc, &TagPath::default(), ".iso"), None);
    }

    #[test]
    fn empty_path_inspects_root_itself() {
        let anchor = a("direct.iso");
        assert_eq!(
            locate(&anchor, &TagPath::new(Vec::<String>::new()), ".iso").as_deref(),
            Some("direct.iso")
        );
    }

    #[test]
    fn tag_path_parsing_and_display() {
        let p: TagPath = "HTML > body > pre > a".parse().unwrap();
        assert_eq!(p.tags(), ["html", "body", "pre", "a"]);
        assert_eq!(p.to_string(), "html > body > pre > a");
        let q: TagPath = "html,body,a".parse().unwrap();
        assert_eq!(q.tags().len(), 3);
        assert!(" , > ".parse::<TagPath>().is_err());
    }
}
