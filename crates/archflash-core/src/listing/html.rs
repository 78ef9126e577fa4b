//! `scraper`-backed document tree for the listing walk.

use super::ListingNode;
use crate::error::{FlashError, Result};
use scraper::{ElementRef, Html};

/// A parsed directory listing.
pub struct HtmlListing {
    document: Html,
}

impl HtmlListing {
    /// Parses markup. html5ever repairs malformed input instead of rejecting
    /// it, so this cannot fail.
    pub fn parse(markup: &str) -> Self {
        HtmlListing {
            document: Html::parse_document(markup),
        }
    }

    /// Parses a response body fetched from `url`. Bodies that are not text
    /// are rejected with [`FlashError::Parse`].
    pub fn from_bytes(url: &str, body: &[u8]) -> Result<Self> {
        let markup = std::str::from_utf8(body).map_err(|e| FlashError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::parse(markup))
    }

    /// The document node; its only element child is `<html>`.
    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode::Document(&self.document)
    }
}

/// Document or element node of an [`HtmlListing`].
#[derive(Clone)]
pub enum HtmlNode<'a> {
    Document(&'a Html),
    Element(ElementRef<'a>),
}

impl ListingNode for HtmlNode<'_> {
    fn tag_name(&self) -> Option<&str> {
        match self {
            HtmlNode::Document(_) => None,
            HtmlNode::Element(el) => Some(el.value().name()),
        }
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        match self {
            HtmlNode::Document(_) => Vec::new(),
            HtmlNode::Element(el) => el.value().attrs().collect(),
        }
    }

    fn children(&self) -> Vec<Self> {
        match self {
            HtmlNode::Document(doc) => vec![HtmlNode::Element(doc.root_element())],
            HtmlNode::Element(el) => el
                .children()
                .filter_map(ElementRef::wrap)
                .map(HtmlNode::Element)
                .collect(),
        }
    }
}
