//! Well-known XML namespaces used by the scene graph.

/// The SVG namespace. Every node created by name lives here.
pub const SVG: &str = "http://www.w3.org/2000/svg";

/// The XLink namespace, used by legacy `xlink:href` references.
pub const XLINK: &str = "http://www.w3.org/1999/xlink";

/// The reserved XML namespace (`xml:space`, `xml:lang`).
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Returns the conventional prefix for a well-known attribute namespace.
pub fn prefix_for(uri: &str) -> Option<&'static str> {
    match uri {
        XLINK => Some("xlink"),
        XML => Some("xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_for_known_namespaces() {
        assert_eq!(prefix_for(XLINK), Some("xlink"));
        assert_eq!(prefix_for(XML), Some("xml"));
        assert_eq!(prefix_for(SVG), None);
        assert_eq!(prefix_for("urn:example"), None);
    }
}
