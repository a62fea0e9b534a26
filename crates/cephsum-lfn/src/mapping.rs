//! Storage-mapping XML, as handed to xrootd for lfn-to-pfn translation.
//!
//! ```xml
//! <storage-mapping>
//!   <lfn-to-pfn protocol="direct" path-match="/+store/(.*)" result="cms:/store/$1"/>
//!   <lfn-to-pfn protocol="root" path-match="/+(.*)" result="$1" chain="direct"/>
//!   <pfn-to-lfn protocol="direct" path-match="cms:(.*)" result="$1"/>
//! </storage-mapping>
//! ```
//!
//! Only `lfn-to-pfn` elements are read; their document order is the rule
//! order.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::{ResolveError, ResolveResult};
use crate::rule::PathRule;

const LFN_TO_PFN: &str = "lfn-to-pfn";

/// Parse every `lfn-to-pfn` rule in document order.
pub fn parse_storage_mapping(xml: &str) -> ResolveResult<Vec<PathRule>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rules = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == LFN_TO_PFN.as_bytes() => {
                let rule = rule_from_element(&e)?;
                debug!(
                    protocol = rule.protocol(),
                    path_match = rule.path_match(),
                    result = rule.result(),
                    chain = ?rule.chain(),
                    "loaded lfn-to-pfn rule"
                );
                rules.push(rule);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rules)
}

fn rule_from_element(e: &BytesStart<'_>) -> ResolveResult<PathRule> {
    let mut protocol = None;
    let mut path_match = None;
    let mut result = None;
    let mut chain = None;
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.as_ref() {
            b"protocol" => protocol = Some(value),
            b"path-match" => path_match = Some(value),
            b"result" => result = Some(value),
            b"chain" => chain = Some(value),
            _ => {}
        }
    }
    let missing = |attribute| ResolveError::MissingAttribute {
        element: LFN_TO_PFN,
        attribute,
    };
    PathRule::new(
        protocol.ok_or_else(|| missing("protocol"))?,
        path_match.ok_or_else(|| missing("path-match"))?,
        result.ok_or_else(|| missing("result"))?,
        chain,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORAGE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<storage-mapping>
  <!-- translation for the echo gateways -->
  <lfn-to-pfn protocol="direct" destination-match=".*" path-match="/+store/(.*)" result="cms:/store/$1"/>
  <lfn-to-pfn protocol="root" destination-match=".*" path-match="(.*)" result="$1" chain="direct"/>
  <pfn-to-lfn protocol="direct" destination-match=".*" path-match="cms:/store/(.*)" result="/store/$1"/>
  <lfn-to-pfn protocol="direct" path-match="/*(.*)" result="$1"></lfn-to-pfn>
</storage-mapping>
"#;

    #[test]
    fn reads_lfn_to_pfn_rules_in_order() {
        let rules = parse_storage_mapping(STORAGE_XML).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].path_match(), "/+store/(.*)");
        assert_eq!(rules[0].result(), "cms:/store/$1");
        assert_eq!(rules[1].protocol(), "root");
        assert_eq!(rules[1].chain(), Some("direct"));
        assert_eq!(rules[2].path_match(), "/*(.*)");
    }

    #[test]
    fn missing_attribute_is_reported() {
        let xml = r#"<storage-mapping><lfn-to-pfn protocol="direct" result="$1"/></storage-mapping>"#;
        let err = parse_storage_mapping(xml).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingAttribute { attribute: "path-match", .. }
        ));
    }

    #[test]
    fn escaped_attribute_values_are_unescaped() {
        let xml = r#"<storage-mapping><lfn-to-pfn protocol="direct" path-match="/a&amp;b/(.*)" result="p:$1"/></storage-mapping>"#;
        let rules = parse_storage_mapping(xml).unwrap();
        assert_eq!(rules[0].path_match(), "/a&b/(.*)");
    }

    #[test]
    fn malformed_document_is_an_error() {
        let err =
            parse_storage_mapping("<storage-mapping><lfn-to-pfn protocol=direct/>").unwrap_err();
        assert!(matches!(err, ResolveError::Xml(_)));
    }

    #[test]
    fn empty_mapping_has_no_rules() {
        assert!(parse_storage_mapping("<storage-mapping/>").unwrap().is_empty());
    }
}
