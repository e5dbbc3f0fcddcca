//! Recursive-descent serializer on top of `quick-xml`.

use super::{Document, Element, Node};
use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{borrow::Cow, fmt::Display};
use thiserror::Error;

/// Serialization errors.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("failed to write XML: {0}")]
    Write(String),

    #[error("serialized XML is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl XmlError {
    fn write(err: impl Display) -> Self {
        Self::Write(err.to_string())
    }
}

pub(super) fn write_document(doc: &Document, indent: bool) -> Result<String, XmlError> {
    let buf = Vec::with_capacity(4096);
    let mut writer = if indent {
        Writer::new_with_indent(buf, b' ', 2)
    } else {
        Writer::new(buf)
    };

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some(doc.encoding()), None)),
    )?;
    write_element(&mut writer, doc.root())?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), &*xml_safe(value)));
    }

    if element.children().is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for node in element.children() {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => emit(
                writer,
                Event::Text(BytesText::from_escaped(partial_escape(&*xml_safe(text)))),
            )?,
            Node::CData(text) => {
                for section in cdata_sections(&xml_safe(text)) {
                    emit(writer, Event::CData(BytesCData::new(section)))?;
                }
            }
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name())))
}

#[inline]
fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer.write_event(event).map_err(XmlError::write)
}

/// Drop characters XML 1.0 cannot carry, escaped or not.
///
/// That is every C0 control except tab, newline and carriage return, plus
/// the noncharacters U+FFFE and U+FFFF.
fn xml_safe(text: &str) -> Cow<'_, str> {
    fn forbidden(c: char) -> bool {
        matches!(
            c,
            '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
        )
    }

    if text.contains(forbidden) {
        Cow::Owned(text.chars().filter(|&c| !forbidden(c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Split text so no section contains the `]]>` terminator.
///
/// Each occurrence is cut after `]]`; the `>` opens the next section.
fn cdata_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut rest = text;
    let mut prefix = "";

    while let Some(pos) = rest.find("]]>") {
        sections.push(format!("{prefix}{}]]", &rest[..pos]));
        prefix = ">";
        rest = &rest[pos + 3..];
    }
    sections.push(format!("{prefix}{rest}"));
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(root: Element) -> Document {
        Document::new("UTF-8", root)
    }

    #[test]
    fn test_declaration_and_empty_root() {
        let xml = doc(Element::new("rss")).to_xml().unwrap();
        assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>
<rss/>"#);
    }

    #[test]
    fn test_declared_encoding() {
        let xml = Document::new("ISO-8859-1", Element::new("rss"))
            .to_xml_compact()
            .unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="ISO-8859-1"?>"#));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = doc(Element::new("link").text("http://x.test/?a=1&b=<2>"))
            .to_xml_compact()
            .unwrap();
        assert!(xml.contains("<link>http://x.test/?a=1&amp;b=&lt;2&gt;</link>"));
    }

    #[test]
    fn test_cdata_is_not_escaped() {
        let xml = doc(Element::new("title").cdata("<b>Fish & Chips</b>"))
            .to_xml_compact()
            .unwrap();
        assert!(xml.contains("<title><![CDATA[<b>Fish & Chips</b>]]></title>"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let xml = doc(Element::new("d").cdata("a]]>b"))
            .to_xml_compact()
            .unwrap();
        assert!(xml.contains("<d><![CDATA[a]]]]><![CDATA[>b]]></d>"));
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections("plain"), ["plain"]);
        assert_eq!(cdata_sections(""), [""]);
        assert_eq!(cdata_sections("]]>"), ["]]", ">"]);
        assert_eq!(cdata_sections("x]]>y]]>z"), ["x]]", ">y]]", ">z"]);

        let text = "a]]]>b]]>";
        assert_eq!(cdata_sections(text), ["a]]]", ">b]]", ">"]);
        assert_eq!(cdata_sections(text).concat(), text);
    }

    #[test]
    fn test_attributes_escaped_and_ordered() {
        let xml = doc(
            Element::new("atom:link")
                .attr("href", "http://x.test/feed?a=1&b=2")
                .attr("rel", "self"),
        )
        .to_xml_compact()
        .unwrap();
        assert!(xml.contains(r#"<atom:link href="http://x.test/feed?a=1&amp;b=2" rel="self"/>"#));
    }

    #[test]
    fn test_forbidden_characters_are_dropped() {
        let root = Element::new("item")
            .attr("title", "a\u{1}b\u{FFFF}")
            .child(Element::new("title").text("Blog\u{1}"))
            .child(Element::new("description").cdata("He\u{0}llo\u{1B}]]>x"))
            .child(Element::new("keep").text("tab\tnl\ncr\r"));
        let xml = doc(root).to_xml_compact().unwrap();

        assert!(xml.contains(r#"<item title="ab">"#));
        assert!(xml.contains("<title>Blog</title>"));
        assert!(xml.contains("<description><![CDATA[Hello]]]]><![CDATA[>x]]></description>"));
        assert!(xml.contains("<keep>tab\tnl\ncr\r</keep>"));
        assert!(!xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
    }

    #[test]
    fn test_xml_safe_borrows_clean_text() {
        assert!(matches!(xml_safe("plain & simple"), Cow::Borrowed(_)));
        assert_eq!(xml_safe("\u{8}x\u{C}y\u{FFFE}"), "xy");
        assert_eq!(xml_safe("\u{7F}\u{85}"), "\u{7F}\u{85}");
    }

    #[test]
    fn test_indented_layout() {
        let root = Element::new("rss").child(
            Element::new("channel")
                .child(Element::new("title").text("Blog"))
                .child(Element::new("item").child(Element::new("title").cdata("Hello"))),
        );
        let xml = doc(root).to_xml().unwrap();
        let lines: Vec<&str> = xml.lines().collect();

        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert_eq!(lines[1], "<rss>");
        assert_eq!(lines[2], "  <channel>");
        assert_eq!(lines[3], "    <title>Blog</title>");
        assert_eq!(lines[4], "    <item>");
        assert_eq!(lines[5], "      <title><![CDATA[Hello]]></title>");
        assert_eq!(lines[6], "    </item>");
        assert_eq!(lines[7], "  </channel>");
        assert_eq!(lines[8], "</rss>");
    }

    #[test]
    fn test_compact_has_no_newlines() {
        let root = Element::new("a").child(Element::new("b").text("c"));
        let xml = doc(root).to_xml_compact().unwrap();
        assert!(!xml.contains('\n'));
        assert!(xml.ends_with("<a><b>c</b></a>"));
    }
}
