// XML codec shared by every import and export
//
// Documents are serde types. Element names come from `#[serde(rename)]` on
// the fields, the root element name from `XmlDocument::ROOT`.

use crate::error::{Result, ShopError};
use quick_xml::events::{BytesCData, Event};
use quick_xml::se::Serializer;
use quick_xml::{Reader, Writer};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

const INDENT_SIZE: usize = 2;

const CDATA_END: &str = "]]>";

/// A top-level XML document with a fixed root element
pub trait XmlDocument: Serialize + DeserializeOwned {
    const ROOT: &'static str;
}

/// Qualified name of the first element in `xml`, skipping declaration,
/// comments and whitespace
pub fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::Eof => {
                return Err(ShopError::UnexpectedRoot {
                    expected: "an element".to_string(),
                    found: "end of document".to_string(),
                });
            }
            _ => {}
        }
    }
}

/// Parse `xml` into `D`, rejecting documents whose root is not `D::ROOT`
pub fn decode<D: XmlDocument>(xml: &str) -> Result<D> {
    let found = root_element(xml)?;
    if found != D::ROOT {
        return Err(ShopError::UnexpectedRoot {
            expected: D::ROOT.to_string(),
            found,
        });
    }

    let document = quick_xml::de::from_str(&preserve_leaf_text(xml)?)?;
    Ok(document)
}

/// Rewrite the text of every leaf element as CDATA.
///
/// The serde deserializer trims the whitespace around text nodes but leaves
/// CDATA alone, so field values come through exactly as written. Whitespace
/// between elements stays plain text and is still ignored.
fn preserve_leaf_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut events = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            event => events.push(event),
        }
    }

    let leaf_text: Vec<bool> = (0..events.len())
        .map(|i| {
            matches!(events[i], Event::Text(_))
                && i > 0
                && matches!(events[i - 1], Event::Start(_))
                && matches!(events.get(i + 1), Some(Event::End(_)))
        })
        .collect();

    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    for (event, is_leaf_text) in events.into_iter().zip(leaf_text) {
        match event {
            Event::Text(text) if is_leaf_text => {
                let content = text.unescape()?;
                // "]]>" cannot appear inside one CDATA section
                let mut rest: &str = &content;
                while let Some(at) = rest.find(CDATA_END) {
                    writer.write_event(Event::CData(BytesCData::new(&rest[..at + 2])))?;
                    rest = &rest[at + 2..];
                }
                writer.write_event(Event::CData(BytesCData::new(rest)))?;
            }
            other => writer.write_event(other)?,
        }
    }

    let rewritten = String::from_utf8(writer.into_inner()).map_err(quick_xml::Error::from)?;
    Ok(rewritten)
}

/// Serialize `document` under `D::ROOT`: declaration, two-space indent,
/// no namespace declarations, surrounding whitespace trimmed
pub fn encode<D: XmlDocument>(document: &D) -> Result<String> {
    let mut body = String::new();

    let mut serializer = Serializer::with_root(&mut body, Some(D::ROOT))
        .map_err(|e| ShopError::Encode(e.to_string()))?;
    serializer.indent(' ', INDENT_SIZE);
    document
        .serialize(serializer)
        .map_err(|e| ShopError::Encode(e.to_string()))?;

    Ok(format!("{}\n{}", XML_DECLARATION, body.trim()).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Shelf {
        #[serde(rename = "Book", default)]
        books: Vec<Book>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Book {
        #[serde(rename = "title")]
        title: String,
        #[serde(rename = "pages", default, skip_serializing_if = "Option::is_none")]
        pages: Option<u32>,
    }

    impl XmlDocument for Shelf {
        const ROOT: &'static str = "Shelf";
    }

    #[test]
    fn test_root_element_skips_prolog() {
        let xml = r#"<?xml version="1.0" encoding="utf-16"?>
<!-- dataset -->
<Users>
  <User/>
</Users>"#;

        assert_eq!(root_element(xml).unwrap(), "Users");
        assert_eq!(root_element("<Empty/>").unwrap(), "Empty");
    }

    #[test]
    fn test_root_element_of_empty_document() {
        let err = root_element("   ").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_collects_items() {
        let xml = r#"<Shelf>
  <Book><title>Dune</title><pages>412</pages></Book>
  <Book><title>Emma</title></Book>
</Shelf>"#;

        let shelf: Shelf = decode(xml).unwrap();

        assert_eq!(shelf.books.len(), 2);
        assert_eq!(shelf.books[0].pages, Some(412));
        assert_eq!(shelf.books[1].title, "Emma");
        assert_eq!(shelf.books[1].pages, None);
    }

    #[test]
    fn test_decode_keeps_surrounding_whitespace() {
        let xml = "<Shelf>
  <Book><title>  Dune  </title></Book>
  <Book><title>   </title></Book>
  <Book><title> a]]&gt;b &amp; c </title><pages>7</pages></Book>
</Shelf>";

        let shelf: Shelf = decode(xml).unwrap();

        assert_eq!(shelf.books.len(), 3);
        assert_eq!(shelf.books[0].title, "  Dune  ");
        assert_eq!(shelf.books[1].title, "   ");
        assert_eq!(shelf.books[2].title, " a]]>b & c ");
        assert_eq!(shelf.books[2].pages, Some(7));
    }

    #[test]
    fn test_decode_empty_root() {
        let shelf: Shelf = decode("<Shelf />").unwrap();
        assert!(shelf.books.is_empty());

        let shelf: Shelf = decode("<Shelf>\n  </Shelf>").unwrap();
        assert!(shelf.books.is_empty());
    }

    #[test]
    fn test_decode_wrong_root_fails() {
        let err = decode::<Shelf>("<Library><Book><title>Dune</title></Book></Library>").unwrap_err();

        match err {
            ShopError::UnexpectedRoot { expected, found } => {
                assert_eq!(expected, "Shelf");
                assert_eq!(found, "Library");
            }
            other => panic!("expected UnexpectedRoot, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_prefixed_root_fails() {
        let err = decode::<Shelf>("<x:Shelf xmlns:x=\"urn:x\"><Book><title>Dune</title></Book></x:Shelf>")
            .unwrap_err();

        match err {
            ShopError::UnexpectedRoot { found, .. } => assert_eq!(found, "x:Shelf"),
            other => panic!("expected UnexpectedRoot, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_malformed_fails() {
        let err = decode::<Shelf>("<Shelf><Book><title>Dune</Book></Shelf>").unwrap_err();
        assert!(err.is_decode(), "got {:?}", err);
    }

    #[test]
    fn test_decode_missing_required_field_fails() {
        let err = decode::<Shelf>("<Shelf><Book><pages>3</pages></Book></Shelf>").unwrap_err();
        assert!(err.is_decode(), "got {:?}", err);
    }

    #[test]
    fn test_encode_shape() {
        let shelf = Shelf {
            books: vec![Book {
                title: "Dune".to_string(),
                pages: None,
            }],
        };

        let xml = encode(&shelf).unwrap();

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.ends_with("</Shelf>"));
        assert!(!xml.contains("xmlns"));
        assert!(xml.contains("<Book>"));
        assert!(xml.contains("<title>Dune</title>"));
        assert!(!xml.contains("pages"));
        assert_eq!(xml, xml.trim());
    }

    #[test]
    fn test_encode_then_decode() {
        let shelf = Shelf {
            books: vec![
                Book {
                    title: "Dune".to_string(),
                    pages: Some(412),
                },
                Book {
                    title: "Emma & co <2>".to_string(),
                    pages: None,
                },
                Book {
                    title: " padded ".to_string(),
                    pages: None,
                },
            ],
        };

        let decoded: Shelf = decode(&encode(&shelf).unwrap()).unwrap();
        assert_eq!(decoded, shelf);
    }
}
