//! Streaming RDF/XML reader producing raw RDF statements.
//!
//! Handles the striped RDF/XML syntax as written by ontology editors:
//! - `rdf:RDF` root with namespace declarations, `xml:base` and `xml:lang`
//! - typed node elements (`<owl:Class rdf:about="...">`) and `rdf:Description`
//! - subjects via `rdf:about`, `rdf:ID`, `rdf:nodeID` or fresh blank nodes
//! - property elements with `rdf:resource`, `rdf:nodeID`, nested node
//!   elements, literal text (with `xml:lang` / `rdf:datatype`) and
//!   `rdf:parseType="Resource"`
//! - property attributes on node elements
//! - internal DOCTYPE `<!ENTITY>` declarations (`&obo;` style prefixes)
//!
//! `rdf:parseType="Literal"` and `"Collection"` subtrees are skipped.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{OntologyError, Result};
use crate::model::iri::resolve_iri;
use crate::model::ontology::standard;

/// A subject or object node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Iri(String),
    /// A blank node named by the document through `rdf:nodeID`.
    Blank(String),
    /// A blank node minted by the parser for an anonymous node element.
    Fresh(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub value: String,
    pub lang: Option<String>,
    pub datatype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Resource(Resource),
    Literal(Literal),
}

/// One raw RDF statement, before any vocabulary is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: Resource,
    pub predicate: String,
    pub object: Object,
}

/// Per-element XML context: namespace declarations plus effective base and language.
struct Scope {
    namespaces: Vec<(String, String)>,
    base: String,
    lang: Option<String>,
}

enum Frame {
    Root,
    Node {
        subject: Resource,
        /// Opened by `rdf:parseType="Resource"`; closes with its property element.
        implicit: bool,
    },
    Property {
        subject: Resource,
        predicate: String,
        object: Option<Resource>,
        text: String,
        lang: Option<String>,
        datatype: Option<String>,
    },
    /// Content that is not interpreted (XML literals, collections).
    Opaque,
}

/// Parse an RDF/XML document into statements.
pub fn parse_statements(markup: &str, base_iri: &str) -> Result<Vec<Statement>> {
    RdfXmlParser::new(markup, base_iri).run()
}

struct RdfXmlParser<'a> {
    reader: Reader<&'a [u8]>,
    base_iri: String,
    entities: HashMap<String, String>,
    scopes: Vec<Scope>,
    frames: Vec<Frame>,
    statements: Vec<Statement>,
    blank_counter: usize,
}

impl<'a> RdfXmlParser<'a> {
    fn new(markup: &'a str, base_iri: &str) -> Self {
        Self {
            reader: Reader::from_str(markup),
            base_iri: base_iri.to_string(),
            entities: HashMap::new(),
            scopes: Vec::new(),
            frames: Vec::new(),
            statements: Vec::new(),
            blank_counter: 0,
        }
    }

    fn run(mut self) -> Result<Vec<Statement>> {
        loop {
            let event = match self.reader.read_event() {
                Ok(event) => event,
                Err(e) => return Err(self.error(e.to_string())),
            };
            match event {
                Event::Start(e) => self.handle_start(&e)?,
                Event::Empty(e) => {
                    self.handle_start(&e)?;
                    self.handle_end()?;
                }
                Event::End(_) => self.handle_end()?,
                Event::Text(e) => {
                    let text = e
                        .unescape_with(|name| self.entities.get(name).map(String::as_str))
                        .map_err(|err| self.error(err.to_string()))?
                        .into_owned();
                    self.handle_text(&text);
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    self.handle_text(&text);
                }
                Event::DocType(e) => {
                    let declarations = String::from_utf8_lossy(&e).into_owned();
                    self.entities.extend(parse_entity_declarations(&declarations));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !self.frames.is_empty() {
            return Err(self.error("unexpected end of document: unclosed elements"));
        }
        debug!(statements = self.statements.len(), "parsed RDF/XML statements");
        Ok(self.statements)
    }

    fn error(&self, message: impl Into<String>) -> OntologyError {
        OntologyError::malformed(message, Some(self.reader.buffer_position() as u64))
    }

    // -----------------------------------------------------------------------
    // Element handling
    // -----------------------------------------------------------------------

    fn handle_start(&mut self, element: &BytesStart<'_>) -> Result<()> {
        let attributes = self.decode_attributes(element)?;
        self.open_scope(&attributes)?;
        if matches!(self.frames.last(), Some(Frame::Opaque)) {
            self.frames.push(Frame::Opaque);
            return Ok(());
        }
        let raw_name = std::str::from_utf8(element.name().as_ref())
            .map_err(|e| self.error(e.to_string()))?
            .to_string();
        let name = self.expand_name(&raw_name)?;

        let owner = match self.frames.last() {
            Some(Frame::Node { subject, .. }) => Some(subject.clone()),
            _ => None,
        };

        match owner {
            Some(subject) => self.property_element(subject, name, &attributes),
            None if self.frames.is_empty() && name == standard::RDF_RDF => {
                self.frames.push(Frame::Root);
                Ok(())
            }
            // Under the root, or as the object of a property element.
            None => self.node_element(&name, &attributes),
        }
    }

    fn handle_end(&mut self) -> Result<()> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| self.error("closing tag without a matching opening tag"))?;

        match frame {
            Frame::Node { implicit: true, .. } => {
                // The property element that opened the implicit node closes with it.
                self.frames.pop();
            }
            Frame::Property {
                subject,
                predicate,
                object: None,
                text,
                lang,
                datatype,
            } => {
                self.statements.push(Statement {
                    subject,
                    predicate,
                    object: Object::Literal(Literal {
                        value: text,
                        lang,
                        datatype,
                    }),
                });
            }
            _ => {}
        }

        self.scopes.pop();
        Ok(())
    }

    fn handle_text(&mut self, text: &str) {
        if let Some(Frame::Property {
            object: None, text: buffer, ..
        }) = self.frames.last_mut()
        {
            buffer.push_str(text);
        }
    }

    fn node_element(&mut self, name: &str, attributes: &[(String, String)]) -> Result<()> {
        let mut subject = None;
        let mut properties = Vec::new();

        for (key, value) in attributes {
            match self.rdf_attribute(key)? {
                Some("about") => subject = Some(Resource::Iri(self.resolve(value))),
                Some("ID") => subject = Some(Resource::Iri(self.resolve(&format!("#{value}")))),
                Some("nodeID") => subject = Some(Resource::Blank(value.clone())),
                Some("type") => properties.push(self.type_attribute(value)),
                Some(_) => {}
                None => properties.push(self.literal_attribute(key, value)?),
            }
        }

        let subject = subject.unwrap_or_else(|| self.fresh_blank());

        if let Some(Frame::Property {
            subject: owner,
            predicate,
            object,
            ..
        }) = self.frames.last_mut()
        {
            *object = Some(subject.clone());
            self.statements.push(Statement {
                subject: owner.clone(),
                predicate: predicate.clone(),
                object: Object::Resource(subject.clone()),
            });
        }

        if name != standard::RDF_DESCRIPTION {
            self.push_resource(&subject, standard::RDF_TYPE, Resource::Iri(name.to_string()));
        }
        self.push_attribute_properties(&subject, properties);

        self.frames.push(Frame::Node {
            subject,
            implicit: false,
        });
        Ok(())
    }

    fn property_element(
        &mut self,
        subject: Resource,
        predicate: String,
        attributes: &[(String, String)],
    ) -> Result<()> {
        let mut object = None;
        let mut datatype = None;
        let mut parse_type = None;
        let mut properties = Vec::new();

        for (key, value) in attributes {
            match self.rdf_attribute(key)? {
                Some("resource") => object = Some(Resource::Iri(self.resolve(value))),
                Some("nodeID") => object = Some(Resource::Blank(value.clone())),
                Some("datatype") => datatype = Some(self.resolve(value)),
                Some("parseType") => parse_type = Some(value.clone()),
                Some("type") => properties.push(self.type_attribute(value)),
                Some(_) => {}
                None => properties.push(self.literal_attribute(key, value)?),
            }
        }

        match parse_type.as_deref() {
            Some("Resource") => {
                let node = self.fresh_blank();
                self.push_resource(&subject, &predicate, node.clone());
                self.frames.push(Frame::Property {
                    subject,
                    predicate,
                    object: Some(node.clone()),
                    text: String::new(),
                    lang: None,
                    datatype: None,
                });
                self.frames.push(Frame::Node {
                    subject: node,
                    implicit: true,
                });
                return Ok(());
            }
            Some(other) => {
                debug!(parse_type = other, predicate = %predicate, "skipping unsupported parseType");
                self.frames.push(Frame::Opaque);
                return Ok(());
            }
            None => {}
        }

        if object.is_none() && !properties.is_empty() {
            object = Some(self.fresh_blank());
        }
        if let Some(target) = &object {
            self.push_resource(&subject, &predicate, target.clone());
            self.push_attribute_properties(target, properties);
        }

        let lang = self.scopes.last().and_then(|s| s.lang.clone());
        self.frames.push(Frame::Property {
            subject,
            predicate,
            object,
            text: String::new(),
            lang,
            datatype,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Statement helpers
    // -----------------------------------------------------------------------

    fn push_resource(&mut self, subject: &Resource, predicate: &str, object: Resource) {
        self.statements.push(Statement {
            subject: subject.clone(),
            predicate: predicate.to_string(),
            object: Object::Resource(object),
        });
    }

    fn push_attribute_properties(&mut self, subject: &Resource, properties: Vec<(String, Object)>) {
        for (predicate, object) in properties {
            self.statements.push(Statement {
                subject: subject.clone(),
                predicate,
                object,
            });
        }
    }

    /// `rdf:type` given as an attribute.
    fn type_attribute(&self, value: &str) -> (String, Object) {
        (
            standard::RDF_TYPE.to_string(),
            Object::Resource(Resource::Iri(self.resolve(value))),
        )
    }

    /// A property attribute: its expanded name with a plain literal value.
    fn literal_attribute(&self, key: &str, value: &str) -> Result<(String, Object)> {
        let lang = self.scopes.last().and_then(|s| s.lang.clone());
        Ok((
            self.expand_name(key)?,
            Object::Literal(Literal {
                value: value.to_string(),
                lang,
                datatype: None,
            }),
        ))
    }

    fn fresh_blank(&mut self) -> Resource {
        self.blank_counter += 1;
        Resource::Fresh(self.blank_counter)
    }

    fn resolve(&self, value: &str) -> String {
        let base = self
            .scopes
            .last()
            .map(|s| s.base.as_str())
            .unwrap_or(self.base_iri.as_str());
        resolve_iri(base, value)
    }

    // -----------------------------------------------------------------------
    // Names, namespaces and attributes
    // -----------------------------------------------------------------------

    fn decode_attributes(&self, element: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| self.error(e.to_string()))?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| self.error(e.to_string()))?
                .to_string();
            let value = attribute
                .unescape_value_with(|name| self.entities.get(name).map(String::as_str))
                .map_err(|e| self.error(e.to_string()))?
                .into_owned();
            out.push((key, value));
        }
        Ok(out)
    }

    fn open_scope(&mut self, attributes: &[(String, String)]) -> Result<()> {
        let (mut base, mut lang) = match self.scopes.last() {
            Some(parent) => (parent.base.clone(), parent.lang.clone()),
            None => (self.base_iri.clone(), None),
        };
        let mut namespaces = Vec::new();

        for (key, value) in attributes {
            if key == "xmlns" {
                namespaces.push((String::new(), value.clone()));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                if value.is_empty() {
                    return Err(self.error(format!(
                        "invalid namespace declaration: prefix `{prefix}` bound to an empty IRI"
                    )));
                }
                namespaces.push((prefix.to_string(), value.clone()));
            } else if key == "xml:base" {
                base = resolve_iri(&base, value);
            } else if key == "xml:lang" {
                lang = if value.is_empty() {
                    None
                } else {
                    Some(value.clone())
                };
            }
        }

        self.scopes.push(Scope {
            namespaces,
            base,
            lang,
        });
        Ok(())
    }

    fn namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(standard::XML);
        }
        self.scopes.iter().rev().find_map(|scope| {
            scope
                .namespaces
                .iter()
                .find(|(p, _)| p == prefix)
                .map(|(_, ns)| ns.as_str())
        })
    }

    /// Expand a qualified XML name to a full IRI.
    fn expand_name(&self, qname: &str) -> Result<String> {
        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (prefix, local),
            None => ("", qname),
        };
        match self.namespace(prefix) {
            Some(ns) => Ok(format!("{ns}{local}")),
            None if prefix.is_empty() => Err(self.error(format!(
                "element or attribute `{qname}` has no namespace"
            ))),
            None => Err(self.error(format!("undeclared namespace prefix `{prefix}`"))),
        }
    }

    /// Classify an attribute: `Some(local)` for RDF syntax attributes, `None`
    /// for property attributes. `xmlns`/`xml:` attributes are reported as
    /// syntax so callers skip them.
    fn rdf_attribute<'k>(&self, key: &'k str) -> Result<Option<&'k str>> {
        if key == "xmlns" || key.starts_with("xmlns:") || key.starts_with("xml:") {
            return Ok(Some(""));
        }
        match key.split_once(':') {
            Some((prefix, local)) => {
                if self.namespace(prefix) == Some(standard::RDF) && is_syntax_attribute(local) {
                    Ok(Some(local))
                } else {
                    Ok(None)
                }
            }
            // Unqualified syntax attributes are accepted for leniency.
            None if is_syntax_attribute(key) => Ok(Some(key)),
            None => Ok(Some("")),
        }
    }
}

fn is_syntax_attribute(local: &str) -> bool {
    matches!(
        local,
        "about" | "ID" | "nodeID" | "resource" | "datatype" | "parseType" | "type"
    )
}

/// Extract `<!ENTITY name "value">` declarations from a DOCTYPE body.
///
/// Parameter entities (`<!ENTITY % name ...>`) are skipped.
fn parse_entity_declarations(doctype: &str) -> HashMap<String, String> {
    let mut entities = HashMap::new();
    let mut rest = doctype;

    while let Some(start) = rest.find("<!ENTITY") {
        rest = rest[start + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }
        let name_len = rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        rest = rest[name_len..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(value_len) = rest[1..].find(quote) else {
            break;
        };
        entities.insert(name.to_string(), rest[1..1 + value_len].to_string());
        rest = &rest[1 + value_len + 1..];
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_declarations_are_collected() {
        let doctype = r#"rdf:RDF [
            <!ENTITY obo "http://purl.obolibrary.org/obo/" >
            <!ENTITY % param "ignored">
            <!ENTITY xsd 'http://www.w3.org/2001/XMLSchema#' >
        ]"#;
        let entities = parse_entity_declarations(doctype);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities["obo"], "http://purl.obolibrary.org/obo/");
        assert_eq!(entities["xsd"], "http://www.w3.org/2001/XMLSchema#");
    }

    #[test]
    fn parse_type_resource_creates_blank_node() {
        let xml = r#"<rdf:RDF
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:ex="http://example.org/">
          <rdf:Description rdf:about="http://example.org/a">
            <ex:p rdf:parseType="Resource">
              <ex:q rdf:resource="http://example.org/b"/>
            </ex:p>
          </rdf:Description>
        </rdf:RDF>"#;
        let statements = parse_statements(xml, "http://base/").unwrap();
        assert_eq!(statements.len(), 2);
        let blank = match &statements[0].object {
            Object::Resource(r @ Resource::Fresh(_)) => r.clone(),
            other => panic!("expected blank node, got {other:?}"),
        };
        assert_eq!(statements[1].subject, blank);
        assert_eq!(
            statements[1].object,
            Object::Resource(Resource::Iri("http://example.org/b".into()))
        );
    }

    #[test]
    fn xml_lang_is_inherited() {
        let xml = r#"<rdf:RDF xml:lang="zh"
            xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
            xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#">
          <rdf:Description rdf:about="http://example.org/a">
            <rdfs:label>质谱</rdfs:label>
            <rdfs:label xml:lang="">plain</rdfs:label>
          </rdf:Description>
        </rdf:RDF>"#;
        let statements = parse_statements(xml, "http://base/").unwrap();
        let langs: Vec<Option<&str>> = statements
            .iter()
            .map(|s| match &s.object {
                Object::Literal(l) => l.lang.as_deref(),
                _ => None,
            })
            .collect();
        assert_eq!(langs, vec![Some("zh"), None]);
    }
}
