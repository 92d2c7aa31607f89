use std::io::{self, Write};

use super::TriplesEmitter;

/// N-Triples format emitter. Streams triples as `<s> <p> <o> .` lines.
pub struct NTriplesEmitter<W: Write> {
    writer: W,
    count: u64,
}

impl<W: Write> NTriplesEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, count: 0 }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Escape a string for an N-Triples literal (RDF 1.1 N-Triples).
    fn escape_literal(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04X}", c as u32));
                }
                _ => out.push(c),
            }
        }
        out
    }

    fn line(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()> {
        writeln!(self.writer, "<{subject}> <{predicate}> {object} .")?;
        self.count += 1;
        Ok(())
    }
}

impl<W: Write> TriplesEmitter for NTriplesEmitter<W> {
    fn emit_iri(&mut self, subject: &str, predicate: &str, object: &str) -> io::Result<()> {
        self.line(subject, predicate, &format!("<{object}>"))
    }

    fn emit_literal(&mut self, subject: &str, predicate: &str, value: &str) -> io::Result<()> {
        let escaped = Self::escape_literal(value);
        self.line(subject, predicate, &format!("\"{escaped}\""))
    }

    fn emit_lang_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        lang: &str,
    ) -> io::Result<()> {
        let escaped = Self::escape_literal(value);
        self.line(subject, predicate, &format!("\"{escaped}\"@{lang}"))
    }

    fn emit_typed_literal(
        &mut self,
        subject: &str,
        predicate: &str,
        value: &str,
        datatype: &str,
    ) -> io::Result<()> {
        let escaped = Self::escape_literal(value);
        self.line(subject, predicate, &format!("\"{escaped}\"^^<{datatype}>"))
    }

    fn add_prefix(&mut self, prefix: &str, iri: &str) -> io::Result<()> {
        // N-Triples has no prefixes; keep them as comments for readers.
        writeln!(self.writer, "# @prefix {prefix}: <{iri}> .")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn triple_count(&self) -> u64 {
        self.count
    }
}
