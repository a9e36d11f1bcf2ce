//! RTF export
//!
//! Writes a document as a small RTF file: character formatting as `\b`,
//! `\i`, `\ul`, `\strike`; paragraph indent as `\li` and justification as
//! `\ql`/`\qr`/`\qc`/`\qj`. Spellcheck highlighting is not exported.

use crate::document::Document;
use crate::format::CharFormat;
use crate::tags::Justification;

/// Twips per indent layout unit (one unit is one pixel at 96 dpi)
const TWIPS_PER_UNIT: u32 = 15;

fn exported(mut format: CharFormat) -> CharFormat {
    format.misspelt = false;
    format
}

fn push_format(rtf: &mut String, format: &CharFormat) {
    if format.indent > 0 {
        rtf.push_str(&format!("\\li{}", format.indent * TWIPS_PER_UNIT));
    }
    match format.justification {
        Some(Justification::Left) => rtf.push_str("\\ql"),
        Some(Justification::Right) => rtf.push_str("\\qr"),
        Some(Justification::Center) => rtf.push_str("\\qc"),
        Some(Justification::Fill) => rtf.push_str("\\qj"),
        None => {}
    }
    if format.bold { rtf.push_str("\\b"); }
    if format.italic { rtf.push_str("\\i"); }
    if format.underline { rtf.push_str("\\ul"); }
    if format.strikethrough { rtf.push_str("\\strike"); }
    rtf.push(' ');
}

/// Export a Document as RTF
pub fn to_rtf(doc: &Document) -> String {
    let mut rtf = String::from("{\\rtf1\\ansi\\deff0\n");
    rtf.push_str("{\\fonttbl{\\f0 Sans;}}\n");

    let mut prev: Option<CharFormat> = None;
    for (i, c) in doc.content().chars().enumerate() {
        let format = exported(doc.format_at(i));

        // Emit style changes
        if prev != Some(format) {
            if prev.is_some() { rtf.push('}'); }
            rtf.push('{');
            push_format(&mut rtf, &format);
        }

        match c {
            '\n' => rtf.push_str("\\par\n"),
            '\\' => rtf.push_str("\\\\"),
            '{' => rtf.push_str("\\{"),
            '}' => rtf.push_str("\\}"),
            _ if (c as u32) > 127 => {
                // RTF \u takes a signed 16-bit value; astral chars go as surrogate pairs
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    rtf.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
            _ => rtf.push(c),
        }

        prev = Some(format);
    }

    if prev.is_some() { rtf.push('}'); }
    rtf.push_str("\n}");
    rtf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Step;
    use crate::tags::{Family, ToggleTag};

    #[test]
    fn test_plain_text() {
        let doc = Document::from_text("plain {text}\\");
        let rtf = to_rtf(&doc);
        assert!(rtf.starts_with("{\\rtf1"));
        assert!(rtf.contains("{ plain \\{text\\}\\\\}"));
        assert!(rtf.ends_with("\n}"));
    }

    #[test]
    fn test_formatting_groups() {
        let mut doc = Document::from_text("bold then\nmore");
        doc.apply_tag(ToggleTag::Bold, 0, 4);
        doc.apply_tag(ToggleTag::Misspelt, 5, 9);
        doc.step_ladder(Family::Indent, 10, 14, Step::Increase).unwrap();
        doc.set_exclusive(Justification::Center, 10, 14);

        let rtf = to_rtf(&doc);
        assert!(rtf.contains("{\\b bold}{  then\\par\n}"));
        assert!(rtf.contains("{\\li375\\qc more}"));
        assert!(!rtf.contains("misspelt"));
    }

    #[test]
    fn test_unicode_escapes() {
        let doc = Document::from_text("é😀");
        let rtf = to_rtf(&doc);
        assert!(rtf.contains("\\u233?"));
        assert!(rtf.contains("\\u-10179?\\u-8704?"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(to_rtf(&Document::new()), "{\\rtf1\\ansi\\deff0\n{\\fonttbl{\\f0 Sans;}}\n\n}");
    }
}
