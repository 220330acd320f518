//! Theme file codec.
//!
//! A theme file is a `<resources>` root with one `<color name="role">value</color>`
//! child per role:
//!
//! ```xml
//! <?xml version='1.0' encoding='UTF-8'?>
//! <resources>
//!   <color name="primaryColor">#2979ff</color>
//! </resources>
//! ```
//!
//! Values are kept byte for byte, surrounding whitespace included. Elements
//! other than direct `<color>` children of the root are ignored.

use quick_xml::escape::{escape, unescape, EscapeError};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;
use tracing::debug;

use super::palette::Palette;

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";

const ROOT_ELEMENT: &str = "resources";
const COLOR_ELEMENT: &str = "color";
const NAME_ATTRIBUTE: &str = "name";

/// Errors from reading or writing a theme document.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),
    #[error("Invalid attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("Invalid escape sequence: {0}")]
    Escape(#[from] EscapeError),
    #[error("Document has no root element")]
    MissingRoot,
    #[error("Document ends inside an element")]
    Truncated,
    #[error("Failed to write theme document: {0}")]
    Write(#[from] std::io::Error),
    #[error("Theme document is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode a palette as a theme document.
pub fn encode(palette: &Palette) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
    for (role, value) in palette.iter() {
        let mut color = BytesStart::new(COLOR_ELEMENT);
        color.push_attribute((NAME_ATTRIBUTE, role));
        writer.write_event(Event::Start(color))?;
        writer.write_event(Event::Text(BytesText::new(value)))?;
        writer.write_event(Event::End(BytesEnd::new(COLOR_ELEMENT)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    let body = String::from_utf8(writer.into_inner())?;
    Ok(format!("{XML_DECLARATION}{body}\n"))
}

/// Decode a theme document into a palette.
///
/// Later entries win when a role appears twice. `<color>` elements without a
/// `name` attribute are skipped.
pub fn decode(xml: &str) -> Result<Palette, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut palette = Palette::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    // Role and still-escaped text of the <color> being read
    let mut current: Option<(String, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                seen_root = true;
                if depth == 2 && e.name().as_ref() == COLOR_ELEMENT.as_bytes() {
                    current = color_name(&e)?.map(|name| (name, String::new()));
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                if depth == 1 && e.name().as_ref() == COLOR_ELEMENT.as_bytes() {
                    if let Some(name) = color_name(&e)? {
                        palette.set(name, String::new());
                    }
                }
            }
            Event::Text(e) if depth == 2 => {
                if let Some((_, raw)) = current.as_mut() {
                    raw.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::GeneralRef(e) if depth == 2 => {
                if let Some((_, raw)) = current.as_mut() {
                    raw.push('&');
                    raw.push_str(&String::from_utf8_lossy(&e));
                    raw.push(';');
                }
            }
            Event::CData(e) if depth == 2 => {
                if let Some((_, raw)) = current.as_mut() {
                    let text = String::from_utf8_lossy(&e);
                    raw.push_str(&escape(&*text));
                }
            }
            Event::End(_) => {
                if depth == 2 {
                    if let Some((name, raw)) = current.take() {
                        let value = unescape(&raw)?.into_owned();
                        palette.set(name, value);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(XmlError::MissingRoot);
    }
    if depth != 0 {
        return Err(XmlError::Truncated);
    }
    Ok(palette)
}

fn color_name(element: &BytesStart<'_>) -> Result<Option<String>, XmlError> {
    match element.try_get_attribute(NAME_ATTRIBUTE)? {
        Some(attr) => {
            let raw = String::from_utf8_lossy(&attr.value);
            Ok(Some(unescape(&raw)?.into_owned()))
        }
        None => {
            debug!("Skipping <color> without a name attribute");
            Ok(None)
        }
    }
}
