use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::Change;

/// The `<metadata><extensions>` children of a route GPX file, keyed by local tag name (so
/// `<rcr:ascent>` is `ascent`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extensions {
    pub values: BTreeMap<String, String>,
    pub changelog: Vec<Change>,
}

impl Extensions {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|x| x.as_str())
            .filter(|x| !x.is_empty())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        let raw = self.get(key)?;
        match raw.trim().parse() {
            Ok(x) => Some(x),
            Err(_) => {
                log::warn!("Ignoring non-numeric {key} extension '{raw}'");
                None
            }
        }
    }
}

/// Scrape metadata extensions out of raw GPX text. Track-level extensions are ignored.
pub fn parse_extensions(xml: &str) -> Result<Extensions, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut out = Extensions::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "change" && in_changelog(&stack) {
                    out.changelog.push(Change::default());
                }
                stack.push(name);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                record(&stack, text, &mut out);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                record(&stack, text, &mut out);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

fn in_changelog(stack: &[String]) -> bool {
    stack.ends_with(&[
        "metadata".to_string(),
        "extensions".to_string(),
        "changelog".to_string(),
    ])
}

fn record(stack: &[String], text: String, out: &mut Extensions) {
    let names: Vec<&str> = stack.iter().map(String::as_str).collect();
    match names.as_slice() {
        [.., "metadata", "extensions", "changelog", "change", field] => {
            if let Some(change) = out.changelog.last_mut() {
                match *field {
                    "date" => change.date = text,
                    "note" => change.note = text,
                    _ => {}
                }
            }
        }
        [.., "metadata", "extensions", key] => {
            out.values.insert(key.to_string(), text);
        }
        _ => {}
    }
}
