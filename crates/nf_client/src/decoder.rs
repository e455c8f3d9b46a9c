//! Turns API response bodies into domain records.
//!
//! Every response shares the envelope `{"response": {"results": [...]}}`.
//! Required fields are read with `required_str`, which aborts the whole
//! decode when a field is missing or not a string. Optional fields go through
//! `optional_str` / `optional_array` and simply come back as `None`.

use nf_core::{Article, Contributor, Error, Result, Section};
use serde_json::{Map, Value};

type Object = Map<String, Value>;

const RESPONSE: &str = "response";
const RESULTS: &str = "results";

const ID: &str = "id";
const WEB_TITLE: &str = "webTitle";
const SECTION_NAME: &str = "sectionName";
const WEB_PUBLICATION_DATE: &str = "webPublicationDate";
const WEB_URL: &str = "webUrl";
const TAGS: &str = "tags";
const FIRST_NAME: &str = "firstName";
const LAST_NAME: &str = "lastName";

/// Decode a `/sections` response. Empty input yields no sections.
pub fn decode_sections(raw: &str) -> Result<Vec<Section>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root = parse(raw)?;
    results(&root)?
        .iter()
        .enumerate()
        .map(|(i, result)| -> Result<Section> {
            let result = as_object(result, &format!("{}.{}[{}]", RESPONSE, RESULTS, i))?;
            Ok(Section {
                id: required_str(result, ID)?.to_string(),
                title: required_str(result, WEB_TITLE)?.to_string(),
            })
        })
        .collect()
}

/// Decode an article listing. Empty input yields no articles.
pub fn decode_articles(raw: &str) -> Result<Vec<Article>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root = parse(raw)?;
    results(&root)?
        .iter()
        .enumerate()
        .map(|(i, result)| -> Result<Article> {
            let result = as_object(result, &format!("{}.{}[{}]", RESPONSE, RESULTS, i))?;
            decode_article(result)
        })
        .collect()
}

fn decode_article(result: &Object) -> Result<Article> {
    let section_name = required_str(result, SECTION_NAME)?.to_string();
    let published_at = required_str(result, WEB_PUBLICATION_DATE)?.to_string();
    let title = required_str(result, WEB_TITLE)?.to_string();
    let url = required_str(result, WEB_URL)?.to_string();

    let mut contributors = Vec::new();
    if let Some(tags) = optional_array(result, TAGS) {
        for (i, tag) in tags.iter().enumerate() {
            let tag = as_object(tag, &format!("{}[{}]", TAGS, i))?;
            let first = optional_str(tag, FIRST_NAME);
            let last = optional_str(tag, LAST_NAME);
            if let (Some(first), Some(last)) = (first, last) {
                contributors.push(Contributor::new(first, last));
            }
        }
    }

    Ok(Article {
        section_name,
        published_at,
        title,
        url,
        contributors,
    })
}

fn parse(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| Error::Decode(format!("Invalid JSON: {}", e)))
}

/// Walk root -> `response` -> `results`.
fn results(root: &Value) -> Result<&Vec<Value>> {
    let root = as_object(root, "root")?;
    let response = root
        .get(RESPONSE)
        .ok_or_else(|| missing(RESPONSE))
        .and_then(|v| as_object(v, RESPONSE))?;
    response
        .get(RESULTS)
        .ok_or_else(|| missing(&format!("{}.{}", RESPONSE, RESULTS)))?
        .as_array()
        .ok_or_else(|| Error::Decode(format!("'{}.{}' is not an array", RESPONSE, RESULTS)))
}

fn required_str<'a>(object: &'a Object, field: &str) -> Result<&'a str> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(Error::Decode(format!("Field '{}' is not a string", field))),
        None => Err(missing(field)),
    }
}

fn optional_str<'a>(object: &'a Object, field: &str) -> Option<&'a str> {
    object.get(field).and_then(Value::as_str)
}

fn optional_array<'a>(object: &'a Object, field: &str) -> Option<&'a Vec<Value>> {
    object.get(field).and_then(Value::as_array)
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object> {
    value
        .as_object()
        .ok_or_else(|| Error::Decode(format!("'{}' is not an object", path)))
}

fn missing(field: &str) -> Error {
    Error::Decode(format!("Missing required field '{}'", field))
}
