//! Stripe-style parameter encoding.

use paytrace_core::{ParamValue, Params};
use std::path::PathBuf;

/// A leaf of a flattened parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatParam {
    Text(String),
    File(PathBuf),
}

impl FlatParam {
    /// Text form used in query strings and url-encoded bodies.
    ///
    /// Files render as their path; they're only uploaded in multipart bodies.
    pub fn as_text(&self) -> String {
        match self {
            FlatParam::Text(text) => text.clone(),
            FlatParam::File(path) => path.display().to_string(),
        }
    }
}

/// Flatten nested params into bracketed keys.
///
/// Maps nest as `parent[child]`, lists as `parent[index]`. `Null` becomes an
/// empty string, which Stripe reads as "unset".
pub fn flatten_params(params: &Params) -> Vec<(String, FlatParam)> {
    let mut out = Vec::new();
    for (key, value) in params {
        flatten_into(key.clone(), value, &mut out);
    }
    out
}

fn flatten_into(key: String, value: &ParamValue, out: &mut Vec<(String, FlatParam)>) {
    match value {
        ParamValue::Null => out.push((key, FlatParam::Text(String::new()))),
        ParamValue::Bool(b) => out.push((key, FlatParam::Text(b.to_string()))),
        ParamValue::Integer(i) => out.push((key, FlatParam::Text(i.to_string()))),
        ParamValue::Unsigned(u) => out.push((key, FlatParam::Text(u.to_string()))),
        ParamValue::Float(f) => out.push((key, FlatParam::Text(f.to_string()))),
        ParamValue::String(s) => out.push((key, FlatParam::Text(s.clone()))),
        ParamValue::File(path) => out.push((key, FlatParam::File(path.clone()))),
        ParamValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(format!("{}[{}]", key, index), item, out);
            }
        }
        ParamValue::Map(map) => {
            for (child, item) in map {
                flatten_into(format!("{}[{}]", key, child), item, out);
            }
        }
    }
}

/// Text pairs for query strings.
pub fn text_pairs(flat: &[(String, FlatParam)]) -> Vec<(String, String)> {
    flat.iter()
        .map(|(key, value)| (key.clone(), value.as_text()))
        .collect()
}

/// `application/x-www-form-urlencoded` body for `params`.
pub fn form_body(params: &Params) -> String {
    let flat = flatten_params(params);
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(text_pairs(&flat))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params(json: &str) -> Params {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_flat_params_keep_key_order() {
        let p = params(r#"{"currency": "usd", "amount": 2000, "capture": true}"#);
        assert_eq!(form_body(&p), "amount=2000&capture=true&currency=usd");
    }

    #[test]
    fn test_nested_maps_and_lists() {
        let p = params(
            r#"{"metadata": {"order_id": "6735"}, "expand": ["customer", "invoice"],
                "items": [{"price": "price_1", "quantity": 2}]}"#,
        );

        let flat: Vec<(String, String)> = text_pairs(&flatten_params(&p));
        assert_eq!(
            flat,
            vec![
                ("expand[0]".to_string(), "customer".to_string()),
                ("expand[1]".to_string(), "invoice".to_string()),
                ("items[0][price]".to_string(), "price_1".to_string()),
                ("items[0][quantity]".to_string(), "2".to_string()),
                ("metadata[order_id]".to_string(), "6735".to_string()),
            ]
        );
    }

    #[test]
    fn test_null_unsets_and_brackets_are_escaped() {
        let p = params(r#"{"description": null, "metadata": {"note": "a b&c"}}"#);
        assert_eq!(
            form_body(&p),
            "description=&metadata%5Bnote%5D=a+b%26c"
        );
    }

    #[test]
    fn test_large_integers_are_exact() {
        let p = params(r#"{"amount": 18446744073709551615}"#);
        assert_eq!(form_body(&p), "amount=18446744073709551615");
    }

    #[test]
    fn test_files_stay_files() {
        let mut p = Params::new();
        p.insert("file".to_string(), ParamValue::File("/tmp/id.png".into()));
        p.insert("purpose".to_string(), ParamValue::from("identity_document"));

        let flat = flatten_params(&p);
        assert_eq!(flat[0], ("file".to_string(), FlatParam::File("/tmp/id.png".into())));
        assert_eq!(flat[0].1.as_text(), "/tmp/id.png");
    }
}
