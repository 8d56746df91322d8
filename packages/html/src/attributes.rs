//! Attribute name normalization.
//!
//! Builders accept Rust-flavored underscore names and translate them to the
//! DOM convention: `class_name` becomes `className`, `aria_label` becomes
//! `aria-label`, `data_*` and `aria_*` are dashed, everything else with an
//! underscore is camelCased. Style maps are camelCased recursively.
//! Normalization is idempotent: already-normalized names pass through
//! untouched.

use lattice_core::AttributeValue;
use std::collections::BTreeMap;

/// Translate one attribute name to its DOM spelling.
pub fn normalize_attribute_name(name: &str) -> String {
    if let Some(rest) = name.strip_prefix("data_") {
        format!("data-{}", rest.replace('_', "-"))
    } else if let Some(rest) = name.strip_prefix("aria_") {
        format!("aria-{}", rest.replace('_', "-"))
    } else {
        snake_to_camel(name)
    }
}

/// Translate a `style` value: mapping keys are camelCased recursively, both
/// from `background_color` and from the CSS spelling `background-color`.
pub fn normalize_style_value(value: AttributeValue) -> AttributeValue {
    match value {
        AttributeValue::Map(map) => AttributeValue::Map(
            map.into_iter()
                .map(|(key, value)| (css_to_camel(&key), normalize_style_value(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Normalize a whole attribute mapping.
pub fn normalize_attributes(
    attributes: BTreeMap<String, AttributeValue>,
) -> BTreeMap<String, AttributeValue> {
    attributes
        .into_iter()
        .map(|(name, value)| {
            let name = normalize_attribute_name(&name);
            let value = if name == "style" {
                normalize_style_value(value)
            } else {
                value
            };
            (name, value)
        })
        .collect()
}

fn snake_to_camel(name: &str) -> String {
    if !name.contains('_') {
        return name.to_string();
    }
    let mut parts = name.split('_').filter(|part| !part.is_empty());
    let mut out = String::with_capacity(name.len());
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

fn css_to_camel(name: &str) -> String {
    snake_to_camel(&name.replace('-', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underscore_names_become_camel_case() {
        assert_eq!(normalize_attribute_name("class_name"), "className");
        assert_eq!(normalize_attribute_name("tab_index"), "tabIndex");
        assert_eq!(normalize_attribute_name("http_equiv"), "httpEquiv");
        assert_eq!(normalize_attribute_name("value"), "value");
    }

    #[test]
    fn data_and_aria_names_are_dashed() {
        assert_eq!(normalize_attribute_name("aria_label"), "aria-label");
        assert_eq!(normalize_attribute_name("data_test_id"), "data-test-id");
        assert_eq!(normalize_attribute_name("aria_labelled_by"), "aria-labelled-by");
    }

    #[test]
    fn style_keys_camel_case_from_both_spellings() {
        let mut map = BTreeMap::new();
        map.insert("background_color".to_string(), AttributeValue::from("tan"));
        map.insert("border-top-width".to_string(), AttributeValue::from("1px"));
        let normalized = normalize_style_value(AttributeValue::Map(map));

        let AttributeValue::Map(keys) = normalized else {
            panic!("style stayed a map");
        };
        assert!(keys.contains_key("backgroundColor"));
        assert!(keys.contains_key("borderTopWidth"));
    }
}
