//! Attribute dependency resolver
//!
//! An attribute with a `(depends_on, depends_value)` pair is shown only while
//! the configuration holds exactly `depends_value` under `depends_on`. A list
//! value never equals a scalar, so a multi-select source never reveals a
//! dependent attribute. Hidden attributes keep their stored values.

use shared::models::{Configuration, ConfigurationAttribute};

/// Whether `attribute` is shown for `config`
pub fn is_visible(attribute: &ConfigurationAttribute, config: &Configuration) -> bool {
    match attribute.dependency() {
        None => true,
        Some((depends_on, depends_value)) => config
            .get(depends_on)
            .is_some_and(|value| value.equals_text(depends_value)),
    }
}

/// Active, visible attributes ordered by `order_index`
pub fn visible_attributes<'a>(
    attributes: &'a [ConfigurationAttribute],
    config: &Configuration,
) -> Vec<&'a ConfigurationAttribute> {
    let mut visible: Vec<&ConfigurationAttribute> = attributes
        .iter()
        .filter(|attribute| attribute.is_active && is_visible(attribute, config))
        .collect();
    visible.sort_by_key(|attribute| attribute.order_index);
    visible
}

/// Visible required attributes that have no value yet
pub fn missing_required<'a>(
    attributes: &'a [ConfigurationAttribute],
    config: &Configuration,
) -> Vec<&'a ConfigurationAttribute> {
    visible_attributes(attributes, config)
        .into_iter()
        .filter(|attribute| attribute.required && !config.is_present(&attribute.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AttributeType;

    fn attribute(
        name: &str,
        order: i32,
        dependency: Option<(&str, &str)>,
    ) -> ConfigurationAttribute {
        ConfigurationAttribute {
            id: format!("id-{}", name),
            category_id: "sofa".to_string(),
            name: name.to_string(),
            label: name.to_string(),
            attribute_type: AttributeType::Select,
            required: true,
            depends_on: dependency.map(|(on, _)| on.to_string()),
            depends_value: dependency.map(|(_, value)| value.to_string()),
            order_index: order,
            is_active: true,
        }
    }

    #[test]
    fn test_independent_attribute_always_visible() {
        let attr = attribute("seats", 1, None);
        assert!(is_visible(&attr, &Configuration::new()));

        let mut config = Configuration::new();
        config.set("seats", "2 (Two) seats");
        assert!(is_visible(&attr, &config));
    }

    #[test]
    fn test_dependency_requires_exact_value() {
        let attr = attribute("loungerLength", 2, Some(("needsLounger", "Yes")));
        let mut config = Configuration::new();
        assert!(!is_visible(&attr, &config));

        config.set("needsLounger", "No");
        assert!(!is_visible(&attr, &config));

        config.set("needsLounger", "yes");
        assert!(!is_visible(&attr, &config));

        config.set("needsLounger", "Yes");
        assert!(is_visible(&attr, &config));
    }

    #[test]
    fn test_list_source_never_matches() {
        let attr = attribute("cushionFill", 2, Some(("accessories", "Cushion")));
        let mut config = Configuration::new();
        config.set("accessories", vec!["Cushion".to_string()]);
        assert!(!is_visible(&attr, &config));
    }

    #[test]
    fn test_half_dependency_is_ignored() {
        let mut attr = attribute("loungerLength", 2, Some(("needsLounger", "Yes")));
        attr.depends_value = Some(String::new());
        assert!(is_visible(&attr, &Configuration::new()));
    }

    #[test]
    fn test_visible_sorted_and_missing() {
        let attributes = vec![
            attribute("loungerLength", 3, Some(("needsLounger", "Yes"))),
            attribute("needsLounger", 2, None),
            attribute("seats", 1, None),
        ];
        let mut config = Configuration::new();
        config.set("needsLounger", "Yes");

        let names: Vec<&str> = visible_attributes(&attributes, &config)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["seats", "needsLounger", "loungerLength"]);

        let missing: Vec<&str> = missing_required(&attributes, &config)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(missing, vec!["seats", "loungerLength"]);

        config.set("needsLounger", "No");
        assert_eq!(missing_required(&attributes, &config).len(), 1);
    }
}
