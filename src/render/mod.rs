//! Template rendering
//!
//! Parses `{{.Name}}` templates and substitutes configuration values into
//! them, then writes the finished asset where the web server serves it.

pub mod output;
pub mod template;

pub use template::Template;

use crate::config::ValueMap;
use crate::error::RenderError;

/// Parse and render `template` in one step
pub fn render(template: &str, values: &ValueMap) -> Result<String, RenderError> {
    Template::parse(template)?.render(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::ConfigDocument;
    use crate::config::Value;
    use crate::constants::DEFAULT_TEMPLATE;
    use crate::error::SyntaxReason;

    #[test]
    fn test_render_examples() {
        let mut values = ValueMap::new();
        values.insert("isJuju".to_string(), Value::Bool(true));
        values.insert("analyticsEnabled".to_string(), Value::Bool(false));
        assert_eq!(
            render("x: {{.isJuju}}, y: {{.analyticsEnabled}}", &values).unwrap(),
            "x: true, y: false"
        );

        let mut values = ValueMap::new();
        values.insert("baseAppURL".to_string(), Value::from("/dashboard/"));
        assert_eq!(
            render(r#"baseAppURL: "{{.baseAppURL}}""#, &values).unwrap(),
            r#"baseAppURL: "/dashboard/""#
        );
    }

    #[test]
    fn test_render_propagates_syntax_errors() {
        match render("{{.open", &ValueMap::new()) {
            Err(RenderError::Syntax(err)) => assert_eq!(err.reason, SyntaxReason::Unterminated),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_value_never_renders_empty() {
        let result = render("isJuju: {{.isJuju}}", &ValueMap::new());
        assert!(matches!(result, Err(RenderError::MissingValue(_))));
    }

    #[test]
    fn test_default_template_with_default_document() {
        let out = render(DEFAULT_TEMPLATE, &ConfigDocument::default().to_values()).unwrap();

        assert!(!out.contains("{{"));
        assert!(out.contains("var jujuDashboardConfig = {"));
        assert!(out.contains("  baseControllerURL: null,\n"));
        assert!(out.contains("  controllerAPIEndpoint: null,\n"));
        assert!(out.contains("  baseAppURL: \"/\",\n"));
        assert!(out.contains("  identityProviderAvailable: false,\n"));
        assert!(out.contains("  identityProviderURL: null,\n"));
        assert!(out.contains("  isJuju: false,\n"));
        assert!(out.contains("  analyticsEnabled: false,\n"));
    }

    #[test]
    fn test_default_template_with_deployment_values() {
        let doc = ConfigDocument {
            controller_api_endpoint: Some("wss://10.0.0.1:17070/api".to_string()),
            base_app_url: "/dashboard/".to_string(),
            identity_provider_available: true,
            identity_provider_url: Some("https://candid.example/".to_string()),
            is_juju: true,
            analytics_enabled: true,
            ..Default::default()
        };
        let out = render(DEFAULT_TEMPLATE, &doc.to_values()).unwrap();

        assert!(out.contains("  baseControllerURL: \"wss://10.0.0.1:17070/api\",\n"));
        assert!(out.contains("  controllerAPIEndpoint: \"wss://10.0.0.1:17070/api\",\n"));
        assert!(out.contains("  baseAppURL: \"/dashboard/\",\n"));
        assert!(out.contains("  identityProviderURL: \"https://candid.example/\",\n"));
        assert!(out.contains("  isJuju: true,\n"));
        assert!(out.contains("  analyticsEnabled: true,\n"));
    }

    #[test]
    fn test_values_cannot_close_the_script_element() {
        let doc = ConfigDocument {
            base_app_url: "</script><script>alert(1)//".to_string(),
            ..Default::default()
        };
        let out = render(DEFAULT_TEMPLATE, &doc.to_values()).unwrap();
        assert!(!out.contains("</script"));
    }

    #[test]
    fn test_concurrent_renders_share_a_template() {
        let template = std::sync::Arc::new(Template::parse(DEFAULT_TEMPLATE).unwrap());
        let handles: Vec<_> = [true, false]
            .into_iter()
            .map(|is_juju| {
                let template = std::sync::Arc::clone(&template);
                std::thread::spawn(move || {
                    let doc = ConfigDocument {
                        is_juju,
                        ..Default::default()
                    };
                    (is_juju, template.render(&doc.to_values()).unwrap())
                })
            })
            .collect();

        for handle in handles {
            let (is_juju, out) = handle.join().unwrap();
            assert!(out.contains(&format!("  isJuju: {is_juju},\n")));
        }
    }
}
