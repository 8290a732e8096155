//! Static website hosting codec.
//!
//! `redirect_all_requests_to` is declared as a single string. A scheme prefix
//! (`http://` or `https://`) becomes the redirect protocol on the wire.

use ruststack_bucket_model::resource::{
    RoutingRuleConditionConfig, RoutingRuleConfig, RoutingRuleRedirectConfig, WebsiteConfig,
};
use ruststack_bucket_model::types::{
    Condition, ErrorDocument, IndexDocument, Protocol, Redirect, RedirectAllRequestsTo,
    RoutingRule, WebsiteConfiguration,
};

/// Split `https://host` into protocol and host name.
fn parse_redirect_target(target: &str) -> RedirectAllRequestsTo {
    for protocol in [Protocol::Https, Protocol::Http] {
        let scheme = format!("{}://", protocol.as_str());
        if let Some(host) = target.strip_prefix(&scheme) {
            return RedirectAllRequestsTo {
                host_name: host.to_owned(),
                protocol: Some(protocol),
            };
        }
    }
    RedirectAllRequestsTo {
        host_name: target.to_owned(),
        protocol: None,
    }
}

fn format_redirect_target(redirect: &RedirectAllRequestsTo) -> String {
    match redirect.protocol {
        Some(protocol) => format!("{protocol}://{}", redirect.host_name),
        None => redirect.host_name.clone(),
    }
}

/// Expand a declared website configuration.
#[must_use]
pub fn expand_website(website: &WebsiteConfig) -> WebsiteConfiguration {
    WebsiteConfiguration {
        error_document: website.error_document.as_ref().map(|key| ErrorDocument {
            key: key.clone(),
        }),
        index_document: website
            .index_document
            .as_ref()
            .map(|suffix| IndexDocument {
                suffix: suffix.clone(),
            }),
        redirect_all_requests_to: website
            .redirect_all_requests_to
            .as_deref()
            .map(parse_redirect_target),
        routing_rules: website
            .routing_rules
            .iter()
            .map(|rule| RoutingRule {
                condition: rule.condition.as_ref().map(|c| Condition {
                    http_error_code_returned_equals: c.http_error_code_returned_equals.clone(),
                    key_prefix_equals: c.key_prefix_equals.clone(),
                }),
                redirect: Redirect {
                    host_name: rule.redirect.host_name.clone(),
                    http_redirect_code: rule.redirect.http_redirect_code.clone(),
                    protocol: rule.redirect.protocol,
                    replace_key_prefix_with: rule.redirect.replace_key_prefix_with.clone(),
                    replace_key_with: rule.redirect.replace_key_with.clone(),
                },
            })
            .collect(),
    }
}

/// Flatten a stored website configuration.
#[must_use]
pub fn flatten_website(website: &WebsiteConfiguration) -> WebsiteConfig {
    WebsiteConfig {
        index_document: website.index_document.as_ref().map(|d| d.suffix.clone()),
        error_document: website.error_document.as_ref().map(|d| d.key.clone()),
        redirect_all_requests_to: website
            .redirect_all_requests_to
            .as_ref()
            .map(format_redirect_target),
        routing_rules: website
            .routing_rules
            .iter()
            .map(|rule| RoutingRuleConfig {
                condition: rule.condition.as_ref().map(|c| RoutingRuleConditionConfig {
                    http_error_code_returned_equals: c.http_error_code_returned_equals.clone(),
                    key_prefix_equals: c.key_prefix_equals.clone(),
                }),
                redirect: RoutingRuleRedirectConfig {
                    host_name: rule.redirect.host_name.clone(),
                    http_redirect_code: rule.redirect.http_redirect_code.clone(),
                    protocol: rule.redirect.protocol,
                    replace_key_prefix_with: rule.redirect.replace_key_prefix_with.clone(),
                    replace_key_with: rule.redirect.replace_key_with.clone(),
                },
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_split_redirect_scheme() {
        let expanded = expand_website(&WebsiteConfig {
            redirect_all_requests_to: Some("https://example.com".to_owned()),
            ..WebsiteConfig::default()
        });
        let redirect = expanded.redirect_all_requests_to.expect("redirect");
        assert_eq!(redirect.host_name, "example.com");
        assert_eq!(redirect.protocol, Some(Protocol::Https));
    }

    #[test]
    fn test_should_keep_bare_redirect_host() {
        let website = WebsiteConfig {
            redirect_all_requests_to: Some("example.com".to_owned()),
            ..WebsiteConfig::default()
        };
        let expanded = expand_website(&website);
        assert_eq!(
            expanded.redirect_all_requests_to.as_ref().map(|r| r.protocol),
            Some(None)
        );
        assert_eq!(flatten_website(&expanded), website);
    }

    #[test]
    fn test_should_round_trip_routing_rules() {
        let website = WebsiteConfig {
            index_document: Some("index.html".to_owned()),
            error_document: Some("error.html".to_owned()),
            redirect_all_requests_to: None,
            routing_rules: vec![RoutingRuleConfig {
                condition: Some(RoutingRuleConditionConfig {
                    key_prefix_equals: Some("docs/".to_owned()),
                    ..RoutingRuleConditionConfig::default()
                }),
                redirect: RoutingRuleRedirectConfig {
                    replace_key_prefix_with: Some("documents/".to_owned()),
                    protocol: Some(Protocol::Https),
                    ..RoutingRuleRedirectConfig::default()
                },
            }],
        };
        assert_eq!(flatten_website(&expand_website(&website)), website);
    }
}
