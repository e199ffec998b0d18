use serde_json::Value;

use crate::core::embed::{rating_color, Embed};
use crate::core::response::{Recommendations, SiteCheckResponse, Warnings};

/// Builds the chat embed for a successful SiteCheck response.
///
/// Field order: Ratings, Redirects, Running on, IP, Blacklists, Warnings.
/// Optional sections are only emitted when the API sent them.
pub fn build_embed(resp: &SiteCheckResponse) -> Embed {
    let site = resp.site.input.as_deref().unwrap_or("unknown");
    let total = resp.total_rating().unwrap_or("Unknown");

    let mut embed = Embed::rich(
        format!("Website scan: {}", site),
        format!("Rating: **{}**", total),
    );

    embed.push_field("Ratings", ratings_value(resp), true);

    if let Some(ref redirects) = resp.site.redirects_to {
        embed.push_field("Redirects", redirects.join("\n"), true);
    }

    embed.push_field("Running on", running_on_value(resp), true);
    embed.push_field("IP", resp.site.ip.join("\n"), true);

    if let Some(ref blacklists) = resp.blacklists {
        let value = blacklists
            .iter()
            .map(|b| format!("Blacklisted by {}. [Info]({})", b.vendor, b.info_url))
            .collect::<Vec<_>>()
            .join("\n");
        embed.push_field("Blacklists", value, false);
    }

    embed.color = rating_color(total);

    if resp.recommendations.is_some() || resp.warnings.is_some() {
        let value = warnings_value(resp.recommendations.as_ref(), resp.warnings.as_ref());
        if !value.is_empty() {
            embed.push_field("Warnings", value, false);
        }
    }

    embed
}

fn ratings_value(resp: &SiteCheckResponse) -> String {
    resp.category_ratings()
        .iter()
        .map(|(key, r)| {
            format!(
                "{} ({}): **{}**",
                rating_label(key),
                display_value(&r.passed),
                r.rating.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `tls` is an acronym; every other category just gets a capital letter.
fn rating_label(key: &str) -> String {
    if key == "tls" {
        return "TLS".to_string();
    }
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn running_on_value(resp: &SiteCheckResponse) -> String {
    let mut out = resp.site.running_on.join("\n");

    if resp.software.len() > 1 {
        out.push_str("\n\n**Additional software**:\n");
        for category in resp.software.keys().filter(|k| k.as_str() != "server") {
            let entries = resp
                .software_in(category)
                .iter()
                .map(|s| format!("{} {}", s.name, s.version.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("{}: {}\n", category.replace('_', " "), entries));
        }
    }

    out
}

fn tls_message(key: &str) -> Option<&'static str> {
    match key {
        "http_credit_card" => Some("Credit card input field detected on an unencrypted HTTP page."),
        "http_password" => Some("Password input field detected on an unencrypted HTTP page."),
        "no_https" => Some("HTTPS version of this website is not accessible"),
        "no_redirect_to_https" => Some("No redirect from HTTP to HTTPS found."),
        "mixed_content" => Some("HTTPS mixed content found."),
        "3des_cipher" => Some("Triple-DES cipher is vulnerable and insecure."),
        "tls_10" | "tls_11" => Some("TLS 1.0/1.1 are obsolete."),
        "sha1_intermediate" => Some("SHA-1 signature detected on an intermediate certificate."),
        _ => None,
    }
}

fn security_message(key: &str) -> Option<&'static str> {
    match key {
        "directory_listing_enabled" => {
            Some("Directory Listing is enabled. This can lead to information leakage.")
        }
        "git_visible" => {
            Some("Git directory is publicly accessible. This can lead to information leakage.")
        }
        "trace_method" => Some("HTTP Trace Method is allowed."),
        _ => None,
    }
}

fn warnings_value(recs: Option<&Recommendations>, warnings: Option<&Warnings>) -> String {
    let mut out = String::new();

    if let Some(tls) = recs.and_then(|r| r.tls_major.as_ref()) {
        out.push_str("**TLS**:\n");
        for msg in tls.keys().filter_map(|k| tls_message(k)) {
            out.push_str(&format!("- {}\n", msg));
        }
    }

    if let Some(security) = recs.and_then(|r| r.security_major.as_ref()) {
        out.push_str("**Security**:\n");
        for msg in security.keys().filter_map(|k| security_message(k)) {
            out.push_str(&format!("- {}\n", msg));
        }
    }

    if let Some(outdated) = warnings.and_then(|w| w.outdated.as_ref()) {
        let lines = outdated
            .iter()
            .map(|s| format!("- {} under {} ({})", s.name, s.safe_version, s.version))
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&format!("**Outdated**:\n{}\n", lines));
    }

    // Issues are comma-joined on one line, matching what the chat client has always shown.
    if let Some(issues) = warnings.and_then(|w| w.site_issues.as_ref()) {
        let joined = issues
            .iter()
            .map(|i| format!("- {} ({})", i.msg, i.location))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!("**Site Issues**:\n{}\n", joined));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::embed::{COLOR_BAD, COLOR_GOOD, COLOR_WARN};

    fn parse(json: &str) -> SiteCheckResponse {
        serde_json::from_str(json).unwrap()
    }

    const FULL_RESPONSE: &str = r#"{
        "site": {
            "input": "example.com",
            "redirects_to": ["https://example.com/"],
            "running_on": ["nginx"],
            "ip": ["93.184.216.34", "2606:2800:220:1::"]
        },
        "ratings": {
            "domain": {"passed": true, "rating": "A"},
            "security": {"passed": false, "rating": "C"},
            "tls": {"passed": true, "rating": "A"},
            "total": {"rating": "C"}
        },
        "software": {
            "server": [{"name": "nginx"}],
            "js_libraries": [{"name": "jquery", "version": "1.12.4"}, {"name": "bootstrap"}]
        },
        "blacklists": [{"vendor": "Google", "info_url": "https://safebrowsing.google.com"}],
        "recommendations": {
            "tls_major": {"no_redirect_to_https": {}, "tls_10": {}, "unknown_thing": {}},
            "security_major": {"git_visible": {}}
        },
        "warnings": {
            "outdated": [{"name": "jQuery", "version": "1.12.4", "safe_version": "3.5.0"}],
            "site_issues": [
                {"msg": "Injected spam", "location": "https://example.com/a"},
                {"msg": "Malware", "location": "https://example.com/b"}
            ]
        }
    }"#;

    #[test]
    fn test_full_report_fields_in_order() {
        let embed = build_embed(&parse(FULL_RESPONSE));

        assert_eq!(embed.title, "Website scan: example.com");
        assert_eq!(embed.description, "Rating: **C**");
        assert_eq!(embed.kind, "rich");
        assert_eq!(embed.color, Some(COLOR_WARN));

        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Ratings", "Redirects", "Running on", "IP", "Blacklists", "Warnings"]
        );
    }

    #[test]
    fn test_ratings_field() {
        let embed = build_embed(&parse(FULL_RESPONSE));
        let ratings = embed.field("Ratings").unwrap();
        assert!(ratings.inline);
        assert_eq!(
            ratings.value,
            "Domain (true): **A**\nSecurity (false): **C**\nTLS (true): **A**"
        );
    }

    #[test]
    fn test_running_on_lists_additional_software() {
        let embed = build_embed(&parse(FULL_RESPONSE));
        let running = embed.field("Running on").unwrap();
        assert_eq!(
            running.value,
            "nginx\n\n**Additional software**:\njs libraries: jquery 1.12.4, bootstrap \n"
        );
    }

    #[test]
    fn test_running_on_without_extra_software() {
        let embed = build_embed(&parse(
            r#"{"site": {"running_on": ["apache", "php"]}, "software": {"server": [{"name": "apache"}]}}"#,
        ));
        assert_eq!(embed.field("Running on").unwrap().value, "apache\nphp");
    }

    #[test]
    fn test_ip_and_blacklists() {
        let embed = build_embed(&parse(FULL_RESPONSE));
        assert_eq!(
            embed.field("IP").unwrap().value,
            "93.184.216.34\n2606:2800:220:1::"
        );

        let blacklists = embed.field("Blacklists").unwrap();
        assert!(!blacklists.inline);
        assert_eq!(
            blacklists.value,
            "Blacklisted by Google. [Info](https://safebrowsing.google.com)"
        );
    }

    #[test]
    fn test_warnings_field() {
        let embed = build_embed(&parse(FULL_RESPONSE));
        let warnings = embed.field("Warnings").unwrap();
        assert!(!warnings.inline);
        assert_eq!(
            warnings.value,
            "**TLS**:\n\
             - No redirect from HTTP to HTTPS found.\n\
             - TLS 1.0/1.1 are obsolete.\n\
             **Security**:\n\
             - Git directory is publicly accessible. This can lead to information leakage.\n\
             **Outdated**:\n\
             - jQuery under 3.5.0 (1.12.4)\n\
             **Site Issues**:\n\
             - Injected spam (https://example.com/a),- Malware (https://example.com/b)\n"
        );
    }

    #[test]
    fn test_empty_warning_groups_skip_field() {
        let embed = build_embed(&parse(r#"{"recommendations": {}, "warnings": {}}"#));
        assert!(embed.field("Warnings").is_none());
    }

    #[test]
    fn test_tls_header_kept_when_only_unknown_keys() {
        let embed = build_embed(&parse(r#"{"recommendations": {"tls_major": {"brand_new": {}}}}"#));
        assert_eq!(embed.field("Warnings").unwrap().value, "**TLS**:\n");
    }

    #[test]
    fn test_minimal_response_does_not_panic() {
        let embed = build_embed(&parse("{}"));
        assert_eq!(embed.title, "Website scan: unknown");
        assert_eq!(embed.description, "Rating: **Unknown**");
        assert_eq!(embed.color, None);

        let names: Vec<&str> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Ratings", "Running on", "IP"]);
        assert!(embed.fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_colors_follow_total_rating() {
        let good = build_embed(&parse(r#"{"ratings": {"total": {"rating": "B"}}}"#));
        assert_eq!(good.color, Some(COLOR_GOOD));

        let bad = build_embed(&parse(r#"{"ratings": {"total": {"rating": "E"}}}"#));
        assert_eq!(bad.color, Some(COLOR_BAD));
    }

    #[test]
    fn test_empty_redirect_list_still_shown() {
        let embed = build_embed(&parse(r#"{"site": {"redirects_to": []}}"#));
        assert_eq!(embed.field("Redirects").unwrap().value, "");
    }

    #[test]
    fn test_passed_renders_numbers_and_strings() {
        let embed = build_embed(&parse(
            r#"{"ratings": {
                "domain": {"passed": 3, "rating": "A"},
                "security": {"passed": "partial", "rating": "B"},
                "tls": {"rating": "C"}
            }}"#,
        ));
        assert_eq!(
            embed.field("Ratings").unwrap().value,
            "Domain (3): **A**\nSecurity (partial): **B**\nTLS (): **C**"
        );
    }

    #[test]
    fn test_null_values_still_produce_report() {
        let embed = build_embed(&parse(
            r#"{
                "site": {"input": "example.com", "ip": ["93.184.216.34", null]},
                "blacklists": [{"vendor": "Google", "info_url": null}],
                "warnings": {"outdated": [{"name": "jQuery", "version": null, "safe_version": "3.5.0"}]}
            }"#,
        ));

        assert_eq!(embed.title, "Website scan: example.com");
        assert_eq!(embed.field("IP").unwrap().value, "93.184.216.34");
        assert_eq!(
            embed.field("Blacklists").unwrap().value,
            "Blacklisted by Google. [Info]()"
        );
        assert_eq!(
            embed.field("Warnings").unwrap().value,
            "**Outdated**:\n- jQuery under 3.5.0 ()\n"
        );
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(rating_label("tls"), "TLS");
        assert_eq!(rating_label("security"), "Security");
        assert_eq!(rating_label(""), "");
    }
}
