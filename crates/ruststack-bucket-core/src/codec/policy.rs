//! Bucket policy codec.
//!
//! Policies are JSON documents. The remote side may reformat a stored policy,
//! so documents are compared in a normalized form: parsed and re-serialized
//! with sorted object keys and no insignificant whitespace.

/// Normalize a policy document.
///
/// An empty (or all-whitespace) document normalizes to the empty string.
///
/// # Errors
///
/// Returns the JSON parse error if the document is not valid JSON.
pub fn normalize_policy(document: &str) -> Result<String, serde_json::Error> {
    let trimmed = document.trim();
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    // serde_json::Map is ordered by key without the preserve_order feature.
    let value: serde_json::Value = serde_json::from_str(trimmed)?;
    serde_json::to_string(&value)
}

/// Expand a declared policy into the document sent on PUT.
///
/// # Errors
///
/// Returns the JSON parse error if the document is not valid JSON.
pub fn expand_policy(document: &str) -> Result<String, serde_json::Error> {
    normalize_policy(document)
}

/// Flatten a stored policy. Documents that do not parse are kept verbatim.
#[must_use]
pub fn flatten_policy(document: &str) -> String {
    normalize_policy(document).unwrap_or_else(|_| document.to_owned())
}

/// Whether two policy documents are semantically equal.
#[must_use]
pub fn policies_equivalent(a: &str, b: &str) -> bool {
    match (normalize_policy(a), normalize_policy(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.trim() == b.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: &str = r#"{
        "Version": "2012-10-17",
        "Statement": [{"Effect": "Allow", "Principal": "*", "Action": "s3:GetObject",
                       "Resource": "arn:aws:s3:::b1/*"}]
    }"#;

    #[test]
    fn test_should_ignore_whitespace_and_key_order() {
        let reordered = r#"{"Statement":[{"Resource":"arn:aws:s3:::b1/*","Action":"s3:GetObject","Principal":"*","Effect":"Allow"}],"Version":"2012-10-17"}"#;
        assert!(policies_equivalent(POLICY, reordered));
        assert!(!policies_equivalent(POLICY, "{}"));
    }

    #[test]
    fn test_should_round_trip_policy() {
        let expanded = expand_policy(POLICY).expect("valid policy");
        assert_eq!(flatten_policy(&expanded), expanded);
        assert!(policies_equivalent(&flatten_policy(&expanded), POLICY));
    }

    #[test]
    fn test_should_treat_blank_policy_as_empty() {
        assert_eq!(normalize_policy("  \n").expect("blank"), "");
    }

    #[test]
    fn test_should_reject_invalid_json() {
        assert!(expand_policy("{not json").is_err());
        assert_eq!(flatten_policy("{not json"), "{not json");
    }
}
