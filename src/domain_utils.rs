/// Minimal domain hierarchy utilities shared by the link and sender analyzers.
pub struct DomainUtils;

impl DomainUtils {
    /// Extract the domain part of an email address, lowercased.
    pub fn extract_domain(address: &str) -> Option<String> {
        address
            .split('@')
            .nth(1)
            .filter(|d| !d.is_empty())
            .map(|s| s.trim().to_lowercase())
    }

    /// Check if a host equals, or is a subdomain of, any domain in the list.
    pub fn matches_domain_list(host: &str, domain_list: &[&str]) -> bool {
        let host_lower = host.to_lowercase();

        for pattern in domain_list {
            let pattern_lower = pattern.to_lowercase();

            if host_lower == pattern_lower {
                return true;
            }

            if host_lower.ends_with(&format!(".{pattern_lower}")) {
                return true;
            }
        }

        false
    }

    /// The base label of the registrable domain: "login.g00gle.com" -> "g00gle".
    /// Hosts without a dot return the whole string.
    pub fn base_label(host: &str) -> String {
        let host_lower = host.to_lowercase();
        let labels: Vec<&str> = host_lower.split('.').filter(|l| !l.is_empty()).collect();
        match labels.len() {
            0 => host_lower,
            1 => labels[0].to_string(),
            n => labels[n - 2].to_string(),
        }
    }

    /// The final dot-separated label, lowercased: "foo.bank-alert.xyz" -> "xyz".
    pub fn tld(host: &str) -> Option<String> {
        let host_lower = host.to_lowercase();
        let labels: Vec<&str> = host_lower.split('.').filter(|l| !l.is_empty()).collect();
        if labels.len() >= 2 {
            Some(labels.last()?.to_string())
        } else {
            None
        }
    }

    /// Number of subdomain labels before the registrable domain.
    /// "a.b.c.d.example.com" -> 4, "example.com" -> 0.
    pub fn subdomain_count(host: &str) -> usize {
        let labels = host.split('.').filter(|l| !l.is_empty()).count();
        labels.saturating_sub(2)
    }

    /// Canonicalize a host (lowercase, strip www prefix).
    pub fn canonicalize(host: &str) -> String {
        let host_lower = host.to_lowercase();
        if let Some(stripped) = host_lower.strip_prefix("www.") {
            stripped.to_string()
        } else {
            host_lower
        }
    }
}
