use colored::Colorize;
use dashboard::Network;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a numbered list entry, 1-based
pub fn numbered(num: usize, msg: &str) {
    println!("  {} {}", format!("{num:>3}.").blue().bold(), msg);
}

/// One-line description of a network for listings
///
/// `Branch 1 (N1) [branch, west] · appliance, switch`; tags and product
/// types are left out when the network has none.
pub fn describe_network(network: &Network) -> String {
    let mut line = format!("{} ({})", network.name, network.id);
    if !network.tags.is_empty() {
        let tags: Vec<&str> = network.tags.iter().map(String::as_str).collect();
        line.push_str(&format!(" [{}]", tags.join(", ")));
    }
    if !network.product_types.is_empty() {
        line.push_str(&format!(" · {}", network.product_types.join(", ")));
    }
    line
}

/// `1 network`, `3 networks`
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_network_with_tags() {
        let net = Network::new("N1", "Branch 1", ["west", "branch"]);
        assert_eq!(describe_network(&net), "Branch 1 (N1) [branch, west]");
    }

    #[test]
    fn test_describe_network_without_tags() {
        let net = Network::new("N9", "Lab", Vec::<String>::new());
        assert_eq!(describe_network(&net), "Lab (N9)");
    }

    #[test]
    fn test_describe_network_with_product_types() {
        let mut net = Network::new("N2", "Branch 2", ["branch"]);
        net.product_types = vec!["appliance".to_string(), "switch".to_string()];
        assert_eq!(describe_network(&net), "Branch 2 (N2) [branch] · appliance, switch");

        net.tags.clear();
        assert_eq!(describe_network(&net), "Branch 2 (N2) · appliance, switch");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "network"), "0 networks");
        assert_eq!(plural(1, "network"), "1 network");
        assert_eq!(plural(2, "rule"), "2 rules");
    }
}
