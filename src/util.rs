use std::net::Ipv4Addr;

/// `Some(true)` for 10/8, 172.16/12 and 192.168/16, `None` when `ip` is not IPv4.
pub fn private_ipv4(ip: &str) -> Option<bool> {
    ip.trim().parse::<Ipv4Addr>().ok().map(|addr| addr.is_private())
}

pub fn annotated_label(ip: &str, ip_type: Option<&str>) -> String {
    match ip_type {
        Some(ip_type) => format!("{ip} ({ip_type})"),
        None => ip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_blocks() {
        assert_eq!(private_ipv4("10.0.0.1"), Some(true));
        assert_eq!(private_ipv4("172.16.4.2"), Some(true));
        assert_eq!(private_ipv4("172.31.255.255"), Some(true));
        assert_eq!(private_ipv4("172.32.0.1"), Some(false));
        assert_eq!(private_ipv4("192.168.65.137"), Some(true));
        assert_eq!(private_ipv4("8.8.8.8"), Some(false));
        assert_eq!(private_ipv4("fe80::1"), None);
        assert_eq!(private_ipv4("host-a"), None);
    }

    #[test]
    fn label_annotation() {
        assert_eq!(annotated_label("1.2.3.4", Some("external")), "1.2.3.4 (external)");
        assert_eq!(annotated_label("1.2.3.4", None), "1.2.3.4");
    }
}
