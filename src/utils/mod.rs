/// Reduce a display name to a URL/name-safe slug: lowercase alphanumeric
/// runs joined by single hyphens. "Core Fabric (East)" -> "core-fabric-east"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Parse an IPv4 CIDR string into (network, broadcast, prefix_length).
/// The network address is masked down, so "10.0.0.5/24" yields the
/// 10.0.0.0 network.
pub fn parse_cidr(cidr: &str) -> Result<(u32, u32, u8), String> {
    let (addr_str, len_str) = cidr
        .split_once('/')
        .ok_or_else(|| format!("Invalid CIDR (missing /length): {}", cidr))?;

    let octets: Vec<&str> = addr_str.split('.').collect();
    if octets.len() != 4 {
        return Err(format!("Invalid IPv4 address in CIDR: {}", cidr));
    }
    let mut addr: u32 = 0;
    for octet in octets {
        let value: u8 = octet
            .parse()
            .map_err(|_| format!("Invalid IPv4 octet '{}' in CIDR: {}", octet, cidr))?;
        addr = (addr << 8) | value as u32;
    }

    let prefix_len: u8 = len_str
        .parse()
        .map_err(|_| format!("Invalid prefix length in CIDR: {}", cidr))?;
    if prefix_len > 32 {
        return Err(format!("Prefix length out of range in CIDR: {}", cidr));
    }

    let mask: u32 = if prefix_len == 0 {
        0
    } else {
        u32::MAX << (32 - prefix_len)
    };
    let network = addr & mask;
    let broadcast = network | !mask;
    Ok((network, broadcast, prefix_len))
}

/// Render a network address + prefix length back to canonical CIDR form.
pub fn format_cidr(network: u32, prefix_len: u8) -> String {
    format!(
        "{}.{}.{}.{}/{}",
        (network >> 24) & 0xff,
        (network >> 16) & 0xff,
        (network >> 8) & 0xff,
        network & 0xff,
        prefix_len
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Core Fabric"), "core-fabric");
        assert_eq!(slugify("Core Fabric (East)"), "core-fabric-east");
        assert_eq!(slugify("  DC--01  "), "dc-01");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_parse_cidr() {
        let (net, bcast, len) = parse_cidr("10.1.2.0/24").unwrap();
        assert_eq!(net, 0x0a010200);
        assert_eq!(bcast, 0x0a0102ff);
        assert_eq!(len, 24);
    }

    #[test]
    fn test_parse_cidr_masks_host_bits() {
        let (net, _, len) = parse_cidr("10.0.0.5/24").unwrap();
        assert_eq!(format_cidr(net, len), "10.0.0.0/24");
    }

    #[test]
    fn test_parse_cidr_rejects_garbage() {
        assert!(parse_cidr("10.0.0.0").is_err());
        assert!(parse_cidr("10.0.0/24").is_err());
        assert!(parse_cidr("10.0.0.256/24").is_err());
        assert!(parse_cidr("10.0.0.0/33").is_err());
    }

    #[test]
    fn test_format_cidr() {
        assert_eq!(format_cidr(0xc0a80100, 24), "192.168.1.0/24");
        assert_eq!(format_cidr(0, 0), "0.0.0.0/0");
    }
}
