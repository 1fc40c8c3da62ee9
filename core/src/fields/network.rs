use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// An IPv4 or IPv6 network. Host bits are masked off when parsing, so `10.0.0.5/28`
/// is accepted and normalised to `10.0.0.0/28`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    addr: IpAddr,
    prefix: u8,
}

impl IpNetwork {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let (addr_part, prefix_part) = match s.split_once('/') {
            Some((a, p)) => (a, Some(p)),
            None => (s, None),
        };

        let addr: IpAddr = addr_part
            .parse()
            .map_err(|_| format!("'{}' does not appear to be an IPv4 or IPv6 network", s))?;
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        let prefix = match prefix_part {
            Some(p) => p
                .parse::<u8>()
                .ok()
                .filter(|p| *p <= max)
                .ok_or_else(|| format!("'{}' is not a valid netmask", p))?,
            None => max,
        };

        Ok(Self {
            addr: mask(addr, prefix),
            prefix,
        })
    }

    pub fn network_address(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix
    }

    /// Saturates at `u128::MAX` for `::/0`.
    pub fn num_addresses(&self) -> u128 {
        let host_bits = u32::from(self.max_prefix() - self.prefix);
        1u128.checked_shl(host_bits).unwrap_or(u128::MAX)
    }

    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask(ip, self.prefix) == self.addr
            }
            _ => false,
        }
    }

    fn max_prefix(&self) -> u8 {
        match self.addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        }
    }
}

fn mask(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let m = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(bits & m))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let m = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(bits & m))
        }
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefix == self.max_prefix() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{}/{}", self.addr, self.prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_host_bits_is_not_strict() {
        let net = IpNetwork::parse("10.0.0.3/28").unwrap();
        assert_eq!(net.num_addresses(), 16);
        assert_eq!(net.to_string(), "10.0.0.0/28");
    }

    #[test]
    fn single_address_has_one_entry() {
        let net = IpNetwork::parse("10.0.0.6").unwrap();
        assert_eq!(net.num_addresses(), 1);
        assert_eq!(net.to_string(), "10.0.0.6");
    }

    #[test]
    fn rejects_garbage() {
        assert!(IpNetwork::parse("10.0.0.X").is_err());
        assert!(IpNetwork::parse("10.0.0.0/33").is_err());
    }

    #[test]
    fn ipv6_and_contains() {
        let net = IpNetwork::parse("2001:db8::/32").unwrap();
        assert!(net.contains("2001:db8::1".parse().unwrap()));
        assert!(!net.contains("10.0.0.1".parse().unwrap()));
        assert_eq!(IpNetwork::parse("::/0").unwrap().num_addresses(), u128::MAX);
    }
}
