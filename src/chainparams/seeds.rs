// Peer discovery seeds
// DNS seed hosts and fixed fallback addresses advertised by each network

use std::net::SocketAddr;

/// A DNS seed entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSeedData {
    pub name: &'static str,
    pub host: &'static str,
    /// Seed answers `x<services>.` subdomain queries
    pub supports_service_bits: bool,
}

impl DnsSeedData {
    pub const fn new(name: &'static str, host: &'static str, supports_service_bits: bool) -> Self {
        Self {
            name,
            host,
            supports_service_bits,
        }
    }

    /// Host name to query for peers offering `services`
    pub fn host_for_services(&self, services: u64) -> String {
        if self.supports_service_bits && services != 0 {
            format!("x{:x}.{}", services, self.host)
        } else {
            self.host.to_string()
        }
    }
}

/// Seeds consulted when the address manager is empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeds {
    pub dns: Vec<DnsSeedData>,
    pub fixed: Vec<SocketAddr>,
}

impl Seeds {
    pub fn is_empty(&self) -> bool {
        self.dns.is_empty() && self.fixed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_bit_host() {
        let seed = DnsSeedData::new("node01", "node01.myezcoin.com", true);
        assert_eq!(seed.host_for_services(9), "x9.node01.myezcoin.com");
        assert_eq!(seed.host_for_services(0), "node01.myezcoin.com");

        let plain = DnsSeedData::new("node01", "node01.myezcoin.com", false);
        assert_eq!(plain.host_for_services(9), "node01.myezcoin.com");
    }

    #[test]
    fn test_empty_seeds() {
        assert!(Seeds::default().is_empty());
    }
}
