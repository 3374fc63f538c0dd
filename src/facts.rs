use crate::Error;
use delegate::delegate;
use std::collections::HashMap;
use std::fmt;

pub const INTERFACE: &str = "interface";
pub const REASON: &str = "reason";
pub const OLD_IP_ADDRESS: &str = "old_ip_address";
pub const NEW_IP_ADDRESS: &str = "new_ip_address";
pub const OLD_SUBNET_MASK: &str = "old_subnet_mask";
pub const NEW_SUBNET_MASK: &str = "new_subnet_mask";
pub const NEW_INTERFACE_MTU: &str = "new_interface_mtu";

/// Lease event reported by the DHCP client.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Reason {
    Preinit,
    Bound,
    Renew,
    Rebind,
    Reboot,
    Expire,
    Fail,
    Release,
    Stop,
    Timeout,
    Other(String),
}

impl From<&str> for Reason {
    fn from(s: &str) -> Self {
        match s {
            "PREINIT" => Reason::Preinit,
            "BOUND" => Reason::Bound,
            "RENEW" => Reason::Renew,
            "REBIND" => Reason::Rebind,
            "REBOOT" => Reason::Reboot,
            "EXPIRE" => Reason::Expire,
            "FAIL" => Reason::Fail,
            "RELEASE" => Reason::Release,
            "STOP" => Reason::Stop,
            "TIMEOUT" => Reason::Timeout,
            other => Reason::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reason::Preinit => "PREINIT",
            Reason::Bound => "BOUND",
            Reason::Renew => "RENEW",
            Reason::Rebind => "REBIND",
            Reason::Reboot => "REBOOT",
            Reason::Expire => "EXPIRE",
            Reason::Fail => "FAIL",
            Reason::Release => "RELEASE",
            Reason::Stop => "STOP",
            Reason::Timeout => "TIMEOUT",
            Reason::Other(other) => other,
        })
    }
}

/// Named string facts describing one lease event.
///
/// `interface` and `reason` are required. Every other key reads as an empty
/// string when absent.
#[derive(Clone, Debug)]
pub struct FactSet(HashMap<String, String>);

impl FactSet {
    pub fn new<I, K, V>(facts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let facts = Self(
            facts
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        for key in [INTERFACE, REASON] {
            if !facts.contains_key(key) {
                return Err(Error::MissingFact(key));
            }
        }
        Ok(facts)
    }

    delegate! {
        to self.0 {
            pub fn len(&self) -> usize;
            fn contains_key(&self, key: &str) -> bool;
        }
    }

    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn interface(&self) -> &str {
        self.get(INTERFACE)
    }

    pub fn reason(&self) -> Reason {
        Reason::from(self.get(REASON))
    }

    pub fn old_ip_address(&self) -> &str {
        self.get(OLD_IP_ADDRESS)
    }

    pub fn new_ip_address(&self) -> &str {
        self.get(NEW_IP_ADDRESS)
    }

    pub fn old_subnet_mask(&self) -> &str {
        self.get(OLD_SUBNET_MASK)
    }

    pub fn new_subnet_mask(&self) -> &str {
        self.get(NEW_SUBNET_MASK)
    }

    pub fn new_interface_mtu(&self) -> &str {
        self.get(NEW_INTERFACE_MTU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_facts_read_as_empty() {
        let facts = FactSet::new([(INTERFACE, "eth0"), (REASON, "BOUND")]).unwrap();
        assert_eq!(facts.interface(), "eth0");
        assert_eq!(facts.reason(), Reason::Bound);
        assert_eq!(facts.old_ip_address(), "");
        assert_eq!(facts.new_interface_mtu(), "");
        assert_eq!(facts.len(), 2);
    }

    #[test]
    fn required_facts() {
        assert!(matches!(
            FactSet::new([(REASON, "BOUND")]),
            Err(Error::MissingFact(INTERFACE))
        ));
        assert!(matches!(
            FactSet::new([(INTERFACE, "eth0")]),
            Err(Error::MissingFact(REASON))
        ));
        // An empty reason is present, just unhandled.
        let facts = FactSet::new([(INTERFACE, "eth0"), (REASON, "")]).unwrap();
        assert_eq!(facts.reason(), Reason::Other(String::new()));
    }

    #[test]
    fn reason_parsing_is_exact() {
        for reason in [
            "PREINIT", "BOUND", "RENEW", "REBIND", "REBOOT", "EXPIRE", "FAIL", "RELEASE", "STOP",
            "TIMEOUT",
        ] {
            let parsed = Reason::from(reason);
            assert!(!matches!(parsed, Reason::Other(_)), "{reason}");
            assert_eq!(parsed.to_string(), reason);
        }
        assert_eq!(Reason::from("bound"), Reason::Other("bound".into()));
        assert_eq!(Reason::from("BOUND6"), Reason::Other("BOUND6".into()));
    }
}
