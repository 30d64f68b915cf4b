use std::fmt::{self, Display};
use thiserror::Error as ThisError;

/// The link address every simulated hop sends to, asking the switch to
/// deliver the frame.
pub const BROADCAST_LINK: &str = "FF:FF:FF:FF:FF:FF";

/// A named endpoint with a network address and a link address.
///
/// Addresses are kept verbatim. A dotted network address and a
/// colon-separated link address are expected but not checked; only empty
/// values are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressIdentity {
    name: String,
    network: String,
    link: String,
}

impl AddressIdentity {
    /// Creates a new identity.
    pub fn new(
        name: impl Into<String>,
        network: impl Into<String>,
        link: impl Into<String>,
    ) -> Result<Self, AddressError> {
        let name = name.into();
        let network = network.into();
        let link = link.into();
        if name.is_empty() {
            Err(AddressError::EmptyName)?
        }
        if network.is_empty() {
            Err(AddressError::EmptyNetwork(name.clone()))?
        }
        if link.is_empty() {
            Err(AddressError::EmptyLink(name.clone()))?
        }
        Ok(Self {
            name,
            network,
            link,
        })
    }

    /// The endpoint's name, used as "from" and "to" on exchange events.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The network (IP) address.
    pub fn network(&self) -> &str {
        &self.network
    }

    /// The link (MAC) address.
    pub fn link(&self) -> &str {
        &self.link
    }
}

impl Display for AddressIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (IP: {}, MAC: {})", self.name, self.network, self.link)
    }
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("An endpoint name must not be empty")]
    EmptyName,
    #[error("Endpoint {0} has an empty network address")]
    EmptyNetwork(String),
    #[error("Endpoint {0} has an empty link address")]
    EmptyLink(String),
}
