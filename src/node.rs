//! Sources of the 48-bit node identifier.

/// A trait that defines the interface to resolve the 48-bit node identifier of a new generator.
///
/// The source is consulted only when a generator cannot reuse the node identifier stored in its
/// state file, i.e. on first creation of the file or when persistence is disabled.
pub trait NodeIdSource {
    /// Returns the node identifier, or `None` if it is unavailable. Only the lower 48 bits of the
    /// returned value are used.
    fn resolve(&mut self) -> Option<u64>;
}

/// A node source that always returns a predetermined value.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct FixedNode(/** The node identifier. */ pub u64);

impl NodeIdSource for FixedNode {
    fn resolve(&mut self) -> Option<u64> {
        Some(self.0 & MAX_NODE)
    }
}

/// A node source that never resolves, for generators that must reuse a persisted identifier.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct NoNode;

impl NodeIdSource for NoNode {
    fn resolve(&mut self) -> Option<u64> {
        None
    }
}

/// A node source that reads the MAC address of a network interface of this host.
#[cfg(feature = "mac_address")]
#[cfg_attr(docsrs, doc(cfg(feature = "mac_address")))]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct HardwareNode;

#[cfg(feature = "mac_address")]
impl NodeIdSource for HardwareNode {
    fn resolve(&mut self) -> Option<u64> {
        match mac_address::get_mac_address() {
            Ok(Some(mac)) => Some(from_mac_bytes(mac.bytes())),
            Ok(None) => {
                tracing::warn!("no network interface with a MAC address found");
                None
            }
            Err(err) => {
                tracing::warn!("failed to read MAC address: {err}");
                None
            }
        }
    }
}

pub(crate) const MAX_NODE: u64 = (1 << 48) - 1;

/// Packs a 6-byte MAC address into a 48-bit integer.
pub const fn from_mac_bytes(bytes: [u8; 6]) -> u64 {
    let [a, b, c, d, e, f] = bytes;
    u64::from_be_bytes([0, 0, a, b, c, d, e, f])
}

/// Formats a 48-bit node identifier as a colon-separated MAC address.
pub(crate) fn mac_string(node: u64) -> String {
    let bytes = node.to_be_bytes();
    bytes[2..]
        .iter()
        .map(|e| format!("{:02x}", e))
        .collect::<Vec<_>>()
        .join(":")
}
