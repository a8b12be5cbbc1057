//! HTTP layer: the transport seam and wire-level debugging.

pub(crate) mod loud_wire;
pub(crate) mod transport;
