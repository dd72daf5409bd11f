mod dcim;
mod ipam;
mod provision;
mod tenancy;
mod vpn;

pub use dcim::*;
pub use ipam::*;
pub use provision::*;
pub use tenancy::*;
pub use vpn::*;
