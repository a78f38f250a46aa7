//! open-dpcutil-core: DPCUTIL error model, device manager, and register transfer.
//!
//! This crate wraps the Digilent DPCUTIL library's device-manager and
//! EPP-style data-transfer calls behind a link trait, and funnels every
//! native failure through one structured error type backed by an embedded
//! error-code registry.
//!
//! Protocol reference: DPCUTIL Programmer's Reference Manual (Digilent),
//! revision 06/03/05.

pub mod device;
pub mod error;
#[cfg(test)]
mod integration_tests;
pub mod link;
pub mod plan;
pub mod registry;
pub mod session;
pub mod transfer;

pub use error::{DpcError, Result};
pub use registry::{Erc, ErrorRegistry};
