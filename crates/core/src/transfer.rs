//! EPP-style register transfer over an open data handle.
//!
//! [`DataPort`] wraps a native data-transfer handle. Registers are
//! byte-addressed and byte-valued; batch transfer calls are not exposed
//! because the native library leaves them unimplemented.

use tracing::{trace, warn};

use crate::error::{DpcError, Result};
use crate::link::{DpcLink, LinkHandle};
use crate::registry::ErrorRegistry;

/// An open data-transfer handle bound to a link.
///
/// Closed explicitly with [`DataPort::close`] (which surfaces close
/// failures) or implicitly on drop (which only logs them).
pub struct DataPort<'a> {
    link: &'a dyn DpcLink,
    handle: LinkHandle,
    closed: bool,
}

impl<'a> DataPort<'a> {
    /// Open a data-transfer handle to the named device.
    pub fn open(link: &'a dyn DpcLink, device_name: &str) -> Result<Self> {
        let (status, handle) = link.open_data(device_name);
        status.check()?;
        trace!(?handle, device = device_name, "Data transfer handle opened");
        Ok(Self {
            link,
            handle,
            closed: false,
        })
    }

    /// Write one byte to a register.
    pub fn put_reg(&self, addr: u8, data: u8) -> Result<()> {
        self.link.put_reg(self.handle, addr, data).check()?;
        trace!(addr, data, "Register write");
        Ok(())
    }

    /// Read one byte from a register.
    pub fn get_reg(&self, addr: u8) -> Result<u8> {
        let (status, data) = self.link.get_reg(self.handle, addr);
        status.check()?;
        trace!(addr, data, "Register read");
        Ok(data)
    }

    /// Surface the first error the native library recorded on this handle.
    pub fn check_first_error(&self) -> Result<()> {
        let erc = self.link.first_error(self.handle);
        if !ErrorRegistry::global().is_no_error(erc) {
            return Err(DpcError::code(erc));
        }
        Ok(())
    }

    /// Close the handle, surfacing any close failure.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.link.close_data(self.handle).check()
    }
}

impl Drop for DataPort<'_> {
    fn drop(&mut self) {
        if !self.closed {
            let status = self.link.close_data(self.handle);
            if !status.ok {
                warn!(erc = status.erc, "Failed to close data transfer handle");
            }
        }
    }
}

/// Write one register on the named device: open, write, check the deferred
/// first error, close. The handle is closed on every path.
pub fn put_single_register(
    link: &dyn DpcLink,
    addr: u8,
    data: u8,
    device_name: &str,
) -> Result<()> {
    let port = DataPort::open(link, device_name)?;
    port.put_reg(addr, data)?;
    port.check_first_error()?;
    port.close()
}

/// Read one register on the named device: open, read, check the deferred
/// first error, close. The handle is closed on every path.
pub fn get_single_register(link: &dyn DpcLink, addr: u8, device_name: &str) -> Result<u8> {
    let port = DataPort::open(link, device_name)?;
    let data = port.get_reg(addr)?;
    port.check_first_error()?;
    port.close()?;
    Ok(data)
}
