//! Link abstraction over the native DPCUTIL entry points.
//!
//! Provides a trait-based seam so that the real FFI-backed library and
//! mock links share the same interface. Methods mirror the native calls:
//! each returns the success flag and the error code the call wrote to its
//! out-parameter, and the wrapper layers above turn those into [`DpcError`]s.

use crate::error::{DpcError, Result};
use crate::registry::{Erc, ERC_NO_ERROR};

/// Fixed buffer size for device-name queries (`DvmgGetDevName`).
pub const DEVICE_NAME_BUF: usize = 512;

/// Success flag plus the error code a native call wrote to its out-parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStatus {
    pub ok: bool,
    pub erc: Erc,
}

impl RawStatus {
    /// A successful call.
    pub fn success() -> Self {
        Self {
            ok: true,
            erc: ERC_NO_ERROR,
        }
    }

    /// A failed call that reported `erc`.
    pub fn failure(erc: Erc) -> Self {
        Self { ok: false, erc }
    }

    /// Turn a failed call into a [`DpcError`] carrying the reported code.
    pub fn check(self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(DpcError::code(self.erc))
        }
    }
}

/// Opaque wrapper around a native data-transfer HANDLE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkHandle(pub usize);

/// Abstraction over the raw DPCUTIL surface.
///
/// Implementations provide the vendor DLL's behavior (or a scripted stand-in
/// for tests). No method here returns a [`DpcError`]; converting flag and
/// code into structured errors is the wrapper layers' job.
pub trait DpcLink: Send {
    /// `DpcInit`: initialize the library.
    fn init(&self) -> RawStatus;

    /// `DpcTerm`: release the library. Infallible by contract.
    fn term(&self);

    /// `DvmgStartConfigureDevices`: open the device-configuration dialog.
    /// Reports failure only through the returned error code.
    fn start_configure_devices(&self) -> Erc;

    /// `DvmgGetDefaultDev`: index of the default device, or -1 if the
    /// device table is empty.
    fn default_device(&self) -> (i32, Erc);

    /// `DvmgGetDevName`: name of the device at `device_id`.
    fn device_name(&self, device_id: i32) -> (RawStatus, String);

    /// `DpcOpenData`: open a data-transfer handle to the named device.
    fn open_data(&self, device_name: &str) -> (RawStatus, LinkHandle);

    /// `DpcCloseData`: close a data-transfer handle.
    fn close_data(&self, handle: LinkHandle) -> RawStatus;

    /// `DpcPutReg`: write one byte to a register.
    fn put_reg(&self, handle: LinkHandle, addr: u8, data: u8) -> RawStatus;

    /// `DpcGetReg`: read one byte from a register.
    fn get_reg(&self, handle: LinkHandle, addr: u8) -> (RawStatus, u8);

    /// `DpcGetFirstError`: first error recorded on the handle since it was
    /// opened, or the no-error code.
    fn first_error(&self, handle: LinkHandle) -> Erc;
}

impl<'a, L: DpcLink + Sync + ?Sized> DpcLink for &'a L {
    fn init(&self) -> RawStatus {
        (**self).init()
    }

    fn term(&self) {
        (**self).term()
    }

    fn start_configure_devices(&self) -> Erc {
        (**self).start_configure_devices()
    }

    fn default_device(&self) -> (i32, Erc) {
        (**self).default_device()
    }

    fn device_name(&self, device_id: i32) -> (RawStatus, String) {
        (**self).device_name(device_id)
    }

    fn open_data(&self, device_name: &str) -> (RawStatus, LinkHandle) {
        (**self).open_data(device_name)
    }

    fn close_data(&self, handle: LinkHandle) -> RawStatus {
        (**self).close_data(handle)
    }

    fn put_reg(&self, handle: LinkHandle, addr: u8, data: u8) -> RawStatus {
        (**self).put_reg(handle, addr, data)
    }

    fn get_reg(&self, handle: LinkHandle, addr: u8) -> (RawStatus, u8) {
        (**self).get_reg(handle, addr)
    }

    fn first_error(&self, handle: LinkHandle) -> Erc {
        (**self).first_error(handle)
    }
}
