//! Native link backed by the vendor dpcutil DLL.
//!
//! The DLL ships for Windows only; on other platforms [`NativeLink::load`]
//! fails with a context-only error, the same way the binding reports a
//! missing DLL.

use open_dpcutil_core::error::{DpcError, Result};

/// Link over the real DPCUTIL library.
pub struct NativeLink {
    _private: (),
}

impl NativeLink {
    /// Bind to the vendor DLL.
    pub fn load() -> Result<Self> {
        if cfg!(windows) {
            Ok(Self { _private: () })
        } else {
            Err(DpcError::context("Failed to load the DPCUTIL native library."))
        }
    }
}

#[cfg(windows)]
mod ffi {
    use std::ffi::{c_char, c_int, c_void};

    // Signatures per the DPCUTIL Programmer's Reference Manual, rev 06/03/05.
    #[link(name = "dpcutil")]
    extern "system" {
        pub fn DpcInit(perc: *mut c_int) -> c_int;
        pub fn DpcTerm();
        pub fn DvmgStartConfigureDevices(hwnd: *mut c_void, perc: *mut c_int);
        pub fn DvmgGetDefaultDev(perc: *mut c_int) -> c_int;
        pub fn DvmgGetDevName(idvc: c_int, szdvc: *mut c_char, perc: *mut c_int) -> c_int;
        pub fn DpcOpenData(
            phif: *mut *mut c_void,
            szdvc: *const c_char,
            perc: *mut c_int,
            overlap: *mut c_void,
        ) -> c_int;
        pub fn DpcCloseData(hif: *mut c_void, perc: *mut c_int) -> c_int;
        pub fn DpcPutReg(
            hif: *mut c_void,
            baddr: u8,
            bdata: u8,
            perc: *mut c_int,
            overlap: *mut c_void,
        ) -> c_int;
        pub fn DpcGetReg(
            hif: *mut c_void,
            baddr: u8,
            pbdata: *mut u8,
            perc: *mut c_int,
            overlap: *mut c_void,
        ) -> c_int;
        pub fn DpcGetFirstError(hif: *mut c_void) -> c_int;
    }
}

#[cfg(windows)]
mod imp {
    use super::ffi;
    use super::NativeLink;
    use open_dpcutil_core::link::{DpcLink, LinkHandle, RawStatus, DEVICE_NAME_BUF};
    use open_dpcutil_core::registry::Erc;
    use std::ffi::{c_char, c_int, c_void, CString};
    use std::ptr;
    use tracing::trace;

    // ercInvParam: reported when a device name cannot cross the FFI
    // boundary (interior NUL).
    const ERC_INV_PARAM: Erc = 3004;

    impl DpcLink for NativeLink {
        fn init(&self) -> RawStatus {
            let mut erc: c_int = 0;
            let ok = unsafe { ffi::DpcInit(&mut erc) } != 0;
            trace!(ok, erc, "DpcInit");
            if ok {
                RawStatus::success()
            } else {
                RawStatus::failure(erc)
            }
        }

        fn term(&self) {
            unsafe { ffi::DpcTerm() };
            trace!("DpcTerm");
        }

        fn start_configure_devices(&self) -> Erc {
            let mut erc: c_int = 0;
            unsafe { ffi::DvmgStartConfigureDevices(ptr::null_mut(), &mut erc) };
            trace!(erc, "DvmgStartConfigureDevices");
            erc
        }

        fn default_device(&self) -> (i32, Erc) {
            let mut erc: c_int = 0;
            let device_id = unsafe { ffi::DvmgGetDefaultDev(&mut erc) };
            trace!(device_id, erc, "DvmgGetDefaultDev");
            (device_id, erc)
        }

        fn device_name(&self, device_id: i32) -> (RawStatus, String) {
            let mut erc: c_int = 0;
            let mut buf = [0u8; DEVICE_NAME_BUF];
            let ok = unsafe {
                ffi::DvmgGetDevName(device_id, buf.as_mut_ptr() as *mut c_char, &mut erc)
            } != 0;
            trace!(device_id, ok, erc, "DvmgGetDevName");
            if !ok {
                return (RawStatus::failure(erc), String::new());
            }
            let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            let name = String::from_utf8_lossy(&buf[..len]).into_owned();
            (RawStatus::success(), name)
        }

        fn open_data(&self, device_name: &str) -> (RawStatus, LinkHandle) {
            let Ok(name) = CString::new(device_name) else {
                return (RawStatus::failure(ERC_INV_PARAM), LinkHandle(0));
            };
            let mut erc: c_int = 0;
            let mut hif: *mut c_void = ptr::null_mut();
            let ok = unsafe {
                ffi::DpcOpenData(&mut hif, name.as_ptr(), &mut erc, ptr::null_mut())
            } != 0;
            trace!(device = device_name, ok, erc, "DpcOpenData");
            if ok {
                (RawStatus::success(), LinkHandle(hif as usize))
            } else {
                (RawStatus::failure(erc), LinkHandle(0))
            }
        }

        fn close_data(&self, handle: LinkHandle) -> RawStatus {
            let mut erc: c_int = 0;
            let ok = unsafe { ffi::DpcCloseData(handle.0 as *mut c_void, &mut erc) } != 0;
            trace!(?handle, ok, erc, "DpcCloseData");
            if ok {
                RawStatus::success()
            } else {
                RawStatus::failure(erc)
            }
        }

        fn put_reg(&self, handle: LinkHandle, addr: u8, data: u8) -> RawStatus {
            let mut erc: c_int = 0;
            let ok = unsafe {
                ffi::DpcPutReg(
                    handle.0 as *mut c_void,
                    addr,
                    data,
                    &mut erc,
                    ptr::null_mut(),
                )
            } != 0;
            trace!(addr, data, ok, erc, "DpcPutReg");
            if ok {
                RawStatus::success()
            } else {
                RawStatus::failure(erc)
            }
        }

        fn get_reg(&self, handle: LinkHandle, addr: u8) -> (RawStatus, u8) {
            let mut erc: c_int = 0;
            let mut data: u8 = 0;
            let ok = unsafe {
                ffi::DpcGetReg(
                    handle.0 as *mut c_void,
                    addr,
                    &mut data,
                    &mut erc,
                    ptr::null_mut(),
                )
            } != 0;
            trace!(addr, data, ok, erc, "DpcGetReg");
            if ok {
                (RawStatus::success(), data)
            } else {
                (RawStatus::failure(erc), 0)
            }
        }

        fn first_error(&self, handle: LinkHandle) -> Erc {
            let erc = unsafe { ffi::DpcGetFirstError(handle.0 as *mut c_void) };
            trace!(?handle, erc, "DpcGetFirstError");
            erc
        }
    }
}

// Unreachable in practice: `load` refuses to construct a NativeLink off
// Windows. The stub keeps the binary compiling on every platform and
// answers any call with ercInterfaceNotSupported.
#[cfg(not(windows))]
mod imp {
    use super::NativeLink;
    use open_dpcutil_core::link::{DpcLink, LinkHandle, RawStatus};
    use open_dpcutil_core::registry::{Erc, ERC_NO_ERROR};

    const ERC_INTERFACE_NOT_SUPPORTED: Erc = 3312;

    impl DpcLink for NativeLink {
        fn init(&self) -> RawStatus {
            RawStatus::failure(ERC_INTERFACE_NOT_SUPPORTED)
        }

        fn term(&self) {}

        fn start_configure_devices(&self) -> Erc {
            ERC_INTERFACE_NOT_SUPPORTED
        }

        fn default_device(&self) -> (i32, Erc) {
            (-1, ERC_INTERFACE_NOT_SUPPORTED)
        }

        fn device_name(&self, _device_id: i32) -> (RawStatus, String) {
            (
                RawStatus::failure(ERC_INTERFACE_NOT_SUPPORTED),
                String::new(),
            )
        }

        fn open_data(&self, _device_name: &str) -> (RawStatus, LinkHandle) {
            (
                RawStatus::failure(ERC_INTERFACE_NOT_SUPPORTED),
                LinkHandle(0),
            )
        }

        fn close_data(&self, _handle: LinkHandle) -> RawStatus {
            RawStatus::failure(ERC_INTERFACE_NOT_SUPPORTED)
        }

        fn put_reg(&self, _handle: LinkHandle, _addr: u8, _data: u8) -> RawStatus {
            RawStatus::failure(ERC_INTERFACE_NOT_SUPPORTED)
        }

        fn get_reg(&self, _handle: LinkHandle, _addr: u8) -> (RawStatus, u8) {
            (RawStatus::failure(ERC_INTERFACE_NOT_SUPPORTED), 0)
        }

        fn first_error(&self, _handle: LinkHandle) -> Erc {
            ERC_NO_ERROR
        }
    }
}
