//! Device-manager wrappers: configuration dialog, default device, names.

use tracing::{debug, info};

use crate::error::{DpcError, Result};
use crate::link::DpcLink;
use crate::registry::ErrorRegistry;

/// Open the DPCUTIL device-configuration dialog and wait for it to close.
pub fn configure_devices(link: &dyn DpcLink) -> Result<()> {
    debug!("Opening the device configuration dialog");
    let erc = link.start_configure_devices();
    if !ErrorRegistry::global().is_no_error(erc) {
        return Err(DpcError::code(erc));
    }
    Ok(())
}

/// Index of the default device in the device table.
///
/// A -1 index means the table is empty; the error carries both that
/// context and whatever code the native call reported.
pub fn default_device(link: &dyn DpcLink) -> Result<i32> {
    let (device_id, erc) = link.default_device();
    if device_id == -1 {
        return Err(DpcError::context_and_code(
            "No devices in the device table.",
            erc,
        ));
    }
    debug!(device_id, "Default device selected");
    Ok(device_id)
}

/// Name of the device at `device_id` in the device table.
pub fn device_name(link: &dyn DpcLink, device_id: i32) -> Result<String> {
    let (status, name) = link.device_name(device_id);
    status.check()?;
    info!(device_id, name = %name, "Resolved device name");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::mock::{MockLink, MockOp};

    #[test]
    fn configure_devices_passes_on_no_error() {
        let link = MockLink::new();
        assert!(configure_devices(&link).is_ok());
    }

    #[test]
    fn configure_devices_wraps_the_reported_code() {
        let link = MockLink::new();
        link.fail_on(MockOp::Configure, 3306); // ercDvcTableOpen
        let err = configure_devices(&link).unwrap_err();
        assert_eq!(err.erc(), Some(3306));
        assert_eq!(
            err.message(),
            "DPCUTIL error ercDvcTableOpen (3306) Communications devices dialog box already open."
        );
    }

    #[test]
    fn default_device_returns_the_index() {
        let link = MockLink::new();
        assert_eq!(default_device(&link).unwrap(), 0);
    }

    #[test]
    fn empty_device_table_reports_context_and_code() {
        let link = MockLink::with_no_devices();
        let err = default_device(&link).unwrap_err();
        assert_eq!(err.error_context(), Some("No devices in the device table."));
        assert_eq!(err.erc(), Some(3301));
        assert_eq!(
            err.message(),
            "No devices in the device table. DPCUTIL error ercDvctableDne (3301) \
             Device table doesn't exist (an empty one has been created)"
        );
    }

    #[test]
    fn device_name_resolves() {
        let link = MockLink::new();
        assert_eq!(device_name(&link, 0).unwrap(), "EPP-MOCK");
    }

    #[test]
    fn device_name_out_of_table_fails() {
        let link = MockLink::new();
        let err = device_name(&link, 7).unwrap_err();
        assert_eq!(err.erc(), Some(3303));
        assert_eq!(err.error_name(), Some("ercDvcDne"));
    }
}
