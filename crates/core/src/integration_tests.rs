//! Integration tests: exercise the full flow against a simulated device.
//!
//! These tests run the session → device manager → transfer pipeline over
//! the mock link and check that every native failure funnels into a
//! registry-resolved error message.

#[cfg(test)]
mod tests {
    use crate::device;
    use crate::link::mock::{MockLink, MockOp};
    use crate::session::Session;
    use crate::transfer;

    /// The original bring-up workflow: pick the default device, write a
    /// register, read the whole register file back.
    #[test]
    fn bring_up_workflow() {
        let link = MockLink::new();
        let session = Session::start(&link).unwrap();

        let device_id = device::default_device(session.link()).unwrap();
        let name = device::device_name(session.link(), device_id).unwrap();
        assert_eq!(name, "EPP-MOCK");

        transfer::put_single_register(session.link(), 64, 0xA5, &name).unwrap();
        for addr in 0u8..=255 {
            let value = transfer::get_single_register(session.link(), addr, &name).unwrap();
            let expected = if addr == 64 { 0xA5 } else { 0 };
            assert_eq!(value, expected, "register {addr}");
        }

        drop(session);
        assert_eq!(link.term_calls(), 1);
        assert_eq!(link.open_handle_count(), 0);
    }

    #[test]
    fn device_lookup_failure_reads_like_the_manual() {
        let link = MockLink::with_no_devices();
        let session = Session::start(&link).unwrap();

        let err = device::default_device(session.link()).unwrap_err();
        assert_eq!(
            err.message(),
            "No devices in the device table. DPCUTIL error ercDvctableDne (3301) \
             Device table doesn't exist (an empty one has been created)"
        );
    }

    #[test]
    fn transfer_failure_funnels_through_the_registry() {
        let link = MockLink::new();
        let session = Session::start(&link).unwrap();

        link.fail_on(MockOp::GetReg, 3106);
        let err = transfer::get_single_register(session.link(), 0, "EPP-MOCK").unwrap_err();
        assert_eq!(err.erc(), Some(3106));
        assert_eq!(
            err.message(),
            "DPCUTIL error ercRcvError (3106) \
             Error occurred while receiving data from communication device"
        );
        assert_eq!(link.open_handle_count(), 0);
    }
}
