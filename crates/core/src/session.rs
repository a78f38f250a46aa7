//! DPCUTIL library lifecycle.
//!
//! The native library must be initialized exactly once before any other
//! call and released exactly once afterwards. [`Session`] ties that pair
//! to a value's lifetime: `DpcInit` on construction, `DpcTerm` on drop.

use tracing::{debug, info};

use crate::error::Result;
use crate::link::DpcLink;

/// An initialized DPCUTIL library session.
pub struct Session<L: DpcLink> {
    link: L,
}

impl<L: DpcLink> Session<L> {
    /// Initialize the library over `link`.
    ///
    /// On failure the link is dropped without a terminate call, since the
    /// library never came up.
    pub fn start(link: L) -> Result<Self> {
        link.init().check()?;
        info!("DPCUTIL session initialized");
        Ok(Self { link })
    }

    /// The link this session was initialized over.
    pub fn link(&self) -> &L {
        &self.link
    }
}

impl<L: DpcLink> Drop for Session<L> {
    fn drop(&mut self) {
        self.link.term();
        debug!("DPCUTIL session terminated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::mock::{MockLink, MockOp};

    #[test]
    fn drop_terminates_exactly_once() {
        let link = MockLink::new();
        {
            let session = Session::start(&link).unwrap();
            assert_eq!(link.term_calls(), 0);
            drop(session);
        }
        assert_eq!(link.term_calls(), 1);
    }

    #[test]
    fn failed_init_does_not_terminate() {
        let link = MockLink::new();
        link.fail_on(MockOp::Init, 3304);
        assert!(Session::start(&link).is_err());
        assert_eq!(link.term_calls(), 0);
    }

    #[test]
    fn failed_init_surfaces_the_code() {
        let link = MockLink::new();
        link.fail_on(MockOp::Init, 3304); // ercDpcutilInitFail
        // `err()` instead of `unwrap_err()`: the session type itself has
        // no Debug impl to discard.
        let err = Session::start(link).err().unwrap();
        assert_eq!(err.erc(), Some(3304));
        assert_eq!(
            err.message(),
            "DPCUTIL error ercDpcutilInitFail (3304) DpcInit API call failed"
        );
    }
}
