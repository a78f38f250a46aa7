//! The unified error type for open-dpcutil-core.
//!
//! Every fallible operation in the binding layer fails with a [`DpcError`]:
//! a free-text context string describing what was being attempted, a native
//! DPCUTIL error code, or both. The display message is composed once at
//! construction from the context and the registry-resolved name and
//! description for the code.

use thiserror::Error;

use crate::registry::{Erc, ErrorRegistry};

/// Message used when an error is raised with neither a code nor a context.
const FALLBACK_MESSAGE: &str = "Unknown error (no error code or context string given).";

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, DpcError>;

/// A DPCUTIL binding failure.
///
/// Constructed through one of the named constructors; which of the optional
/// fields are populated depends on the constructor used. The rendered
/// message is immutable after construction.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DpcError {
    context: Option<String>,
    code: Option<Erc>,
    resolved_name: Option<String>,
    resolved_description: Option<String>,
    message: String,
}

impl DpcError {
    /// An error about which nothing is known.
    pub fn unknown() -> Self {
        Self {
            context: Some(FALLBACK_MESSAGE.to_string()),
            code: None,
            resolved_name: None,
            resolved_description: None,
            message: FALLBACK_MESSAGE.to_string(),
        }
    }

    /// A context-only failure (no native error code involved).
    ///
    /// Panics if the context is empty after trimming; raising an error
    /// with a blank description is a bug at the call site.
    pub fn context(context: impl AsRef<str>) -> Self {
        Self::resolved(ErrorRegistry::global(), Some(context.as_ref()), None)
    }

    /// A failure described by a native DPCUTIL error code.
    pub fn code(code: Erc) -> Self {
        Self::resolved(ErrorRegistry::global(), None, Some(code))
    }

    /// A failure with both a call-site context and a native error code.
    pub fn context_and_code(context: impl AsRef<str>, code: Erc) -> Self {
        Self::resolved(ErrorRegistry::global(), Some(context.as_ref()), Some(code))
    }

    /// Construct against an explicit registry.
    ///
    /// This is the primitive behind the other constructors; tests use it
    /// with controlled registries. Panics if neither a context nor a code
    /// is given, or if the context is empty after trimming.
    pub fn resolved(registry: &ErrorRegistry, context: Option<&str>, code: Option<Erc>) -> Self {
        assert!(
            context.is_some() || code.is_some(),
            "a DpcError needs an error code or a context string"
        );

        let context = context.map(|c| {
            let trimmed = c.trim();
            assert!(
                !trimmed.is_empty(),
                "a DpcError context string must not be empty"
            );
            trimmed.to_string()
        });

        let mut resolved_name = None;
        let mut resolved_description = None;
        let mut fragment = None;
        if let Some(erc) = code {
            let name = registry.lookup_name(erc);
            let description = registry.lookup_description(erc);
            let suffix = description.map(|d| format!(" {d}")).unwrap_or_default();
            fragment = Some(format!("DPCUTIL error {name} ({erc}){suffix}"));
            resolved_name = Some(name.to_string());
            resolved_description = description.map(str::to_string);
        }

        let mut message = context.clone().unwrap_or_default();
        if let (Some(fragment), Some(erc)) = (fragment, code) {
            if !registry.is_no_error(erc) {
                if message.is_empty() {
                    message = fragment;
                } else {
                    if !message.ends_with('.') {
                        message.push('.');
                    }
                    message.push(' ');
                    message.push_str(&fragment);
                }
            } else if message.is_empty() {
                // Code 0 with no context: the fragment describing "no error"
                // is reported verbatim rather than leaving the message
                // blank. Alongside a context it is suppressed, since a
                // no-error code adds nothing.
                message = fragment;
            }
        }

        Self {
            context,
            code,
            resolved_name,
            resolved_description,
            message,
        }
    }

    /// The call-site context, if one was supplied.
    pub fn error_context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// The native error code, if one was supplied.
    pub fn erc(&self) -> Option<Erc> {
        self.code
    }

    /// The registry-resolved symbolic name for the code.
    pub fn error_name(&self) -> Option<&str> {
        self.resolved_name.as_deref()
    }

    /// The documented description for the code, if the manual covers it.
    pub fn error_description(&self) -> Option<&str> {
        self.resolved_description.as_deref()
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_uses_the_fallback_message() {
        let err = DpcError::unknown();
        assert_eq!(
            err.message(),
            "Unknown error (no error code or context string given)."
        );
        assert_eq!(err.erc(), None);
        assert_eq!(err.error_name(), None);
    }

    #[test]
    fn context_only_message_is_the_context() {
        let err = DpcError::context("opening device");
        assert_eq!(err.message(), "opening device");
        assert_eq!(err.error_context(), Some("opening device"));
        assert_eq!(err.erc(), None);
    }

    #[test]
    fn context_is_trimmed() {
        let err = DpcError::context("  opening device \n");
        assert_eq!(err.message(), "opening device");
    }

    #[test]
    fn documented_code_resolves_name_and_description() {
        let err = DpcError::code(3103);
        assert_eq!(
            err.message(),
            "DPCUTIL error ercCantConnect (3103) Can't connect to communication module"
        );
        assert_eq!(err.erc(), Some(3103));
        assert_eq!(err.error_name(), Some("ercCantConnect"));
        assert_eq!(
            err.error_description(),
            Some("Can't connect to communication module")
        );
        assert_eq!(err.error_context(), None);
    }

    #[test]
    fn context_and_code_join_with_period_and_space() {
        let err = DpcError::context_and_code("opening device", 3103);
        assert_eq!(
            err.message(),
            "opening device. DPCUTIL error ercCantConnect (3103) Can't connect to communication module"
        );
    }

    #[test]
    fn context_ending_with_period_is_not_doubled() {
        let err = DpcError::context_and_code("No devices in the device table.", 3301);
        assert_eq!(
            err.message(),
            "No devices in the device table. DPCUTIL error ercDvctableDne (3301) Device table doesn't exist (an empty one has been created)"
        );
    }

    #[test]
    fn defined_but_undocumented_code_has_no_description_suffix() {
        let err = DpcError::code(3008);
        assert_eq!(err.message(), "DPCUTIL error ercNotImp (3008)");
        assert_eq!(err.error_description(), None);
    }

    #[test]
    fn unknown_code_degrades_to_the_sentinel_name() {
        let err = DpcError::code(9999);
        assert_eq!(err.message(), "DPCUTIL error UNKNOWN_DPCUTIL_ERROR (9999)");
        assert_eq!(err.error_name(), Some("UNKNOWN_DPCUTIL_ERROR"));
        assert_eq!(err.error_description(), None);
    }

    #[test]
    fn no_error_code_is_suppressed_next_to_a_context() {
        let err = DpcError::context_and_code("ctx", 0);
        assert_eq!(err.message(), "ctx");
        // Structured fields stay populated for programmatic use.
        assert_eq!(err.erc(), Some(0));
        assert_eq!(err.error_name(), Some("ercNoError"));
    }

    #[test]
    fn no_error_code_alone_renders_its_own_fragment() {
        let err = DpcError::code(0);
        assert_eq!(
            err.message(),
            "DPCUTIL error ercNoError (0) No error occurred in transaction"
        );
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_context_is_a_contract_violation() {
        let _ = DpcError::context("   ");
    }

    #[test]
    #[should_panic(expected = "needs an error code or a context string")]
    fn neither_context_nor_code_is_a_contract_violation() {
        let _ = DpcError::resolved(ErrorRegistry::global(), None, None);
    }

    #[test]
    fn resolved_uses_the_supplied_registry() {
        let registry = ErrorRegistry::from_tables(
            "const ERC ercAlpha = 1;\n",
            "ercAlpha 1 First thing broke\n",
        )
        .unwrap();
        let err = DpcError::resolved(&registry, Some("during test"), Some(1));
        assert_eq!(
            err.message(),
            "during test. DPCUTIL error ercAlpha (1) First thing broke"
        );

        // A code only the embedded tables know is unknown to this registry.
        let err = DpcError::resolved(&registry, None, Some(3103));
        assert_eq!(err.message(), "DPCUTIL error UNKNOWN_DPCUTIL_ERROR (3103)");
    }

    #[test]
    fn display_matches_message() {
        let err = DpcError::context_and_code("writing register 64", 3105);
        assert_eq!(format!("{err}"), err.message());
    }
}
