//! DPCUTIL error-code registry.
//!
//! Two embedded tables define the error-code space. The `const ERC` block
//! from `dpcdefs.h` (revision 07/22/2004) is authoritative for code → name
//! and covers every known code; the DPCUTIL Programmer's Reference Manual
//! (revision 06/03/05) documents a subset of codes with human-readable
//! descriptions. Both tables are parsed once and cross-checked entry by
//! entry: a docs entry whose name does not match the defs entry for the
//! same code means one table was updated without the other, and the
//! registry refuses to build rather than serve inconsistent data.

use std::collections::HashMap;
use std::sync::LazyLock;

use thiserror::Error;

/// Native DPCUTIL error-code type (`ERC` in dpcdefs.h).
pub type Erc = i32;

/// The "operation succeeded" sentinel code.
pub const ERC_NO_ERROR: Erc = 0;

/// Name reported for codes absent from the defs table.
pub const UNKNOWN_ERROR_NAME: &str = "UNKNOWN_DPCUTIL_ERROR";

/// Error codes from dpcdefs.h revision 07/22/2004.
const ERC_DEFS: &str = "\
const ERC ercNoError        = 0;
const ERC ercConnReject     = 3001;
const ERC ercConnType       = 3002;
const ERC ercConnNoMode     = 3003;
const ERC ercInvParam       = 3004;
const ERC ercInvCmd         = 3005;
const ERC ercUnknown        = 3006;
const ERC ercJtagConflict   = 3007;
const ERC ercNotImp         = 3008;
const ERC ercNoMem          = 3009;
const ERC ercTimeout        = 3010;
const ERC ercConflict       = 3011;
const ERC ercBadPacket      = 3012;
const ERC ercInvOption      = 3013;
const ERC ercAlreadyCon     = 3014;
const ERC ercConnected      = 3101;
const ERC ercNotInit        = 3102;
const ERC ercCantConnect    = 3103;
const ERC ercAlreadyConnect = 3104;
const ERC ercSendError      = 3105;
const ERC ercRcvError       = 3106;
const ERC ercAbort          = 3107;
const ERC ercTimeOut        = 3108;
const ERC ercOutOfOrder     = 3109;
const ERC ercExtraData      = 3110;
const ERC ercMissingData    = 3111;
const ERC ercTridNotFound   = 3201;
const ERC ercNotComplete    = 3202;
const ERC ercNotConnected   = 3203;
const ERC ercWrongMode      = 3204;
const ERC ercWrongVersion   = 3205;
const ERC ercDvctableDne    = 3301;
const ERC ercDvctableCorrupt= 3302;
const ERC ercDvcDne         = 3303;
const ERC ercDpcutilInitFail= 3304;
const ERC ercUnknownErr     = 3305;
const ERC ercDvcTableOpen   = 3306;
const ERC ercRegError       = 3307;
const ERC ercNotifyRegFull  = 3308;
const ERC ercNotifyNotFound = 3309;
const ERC ercOldDriverNewFw = 3310;
const ERC ercInvHandle      = 3311;
const ERC ercInterfaceNotSupported = 3312;
";

/// Error documentation from the DPCUTIL Programmer's Reference Manual
/// revision 06/03/05.
const ERC_DOCS: &str = "\
ercNoError 0 No error occurred in transaction
ercInvParam 3004 Invalid parameter sent in API call
ercInvCmd 3005 Internal error. Please report occurrence as a bug
ercUnknown 3006 Internal error. Please report occurrence as a bug
ercNoMem 3009 Not enough memory to carry out transaction
ercNotInit 3102 Communication device not initialized
ercCantConnect 3103 Can't connect to communication module
ercAlreadyConnect 3104 Already connected to communication device
ercSendError 3105 Error occurred while sending data to communication device
ercRcvError 3106 Error occurred while receiving data from communication device
ercAbort 3107 Error occurred while trying to abort transaction(s)
ercOutOfOrder 3109 Completion out of order
ercExtraData 3110 Too much data received from communication device
ercMissingData 3111 Nothing to send or data/address mismatched pairs
ercTridNotFound 3201 Unable to find matching TRID in transaction queue
ercNotComplete 3202 Transaction being cleared is not complete
ercNotConnected 3203 Not connected to communication device
ercWrongMode 3204 Connected in wrong mode (JTAG or data transfer)
ercWrongVersion 3205 Internal error. Please report occurrence as a bug
ercDvctableDne 3301 Device table doesn't exist (an empty one has been created)
ercDvctableCorrupt 3302 All or part of the device table is corrupted
ercDvcDne 3303 Device does not exist in device table
ercDpcutilInitFail 3304 DpcInit API call failed
ercDvcTableOpen 3306 Communications devices dialog box already open.
ercRegError 3307 Error occurred while accessing the registry
";

/// Registry build failure: the embedded tables are malformed or disagree.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A defs-table line does not have the `const ERC name = code;` shape.
    #[error("malformed defs entry: {line:?}")]
    MalformedDefs { line: String },

    /// A docs-table line does not have the `name code description` shape.
    #[error("malformed docs entry: {line:?}")]
    MalformedDocs { line: String },

    /// The numeric code field of an entry did not parse.
    #[error("invalid error code in entry: {line:?}")]
    BadCode { line: String },

    /// A docs entry references a code the defs table does not define.
    #[error("docs entry {name} ({code}) has no matching defs entry")]
    UndefinedCode { name: String, code: Erc },

    /// The two tables disagree on the name for a code.
    #[error("name mismatch for code {code}: defs say {defs_name}, docs say {docs_name}")]
    NameMismatch {
        code: Erc,
        defs_name: String,
        docs_name: String,
    },
}

/// Immutable code → name / code → description lookup tables.
///
/// The process-wide instance is [`ErrorRegistry::global`]; tests can build
/// alternate registries from controlled tables via [`ErrorRegistry::from_tables`].
#[derive(Debug)]
pub struct ErrorRegistry {
    names: HashMap<Erc, String>,
    descriptions: HashMap<Erc, String>,
}

static GLOBAL: LazyLock<ErrorRegistry> = LazyLock::new(|| {
    ErrorRegistry::from_tables(ERC_DEFS, ERC_DOCS)
        .unwrap_or_else(|e| panic!("embedded DPCUTIL error tables are inconsistent: {e}"))
});

impl ErrorRegistry {
    /// The registry built from the embedded dpcdefs.h / manual tables.
    ///
    /// Panics on first use if the embedded tables fail validation; that is
    /// a build defect, not a runtime condition.
    pub fn global() -> &'static ErrorRegistry {
        &GLOBAL
    }

    /// Parse and cross-validate a defs table and a docs table.
    pub fn from_tables(defs: &str, docs: &str) -> Result<Self, RegistryError> {
        let names = parse_defs(defs)?;
        let descriptions = parse_docs(docs, &names)?;
        Ok(Self {
            names,
            descriptions,
        })
    }

    /// Canonical name for a code, or [`UNKNOWN_ERROR_NAME`] if undefined.
    pub fn lookup_name(&self, code: Erc) -> &str {
        self.names
            .get(&code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ERROR_NAME)
    }

    /// Documented description for a code, if the manual covers it.
    pub fn lookup_description(&self, code: Erc) -> Option<&str> {
        self.descriptions.get(&code).map(String::as_str)
    }

    /// Whether a code is the "operation succeeded" sentinel.
    pub fn is_no_error(&self, code: Erc) -> bool {
        code == ERC_NO_ERROR
    }

    /// Number of defined codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the defs table defined no codes.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parse the `const ERC name = code;` table.
fn parse_defs(src: &str) -> Result<HashMap<Erc, String>, RegistryError> {
    let mut names = HashMap::new();

    for line in src.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let malformed = || RegistryError::MalformedDefs {
            line: line.to_string(),
        };

        // "const ERC ercNoError        = 0;" splits at the last whitespace
        // into "const ERC ercNoError        =" and "0;". The '=' may be
        // glued to the name, so it is stripped after the split.
        let (head, code_field) = line
            .rsplit_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        let head = head.trim_end().strip_suffix('=').ok_or_else(malformed)?;
        let code_field = code_field.strip_suffix(';').ok_or_else(malformed)?;

        let (prefix, name) = head
            .trim_end()
            .rsplit_once(char::is_whitespace)
            .ok_or_else(malformed)?;
        if prefix.trim_end() != "const ERC" {
            return Err(malformed());
        }

        let code: Erc = code_field.parse().map_err(|_| RegistryError::BadCode {
            line: line.to_string(),
        })?;

        names.insert(code, name.to_string());
    }

    Ok(names)
}

/// Parse the `name code description` table and cross-check it against the
/// defs table.
fn parse_docs(
    src: &str,
    names: &HashMap<Erc, String>,
) -> Result<HashMap<Erc, String>, RegistryError> {
    let mut descriptions = HashMap::new();

    for line in src.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut fields = line.splitn(3, char::is_whitespace);
        let (name, code_field, description) =
            match (fields.next(), fields.next(), fields.next()) {
                (Some(n), Some(c), Some(d)) if !d.trim().is_empty() => (n, c, d.trim()),
                _ => {
                    return Err(RegistryError::MalformedDocs {
                        line: line.to_string(),
                    })
                }
            };

        let code: Erc = code_field.parse().map_err(|_| RegistryError::BadCode {
            line: line.to_string(),
        })?;

        let defs_name = names.get(&code).ok_or_else(|| RegistryError::UndefinedCode {
            name: name.to_string(),
            code,
        })?;

        // ASCII-only identifiers, so a locale-aware case fold is unnecessary.
        if !defs_name.eq_ignore_ascii_case(name) {
            return Err(RegistryError::NameMismatch {
                code,
                defs_name: defs_name.clone(),
                docs_name: name.to_string(),
            });
        }

        descriptions.insert(code, description.to_string());
    }

    Ok(descriptions)
}
