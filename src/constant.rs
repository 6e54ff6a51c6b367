//! This module contains constants that are needed throughout the codebase.

/// The signature given to the unnamed fallback function.
///
/// Note that this is deliberately not of the form `fallback()`, so that it can
/// never collide with a user-defined function named `fallback`.
pub const FALLBACK_SIGNATURE: &str = "fallback";

/// The modifier that checks a role with no parameters.
pub const AUTH_MODIFIER: &str = "auth";

/// The modifier that checks a role with an explicit parameter list.
pub const AUTH_PARAMS_MODIFIER: &str = "authP";

/// The type that an auth helper function must return: a dynamic array of
/// unsigned 256-bit integers.
pub const AUTH_HELPER_RETURN_ELEMENT: &str = "uint256";

/// The reference to the flattened source written into every artifact by
/// default.
pub const DEFAULT_FLATTENED_CODE_PATH: &str = "./code.sol";

/// The file name under which artifacts are conventionally persisted.
pub const ARTIFACT_FILE_NAME: &str = "artifact.json";

/// The file name under which the front-end manifest is conventionally
/// persisted.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// The ABI `type` of entries that describe callable functions.
pub const ABI_FUNCTION_TYPE: &str = "function";

/// The width in bits that the unsized `int` and `uint` keywords stand for.
pub const DEFAULT_INTEGER_WIDTH_BITS: usize = 256;

/// The canonical form of the unsized `fixed` keyword.
pub const DEFAULT_FIXED_TYPE: &str = "fixed128x18";

/// The canonical form of the unsized `ufixed` keyword.
pub const DEFAULT_UFIXED_TYPE: &str = "ufixed128x18";

/// The ABI-level type of any parameter typed by a contract, interface or other
/// user-defined name.
pub const USER_DEFINED_ABI_TYPE: &str = "address";

/// The Solidity keywords that mark a declaration as either not callable from
/// outside the contract or not state-changing.
pub const EXCLUDING_KEYWORDS: [&str; 5] = ["internal", "private", "view", "pure", "constant"];
