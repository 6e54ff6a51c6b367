//! This module contains the rules for rendering function signatures in their
//! canonical form, shared by the syntax-tree extractor and the doc-comment
//! scanner so that the two can be joined by exact string comparison.
//!
//! A canonical signature is `name(type1,type2,...)` with no whitespace, where
//! every type is a fully-qualified elementary type (`uint256` rather than
//! `uint`), optionally followed by array suffixes. Parameters typed by a
//! contract or other user-defined name are rendered as `address`, their
//! ABI-level representation.

use std::sync::OnceLock;

use itertools::Itertools;
use regex::{Captures, Regex};

use crate::constant::{
    DEFAULT_FIXED_TYPE,
    DEFAULT_INTEGER_WIDTH_BITS,
    DEFAULT_UFIXED_TYPE,
    FALLBACK_SIGNATURE,
    USER_DEFINED_ABI_TYPE,
};

/// Matches the base (without array suffixes) of an elementary Solidity type.
fn elementary_type_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"^(address|bool|string|function|byte|bytes\d*|u?int\d*|u?fixed(\d+x\d+)?)$")
            .expect("The elementary type pattern is a valid regex")
    })
}

/// Matches one dimension of an array suffix, such as `[4]` or `[]`.
fn array_dimension_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\[([^\]]*)\]").expect("The array dimension pattern is a valid regex")
    })
}

/// Checks whether `base` names an elementary type.
#[must_use]
pub fn is_elementary(base: &str) -> bool {
    elementary_type_regex().is_match(base)
}

/// Expands an unsized elementary keyword into its canonical form, leaving all
/// other names untouched.
#[must_use]
pub fn expand_elementary(base: &str) -> String {
    match base {
        "uint" => format!("uint{DEFAULT_INTEGER_WIDTH_BITS}"),
        "int" => format!("int{DEFAULT_INTEGER_WIDTH_BITS}"),
        "fixed" => DEFAULT_FIXED_TYPE.to_string(),
        "ufixed" => DEFAULT_UFIXED_TYPE.to_string(),
        "byte" => "bytes1".to_string(),
        other => other.to_string(),
    }
}

/// Canonicalises a single textual parameter type such as `uint[]` or
/// `ERC20`.
///
/// Array suffixes are kept (with whitespace removed and numeric lengths in
/// decimal), the base is expanded if it is an unsized keyword, and any base
/// that is not elementary becomes `address`. An empty input stays empty, as the
/// type is unknown.
#[must_use]
pub fn canonical_type(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let (base, suffix) = match raw.find('[') {
        Some(index) => raw.split_at(index),
        None => (raw, ""),
    };
    let suffix: String = suffix.chars().filter(|c| !c.is_whitespace()).collect();
    let suffix = array_dimension_regex().replace_all(&suffix, |caps: &Captures| {
        let length = &caps[1];
        format!("[{}]", array_length(length).unwrap_or_else(|| length.to_string()))
    });
    let base = expand_elementary(base.trim());

    if is_elementary(&base) {
        format!("{base}{suffix}")
    } else {
        format!("{USER_DEFINED_ABI_TYPE}{suffix}")
    }
}

/// Evaluates a numeric array length such as `4`, `1e2`, `0x10` or `1_000`
/// into its decimal form.
///
/// Returns [`None`] for anything that is not a whole number that fits in 128
/// bits, such as the name of a constant.
#[must_use]
pub fn array_length(literal: &str) -> Option<String> {
    let literal = literal.trim().replace('_', "");
    let value = if let Some(hex) = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        u128::from_str_radix(hex, 16).ok()?
    } else {
        let (mantissa, exponent) = literal
            .split_once(|c: char| c == 'e' || c == 'E')
            .unwrap_or((literal.as_str(), "0"));
        let mantissa: u128 = mantissa.parse().ok()?;
        let exponent: u32 = exponent.parse().ok()?;
        mantissa.checked_mul(10u128.checked_pow(exponent)?)?
    };

    Some(value.to_string())
}

/// Renders the signature of a function called `name` taking parameters of
/// the already-canonical `types`.
///
/// A function without a name is the fallback function, and is given the
/// [`FALLBACK_SIGNATURE`].
#[must_use]
pub fn render<S: AsRef<str>>(name: Option<&str>, types: &[S]) -> String {
    match name {
        Some(name) if !name.is_empty() => {
            format!("{name}({})", types.iter().map(AsRef::as_ref).join(","))
        }
        _ => FALLBACK_SIGNATURE.to_string(),
    }
}

/// Re-canonicalises an existing `signature`.
///
/// This is idempotent: canonicalising a canonical signature returns it
/// unchanged. Inputs without a parameter list are returned trimmed.
#[must_use]
pub fn canonicalize(signature: &str) -> String {
    let signature = signature.trim();
    let Some((name, rest)) = signature.split_once('(') else {
        return signature.to_string();
    };
    let inner = rest.strip_suffix(')').unwrap_or(rest);
    let types: Vec<String> = split_parameters(inner).map(canonical_type).collect();

    render(Some(name.trim()), &types)
}

/// Recovers the list of parameter types from a `signature`.
///
/// The fallback signature has no parameters.
#[must_use]
pub fn parameter_types(signature: &str) -> Vec<String> {
    signature
        .split_once('(')
        .map(|(_, rest)| {
            let inner = rest.strip_suffix(')').unwrap_or(rest);
            split_parameters(inner).map(ToString::to_string).collect()
        })
        .unwrap_or_default()
}

/// Splits the inside of a parameter list on commas, skipping empty entries.
fn split_parameters(inner: &str) -> impl Iterator<Item = &str> {
    inner.split(',').map(str::trim).filter(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use crate::signature::{array_length, canonical_type, canonicalize, parameter_types, render};

    #[test]
    fn expands_unsized_keywords() {
        assert_eq!(canonical_type("uint"), "uint256");
        assert_eq!(canonical_type("int"), "int256");
        assert_eq!(canonical_type("ufixed"), "ufixed128x18");
        assert_eq!(canonical_type("fixed"), "fixed128x18");
        assert_eq!(canonical_type("byte"), "bytes1");
    }

    #[test]
    fn keeps_array_suffixes() {
        assert_eq!(canonical_type("uint[]"), "uint256[]");
        assert_eq!(canonical_type("bytes32[ 4 ]"), "bytes32[4]");
        assert_eq!(canonical_type("ERC20[]"), "address[]");
        assert_eq!(canonical_type("uint[ SIZE ][]"), "uint256[SIZE][]");
    }

    #[test]
    fn evaluates_numeric_array_lengths() {
        assert_eq!(array_length("4").as_deref(), Some("4"));
        assert_eq!(array_length("1e2").as_deref(), Some("100"));
        assert_eq!(array_length("0x10").as_deref(), Some("16"));
        assert_eq!(array_length("1_000").as_deref(), Some("1000"));
        assert_eq!(array_length("SIZE"), None);
        assert_eq!(array_length(""), None);
        assert_eq!(array_length("1e99"), None);

        assert_eq!(canonical_type("bytes32[1e2]"), "bytes32[100]");
        assert_eq!(canonical_type("bytes32[0x2]"), "bytes32[2]");
    }

    #[test]
    fn maps_user_defined_types_to_address() {
        assert_eq!(canonical_type("ERC20"), "address");
        assert_eq!(canonical_type("Kernel"), "address");
        assert_eq!(canonical_type("address"), "address");
        assert_eq!(canonical_type(""), "");
    }

    #[test]
    fn renders_fallback_without_parentheses() {
        let empty: [&str; 0] = [];
        assert_eq!(render(None, &empty), "fallback");
        assert_eq!(render(Some(""), &["uint256"]), "fallback");
        assert_eq!(render(Some("f"), &empty), "f()");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let raw = "deposit( address , uint, string )";
        let once = canonicalize(raw);
        assert_eq!(once, "deposit(address,uint256,string)");
        assert_eq!(canonicalize(&once), once);
        assert_eq!(canonicalize("fallback"), "fallback");
    }

    #[test]
    fn recovers_parameter_types() {
        assert_eq!(
            parameter_types("deposit(address,uint256,string)"),
            vec!["address", "uint256", "string"]
        );
        assert!(parameter_types("noop()").is_empty());
        assert!(parameter_types("fallback").is_empty());
    }
}
