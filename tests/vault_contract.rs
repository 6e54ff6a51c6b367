//! This module is an integration test that tests the library's analysis
//! capabilities on a flattened contract with an inherited base, auth helpers
//! and notices in both comment styles.
#![cfg(test)]

use contract_surface_extractor::{extractor, roles, surface::Role};

mod common;

#[test]
fn extracts_the_callable_surface() -> anyhow::Result<()> {
    let analyzer = common::new_analyzer_from_path(common::VAULT_PATH)?;
    let analyzer = analyzer.parse()?.extract()?;

    let signatures: Vec<&str> = analyzer.functions().iter().map(|f| f.signature()).collect();
    assert_eq!(signatures, vec![
        "deposit(address,uint256)",
        "transfer(address,address,uint256)",
        "fallback",
        "transferToVault(address)",
    ]);

    Ok(())
}

#[test]
fn resolves_roles_and_their_parameter_counts() -> anyhow::Result<()> {
    let analyzer = common::new_analyzer_from_path(common::VAULT_PATH)?.parse()?.extract()?;
    let functions = analyzer.functions();

    assert_eq!(functions[0].roles(), &[Role::new("DEPOSIT_ROLE", 0)]);
    assert_eq!(functions[1].roles(), &[Role::new("TRANSFER_ROLE", 3)]);
    assert!(functions[2].roles().is_empty());

    let info = analyzer.contract_info();
    assert_eq!(info.roles, vec![
        Role::new("DEPOSIT_ROLE", 0),
        Role::new("TRANSFER_ROLE", 3)
    ]);
    assert!(roles::param_count_conflicts(functions).is_empty());

    Ok(())
}

#[test]
fn joins_notices_by_signature() -> anyhow::Result<()> {
    let analyzer = common::new_analyzer_from_path(common::VAULT_PATH)?.parse()?.extract()?;
    let functions = analyzer.functions();

    assert_eq!(
        functions[0].notice(),
        Some("Deposit `_value` `_token` to the vault")
    );
    assert_eq!(
        functions[1].notice(),
        Some("Transfer `_value` `_token` from the Vault to `_to`")
    );
    assert_eq!(functions[2].notice(), None);
    assert_eq!(functions[3].notice(), None);

    Ok(())
}

#[test]
fn ignores_inherited_functions_when_asked() -> anyhow::Result<()> {
    let config = extractor::Config::default().with_only_target_contract(true);
    let analyzer = common::new_analyzer_with_config(common::VAULT_PATH, config)?;
    let analyzer = analyzer.parse()?.extract()?;

    assert_eq!(analyzer.functions().len(), 3);
    assert!(analyzer.functions().iter().all(|f| f.name() != "transferToVault"));

    Ok(())
}

#[test]
fn validates_against_the_declared_roles() -> anyhow::Result<()> {
    let metadata = common::read_metadata("./asset/arapp.json")?;
    let analyzer = common::new_analyzer_from_path(common::VAULT_PATH)?.parse()?.extract()?;

    assert!(analyzer.validate_roles(&metadata.roles).is_empty());

    Ok(())
}
