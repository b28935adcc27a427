//! Settings governance: one-time initialisation and admin-gated updates.

use crate::error::{ContractError, Result, StateError};
use crate::host::Host;
use crate::state::ContractState;
use custodia_types::{ContractEvent, Settings, SettingsInit};
use tracing::info;

fn validate(settings: &Settings) -> Result<()> {
    if settings.gas_price == 0 {
        return Err(StateError::InvalidSettings("gas_price must be non-zero").into());
    }
    if settings.max_prove_block_num == 0 {
        return Err(StateError::InvalidSettings("max_prove_block_num must be non-zero").into());
    }
    Ok(())
}

/// Store the genesis settings and the admin allowed to change them.
pub fn init_settings<H: Host>(host: &mut H, init: SettingsInit) -> Result<()> {
    let mut state = ContractState::new(host);
    if state.stored_settings()?.is_some() || state.admin()?.is_some() {
        return Err(StateError::AlreadyInitialized.into());
    }
    state.require_witness(&init.admin)?;
    validate(&init.settings)?;

    state.put_settings(&init.settings)?;
    state.put_admin(&init.admin)?;
    state.emit(ContractEvent::SettingsUpdated {
        settings: init.settings,
    });
    info!(admin = %init.admin, gas_price = init.settings.gas_price, "Settings initialized");
    Ok(())
}

/// Replace the settings wholesale. Only the stored admin may do this.
pub fn update_settings<H: Host>(host: &mut H, settings: Settings) -> Result<()> {
    let mut state = ContractState::new(host);
    let admin = state.admin()?.ok_or(ContractError::NotFound("settings admin"))?;
    state.require_witness(&admin)?;
    validate(&settings)?;

    state.put_settings(&settings)?;
    state.emit(ContractEvent::SettingsUpdated { settings });
    info!(admin = %admin, gas_price = settings.gas_price, "Settings updated");
    Ok(())
}

pub fn get_settings<H: Host>(host: &mut H) -> Result<Settings> {
    ContractState::new(host).settings()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_host::LocalHost;
    use custodia_types::Address;

    const CONTRACT: Address = Address([0xC0; 20]);
    const ADMIN: Address = Address([0xAD; 20]);

    fn custom() -> Settings {
        Settings {
            gas_price: 1,
            storage_rate: 2,
            read_rate: 3,
            challenge_overhead: 4,
            max_prove_block_num: 8,
        }
    }

    #[test]
    fn defaults_before_init() {
        let mut host = LocalHost::in_memory(CONTRACT);
        let settings = host.execute(|h| get_settings(h)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn init_once_then_admin_updates() {
        let mut host = LocalHost::in_memory(CONTRACT);
        host.sign_as(ADMIN);
        host.execute(|h| init_settings(h, SettingsInit { admin: ADMIN, settings: custom() }))
            .unwrap();
        assert_eq!(host.execute(|h| get_settings(h)).unwrap(), custom());

        let again = host.execute(|h| {
            init_settings(
                h,
                SettingsInit {
                    admin: ADMIN,
                    settings: custom(),
                },
            )
        });
        assert!(matches!(again, Err(ContractError::State(StateError::AlreadyInitialized))));

        let updated = Settings { gas_price: 9, ..custom() };
        host.execute(|h| update_settings(h, updated)).unwrap();
        assert_eq!(host.execute(|h| get_settings(h)).unwrap(), updated);
    }

    #[test]
    fn update_requires_admin_witness() {
        let mut host = LocalHost::in_memory(CONTRACT);
        host.sign_as(ADMIN);
        host.execute(|h| init_settings(h, SettingsInit { admin: ADMIN, settings: custom() }))
            .unwrap();

        host.sign_as(Address([1; 20]));
        let result = host.execute(|h| update_settings(h, Settings::default()));
        assert!(matches!(result, Err(ContractError::Unauthorized(a)) if a == ADMIN));
    }

    #[test]
    fn zero_gas_price_rejected() {
        let mut host = LocalHost::in_memory(CONTRACT);
        host.sign_as(ADMIN);
        let bad = Settings { gas_price: 0, ..custom() };
        let result = host.execute(|h| {
            init_settings(
                h,
                SettingsInit {
                    admin: ADMIN,
                    settings: bad,
                },
            )
        });
        assert!(matches!(result, Err(ContractError::State(StateError::InvalidSettings(_)))));
    }
}
