//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`IrrigatorError`] via `#[from]`.

use crate::relay::{RelayAction, RelayIndex};

/// Top-level error for faucet construction and relay actions.
#[derive(Debug, thiserror::Error)]
pub enum IrrigatorError {
    /// A faucet configuration failed validation.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// No faucet variant is registered under the requested type.
    #[error("unknown faucet type")]
    UnknownFaucetType(#[from] UnknownFaucetTypeError),

    /// The relay behind a faucet could not be switched.
    #[error("hardware error")]
    Hardware(#[from] HardwareError),

    /// A named faucet (or other item) does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Irrigation is disabled on this computer.
    #[error("computer disabled")]
    Disabled(#[from] ComputerDisabledError),
}

/// A local faucet was asked to open while its computer is disabled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("computer {computer:?} is disabled, not opening faucet {faucet:?}")]
pub struct ComputerDisabledError {
    /// The disabled computer.
    pub computer: String,
    /// The faucet that stayed closed.
    pub faucet: String,
}

/// Lookup of a named item failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    /// Kind of item that was looked up (e.g. `"Faucet"`).
    pub entity: &'static str,
    /// The requested identifier.
    pub id: String,
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The faucet name is empty or only whitespace.
    #[error("name must not be empty")]
    EmptyName,

    /// The relay index is empty.
    #[error("relay index must not be empty")]
    EmptyRelayIndex,
}

/// Raised by the faucet type registry for an unregistered type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no faucet type registered under {faucet_type:?}")]
pub struct UnknownFaucetTypeError {
    /// The type string as it was requested.
    pub faucet_type: String,
}

/// A relay driver failed to switch a relay.
#[derive(Debug, thiserror::Error)]
#[error("failed to switch relay {relay} {action}")]
pub struct HardwareError {
    /// Relay that was addressed.
    pub relay: RelayIndex,
    /// Requested action.
    pub action: RelayAction,
    /// Underlying driver failure.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl HardwareError {
    /// Wrap a driver failure for the given relay and action.
    pub fn new(
        relay: RelayIndex,
        action: RelayAction,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            relay,
            action,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_unknown_faucet_type() {
        let err = UnknownFaucetTypeError {
            faucet_type: "Numato".to_string(),
        };
        assert_eq!(err.to_string(), "no faucet type registered under \"Numato\"");
    }

    #[test]
    fn should_display_hardware_error_with_relay_and_action() {
        let err = HardwareError::new(RelayIndex::from(11_u8), RelayAction::On, "port busy");
        assert_eq!(err.to_string(), "failed to switch relay B on");
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("port busy".to_string())
        );
    }

    #[test]
    fn should_convert_hardware_error_into_irrigator_error() {
        let err: IrrigatorError =
            HardwareError::new(RelayIndex::default(), RelayAction::Off, "offline").into();
        assert!(matches!(err, IrrigatorError::Hardware(_)));
    }

    #[test]
    fn should_display_not_found_error() {
        let err = NotFoundError {
            entity: "Faucet",
            id: "roses".to_string(),
        };
        assert_eq!(err.to_string(), "Faucet \"roses\" not found");
    }

    #[test]
    fn should_convert_validation_error_into_irrigator_error() {
        let err: IrrigatorError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            IrrigatorError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_display_computer_disabled_error() {
        let err = ComputerDisabledError {
            computer: "pita".to_string(),
            faucet: "roses".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "computer \"pita\" is disabled, not opening faucet \"roses\""
        );
    }
}
