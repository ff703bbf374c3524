//! Robot chassis geometry.

use serde::{Deserialize, Serialize};

use super::{Hub, MotorPort};
use crate::error::{ValidationError, ValidationErrorKind};

/// Describes the two drive motors and the wheel geometry of the robot.
///
/// Values are immutable once built; change a plan's chassis by replacing
/// the whole drive base. Deserialization goes through [`DriveBase::new`], so
/// an invalid value cannot be built from JSON either.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DriveBaseFields", into = "DriveBaseFields")]
pub struct DriveBase {
    left_motor_port: MotorPort,
    right_motor_port: MotorPort,
    /// Wheel diameter in millimeters
    wheel_diameter: f64,
    /// Distance between the wheel contact points in millimeters
    axle_track: f64,
}

/// Unchecked drive base fields as they appear in a plan document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DriveBaseFields {
    pub left_motor_port: MotorPort,
    pub right_motor_port: MotorPort,
    pub wheel_diameter: f64,
    pub axle_track: f64,
}

impl TryFrom<DriveBaseFields> for DriveBase {
    type Error = ValidationError;

    fn try_from(fields: DriveBaseFields) -> Result<Self, Self::Error> {
        DriveBase::new(
            fields.left_motor_port,
            fields.right_motor_port,
            fields.wheel_diameter,
            fields.axle_track,
        )
    }
}

impl From<DriveBase> for DriveBaseFields {
    fn from(drive_base: DriveBase) -> Self {
        DriveBaseFields {
            left_motor_port: drive_base.left_motor_port,
            right_motor_port: drive_base.right_motor_port,
            wheel_diameter: drive_base.wheel_diameter,
            axle_track: drive_base.axle_track,
        }
    }
}

impl DriveBase {
    pub fn new(
        left_motor_port: MotorPort,
        right_motor_port: MotorPort,
        wheel_diameter: f64,
        axle_track: f64,
    ) -> Result<Self, ValidationError> {
        if left_motor_port == right_motor_port {
            return Err(ValidationError::new(
                ValidationErrorKind::DuplicateMotorPort,
                format!(
                    "left and right motors both use port {}",
                    left_motor_port.as_str()
                ),
            ));
        }
        for (field, value) in [("wheel diameter", wheel_diameter), ("axle track", axle_track)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ValidationError::new(
                    ValidationErrorKind::NonPositiveDimension,
                    format!("{field} must be a positive length, got {value}"),
                ));
            }
        }

        Ok(Self {
            left_motor_port,
            right_motor_port,
            wheel_diameter,
            axle_track,
        })
    }

    /// Fails with `InvalidDriveBase` if either motor port is missing on `hub`.
    pub fn validate_for_hub(&self, hub: Hub) -> Result<(), ValidationError> {
        for port in [self.left_motor_port, self.right_motor_port] {
            if !hub.supports_port(port) {
                return Err(ValidationError::new(
                    ValidationErrorKind::InvalidDriveBase,
                    format!("hub {} has no motor port {}", hub.as_str(), port.as_str()),
                ));
            }
        }
        Ok(())
    }

    pub fn left_motor_port(&self) -> MotorPort {
        self.left_motor_port
    }

    pub fn right_motor_port(&self) -> MotorPort {
        self.right_motor_port
    }

    pub fn wheel_diameter(&self) -> f64 {
        self.wheel_diameter
    }

    pub fn axle_track(&self) -> f64 {
        self.axle_track
    }
}
