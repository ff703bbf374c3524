//! Hub and motor port enumerations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output port a drive motor is plugged into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum MotorPort {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl MotorPort {
    /// Every port any supported hub can offer, in label order.
    pub const ALL: [MotorPort; 6] = [
        MotorPort::A,
        MotorPort::B,
        MotorPort::C,
        MotorPort::D,
        MotorPort::E,
        MotorPort::F,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotorPort::A => "A",
            MotorPort::B => "B",
            MotorPort::C => "C",
            MotorPort::D => "D",
            MotorPort::E => "E",
            MotorPort::F => "F",
        }
    }
}

impl FromStr for MotorPort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(MotorPort::A),
            "B" => Ok(MotorPort::B),
            "C" => Ok(MotorPort::C),
            "D" => Ok(MotorPort::D),
            "E" => Ok(MotorPort::E),
            "F" => Ok(MotorPort::F),
            _ => Err(format!("Invalid motor port: {s}")),
        }
    }
}

/// Target robot controller that scripts are generated for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Hub {
    /// LEGO Spike Prime hub (six ports)
    Spike,
    /// LEGO Mindstorms EV3 brick (four output ports)
    Ev3,
}

impl Hub {
    pub const ALL: [Hub; 2] = [Hub::Spike, Hub::Ev3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hub::Spike => "spike",
            Hub::Ev3 => "ev3",
        }
    }

    /// Motor ports this hub exposes.
    pub fn motor_ports(&self) -> &'static [MotorPort] {
        match self {
            Hub::Spike => &MotorPort::ALL,
            Hub::Ev3 => &MotorPort::ALL[..4],
        }
    }

    pub fn supports_port(&self, port: MotorPort) -> bool {
        self.motor_ports().contains(&port)
    }
}

impl FromStr for Hub {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spike" | "spike-prime" => Ok(Hub::Spike),
            "ev3" => Ok(Hub::Ev3),
            _ => Err(format!("Invalid hub type: {s}")),
        }
    }
}
