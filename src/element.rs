use crate::error::{DesignError, Result};
use crate::frequency::Frequency;
use crate::network::Response;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub mod mlin;
pub mod msub;
pub mod resonator;

pub use self::mlin::{ConductorLoss, Mlin, MlinBuilder};
pub use self::msub::{LineParams, Msub, MsubBuilder, Regime};
pub use self::resonator::{Resonator, ResonatorBuilder, ResonatorResponse};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub enum ElemType {
    #[default]
    Mlin,
    Resonator,
    SteppedLpf,
}

impl ElemType {
    /// Convert ElemType to String
    pub fn to_str(&self) -> &str {
        match self {
            ElemType::Mlin => "MLIN",
            ElemType::Resonator => "RESONATOR",
            ElemType::SteppedLpf => "STEPPED_LPF",
        }
    }
}

impl FromStr for ElemType {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mlin" | "MLIN" | "line" => Ok(ElemType::Mlin),
            "resonator" | "RESONATOR" | "res" => Ok(ElemType::Resonator),
            "lpf" | "LPF" | "stepped_lpf" | "STEPPED_LPF" => Ok(ElemType::SteppedLpf),
            _ => Err(DesignError::Parse(format!("ElemType '{}' not recognized", s))),
        }
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Anything that maps a frequency sweep onto a two-port response curve
pub trait Elem {
    fn id(&self) -> &str;
    fn elem(&self) -> ElemType;
    fn response(&self, freq: &Frequency) -> Result<Response>;
}

#[cfg(test)]
mod element_tests {
    use super::*;

    #[test]
    fn elem_type_from_str() {
        assert_eq!(ElemType::from_str("MLIN").unwrap(), ElemType::Mlin);
        assert_eq!(ElemType::from_str("res").unwrap(), ElemType::Resonator);
        assert_eq!(ElemType::from_str("lpf").unwrap(), ElemType::SteppedLpf);
        assert!(ElemType::from_str("capacitor").is_err());
    }

    #[test]
    fn elem_type_display() {
        for elem in [ElemType::Mlin, ElemType::Resonator, ElemType::SteppedLpf] {
            assert_eq!(ElemType::from_str(&elem.to_string()).unwrap(), elem);
        }
    }
}
