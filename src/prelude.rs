//! rfstrip prelude.
//!
//! The most used types and traits, importable as a group.
//!
//! ```
//! use rfstrip::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::config::DesignConfig;

#[doc(no_inline)]
pub use crate::element::{
    ConductorLoss, Elem, ElemType, LineParams, Mlin, MlinBuilder, Msub, MsubBuilder, Regime,
    Resonator, ResonatorBuilder, ResonatorResponse,
};

#[doc(no_inline)]
pub use crate::error::{DesignError, Result};

#[doc(no_inline)]
pub use crate::file::{read_touchstone, write_touchstone};

#[doc(no_inline)]
pub use crate::filter::{FilterDesign, Prototype, Section, SectionKind, SteppedLpf};

#[doc(no_inline)]
pub use crate::frequency::{Frequency, FrequencyBuilder};

#[doc(no_inline)]
pub use crate::network::{Response, ResponseTable, SParam};

#[doc(no_inline)]
pub use crate::scale::Scale;

#[doc(no_inline)]
pub use crate::unit::{Unit, UnitVal, UnitValBuilder};
