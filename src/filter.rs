pub mod prototype;
pub mod stepped;

pub use self::prototype::Prototype;
pub use self::stepped::{FilterDesign, Section, SectionKind, SteppedLpf};
