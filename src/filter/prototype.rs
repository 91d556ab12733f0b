use crate::error::{DesignError, Result};

/// Normalized low-pass prototype: g0 (source), g1..gn (reactive elements),
/// g(n+1) (load).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prototype {
    order: usize,
    ripple_db: f64,
    g: &'static [f64],
}

static TABLES: [Prototype; 1] = [Prototype {
    order: 5,
    ripple_db: 0.1,
    g: &[1.0, 0.6180, 1.6180, 2.0000, 1.6180, 0.6180, 1.0],
}];

impl Prototype {
    /// Table for `order`, or `UnsupportedOrder` when none is tabulated
    pub fn lookup(order: usize) -> Result<&'static Prototype> {
        TABLES
            .iter()
            .find(|p| p.order == order)
            .ok_or(DesignError::UnsupportedOrder(order))
    }

    pub fn supported_orders() -> Vec<usize> {
        TABLES.iter().map(|p| p.order).collect()
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn ripple_db(&self) -> f64 {
        self.ripple_db
    }

    /// g(i) for i in 0..=n+1, `None` past the load
    pub fn g(&self, i: usize) -> Option<f64> {
        self.g.get(i).copied()
    }

    /// g1..gn
    pub fn elements(&self) -> &[f64] {
        &self.g[1..=self.order]
    }

    pub fn source(&self) -> f64 {
        self.g[0]
    }

    pub fn load(&self) -> f64 {
        self.g[self.order + 1]
    }
}
