use serde::{Deserialize, Serialize};

/// Monotonic counter handing out fresh unique identifiers.
///
/// The surrounding pipeline owns the watermark: a pass receives the current
/// value, draws from it, and hands the advanced value to the next stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueSupply(u64);

impl UniqueSupply {
    pub fn new(watermark: u64) -> Self {
        Self(watermark)
    }

    /// Take the next identifier. Never returns the same value twice.
    pub fn fresh(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }

    /// The next value that `fresh` would return.
    pub fn watermark(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_is_monotonic() {
        let mut supply = UniqueSupply::new(100);
        assert_eq!(supply.fresh(), 100);
        assert_eq!(supply.fresh(), 101);
        assert_eq!(supply.watermark(), 102);
    }
}
