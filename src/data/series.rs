use crate::data::bar::PriceBar;
use crate::error::{BacktestError, Result};
use std::ops::Index;

//validated, chronologically ordered sequence of bars
//guaranteed non-empty, every bar valid, strictly increasing timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(BacktestError::EmptySeries);
        }

        //bars built without `PriceBar::new` (deserialized, from_close) are checked here
        for bar in &bars {
            bar.validate()?;
        }

        for (index, pair) in bars.windows(2).enumerate() {
            let (previous, current) = (pair[0].timestamp, pair[1].timestamp);
            if current == previous {
                return Err(BacktestError::DuplicateTimestamp {
                    index: index + 1,
                    timestamp: current,
                });
            }
            if current < previous {
                return Err(BacktestError::NonMonotonicTimestamp {
                    index: index + 1,
                    previous,
                    current,
                });
            }
        }

        Ok(PriceSeries { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    //always false, kept for clippy's len_without_is_empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    //close prices in bar order
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn first(&self) -> &PriceBar {
        &self.bars[0]
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }
}

impl Index<usize> for PriceSeries {
    type Output = PriceBar;

    fn index(&self, index: usize) -> &PriceBar {
        &self.bars[index]
    }
}
