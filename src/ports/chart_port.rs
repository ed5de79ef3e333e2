//! Chart output port.

use crate::domain::chart::ChartSpec;
use crate::domain::error::RrgError;
use std::path::Path;

pub trait ChartPort {
    fn render(&self, chart: &ChartSpec, output_path: &Path) -> Result<(), RrgError>;
}
