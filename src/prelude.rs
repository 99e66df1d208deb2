pub use crate::galaxy::{GalaxyConfigUi, GalaxyPointCloud};
pub use galaxy_points::{GalaxyError, JitterScaling, ParameterSet};
