use super::identity::DEFAULT_MODULE_SEGMENT;

/// Configuration of the request pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Segment of a request's type path reported as its module in logs.
    pub module_segment: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            module_segment: DEFAULT_MODULE_SEGMENT,
        }
    }
}
