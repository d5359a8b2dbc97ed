pub(crate) mod progress;
pub(crate) mod sampler;
pub(crate) mod select;
