pub(crate) mod composite;
pub(crate) mod geometry;
pub(crate) mod renderer;
pub(crate) mod surface;
