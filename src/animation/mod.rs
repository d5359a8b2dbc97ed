pub(crate) mod curve;
pub(crate) mod ease;
pub(crate) mod gallery;
pub(crate) mod reveal;
pub(crate) mod section;
