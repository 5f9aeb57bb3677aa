pub(crate) mod applied;
pub(crate) mod catalog;
pub(crate) mod pixel;
pub(crate) mod transform;
