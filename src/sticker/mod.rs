pub(crate) mod board;
pub(crate) mod model;
