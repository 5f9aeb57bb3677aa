pub(crate) mod dir;
pub(crate) mod memory;
pub(crate) mod record;
