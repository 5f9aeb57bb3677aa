pub(crate) mod caption;
pub(crate) mod decode;
pub(crate) mod loader;
