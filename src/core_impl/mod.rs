pub(crate) mod loader;
pub(crate) mod lock;
pub(crate) mod types;
