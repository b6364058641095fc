pub mod api;
pub mod locales;
