// ggu library - filters, favourites and the plugin layer, exposed for the
// binary and for tests

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod config_io;
pub mod model;
pub mod primitives;
pub mod services;
