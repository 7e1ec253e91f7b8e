//! Core data model: documents, file types and favourites

pub mod document;
pub mod favourites;
pub mod filetype;
