pub mod entities;
pub mod media;
pub mod settings;
pub mod specifications;
