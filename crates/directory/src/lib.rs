//! Agenda directory resources: contacts and their phone numbers and emails.
//!
//! Each resource is a plain record implementing [`agenda_core::Entity`]; they
//! share no behavior beyond what the trait describes.

pub mod contacto;
pub mod correo;
pub mod telefono;

pub use contacto::Contacto;
pub use correo::Correo;
pub use telefono::Telefono;
