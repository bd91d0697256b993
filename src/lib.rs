//! Interaction layer of the Le Majeur site: header and back-to-top state,
//! scroll spy, fade-ins, the mobile menu and the two forms.

pub mod config;
pub mod contact;
pub mod dom;
pub mod error;
pub mod fade;
pub mod footer;
pub mod nav;
pub mod newsletter;
pub mod page;
pub mod scroll;
pub mod spy;

#[cfg(test)]
mod testing;

pub use dom::start;
pub use error::Error;
