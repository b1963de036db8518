//! Progression engine for a study routine modelled as a character sheet.
//!
//! Everything in here is pure: operations take a [`core_api::CharacterState`]
//! by value and hand back the next one. Persistence and presentation belong
//! to the host.

pub mod core_api;
pub mod quota;
