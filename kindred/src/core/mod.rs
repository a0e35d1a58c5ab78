//! Core engine front door

pub mod family_manager;

pub use family_manager::FamilyManager;
