//! One repository per persisted record, each implementing its storage trait.

pub mod history_repository;
pub mod pet_repository;
pub mod reset_marker_repository;

pub use history_repository::HistoryRepository;
pub use pet_repository::PetRepository;
pub use reset_marker_repository::ResetMarkerRepository;
