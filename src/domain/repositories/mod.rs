pub mod family_repository;
pub mod info_file_repository;
pub mod marker_repository;
pub mod token_document_repository;
pub mod world_repository;

pub use family_repository::FamilyRepository;
pub use info_file_repository::InfoFileRepository;
pub use marker_repository::MarkerRepository;
pub use token_document_repository::TokenDocumentRepository;
pub use world_repository::WorldRepository;
