pub mod filesystem_family_repository;
pub mod filesystem_info_file_repository;
pub mod filesystem_marker_repository;
pub mod filesystem_token_document_repository;
pub mod filesystem_world_repository;

pub use filesystem_family_repository::FilesystemFamilyRepository;
pub use filesystem_info_file_repository::FilesystemInfoFileRepository;
pub use filesystem_marker_repository::FilesystemMarkerRepository;
pub use filesystem_token_document_repository::FilesystemTokenDocumentRepository;
pub use filesystem_world_repository::FilesystemWorldRepository;
