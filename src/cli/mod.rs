pub mod doctor;
pub mod import;
pub mod stats;
