pub mod coresignal;
pub mod drive;
pub mod health;
pub mod research;
